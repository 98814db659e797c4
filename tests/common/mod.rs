//! Common test utilities

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use finance_tracker::api::{self, AppState};
use finance_tracker::auth::{hash_password, TokenService};
use finance_tracker::domain::{NewUser, Role, User};
use finance_tracker::repository::UserRepository;
use finance_tracker::Store;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Router plus a handle on the store behind it
pub struct TestApp {
    pub router: Router,
    pub store: Store,
    pub tokens: TokenService,
}

/// Fresh app over an empty in-memory store
pub fn setup_app() -> TestApp {
    let store = Store::memory();
    let tokens = TokenService::new(TEST_SECRET, chrono::Duration::days(30));
    let router = api::create_router(AppState::new(store.clone(), tokens.clone()));

    TestApp { router, store, tokens }
}

/// Send a request and decode the JSON body (`Value::Null` when the body is
/// empty or not JSON)
pub async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Register through the API and return the issued token with the payload
pub async fn register(app: &TestApp, name: &str, email: &str, password: &str) -> (String, Value) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": name, "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);

    let token = body["data"]["token"].as_str().unwrap().to_string();
    (token, body["data"].clone())
}

/// Insert an admin directly (the API never grants the role) and log in
pub async fn admin_token(app: &TestApp) -> (String, User) {
    let user = User::create(
        NewUser::new("Admin User", "admin@example.com", hash_password("admin123").unwrap())
            .with_role(Role::Admin),
        Utc::now(),
    );
    UserRepository::new(app.store.clone())
        .insert(&user)
        .await
        .unwrap();

    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "admin@example.com", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {}", body);

    (body["data"]["token"].as_str().unwrap().to_string(), user)
}

/// A valid contact submission
pub fn contact_body(subject: &str, inquiry_type: Option<&str>) -> Value {
    let mut body = json!({
        "name": "Grace Hopper",
        "email": "grace@example.com",
        "subject": subject,
        "message": "Could you help me set up a budget?"
    });
    if let Some(kind) = inquiry_type {
        body["inquiryType"] = json!(kind);
    }
    body
}

/// A valid finance-method article
pub fn method_body(title: &str, category: &str) -> Value {
    json!({
        "title": title,
        "description": format!("About {}", title),
        "category": category,
        "methodology": "1. Start\n2. Keep going",
        "benefits": ["Simple"]
    })
}
