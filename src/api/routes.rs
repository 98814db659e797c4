//! API Routes
//!
//! Route table, per-route guards and the error boundary.

use std::any::Any;

use axum::{
    http::{StatusCode, Uri},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::{AppError, ErrorResponse};

use super::middleware::{require_admin, require_auth};
use super::{auth, contact, finance_methods, AppState};

// =========================================================================
// API Router
// =========================================================================

/// Create the application router.
///
/// Public routes carry no guard. Protected routes run `require_auth`, and
/// admin routes additionally run `require_admin`, before any body rules are
/// checked by the handler's extractor.
pub fn create_router(state: AppState) -> Router {
    let protect = from_fn_with_state(state.clone(), require_auth);
    let admin = from_fn(require_admin);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        // Accounts
        .route("/api/auth/register", post(auth::register).fallback(not_found))
        .route("/api/auth/login", post(auth::login).fallback(not_found))
        .route(
            "/api/auth/profile",
            get(auth::profile)
                .route_layer(protect.clone())
                .fallback(not_found),
        )
        // Contact inquiries
        .route(
            "/api/contact",
            post(contact::create_contact)
                .merge(
                    get(contact::list_contacts)
                        .route_layer(admin.clone())
                        .route_layer(protect.clone()),
                )
                .fallback(not_found),
        )
        .route(
            "/api/contact/:id",
            get(contact::get_contact)
                .put(contact::update_contact)
                .delete(contact::delete_contact)
                .route_layer(admin.clone())
                .route_layer(protect.clone())
                .fallback(not_found),
        )
        // Finance methods
        .route(
            "/api/finance-methods",
            get(finance_methods::list_finance_methods)
                .merge(
                    post(finance_methods::create_finance_method)
                        .route_layer(admin.clone())
                        .route_layer(protect.clone()),
                )
                .fallback(not_found),
        )
        .route(
            "/api/finance-methods/:id",
            get(finance_methods::get_finance_method)
                .merge(
                    put(finance_methods::update_finance_method)
                        .delete(finance_methods::delete_finance_method)
                        .route_layer(admin)
                        .route_layer(protect),
                )
                .fallback(not_found),
        )
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// Banner
async fn root() -> Json<Value> {
    Json(json!({ "message": "Finance Tracking and Management API" }))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// =========================================================================
// Error boundary
// =========================================================================

/// Unmatched route or method
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Not Found - {}", uri))
}

/// Render a handler panic as a JSON 500 carrying the panic message
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal server error".to_string()
    };

    tracing::error!("Handler panicked: {}", message);

    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::message(message))).into_response()
}
