//! Account endpoints: register, login, profile

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password, verify_password};
use crate::domain::user::normalize_email;
use crate::domain::{NewUser, Role, User};
use crate::error::{AppError, AppResult};
use crate::repository::UserRepository;
use crate::validation::{Check, Rule, Validate, Validated};

use super::middleware::CurrentUser;
use super::response::DataResponse;
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    const RULES: &'static [Rule] = &[
        Rule::new("name", Check::NotBlank, "Name is required"),
        Rule::new("email", Check::Email, "Please provide a valid email"),
        Rule::new("password", Check::MinLength(6), "Password must be at least 6 characters"),
    ];
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    const RULES: &'static [Rule] = &[
        Rule::new("email", Check::Email, "Please provide a valid email"),
        Rule::new("password", Check::NotEmpty, "Password is required"),
    ];
}

/// The account plus a freshly issued bearer token
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

impl AuthPayload {
    fn new(user: &User, token: String) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            token,
        }
    }
}

/// Run password hashing off the async workers
async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Password task failed: {}", e)))
}

// =========================================================================
// POST /api/auth/register
// =========================================================================

pub async fn register(
    State(state): State<AppState>,
    Validated(request): Validated<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthPayload>>)> {
    let users = UserRepository::new(state.store.clone());
    let email = normalize_email(&request.email);

    if users.find_by_email(&email).await?.is_some() {
        return Err(AppError::InvalidRequest("User already exists".to_string()));
    }

    let password = request.password;
    let password_hash = run_blocking(move || hash_password(&password)).await??;
    let user = User::create(NewUser::new(&request.name, &email, password_hash), Utc::now());
    users.insert(&user).await?;

    let token = state.tokens.issue(user.id)?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(AuthPayload::new(&user, token))),
    ))
}

// =========================================================================
// POST /api/auth/login
// =========================================================================

pub async fn login(
    State(state): State<AppState>,
    Validated(request): Validated<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthPayload>>> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = UserRepository::new(state.store.clone())
        .find_by_email(&normalize_email(&request.email))
        .await?
        .ok_or_else(invalid)?;

    let stored_hash = user.password_hash.clone();
    let matches = run_blocking(move || verify_password(&request.password, &stored_hash)).await?;

    if !matches {
        tracing::info!(user_id = %user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    let token = state.tokens.issue(user.id)?;

    Ok(Json(DataResponse::new(AuthPayload::new(&user, token))))
}

// =========================================================================
// GET /api/auth/profile
// =========================================================================

pub async fn profile(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<DataResponse<User>> {
    Json(DataResponse::new(user))
}
