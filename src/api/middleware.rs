//! API Middleware
//!
//! Bearer authentication, role guards and request logging.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::domain::{Role, User};
use crate::error::{AppError, AppResult};
use crate::repository::UserRepository;

use super::AppState;

/// The authenticated user, attached to request extensions by [`require_auth`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

// =========================================================================
// Authentication
// =========================================================================

/// Resolve the bearer token to a stored user and attach it to the request
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let token = extract_bearer(request.headers())?;

    let claims = state.tokens.verify(token)?;

    let user = UserRepository::new(state.store.clone())
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Not authorized, user not found".to_string()))?;

    tracing::debug!(user_id = %user.id, role = %user.role, "Request authenticated");

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap) -> AppResult<&str> {
    let no_token = || AppError::Unauthorized("Not authorized, no token".to_string());

    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(no_token)?
        .to_str()
        .map_err(|_| no_token())?;

    let token = value.strip_prefix("Bearer ").ok_or_else(no_token)?.trim();
    if token.is_empty() {
        return Err(no_token());
    }

    Ok(token)
}

// =========================================================================
// Authorization
// =========================================================================

/// Single capability check behind every role guard
pub fn authorize(user: &User, role: Role) -> AppResult<()> {
    if user.has_role(role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("Not authorized as an {}", role)))
    }
}

/// Admin-only guard. Must run after [`require_auth`].
pub async fn require_admin(request: Request, next: Next) -> AppResult<Response> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".to_string()))?;

    authorize(&user.0, Role::Admin)?;

    Ok(next.run(request).await)
}

// =========================================================================
// Request logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie"];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let masked_value = if SENSITIVE_HEADERS.contains(&name.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

/// Request logging middleware
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let headers = mask_headers_for_logging(request.headers());

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = %start.elapsed().as_millis(),
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::domain::NewUser;

    fn user(role: Role) -> User {
        User::create(
            NewUser::new("Test", "test@example.com", "hash".to_string()).with_role(role),
            Utc::now(),
        )
    }

    #[test]
    fn test_mask_headers_for_logging() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("authorization", "Bearer abc.def.ghi".parse().unwrap());

        let masked = mask_headers_for_logging(&headers);

        let auth = masked.iter().find(|(k, _)| k == "authorization");
        let content_type = masked.iter().find(|(k, _)| k == "content-type");

        assert_eq!(auth.unwrap().1, "[REDACTED]");
        assert_eq!(content_type.unwrap().1, "application/json");
    }

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        assert!(extract_bearer(&headers).is_err());

        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert!(extract_bearer(&headers).is_err());

        headers.insert(header::AUTHORIZATION, "Bearer   ".parse().unwrap());
        assert!(extract_bearer(&headers).is_err());

        headers.insert(header::AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(extract_bearer(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_authorize() {
        assert!(authorize(&user(Role::Admin), Role::Admin).is_ok());

        let err = authorize(&user(Role::Public), Role::Admin).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(ref msg) if msg == "Not authorized as an admin"));
    }
}
