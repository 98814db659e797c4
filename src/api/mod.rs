//! API module
//!
//! HTTP API endpoints and middleware.

pub mod auth;
pub mod contact;
pub mod finance_methods;
pub mod middleware;
pub mod response;
pub mod routes;

use uuid::Uuid;

pub use routes::create_router;

use crate::auth::TokenService;
use crate::config::Config;
use crate::db::Store;
use crate::error::AppError;

/// State shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(store: Store, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    pub fn from_config(store: Store, config: &Config) -> Self {
        let tokens = TokenService::new(
            config.jwt_secret.as_bytes(),
            chrono::Duration::days(config.jwt_expires_in_days),
        );
        Self::new(store, tokens)
    }
}

/// Parse a path identifier. Anything that is not a valid id cannot name a
/// stored record, so it is reported as not found.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(not_found.to_string()))
}
