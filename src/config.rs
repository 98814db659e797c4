//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL. When absent the in-memory store is used.
    pub database_url: Option<String>,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// HS256 signing secret for bearer tokens
    pub jwt_secret: String,

    /// Token lifetime in days
    pub jwt_expires_in_days: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("NODE_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingEnv("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::InvalidValue("JWT_SECRET"));
        }

        let jwt_expires_in_days = env::var("JWT_EXPIRES_IN_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .ok()
            .filter(|days: &i64| *days > 0)
            .ok_or(ConfigError::InvalidValue("JWT_EXPIRES_IN_DAYS"))?;

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            jwt_secret,
            jwt_expires_in_days,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(environment: &str) -> Config {
        Config {
            database_url: None,
            database_max_connections: 10,
            host: "127.0.0.1".to_string(),
            port: 5000,
            environment: environment.to_string(),
            jwt_secret: "secret".to_string(),
            jwt_expires_in_days: 30,
        }
    }

    #[test]
    fn test_environment_checks() {
        assert!(config("production").is_production());
        assert!(!config("production").is_development());
        assert!(config("development").is_development());
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::MissingEnv("JWT_SECRET");
        assert_eq!(err.to_string(), "Missing environment variable: JWT_SECRET");
    }
}
