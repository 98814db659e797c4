//! Finance Tracker Library
//!
//! Re-exports modules for integration testing, the server binary and the
//! seed tool.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod repository;
pub mod seed;
pub mod validation;

mod error;

pub use config::Config;
pub use db::Store;
pub use error::{AppError, AppResult, ErrorResponse};
