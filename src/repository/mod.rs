//! Repositories
//!
//! One repository per resource. Each dispatches single-record reads and
//! writes to whichever backend the [`Store`](crate::db::Store) holds.

mod contact;
mod finance_method;
mod user;

pub use contact::ContactRepository;
pub use finance_method::FinanceMethodRepository;
pub use user::UserRepository;

/// Postgres SQLSTATE for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
    )
}
