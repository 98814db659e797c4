//! Domain module
//!
//! Record types for the three resources and the rules for changing them.

pub mod contact;
pub mod finance_method;
pub mod user;

pub use contact::{Contact, ContactFilter, ContactStatus, InquiryType, NewContact};
pub use finance_method::{
    Author, FinanceMethod, FinanceMethodChanges, FinanceMethodFilter, FinanceMethodView,
    NewFinanceMethod, DEFAULT_IMAGE_URL,
};
pub use user::{NewUser, Role, User};

/// Trim a client-supplied value and drop it when nothing is left.
///
/// Partial updates treat empty strings as "not provided".
pub fn provided(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Error for enum values outside the allowed set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field}: {value}")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}
