//! Request validation
//!
//! Field rules are plain data: a field name, a check and the message reported
//! when the check fails. Each request type owns its rule table, and the
//! [`Validated`] extractor runs the table against the raw JSON body before the
//! body is deserialized. Failures are reported in rule order.

use std::sync::OnceLock;

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Request};
use axum::Json;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

/// A single failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Predicate applied to one body field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// A string that is non-empty after trimming
    NotBlank,
    /// A string that is non-empty as given
    NotEmpty,
    /// A syntactically valid email address
    Email,
    /// A string with at least this many characters
    MinLength(usize),
}

impl Check {
    /// Evaluate the check against a field value (`None` when the field is absent)
    pub fn passes(self, value: Option<&Value>) -> bool {
        let Some(text) = value.and_then(Value::as_str) else {
            return false;
        };

        match self {
            Check::NotBlank => !text.trim().is_empty(),
            Check::NotEmpty => !text.is_empty(),
            Check::Email => is_email(text.trim()),
            Check::MinLength(min) => text.chars().count() >= min,
        }
    }
}

/// One row of a rule table
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub field: &'static str,
    pub check: Check,
    pub message: &'static str,
}

impl Rule {
    pub const fn new(field: &'static str, check: Check, message: &'static str) -> Self {
        Self {
            field,
            check,
            message,
        }
    }
}

/// Run a rule table against a JSON body
pub fn validate(body: &Value, rules: &[Rule]) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = rules
        .iter()
        .filter(|rule| !rule.check.passes(body.get(rule.field)))
        .map(|rule| FieldError::new(rule.field, rule.message))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Dot-atom local part (RFC 5322 atext) and a dotted host with an
        // alphabetic top-level label.
        let pattern = concat!(
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
            r"@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
        );
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email syntax check: dot-atom local part, dotted host, 2+ letter TLD
pub fn is_email(candidate: &str) -> bool {
    candidate.len() <= 254 && email_regex().is_match(candidate)
}

/// A request body with an attached rule table
pub trait Validate: DeserializeOwned {
    const RULES: &'static [Rule];
}

/// Extractor that checks the body against `T::RULES` and then deserializes it
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::InvalidRequest(e.body_text()))?;

        // No body reads as `{}`
        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Map::new())
        } else {
            let mut request = Request::new(Body::from(bytes));
            *request.headers_mut() = headers;
            let Json(body) = Json::<Value>::from_request(request, state).await?;
            body
        };

        validate(&body, T::RULES).map_err(AppError::ValidationFailed)?;

        let value = serde_json::from_value(body)
            .map_err(|e| AppError::InvalidRequest(format!("Invalid request body: {}", e)))?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct StatusChange {
        #[serde(default)]
        status: Option<String>,
    }

    impl Validate for StatusChange {
        const RULES: &'static [Rule] = &[];
    }

    fn put(body: Body, json: bool) -> Request {
        let mut builder = axum::http::Request::builder().method("PUT").uri("/");
        if json {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        builder.body(body).unwrap()
    }

    #[tokio::test]
    async fn test_missing_body_reads_as_empty_object() {
        let request = put(Body::empty(), false);
        let Validated(change) = Validated::<StatusChange>::from_request(request, &())
            .await
            .unwrap();
        assert!(change.status.is_none());
    }

    #[tokio::test]
    async fn test_json_body_still_parsed() {
        let body = Body::from(r#"{"status":"resolved"}"#);
        let Validated(change) = Validated::<StatusChange>::from_request(put(body, true), &())
            .await
            .unwrap();
        assert_eq!(change.status.as_deref(), Some("resolved"));

        let err = Validated::<StatusChange>::from_request(put(Body::from("{}"), false), &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    const RULES: &[Rule] = &[
        Rule::new("name", Check::NotBlank, "Name is required"),
        Rule::new("email", Check::Email, "Please provide a valid email"),
        Rule::new("password", Check::MinLength(6), "Password must be at least 6 characters"),
    ];

    #[test]
    fn test_valid_body_passes() {
        let body = json!({ "name": "Ada", "email": "ada@example.com", "password": "secret1" });
        assert!(validate(&body, RULES).is_ok());
    }

    #[test]
    fn test_failures_preserve_rule_order() {
        let body = json!({ "name": "   ", "email": "nope", "password": "123" });
        let errors = validate(&body, RULES).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "password"]);
        assert_eq!(errors[2].message, "Password must be at least 6 characters");
    }

    #[test]
    fn test_missing_and_non_string_fields_fail() {
        let body = json!({ "name": 42 });
        let errors = validate(&body, RULES).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_not_empty_accepts_whitespace() {
        assert!(Check::NotEmpty.passes(Some(&json!(" "))));
        assert!(!Check::NotBlank.passes(Some(&json!(" "))));
        assert!(!Check::NotEmpty.passes(Some(&json!(""))));
    }

    #[test]
    fn test_min_length_counts_characters() {
        assert!(Check::MinLength(6).passes(Some(&json!("ééééé é"))));
        assert!(!Check::MinLength(6).passes(Some(&json!("abcde"))));
    }

    #[test]
    fn test_is_email() {
        assert!(is_email("user@example.com"));
        assert!(is_email("first.last-name@mail.example.co"));
        assert!(is_email("a+tag@example.io"));
        assert!(!is_email("userexample.com"));
        assert!(!is_email("user@example"));
        assert!(!is_email("user@@example.com"));
        assert!(!is_email(".user@example.com"));
        assert!(!is_email("user@example.c"));
        assert!(!is_email("user@-example.com"));
    }

    #[test]
    fn test_is_email_accepts_atext_local_parts() {
        assert!(is_email("o'brien@example.com"));
        assert!(is_email("user_name!x@example.org"));
        assert!(Check::Email.passes(Some(&json!(" o'brien@example.com "))));
        assert!(!is_email("o brien@example.com"));
        assert!(!is_email("user..dots@example.com"));
    }
}
