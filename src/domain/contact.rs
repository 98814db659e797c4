//! Contact inquiries

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UnknownVariant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InquiryType {
    #[default]
    General,
    Support,
    Feedback,
}

impl InquiryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryType::General => "General",
            InquiryType::Support => "Support",
            InquiryType::Feedback => "Feedback",
        }
    }
}

impl fmt::Display for InquiryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InquiryType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "General" => Ok(InquiryType::General),
            "Support" => Ok(InquiryType::Support),
            "Feedback" => Ok(InquiryType::Feedback),
            other => Err(UnknownVariant {
                field: "inquiryType",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Pending,
    Resolved,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::Pending => "pending",
            ContactStatus::Resolved => "resolved",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ContactStatus::Pending),
            "resolved" => Ok(ContactStatus::Resolved),
            other => Err(UnknownVariant {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Stored contact inquiry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub inquiry_type: InquiryType,
    pub status: ContactStatus,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted from a public submission
#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub inquiry_type: InquiryType,
}

impl Contact {
    /// New inquiries always start out pending and unresolved.
    pub fn create(new: NewContact, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: new.name.trim().to_string(),
            email: new.email.trim().to_string(),
            subject: new.subject.trim().to_string(),
            message: new.message.trim().to_string(),
            inquiry_type: new.inquiry_type,
            status: ContactStatus::Pending,
            resolved_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a status change. `None` keeps the current status; setting
    /// `Resolved` (again or for the first time) stamps `resolved_at`.
    pub fn apply_status(&mut self, status: Option<ContactStatus>, now: DateTime<Utc>) {
        if let Some(status) = status {
            self.status = status;
            if status == ContactStatus::Resolved {
                self.resolved_at = Some(now);
            }
        }
        self.updated_at = now;
    }
}

/// Exact-match filters for listing inquiries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub status: Option<ContactStatus>,
    pub inquiry_type: Option<InquiryType>,
}

impl ContactFilter {
    pub fn matches(&self, contact: &Contact) -> bool {
        self.status.map_or(true, |s| contact.status == s)
            && self.inquiry_type.map_or(true, |t| contact.inquiry_type == t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_contact() -> NewContact {
        NewContact {
            name: " Grace ".to_string(),
            email: "grace@example.com".to_string(),
            subject: "Budget help".to_string(),
            message: "How do I start?".to_string(),
            inquiry_type: InquiryType::default(),
        }
    }

    #[test]
    fn test_new_contact_is_pending_and_unresolved() {
        let contact = Contact::create(new_contact(), Utc::now());
        assert_eq!(contact.status, ContactStatus::Pending);
        assert_eq!(contact.inquiry_type, InquiryType::General);
        assert!(contact.resolved_at.is_none());
        assert_eq!(contact.name, "Grace");
    }

    #[test]
    fn test_resolving_sets_resolved_at() {
        let created = Utc::now();
        let mut contact = Contact::create(new_contact(), created);
        let later = created + Duration::minutes(5);

        contact.apply_status(Some(ContactStatus::Resolved), later);
        assert_eq!(contact.status, ContactStatus::Resolved);
        assert_eq!(contact.resolved_at, Some(later));
        assert_eq!(contact.updated_at, later);
    }

    #[test]
    fn test_pending_never_sets_resolved_at() {
        let mut contact = Contact::create(new_contact(), Utc::now());
        contact.apply_status(Some(ContactStatus::Pending), Utc::now());
        assert!(contact.resolved_at.is_none());
    }

    #[test]
    fn test_missing_status_keeps_current() {
        let mut contact = Contact::create(new_contact(), Utc::now());
        contact.apply_status(Some(ContactStatus::Resolved), Utc::now());
        let resolved_at = contact.resolved_at;

        contact.apply_status(None, Utc::now());
        assert_eq!(contact.status, ContactStatus::Resolved);
        assert_eq!(contact.resolved_at, resolved_at);
    }

    #[test]
    fn test_serialized_field_names() {
        let contact = Contact::create(new_contact(), Utc::now());
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["inquiryType"], "General");
        assert_eq!(json["status"], "pending");
        assert!(json["resolvedAt"].is_null());
    }

    #[test]
    fn test_filter() {
        let mut contact = Contact::create(new_contact(), Utc::now());
        let pending = ContactFilter {
            status: Some(ContactStatus::Pending),
            inquiry_type: None,
        };
        assert!(pending.matches(&contact));
        contact.apply_status(Some(ContactStatus::Resolved), Utc::now());
        assert!(!pending.matches(&contact));
        assert!(ContactFilter::default().matches(&contact));
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!("Support".parse::<InquiryType>().unwrap(), InquiryType::Support);
        assert!("support".parse::<InquiryType>().is_err());
        assert_eq!("resolved".parse::<ContactStatus>().unwrap(), ContactStatus::Resolved);
        assert!("closed".parse::<ContactStatus>().is_err());
    }
}
