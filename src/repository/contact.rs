//! Contact inquiry persistence

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::{read_lock, write_lock, Store};
use crate::domain::{Contact, ContactFilter, ContactStatus, InquiryType};
use crate::error::{AppError, AppResult};

#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id: Uuid,
    name: String,
    email: String,
    subject: String,
    message: String,
    inquiry_type: String,
    status: String,
    resolved_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for Contact {
    type Error = AppError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        Ok(Contact {
            id: row.id,
            name: row.name,
            email: row.email,
            subject: row.subject,
            message: row.message,
            inquiry_type: row
                .inquiry_type
                .parse::<InquiryType>()
                .map_err(|e| AppError::Internal(e.to_string()))?,
            status: row
                .status
                .parse::<ContactStatus>()
                .map_err(|e| AppError::Internal(e.to_string()))?,
            resolved_at: row.resolved_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_CONTACT: &str = r#"
    SELECT id, name, email, subject, message, inquiry_type, status,
           resolved_at, created_at, updated_at
    FROM contacts
"#;

#[derive(Debug, Clone)]
pub struct ContactRepository {
    store: Store,
}

impl ContactRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn insert(&self, contact: &Contact) -> AppResult<()> {
        match &self.store {
            Store::Postgres(pool) => {
                sqlx::query(
                    r#"
                    INSERT INTO contacts (id, name, email, subject, message, inquiry_type,
                                          status, resolved_at, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    "#,
                )
                .bind(contact.id)
                .bind(&contact.name)
                .bind(&contact.email)
                .bind(&contact.subject)
                .bind(&contact.message)
                .bind(contact.inquiry_type.as_str())
                .bind(contact.status.as_str())
                .bind(contact.resolved_at)
                .bind(contact.created_at)
                .bind(contact.updated_at)
                .execute(pool)
                .await?;
                Ok(())
            }
            Store::Memory(mem) => {
                write_lock(&mem.contacts)?.insert(contact.id, contact.clone());
                Ok(())
            }
        }
    }

    /// All matching inquiries, newest first
    pub async fn list(&self, filter: &ContactFilter) -> AppResult<Vec<Contact>> {
        match &self.store {
            Store::Postgres(pool) => {
                let mut query = QueryBuilder::<Postgres>::new(SELECT_CONTACT);
                query.push(" WHERE TRUE");
                if let Some(status) = filter.status {
                    query.push(" AND status = ").push_bind(status.as_str());
                }
                if let Some(inquiry_type) = filter.inquiry_type {
                    query.push(" AND inquiry_type = ").push_bind(inquiry_type.as_str());
                }
                query.push(" ORDER BY created_at DESC, id DESC");

                let rows: Vec<ContactRow> = query.build_query_as().fetch_all(pool).await?;
                rows.into_iter().map(Contact::try_from).collect()
            }
            Store::Memory(mem) => {
                let contacts = read_lock(&mem.contacts)?;
                let mut matches: Vec<Contact> = contacts
                    .values()
                    .filter(|c| filter.matches(c))
                    .cloned()
                    .collect();
                matches.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
                Ok(matches)
            }
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Contact>> {
        match &self.store {
            Store::Postgres(pool) => {
                let row: Option<ContactRow> =
                    sqlx::query_as(&format!("{} WHERE id = $1", SELECT_CONTACT))
                        .bind(id)
                        .fetch_optional(pool)
                        .await?;
                row.map(Contact::try_from).transpose()
            }
            Store::Memory(mem) => Ok(read_lock(&mem.contacts)?.get(&id).cloned()),
        }
    }

    /// Persist the mutable fields of an existing inquiry.
    /// Returns false when the record no longer exists.
    pub async fn update(&self, contact: &Contact) -> AppResult<bool> {
        match &self.store {
            Store::Postgres(pool) => {
                let result = sqlx::query(
                    r#"
                    UPDATE contacts
                    SET status = $2, resolved_at = $3, updated_at = $4
                    WHERE id = $1
                    "#,
                )
                .bind(contact.id)
                .bind(contact.status.as_str())
                .bind(contact.resolved_at)
                .bind(contact.updated_at)
                .execute(pool)
                .await?;
                Ok(result.rows_affected() > 0)
            }
            Store::Memory(mem) => {
                let mut contacts = write_lock(&mem.contacts)?;
                match contacts.get_mut(&contact.id) {
                    Some(stored) => {
                        *stored = contact.clone();
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
        }
    }

    /// Returns false when nothing was deleted
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        match &self.store {
            Store::Postgres(pool) => {
                let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
                    .bind(id)
                    .execute(pool)
                    .await?;
                Ok(result.rows_affected() > 0)
            }
            Store::Memory(mem) => Ok(write_lock(&mem.contacts)?.remove(&id).is_some()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewContact;
    use chrono::Duration;

    fn contact(subject: &str, inquiry_type: InquiryType, at: DateTime<Utc>) -> Contact {
        Contact::create(
            NewContact {
                name: "Grace".to_string(),
                email: "grace@example.com".to_string(),
                subject: subject.to_string(),
                message: "Hello".to_string(),
                inquiry_type,
            },
            at,
        )
    }

    #[tokio::test]
    async fn test_list_newest_first_with_filters() {
        let repo = ContactRepository::new(Store::memory());
        let base = Utc::now();
        let older = contact("older", InquiryType::General, base);
        let newer = contact("newer", InquiryType::Support, base + Duration::seconds(1));
        repo.insert(&older).await.unwrap();
        repo.insert(&newer).await.unwrap();

        let all = repo.list(&ContactFilter::default()).await.unwrap();
        let subjects: Vec<&str> = all.iter().map(|c| c.subject.as_str()).collect();
        assert_eq!(subjects, vec!["newer", "older"]);

        let support = repo
            .list(&ContactFilter {
                status: None,
                inquiry_type: Some(InquiryType::Support),
            })
            .await
            .unwrap();
        assert_eq!(support.len(), 1);
        assert_eq!(support[0].id, newer.id);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = ContactRepository::new(Store::memory());
        let mut stored = contact("help", InquiryType::General, Utc::now());
        repo.insert(&stored).await.unwrap();

        stored.apply_status(Some(ContactStatus::Resolved), Utc::now());
        assert!(repo.update(&stored).await.unwrap());
        let loaded = repo.find_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, ContactStatus::Resolved);
        assert!(loaded.resolved_at.is_some());

        assert!(repo.delete(stored.id).await.unwrap());
        assert!(!repo.delete(stored.id).await.unwrap());
        assert!(repo.find_by_id(stored.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_creates_nothing() {
        let repo = ContactRepository::new(Store::memory());
        let ghost = contact("ghost", InquiryType::General, Utc::now());
        assert!(!repo.update(&ghost).await.unwrap());
        assert!(repo.list(&ContactFilter::default()).await.unwrap().is_empty());
    }
}
