//! Finance-method persistence

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::{read_lock, write_lock, Store};
use crate::domain::{Author, FinanceMethod, FinanceMethodFilter, FinanceMethodView, User};
use crate::error::AppResult;

#[derive(Debug, sqlx::FromRow)]
struct FinanceMethodRow {
    id: Uuid,
    title: String,
    description: String,
    category: String,
    methodology: String,
    benefits: Vec<String>,
    image_url: String,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FinanceMethodRow> for FinanceMethod {
    fn from(row: FinanceMethodRow) -> Self {
        FinanceMethod {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            methodology: row.methodology,
            benefits: row.benefits,
            image_url: row.image_url,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Article row joined with its author's public fields
#[derive(Debug, sqlx::FromRow)]
struct FinanceMethodViewRow {
    #[sqlx(flatten)]
    method: FinanceMethodRow,
    author_id: Option<Uuid>,
    author_name: Option<String>,
    author_email: Option<String>,
}

impl From<FinanceMethodViewRow> for FinanceMethodView {
    fn from(row: FinanceMethodViewRow) -> Self {
        let author = match (row.author_id, row.author_name, row.author_email) {
            (Some(id), Some(name), Some(email)) => Some(Author { id, name, email }),
            _ => None,
        };
        FinanceMethodView::new(row.method.into(), author)
    }
}

const SELECT_METHOD: &str = r#"
    SELECT id, title, description, category, methodology, benefits, image_url,
           created_by, created_at, updated_at
    FROM finance_methods
"#;

const SELECT_METHOD_VIEW: &str = r#"
    SELECT f.id, f.title, f.description, f.category, f.methodology, f.benefits,
           f.image_url, f.created_by, f.created_at, f.updated_at,
           u.id AS author_id, u.name AS author_name, u.email AS author_email
    FROM finance_methods f
    LEFT JOIN users u ON u.id = f.created_by
"#;

/// Escape LIKE metacharacters so `search` is matched literally
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn author_of(users: &HashMap<Uuid, User>, method: &FinanceMethod) -> Option<Author> {
    method
        .created_by
        .and_then(|id| users.get(&id))
        .map(|u| Author {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
        })
}

#[derive(Debug, Clone)]
pub struct FinanceMethodRepository {
    store: Store,
}

impl FinanceMethodRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn insert(&self, method: &FinanceMethod) -> AppResult<()> {
        match &self.store {
            Store::Postgres(pool) => {
                sqlx::query(
                    r#"
                    INSERT INTO finance_methods (id, title, description, category,
                                                 methodology, benefits, image_url,
                                                 created_by, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    "#,
                )
                .bind(method.id)
                .bind(&method.title)
                .bind(&method.description)
                .bind(&method.category)
                .bind(&method.methodology)
                .bind(&method.benefits)
                .bind(&method.image_url)
                .bind(method.created_by)
                .bind(method.created_at)
                .bind(method.updated_at)
                .execute(pool)
                .await?;
                Ok(())
            }
            Store::Memory(mem) => {
                write_lock(&mem.finance_methods)?.insert(method.id, method.clone());
                Ok(())
            }
        }
    }

    /// Matching articles with authors expanded, newest first
    pub async fn list(&self, filter: &FinanceMethodFilter) -> AppResult<Vec<FinanceMethodView>> {
        match &self.store {
            Store::Postgres(pool) => {
                let mut query = QueryBuilder::<Postgres>::new(SELECT_METHOD_VIEW);
                query.push(" WHERE TRUE");
                if let Some(category) = &filter.category {
                    query.push(" AND f.category = ").push_bind(category.clone());
                }
                if let Some(search) = &filter.search {
                    let pattern = like_pattern(search);
                    query
                        .push(" AND (f.title ILIKE ")
                        .push_bind(pattern.clone())
                        .push(" OR f.description ILIKE ")
                        .push_bind(pattern.clone())
                        .push(" OR f.category ILIKE ")
                        .push_bind(pattern)
                        .push(")");
                }
                query.push(" ORDER BY f.created_at DESC, f.id DESC");

                let rows: Vec<FinanceMethodViewRow> = query.build_query_as().fetch_all(pool).await?;
                Ok(rows.into_iter().map(FinanceMethodView::from).collect())
            }
            Store::Memory(mem) => {
                let methods = read_lock(&mem.finance_methods)?;
                let users = read_lock(&mem.users)?;

                let mut matches: Vec<&FinanceMethod> =
                    methods.values().filter(|m| filter.matches(m)).collect();
                matches.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

                Ok(matches
                    .into_iter()
                    .map(|m| FinanceMethodView::new(m.clone(), author_of(&users, m)))
                    .collect())
            }
        }
    }

    /// Single article with its author expanded
    pub async fn find_view(&self, id: Uuid) -> AppResult<Option<FinanceMethodView>> {
        match &self.store {
            Store::Postgres(pool) => {
                let row: Option<FinanceMethodViewRow> =
                    sqlx::query_as(&format!("{} WHERE f.id = $1", SELECT_METHOD_VIEW))
                        .bind(id)
                        .fetch_optional(pool)
                        .await?;
                Ok(row.map(FinanceMethodView::from))
            }
            Store::Memory(mem) => {
                let methods = read_lock(&mem.finance_methods)?;
                let users = read_lock(&mem.users)?;

                Ok(methods
                    .get(&id)
                    .map(|m| FinanceMethodView::new(m.clone(), author_of(&users, m))))
            }
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FinanceMethod>> {
        match &self.store {
            Store::Postgres(pool) => {
                let row: Option<FinanceMethodRow> =
                    sqlx::query_as(&format!("{} WHERE id = $1", SELECT_METHOD))
                        .bind(id)
                        .fetch_optional(pool)
                        .await?;
                Ok(row.map(FinanceMethod::from))
            }
            Store::Memory(mem) => Ok(read_lock(&mem.finance_methods)?.get(&id).cloned()),
        }
    }

    /// Persist the editable fields. Returns false when the record no longer exists.
    pub async fn update(&self, method: &FinanceMethod) -> AppResult<bool> {
        match &self.store {
            Store::Postgres(pool) => {
                let result = sqlx::query(
                    r#"
                    UPDATE finance_methods
                    SET title = $2, description = $3, category = $4, methodology = $5,
                        benefits = $6, image_url = $7, updated_at = $8
                    WHERE id = $1
                    "#,
                )
                .bind(method.id)
                .bind(&method.title)
                .bind(&method.description)
                .bind(&method.category)
                .bind(&method.methodology)
                .bind(&method.benefits)
                .bind(&method.image_url)
                .bind(method.updated_at)
                .execute(pool)
                .await?;
                Ok(result.rows_affected() > 0)
            }
            Store::Memory(mem) => {
                let mut methods = write_lock(&mem.finance_methods)?;
                match methods.get_mut(&method.id) {
                    Some(stored) => {
                        *stored = method.clone();
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
        }
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        match &self.store {
            Store::Postgres(pool) => {
                let result = sqlx::query("DELETE FROM finance_methods WHERE id = $1")
                    .bind(id)
                    .execute(pool)
                    .await?;
                Ok(result.rows_affected() > 0)
            }
            Store::Memory(mem) => Ok(write_lock(&mem.finance_methods)?.remove(&id).is_some()),
        }
    }

    pub async fn delete_all(&self) -> AppResult<u64> {
        match &self.store {
            Store::Postgres(pool) => {
                let result = sqlx::query("DELETE FROM finance_methods").execute(pool).await?;
                Ok(result.rows_affected())
            }
            Store::Memory(mem) => {
                let mut methods = write_lock(&mem.finance_methods)?;
                let removed = methods.len() as u64;
                methods.clear();
                Ok(removed)
            }
        }
    }
}
