//! User persistence

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::{read_lock, write_lock, Store};
use crate::domain::{Role, User};
use crate::error::{AppError, AppResult};

use super::is_unique_violation;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: row
                .role
                .parse::<Role>()
                .map_err(|e| AppError::Internal(e.to_string()))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_USER: &str = r#"
    SELECT id, name, email, password_hash, role, created_at, updated_at
    FROM users
"#;

#[derive(Debug, Clone)]
pub struct UserRepository {
    store: Store,
}

impl UserRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        match &self.store {
            Store::Postgres(pool) => {
                let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_USER))
                    .bind(id)
                    .fetch_optional(pool)
                    .await?;
                row.map(User::try_from).transpose()
            }
            Store::Memory(mem) => Ok(read_lock(&mem.users)?.get(&id).cloned()),
        }
    }

    /// Lookup by (already normalized) email
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        match &self.store {
            Store::Postgres(pool) => {
                let row: Option<UserRow> =
                    sqlx::query_as(&format!("{} WHERE email = $1", SELECT_USER))
                        .bind(email)
                        .fetch_optional(pool)
                        .await?;
                row.map(User::try_from).transpose()
            }
            Store::Memory(mem) => Ok(read_lock(&mem.users)?
                .values()
                .find(|u| u.email == email)
                .cloned()),
        }
    }

    /// Insert a new user. A taken email is reported as a client error.
    pub async fn insert(&self, user: &User) -> AppResult<()> {
        match &self.store {
            Store::Postgres(pool) => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(user.id)
                .bind(&user.name)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(user.role.as_str())
                .bind(user.created_at)
                .bind(user.updated_at)
                .execute(pool)
                .await;

                match result {
                    Ok(_) => Ok(()),
                    Err(e) if is_unique_violation(&e) => Err(user_exists()),
                    Err(e) => Err(e.into()),
                }
            }
            Store::Memory(mem) => {
                let mut users = write_lock(&mem.users)?;
                if users.values().any(|u| u.email == user.email) {
                    return Err(user_exists());
                }
                users.insert(user.id, user.clone());
                Ok(())
            }
        }
    }

    /// Remove every user, returning how many were removed
    pub async fn delete_all(&self) -> AppResult<u64> {
        match &self.store {
            Store::Postgres(pool) => {
                let result = sqlx::query("DELETE FROM users").execute(pool).await?;
                Ok(result.rows_affected())
            }
            Store::Memory(mem) => {
                let mut users = write_lock(&mem.users)?;
                let removed = users.len() as u64;
                users.clear();
                Ok(removed)
            }
        }
    }
}

fn user_exists() -> AppError {
    AppError::InvalidRequest("User already exists".to_string())
}
