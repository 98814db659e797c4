//! Database module
//!
//! The process-wide store handle and connection utilities.
//!
//! The store is either a Postgres pool or a process-local in-memory map set
//! (development without a database, and tests). The handle is cheap to clone
//! and is shared through router state.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Contact, FinanceMethod, User};
use crate::error::{AppError, AppResult};

/// In-memory collections, one map per resource
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub(crate) users: RwLock<HashMap<Uuid, User>>,
    pub(crate) contacts: RwLock<HashMap<Uuid, Contact>>,
    pub(crate) finance_methods: RwLock<HashMap<Uuid, FinanceMethod>>,
}

/// Shared store handle
#[derive(Debug, Clone)]
pub enum Store {
    Postgres(PgPool),
    Memory(Arc<MemoryStore>),
}

impl Store {
    /// Fresh, empty in-memory store
    pub fn memory() -> Self {
        Store::Memory(Arc::new(MemoryStore::default()))
    }

    /// Open a Postgres pool and verify it answers
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        verify_connection(&pool).await?;

        Ok(Store::Postgres(pool))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Postgres(_) => "postgres",
            Store::Memory(_) => "memory",
        }
    }

    /// Release the underlying connections
    pub async fn close(&self) {
        if let Store::Postgres(pool) = self {
            pool.close().await;
        }
    }
}

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> AppResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| AppError::Internal("In-memory store lock poisoned".to_string()))
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> AppResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| AppError::Internal("In-memory store lock poisoned".to_string()))
}

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Tables created by `migrations/0001_init.sql`
const REQUIRED_TABLES: &[&str] = &["users", "contacts", "finance_methods"];

/// Check if required tables exist. The in-memory store always passes.
pub async fn check_schema(store: &Store) -> Result<bool, sqlx::Error> {
    let pool = match store {
        Store::Postgres(pool) => pool,
        Store::Memory(_) => return Ok(true),
    };

    for table in REQUIRED_TABLES {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_passes_schema_check() {
        let store = Store::memory();
        assert_eq!(store.backend_name(), "memory");
        assert!(check_schema(&store).await.unwrap());
        store.close().await;
    }

    #[test]
    fn test_memory_store_clones_share_data() {
        let store = Store::memory();
        let clone = store.clone();
        match (&store, &clone) {
            (Store::Memory(a), Store::Memory(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("expected memory stores"),
        }
    }
}
