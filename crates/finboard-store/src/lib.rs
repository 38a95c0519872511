//! SQLite persistence for finboard
//!
//! Query modules:
//! - accounts: account CRUD
//! - categories: category CRUD
//! - transactions: ledger CRUD, bulk operations, import
//! - summary: read-only aggregation queries
//!
//! Every query that touches transactions joins through the owning account's
//! user id. That join is the ownership boundary; no query variant may drop
//! it.

pub mod accounts;
pub mod categories;
pub mod error;
pub mod summary;
pub mod transactions;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

pub use error::{StoreError, StoreResult};

/// Shared handle to the database pool
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open a pool against the given SQLite url and apply pending migrations.
    /// Foreign keys are enabled on every connection; the cascade and nullify
    /// rules in the schema depend on it.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        log::debug!("store connected: {}", url);

        Ok(Self { pool })
    }

    /// Fresh in-memory store, for tests. Pinned to a single connection so
    /// the database outlives individual checkouts.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// The underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
