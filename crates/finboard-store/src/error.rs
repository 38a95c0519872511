//! Error types for finboard-store

use thiserror::Error;

/// Main error type for finboard-store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Row absent, or owned by another user. Callers cannot tell the two
    /// cases apart, so foreign records do not leak their existence.
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
