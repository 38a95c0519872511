//! Error types for finboard-core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// CSV could not be parsed at all
    InvalidCsv,
    /// Column mapping is missing a required field
    MappingIncomplete,
    /// A CSV row failed to parse
    InvalidRow,
    /// Payload failed validation
    ValidationError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::InvalidCsv => write!(f, "INVALID_CSV"),
            ErrorCode::MappingIncomplete => write!(f, "MAPPING_INCOMPLETE"),
            ErrorCode::InvalidRow => write!(f, "INVALID_ROW"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
        }
    }
}

/// Main error type for finboard-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid CSV: {message}")]
    InvalidCsv { message: String },

    #[error("Column mapping incomplete: missing {missing}")]
    MappingIncomplete { missing: String },

    #[error("Row {row}: invalid {field}: {message}")]
    InvalidRow {
        row: usize,
        field: &'static str,
        message: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::InvalidCsv { .. } => ErrorCode::InvalidCsv,
            CoreError::MappingIncomplete { .. } => ErrorCode::MappingIncomplete,
            CoreError::InvalidRow { .. } => ErrorCode::InvalidRow,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

// ==================== Tests ====================
