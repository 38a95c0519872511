//! Route modules for the API server
//!
//! One module per resource group:
//! - accounts, categories: reference-data CRUD
//! - transactions: ledger CRUD, bulk operations, CSV import
//! - summary: aggregated dashboard snapshot

pub mod accounts;
pub mod categories;
pub mod summary;
pub mod transactions;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};

/// Body for create/rename of accounts and categories
#[derive(Debug, Deserialize)]
pub struct NamePayload {
    pub name: String,
}

impl NamePayload {
    /// Trimmed name, rejecting blank input at the boundary
    pub fn validated(&self) -> ApiResult<&str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::BadRequest {
                message: "name is required".to_string(),
            });
        }
        Ok(name)
    }
}

/// Body for bulk-delete endpoints
#[derive(Debug, Deserialize)]
pub struct BulkDeletePayload {
    pub ids: Vec<i64>,
}

/// Parse an optional ISO date query parameter, rejecting malformed input
pub(crate) fn parse_date_param(
    value: Option<&str>,
    name: &'static str,
) -> ApiResult<Option<NaiveDate>> {
    match value {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ApiError::BadRequest {
                message: format!("invalid date for '{}': {}", name, raw),
            }),
    }
}
