//! Core data models
//!
//! Amounts are stored as signed integers in milliunits (thousandths of the
//! major currency unit): positive is income, negative is expense. Integers
//! keep the arithmetic exact; floats never touch a stored amount.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Milliunits per major currency unit
pub const AMOUNT_SCALE: i64 = 1000;

/// A financial account owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: i64,
    /// Display name (e.g., "Checking", "Credit Card")
    pub name: String,
    /// Owning user, as resolved by the identity provider
    pub user_id: String,
}

/// A spending category owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub user_id: String,
}

/// A single ledger entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: i64,
    /// Signed amount in milliunits
    pub amount: i64,
    pub date: NaiveDate,
    pub payee: String,
    pub notes: Option<String>,
    /// Owning account; deleting the account deletes the transaction
    pub account_id: i64,
    /// Optional category; deleting the category leaves the transaction
    pub category_id: Option<i64>,
}

impl Transaction {
    /// Whether this entry counts toward income
    pub fn is_income(&self) -> bool {
        self.amount >= 0
    }

    /// Whether this entry counts toward expenses
    pub fn is_expense(&self) -> bool {
        self.amount < 0
    }

    /// Amount in major units, for display only
    pub fn amount_major(&self) -> f64 {
        self.amount as f64 / AMOUNT_SCALE as f64
    }
}

/// Payload for creating a transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionDraft {
    pub amount: i64,
    pub date: NaiveDate,
    pub payee: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub account_id: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Partial update for a transaction; absent fields are left unchanged.
/// For the nullable fields the outer `Option` distinguishes "absent" from
/// an explicit null: `{"notes": null}` clears the note and
/// `{"category_id": null}` detaches the category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionUpdate {
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub payee: Option<String>,
    #[serde(default, deserialize_with = "some_or_null")]
    pub notes: Option<Option<String>>,
    #[serde(default)]
    pub account_id: Option<i64>,
    #[serde(default, deserialize_with = "some_or_null")]
    pub category_id: Option<Option<i64>>,
}

/// Wrap a present field so that JSON null arrives as `Some(None)` while an
/// absent field stays `None` via the serde default
fn some_or_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ==================== Tests ====================
