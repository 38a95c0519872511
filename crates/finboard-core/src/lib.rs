//! Core domain logic for finboard
//!
//! Models, period arithmetic, summary computation and CSV import mapping.
//! Everything here is pure: no I/O, no database, no HTTP.

pub mod error;
pub mod import;
pub mod models;
pub mod period;
pub mod summary;

pub use error::{CoreError, ErrorCode};
pub use models::{Account, Category, Transaction, TransactionDraft, TransactionUpdate};
pub use period::Period;
pub use summary::{CategoryTotal, DailyTotals, PeriodTotals, SummaryReport};
