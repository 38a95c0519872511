//! Dashboard summary computation
//!
//! The store supplies raw per-period and per-group sums; this module turns
//! them into the single snapshot the dashboard cards and charts consume.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::period::Period;

/// Label for expense rows that carry no category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Number of categories reported before truncation
pub const TOP_CATEGORIES: usize = 4;

/// Income/expense totals for one period, in milliunits.
/// Expenses are reported as a positive magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    pub income: i64,
    pub expenses: i64,
}

impl PeriodTotals {
    /// Net remaining: the signed sum of the period
    pub fn remaining(&self) -> i64 {
        self.income - self.expenses
    }
}

/// One day of the gap-filled series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub income: i64,
    pub expenses: i64,
}

/// One slice of the category breakdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryTotal {
    pub name: String,
    /// Absolute spend in milliunits
    pub value: i64,
}

/// Full dashboard snapshot returned by the summary endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub income: i64,
    pub income_change: f64,
    pub expenses: i64,
    pub expenses_change: f64,
    pub remaining: i64,
    pub remaining_change: f64,
    pub categories: Vec<CategoryTotal>,
    pub days: Vec<DailyTotals>,
}

/// Percentage change between two period figures.
///
/// A zero previous period reports 0 when the current one is also zero,
/// otherwise a flat 100 regardless of magnitude.
pub fn percent_change(previous: i64, current: i64) -> f64 {
    if previous == 0 {
        if current == 0 {
            0.0
        } else {
            100.0
        }
    } else {
        (current - previous) as f64 / previous as f64 * 100.0
    }
}

/// Fill every date of the period, zeroing days without activity.
/// Charts assume continuous x-axis coverage.
pub fn fill_daily_series(period: &Period, rows: Vec<DailyTotals>) -> Vec<DailyTotals> {
    let by_date: HashMap<NaiveDate, DailyTotals> =
        rows.into_iter().map(|row| (row.date, row)).collect();

    period
        .dates()
        .map(|date| {
            by_date.get(&date).cloned().unwrap_or(DailyTotals {
                date,
                income: 0,
                expenses: 0,
            })
        })
        .collect()
}

/// Sort descending by absolute spend and cap the list
pub fn top_categories(mut rows: Vec<CategoryTotal>) -> Vec<CategoryTotal> {
    rows.sort_by(|a, b| b.value.cmp(&a.value));
    rows.truncate(TOP_CATEGORIES);
    rows
}

/// Assemble the snapshot from the raw aggregates of both windows
pub fn build_report(
    period: &Period,
    current: PeriodTotals,
    previous: PeriodTotals,
    daily_rows: Vec<DailyTotals>,
    category_rows: Vec<CategoryTotal>,
) -> SummaryReport {
    SummaryReport {
        income: current.income,
        income_change: percent_change(previous.income, current.income),
        expenses: current.expenses,
        expenses_change: percent_change(previous.expenses, current.expenses),
        remaining: current.remaining(),
        remaining_change: percent_change(previous.remaining(), current.remaining()),
        categories: top_categories(category_rows),
        days: fill_daily_series(period, daily_rows),
    }
}

// ==================== Tests ====================
