//! Reporting period arithmetic
//!
//! A period is an inclusive [start, end] date window. The previous period is
//! the immediately preceding window of identical length, ending the day
//! before the current one begins.

use chrono::{Duration, NaiveDate, Utc};

/// Days looked back from today when no explicit window is given
const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// An inclusive date window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// Create a period, swapping the endpoints if they arrive inverted
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start > end {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// Resolve the effective window from optional bounds. Defaults to a
    /// trailing window ending today.
    pub fn resolve(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        let end = to.unwrap_or_else(|| Utc::now().date_naive());
        let start = from.unwrap_or(end - Duration::days(DEFAULT_LOOKBACK_DAYS));
        Self::new(start, end)
    }

    /// Inclusive length of the window in days
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The immediately preceding window of identical length
    pub fn previous(&self) -> Self {
        let shift = Duration::days(self.days());
        Self {
            start: self.start - shift,
            end: self.end - shift,
        }
    }

    /// Check if a date falls within the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterate every calendar date in the window, in order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

// ==================== Tests ====================
