//! Aggregation queries feeding the dashboard summary
//!
//! All three queries are read-only, window-bounded, and scoped through the
//! account-ownership join. Income buckets non-negative amounts; expenses
//! bucket negative amounts, reported as positive magnitudes.

use chrono::NaiveDate;
use finboard_core::summary::{CategoryTotal, DailyTotals, PeriodTotals, UNCATEGORIZED};
use finboard_core::Period;

use crate::{Store, StoreResult};

impl Store {
    /// Income and expense totals over one window, in milliunits
    pub async fn period_totals(
        &self,
        user_id: &str,
        account_id: Option<i64>,
        period: &Period,
    ) -> StoreResult<PeriodTotals> {
        let (income, expenses) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT \
                 COALESCE(SUM(CASE WHEN t.amount >= 0 THEN t.amount ELSE 0 END), 0), \
                 COALESCE(SUM(CASE WHEN t.amount < 0 THEN -t.amount ELSE 0 END), 0) \
             FROM transactions t \
             JOIN accounts a ON a.id = t.account_id \
             WHERE a.user_id = ? AND t.date BETWEEN ? AND ? \
               AND (? IS NULL OR t.account_id = ?)",
        )
        .bind(user_id)
        .bind(period.start)
        .bind(period.end)
        .bind(account_id)
        .bind(account_id)
        .fetch_one(self.pool())
        .await?;

        Ok(PeriodTotals { income, expenses })
    }

    /// Per-day income/expense sums inside the window, ordered by date.
    /// Days without activity are absent here; the caller gap-fills.
    pub async fn daily_totals(
        &self,
        user_id: &str,
        account_id: Option<i64>,
        period: &Period,
    ) -> StoreResult<Vec<DailyTotals>> {
        let rows = sqlx::query_as::<_, (NaiveDate, i64, i64)>(
            "SELECT \
                 t.date, \
                 COALESCE(SUM(CASE WHEN t.amount >= 0 THEN t.amount ELSE 0 END), 0), \
                 COALESCE(SUM(CASE WHEN t.amount < 0 THEN -t.amount ELSE 0 END), 0) \
             FROM transactions t \
             JOIN accounts a ON a.id = t.account_id \
             WHERE a.user_id = ? AND t.date BETWEEN ? AND ? \
               AND (? IS NULL OR t.account_id = ?) \
             GROUP BY t.date \
             ORDER BY t.date",
        )
        .bind(user_id)
        .bind(period.start)
        .bind(period.end)
        .bind(account_id)
        .bind(account_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(date, income, expenses)| DailyTotals {
                date,
                income,
                expenses,
            })
            .collect())
    }

    /// Absolute spend per category name over the window, expense rows only,
    /// largest first. Categoryless rows land under the sentinel label.
    pub async fn category_spend(
        &self,
        user_id: &str,
        account_id: Option<i64>,
        period: &Period,
    ) -> StoreResult<Vec<CategoryTotal>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT \
                 COALESCE(c.name, ?) AS name, \
                 SUM(-t.amount) AS value \
             FROM transactions t \
             JOIN accounts a ON a.id = t.account_id \
             LEFT JOIN categories c ON c.id = t.category_id \
             WHERE a.user_id = ? AND t.amount < 0 AND t.date BETWEEN ? AND ? \
               AND (? IS NULL OR t.account_id = ?) \
             GROUP BY 1 \
             ORDER BY 2 DESC",
        )
        .bind(UNCATEGORIZED)
        .bind(user_id)
        .bind(period.start)
        .bind(period.end)
        .bind(account_id)
        .bind(account_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(name, value)| CategoryTotal { name, value })
            .collect())
    }
}

// ==================== Tests ====================
