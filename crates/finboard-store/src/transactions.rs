//! Transaction queries
//!
//! Transactions carry no user id of their own; ownership flows through the
//! account. Every query here joins (or subselects) through
//! `accounts.user_id` for the caller.

use finboard_core::import::ImportRow;
use finboard_core::{Period, Transaction, TransactionDraft, TransactionUpdate};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use std::collections::HashMap;

use crate::accounts::assert_account_owned;
use crate::categories::{assert_category_owned, find_or_create_category};
use crate::{Store, StoreError, StoreResult};

const TRANSACTION_COLUMNS: &str =
    "t.id, t.amount, t.date, t.payee, t.notes, t.account_id, t.category_id";

fn transaction_from_row(row: &SqliteRow) -> Result<Transaction, sqlx::Error> {
    Ok(Transaction {
        id: row.try_get("id")?,
        amount: row.try_get("amount")?,
        date: row.try_get("date")?,
        payee: row.try_get("payee")?,
        notes: row.try_get("notes")?,
        account_id: row.try_get("account_id")?,
        category_id: row.try_get("category_id")?,
    })
}

async fn insert_transaction(
    conn: &mut SqliteConnection,
    draft: &TransactionDraft,
) -> StoreResult<Transaction> {
    let id = sqlx::query(
        "INSERT INTO transactions (amount, date, payee, notes, account_id, category_id) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(draft.amount)
    .bind(draft.date)
    .bind(&draft.payee)
    .bind(&draft.notes)
    .bind(draft.account_id)
    .bind(draft.category_id)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(Transaction {
        id,
        amount: draft.amount,
        date: draft.date,
        payee: draft.payee.clone(),
        notes: draft.notes.clone(),
        account_id: draft.account_id,
        category_id: draft.category_id,
    })
}

impl Store {
    /// List the user's transactions inside the window, newest first,
    /// optionally restricted to one account
    pub async fn list_transactions(
        &self,
        user_id: &str,
        period: &Period,
        account_id: Option<i64>,
    ) -> StoreResult<Vec<Transaction>> {
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS} \
             FROM transactions t \
             JOIN accounts a ON a.id = t.account_id \
             WHERE a.user_id = ? AND t.date BETWEEN ? AND ? \
               AND (? IS NULL OR t.account_id = ?) \
             ORDER BY t.date DESC, t.id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(period.start)
            .bind(period.end)
            .bind(account_id)
            .bind(account_id)
            .fetch_all(self.pool())
            .await?;

        let transactions = rows
            .iter()
            .map(transaction_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    pub async fn get_transaction(&self, user_id: &str, id: i64) -> StoreResult<Transaction> {
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS} \
             FROM transactions t \
             JOIN accounts a ON a.id = t.account_id \
             WHERE t.id = ? AND a.user_id = ?"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?
            .ok_or(StoreError::NotFound)?;

        Ok(transaction_from_row(&row)?)
    }

    pub async fn create_transaction(
        &self,
        user_id: &str,
        draft: &TransactionDraft,
    ) -> StoreResult<Transaction> {
        let mut tx = self.pool().begin().await?;

        assert_account_owned(&mut tx, user_id, draft.account_id).await?;
        if let Some(category_id) = draft.category_id {
            assert_category_owned(&mut tx, user_id, category_id).await?;
        }

        let created = insert_transaction(&mut tx, draft).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// Apply a partial update; absent fields keep their stored values
    pub async fn update_transaction(
        &self,
        user_id: &str,
        id: i64,
        update: &TransactionUpdate,
    ) -> StoreResult<Transaction> {
        let existing = self.get_transaction(user_id, id).await?;

        let mut tx = self.pool().begin().await?;

        if let Some(account_id) = update.account_id {
            assert_account_owned(&mut tx, user_id, account_id).await?;
        }
        if let Some(Some(category_id)) = update.category_id {
            assert_category_owned(&mut tx, user_id, category_id).await?;
        }

        // Outer Option: absent keeps the stored value, explicit null clears
        let merged = Transaction {
            id,
            amount: update.amount.unwrap_or(existing.amount),
            date: update.date.unwrap_or(existing.date),
            payee: update.payee.clone().unwrap_or(existing.payee),
            notes: update.notes.clone().unwrap_or(existing.notes),
            account_id: update.account_id.unwrap_or(existing.account_id),
            category_id: update.category_id.unwrap_or(existing.category_id),
        };

        sqlx::query(
            "UPDATE transactions \
             SET amount = ?, date = ?, payee = ?, notes = ?, account_id = ?, category_id = ? \
             WHERE id = ?",
        )
        .bind(merged.amount)
        .bind(merged.date)
        .bind(&merged.payee)
        .bind(&merged.notes)
        .bind(merged.account_id)
        .bind(merged.category_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(merged)
    }

    pub async fn delete_transaction(&self, user_id: &str, id: i64) -> StoreResult<()> {
        let result = sqlx::query(
            "DELETE FROM transactions \
             WHERE id = ? \
               AND account_id IN (SELECT id FROM accounts WHERE user_id = ?)",
        )
        .bind(id)
        .bind(user_id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Delete many transactions at once; ids reached through another user's
    /// accounts are untouched. Returns the number of rows actually deleted.
    pub async fn bulk_delete_transactions(&self, user_id: &str, ids: &[i64]) -> StoreResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut builder = sqlx::QueryBuilder::<sqlx::Sqlite>::new(
            "DELETE FROM transactions \
             WHERE account_id IN (SELECT id FROM accounts WHERE user_id = ",
        );
        builder.push_bind(user_id);
        builder.push(") AND id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let result = builder.build().execute(self.pool()).await?;
        Ok(result.rows_affected())
    }

    /// Insert many drafts atomically: all land or none do
    pub async fn bulk_create_transactions(
        &self,
        user_id: &str,
        drafts: &[TransactionDraft],
    ) -> StoreResult<Vec<Transaction>> {
        let mut tx = self.pool().begin().await?;
        let mut created = Vec::with_capacity(drafts.len());

        for draft in drafts {
            assert_account_owned(&mut tx, user_id, draft.account_id).await?;
            if let Some(category_id) = draft.category_id {
                assert_category_owned(&mut tx, user_id, category_id).await?;
            }
            created.push(insert_transaction(&mut tx, draft).await?);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Insert mapped CSV rows into one account atomically. Category names
    /// are resolved per user, created on first sight, inside the same
    /// transaction as the inserted rows.
    pub async fn import_transactions(
        &self,
        user_id: &str,
        account_id: i64,
        rows: &[ImportRow],
    ) -> StoreResult<Vec<Transaction>> {
        let mut tx = self.pool().begin().await?;

        assert_account_owned(&mut tx, user_id, account_id).await?;

        let mut category_ids: HashMap<String, i64> = HashMap::new();
        let mut created = Vec::with_capacity(rows.len());

        for row in rows {
            let category_id = match &row.category {
                Some(name) => match category_ids.get(name) {
                    Some(id) => Some(*id),
                    None => {
                        let id = find_or_create_category(&mut tx, user_id, name).await?;
                        category_ids.insert(name.clone(), id);
                        Some(id)
                    }
                },
                None => None,
            };

            let draft = TransactionDraft {
                amount: row.amount,
                date: row.date,
                payee: row.payee.clone(),
                notes: row.notes.clone(),
                account_id,
                category_id,
            };
            created.push(insert_transaction(&mut tx, &draft).await?);
        }

        tx.commit().await?;
        Ok(created)
    }
}

// ==================== Tests ====================
