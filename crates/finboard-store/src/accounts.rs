//! Account queries, all scoped to the owning user

use finboard_core::Account;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::{Store, StoreError, StoreResult};

fn account_from_row(row: &SqliteRow) -> Result<Account, sqlx::Error> {
    Ok(Account {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        user_id: row.try_get("user_id")?,
    })
}

/// Fail with NotFound unless the account exists and belongs to the user
pub(crate) async fn assert_account_owned(
    conn: &mut SqliteConnection,
    user_id: &str,
    account_id: i64,
) -> StoreResult<()> {
    let row = sqlx::query("SELECT id FROM accounts WHERE id = ? AND user_id = ?")
        .bind(account_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

    if row.is_none() {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

impl Store {
    pub async fn list_accounts(&self, user_id: &str) -> StoreResult<Vec<Account>> {
        let rows = sqlx::query("SELECT id, name, user_id FROM accounts WHERE user_id = ? ORDER BY name, id")
            .bind(user_id)
            .fetch_all(self.pool())
            .await?;

        let accounts = rows
            .iter()
            .map(account_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(accounts)
    }

    pub async fn get_account(&self, user_id: &str, id: i64) -> StoreResult<Account> {
        let row = sqlx::query("SELECT id, name, user_id FROM accounts WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?
            .ok_or(StoreError::NotFound)?;

        Ok(account_from_row(&row)?)
    }

    pub async fn create_account(&self, user_id: &str, name: &str) -> StoreResult<Account> {
        let id = sqlx::query("INSERT INTO accounts (name, user_id) VALUES (?, ?)")
            .bind(name)
            .bind(user_id)
            .execute(self.pool())
            .await?
            .last_insert_rowid();

        Ok(Account {
            id,
            name: name.to_string(),
            user_id: user_id.to_string(),
        })
    }

    pub async fn update_account(&self, user_id: &str, id: i64, name: &str) -> StoreResult<Account> {
        let result = sqlx::query("UPDATE accounts SET name = ? WHERE id = ? AND user_id = ?")
            .bind(name)
            .bind(id)
            .bind(user_id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(Account {
            id,
            name: name.to_string(),
            user_id: user_id.to_string(),
        })
    }

    /// Delete one account; its transactions go with it (schema cascade)
    pub async fn delete_account(&self, user_id: &str, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Delete many accounts at once; ids owned by other users are untouched.
    /// Returns the number of rows actually deleted.
    pub async fn bulk_delete_accounts(&self, user_id: &str, ids: &[i64]) -> StoreResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut builder =
            sqlx::QueryBuilder::<sqlx::Sqlite>::new("DELETE FROM accounts WHERE user_id = ");
        builder.push_bind(user_id);
        builder.push(" AND id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let result = builder.build().execute(self.pool()).await?;
        Ok(result.rows_affected())
    }
}

// ==================== Tests ====================
