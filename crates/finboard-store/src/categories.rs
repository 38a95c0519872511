//! Category queries, all scoped to the owning user

use finboard_core::Category;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::{Store, StoreError, StoreResult};

fn category_from_row(row: &SqliteRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        user_id: row.try_get("user_id")?,
    })
}

/// Fail with NotFound unless the category exists and belongs to the user
pub(crate) async fn assert_category_owned(
    conn: &mut SqliteConnection,
    user_id: &str,
    category_id: i64,
) -> StoreResult<()> {
    let row = sqlx::query("SELECT id FROM categories WHERE id = ? AND user_id = ?")
        .bind(category_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

    if row.is_none() {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Resolve a category by name for the user, creating it when absent.
/// Used by the CSV import, inside the import's transaction.
pub(crate) async fn find_or_create_category(
    conn: &mut SqliteConnection,
    user_id: &str,
    name: &str,
) -> StoreResult<i64> {
    if let Some(row) = sqlx::query("SELECT id FROM categories WHERE user_id = ? AND name = ?")
        .bind(user_id)
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?
    {
        return Ok(row.try_get("id")?);
    }

    let id = sqlx::query("INSERT INTO categories (name, user_id) VALUES (?, ?)")
        .bind(name)
        .bind(user_id)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
    Ok(id)
}

impl Store {
    pub async fn list_categories(&self, user_id: &str) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, name, user_id FROM categories WHERE user_id = ? ORDER BY name, id",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        let categories = rows
            .iter()
            .map(category_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    pub async fn get_category(&self, user_id: &str, id: i64) -> StoreResult<Category> {
        let row =
            sqlx::query("SELECT id, name, user_id FROM categories WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(user_id)
                .fetch_optional(self.pool())
                .await?
                .ok_or(StoreError::NotFound)?;

        Ok(category_from_row(&row)?)
    }

    pub async fn create_category(&self, user_id: &str, name: &str) -> StoreResult<Category> {
        let id = sqlx::query("INSERT INTO categories (name, user_id) VALUES (?, ?)")
            .bind(name)
            .bind(user_id)
            .execute(self.pool())
            .await?
            .last_insert_rowid();

        Ok(Category {
            id,
            name: name.to_string(),
            user_id: user_id.to_string(),
        })
    }

    pub async fn update_category(
        &self,
        user_id: &str,
        id: i64,
        name: &str,
    ) -> StoreResult<Category> {
        let result = sqlx::query("UPDATE categories SET name = ? WHERE id = ? AND user_id = ?")
            .bind(name)
            .bind(id)
            .bind(user_id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(Category {
            id,
            name: name.to_string(),
            user_id: user_id.to_string(),
        })
    }

    /// Delete one category; its transactions survive with category nulled
    /// (schema SET NULL)
    pub async fn delete_category(&self, user_id: &str, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Delete many categories at once; ids owned by other users are
    /// untouched. Returns the number of rows actually deleted.
    pub async fn bulk_delete_categories(&self, user_id: &str, ids: &[i64]) -> StoreResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut builder =
            sqlx::QueryBuilder::<sqlx::Sqlite>::new("DELETE FROM categories WHERE user_id = ");
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
