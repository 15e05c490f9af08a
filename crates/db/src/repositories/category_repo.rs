//! Repository for the `categorie` table.

use magazzino_core::labels::validate_label;
use sqlx::SqlitePool;

use crate::error::StoreResult;
use crate::models::category::Category;

/// Column list shared across queries.
const COLUMNS: &str = "id, nome AS name";

/// Provides CRUD operations for product categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List all categories, ordered by name case-insensitively.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categorie ORDER BY nome COLLATE NOCASE");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Add a category. The name is trimmed and must be non-empty;
    /// duplicates are a no-op.
    pub async fn add(pool: &SqlitePool, name: &str) -> StoreResult<()> {
        let name = validate_label(name, "category")?;
        sqlx::query("INSERT OR IGNORE INTO categorie (nome) VALUES (?)")
            .bind(&name)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// How many products currently carry the category.
    pub async fn in_use(pool: &SqlitePool, name: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM prodotti WHERE categoria = ?")
                .bind(name)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Move every product from one category name to another. Returns the
    /// number of products moved.
    pub async fn reassign_products(
        pool: &SqlitePool,
        from: &str,
        to: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE prodotti SET categoria = ?, updated_at = ? WHERE categoria = ?",
        )
        .bind(to)
        .bind(chrono::Utc::now())
        .bind(from)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Rename a category and re-point every product carrying it, in one
    /// transaction.
    pub async fn rename(pool: &SqlitePool, from: &str, to: &str) -> StoreResult<()> {
        let from = validate_label(from, "category")?;
        let to = validate_label(to, "category")?;

        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE categorie SET nome = ? WHERE nome = ?")
            .bind(&to)
            .bind(&from)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE prodotti SET categoria = ?, updated_at = ? WHERE categoria = ?")
            .bind(&to)
            .bind(chrono::Utc::now())
            .bind(&from)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Delete a category row. Products keep their (now unlisted) category
    /// name. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, name: &str) -> StoreResult<bool> {
        let name = validate_label(name, "category")?;
        let result = sqlx::query("DELETE FROM categorie WHERE nome = ?")
            .bind(&name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
