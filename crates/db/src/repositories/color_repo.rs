//! Repository for the `colori_prodotti` table -- the variant catalog.
//!
//! Colors have no lifecycle of their own: they belong to a product and
//! cascade away with it. Label equality is exact; only ordering and search
//! are case-insensitive.

use magazzino_core::labels::{validate_label, DEFAULT_COLOR};
use sqlx::SqlitePool;

use crate::error::StoreResult;
use crate::repositories::product_repo::ProductRepo;

/// Provides catalog operations over a product's registered colors.
pub struct ColorRepo;

impl ColorRepo {
    /// Register a color for a product.
    ///
    /// The label is trimmed and must be non-empty. Idempotent: adding an
    /// already-registered color is a no-op, not an error.
    pub async fn add(pool: &SqlitePool, product_code: &str, color: &str) -> StoreResult<()> {
        let color = validate_label(color, "color")?;
        sqlx::query(
            "INSERT OR IGNORE INTO colori_prodotti (codice_prodotto, colore) VALUES (?, ?)",
        )
        .bind(product_code)
        .bind(&color)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// List a product's colors, sorted case-insensitively.
    ///
    /// The internal placeholder used for legacy records is never returned.
    pub async fn list(pool: &SqlitePool, product_code: &str) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT colore FROM colori_prodotti \
             WHERE codice_prodotto = ? AND colore <> ? \
             ORDER BY colore COLLATE NOCASE",
        )
        .bind(product_code)
        .bind(DEFAULT_COLOR)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(color,)| color).collect())
    }

    /// Rename a color, merging into the target when it already exists.
    ///
    /// Simple case: the target is unregistered, so the color row and its
    /// stock cells are renamed in place. Merge case: every stock cell of
    /// the source moves to the target; when both colors hold a cell for the
    /// same size the quantities are summed and the source cell dropped, so
    /// no stock is lost and no duplicate cell is created. Bumps the
    /// product's `updated_at`. One transaction either way.
    pub async fn rename(
        pool: &SqlitePool,
        product_code: &str,
        from: &str,
        to: &str,
    ) -> StoreResult<()> {
        let from = validate_label(from, "color")?;
        let to = validate_label(to, "color")?;
        if from == to {
            return Ok(());
        }

        let mut tx = pool.begin().await?;

        let (target_exists,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM colori_prodotti WHERE codice_prodotto = ? AND colore = ?",
        )
        .bind(product_code)
        .bind(&to)
        .fetch_one(&mut *tx)
        .await?;

        if target_exists == 0 {
            sqlx::query(
                "UPDATE colori_prodotti SET colore = ? WHERE codice_prodotto = ? AND colore = ?",
            )
            .bind(&to)
            .bind(product_code)
            .bind(&from)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "UPDATE taglie_prodotti SET colore = ? WHERE codice_prodotto = ? AND colore = ?",
            )
            .bind(&to)
            .bind(product_code)
            .bind(&from)
            .execute(&mut *tx)
            .await?;
        } else {
            let source_cells: Vec<(i64, String, i64)> = sqlx::query_as(
                "SELECT id, taglia, COALESCE(quantita, 0) FROM taglie_prodotti \
                 WHERE codice_prodotto = ? AND colore = ?",
            )
            .bind(product_code)
            .bind(&from)
            .fetch_all(&mut *tx)
            .await?;

            for (source_id, size, qty) in source_cells {
                let target: Option<(i64,)> = sqlx::query_as(
                    "SELECT id FROM taglie_prodotti \
                     WHERE codice_prodotto = ? AND colore = ? AND taglia = ?",
                )
                .bind(product_code)
                .bind(&to)
                .bind(&size)
                .fetch_optional(&mut *tx)
                .await?;

                match target {
                    Some((target_id,)) => {
                        sqlx::query(
                            "UPDATE taglie_prodotti \
                             SET quantita = COALESCE(quantita, 0) + ? WHERE id = ?",
                        )
                        .bind(qty)
                        .bind(target_id)
                        .execute(&mut *tx)
                        .await?;

                        sqlx::query("DELETE FROM taglie_prodotti WHERE id = ?")
                            .bind(source_id)
                            .execute(&mut *tx)
                            .await?;
                    }
                    None => {
                        sqlx::query("UPDATE taglie_prodotti SET colore = ? WHERE id = ?")
                            .bind(&to)
                            .bind(source_id)
                            .execute(&mut *tx)
                            .await?;
                    }
                }
            }

            sqlx::query("DELETE FROM colori_prodotti WHERE codice_prodotto = ? AND colore = ?")
                .bind(product_code)
                .bind(&from)
                .execute(&mut *tx)
                .await?;
        }

        ProductRepo::touch_inner(&mut tx, product_code).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Delete a color and cascade away all its stock cells.
    pub async fn remove(pool: &SqlitePool, product_code: &str, color: &str) -> StoreResult<()> {
        let color = validate_label(color, "color")?;
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM taglie_prodotti WHERE codice_prodotto = ? AND colore = ?")
            .bind(product_code)
            .bind(&color)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM colori_prodotti WHERE codice_prodotto = ? AND colore = ?")
            .bind(product_code)
            .bind(&color)
            .execute(&mut *tx)
            .await?;

        ProductRepo::touch_inner(&mut tx, product_code).await?;
        tx.commit().await?;
        Ok(())
    }
}
