//! Repository for the `taglie_prodotti` table -- the stock ledger.
//!
//! One row per (product, color, size) variant. [`StockRepo::reconcile`]
//! owns row creation; `load`/`sell` mutate quantities and refuse to touch
//! cells that do not exist, so callers reconcile first.

use magazzino_core::error::CoreError;
use magazzino_core::labels::normalize_color;
use magazzino_core::sizes::{self, SizeScheme};
use magazzino_core::stock::{build_quantity_plan, require_positive};
use sqlx::SqlitePool;

use crate::error::StoreResult;
use crate::models::stock::{SizeQuantity, StockCell};
use crate::repositories::product_repo::ProductRepo;

/// Column list shared across cell queries.
const COLUMNS: &str = "id, codice_prodotto AS product_code, colore AS color, \
    taglia AS size, COALESCE(quantita, 0) AS quantity";

/// Provides the ledger operations over stock cells.
pub struct StockRepo;

impl StockRepo {
    /// Ensure one cell exists for every canonical label of `scheme`, for
    /// the given color, and that the color is registered in the catalog.
    ///
    /// Pre-existing cells keep their quantity; missing ones are created at
    /// zero. Idempotent: a second call changes nothing.
    pub async fn reconcile(
        pool: &SqlitePool,
        product_code: &str,
        color: &str,
        scheme: SizeScheme,
    ) -> StoreResult<()> {
        let color = normalize_color(color);
        let mut tx = pool.begin().await?;
        Self::reconcile_inner(&mut tx, product_code, &color, scheme).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Reconcile within an existing transaction.
    pub(crate) async fn reconcile_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        product_code: &str,
        color: &str,
        scheme: SizeScheme,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT OR IGNORE INTO colori_prodotti (codice_prodotto, colore) VALUES (?, ?)",
        )
        .bind(product_code)
        .bind(color)
        .execute(&mut **tx)
        .await?;

        for &size in scheme.labels() {
            let (count,): (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM taglie_prodotti \
                 WHERE codice_prodotto = ? AND colore = ? AND taglia = ?",
            )
            .bind(product_code)
            .bind(color)
            .bind(size)
            .fetch_one(&mut **tx)
            .await?;

            if count == 0 {
                sqlx::query(
                    "INSERT INTO taglie_prodotti (codice_prodotto, colore, taglia, quantita) \
                     VALUES (?, ?, ?, 0)",
                )
                .bind(product_code)
                .bind(color)
                .bind(size)
                .execute(&mut **tx)
                .await?;
            }
        }

        ProductRepo::touch_inner(tx, product_code).await
    }

    /// Delete every stock cell of the product and recreate zeroed cells for
    /// all registered colors under `new_scheme`.
    ///
    /// Destructive by design: every quantity the product had is lost, while
    /// its colors survive. Callers surface a warning when this runs.
    pub async fn reset_for_scheme_change(
        pool: &SqlitePool,
        product_code: &str,
        new_scheme: SizeScheme,
    ) -> StoreResult<()> {
        let mut tx = pool.begin().await?;
        Self::reset_inner(&mut tx, product_code, new_scheme).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Reset within an existing transaction.
    pub(crate) async fn reset_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        product_code: &str,
        new_scheme: SizeScheme,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM taglie_prodotti WHERE codice_prodotto = ?")
            .bind(product_code)
            .execute(&mut **tx)
            .await?;

        let colors: Vec<(String,)> = sqlx::query_as(
            "SELECT colore FROM colori_prodotti \
             WHERE codice_prodotto = ? \
             ORDER BY colore COLLATE NOCASE",
        )
        .bind(product_code)
        .fetch_all(&mut **tx)
        .await?;

        for (color,) in colors {
            Self::reconcile_inner(tx, product_code, &color, new_scheme).await?;
        }
        Ok(())
    }

    /// Add `qty` units to a cell, returning the new quantity.
    ///
    /// `qty` must be at least 1. Fails with `NotFound` when the cell does
    /// not exist; the caller has not reconciled this color yet.
    pub async fn load(
        pool: &SqlitePool,
        product_code: &str,
        color: &str,
        size: &str,
        qty: i64,
    ) -> StoreResult<i64> {
        require_positive(qty, "load")?;
        let color = normalize_color(color);

        let mut tx = pool.begin().await?;
        let (cell_id, current) = Self::find_cell(&mut tx, product_code, &color, size).await?;

        let new_qty = current + qty;
        sqlx::query("UPDATE taglie_prodotti SET quantita = ? WHERE id = ?")
            .bind(new_qty)
            .bind(cell_id)
            .execute(&mut *tx)
            .await?;

        ProductRepo::touch_inner(&mut tx, product_code).await?;
        tx.commit().await?;
        Ok(new_qty)
    }

    /// Subtract `qty` units from a cell, returning the new quantity.
    ///
    /// `qty` must be at least 1 and the cell must hold at least `qty`
    /// units; otherwise nothing changes. On success the product's
    /// cumulative sold counter grows by `qty` in the same transaction.
    pub async fn sell(
        pool: &SqlitePool,
        product_code: &str,
        color: &str,
        size: &str,
        qty: i64,
    ) -> StoreResult<i64> {
        require_positive(qty, "sell")?;
        let color = normalize_color(color);

        let mut tx = pool.begin().await?;
        let (cell_id, available) = Self::find_cell(&mut tx, product_code, &color, size).await?;

        if available < qty {
            return Err(CoreError::InsufficientStock {
                available,
                requested: qty,
            }
            .into());
        }

        let new_qty = available - qty;
        sqlx::query("UPDATE taglie_prodotti SET quantita = ? WHERE id = ?")
            .bind(new_qty)
            .bind(cell_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE prodotti \
             SET venduti = COALESCE(venduti, 0) + ?, updated_at = ? \
             WHERE codice = ?",
        )
        .bind(qty)
        .bind(chrono::Utc::now())
        .bind(product_code)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(new_qty)
    }

    /// Bulk per-size overwrite from raw (size label, quantity string)
    /// entries.
    ///
    /// Entries are validated up front ([`build_quantity_plan`]): blank
    /// labels are dropped, negative quantities clamp to zero, non-numeric
    /// quantities reject the whole update before anything is written.
    /// Existing cells are updated, absent ones inserted.
    pub async fn set_quantities(
        pool: &SqlitePool,
        product_code: &str,
        color: &str,
        entries: &[(String, String)],
    ) -> StoreResult<()> {
        let color = normalize_color(color);
        let plan = build_quantity_plan(entries)?;

        let mut tx = pool.begin().await?;
        for (size, qty) in plan {
            let result = sqlx::query(
                "UPDATE taglie_prodotti SET quantita = ? \
                 WHERE codice_prodotto = ? AND colore = ? AND taglia = ?",
            )
            .bind(qty)
            .bind(product_code)
            .bind(&color)
            .bind(&size)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                sqlx::query(
                    "INSERT INTO taglie_prodotti (codice_prodotto, colore, taglia, quantita) \
                     VALUES (?, ?, ?, ?)",
                )
                .bind(product_code)
                .bind(&color)
                .bind(&size)
                .bind(qty)
                .execute(&mut *tx)
                .await?;
            }
        }
        tx.commit().await?;
        Ok(())
    }

    /// Per-size quantities for one color, ordered by the product's scheme:
    /// numeric sizes by value, letter sizes XS < S < M < L < XL, anything
    /// unrecognized after them.
    pub async fn sizes_for_color(
        pool: &SqlitePool,
        product_code: &str,
        color: &str,
    ) -> Result<Vec<SizeQuantity>, sqlx::Error> {
        let color = normalize_color(color);

        let stored: Option<(Option<String>,)> =
            sqlx::query_as("SELECT tipo_taglie FROM prodotti WHERE codice = ?")
                .bind(product_code)
                .fetch_optional(pool)
                .await?;
        let scheme = SizeScheme::parse(stored.and_then(|(tag,)| tag).as_deref().unwrap_or(""));

        let mut rows: Vec<SizeQuantity> = sqlx::query_as(
            "SELECT taglia AS size, COALESCE(quantita, 0) AS quantity \
             FROM taglie_prodotti \
             WHERE codice_prodotto = ? AND colore = ?",
        )
        .bind(product_code)
        .bind(&color)
        .fetch_all(pool)
        .await?;

        rows.sort_by(|a, b| sizes::compare_labels(scheme, &a.size, &b.size));
        Ok(rows)
    }

    /// All stock cells of a product, across every color.
    pub async fn cells_for_product(
        pool: &SqlitePool,
        product_code: &str,
    ) -> Result<Vec<StockCell>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM taglie_prodotti WHERE codice_prodotto = ? ORDER BY id"
        );
        sqlx::query_as::<_, StockCell>(&query)
            .bind(product_code)
            .fetch_all(pool)
            .await
    }

    /// Sum of quantities across sizes for one color; zero if none.
    pub async fn total_for_color(
        pool: &SqlitePool,
        product_code: &str,
        color: &str,
    ) -> Result<i64, sqlx::Error> {
        let color = normalize_color(color);
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(quantita), 0) FROM taglie_prodotti \
             WHERE codice_prodotto = ? AND colore = ?",
        )
        .bind(product_code)
        .bind(&color)
        .fetch_one(pool)
        .await?;
        Ok(total)
    }

    /// Sum of quantities across all colors and sizes; zero if none.
    pub async fn total_for_product(
        pool: &SqlitePool,
        product_code: &str,
    ) -> Result<i64, sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(quantita), 0) FROM taglie_prodotti WHERE codice_prodotto = ?",
        )
        .bind(product_code)
        .fetch_one(pool)
        .await?;
        Ok(total)
    }

    /// Look up a cell's id and current quantity, or fail with `NotFound`.
    async fn find_cell(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        product_code: &str,
        color: &str,
        size: &str,
    ) -> StoreResult<(i64, i64)> {
        let cell: Option<(i64, i64)> = sqlx::query_as(
            "SELECT id, COALESCE(quantita, 0) FROM taglie_prodotti \
             WHERE codice_prodotto = ? AND colore = ? AND taglia = ?",
        )
        .bind(product_code)
        .bind(color)
        .bind(size)
        .fetch_optional(&mut **tx)
        .await?;

        match cell {
            Some(found) => Ok(found),
            None => Err(CoreError::NotFound {
                entity: "stock cell",
                key: format!("{product_code}/{color}/{size}"),
            }
            .into()),
        }
    }
}
