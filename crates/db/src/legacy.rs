//! Legacy single-color backfill.
//!
//! Early versions stored one color directly on the product row and left the
//! stock rows colorless. The backfill moves every such product onto the
//! multi-color model: the legacy color (or the placeholder) is registered
//! in the color catalog, and any stock row that still has no color is
//! stamped with it. Rows that already carry a color are never touched, so
//! re-running the pass -- it runs on every start -- changes nothing.

use magazzino_core::error::CoreError;
use magazzino_core::labels::normalize_color;
use sqlx::SqlitePool;

/// Outcome of one backfill pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationReport {
    /// Products examined.
    pub seen: usize,
    /// Products whose migration failed and was skipped.
    pub failed: usize,
}

/// Backfill every product's legacy color into the multi-color model.
///
/// Each product migrates in its own transaction. A failure is wrapped as
/// [`CoreError::Migration`], logged at warn, and does not stop the pass;
/// only a failure to enumerate the products at all aborts it.
pub async fn backfill_legacy_colors(pool: &SqlitePool) -> Result<MigrationReport, sqlx::Error> {
    let products: Vec<(String, Option<String>)> =
        sqlx::query_as("SELECT codice, colore FROM prodotti")
            .fetch_all(pool)
            .await?;

    let mut report = MigrationReport::default();
    for (code, legacy_color) in products {
        report.seen += 1;
        let legacy_color = legacy_color.unwrap_or_default();
        if let Err(err) = backfill_product(pool, &code, &legacy_color).await {
            let err = CoreError::Migration {
                product: code.clone(),
                reason: err.to_string(),
            };
            tracing::warn!(product = %code, error = %err, "Legacy color backfill failed, skipping product");
            report.failed += 1;
        }
    }

    if report.seen > 0 {
        tracing::info!(
            seen = report.seen,
            failed = report.failed,
            "Legacy color backfill complete"
        );
    }
    Ok(report)
}

/// Migrate a single product inside its own transaction.
async fn backfill_product(
    pool: &SqlitePool,
    code: &str,
    legacy_color: &str,
) -> Result<(), sqlx::Error> {
    let color = normalize_color(legacy_color);
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT OR IGNORE INTO colori_prodotti (codice_prodotto, colore) VALUES (?, ?)")
        .bind(code)
        .bind(&color)
        .execute(&mut *tx)
        .await?;

    // Only colorless rows: already-migrated and multi-color data stays put.
    sqlx::query(
        "UPDATE taglie_prodotti SET colore = ? \
         WHERE codice_prodotto = ? AND (colore IS NULL OR TRIM(colore) = '')",
    )
    .bind(&color)
    .bind(code)
    .execute(&mut *tx)
    .await?;

    tx.commit().await
}
