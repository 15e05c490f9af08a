//! Repository for the `prodotti` table.

use magazzino_core::error::CoreError;
use magazzino_core::labels::normalize_color;
use magazzino_core::sizes::SizeScheme;
use sqlx::SqlitePool;

use crate::error::StoreResult;
use crate::models::product::{Product, SaveOutcome, SaveProduct};
use crate::repositories::stock_repo::StockRepo;

/// Column list shared across queries.
const COLUMNS: &str = "codice AS code, nome AS name, categoria AS category, \
    colore AS legacy_color, materiali AS materials, descrizione AS description, \
    COALESCE(costo_unitario, 0.0) AS unit_cost, prezzo_range AS price_range, \
    produzione AS production_notes, COALESCE(tipo_taglie, '') AS size_scheme, \
    COALESCE(venduti, 0) AS units_sold, created_at, updated_at";

/// Provides CRUD operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Create or update a product, keyed by its code.
    ///
    /// Insert path: the row is created with a zero sold counter, the
    /// default color (trimmed legacy color, or the placeholder) is
    /// registered, and its stock cells are reconciled under the submitted
    /// scheme.
    ///
    /// Update path: descriptive fields are rewritten and the product keeps
    /// at least one registered color. When the stored size scheme differs
    /// from the submitted one, every stock cell of the product is reset to
    /// zero and recreated under the new scheme
    /// ([`StockRepo::reset_for_scheme_change`]); the returned outcome flags
    /// this so callers can warn the user before anything irreversible is
    /// shown as routine.
    pub async fn save(pool: &SqlitePool, input: &SaveProduct) -> StoreResult<SaveOutcome> {
        let code = input.code.trim();
        if code.is_empty() {
            return Err(CoreError::Validation("product code must not be empty".into()).into());
        }

        let legacy_color = input.legacy_color.as_deref().unwrap_or("").trim();
        let default_color = normalize_color(legacy_color);
        let now = chrono::Utc::now();

        let stored: Option<(Option<String>,)> =
            sqlx::query_as("SELECT tipo_taglie FROM prodotti WHERE codice = ?")
                .bind(code)
                .fetch_optional(pool)
                .await?;

        let mut tx = pool.begin().await?;
        let outcome = match stored {
            None => {
                sqlx::query(
                    "INSERT INTO prodotti (\
                        codice, nome, categoria, colore, materiali, descrizione, \
                        costo_unitario, prezzo_range, produzione, tipo_taglie, venduti, \
                        created_at, updated_at\
                     ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
                )
                .bind(code)
                .bind(&input.name)
                .bind(&input.category)
                .bind(legacy_color)
                .bind(&input.materials)
                .bind(&input.description)
                .bind(input.unit_cost.unwrap_or(0.0))
                .bind(&input.price_range)
                .bind(&input.production_notes)
                .bind(input.size_scheme.as_str())
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await?;

                StockRepo::reconcile_inner(&mut tx, code, &default_color, input.size_scheme)
                    .await?;
                SaveOutcome::Created
            }
            Some((stored_tag,)) => {
                sqlx::query(
                    "UPDATE prodotti SET \
                        nome = ?, categoria = ?, colore = ?, materiali = ?, descrizione = ?, \
                        costo_unitario = ?, prezzo_range = ?, produzione = ?, tipo_taglie = ?, \
                        updated_at = ? \
                     WHERE codice = ?",
                )
                .bind(&input.name)
                .bind(&input.category)
                .bind(legacy_color)
                .bind(&input.materials)
                .bind(&input.description)
                .bind(input.unit_cost.unwrap_or(0.0))
                .bind(&input.price_range)
                .bind(&input.production_notes)
                .bind(input.size_scheme.as_str())
                .bind(now)
                .bind(code)
                .execute(&mut *tx)
                .await?;

                // A product always keeps at least one registered color.
                let (color_count,): (i64,) = sqlx::query_as(
                    "SELECT COUNT(*) FROM colori_prodotti WHERE codice_prodotto = ?",
                )
                .bind(code)
                .fetch_one(&mut *tx)
                .await?;

                if color_count == 0 {
                    sqlx::query(
                        "INSERT OR IGNORE INTO colori_prodotti (codice_prodotto, colore) \
                         VALUES (?, ?)",
                    )
                    .bind(code)
                    .bind(&default_color)
                    .execute(&mut *tx)
                    .await?;
                }

                let scheme_reset =
                    SizeScheme::parse(stored_tag.as_deref().unwrap_or("")) != input.size_scheme;
                if scheme_reset {
                    StockRepo::reset_inner(&mut tx, code, input.size_scheme).await?;
                }
                SaveOutcome::Updated { scheme_reset }
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Find a product by its code.
    pub async fn find(pool: &SqlitePool, code: &str) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prodotti WHERE codice = ?");
        sqlx::query_as::<_, Product>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the cumulative sold counter (manual correction).
    pub async fn set_units_sold(pool: &SqlitePool, code: &str, units: i64) -> StoreResult<()> {
        if units < 0 {
            return Err(
                CoreError::Validation(format!("sold counter must not be negative, got {units}"))
                    .into(),
            );
        }

        let result = sqlx::query("UPDATE prodotti SET venduti = ?, updated_at = ? WHERE codice = ?")
            .bind(units)
            .bind(chrono::Utc::now())
            .bind(code)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound {
                entity: "product",
                key: code.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Delete a product and everything it owns: stock cells, image rows,
    /// colors, then the row itself. Returns `true` if the product existed.
    ///
    /// Image files on disk are the caller's to unlink; list them first.
    pub async fn delete(pool: &SqlitePool, code: &str) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM taglie_prodotti WHERE codice_prodotto = ?")
            .bind(code)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM immagini_prodotti WHERE codice_prodotto = ?")
            .bind(code)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM colori_prodotti WHERE codice_prodotto = ?")
            .bind(code)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM prodotti WHERE codice = ?")
            .bind(code)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bump a product's `updated_at` within an existing transaction.
    pub(crate) async fn touch_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        code: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE prodotti SET updated_at = ? WHERE codice = ?")
            .bind(chrono::Utc::now())
            .bind(code)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
