//! Read-only product overview aggregation -- the catalog listing.

use magazzino_core::labels::DEFAULT_COLOR;
use sqlx::SqlitePool;

use crate::models::overview::ProductOverview;

/// Provides the aggregated product listing.
pub struct OverviewRepo;

impl OverviewRepo {
    /// One row per product: registered colors (insertion order, placeholder
    /// excluded), total remaining stock, and the descriptive listing
    /// fields. Always computed from current ledger state, never cached, so
    /// a sale is visible on the very next call.
    ///
    /// `search` filters by case-insensitive substring over code and name;
    /// blank or `None` lists everything. Ordered by name,
    /// case-insensitively.
    pub async fn list(
        pool: &SqlitePool,
        search: Option<&str>,
    ) -> Result<Vec<ProductOverview>, sqlx::Error> {
        let base = "SELECT \
                p.codice AS code, \
                p.nome AS name, \
                p.categoria AS category, \
                COALESCE((\
                    SELECT GROUP_CONCAT(cp.colore, ', ') \
                    FROM colori_prodotti cp \
                    WHERE cp.codice_prodotto = p.codice AND cp.colore <> ?\
                ), '') AS colors, \
                p.produzione AS production_notes, \
                COALESCE(p.tipo_taglie, '') AS size_scheme, \
                COALESCE((\
                    SELECT SUM(t.quantita) \
                    FROM taglie_prodotti t \
                    WHERE t.codice_prodotto = p.codice\
                ), 0) AS total_remaining, \
                COALESCE(p.venduti, 0) AS units_sold, \
                COALESCE(p.costo_unitario, 0) AS unit_cost, \
                p.prezzo_range AS price_range \
             FROM prodotti p";

        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.to_lowercase()));

        match needle {
            Some(pattern) => {
                let query = format!(
                    "{base} \
                     WHERE LOWER(p.codice) LIKE ? OR LOWER(p.nome) LIKE ? \
                     ORDER BY p.nome COLLATE NOCASE"
                );
                sqlx::query_as::<_, ProductOverview>(&query)
                    .bind(DEFAULT_COLOR)
                    .bind(&pattern)
                    .bind(&pattern)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!("{base} ORDER BY p.nome COLLATE NOCASE");
                sqlx::query_as::<_, ProductOverview>(&query)
                    .bind(DEFAULT_COLOR)
                    .fetch_all(pool)
                    .await
            }
        }
    }
}
