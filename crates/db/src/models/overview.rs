//! Product overview row for the catalog listing.

use serde::Serialize;
use sqlx::FromRow;

/// One row of the product overview listing.
///
/// Aggregated fresh from current ledger state on every query.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductOverview {
    pub code: String,
    pub name: Option<String>,
    pub category: Option<String>,
    /// Registered colors, comma-joined in insertion order. The internal
    /// placeholder color is excluded.
    pub colors: String,
    pub production_notes: Option<String>,
    /// Stored size-scheme tag (`NUMERI`/`LETTERE`).
    pub size_scheme: String,
    /// Sum of quantities across every color and size.
    pub total_remaining: i64,
    pub units_sold: i64,
    pub unit_cost: f64,
    pub price_range: Option<String>,
}
