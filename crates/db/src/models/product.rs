//! Product entity model and DTOs.

use magazzino_core::sizes::SizeScheme;
use magazzino_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `prodotti` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub code: String,
    pub name: Option<String>,
    pub category: Option<String>,
    /// Legacy single-color field, superseded by the color catalog but kept
    /// for migration and compatibility.
    pub legacy_color: Option<String>,
    pub materials: Option<String>,
    pub description: Option<String>,
    pub unit_cost: f64,
    pub price_range: Option<String>,
    pub production_notes: Option<String>,
    /// Stored size-scheme tag (`NUMERI`/`LETTERE`).
    pub size_scheme: String,
    /// Cumulative units sold across all variants.
    pub units_sold: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    /// The product's size scheme, parsed from the stored tag.
    pub fn scheme(&self) -> SizeScheme {
        SizeScheme::parse(&self.size_scheme)
    }
}

/// DTO for creating or updating a product (upsert keyed by `code`).
#[derive(Debug, Clone, Deserialize)]
pub struct SaveProduct {
    pub code: String,
    pub name: Option<String>,
    pub category: Option<String>,
    /// Legacy single-color field; also seeds the first catalog color when
    /// the product has none yet.
    pub legacy_color: Option<String>,
    pub materials: Option<String>,
    pub description: Option<String>,
    /// Defaults to `0.0` if omitted.
    pub unit_cost: Option<f64>,
    pub price_range: Option<String>,
    pub production_notes: Option<String>,
    pub size_scheme: SizeScheme,
}

/// What `ProductRepo::save` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SaveOutcome {
    /// A new product row was inserted and its first color reconciled.
    Created,
    /// An existing product was rewritten. `scheme_reset` is true when the
    /// size scheme changed and every stock quantity of the product was
    /// reset to zero; callers must surface a warning when it is set.
    Updated { scheme_reset: bool },
}
