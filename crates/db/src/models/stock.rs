//! Stock cell models.

use magazzino_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `taglie_prodotti` table: the quantity on hand for one
/// (product, color, size) variant.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StockCell {
    pub id: DbId,
    pub product_code: String,
    pub color: String,
    pub size: String,
    pub quantity: i64,
}

/// A (size label, quantity) pair for per-color listings, ordered by the
/// scheme's label order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SizeQuantity {
    pub size: String,
    pub quantity: i64,
}
