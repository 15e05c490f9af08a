//! Product image (gallery row) model and DTO.
//!
//! Only the row is managed here; writing and removing the files themselves
//! belongs to the caller.

use magazzino_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `immagini_prodotti` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductImage {
    pub id: DbId,
    pub product_code: String,
    pub file_path: String,
    /// Display position within the product's gallery, 1-based.
    pub position: i64,
    /// At most one image per product is principal; exactly one when any
    /// image exists.
    pub is_principal: bool,
}

/// DTO for registering an already-stored image file.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductImage {
    pub product_code: String,
    pub file_path: String,
}
