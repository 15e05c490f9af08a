//! Category entity model.

use magazzino_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `categorie` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
}
