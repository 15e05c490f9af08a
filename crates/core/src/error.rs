/// Domain error taxonomy for ledger operations.
///
/// All of these are surfaced synchronously by the operation that hit them;
/// no operation leaves a partial effect behind when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed input: empty required field, non-positive quantity,
    /// non-numeric quantity string.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced product, color, or stock cell does not exist.
    #[error("Entity not found: {entity} with key {key}")]
    NotFound { entity: &'static str, key: String },

    /// A sale asked for more units than the cell holds.
    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },

    /// A single product failed to migrate; the pass logs it and continues.
    #[error("Migration failed for product {product}: {reason}")]
    Migration { product: String, reason: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
