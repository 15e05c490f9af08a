use magazzino_core::error::CoreError;

/// Error type for repository operations with domain failure semantics.
///
/// Wraps [`CoreError`] for domain rejections and [`sqlx::Error`] for
/// infrastructure failures, so `?` composes both inside one operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain-level rejection from `magazzino_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience alias for ledger operation results.
pub type StoreResult<T> = Result<T, StoreError>;
