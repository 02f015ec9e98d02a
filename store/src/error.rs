use thiserror::Error;

/// Failures reading or writing escrow totals.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// A stored key or value does not have the expected shape.
    #[error("database is corrupted: {0}")]
    Corruption(String),

    #[error("in-memory store lock poisoned")]
    Poisoned,
}
