//! # Storage Errors
//!
//! Typed failures surfaced by every storage backend. Backends propagate these
//! to the caller unchanged; nothing is retried or suppressed here.

use crate::domain::models::product::ProductValidationError;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The durable medium could not be opened or created
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// An operation was issued before `init` or after `close`
    #[error("Storage has not been initialized")]
    NotInitialized,

    #[error("Product not found: {0}")]
    NotFound(i64),

    /// The update payload carried nothing besides the id
    #[error("No fields to update")]
    NoFieldsToUpdate,

    /// The payload would persist a product that breaks the product invariants
    #[error(transparent)]
    InvalidProduct(#[from] ProductValidationError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// A persisted value could not be decoded into a product
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}
