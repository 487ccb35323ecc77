//! # Storage Traits
//!
//! This module defines the storage abstraction that lets the relational and
//! key-value backends be used interchangeably by the domain layer.

use async_trait::async_trait;

use super::error::StorageResult;
use crate::domain::models::product::{NewProduct, Product, ProductUpdate};

/// Trait defining the interface for product storage operations
///
/// `init` must complete before any other call. Listing and searching return
/// products ordered by `updated_at` descending, ties in insertion order.
#[async_trait]
pub trait ProductStorage: Send + Sync {
    /// Open the medium and create the schema or empty collection if absent.
    /// Calling it again on an open store is a no-op.
    async fn init(&self) -> StorageResult<()>;

    /// List every stored product, most recently touched first
    async fn list_products(&self) -> StorageResult<Vec<Product>>;

    /// Retrieve a specific product by ID
    async fn get_product(&self, id: i64) -> StorageResult<Option<Product>>;

    /// Store a new product, assigning its id and timestamps
    async fn create_product(&self, product: &NewProduct) -> StorageResult<Product>;

    /// Apply a partial update and refresh `updated_at`
    async fn update_product(&self, update: &ProductUpdate) -> StorageResult<Product>;

    /// Delete a product by ID
    /// Returns true if the product was found and deleted, false otherwise
    async fn delete_product(&self, id: i64) -> StorageResult<bool>;

    /// Case-insensitive substring match on the product name
    async fn search_products(&self, query: &str) -> StorageResult<Vec<Product>>;

    /// Release the underlying resource. Safe to call when already closed.
    async fn close(&self) -> StorageResult<()>;
}
