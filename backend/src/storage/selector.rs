//! # Backend Selection
//!
//! Picks the storage backend once, at startup, from what the runtime can
//! offer and what the configuration asks for. The resulting `ProductStore`
//! is owned by the composition root for the rest of the process.

use std::fmt;

use async_trait::async_trait;
use tracing::{info, warn};

use super::error::StorageResult;
use super::kv::KvProductRepository;
use super::sqlite::SqliteProductRepository;
use super::traits::ProductStorage;
use crate::config::{BackendPreference, StorageConfig};
use crate::domain::models::product::{NewProduct, Product, ProductUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite,
    KeyValue,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::KeyValue => "kv",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistence primitives available in the current runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeCapabilities {
    /// An embedded relational engine can be opened
    pub relational: bool,
}

impl RuntimeCapabilities {
    pub fn detect() -> Self {
        Self {
            relational: !cfg!(target_arch = "wasm32"),
        }
    }

    /// Only a flat key/value surface is available
    pub fn key_value_only() -> Self {
        Self { relational: false }
    }

    /// Resolve a configured preference against these capabilities
    pub fn resolve(&self, preference: BackendPreference) -> BackendKind {
        match preference {
            BackendPreference::KeyValue => BackendKind::KeyValue,
            BackendPreference::Auto if self.relational => BackendKind::Sqlite,
            BackendPreference::Auto => BackendKind::KeyValue,
            BackendPreference::Sqlite if self.relational => BackendKind::Sqlite,
            BackendPreference::Sqlite => {
                warn!("SQLite requested but not available in this runtime; using key-value storage");
                BackendKind::KeyValue
            }
        }
    }
}

/// The product storage chosen for this process
pub enum ProductStore {
    Relational(SqliteProductRepository),
    KeyValue(KvProductRepository),
}

impl ProductStore {
    /// Choose a backend for the current runtime
    pub fn select(config: &StorageConfig) -> Self {
        Self::select_with(config, RuntimeCapabilities::detect())
    }

    pub fn select_with(config: &StorageConfig, capabilities: RuntimeCapabilities) -> Self {
        let kind = capabilities.resolve(config.backend);
        info!(
            "Selected {} product storage (configured: {}) in {}",
            kind,
            config.backend,
            config.data_directory.display()
        );

        match kind {
            BackendKind::Sqlite => Self::Relational(SqliteProductRepository::new(config.database_path())),
            BackendKind::KeyValue => Self::KeyValue(KvProductRepository::new(&config.data_directory)),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Relational(_) => BackendKind::Sqlite,
            Self::KeyValue(_) => BackendKind::KeyValue,
        }
    }
}

#[async_trait]
impl ProductStorage for ProductStore {
    async fn init(&self) -> StorageResult<()> {
        match self {
            Self::Relational(repo) => repo.init().await,
            Self::KeyValue(repo) => repo.init().await,
        }
    }

    async fn list_products(&self) -> StorageResult<Vec<Product>> {
        match self {
            Self::Relational(repo) => repo.list_products().await,
            Self::KeyValue(repo) => repo.list_products().await,
        }
    }

    async fn get_product(&self, id: i64) -> StorageResult<Option<Product>> {
        match self {
            Self::Relational(repo) => repo.get_product(id).await,
            Self::KeyValue(repo) => repo.get_product(id).await,
        }
    }

    async fn create_product(&self, product: &NewProduct) -> StorageResult<Product> {
        match self {
            Self::Relational(repo) => repo.create_product(product).await,
            Self::KeyValue(repo) => repo.create_product(product).await,
        }
    }

    async fn update_product(&self, update: &ProductUpdate) -> StorageResult<Product> {
        match self {
            Self::Relational(repo) => repo.update_product(update).await,
            Self::KeyValue(repo) => repo.update_product(update).await,
        }
    }

    async fn delete_product(&self, id: i64) -> StorageResult<bool> {
        match self {
            Self::Relational(repo) => repo.delete_product(id).await,
            Self::KeyValue(repo) => repo.delete_product(id).await,
        }
    }

    async fn search_products(&self, query: &str) -> StorageResult<Vec<Product>> {
        match self {
            Self::Relational(repo) => repo.search_products(query).await,
            Self::KeyValue(repo) => repo.search_products(query).await,
        }
    }

    async fn close(&self) -> StorageResult<()> {
        match self {
            Self::Relational(repo) => repo.close().await,
            Self::KeyValue(repo) => repo.close().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_preferences() {
        let native = RuntimeCapabilities { relational: true };
        let browser = RuntimeCapabilities::key_value_only();

        assert_eq!(native.resolve(BackendPreference::Auto), BackendKind::Sqlite);
        assert_eq!(native.resolve(BackendPreference::KeyValue), BackendKind::KeyValue);
        assert_eq!(browser.resolve(BackendPreference::Auto), BackendKind::KeyValue);
        assert_eq!(browser.resolve(BackendPreference::Sqlite), BackendKind::KeyValue);
    }

    #[test]
    fn test_detect_on_native_targets() {
        assert!(RuntimeCapabilities::detect().relational);
    }

    #[test]
    fn test_select_builds_matching_variant() {
        let temp_dir = TempDir::new().unwrap();

        let auto = StorageConfig::new(BackendPreference::Auto, temp_dir.path());
        let store = ProductStore::select(&auto);
        assert_eq!(store.kind(), BackendKind::Sqlite);
        match store {
            ProductStore::Relational(repo) => assert_eq!(repo.database_path(), auto.database_path()),
            ProductStore::KeyValue(_) => panic!("expected the relational backend"),
        }

        let kv = ProductStore::select_with(&auto, RuntimeCapabilities::key_value_only());
        assert_eq!(kv.kind(), BackendKind::KeyValue);
        match kv {
            ProductStore::KeyValue(repo) => assert_eq!(repo.base_directory(), temp_dir.path()),
            ProductStore::Relational(_) => panic!("expected the key-value backend"),
        }
    }

    #[tokio::test]
    async fn test_store_delegates_to_backend() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(BackendPreference::KeyValue, temp_dir.path());
        let store = ProductStore::select(&config);

        store.init().await.unwrap();
        let created = store
            .create_product(&NewProduct {
                name: "Widget".to_string(),
                quantity: 10,
                price: 9.99,
                image_uri: None,
            })
            .await
            .unwrap();

        assert_eq!(store.get_product(created.id).await.unwrap(), Some(created));
        store.close().await.unwrap();
    }
}
