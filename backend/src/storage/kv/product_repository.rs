use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::connection::KvConnection;
use crate::domain::models::product::{NewProduct, Product, ProductUpdate};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::traits::ProductStorage;

/// Key holding the serialized product collection
pub const PRODUCTS_KEY: &str = "estoque_products";

/// Key-value product repository
///
/// The whole collection lives under one key as a JSON array in insertion
/// order. The mutex around the connection serializes every
/// read-modify-write, so overlapping creates cannot pick the same id.
pub struct ProductRepository {
    base_directory: PathBuf,
    storage_key: String,
    connection: Mutex<Option<KvConnection>>,
}

impl ProductRepository {
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Self {
        Self::with_key(base_directory, PRODUCTS_KEY)
    }

    pub fn with_key<P: AsRef<Path>>(base_directory: P, storage_key: &str) -> Self {
        Self {
            base_directory: base_directory.as_ref().to_path_buf(),
            storage_key: storage_key.to_string(),
            connection: Mutex::new(None),
        }
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    async fn load(&self, connection: &KvConnection) -> StorageResult<Vec<Product>> {
        match connection.get_item(&self.storage_key).await? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, connection: &KvConnection, products: &[Product]) -> StorageResult<()> {
        let data = serde_json::to_string(products)?;
        connection.set_item(&self.storage_key, &data).await
    }

    /// Highest existing id plus one, or 1 for an empty collection
    fn next_id(products: &[Product]) -> i64 {
        products.iter().map(|p| p.id).max().map_or(1, |max| max + 1)
    }

    /// Most recently touched first; the stable sort keeps insertion order on ties
    fn sort_by_recency(mut products: Vec<Product>) -> Vec<Product> {
        products.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        products
    }
}

#[async_trait]
impl ProductStorage for ProductRepository {
    async fn init(&self) -> StorageResult<()> {
        let mut guard = self.connection.lock().await;
        if guard.is_some() {
            return Ok(());
        }

        let connection = KvConnection::open(&self.base_directory).await?;
        if connection.get_item(&self.storage_key).await?.is_none() {
            connection.set_item(&self.storage_key, "[]").await?;
            debug!("Created empty product collection under {}", self.storage_key);
        }

        *guard = Some(connection);
        info!("Key-value product storage ready at {}", self.base_directory.display());
        Ok(())
    }

    async fn list_products(&self) -> StorageResult<Vec<Product>> {
        let guard = self.connection.lock().await;
        let connection = guard.as_ref().ok_or(StorageError::NotInitialized)?;

        let products = self.load(connection).await?;
        Ok(Self::sort_by_recency(products))
    }

    async fn get_product(&self, id: i64) -> StorageResult<Option<Product>> {
        let guard = self.connection.lock().await;
        let connection = guard.as_ref().ok_or(StorageError::NotInitialized)?;

        let products = self.load(connection).await?;
        Ok(products.into_iter().find(|p| p.id == id))
    }

    async fn create_product(&self, product: &NewProduct) -> StorageResult<Product> {
        // A non-finite price would serialize as null and poison the whole blob
        product.validate()?;

        let guard = self.connection.lock().await;
        let connection = guard.as_ref().ok_or(StorageError::NotInitialized)?;

        let mut products = self.load(connection).await?;
        let now = Product::now();
        let created = Product {
            id: Self::next_id(&products),
            name: product.name.clone(),
            quantity: product.quantity,
            price: product.price,
            image_uri: product.image_uri.clone(),
            created_at: now,
            updated_at: now,
        };

        products.push(created.clone());
        self.save(connection, &products).await?;
        debug!("Stored product {} under {}", created.id, self.storage_key);

        Ok(created)
    }

    async fn update_product(&self, update: &ProductUpdate) -> StorageResult<Product> {
        if update.is_empty() {
            return Err(StorageError::NoFieldsToUpdate);
        }
        update.validate()?;

        let guard = self.connection.lock().await;
        let connection = guard.as_ref().ok_or(StorageError::NotInitialized)?;

        let mut products = self.load(connection).await?;
        let product = products
            .iter_mut()
            .find(|p| p.id == update.id)
            .ok_or(StorageError::NotFound(update.id))?;

        product.apply(update, Product::now());
        let updated = product.clone();

        self.save(connection, &products).await?;
        Ok(updated)
    }

    async fn delete_product(&self, id: i64) -> StorageResult<bool> {
        let guard = self.connection.lock().await;
        let connection = guard.as_ref().ok_or(StorageError::NotInitialized)?;

        let products = self.load(connection).await?;
        let original_len = products.len();
        let remaining: Vec<Product> = products.into_iter().filter(|p| p.id != id).collect();

        if remaining.len() == original_len {
            return Ok(false);
        }

        self.save(connection, &remaining).await?;
        Ok(true)
    }

    async fn search_products(&self, query: &str) -> StorageResult<Vec<Product>> {
        let guard = self.connection.lock().await;
        let connection = guard.as_ref().ok_or(StorageError::NotInitialized)?;

        let needle = query.to_lowercase();
        let matches = self
            .load(connection)
            .await?
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect();

        Ok(Self::sort_by_recency(matches))
    }

    async fn close(&self) -> StorageResult<()> {
        if self.connection.lock().await.take().is_some() {
            info!("Closed key-value product storage at {}", self.base_directory.display());
        }
        Ok(())
    }
}
