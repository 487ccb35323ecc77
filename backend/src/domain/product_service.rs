use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::domain::models::product::{
    validate_name, validate_price, validate_quantity, NewProduct, Product, ProductUpdate,
};
use crate::domain::sample_data::populate_sample_data;
use crate::storage::{BackendKind, ProductStorage, ProductStore};

/// Service for managing products in the inventory
#[derive(Clone)]
pub struct ProductService {
    store: Arc<ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<ProductStore>) -> Self {
        Self { store }
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.store.kind()
    }

    /// Open the store and, when asked, seed it with sample products.
    /// A seeding failure is logged and does not fail initialization.
    pub async fn initialize(&self, seed_sample_data: bool) -> Result<()> {
        info!("Initializing {} product storage", self.store.kind());
        self.store.init().await?;

        if seed_sample_data {
            if let Err(e) = populate_sample_data(self.store.as_ref()).await {
                error!("Error populating sample data: {}", e);
            }
        }

        Ok(())
    }

    /// List all products, most recently touched first
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        info!("Listing all products");

        let products = self.store.list_products().await?;

        info!("Found {} products", products.len());
        Ok(products)
    }

    /// Get a product by ID
    pub async fn get_product(&self, id: i64) -> Result<Option<Product>> {
        info!("Getting product: {}", id);

        let product = self.store.get_product(id).await?;
        if product.is_none() {
            warn!("Product not found: {}", id);
        }

        Ok(product)
    }

    /// Create a new product
    pub async fn create_product(&self, product: NewProduct) -> Result<Product> {
        info!("Creating product: name={}, quantity={}, price={}", product.name, product.quantity, product.price);

        validate_name(&product.name)?;
        validate_quantity(product.quantity)?;
        validate_price(product.price)?;

        let product = NewProduct {
            name: product.name.trim().to_string(),
            image_uri: product.image_uri.filter(|uri| !uri.trim().is_empty()),
            ..product
        };

        let created = self.store.create_product(&product).await?;

        info!("Created product: {} with ID: {}", created.name, created.id);
        Ok(created)
    }

    /// Update the supplied fields of an existing product
    pub async fn update_product(&self, update: ProductUpdate) -> Result<Product> {
        info!("Updating product: {}", update.id);

        if let Some(name) = &update.name {
            validate_name(name)?;
        }
        if let Some(quantity) = update.quantity {
            validate_quantity(quantity)?;
        }
        if let Some(price) = update.price {
            validate_price(price)?;
        }

        let update = ProductUpdate {
            name: update.name.map(|name| name.trim().to_string()),
            ..update
        };

        let updated = self.store.update_product(&update).await?;

        info!("Updated product: {} with ID: {}", updated.name, updated.id);
        Ok(updated)
    }

    /// Delete a product; false when it did not exist
    pub async fn delete_product(&self, id: i64) -> Result<bool> {
        info!("Deleting product: {}", id);

        let deleted = self.store.delete_product(id).await?;
        if deleted {
            info!("Deleted product: {}", id);
        } else {
            warn!("Product not found for delete: {}", id);
        }

        Ok(deleted)
    }

    /// Search by name. A blank query lists everything.
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_products().await;
        }

        info!("Searching products: '{}'", query);
        let products = self.store.search_products(query).await?;

        info!("Search '{}' matched {} products", query, products.len());
        Ok(products)
    }

    pub async fn close(&self) -> Result<()> {
        info!("Closing product storage");
        self.store.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackendPreference, StorageConfig};
    use crate::domain::models::product::ProductValidationError;
    use crate::storage::StorageError;
    use tempfile::TempDir;

    async fn setup_service(backend: BackendPreference, seed: bool) -> (ProductService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::new(backend, temp_dir.path());
        let service = ProductService::new(Arc::new(ProductStore::select(&config)));
        service.initialize(seed).await.expect("Failed to initialize service");
        (service, temp_dir)
    }

    fn widget() -> NewProduct {
        NewProduct {
            name: "  Widget  ".to_string(),
            quantity: 10,
            price: 9.99,
            image_uri: Some(String::new()),
        }
    }

    #[tokio::test]
    async fn test_initialize_seeds_once() {
        let (service, temp_dir) = setup_service(BackendPreference::Sqlite, true).await;
        assert_eq!(service.list_products().await.unwrap().len(), 8);
        service.close().await.unwrap();

        let config = StorageConfig::new(BackendPreference::Sqlite, temp_dir.path());
        let reopened = ProductService::new(Arc::new(ProductStore::select(&config)));
        reopened.initialize(true).await.unwrap();
        assert_eq!(reopened.list_products().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_create_normalizes_input() {
        let (service, _temp_dir) = setup_service(BackendPreference::KeyValue, false).await;

        let created = service.create_product(widget()).await.unwrap();
        assert_eq!(created.name, "Widget");
        assert_eq!(created.image_uri, None);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_products() {
        let (service, _temp_dir) = setup_service(BackendPreference::KeyValue, false).await;

        let err = service
            .create_product(NewProduct { name: " ".to_string(), ..widget() })
            .await
            .unwrap_err();
        assert_eq!(err.downcast_ref::<ProductValidationError>(), Some(&ProductValidationError::EmptyName));

        let err = service
            .create_product(NewProduct { price: -1.0, ..widget() })
            .await
            .unwrap_err();
        assert_eq!(err.downcast_ref::<ProductValidationError>(), Some(&ProductValidationError::NegativePrice));

        assert!(service.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_validates_supplied_fields() {
        let (service, _temp_dir) = setup_service(BackendPreference::Sqlite, false).await;
        let created = service.create_product(widget()).await.unwrap();

        let bad = ProductUpdate {
            quantity: Some(-3),
            ..ProductUpdate::new(created.id)
        };
        let err = service.update_product(bad).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ProductValidationError>(),
            Some(&ProductValidationError::NegativeQuantity)
        );

        let rename = ProductUpdate {
            name: Some(" Gadget ".to_string()),
            ..ProductUpdate::new(created.id)
        };
        assert_eq!(service.update_product(rename).await.unwrap().name, "Gadget");
    }

    #[tokio::test]
    async fn test_storage_errors_stay_downcastable() {
        let (service, _temp_dir) = setup_service(BackendPreference::KeyValue, false).await;

        let missing = ProductUpdate {
            price: Some(1.0),
            ..ProductUpdate::new(77)
        };
        let err = service.update_product(missing).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<StorageError>(), Some(StorageError::NotFound(77))));
    }

    #[tokio::test]
    async fn test_blank_search_lists_everything() {
        let (service, _temp_dir) = setup_service(BackendPreference::KeyValue, true).await;

        let all = service.list_products().await.unwrap();
        assert_eq!(service.search_products("   ").await.unwrap(), all);

        let found = service.search_products("  mouse ").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Mouse Gamer Razer DeathAdder V3");
    }

    #[tokio::test]
    async fn test_delete_reports_missing_products() {
        let (service, _temp_dir) = setup_service(BackendPreference::Sqlite, false).await;
        let created = service.create_product(widget()).await.unwrap();

        assert!(service.delete_product(created.id).await.unwrap());
        assert!(!service.delete_product(created.id).await.unwrap());
        assert_eq!(service.get_product(created.id).await.unwrap(), None);
    }
}
