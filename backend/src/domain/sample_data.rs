use tracing::info;

use crate::domain::models::product::NewProduct;
use crate::storage::{ProductStorage, StorageResult};

fn sample(name: &str, quantity: i64, price: f64) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        quantity,
        price,
        image_uri: None,
    }
}

/// Fixed catalogue used to populate an empty store
pub fn sample_products() -> Vec<NewProduct> {
    vec![
        sample("Smartphone Samsung Galaxy S23", 15, 2599.99),
        sample("Notebook Dell Inspiron 15", 8, 3299.90),
        sample("Fone de Ouvido Sony WH-1000XM4", 0, 899.99),
        sample("Tablet Apple iPad Air", 3, 4199.00),
        sample("Teclado Mecânico Logitech G Pro", 25, 549.90),
        sample("Mouse Gamer Razer DeathAdder V3", 12, 299.99),
        sample("Monitor LG UltraWide 29\"", 4, 1299.00),
        sample("SSD Kingston NV2 1TB", 18, 329.90),
    ]
}

/// Create the sample products if, and only if, the store is empty.
/// Returns how many products were added.
pub async fn populate_sample_data<S>(store: &S) -> StorageResult<usize>
where
    S: ProductStorage + ?Sized,
{
    let existing = store.list_products().await?;
    if !existing.is_empty() {
        info!("Store already has {} products, skipping sample data", existing.len());
        return Ok(0);
    }

    info!("Populating store with sample data");
    let products = sample_products();
    for product in &products {
        store.create_product(product).await?;
    }

    info!("Added {} sample products", products.len());
    Ok(products.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::KvProductRepository;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_populate_only_once() {
        let temp_dir = TempDir::new().unwrap();
        let repo = KvProductRepository::new(temp_dir.path());
        repo.init().await.unwrap();

        assert_eq!(populate_sample_data(&repo).await.unwrap(), 8);
        assert_eq!(populate_sample_data(&repo).await.unwrap(), 0);
        assert_eq!(repo.list_products().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_populate_skips_non_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let repo = KvProductRepository::new(temp_dir.path());
        repo.init().await.unwrap();
        repo.create_product(&sample("Widget", 1, 1.0)).await.unwrap();

        assert_eq!(populate_sample_data(&repo).await.unwrap(), 0);
        assert_eq!(repo.list_products().await.unwrap().len(), 1);
    }

    #[test]
    fn test_sample_products_are_valid() {
        for product in sample_products() {
            assert!(!product.name.trim().is_empty());
            assert!(product.quantity >= 0);
            assert!(product.price >= 0.0);
        }
    }
}
