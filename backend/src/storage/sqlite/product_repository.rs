use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::connection::DbConnection;
use crate::domain::models::product::{NewProduct, Product, ProductUpdate};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::traits::ProductStorage;

const PRODUCT_COLUMNS: &str = "id, name, quantity, price, imageUri, createdAt, updatedAt";

/// SQLite-backed product repository
///
/// Holds no connection until `init` succeeds; `close` drops it again.
pub struct ProductRepository {
    database_path: PathBuf,
    db: RwLock<Option<DbConnection>>,
}

impl ProductRepository {
    pub fn new<P: AsRef<Path>>(database_path: P) -> Self {
        Self {
            database_path: database_path.as_ref().to_path_buf(),
            db: RwLock::new(None),
        }
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    async fn connection(&self) -> StorageResult<DbConnection> {
        self.db.read().await.clone().ok_or(StorageError::NotInitialized)
    }
}

/// Timestamps are stored as RFC 3339 text so they sort chronologically
fn parse_timestamp(value: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| StorageError::CorruptRecord(format!("invalid timestamp '{}': {}", value, e)))
}

fn product_from_row(row: &SqliteRow) -> StorageResult<Product> {
    let created_at: String = row.try_get("createdAt")?;
    let updated_at: String = row.try_get("updatedAt")?;

    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        quantity: row.try_get("quantity")?,
        price: row.try_get("price")?,
        image_uri: row.try_get("imageUri")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

#[async_trait]
impl ProductStorage for ProductRepository {
    async fn init(&self) -> StorageResult<()> {
        let mut db = self.db.write().await;
        if db.is_none() {
            *db = Some(DbConnection::open(&self.database_path).await?);
            info!("SQLite product storage ready at {}", self.database_path.display());
        }
        Ok(())
    }

    async fn list_products(&self) -> StorageResult<Vec<Product>> {
        let db = self.connection().await?;
        let rows = sqlx::query(&format!(
            "SELECT {} FROM products ORDER BY updatedAt DESC, id ASC",
            PRODUCT_COLUMNS
        ))
        .fetch_all(db.pool())
        .await?;

        rows.iter().map(product_from_row).collect()
    }

    async fn get_product(&self, id: i64) -> StorageResult<Option<Product>> {
        let db = self.connection().await?;
        let row = sqlx::query(&format!("SELECT {} FROM products WHERE id = ?", PRODUCT_COLUMNS))
            .bind(id)
            .fetch_optional(db.pool())
            .await?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn create_product(&self, product: &NewProduct) -> StorageResult<Product> {
        product.validate()?;
        let db = self.connection().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO products (name, quantity, price, imageUri)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&product.name)
        .bind(product.quantity)
        .bind(product.price)
        .bind(&product.image_uri)
        .execute(db.pool())
        .await?;

        let id = result.last_insert_rowid();
        debug!("Inserted product row {}", id);

        self.get_product(id)
            .await?
            .ok_or_else(|| StorageError::CorruptRecord(format!("created product {} could not be read back", id)))
    }

    async fn update_product(&self, update: &ProductUpdate) -> StorageResult<Product> {
        if update.is_empty() {
            return Err(StorageError::NoFieldsToUpdate);
        }
        update.validate()?;
        let db = self.connection().await?;

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE products SET ");
        {
            let mut fields = builder.separated(", ");
            if let Some(name) = &update.name {
                fields.push("name = ");
                fields.push_bind_unseparated(name.clone());
            }
            if let Some(quantity) = update.quantity {
                fields.push("quantity = ");
                fields.push_bind_unseparated(quantity);
            }
            if let Some(price) = update.price {
                fields.push("price = ");
                fields.push_bind_unseparated(price);
            }
            if let Some(image_uri) = &update.image_uri {
                fields.push("imageUri = ");
                fields.push_bind_unseparated(image_uri.clone());
            }
        }
        builder.push(" WHERE id = ");
        builder.push_bind(update.id);

        // update_products_timestamp stamps updatedAt
        let result = builder.build().execute(db.pool()).await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(update.id));
        }

        self.get_product(update.id)
            .await?
            .ok_or(StorageError::NotFound(update.id))
    }

    async fn delete_product(&self, id: i64) -> StorageResult<bool> {
        let db = self.connection().await?;
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_products(&self, query: &str) -> StorageResult<Vec<Product>> {
        // SQLite's LIKE only folds ASCII, so matching happens here with full
        // Unicode lowercasing
        let needle = query.to_lowercase();
        let products = self.list_products().await?;

        Ok(products
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect())
    }

    async fn close(&self) -> StorageResult<()> {
        if let Some(db) = self.db.write().await.take() {
            db.close().await;
            info!("Closed SQLite product storage at {}", self.database_path.display());
        }
        Ok(())
    }
}
