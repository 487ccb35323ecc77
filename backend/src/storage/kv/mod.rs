//! # Key-Value Storage Module
//!
//! Product storage for environments that only offer a flat, persistent
//! key/value surface. The product collection is kept as one JSON array
//! under a single key.
//!
//! ## Components
//!
//! - **connection.rs** - file-per-key string store
//! - **product_repository.rs** - `ProductStorage` implementation

pub mod connection;
pub mod product_repository;

pub use connection::KvConnection;
pub use product_repository::{ProductRepository as KvProductRepository, PRODUCTS_KEY};
