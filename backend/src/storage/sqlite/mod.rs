//! # SQLite Storage Module
//!
//! Relational product storage through `sqlx`. Used wherever an embedded
//! relational engine is available.
//!
//! ## Components
//!
//! - **connection.rs** - pool setup and schema (table, index, timestamp trigger)
//! - **product_repository.rs** - `ProductStorage` implementation

pub mod connection;
pub mod product_repository;

pub use connection::{DbConnection, DATABASE_FILE};
pub use product_repository::ProductRepository as SqliteProductRepository;
