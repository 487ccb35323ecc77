//! # Storage Module
//!
//! Handles product persistence for the inventory tracker.
//!
//! Two interchangeable backends implement the `ProductStorage` trait:
//!
//! - **sqlite** - relational table with an auto-increment id and a trigger
//!   that stamps `updatedAt`
//! - **kv** - a flat key/value surface holding the whole collection as one
//!   JSON array
//!
//! `ProductStore` picks one of them at startup and is the only storage
//! object the rest of the application sees.

pub mod error;
pub mod kv;
pub mod selector;
pub mod sqlite;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use kv::KvProductRepository;
pub use selector::{BackendKind, ProductStore, RuntimeCapabilities};
pub use sqlite::SqliteProductRepository;
pub use traits::ProductStorage;
