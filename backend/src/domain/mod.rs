//! # Domain Module
//!
//! Business logic for the inventory tracker: the product model, validation
//! rules, the product service, and sample-data seeding. It works against the
//! `ProductStorage` abstraction and knows nothing about HTTP.

pub mod models;
pub mod product_service;
pub mod sample_data;

pub use product_service::ProductService;
