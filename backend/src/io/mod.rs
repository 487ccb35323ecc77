//! # IO Module
//!
//! Interface layer exposing the domain to the presentation layer.

pub mod rest;

pub use rest::product_apis::{
    create_product, delete_product, get_product, health, list_products, update_product,
};
