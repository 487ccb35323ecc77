//! # REST API Interface Layer
//!
//! HTTP endpoints the presentation layer uses to reach the product store.
//! Handlers translate between the `shared` DTOs and domain types and map
//! domain errors to status codes; they hold no business logic.

pub mod mappers;
pub mod product_apis;
