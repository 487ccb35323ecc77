//! # Inventory Backend
//!
//! Persistence and service layer for a local inventory of products.
//!
//! - **Storage**: two interchangeable product stores (SQLite and a file-backed
//!   key-value store) behind one `ProductStorage` contract, plus the selector
//!   that picks one at startup
//! - **Domain**: validation, the product service, and sample data seeding
//! - **IO**: REST API consumed by the presentation layer
//!
//! ## Architecture
//!
//! ```text
//! Presentation layer
//!     ↓
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (ProductService)
//!     ↓
//! Storage Layer (ProductStore: SQLite | key-value)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::ProductService;
use crate::storage::ProductStore;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

/// Select and open the product store, then build the services on top of it
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up product storage in {}", config.storage.data_directory.display());
    let store = Arc::new(ProductStore::select(&config.storage));

    info!("Setting up domain model");
    let product_service = ProductService::new(store);
    product_service.initialize(config.seed_sample_data).await?;

    Ok(AppState { product_service })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, allowed_origin: &str) -> Result<Router> {
    let origin = allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid allowed origin: {}", allowed_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(io::health))
        .route("/products", get(io::list_products).post(io::create_product))
        .route(
            "/products/:id",
            get(io::get_product)
                .put(io::update_product)
                .delete(io::delete_product),
        );

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}
