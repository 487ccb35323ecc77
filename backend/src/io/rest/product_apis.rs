//! # REST API for Product Management
//!
//! Endpoints for listing, searching, creating, updating, and deleting products.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{
    CreateProductRequest, DeleteProductResponse, HealthResponse, ProductSearchQuery,
    UpdateProductRequest,
};
use tracing::{error, info};

use super::mappers::ProductMapper;
use crate::domain::models::product::ProductValidationError;
use crate::storage::StorageError;
use crate::AppState;

/// Translate a service error into an HTTP status
pub fn error_status(error: &anyhow::Error) -> StatusCode {
    if error.downcast_ref::<ProductValidationError>().is_some() {
        return StatusCode::BAD_REQUEST;
    }

    match error.downcast_ref::<StorageError>() {
        Some(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
        Some(StorageError::NoFieldsToUpdate) | Some(StorageError::InvalidProduct(_)) => {
            StatusCode::BAD_REQUEST
        }
        Some(StorageError::NotInitialized) | Some(StorageError::StorageUnavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// List products, or search them when `q` is given
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductSearchQuery>,
) -> impl IntoResponse {
    info!("GET /api/products - query: {:?}", query);

    let result = match query.q.as_deref() {
        Some(q) => state.product_service.search_products(q).await,
        None => state.product_service.list_products().await,
    };

    match result {
        Ok(products) => (StatusCode::OK, Json(ProductMapper::to_product_list_dto(products))).into_response(),
        Err(e) => {
            error!("Failed to list products: {}", e);
            (error_status(&e), "Error listing products").into_response()
        }
    }
}

/// Get a product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> impl IntoResponse {
    info!("GET /api/products/{}", product_id);

    match state.product_service.get_product(product_id).await {
        Ok(Some(product)) => (StatusCode::OK, Json(ProductMapper::to_dto(product))).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Product not found").into_response(),
        Err(e) => {
            error!("Failed to get product: {}", e);
            (error_status(&e), "Error retrieving product").into_response()
        }
    }
}

/// Create a new product
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> impl IntoResponse {
    info!("POST /api/products - request: {:?}", request);

    match state.product_service.create_product(ProductMapper::to_new_product(request)).await {
        Ok(product) => (
            StatusCode::CREATED,
            Json(ProductMapper::to_product_response_dto(product, "Product created successfully")),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to create product: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Update the supplied fields of a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Json(request): Json<UpdateProductRequest>,
) -> impl IntoResponse {
    info!("PUT /api/products/{} - request: {:?}", product_id, request);

    let update = ProductMapper::to_product_update(product_id, request);
    match state.product_service.update_product(update).await {
        Ok(product) => (
            StatusCode::OK,
            Json(ProductMapper::to_product_response_dto(product, "Product updated successfully")),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to update product: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> impl IntoResponse {
    info!("DELETE /api/products/{}", product_id);

    match state.product_service.delete_product(product_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(DeleteProductResponse {
                deleted: true,
                message: "Product deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(DeleteProductResponse {
                deleted: false,
                message: format!("Product not found: {}", product_id),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to delete product: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Report which storage backend is serving requests
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        backend: state.product_service.backend_kind().to_string(),
    })
}
