//! backend/src/io/rest/mappers/product_mapper.rs

use chrono::SecondsFormat;
use shared::{
    CreateProductRequest, Product as SharedProduct, ProductListResponse, ProductResponse,
    UpdateProductRequest,
};

use crate::domain::models::product::{NewProduct, Product as DomainProduct, ProductUpdate};

/// Mapper to convert between shared Product DTOs and domain Product models.
pub struct ProductMapper;

impl ProductMapper {
    /// Converts a domain Product model to a shared Product DTO.
    pub fn to_dto(domain: DomainProduct) -> SharedProduct {
        SharedProduct {
            id: domain.id,
            name: domain.name,
            quantity: domain.quantity,
            price: domain.price,
            image_uri: domain.image_uri,
            created_at: domain.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            updated_at: domain.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn to_new_product(request: CreateProductRequest) -> NewProduct {
        NewProduct {
            name: request.name,
            quantity: request.quantity,
            price: request.price,
            image_uri: request.image_uri,
        }
    }

    pub fn to_product_update(id: i64, request: UpdateProductRequest) -> ProductUpdate {
        ProductUpdate {
            id,
            name: request.name,
            quantity: request.quantity,
            price: request.price,
            image_uri: request.image_uri,
        }
    }

    pub fn to_product_list_dto(products: Vec<DomainProduct>) -> ProductListResponse {
        ProductListResponse {
            products: products.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_product_response_dto(product: DomainProduct, message: &str) -> ProductResponse {
        ProductResponse {
            product: Self::to_dto(product),
            success_message: message.to_string(),
        }
    }
}
