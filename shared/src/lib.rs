use serde::{Deserialize, Serialize};

/// A product record as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identifier
    pub id: i64,
    pub name: String,
    /// Units in stock (never negative)
    pub quantity: i64,
    /// Unit price (never negative)
    pub price: f64,
    /// Opaque reference to an externally stored image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    /// Human-readable timestamp (RFC 3339, UTC)
    pub created_at: String,
    /// Human-readable timestamp (RFC 3339, UTC), refreshed on every mutation
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    #[serde(default)]
    pub image_uri: Option<String>,
}

/// Partial update: fields left out are not changed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image_uri: Option<String>,
}

/// Query string for `GET /api/products`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSearchQuery {
    /// Case-insensitive substring of the product name
    pub q: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub product: Product,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProductResponse {
    pub deleted: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Storage backend chosen at startup ("sqlite" or "kv")
    pub backend: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_uses_camel_case_fields() {
        let product = Product {
            id: 7,
            name: "SSD Kingston NV2 1TB".to_string(),
            quantity: 18,
            price: 329.9,
            image_uri: Some("file://ssd.png".to_string()),
            created_at: "2025-01-01T10:00:00.000Z".to_string(),
            updated_at: "2025-01-01T10:00:00.000Z".to_string(),
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["imageUri"], "file://ssd.png");
        assert_eq!(json["createdAt"], "2025-01-01T10:00:00.000Z");
        assert!(json.get("image_uri").is_none());
    }

    #[test]
    fn test_update_request_missing_fields_are_none() {
        let request: UpdateProductRequest = serde_json::from_str(r#"{"quantity": 5}"#).unwrap();
        assert_eq!(request.quantity, Some(5));
        assert_eq!(request.name, None);
        assert_eq!(request.price, None);
        assert_eq!(request.image_uri, None);
    }
}
