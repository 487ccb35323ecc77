use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Longest product name accepted by the service layer
pub const MAX_NAME_LENGTH: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Current time at the precision timestamps are persisted with
    pub fn now() -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }

    /// Apply the fields present in `update`, leaving the rest untouched.
    /// `updated_at` is refreshed even when no value actually changes.
    pub fn apply(&mut self, update: &ProductUpdate, now: DateTime<Utc>) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(image_uri) = &update.image_uri {
            self.image_uri = Some(image_uri.clone());
        }
        self.updated_at = now.max(self.created_at);
    }
}

/// Payload for creating a product; the store assigns id and timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub image_uri: Option<String>,
}

impl NewProduct {
    /// Check every field against the product invariants
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        validate_name(&self.name)?;
        validate_quantity(self.quantity)?;
        validate_price(self.price)
    }
}

/// Partial update of an existing product
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub id: i64,
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub image_uri: Option<String>,
}

impl ProductUpdate {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// True when the payload carries nothing besides the id
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
            && self.image_uri.is_none()
    }

    /// Check the supplied fields; absent ones are not looked at
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ProductValidationError {
    #[error("Product name cannot be empty")]
    EmptyName,
    #[error("Product name cannot exceed 200 characters")]
    NameTooLong,
    #[error("Quantity must be zero or greater")]
    NegativeQuantity,
    #[error("Price must be a finite number")]
    InvalidPrice,
    #[error("Price must be zero or greater")]
    NegativePrice,
}

pub fn validate_name(name: &str) -> Result<(), ProductValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ProductValidationError::EmptyName);
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ProductValidationError::NameTooLong);
    }
    Ok(())
}

pub fn validate_quantity(quantity: i64) -> Result<(), ProductValidationError> {
    if quantity < 0 {
        return Err(ProductValidationError::NegativeQuantity);
    }
    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), ProductValidationError> {
    if !price.is_finite() {
        return Err(ProductValidationError::InvalidPrice);
    }
    if price < 0.0 {
        return Err(ProductValidationError::NegativePrice);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn widget() -> Product {
        let created = Product::now();
        Product {
            id: 1,
            name: "Widget".to_string(),
            quantity: 10,
            price: 9.99,
            image_uri: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_apply_changes_only_supplied_fields() {
        let mut product = widget();
        let later = product.created_at + Duration::milliseconds(5);

        let update = ProductUpdate {
            quantity: Some(5),
            ..ProductUpdate::new(1)
        };
        product.apply(&update, later);

        assert_eq!(product.quantity, 5);
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, 9.99);
        assert_eq!(product.image_uri, None);
        assert_eq!(product.updated_at, later);
    }

    #[test]
    fn test_apply_never_moves_updated_at_before_created_at() {
        let mut product = widget();
        let earlier = product.created_at - Duration::seconds(10);

        product.apply(&ProductUpdate::new(1), earlier);
        assert_eq!(product.updated_at, product.created_at);
    }

    #[test]
    fn test_update_is_empty() {
        assert!(ProductUpdate::new(3).is_empty());

        let update = ProductUpdate {
            image_uri: Some("file://x.png".to_string()),
            ..ProductUpdate::new(3)
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_validation_rules() {
        assert_eq!(validate_name("   "), Err(ProductValidationError::EmptyName));
        assert_eq!(
            validate_name(&"x".repeat(MAX_NAME_LENGTH + 1)),
            Err(ProductValidationError::NameTooLong)
        );
        assert!(validate_name(" Mouse ").is_ok());

        assert_eq!(validate_quantity(-1), Err(ProductValidationError::NegativeQuantity));
        assert!(validate_quantity(0).is_ok());

        assert_eq!(validate_price(f64::NAN), Err(ProductValidationError::InvalidPrice));
        assert_eq!(validate_price(-0.01), Err(ProductValidationError::NegativePrice));
        assert!(validate_price(0.0).is_ok());
    }

    #[test]
    fn test_payload_validation() {
        let bad = NewProduct {
            name: "Bad".to_string(),
            quantity: 1,
            price: f64::INFINITY,
            image_uri: None,
        };
        assert_eq!(bad.validate(), Err(ProductValidationError::InvalidPrice));

        let update = ProductUpdate {
            quantity: Some(-5),
            ..ProductUpdate::new(1)
        };
        assert_eq!(update.validate(), Err(ProductValidationError::NegativeQuantity));

        let image_only = ProductUpdate {
            image_uri: Some("file://x.png".to_string()),
            ..ProductUpdate::new(1)
        };
        assert!(image_only.validate().is_ok());
    }
}
