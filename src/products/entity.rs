//! Product entity and its field validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProductError {
    #[error("id is required")]
    IdRequired,
    #[error("invalid id")]
    InvalidId,
    #[error("name is required")]
    NameRequired,
    #[error("price is required")]
    PriceRequired,
    #[error("invalid price")]
    InvalidPrice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn create(name: &str, price: f64) -> Result<Self, ProductError> {
        let product = Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            price,
            created_at: Utc::now(),
        };
        product.validate()?;
        Ok(product)
    }

    /// Rebuild a product from stored columns, re-running validation.
    pub fn from_parts(
        id: &str,
        name: String,
        price: f64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ProductError> {
        if id.is_empty() {
            return Err(ProductError::IdRequired);
        }
        let id = Uuid::parse_str(id).map_err(|_| ProductError::InvalidId)?;

        let product = Self {
            id,
            name,
            price,
            created_at,
        };
        product.validate()?;
        Ok(product)
    }

    pub fn validate(&self) -> Result<(), ProductError> {
        if self.id.is_nil() {
            return Err(ProductError::IdRequired);
        }
        if self.name.is_empty() {
            return Err(ProductError::NameRequired);
        }
        // Zero counts as missing; only negative prices are "invalid".
        if self.price == 0.0 {
            return Err(ProductError::PriceRequired);
        }
        if self.price < 0.0 || self.price.is_nan() {
            return Err(ProductError::InvalidPrice);
        }
        Ok(())
    }

    /// Replace name and price. Leaves the product untouched if the new values are invalid.
    pub fn update(&mut self, name: &str, price: f64) -> Result<(), ProductError> {
        let candidate = Self {
            name: name.to_string(),
            price,
            ..self.clone()
        };
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_valid_product() {
        let product = Product::create("Notebook", 10.5).unwrap();

        assert!(!product.id.is_nil());
        assert_eq!(product.name, "Notebook");
        assert_eq!(product.price, 10.5);
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_create_many_valid_products() {
        for (i, price) in [0.01, 1.0, 99.99, 1e9, f64::MAX].into_iter().enumerate() {
            let name = format!("product-{i}");
            let product = Product::create(&name, price).unwrap();
            assert_eq!(product.validate(), Ok(()));
        }
    }

    #[test]
    fn test_name_required() {
        assert_eq!(Product::create("", 10.0), Err(ProductError::NameRequired));
    }

    #[test]
    fn test_zero_price_is_required_negative_is_invalid() {
        assert_eq!(Product::create("Pen", 0.0), Err(ProductError::PriceRequired));
        assert_eq!(Product::create("Pen", -0.0), Err(ProductError::PriceRequired));
        assert_eq!(Product::create("Pen", -1.0), Err(ProductError::InvalidPrice));
        assert_eq!(Product::create("Pen", -0.01), Err(ProductError::InvalidPrice));
        assert_eq!(
            Product::create("Pen", f64::NAN),
            Err(ProductError::InvalidPrice)
        );
    }

    #[test]
    fn test_nil_id_is_required() {
        let mut product = Product::create("Pen", 1.0).unwrap();
        product.id = Uuid::nil();
        assert_eq!(product.validate(), Err(ProductError::IdRequired));
    }

    #[test]
    fn test_from_parts_checks_id() {
        let now = Utc::now();
        assert_eq!(
            Product::from_parts("", "Pen".into(), 1.0, now),
            Err(ProductError::IdRequired)
        );
        assert_eq!(
            Product::from_parts("not-a-uuid", "Pen".into(), 1.0, now),
            Err(ProductError::InvalidId)
        );

        let id = Uuid::new_v4();
        let product = Product::from_parts(&id.to_string(), "Pen".into(), 1.0, now).unwrap();
        assert_eq!(product.id, id);
        assert_eq!(product.created_at, now);
    }

    #[test]
    fn test_from_parts_detects_corrupt_fields() {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        assert_eq!(
            Product::from_parts(&id, String::new(), 1.0, now),
            Err(ProductError::NameRequired)
        );
        assert_eq!(
            Product::from_parts(&id, "Pen".into(), -3.0, now),
            Err(ProductError::InvalidPrice)
        );
    }

    #[test]
    fn test_update_keeps_identity() {
        let mut product = Product::create("Pen", 1.0).unwrap();
        let id = product.id;
        let created_at = product.created_at;

        product.update("Fountain Pen", 25.0).unwrap();

        assert_eq!(product.id, id);
        assert_eq!(product.created_at, created_at);
        assert_eq!(product.name, "Fountain Pen");
        assert_eq!(product.price, 25.0);
    }

    #[test]
    fn test_invalid_update_leaves_product_untouched() {
        let mut product = Product::create("Pen", 1.0).unwrap();

        assert_eq!(product.update("", 5.0), Err(ProductError::NameRequired));
        assert_eq!(product.update("Pen", 0.0), Err(ProductError::PriceRequired));
        assert_eq!(product.update("Pen", -5.0), Err(ProductError::InvalidPrice));

        assert_eq!(product.name, "Pen");
        assert_eq!(product.price, 1.0);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ProductError::IdRequired.to_string(), "id is required");
        assert_eq!(ProductError::InvalidId.to_string(), "invalid id");
        assert_eq!(ProductError::NameRequired.to_string(), "name is required");
        assert_eq!(ProductError::PriceRequired.to_string(), "price is required");
        assert_eq!(ProductError::InvalidPrice.to_string(), "invalid price");
    }
}
