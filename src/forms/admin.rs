//! Admin product CRUD form bindings.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::pricing::discounted_price_for;
use crate::domain::product::NewProduct;
use crate::domain::types::{DiscountPercent, Price, ProductName, TypeConstraintError};

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("Product form validation failed: {0}")]
    Validation(String),
    #[error("Product form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

fn decimal_field(value: f64, field: &'static str) -> Result<Decimal, ProductFormError> {
    Decimal::from_f64(value).ok_or_else(|| {
        ProductFormError::TypeConstraint(format!("{field} is not a valid number"))
    })
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Create/edit form for a catalog product.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductForm {
    #[validate(length(min = 1, max = 100, message = "Product name is required."))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative."))]
    pub price: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "Discount must be between 0 and 100."))]
    #[serde(default, deserialize_with = "crate::forms::empty_string_as_none")]
    pub discount_percent: Option<f64>,
    #[validate(range(min = 0, message = "Stock cannot be negative."))]
    #[serde(default)]
    pub stock_qty: i32,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductFormPayload {
    pub name: ProductName,
    pub description: Option<String>,
    pub price: Price,
    pub discount_percent: Option<DiscountPercent>,
    pub stock_qty: i32,
    pub image_url: Option<String>,
}

impl ProductFormPayload {
    /// Build the insertable product. The discounted price is derived here,
    /// at write time, so it can never drift from `price` and
    /// `discount_percent`.
    pub fn into_new_product(self) -> NewProduct {
        let now = Utc::now().naive_utc();
        let discounted_price = discounted_price_for(self.price, self.discount_percent);
        NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            discount_percent: self.discount_percent,
            discounted_price,
            stock_qty: self.stock_qty,
            image_url: self.image_url,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<ProductForm> for ProductFormPayload {
    type Error = ProductFormError;

    fn try_from(value: ProductForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: ProductName::new(value.name)?,
            description: blank_to_none(value.description),
            price: Price::new(decimal_field(value.price, "price")?)?,
            discount_percent: value
                .discount_percent
                .map(|pct| -> Result<DiscountPercent, ProductFormError> {
                    Ok(DiscountPercent::new(decimal_field(pct, "discount percent")?)?)
                })
                .transpose()?,
            stock_qty: value.stock_qty,
            image_url: blank_to_none(value.image_url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn form() -> ProductForm {
        ProductForm {
            name: "USB Hub".into(),
            description: Some("  7 ports  ".into()),
            price: 49.99,
            discount_percent: Some(20.0),
            stock_qty: 12,
            image_url: Some(String::new()),
        }
    }

    #[test]
    fn derives_discounted_price_at_write_time() {
        let payload: ProductFormPayload = form().try_into().unwrap();
        let new_product = payload.into_new_product();
        assert_eq!(new_product.price.get(), dec!(49.99));
        assert_eq!(
            new_product.discounted_price.unwrap().get(),
            dec!(39.99)
        );
    }

    #[test]
    fn no_discount_means_no_discounted_price() {
        let mut f = form();
        f.discount_percent = None;
        let payload: ProductFormPayload = f.try_into().unwrap();
        assert_eq!(payload.clone().into_new_product().discounted_price, None);

        let mut f = form();
        f.discount_percent = Some(0.0);
        let payload: ProductFormPayload = f.try_into().unwrap();
        assert_eq!(payload.into_new_product().discounted_price, None);
    }

    #[test]
    fn normalizes_blank_optional_strings() {
        let payload: ProductFormPayload = form().try_into().unwrap();
        assert_eq!(payload.description.as_deref(), Some("7 ports"));
        assert_eq!(payload.image_url, None);
    }

    #[test]
    fn rejects_negative_price_and_oversized_discount() {
        let mut f = form();
        f.price = -1.0;
        assert!(ProductFormPayload::try_from(f).is_err());

        let mut f = form();
        f.discount_percent = Some(101.0);
        assert!(ProductFormPayload::try_from(f).is_err());
    }
}
