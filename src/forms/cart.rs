//! Cart and wishlist form bindings. Raw deserialized forms are validated and
//! converted into typed payloads before any service sees them.

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{PaymentMethod, ProductId, TypeConstraintError};

/// Shared error type for the cart/wishlist forms in this module.
#[derive(Debug, Error)]
pub enum CartFormError {
    #[error("Cart form validation failed: {0}")]
    Validation(String),
    #[error("Cart form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CartFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CartFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

fn default_qty() -> i32 {
    1
}

#[derive(Deserialize, Validate)]
pub struct AddToCartForm {
    #[validate(range(min = 1))]
    pub product_id: i32,
    /// Requested quantity; the cart clamps it into [1, 10].
    #[serde(default = "default_qty")]
    pub qty: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddToCartPayload {
    pub product_id: ProductId,
    pub qty: i32,
}

impl TryFrom<AddToCartForm> for AddToCartPayload {
    type Error = CartFormError;

    fn try_from(value: AddToCartForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            product_id: ProductId::new(value.product_id)?,
            qty: value.qty,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct UpdateCartForm {
    #[validate(range(min = 1))]
    pub product_id: i32,
    pub qty: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCartPayload {
    pub product_id: ProductId,
    pub qty: i32,
}

impl TryFrom<UpdateCartForm> for UpdateCartPayload {
    type Error = CartFormError;

    fn try_from(value: UpdateCartForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            product_id: ProductId::new(value.product_id)?,
            qty: value.qty,
        })
    }
}

/// Reference to a single product, used by remove/wishlist-add style posts.
#[derive(Deserialize, Validate)]
pub struct ProductRefForm {
    #[validate(range(min = 1))]
    pub product_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductRefPayload {
    pub product_id: ProductId,
}

impl TryFrom<ProductRefForm> for ProductRefPayload {
    type Error = CartFormError;

    fn try_from(value: ProductRefForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            product_id: ProductId::new(value.product_id)?,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct MoveToCartForm {
    #[validate(range(min = 1))]
    pub product_id: i32,
    #[serde(default = "default_qty")]
    pub qty: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveToCartPayload {
    pub product_id: ProductId,
    pub qty: i32,
}

impl TryFrom<MoveToCartForm> for MoveToCartPayload {
    type Error = CartFormError;

    fn try_from(value: MoveToCartForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            product_id: ProductId::new(value.product_id)?,
            qty: value.qty,
        })
    }
}

/// Payment selection posted from the cart page before checkout.
#[derive(Deserialize, Validate)]
pub struct PaymentChoiceForm {
    #[validate(range(min = 1, max = 2))]
    pub payment_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentChoicePayload {
    pub payment: PaymentMethod,
}

impl TryFrom<PaymentChoiceForm> for PaymentChoicePayload {
    type Error = CartFormError;

    fn try_from(value: PaymentChoiceForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            payment: PaymentMethod::try_from(value.payment_id)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_to_cart_defaults_qty_to_one() {
        let form: AddToCartForm =
            serde_json::from_str(r#"{"product_id": 3}"#).unwrap();
        let payload: AddToCartPayload = form.try_into().unwrap();
        assert_eq!(payload.qty, 1);
        assert_eq!(payload.product_id.get(), 3);
    }

    #[test]
    fn add_to_cart_rejects_non_positive_product_id() {
        let form = AddToCartForm {
            product_id: 0,
            qty: 1,
        };
        assert!(AddToCartPayload::try_from(form).is_err());
    }

    #[test]
    fn payment_choice_maps_ids() {
        let form = PaymentChoiceForm { payment_id: 2 };
        let payload: PaymentChoicePayload = form.try_into().unwrap();
        assert_eq!(payload.payment, PaymentMethod::CashOnDelivery);

        let form = PaymentChoiceForm { payment_id: 9 };
        assert!(PaymentChoicePayload::try_from(form).is_err());
    }
}
