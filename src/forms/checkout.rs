//! Checkout form bindings: the billing/payment form shared by the cart and
//! single-item flows, and the mock bank-details form.

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::order::BillingAddress;
use crate::domain::types::{OrderId, PaymentMethod, TypeConstraintError};

#[derive(Debug, Error)]
pub enum CheckoutFormError {
    #[error("Checkout form validation failed: {0}")]
    Validation(String),
    #[error("Checkout form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CheckoutFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CheckoutFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

/// Billing details posted at checkout. Company and apartment are optional;
/// province and country fall back to Ontario/Canada when blank.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckoutForm {
    #[validate(length(min = 1, message = "Full name is required."))]
    pub full_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[validate(length(min = 1, message = "Street address is required."))]
    pub street_address: String,
    #[serde(default)]
    pub apartment: Option<String>,
    #[validate(length(min = 1, message = "City is required."))]
    pub city: String,
    #[serde(default)]
    pub province: String,
    #[validate(length(min = 1, message = "Postal code is required."))]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[validate(length(min = 1, message = "Phone number is required."))]
    pub phone_number: String,
    #[validate(email(message = "Invalid email format."))]
    pub email_address: String,
    #[validate(range(min = 1, max = 2, message = "Please select a payment method."))]
    pub payment_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutPayload {
    pub payment: PaymentMethod,
    pub billing: BillingAddress,
}

fn or_default(value: String, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

impl TryFrom<CheckoutForm> for CheckoutPayload {
    type Error = CheckoutFormError;

    fn try_from(value: CheckoutForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            payment: PaymentMethod::try_from(value.payment_id)?,
            billing: BillingAddress {
                full_name: value.full_name.trim().to_string(),
                company_name: value.company_name.unwrap_or_default().trim().to_string(),
                street_address: value.street_address.trim().to_string(),
                apartment: value.apartment.unwrap_or_default().trim().to_string(),
                city: value.city.trim().to_string(),
                province: or_default(value.province, "Ontario"),
                postal_code: value.postal_code.trim().to_string(),
                country: or_default(value.country, "Canada"),
                phone_number: value.phone_number.trim().to_string(),
                email_address: value.email_address.trim().to_string(),
            },
        })
    }
}

/// Mock bank-transfer details collected after a bank order is placed. The
/// numbers are validated for presence and then discarded; nothing is
/// processed.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BankDetailsForm {
    #[validate(range(min = 1))]
    pub order_id: i32,
    #[validate(length(min = 1, message = "Account holder name is required."))]
    pub account_holder_name: String,
    #[validate(length(min = 1, message = "Bank name is required."))]
    pub bank_name: String,
    #[validate(length(min = 1, message = "Account number is required."))]
    pub account_number: String,
    #[validate(length(min = 1, message = "Transit number is required."))]
    pub transit_number: String,
    #[validate(length(min = 1, message = "Institution number is required."))]
    pub institution_number: String,
    #[serde(default)]
    pub swift_iban: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BankDetailsPayload {
    pub order_id: OrderId,
}

impl TryFrom<BankDetailsForm> for BankDetailsPayload {
    type Error = CheckoutFormError;

    fn try_from(value: BankDetailsForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            order_id: OrderId::new(value.order_id)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CheckoutForm {
        CheckoutForm {
            full_name: "Ada Lovelace".into(),
            company_name: None,
            street_address: "1 Main St".into(),
            apartment: None,
            city: "Toronto".into(),
            province: String::new(),
            postal_code: "M5V 1A1".into(),
            country: String::new(),
            phone_number: "555-0100".into(),
            email_address: "ada@example.com".into(),
            payment_id: 1,
        }
    }

    #[test]
    fn applies_defaults_for_optional_fields() {
        let payload: CheckoutPayload = form().try_into().unwrap();
        assert_eq!(payload.payment, PaymentMethod::Bank);
        assert_eq!(payload.billing.company_name, "");
        assert_eq!(payload.billing.apartment, "");
        assert_eq!(payload.billing.province, "Ontario");
        assert_eq!(payload.billing.country, "Canada");
    }

    #[test]
    fn rejects_missing_required_fields() {
        let mut bad = form();
        bad.full_name = String::new();
        assert!(CheckoutPayload::try_from(bad).is_err());

        let mut bad = form();
        bad.email_address = "not-an-email".into();
        assert!(CheckoutPayload::try_from(bad).is_err());

        let mut bad = form();
        bad.payment_id = 7;
        assert!(CheckoutPayload::try_from(bad).is_err());
    }

    #[test]
    fn keeps_submitted_province() {
        let mut f = form();
        f.province = "Quebec".into();
        let payload: CheckoutPayload = f.try_into().unwrap();
        assert_eq!(payload.billing.province, "Quebec");
    }
}
