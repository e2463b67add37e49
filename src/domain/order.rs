use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::types::{OrderId, OrderItemId, PaymentMethod, ProductId, Quantity, UserId};

/// Billing and contact details captured from the checkout form. Optional
/// company/apartment fields default to empty strings; province and country
/// default to Ontario/Canada upstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillingAddress {
    pub full_name: String,
    pub company_name: String,
    pub street_address: String,
    pub apartment: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub phone_number: String,
    pub email_address: String,
}

/// A placed order. Created once, immutable thereafter; there is no edit or
/// cancel flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: UserId,
    pub billing: BillingAddress,
    pub payment: PaymentMethod,
    /// Snapshot of the server-side computed total at placement time.
    pub total_amount: Decimal,
    pub created_at: NaiveDateTime,
}

/// One persisted order line. Quantity and unit price are taken from the cart
/// line snapshot, independent of later product price changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub unit_price: Decimal,
}

/// Information required to persist a new [`Order`] header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrder {
    pub customer_id: UserId,
    pub billing: BillingAddress,
    pub payment: PaymentMethod,
    pub total_amount: Decimal,
    pub created_at: NaiveDateTime,
}

/// One line of a new order; the order id is assigned inside the same
/// transaction that writes the header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub unit_price: Decimal,
}
