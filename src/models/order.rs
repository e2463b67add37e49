use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::{
    BillingAddress, NewOrder as DomainNewOrder, Order as DomainOrder,
    OrderItem as DomainOrderItem,
};
use crate::domain::types::{Quantity, TypeConstraintError};
use crate::models::{decimal_from_db, decimal_to_db};

/// Diesel model representing the `orders` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub customer_id: i32,
    pub billing_name: String,
    pub company_name: String,
    pub street_address: String,
    pub apartment: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub phone_number: String,
    pub email_address: String,
    pub payment_id: i32,
    pub total_amount: f64,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Order`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder {
    pub customer_id: i32,
    pub billing_name: String,
    pub company_name: String,
    pub street_address: String,
    pub apartment: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub phone_number: String,
    pub email_address: String,
    pub payment_id: i32,
    pub total_amount: f64,
    pub created_at: NaiveDateTime,
}

/// Diesel model representing the `order_items` table.
#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Order))]
#[diesel(table_name = crate::schema::order_items)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: f64,
}

/// Insertable form of [`OrderItem`]; the order id is assigned inside the
/// order-placement transaction.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: f64,
}

impl TryFrom<Order> for DomainOrder {
    type Error = TypeConstraintError;

    fn try_from(order: Order) -> Result<Self, Self::Error> {
        Ok(Self {
            id: order.id.try_into()?,
            customer_id: order.customer_id.try_into()?,
            billing: BillingAddress {
                full_name: order.billing_name,
                company_name: order.company_name,
                street_address: order.street_address,
                apartment: order.apartment,
                city: order.city,
                province: order.province,
                postal_code: order.postal_code,
                country: order.country,
                phone_number: order.phone_number,
                email_address: order.email_address,
            },
            payment: order.payment_id.try_into()?,
            total_amount: decimal_from_db(order.total_amount, "total_amount")?,
            created_at: order.created_at,
        })
    }
}

impl From<DomainNewOrder> for NewOrder {
    fn from(order: DomainNewOrder) -> Self {
        Self {
            customer_id: order.customer_id.get(),
            billing_name: order.billing.full_name,
            company_name: order.billing.company_name,
            street_address: order.billing.street_address,
            apartment: order.billing.apartment,
            city: order.billing.city,
            province: order.billing.province,
            postal_code: order.billing.postal_code,
            country: order.billing.country,
            phone_number: order.billing.phone_number,
            email_address: order.billing.email_address,
            payment_id: order.payment.id(),
            total_amount: decimal_to_db(order.total_amount),
            created_at: order.created_at,
        }
    }
}

impl TryFrom<OrderItem> for DomainOrderItem {
    type Error = TypeConstraintError;

    fn try_from(item: OrderItem) -> Result<Self, Self::Error> {
        Ok(Self {
            id: item.id.try_into()?,
            order_id: item.order_id.try_into()?,
            product_id: item.product_id.try_into()?,
            quantity: Quantity::clamp(item.quantity),
            unit_price: decimal_from_db(item.unit_price, "unit_price")?,
        })
    }
}
