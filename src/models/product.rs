use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::domain::types::{DiscountPercent, Price, ProductName, TypeConstraintError};
use crate::models::{decimal_from_db, decimal_to_db};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub discount_percent: Option<f64>,
    pub discounted_price: Option<f64>,
    pub stock_qty: i32,
    pub image_url: Option<String>,
    pub avg_rating: f64,
    pub review_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Product`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub discount_percent: Option<f64>,
    pub discounted_price: Option<f64>,
    pub stock_qty: i32,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset applied on product updates; `created_at` is left untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct ProductChangeset {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub discount_percent: Option<f64>,
    pub discounted_price: Option<f64>,
    pub stock_qty: i32,
    pub image_url: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.try_into()?,
            name: ProductName::new(product.name)?,
            description: product.description,
            price: Price::new(decimal_from_db(product.price, "price")?)?,
            discount_percent: product
                .discount_percent
                .map(|pct| {
                    decimal_from_db(pct, "discount_percent").and_then(DiscountPercent::new)
                })
                .transpose()?,
            discounted_price: product
                .discounted_price
                .map(|p| decimal_from_db(p, "discounted_price").and_then(Price::new))
                .transpose()?,
            stock_qty: product.stock_qty,
            image_url: product.image_url,
            avg_rating: decimal_from_db(product.avg_rating, "avg_rating")?,
            review_count: product.review_count,
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

impl From<DomainNewProduct> for NewProduct {
    fn from(product: DomainNewProduct) -> Self {
        Self {
            name: product.name.into_inner(),
            description: product.description,
            price: decimal_to_db(product.price.get()),
            discount_percent: product.discount_percent.map(|p| decimal_to_db(p.get())),
            discounted_price: product.discounted_price.map(|p| decimal_to_db(p.get())),
            stock_qty: product.stock_qty,
            image_url: product.image_url,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<DomainNewProduct> for ProductChangeset {
    fn from(product: DomainNewProduct) -> Self {
        Self {
            name: product.name.into_inner(),
            description: product.description,
            price: decimal_to_db(product.price.get()),
            discount_percent: product.discount_percent.map(|p| decimal_to_db(p.get())),
            discounted_price: product.discounted_price.map(|p| decimal_to_db(p.get())),
            stock_qty: product.stock_qty,
            image_url: product.image_url,
            updated_at: product.updated_at,
        }
    }
}
