use std::collections::HashMap;

use crate::db::{DbConnection, DbPool};
use crate::domain::order::{NewOrder, NewOrderItem, Order, OrderItem};
use crate::domain::product::{NewProduct, Product};
use crate::domain::types::{EmailAddress, FullName, OrderId, ProductId, UserId};
use crate::domain::user::{NewUser, User};

pub mod errors;
pub mod order;
pub mod product;
#[cfg(test)]
pub mod test;
pub mod user;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Catalog ordering applied when listing products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductOrder {
    /// Insertion order (ascending id).
    #[default]
    IdAsc,
    NewestFirst,
    OldestFirst,
    MostReviewed,
}

/// Query parameters used when listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Ordering applied before limits.
    pub order: ProductOrder,
    /// Skip this many rows after ordering.
    pub skip: Option<i64>,
    /// Return at most this many rows.
    pub take: Option<i64>,
    /// Exclude a single product, e.g. the one currently displayed.
    pub exclude: Option<ProductId>,
}

impl ProductListQuery {
    pub fn newest_first(mut self) -> Self {
        self.order = ProductOrder::NewestFirst;
        self
    }
    pub fn oldest_first(mut self) -> Self {
        self.order = ProductOrder::OldestFirst;
        self
    }
    pub fn most_reviewed(mut self) -> Self {
        self.order = ProductOrder::MostReviewed;
        self
    }
    pub fn skip(mut self, n: i64) -> Self {
        self.skip = Some(n);
        self
    }
    pub fn take(mut self, n: i64) -> Self {
        self.take = Some(n);
        self
    }
    pub fn exclude(mut self, id: ProductId) -> Self {
        self.exclude = Some(id);
        self
    }
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List products matching the supplied query parameters.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
    /// Retrieve a batch of products keyed by identifier; missing ids are
    /// simply absent from the map.
    fn get_products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> RepositoryResult<HashMap<ProductId, Product>>;
}

/// Write operations for product entities.
pub trait ProductWriter {
    /// Persist a new product, returning the stored row.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    /// Overwrite an existing product's editable fields.
    fn update_product(&self, id: ProductId, product: &NewProduct) -> RepositoryResult<usize>;
    /// Delete a product by id.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize>;
}

/// Read-only operations for user entities.
pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
}

/// Write operations for user entities.
pub trait UserWriter {
    /// Persist a new user, returning the stored row.
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
    /// Update name and email.
    fn update_user_profile(
        &self,
        id: UserId,
        full_name: &FullName,
        email: &EmailAddress,
    ) -> RepositoryResult<usize>;
    /// Replace the stored password hash.
    fn update_user_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<usize>;
}

/// Read-only operations for order entities.
pub trait OrderReader {
    fn get_order_by_id(&self, id: OrderId) -> RepositoryResult<Option<Order>>;
    fn list_orders_by_customer(&self, customer_id: UserId) -> RepositoryResult<Vec<Order>>;
    fn list_order_items(&self, order_id: OrderId) -> RepositoryResult<Vec<OrderItem>>;
}

/// Write operations for order entities.
pub trait OrderWriter {
    /// Persist an order header and all of its line items in a single
    /// transaction: either everything is stored or nothing is.
    fn create_order(&self, order: &NewOrder, items: &[NewOrderItem]) -> RepositoryResult<Order>;
}
