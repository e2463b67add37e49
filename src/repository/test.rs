use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::domain::order::{NewOrder, NewOrderItem, Order, OrderItem};
use crate::domain::product::{NewProduct, Product};
use crate::domain::types::{
    EmailAddress, FullName, OrderId, OrderItemId, ProductId, Quantity, UserId,
};
use crate::domain::user::{NewUser, User};
use crate::repository::{
    OrderReader, OrderWriter, ProductListQuery, ProductOrder, ProductReader, ProductWriter,
    RepositoryError, RepositoryResult, UserReader, UserWriter,
};

/// Simple in-memory repository used for unit tests.
#[derive(Default)]
pub struct TestRepository {
    products: RefCell<Vec<Product>>,
    users: RefCell<Vec<User>>,
    orders: RefCell<Vec<Order>>,
    order_items: RefCell<Vec<OrderItem>>,
    next_product_id: Cell<i32>,
    next_order_id: Cell<i32>,
    /// When set, `create_order` fails without storing anything, standing in
    /// for a rolled-back transaction.
    fail_order_creation: Cell<bool>,
}

impl TestRepository {
    pub fn new(products: Vec<Product>, users: Vec<User>) -> Self {
        let next_product_id = products.iter().map(|p| p.id.get()).max().unwrap_or(0) + 1;
        Self {
            products: RefCell::new(products),
            users: RefCell::new(users),
            orders: RefCell::new(Vec::new()),
            order_items: RefCell::new(Vec::new()),
            next_product_id: Cell::new(next_product_id),
            next_order_id: Cell::new(1),
            fail_order_creation: Cell::new(false),
        }
    }

    /// Make the next `create_order` call fail atomically.
    pub fn fail_next_order(&self) {
        self.fail_order_creation.set(true);
    }

    pub fn orders(&self) -> Vec<Order> {
        self.orders.borrow().clone()
    }

    pub fn order_items(&self) -> Vec<OrderItem> {
        self.order_items.borrow().clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.products.borrow().clone()
    }
}

impl ProductReader for TestRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>> {
        let mut items: Vec<Product> = self.products.borrow().clone();
        if let Some(exclude) = query.exclude {
            items.retain(|p| p.id != exclude);
        }
        match query.order {
            ProductOrder::IdAsc => items.sort_by_key(|p| p.id),
            ProductOrder::NewestFirst => {
                items.sort_by(|a, b| b.created_at.cmp(&a.created_at))
            }
            ProductOrder::OldestFirst => items.sort_by_key(|p| p.created_at),
            ProductOrder::MostReviewed => {
                items.sort_by(|a, b| b.review_count.cmp(&a.review_count))
            }
        }
        if let Some(skip) = query.skip {
            items = items.into_iter().skip(skip as usize).collect();
        }
        if let Some(take) = query.take {
            items.truncate(take as usize);
        }
        Ok(items)
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        Ok(self
            .products
            .borrow()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    fn get_products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> RepositoryResult<HashMap<ProductId, Product>> {
        Ok(self
            .products
            .borrow()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .map(|p| (p.id, p.clone()))
            .collect())
    }
}

impl ProductWriter for TestRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        let id = self.next_product_id.get();
        self.next_product_id.set(id + 1);
        let created = Product {
            id: ProductId::new(id).map_err(|e| RepositoryError::Validation(e.to_string()))?,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            discount_percent: product.discount_percent,
            discounted_price: product.discounted_price,
            stock_qty: product.stock_qty,
            image_url: product.image_url.clone(),
            avg_rating: rust_decimal::Decimal::ZERO,
            review_count: 0,
            created_at: product.created_at,
            updated_at: product.updated_at,
        };
        self.products.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn update_product(&self, id: ProductId, product: &NewProduct) -> RepositoryResult<usize> {
        let mut products = self.products.borrow_mut();
        match products.iter_mut().find(|p| p.id == id) {
            Some(existing) => {
                existing.name = product.name.clone();
                existing.description = product.description.clone();
                existing.price = product.price;
                existing.discount_percent = product.discount_percent;
                existing.discounted_price = product.discounted_price;
                existing.stock_qty = product.stock_qty;
                existing.image_url = product.image_url.clone();
                existing.updated_at = product.updated_at;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        let mut products = self.products.borrow_mut();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(before - products.len())
    }
}

impl UserReader for TestRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        Ok(self.users.borrow().iter().find(|u| u.id == id).cloned())
    }

    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .borrow()
            .iter()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }
}

impl UserWriter for TestRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        let id = self.users.borrow().iter().map(|u| u.id.get()).max().unwrap_or(0) + 1;
        let created = User {
            id: UserId::new(id).map_err(|e| RepositoryError::Validation(e.to_string()))?,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            created_at: user.created_at,
        };
        self.users.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn update_user_profile(
        &self,
        id: UserId,
        full_name: &FullName,
        email: &EmailAddress,
    ) -> RepositoryResult<usize> {
        let mut users = self.users.borrow_mut();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.full_name = full_name.clone();
                user.email = email.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn update_user_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<usize> {
        let mut users = self.users.borrow_mut();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl OrderReader for TestRepository {
    fn get_order_by_id(&self, id: OrderId) -> RepositoryResult<Option<Order>> {
        Ok(self.orders.borrow().iter().find(|o| o.id == id).cloned())
    }

    fn list_orders_by_customer(&self, customer_id: UserId) -> RepositoryResult<Vec<Order>> {
        Ok(self
            .orders
            .borrow()
            .iter()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect())
    }

    fn list_order_items(&self, order_id: OrderId) -> RepositoryResult<Vec<OrderItem>> {
        Ok(self
            .order_items
            .borrow()
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }
}

impl OrderWriter for TestRepository {
    fn create_order(&self, order: &NewOrder, items: &[NewOrderItem]) -> RepositoryResult<Order> {
        if self.fail_order_creation.replace(false) {
            return Err(RepositoryError::Database(
                diesel::result::Error::RollbackTransaction,
            ));
        }

        let id = self.next_order_id.get();
        self.next_order_id.set(id + 1);
        let order_id =
            OrderId::new(id).map_err(|e| RepositoryError::Validation(e.to_string()))?;

        let created = Order {
            id: order_id,
            customer_id: order.customer_id,
            billing: order.billing.clone(),
            payment: order.payment,
            total_amount: order.total_amount,
            created_at: order.created_at,
        };
        self.orders.borrow_mut().push(created.clone());

        let mut stored_items = self.order_items.borrow_mut();
        for item in items {
            let next_id = stored_items.len() as i32 + 1;
            stored_items.push(OrderItem {
                id: OrderItemId::new(next_id)
                    .map_err(|e| RepositoryError::Validation(e.to_string()))?,
                order_id,
                product_id: item.product_id,
                quantity: Quantity::clamp(item.quantity.get()),
                unit_price: item.unit_price,
            });
        }

        Ok(created)
    }
}
