use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::domain::types::ProductId;

/// One saved wishlist entry. All fields besides `product_id` are denormalized
/// snapshots; they are overwritten from the catalog every time the wishlist
/// is viewed. Wishlist entries carry no quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: Option<String>,
    pub price: Decimal,
    /// Present only while the product has an active discount.
    pub discounted_price: Option<Decimal>,
    pub discount_percent: Option<Decimal>,
}

impl WishlistItem {
    /// Snapshot a product into a wishlist entry.
    pub fn from_product(product: &Product) -> Self {
        let discount_active = product
            .discount_percent
            .is_some_and(|pct| pct.is_active())
            && product.discounted_price.is_some();
        Self {
            product_id: product.id,
            name: product.name.to_string(),
            image_url: product.image_url.clone(),
            price: product.price.get(),
            discounted_price: if discount_active {
                product.discounted_price.map(|p| p.get())
            } else {
                None
            },
            discount_percent: product.discount_percent.map(|p| p.get()),
        }
    }

    /// Overwrite the denormalized fields from the live product.
    pub fn refresh_from(&mut self, product: &Product) {
        *self = Self::from_product(product);
    }

    /// The price this entry would currently sell at.
    pub fn effective_price(&self) -> Decimal {
        self.discounted_price.unwrap_or(self.price)
    }
}

/// Session-scoped wishlist: at most one entry per product id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Wishlist {
    items: Vec<WishlistItem>,
}

impl Wishlist {
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [WishlistItem] {
        &mut self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    /// Add an entry unless the product is already saved.
    pub fn add(&mut self, item: WishlistItem) {
        if !self.contains(item.product_id) {
            self.items.push(item);
        }
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
