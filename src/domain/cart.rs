use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::domain::types::{ProductId, Quantity};

/// One cart line. Name, image and unit price are snapshots captured when the
/// product was added; a later catalog price change does not touch them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: Option<String>,
    pub unit_price: Decimal,
    pub qty: Quantity,
}

impl CartItem {
    /// Snapshot a product into a cart line at its current effective price.
    pub fn from_product(product: &Product, qty: Quantity) -> Self {
        Self {
            product_id: product.id,
            name: product.name.to_string(),
            image_url: product.image_url.clone(),
            unit_price: product.effective_unit_price(),
            qty,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.qty.get())
    }
}

/// Session-scoped shopping cart: an insertion-ordered sequence of lines with
/// at most one line per product id. Lives in the session store and dies with
/// it; concurrent requests on one session are last-write-wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines, e.g. for the cart badge.
    pub fn total_units(&self) -> i32 {
        self.items.iter().map(|i| i.qty.get()).sum()
    }

    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Merge a snapshot into the cart. An existing line for the same product
    /// has its quantity bumped by the snapshot's quantity (clamped) and its
    /// unit price refreshed to the snapshot's; otherwise the line is
    /// appended as-is.
    pub fn add(&mut self, snapshot: CartItem) {
        match self
            .items
            .iter_mut()
            .find(|i| i.product_id == snapshot.product_id)
        {
            Some(existing) => {
                existing.qty = existing.qty.saturating_add(snapshot.qty.get());
                existing.unit_price = snapshot.unit_price;
            }
            None => self.items.push(snapshot),
        }
    }

    /// Set a line's quantity (clamped). Silently a no-op when the product is
    /// not in the cart.
    pub fn update_qty(&mut self, product_id: ProductId, qty: i32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.qty = Quantity::clamp(qty);
        }
    }

    /// Remove the line for a product; no-op when absent.
    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Append a prebuilt line without merge semantics. Test-support seam for
    /// constructing fixture carts.
    pub fn push_line(&mut self, item: CartItem) {
        self.items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(product_id: i32, unit_price: Decimal, qty: i32) -> CartItem {
        CartItem {
            product_id: ProductId::new(product_id).unwrap(),
            name: format!("product-{product_id}"),
            image_url: None,
            unit_price,
            qty: Quantity::clamp(qty),
        }
    }

    #[test]
    fn add_appends_new_lines_in_order() {
        let mut cart = Cart::default();
        cart.add(line(1, dec!(10), 1));
        cart.add(line(2, dec!(20), 2));
        let ids: Vec<i32> = cart.items().iter().map(|i| i.product_id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(cart.subtotal(), dec!(50));
    }

    #[test]
    fn add_merges_by_product_id_and_clamps() {
        let mut cart = Cart::default();
        cart.add(line(1, dec!(10), 6));
        cart.add(line(1, dec!(10), 6));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].qty, 10);
    }

    #[test]
    fn add_refreshes_unit_price_on_merge() {
        let mut cart = Cart::default();
        cart.add(line(1, dec!(10), 1));
        cart.add(line(1, dec!(8), 1));
        assert_eq!(cart.items()[0].unit_price, dec!(8));
        assert_eq!(cart.items()[0].qty, 2);
    }

    #[test]
    fn update_clamps_and_ignores_missing_lines() {
        let mut cart = Cart::default();
        cart.add(line(1, dec!(10), 2));
        cart.update_qty(ProductId::new(1).unwrap(), 99);
        assert_eq!(cart.items()[0].qty, 10);
        cart.update_qty(ProductId::new(1).unwrap(), -5);
        assert_eq!(cart.items()[0].qty, 1);
        // absent product: no error, no change
        cart.update_qty(ProductId::new(42).unwrap(), 3);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn remove_and_clear() {
        let mut cart = Cart::default();
        cart.add(line(1, dec!(10), 1));
        cart.add(line(2, dec!(20), 1));
        cart.remove(ProductId::new(1).unwrap());
        assert_eq!(cart.len(), 1);
        cart.remove(ProductId::new(1).unwrap()); // already gone
        assert_eq!(cart.len(), 1);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn line_total_is_unit_price_times_qty() {
        assert_eq!(line(1, dec!(19.99), 3).line_total(), dec!(59.97));
    }
}
