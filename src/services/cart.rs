//! Cart operations. Handlers load the cart from the session, hand it in by
//! reference, and persist whatever comes back; nothing here touches ambient
//! state.

use crate::domain::cart::{Cart, CartItem};
use crate::domain::pricing::{CartTotals, DEFAULT_TAX_RATE, compute_totals};
use crate::domain::product::Product;
use crate::domain::types::{ProductId, Quantity};
use crate::repository::ProductReader;

use super::{ServiceError, ServiceResult};

/// Totals for the cart page. The billing province is not known yet, so the
/// default tax rate applies.
pub fn show_cart(cart: &Cart) -> CartTotals {
    compute_totals(cart, DEFAULT_TAX_RATE)
}

/// Add a product to the cart, merging with an existing line for the same
/// product. The requested quantity is clamped into [1, 10]; the line's unit
/// price snapshot is (re)captured from the current effective price. Returns
/// the product so the caller can show a message.
pub fn add_to_cart<R>(
    cart: &mut Cart,
    product_id: ProductId,
    qty: i32,
    repo: &R,
) -> ServiceResult<Product>
where
    R: ProductReader,
{
    let product = match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => product,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load product {product_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    cart.add(CartItem::from_product(&product, Quantity::clamp(qty)));
    Ok(product)
}

/// Set a line's quantity, clamped. A missing line is a no-op, not an error.
pub fn update_cart_qty(cart: &mut Cart, product_id: ProductId, qty: i32) {
    cart.update_qty(product_id, qty);
}

/// Remove a line; no-op when absent.
pub fn remove_from_cart(cart: &mut Cart, product_id: ProductId) {
    cart.remove(product_id);
}

/// Empty the cart.
pub fn clear_cart(cart: &mut Cart) {
    cart.clear();
}
