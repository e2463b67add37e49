//! Wishlist operations, including the cart hand-off flows.

use std::collections::HashMap;

use crate::domain::cart::{Cart, CartItem};
use crate::domain::product::Product;
use crate::domain::types::{ProductId, Quantity};
use crate::domain::wishlist::{Wishlist, WishlistItem};
use crate::repository::ProductReader;

use super::{ServiceError, ServiceResult};

fn load_products<R>(
    ids: &[ProductId],
    repo: &R,
) -> ServiceResult<HashMap<ProductId, Product>>
where
    R: ProductReader,
{
    repo.get_products_by_ids(ids).map_err(|e| {
        log::error!("Failed to load wishlist products: {e}");
        ServiceError::Internal
    })
}

/// Refresh every entry's denormalized name/image/price fields from the
/// catalog. Entries whose product no longer exists are left stale, not
/// pruned; they surface as-is until removed or bulk-moved.
pub fn show_wishlist<R>(wishlist: &mut Wishlist, repo: &R) -> ServiceResult<()>
where
    R: ProductReader,
{
    if wishlist.is_empty() {
        return Ok(());
    }

    let ids: Vec<ProductId> = wishlist.items().iter().map(|i| i.product_id).collect();
    let fresh = load_products(&ids, repo)?;

    for item in wishlist.items_mut() {
        if let Some(product) = fresh.get(&item.product_id) {
            item.refresh_from(product);
        }
    }
    Ok(())
}

/// Save a product snapshot; already-saved products are left untouched.
pub fn add_to_wishlist<R>(
    wishlist: &mut Wishlist,
    product_id: ProductId,
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

    wishlist.add(WishlistItem::from_product(&product));
    Ok(product)
}

pub fn remove_from_wishlist(wishlist: &mut Wishlist, product_id: ProductId) {
    wishlist.remove(product_id);
}

pub fn clear_wishlist(wishlist: &mut Wishlist) {
    wishlist.clear();
}

/// Move one saved product into the cart with the same merge/clamp semantics
/// as a direct cart add, then drop it from the wishlist. The entry is
/// dropped even when the product has vanished from the catalog, matching
/// the unconditional clear of the bulk move; in that case nothing reaches
/// the cart and `None` is returned.
pub fn move_wishlist_item_to_cart<R>(
    wishlist: &mut Wishlist,
    cart: &mut Cart,
    product_id: ProductId,
    qty: i32,
    repo: &R,
) -> ServiceResult<Option<Product>>
where
    R: ProductReader,
{
    if !wishlist.contains(product_id) {
        return Ok(None);
    }

    let product = match repo.get_product_by_id(product_id) {
        Ok(found) => found,
        Err(e) => {
            log::error!("Failed to load product {product_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if let Some(product) = &product {
        cart.add(CartItem::from_product(product, Quantity::clamp(qty)));
    }
    wishlist.remove(product_id);
    Ok(product)
}

/// Move every saved product into the cart, one unit each. Entries whose
/// product no longer exists are skipped for the merge, but the wishlist is
/// cleared unconditionally afterwards. Returns how many lines were merged.
pub fn move_all_wishlist_to_cart<R>(
    wishlist: &mut Wishlist,
    cart: &mut Cart,
    repo: &R,
) -> ServiceResult<usize>
where
    R: ProductReader,
{
    if wishlist.is_empty() {
        return Ok(0);
    }

    let ids: Vec<ProductId> = wishlist.items().iter().map(|i| i.product_id).collect();
    let products = load_products(&ids, repo)?;

    let mut moved = 0;
    for item in wishlist.items() {
        let Some(product) = products.get(&item.product_id) else {
            continue;
        };
        cart.add(CartItem::from_product(product, Quantity::one()));
        moved += 1;
    }

    wishlist.clear();
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{DiscountPercent, Price, ProductName};
    use crate::repository::test::TestRepository;
    use chrono::DateTime;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sample_product(id: i32, price: Decimal) -> Product {
        let ts = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        Product {
            id: ProductId::new(id).unwrap(),
            name: ProductName::new(format!("product-{id}")).unwrap(),
            description: None,
            price: Price::new(price).unwrap(),
            discount_percent: None,
            discounted_price: None,
            stock_qty: 10,
            image_url: None,
            avg_rating: Decimal::ZERO,
            review_count: 0,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn stale_entry(id: i32) -> WishlistItem {
        WishlistItem {
            product_id: ProductId::new(id).unwrap(),
            name: "stale".to_string(),
            image_url: None,
            price: dec!(1),
            discounted_price: None,
            discount_percent: None,
        }
    }

    #[test]
    fn add_dedups_and_snapshots() {
        let repo = TestRepository::new(vec![sample_product(1, dec!(25))], vec![]);
        let mut wishlist = Wishlist::default();
        let id = ProductId::new(1).unwrap();

        add_to_wishlist(&mut wishlist, id, &repo).unwrap();
        add_to_wishlist(&mut wishlist, id, &repo).unwrap();

        assert_eq!(wishlist.len(), 1);
        assert_eq!(wishlist.items()[0].effective_price(), dec!(25));
    }

    #[test]
    fn view_refreshes_denormalized_fields() {
        let mut product = sample_product(1, dec!(30));
        product.discount_percent = Some(DiscountPercent::new(dec!(10)).unwrap());
        product.discounted_price = Some(Price::new(dec!(27)).unwrap());
        let repo = TestRepository::new(vec![product], vec![]);

        let mut wishlist = Wishlist::default();
        wishlist.add(stale_entry(1));

        show_wishlist(&mut wishlist, &repo).unwrap();

        let item = &wishlist.items()[0];
        assert_eq!(item.name, "product-1");
        assert_eq!(item.price, dec!(30));
        assert_eq!(item.effective_price(), dec!(27));
    }

    #[test]
    fn view_leaves_missing_products_stale() {
        let repo = TestRepository::new(vec![], vec![]);
        let mut wishlist = Wishlist::default();
        wishlist.add(stale_entry(7));

        show_wishlist(&mut wishlist, &repo).unwrap();

        assert_eq!(wishlist.len(), 1);
        assert_eq!(wishlist.items()[0].name, "stale");
    }

    #[test]
    fn move_single_merges_into_cart_and_removes_entry() {
        let repo = TestRepository::new(vec![sample_product(1, dec!(40))], vec![]);
        let mut wishlist = Wishlist::default();
        let mut cart = Cart::default();
        let id = ProductId::new(1).unwrap();

        add_to_wishlist(&mut wishlist, id, &repo).unwrap();
        let moved = move_wishlist_item_to_cart(&mut wishlist, &mut cart, id, 3, &repo).unwrap();

        assert!(moved.is_some());
        assert!(wishlist.is_empty());
        assert_eq!(cart.items()[0].qty, 3);
        assert_eq!(cart.items()[0].unit_price, dec!(40));
    }

    #[test]
    fn move_single_drops_entry_for_vanished_product() {
        let repo = TestRepository::new(vec![], vec![]);
        let mut wishlist = Wishlist::default();
        let mut cart = Cart::default();
        wishlist.add(stale_entry(9));

        let moved = move_wishlist_item_to_cart(
            &mut wishlist,
            &mut cart,
            ProductId::new(9).unwrap(),
            1,
            &repo,
        )
        .unwrap();

        assert!(moved.is_none());
        assert!(wishlist.is_empty());
        assert!(cart.is_empty());
    }

    #[test]
    fn move_all_skips_missing_but_clears_everything() {
        let repo = TestRepository::new(vec![sample_product(1, dec!(15))], vec![]);
        let mut wishlist = Wishlist::default();
        let mut cart = Cart::default();
        wishlist.add(stale_entry(1));
        wishlist.add(stale_entry(2)); // product 2 no longer exists

        let moved = move_all_wishlist_to_cart(&mut wishlist, &mut cart, &repo).unwrap();

        assert_eq!(moved, 1);
        assert!(wishlist.is_empty());
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].product_id, 1);
        assert_eq!(cart.items()[0].qty, 1);
    }

    #[test]
    fn move_all_merges_one_unit_into_existing_lines() {
        let repo = TestRepository::new(vec![sample_product(1, dec!(15))], vec![]);
        let mut wishlist = Wishlist::default();
        let mut cart = Cart::default();
        cart.add(CartItem::from_product(&sample_product(1, dec!(15)), Quantity::clamp(10)));
        wishlist.add(stale_entry(1));

        move_all_wishlist_to_cart(&mut wishlist, &mut cart, &repo).unwrap();

        // already at the cap: merge clamps rather than duplicating the line
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].qty, 10);
    }
}
