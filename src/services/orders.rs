//! Checkout and order placement.
//!
//! Totals are always recomputed server-side immediately before persistence;
//! client-submitted figures are never trusted. The order header and its
//! line items are written in one repository transaction.

use chrono::Utc;

use crate::auth::CurrentUser;
use crate::domain::cart::{Cart, CartItem};
use crate::domain::order::{NewOrder, NewOrderItem, Order, OrderItem};
use crate::domain::pricing::{CartTotals, compute_totals, tax_rate_for_province};
use crate::domain::types::{OrderId, PaymentMethod, ProductId, Quantity, UserId};
use crate::forms::checkout::CheckoutPayload;
use crate::repository::{OrderReader, OrderWriter, ProductReader};

use super::{ServiceError, ServiceResult};

/// What a checkout page needs to render: the lines being bought and the
/// server-computed totals.
#[derive(Debug, Clone)]
pub struct CheckoutQuote {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

fn customer_id(user: &CurrentUser) -> ServiceResult<UserId> {
    UserId::new(user.id).map_err(|e| {
        log::error!("Invalid user id in session context: {e}");
        ServiceError::Internal
    })
}

/// Quote the cart checkout page. The province defaults to Ontario until the
/// form is submitted with something else.
pub fn quote_cart_checkout(cart: &Cart, province: &str) -> ServiceResult<CheckoutQuote> {
    if cart.is_empty() {
        return Err(ServiceError::EmptyCart);
    }
    Ok(CheckoutQuote {
        items: cart.items().to_vec(),
        totals: compute_totals(cart, tax_rate_for_province(province)),
    })
}

/// Quote the single-item "buy now" page from the live product.
pub fn quote_single_checkout<R>(
    product_id: ProductId,
    qty: i32,
    province: &str,
    repo: &R,
) -> ServiceResult<CheckoutQuote>
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

    let line = CartItem::from_product(&product, Quantity::clamp(qty));
    let totals =
        CartTotals::from_subtotal(line.line_total(), tax_rate_for_province(province));
    Ok(CheckoutQuote {
        items: vec![line],
        totals,
    })
}

fn place_order<R>(
    lines: &[CartItem],
    customer: UserId,
    payload: &CheckoutPayload,
    repo: &R,
) -> ServiceResult<Order>
where
    R: ProductReader + OrderWriter,
{
    // Every referenced product must still exist; a vanished product fails
    // the whole order rather than silently dropping the line.
    let ids: Vec<ProductId> = lines.iter().map(|l| l.product_id).collect();
    let existing = repo.get_products_by_ids(&ids).map_err(|e| {
        log::error!("Failed to verify products at checkout: {e}");
        ServiceError::Internal
    })?;
    if ids.iter().any(|id| !existing.contains_key(id)) {
        return Err(ServiceError::NotFound);
    }

    let subtotal = lines.iter().map(CartItem::line_total).sum();
    let totals = CartTotals::from_subtotal(
        subtotal,
        tax_rate_for_province(&payload.billing.province),
    );

    let order = NewOrder {
        customer_id: customer,
        billing: payload.billing.clone(),
        payment: payload.payment,
        total_amount: totals.total,
        created_at: Utc::now().naive_utc(),
    };
    let items: Vec<NewOrderItem> = lines
        .iter()
        .map(|line| NewOrderItem {
            product_id: line.product_id,
            quantity: line.qty,
            unit_price: line.unit_price,
        })
        .collect();

    match repo.create_order(&order, &items) {
        Ok(order) => Ok(order),
        Err(e) => {
            log::error!("Failed to place order: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Place an order for the whole cart. The caller clears the cart only after
/// this returns `Ok`.
pub fn place_order_from_cart<R>(
    cart: &Cart,
    user: &CurrentUser,
    payload: &CheckoutPayload,
    repo: &R,
) -> ServiceResult<Order>
where
    R: ProductReader + OrderWriter,
{
    if cart.is_empty() {
        return Err(ServiceError::EmptyCart);
    }
    place_order(cart.items(), customer_id(user)?, payload, repo)
}

/// Place a single-item "buy now" order. The unit price is snapshotted from
/// the live product at this moment; the session cart is not involved.
pub fn place_order_from_single_item<R>(
    product_id: ProductId,
    qty: i32,
    user: &CurrentUser,
    payload: &CheckoutPayload,
    repo: &R,
) -> ServiceResult<Order>
where
    R: ProductReader + OrderWriter,
{
    let product = match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => product,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load product {product_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let line = CartItem::from_product(&product, Quantity::clamp(qty));
    place_order(&[line], customer_id(user)?, payload, repo)
}

/// Fetch an order with its lines, enforcing that only the owner or an admin
/// may see it.
pub fn show_order<R>(
    order_id: OrderId,
    user: &CurrentUser,
    repo: &R,
) -> ServiceResult<(Order, Vec<OrderItem>)>
where
    R: OrderReader,
{
    let order = match repo.get_order_by_id(order_id) {
        Ok(Some(order)) => order,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load order {order_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !user.is_admin() && order.customer_id.get() != user.id {
        return Err(ServiceError::Forbidden);
    }

    let items = repo.list_order_items(order_id).map_err(|e| {
        log::error!("Failed to load order items for {order_id}: {e}");
        ServiceError::Internal
    })?;

    Ok((order, items))
}

/// The bank-details page only applies to bank-transfer orders; COD orders
/// fall through to the success page.
pub fn show_bank_details<R>(
    order_id: OrderId,
    user: &CurrentUser,
    repo: &R,
) -> ServiceResult<Option<Order>>
where
    R: OrderReader,
{
    let (order, _) = show_order(order_id, user, repo)?;
    if order.payment != PaymentMethod::Bank {
        return Ok(None);
    }
    Ok(Some(order))
}

/// Orders for the account page, newest first.
pub fn list_customer_orders<R>(user: &CurrentUser, repo: &R) -> ServiceResult<Vec<Order>>
where
    R: OrderReader,
{
    match repo.list_orders_by_customer(customer_id(user)?) {
        Ok(orders) => Ok(orders),
        Err(e) => {
            log::error!("Failed to list orders: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::BillingAddress;
    use crate::domain::product::Product;
    use crate::domain::types::{Price, ProductName, Role};
    use crate::repository::ProductWriter;
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

    fn sample_user() -> CurrentUser {
        CurrentUser {
            id: 1,
            name: "Test".into(),
            email: "test@example.com".into(),
            role: Role::Customer,
        }
    }

    fn payload(province: &str, payment: PaymentMethod) -> CheckoutPayload {
        CheckoutPayload {
            payment,
            billing: BillingAddress {
                full_name: "Test".into(),
                company_name: String::new(),
                street_address: "1 Main St".into(),
                apartment: String::new(),
                city: "Toronto".into(),
                province: province.into(),
                postal_code: "M5V 1A1".into(),
                country: "Canada".into(),
                phone_number: "555-0100".into(),
                email_address: "test@example.com".into(),
            },
        }
    }

    fn cart_with(repo: &TestRepository, id: i32, qty: i32) -> Cart {
        let mut cart = Cart::default();
        crate::services::cart::add_to_cart(
            &mut cart,
            ProductId::new(id).unwrap(),
            qty,
            repo,
        )
        .unwrap();
        cart
    }

    #[test]
    fn empty_cart_checkout_is_rejected() {
        let repo = TestRepository::new(vec![], vec![]);
        let err = place_order_from_cart(
            &Cart::default(),
            &sample_user(),
            &payload("Ontario", PaymentMethod::Bank),
            &repo,
        )
        .unwrap_err();
        assert_eq!(err, ServiceError::EmptyCart);
        assert!(repo.orders().is_empty());
    }

    #[test]
    fn cart_order_persists_header_and_all_lines() {
        let repo = TestRepository::new(
            vec![sample_product(1, dec!(100)), sample_product(2, dec!(50))],
            vec![],
        );
        let mut cart = cart_with(&repo, 1, 2);
        crate::services::cart::add_to_cart(&mut cart, ProductId::new(2).unwrap(), 1, &repo)
            .unwrap();

        let order = place_order_from_cart(
            &cart,
            &sample_user(),
            &payload("Ontario", PaymentMethod::CashOnDelivery),
            &repo,
        )
        .unwrap();

        // subtotal 250, shipping 30, tax 32.50
        assert_eq!(order.total_amount, dec!(312.50));
        assert_eq!(order.payment, PaymentMethod::CashOnDelivery);
        assert_eq!(repo.orders().len(), 1);
        assert_eq!(repo.order_items().len(), cart.len());
    }

    #[test]
    fn totals_use_the_billing_province_rate() {
        let repo = TestRepository::new(vec![sample_product(1, dec!(100))], vec![]);
        let cart = cart_with(&repo, 1, 2);

        let order = place_order_from_cart(
            &cart,
            &sample_user(),
            &payload("Alberta", PaymentMethod::Bank),
            &repo,
        )
        .unwrap();

        // subtotal 200, shipping 30, tax at 5% = 10.00
        assert_eq!(order.total_amount, dec!(240.00));
    }

    #[test]
    fn vanished_product_fails_the_whole_order() {
        let repo = TestRepository::new(vec![sample_product(1, dec!(100))], vec![]);
        let cart = cart_with(&repo, 1, 1);
        ProductWriter::delete_product(&repo, ProductId::new(1).unwrap()).unwrap();

        let err = place_order_from_cart(
            &cart,
            &sample_user(),
            &payload("Ontario", PaymentMethod::Bank),
            &repo,
        )
        .unwrap_err();

        assert_eq!(err, ServiceError::NotFound);
        assert!(repo.orders().is_empty());
        assert!(repo.order_items().is_empty());
    }

    #[test]
    fn failed_persistence_leaves_no_partial_state() {
        let repo = TestRepository::new(vec![sample_product(1, dec!(100))], vec![]);
        let cart = cart_with(&repo, 1, 1);
        repo.fail_next_order();

        let err = place_order_from_cart(
            &cart,
            &sample_user(),
            &payload("Ontario", PaymentMethod::Bank),
            &repo,
        )
        .unwrap_err();

        assert_eq!(err, ServiceError::Internal);
        assert!(repo.orders().is_empty());
        assert!(repo.order_items().is_empty());
    }

    #[test]
    fn single_item_order_snapshots_current_price() {
        let repo = TestRepository::new(vec![sample_product(1, dec!(600))], vec![]);

        let order = place_order_from_single_item(
            ProductId::new(1).unwrap(),
            1,
            &sample_user(),
            &payload("Ontario", PaymentMethod::Bank),
            &repo,
        )
        .unwrap();

        // subtotal 600 ships free; tax 78.00
        assert_eq!(order.total_amount, dec!(678.00));
        assert_eq!(repo.order_items().len(), 1);
        assert_eq!(repo.order_items()[0].unit_price, dec!(600));
    }

    #[test]
    fn orders_are_visible_to_owner_and_admin_only() {
        let repo = TestRepository::new(vec![sample_product(1, dec!(10))], vec![]);
        let cart = cart_with(&repo, 1, 1);
        let order = place_order_from_cart(
            &cart,
            &sample_user(),
            &payload("Ontario", PaymentMethod::Bank),
            &repo,
        )
        .unwrap();

        let owner = sample_user();
        assert!(show_order(order.id, &owner, &repo).is_ok());

        let stranger = CurrentUser {
            id: 99,
            ..sample_user()
        };
        assert_eq!(
            show_order(order.id, &stranger, &repo).unwrap_err(),
            ServiceError::Forbidden
        );

        let admin = CurrentUser {
            id: 99,
            role: Role::Admin,
            ..sample_user()
        };
        assert!(show_order(order.id, &admin, &repo).is_ok());
    }

    #[test]
    fn bank_details_only_for_bank_orders() {
        let repo = TestRepository::new(vec![sample_product(1, dec!(10))], vec![]);
        let cart = cart_with(&repo, 1, 1);
        let order = place_order_from_cart(
            &cart,
            &sample_user(),
            &payload("Ontario", PaymentMethod::CashOnDelivery),
            &repo,
        )
        .unwrap();

        let details = show_bank_details(order.id, &sample_user(), &repo).unwrap();
        assert!(details.is_none());
    }
}
