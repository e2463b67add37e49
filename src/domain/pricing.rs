//! Monetary arithmetic for carts and checkout: effective prices, the
//! shipping step function, province tax rates and the fixed rounding rule.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::cart::Cart;
use crate::domain::types::{DiscountPercent, Price};

/// Fallback tax rate when the province is unknown or unmatched.
pub const DEFAULT_TAX_RATE: Decimal = dec!(0.13);

/// Orders strictly above this subtotal ship for free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = dec!(500);

/// Flat fee applied to orders at or below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: Decimal = dec!(30);

/// Round a monetary value to two decimal places, halves away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Write-time derivation of the discounted price from the list price.
/// Returns `None` when the discount is absent or inactive.
pub fn discounted_price_for(price: Price, percent: Option<DiscountPercent>) -> Option<Price> {
    let pct = percent.filter(|p| p.is_active())?;
    let discounted = price.get() - price.get() * pct.get() / Decimal::ONE_HUNDRED;
    Some(Price::new(round_money(discounted)).unwrap_or(price))
}

/// Sales tax rate for a Canadian province or territory, exact string match.
/// Unmatched or blank input falls back to [`DEFAULT_TAX_RATE`].
pub fn tax_rate_for_province(province: &str) -> Decimal {
    match province.trim() {
        "Alberta" | "Northwest Territories" | "Nunavut" | "Yukon" => dec!(0.05),
        "British Columbia" => dec!(0.12),
        "Manitoba" => dec!(0.12),
        "New Brunswick" | "Newfoundland and Labrador" | "Nova Scotia"
        | "Prince Edward Island" => dec!(0.15),
        "Ontario" => dec!(0.13),
        "Quebec" => dec!(0.14975),
        "Saskatchewan" => dec!(0.11),
        _ => DEFAULT_TAX_RATE,
    }
}

/// Shipping is a step function of the subtotal, not a formula: nothing to
/// ship costs nothing, and free shipping kicks in strictly above the
/// threshold.
pub fn shipping_fee(subtotal: Decimal) -> Decimal {
    if subtotal == Decimal::ZERO || subtotal > FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING_FEE
    }
}

/// Computed order totals. `total_amount` persisted on an order is always a
/// fresh server-side computation of this, never a client-submitted figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax_rate: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl CartTotals {
    /// Totals over an explicit subtotal; used by both the cart flow and the
    /// single-item flow.
    pub fn from_subtotal(subtotal: Decimal, tax_rate: Decimal) -> Self {
        let shipping = shipping_fee(subtotal);
        let tax = round_money(subtotal * tax_rate);
        Self {
            subtotal,
            shipping,
            tax_rate,
            tax,
            total: subtotal + tax + shipping,
        }
    }
}

/// Compute subtotal, shipping, tax and grand total for a cart. Pure: calling
/// it twice on an unchanged cart yields identical results.
pub fn compute_totals(cart: &Cart, tax_rate: Decimal) -> CartTotals {
    CartTotals::from_subtotal(cart.subtotal(), tax_rate)
}
