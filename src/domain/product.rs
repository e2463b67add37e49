use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::types::{DiscountPercent, Price, ProductId, ProductName};

/// A catalog product. The single source of truth for current pricing;
/// cart/wishlist/order lines copy what they need and never read back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub description: Option<String>,
    pub price: Price,
    /// Active discount, if any. `discounted_price` is derived from this at
    /// write time, never at read time.
    pub discount_percent: Option<DiscountPercent>,
    pub discounted_price: Option<Price>,
    pub stock_qty: i32,
    pub image_url: Option<String>,
    pub avg_rating: Decimal,
    pub review_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// The price actually charged for one unit: the stored discounted price
    /// when an active discount is present, the list price otherwise.
    pub fn effective_unit_price(&self) -> Decimal {
        match (self.discount_percent, self.discounted_price) {
            (Some(pct), Some(discounted)) if pct.is_active() => discounted.get(),
            _ => self.price.get(),
        }
    }
}

/// Information required to create a new [`Product`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: ProductName,
    pub description: Option<String>,
    pub price: Price,
    pub discount_percent: Option<DiscountPercent>,
    /// Derived from `price` and `discount_percent` at write time.
    pub discounted_price: Option<Price>,
    pub stock_qty: i32,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rust_decimal_macros::dec;

    fn product(price: Decimal, pct: Option<Decimal>, discounted: Option<Decimal>) -> Product {
        let ts = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        Product {
            id: ProductId::new(1).unwrap(),
            name: ProductName::new("Headset").unwrap(),
            description: None,
            price: Price::new(price).unwrap(),
            discount_percent: pct.map(|p| DiscountPercent::new(p).unwrap()),
            discounted_price: discounted.map(|d| Price::new(d).unwrap()),
            stock_qty: 5,
            image_url: None,
            avg_rating: Decimal::ZERO,
            review_count: 0,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn effective_price_uses_discount_when_active() {
        let p = product(dec!(100), Some(dec!(20)), Some(dec!(80)));
        assert_eq!(p.effective_unit_price(), dec!(80));
    }

    #[test]
    fn effective_price_falls_back_to_list_price() {
        // no discount at all
        assert_eq!(product(dec!(100), None, None).effective_unit_price(), dec!(100));
        // zero percent is not an active discount
        assert_eq!(
            product(dec!(100), Some(dec!(0)), Some(dec!(100))).effective_unit_price(),
            dec!(100)
        );
        // percent set but stored discounted price missing
        assert_eq!(
            product(dec!(100), Some(dec!(15)), None).effective_unit_price(),
            dec!(100)
        );
    }

    #[test]
    fn effective_price_never_exceeds_list_price_with_discount() {
        let p = product(dec!(59.99), Some(dec!(35)), Some(dec!(38.99)));
        assert!(p.effective_unit_price() <= p.price.get());
    }
}
