//! Diesel models for the SQLite schema plus conversions to and from the
//! domain layer. Monetary columns are stored as `Double`; conversion to
//! `Decimal` happens here and nowhere else.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use crate::domain::types::TypeConstraintError;

pub mod config;
pub mod order;
pub mod product;
pub mod user;

/// Convert a stored `Double` into a `Decimal`, normalized to four decimal
/// places to absorb binary floating-point noise.
pub(crate) fn decimal_from_db(
    value: f64,
    field: &'static str,
) -> Result<Decimal, TypeConstraintError> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(4).normalize())
        .ok_or_else(|| TypeConstraintError::InvalidValue(format!("{field}: {value}")))
}

/// Convert a `Decimal` into the `Double` representation used by SQLite.
pub(crate) fn decimal_to_db(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
