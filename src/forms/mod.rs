use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;

/// HTML forms post blank optional numeric fields as empty strings; treat
/// those as absent instead of failing deserialization.
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}
