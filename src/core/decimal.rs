//! Exact decimal fields in master data files
//!
//! YAML parsers hand unquoted fractional numbers to serde as `f64`, which
//! silently rounds anything past ~15 significant digits. Decimal fields
//! therefore accept integers and decimal strings only:
//!
//! ```yaml
//! required_quantity: 2                       # ok
//! required_quantity: "0.333333333333333333"  # ok, exact
//! required_quantity: 0.5                     # rejected, quote it
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer};

struct ExactDecimalVisitor;

impl<'de> de::Visitor<'de> for ExactDecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer or a quoted decimal such as \"0.5\"")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Decimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Err(E::invalid_type(Unexpected::Float(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let text = v.trim();
        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }
}

/// Decimal read from its literal text, never through `f64`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactDecimal(pub Decimal);

impl<'de> Deserialize<'de> for ExactDecimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_any(ExactDecimalVisitor)
            .map(ExactDecimal)
    }
}

/// `deserialize_with` helper for `Decimal` fields
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    ExactDecimal::deserialize(deserializer).map(|d| d.0)
}

/// `deserialize_with` helper for `Option<Decimal>` fields; pair with `#[serde(default)]`
pub fn deserialize_option<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Decimal>, D::Error> {
    Option::<ExactDecimal>::deserialize(deserializer).map(|d| d.map(|d| d.0))
}
