//! Decimal input at the API boundary
//!
//! `StrictDecimal` accepts a JSON number or a decimal string and rejects
//! ambiguous formats before the value reaches the pricing code.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Format-validated, non-negative decimal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrictDecimal(Decimal);

impl StrictDecimal {
    pub fn inner(self) -> Decimal {
        self.0
    }

    fn parse<E: de::Error>(s: &str) -> Result<Self, E> {
        if s.is_empty() {
            return Err(E::custom("amount cannot be empty"));
        }
        if s.starts_with('.') {
            return Err(E::custom("invalid format: use 0.5 not .5"));
        }
        if s.ends_with('.') {
            return Err(E::custom("invalid format: use 5.0 not 5."));
        }
        if s.contains(['e', 'E']) {
            return Err(E::custom("invalid format: scientific notation not allowed"));
        }
        if s.starts_with('+') {
            return Err(E::custom("invalid format: + prefix not allowed"));
        }

        let d = Decimal::from_str(s).map_err(|e| E::custom(format!("invalid decimal: {}", e)))?;
        if d.is_sign_negative() {
            return Err(E::custom("amount cannot be negative"));
        }
        Ok(StrictDecimal(d))
    }
}

impl std::ops::Deref for StrictDecimal {
    type Target = Decimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

struct StrictDecimalVisitor;

impl Visitor<'_> for StrictDecimalVisitor {
    type Value = StrictDecimal;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative decimal number or string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        StrictDecimal::parse(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(StrictDecimal(Decimal::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        if v < 0 {
            return Err(E::custom("amount cannot be negative"));
        }
        Ok(StrictDecimal(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() {
            return Err(E::custom("amount must be finite"));
        }
        // Shortest round-trip repr, so 2.3 stays 2.3 rather than its binary expansion
        StrictDecimal::parse(&v.to_string())
    }
}

impl<'de> Deserialize<'de> for StrictDecimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StrictDecimalVisitor)
    }
}

impl Serialize for StrictDecimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Decimal, serde_json::Error> {
        serde_json::from_str::<StrictDecimal>(json).map(StrictDecimal::inner)
    }

    #[test]
    fn test_accepts_strings_and_numbers() {
        assert_eq!(parse(r#""2.5""#).unwrap(), Decimal::new(25, 1));
        assert_eq!(parse("3").unwrap(), Decimal::from(3));
        assert_eq!(parse("2.3").unwrap(), Decimal::new(23, 1));
    }

    #[test]
    fn test_rejects_ambiguous_formats() {
        for bad in [r#""""#, r#"".5""#, r#""5.""#, r#""1e3""#, r#""+1""#, r#""-1""#, "-2"] {
            assert!(parse(bad).is_err(), "{bad} should be rejected");
        }
    }
}
