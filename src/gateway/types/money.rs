//! Money input type for the API boundary

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::MONEY_SCALE;

/// Non-negative decimal that must arrive as a JSON string
///
/// Accepted form is `<digits>[.<digits>]` with at most [`MONEY_SCALE`]
/// significant fractional digits, so `12`, `0.5` and `1.50000000000` pass
/// while `.5`, `5.`, `+1`, `-1`, `1e3` and JSON numbers do not. Zero passes;
/// whether zero is allowed is a business rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrictDecimal(Decimal);

impl StrictDecimal {
    pub fn inner(self) -> Decimal {
        self.0
    }
}

impl std::ops::Deref for StrictDecimal {
    type Target = Decimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn is_digits(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

fn parse_amount(s: &str) -> Result<Decimal, String> {
    if s.is_empty() {
        return Err("Amount cannot be empty".to_string());
    }
    if s.starts_with('-') {
        return Err("Amount cannot be negative".to_string());
    }

    let (whole, fraction) = match s.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (s, None),
    };
    if !is_digits(whole) || fraction.is_some_and(|f| !is_digits(f)) {
        return Err(format!(
            "Invalid amount {s:?}: expected digits with an optional fraction, e.g. 12.50"
        ));
    }
    if fraction.is_some_and(|f| f.trim_end_matches('0').len() > MONEY_SCALE as usize) {
        return Err(format!(
            "Invalid amount {s:?}: at most {MONEY_SCALE} decimal places"
        ));
    }

    Decimal::from_str(s).map_err(|e| format!("Invalid amount {s:?}: {e}"))
}

impl<'de> Deserialize<'de> for StrictDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_amount(&s)
            .map(StrictDecimal)
            .map_err(serde::de::Error::custom)
    }
}

impl Serialize for StrictDecimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<StrictDecimal, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_strict_decimal_valid_string() {
        let d = parse(r#""200.50""#).unwrap();
        assert_eq!(*d, Decimal::new(20050, 2));
        assert_eq!(parse(r#""0""#).unwrap().inner(), Decimal::ZERO);
    }

    #[test]
    fn test_strict_decimal_rejects_json_number() {
        let err = parse("1.5").unwrap_err();
        assert!(err.to_string().contains("expected a string"));
    }

    #[test]
    fn test_strict_decimal_rejects_bad_formats() {
        for bad in [".5", "5.", "1.5e8", "+1", "abc", "1..2", "1.2.3", " 1", "0x10"] {
            let err = parse(&format!("{bad:?}")).unwrap_err();
            assert!(err.to_string().contains("expected digits"), "{bad}: {err}");
        }
        assert!(parse(r#""""#).unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_strict_decimal_rejects_negative_string() {
        let err = parse(r#""-1.5""#).unwrap_err();
        assert!(err.to_string().contains("cannot be negative"));
    }

    #[test]
    fn test_strict_decimal_limits_fraction_digits() {
        assert_eq!(*parse(r#""0.00000001""#).unwrap(), Decimal::new(1, 8));
        // Would be rounded away by the ledger's 8-place columns
        let err = parse(r#""0.000000015""#).unwrap_err();
        assert!(err.to_string().contains("at most 8 decimal places"));
        // Trailing zeros carry no value
        assert_eq!(*parse(r#""1.50000000000""#).unwrap(), Decimal::new(15, 1));
    }

    #[test]
    fn test_strict_decimal_serializes_as_string() {
        let json = serde_json::to_string(&StrictDecimal(Decimal::new(12345, 2))).unwrap();
        assert_eq!(json, r#""123.45""#);
    }
}
