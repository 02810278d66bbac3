//! Permissive debit/credit parsing

use bigdecimal::BigDecimal;
use std::str::FromStr;
use tracing::debug;

use crate::types::Amount;

/// Parse an amount cell strictly; `None` when it is not a number in range
pub fn try_parse_amount(raw: &str) -> Option<Amount> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    let decimal = BigDecimal::from_str(value).ok()?;
    Amount::from_decimal(&decimal)
}

/// Parse an amount cell, falling back to zero.
///
/// Missing, non-numeric and out-of-range values all become `0.00`. Negative
/// values keep their sign. Dates are strict but amounts are not; existing
/// reports depend on this.
pub fn parse_amount(raw: &str) -> Amount {
    match try_parse_amount(raw) {
        Some(amount) => amount,
        None => {
            if !raw.trim().is_empty() {
                debug!(value = raw, "amount is not a usable number, using 0.00");
            }
            Amount::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_formats_two_places() {
        assert_eq!(parse_amount("100").to_string(), "100.00");
        assert_eq!(parse_amount(" 100.0 ").to_string(), "100.00");
        assert_eq!(parse_amount("99.999").to_string(), "100.00");
        assert_eq!(parse_amount("12.344").to_string(), "12.34");
        assert_eq!(parse_amount("12.346").to_string(), "12.35");
        assert_eq!(parse_amount("1.5e2").to_string(), "150.00");
    }

    #[test]
    fn test_parse_amount_is_permissive() {
        assert_eq!(parse_amount("abc"), Amount::zero());
        assert_eq!(parse_amount(""), Amount::zero());
        assert_eq!(parse_amount("NaN"), Amount::zero());
        assert_eq!(parse_amount("1,234.50"), Amount::zero());
    }

    #[test]
    fn test_parse_amount_keeps_negative_values() {
        assert_eq!(parse_amount("-25").to_string(), "-25.00");
        assert_eq!(parse_amount(" -100 ").to_string(), "-100.00");
        assert_ne!(parse_amount("-100"), parse_amount("0"));
    }

    #[test]
    fn test_parse_amount_extreme_exponents() {
        assert!(try_parse_amount("1e1000000").is_none());
        assert!(try_parse_amount("1e100000000").is_none());
        assert_eq!(parse_amount("1e1000000"), Amount::zero());
        assert_eq!(parse_amount("1e-1000000"), Amount::zero());
        assert_eq!(parse_amount("-1e-1000000"), Amount::zero());
        assert_eq!(parse_amount("2.5e-3").to_string(), "0.00");
    }

    #[test]
    fn test_try_parse_amount() {
        assert!(try_parse_amount("abc").is_none());
        assert!(try_parse_amount("  ").is_none());
        assert_eq!(try_parse_amount("0.1").unwrap().to_string(), "0.10");
    }
}
