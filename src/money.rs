//! Money parsing and display
//!
//! Balances and amounts are `rust_decimal::Decimal` end to end: no binary
//! floating point, and every digit the user supplied is kept. Rounding only
//! ever happens in [`format_currency`], which is display-only.
//!
//! ```rust
//! use lockstep_ledger::money::{format_currency, parse_amount};
//!
//! let amount = parse_amount(" 1,500.5 ").unwrap();
//! assert_eq!(format_currency(amount), "$1,500.50");
//! ```

use rust_decimal::prelude::*;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Parse user input into a Decimal.
///
/// Surrounding whitespace and thousands separators are ignored. The sign is
/// kept; deciding whether a negative value is acceptable is up to the caller.
///
/// # Errors
/// `InvalidFormat` for empty input, stray characters, or values outside the
/// Decimal range.
pub fn parse_amount(input: &str) -> Result<Decimal, MoneyError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }

    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned).map_err(|e| MoneyError::InvalidFormat(format!("{trimmed}: {e}")))
}

/// Format a balance as US currency: `$1,500.00`, `-$500.00`.
///
/// Rounds half away from zero to cents.
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let digits = format!("{:.2}", rounded.abs());
    let (whole, frac) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!("{sign}${}.{frac}", group_thousands(whole))
}

fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_plain_and_fractional() {
        assert_eq!(parse_amount("100").unwrap(), dec!(100));
        assert_eq!(parse_amount("0.01").unwrap(), dec!(0.01));
        assert_eq!(parse_amount("  42.5\n").unwrap(), dec!(42.5));
    }

    #[test]
    fn test_parse_keeps_full_precision() {
        let v = parse_amount("123.456789012345678901").unwrap();
        assert_eq!(v, dec!(123.456789012345678901));
        assert_eq!(v.scale(), 18);
    }

    #[test]
    fn test_parse_thousands_separators_and_sign() {
        assert_eq!(parse_amount("1,000,000.25").unwrap(), dec!(1000000.25));
        assert_eq!(parse_amount("-500").unwrap(), dec!(-500));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_amount(""), Err(MoneyError::InvalidFormat(_))));
        assert!(matches!(parse_amount("   "), Err(MoneyError::InvalidFormat(_))));
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("12.3.4").is_err());
        assert!(parse_amount("$5").is_err());
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(1500)), "$1,500.00");
        assert_eq!(format_currency(dec!(0)), "$0.00");
        assert_eq!(format_currency(dec!(999.999)), "$1,000.00");
        assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_currency(dec!(100)), "$100.00");
    }

    #[test]
    fn test_format_currency_negative_and_rounding() {
        assert_eq!(format_currency(dec!(-500)), "-$500.00");
        assert_eq!(format_currency(dec!(0.005)), "$0.01");
        assert_eq!(format_currency(dec!(-0.005)), "-$0.01");
        // rounds to zero: no negative sign
        assert_eq!(format_currency(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_format_currency_extremes() {
        let max = format_currency(Decimal::MAX);
        assert!(max.starts_with("$79,228,162,514,264,337,593,543,950,335"));
        assert!(format_currency(Decimal::MIN).starts_with("-$79,228"));
    }
}
