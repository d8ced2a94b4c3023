//! Fixed-point amount parsing and formatting.
//!
//! Amounts cross the ledger boundary as decimal strings and are held as
//! `u128` subunits everywhere in between. Conversion to `f64` happens only
//! at the final display step - never for a value that feeds back into
//! another ledger call.

use crate::types::Balance;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("empty amount")]
    Empty,
    #[error("amount contains invalid character {0:?}")]
    InvalidChar(char),
    #[error("amount has more than {0} decimal places")]
    TooManyDecimals(u8),
    #[error("amount does not fit in 128 bits")]
    Overflow,
}

/// Parse a non-negative decimal string into subunits at the given scale.
///
/// Accepts plain integers ("100"), decimals ("0.25", "100.5"), and a bare
/// leading dot (".5"). Rejects signs, exponents, and fractional digits
/// beyond `decimals`.
pub fn parse_units(s: &str, decimals: u8) -> Result<Balance, AmountError> {
    let s = s.trim();
    if s.is_empty() || s == "." {
        return Err(AmountError::Empty);
    }

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    if frac_part.len() > decimals as usize {
        // Reject rather than silently round: the caller is about to submit
        // this value to the ledger.
        return Err(AmountError::TooManyDecimals(decimals));
    }

    let mut value: Balance = 0;
    for c in int_part.chars().chain(frac_part.chars()) {
        let digit = c.to_digit(10).ok_or(AmountError::InvalidChar(c))? as Balance;
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit))
            .ok_or(AmountError::Overflow)?;
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(AmountError::Empty);
    }

    let shift = decimals as usize - frac_part.len();
    for _ in 0..shift {
        value = value.checked_mul(10).ok_or(AmountError::Overflow)?;
    }
    Ok(value)
}

/// Format subunits as a decimal string, trailing zeros trimmed.
pub fn format_units(value: Balance, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }
    let scale = 10u128.pow(decimals as u32);
    let int_part = value / scale;
    let frac_part = value % scale;
    if frac_part == 0 {
        return int_part.to_string();
    }
    let frac = format!("{:0width$}", frac_part, width = decimals as usize);
    format!("{}.{}", int_part, frac.trim_end_matches('0'))
}

/// Lossy conversion for display and APR math only.
pub fn to_display(value: Balance, decimals: u8) -> f64 {
    value as f64 / 10f64.powi(decimals as i32)
}

/// Display form with a fixed number of fraction digits, e.g. "12.3400".
pub fn format_fixed(value: Balance, decimals: u8, places: usize) -> String {
    format!("{:.*}", places, to_display(value, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_units("100", 18), Ok(100 * 10u128.pow(18)));
        assert_eq!(parse_units("0", 6), Ok(0));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_units("1.5", 6), Ok(1_500_000));
        assert_eq!(parse_units("0.000001", 6), Ok(1));
        assert_eq!(parse_units(".5", 6), Ok(500_000));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_units("", 6), Err(AmountError::Empty));
        assert_eq!(parse_units(".", 6), Err(AmountError::Empty));
        assert_eq!(parse_units("-1", 6), Err(AmountError::InvalidChar('-')));
        assert_eq!(parse_units("1e9", 6), Err(AmountError::InvalidChar('e')));
        assert_eq!(
            parse_units("1.2345678", 6),
            Err(AmountError::TooManyDecimals(6))
        );
    }

    #[test]
    fn test_parse_overflow() {
        // u128::MAX has 39 digits; 40 nines cannot fit.
        let too_big = "9".repeat(40);
        assert_eq!(parse_units(&too_big, 0), Err(AmountError::Overflow));
        // Fits as an integer but not once scaled by 18 decimals.
        let big = "9".repeat(30);
        assert_eq!(parse_units(&big, 18), Err(AmountError::Overflow));
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(1_500_000, 6), "1.5");
        assert_eq!(format_units(100 * 10u128.pow(18), 18), "100");
        assert_eq!(format_units(1, 6), "0.000001");
        assert_eq!(format_units(0, 18), "0");
        assert_eq!(format_units(42, 0), "42");
    }

    #[test]
    fn test_to_display() {
        assert_relative_eq!(to_display(2 * 10u128.pow(18), 18), 2.0);
        assert_relative_eq!(to_display(3_000_000, 6), 3.0);
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(1_234_500, 6, 4), "1.2345");
        assert_eq!(format_fixed(3_000_000, 6, 2), "3.00");
    }

    proptest! {
        #[test]
        fn prop_parse_format_roundtrip(v in 0u128..=u128::MAX / 10u128.pow(18)) {
            let subunits = v * 10u128.pow(18);
            let s = format_units(subunits, 18);
            prop_assert_eq!(parse_units(&s, 18), Ok(subunits));
        }

        #[test]
        fn prop_parse_never_panics(s in "\\PC{0,40}") {
            let _ = parse_units(&s, 18);
        }
    }
}
