//! USDC amounts in minor units.
//!
//! The stablecoin uses 6 implied decimal digits: `1_000_000` minor units is one
//! USDC. Amounts are kept as `u128` everywhere; no floating point is involved
//! in either direction.

use crate::error::ValidationError;

pub const USDC_DECIMALS: u32 = 6;

const UNIT: u128 = 10u128.pow(USDC_DECIMALS);

/// Parse a decimal USDC string (`"12"`, `"12.5"`, `"0.000001"`) into minor units.
pub fn parse_usdc(input: &str) -> Result<u128, ValidationError> {
    let invalid = || ValidationError::InvalidAmount(input.to_string());
    let trimmed = input.trim();

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if fraction.len() > USDC_DECIMALS as usize {
        return Err(invalid());
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) {
        return Err(invalid());
    }

    let whole_units = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().map_err(|_| invalid())?
    };
    let fraction_units = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = USDC_DECIMALS as usize);
        padded.parse::<u128>().map_err(|_| invalid())?
    };

    whole_units
        .checked_mul(UNIT)
        .and_then(|units| units.checked_add(fraction_units))
        .ok_or_else(invalid)
}

/// Render minor units with two fractional digits, truncating the rest.
pub fn format_usdc(amount: u128) -> String {
    let integer = amount / UNIT;
    let fractional = amount % UNIT;
    let padded = format!("{:0width$}", fractional, width = USDC_DECIMALS as usize);
    format!("{}.{}", integer, &padded[..2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(parse_usdc("1").unwrap(), 1_000_000);
        assert_eq!(parse_usdc("12.5").unwrap(), 12_500_000);
        assert_eq!(parse_usdc("0.000001").unwrap(), 1);
        assert_eq!(parse_usdc(".25").unwrap(), 250_000);
        assert_eq!(parse_usdc(" 3. ").unwrap(), 3_000_000);
    }

    #[test]
    fn rejects_bad_amounts() {
        for bad in ["", ".", "-1", "1.0000001", "abc", "1,5", "1.2.3"] {
            assert!(parse_usdc(bad).is_err(), "expected {bad:?} to be rejected");
        }
    }

    #[test]
    fn formats_with_two_truncated_decimals() {
        assert_eq!(format_usdc(0), "0.00");
        assert_eq!(format_usdc(1_000_000), "1.00");
        assert_eq!(format_usdc(12_345_678), "12.34");
        assert_eq!(format_usdc(999), "0.00");
        assert_eq!(format_usdc(50_000), "0.05");
    }
}
