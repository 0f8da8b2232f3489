// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Unit formatting for wei amounts, gas prices and addresses.

use alloy::primitives::U256;

/// Decimals of the native currency (ETH).
pub const ETHER_DECIMALS: u8 = 18;

/// Decimals of a gwei relative to wei.
pub const GWEI_DECIMALS: u8 = 9;

/// Format an amount with the specified decimals, keeping full precision.
///
/// Trailing zeros of the fractional part are dropped; whole amounts have no
/// fractional part at all. Works on the decimal digits, so any `u8`
/// precision is accepted.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    let (whole, fraction) = split_decimal(&amount.to_string(), decimals as usize);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Format an amount rounded half-up to exactly `places` fractional digits.
pub fn format_fixed(amount: U256, decimals: u8, places: u8) -> String {
    let (decimals, places) = (decimals as usize, places as usize);
    let digits = amount.to_string();

    let scaled = if places >= decimals {
        format!("{}{}", digits, "0".repeat(places - decimals))
    } else {
        let dropped = decimals - places;
        let padded = format!("{:0>width$}", digits, width = dropped + 1);
        let (kept, rest) = padded.split_at(padded.len() - dropped);
        if rest.starts_with(['5', '6', '7', '8', '9']) {
            increment_decimal(kept)
        } else {
            kept.to_string()
        }
    };

    let (whole, fraction) = split_decimal(&scaled, places);
    if places == 0 {
        whole
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Split a decimal digit string `decimals` places from the right.
///
/// The whole part has no leading zeros (but is at least `0`); the fraction
/// is exactly `decimals` digits.
fn split_decimal(digits: &str, decimals: usize) -> (String, String) {
    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let whole = whole.trim_start_matches('0');
    let whole = if whole.is_empty() { "0" } else { whole };
    (whole.to_string(), fraction.to_string())
}

/// Add one to a string of decimal digits.
fn increment_decimal(digits: &str) -> String {
    let mut out: Vec<char> = digits.chars().collect();
    for c in out.iter_mut().rev() {
        if *c == '9' {
            *c = '0';
        } else {
            *c = char::from(*c as u8 + 1);
            return out.into_iter().collect();
        }
    }
    std::iter::once('1').chain(out).collect()
}

/// Wei to ETH with 4 fractional digits.
pub fn format_eth(wei: U256) -> String {
    format_fixed(wei, ETHER_DECIMALS, 4)
}

/// Wei to gwei with 2 fractional digits.
pub fn format_gwei(wei: u128) -> String {
    format_fixed(U256::from(wei), GWEI_DECIMALS, 2)
}

/// `0x1234...abcd` form of an address or hash.
pub fn shorten_address(value: &str) -> String {
    if value.len() <= 10 || !value.is_ascii() {
        return value.to_string();
    }
    format!("{}...{}", &value[..6], &value[value.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        let one_eth = U256::from(1_000_000_000_000_000_000u64);
        assert_eq!(format_amount(one_eth, 18), "1");

        let one_and_half = U256::from(1_500_000_000_000_000_000u64);
        assert_eq!(format_amount(one_and_half, 18), "1.5");

        assert_eq!(format_amount(U256::ZERO, 18), "0");
        assert_eq!(format_amount(U256::from(1_050_000u64), 18), "0.00000000000105");
    }

    #[test]
    fn test_format_amount_usdt() {
        assert_eq!(format_amount(U256::from(1_000_000u64), 6), "1");
        assert_eq!(format_amount(U256::from(12_345_678u64), 6), "12.345678");
        assert_eq!(format_amount(U256::from(1u64), 6), "0.000001");
    }

    #[test]
    fn test_format_fixed_rounds_half_up() {
        // 1.23456 ETH -> 1.2346
        let wei = U256::from(1_234_560_000_000_000_000u64);
        assert_eq!(format_eth(wei), "1.2346");

        // 0.00004999 ETH -> 0.0000
        assert_eq!(format_eth(U256::from(49_990_000_000_000u64)), "0.0000");
        // 0.00005 ETH -> 0.0001
        assert_eq!(format_eth(U256::from(50_000_000_000_000u64)), "0.0001");

        assert_eq!(format_eth(U256::ZERO), "0.0000");
        assert_eq!(format_fixed(U256::from(5u64), 0, 2), "5.00");
        assert_eq!(format_fixed(U256::from(1_500u64), 3, 0), "2");
        assert_eq!(format_fixed(U256::from(9_995u64), 4, 2), "1.00");
        assert_eq!(format_fixed(U256::from(99_950u64), 3, 2), "99.95");
    }

    #[test]
    fn test_format_amount_beyond_u256_precision() {
        // 10^100 does not fit in a U256, so no divisor is ever built.
        let expected = format!("0.{}{}", "0".repeat(22), U256::MAX);
        assert_eq!(format_amount(U256::MAX, 100), expected);

        let ten_pow_77 = format!("1{}", "0".repeat(77)).parse::<U256>().unwrap();
        assert_eq!(format_amount(ten_pow_77, 78), "0.1");
        assert_eq!(format_amount(ten_pow_77, 77), "1");
        assert_eq!(format_amount(U256::from(1u64), 255), format!("0.{}1", "0".repeat(254)));
    }

    #[test]
    fn test_format_fixed_beyond_u256_precision() {
        assert_eq!(format_fixed(U256::MAX, 100, 4), "0.0000");
        assert_eq!(format_fixed(U256::MAX, 0, 2), format!("{}.00", U256::MAX));
        assert_eq!(format_fixed(U256::MAX, 77, 1), "1.2");
        assert_eq!(format_fixed(U256::MAX, 78, 1), "0.1");
    }

    #[test]
    fn test_format_gwei() {
        assert_eq!(format_gwei(12_345_678_901), "12.35");
        assert_eq!(format_gwei(1_000_000_000), "1.00");
        assert_eq!(format_gwei(0), "0.00");
    }

    #[test]
    fn test_shorten_address() {
        assert_eq!(
            shorten_address("0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12"),
            "0x742d...aB12"
        );
        assert_eq!(shorten_address("0x1234"), "0x1234");
    }
}
