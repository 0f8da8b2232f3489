// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Display strings shared by the view DTOs. Missing values render as `—`.

use alloy::primitives::{Address, U256};

use crate::blockchain::{format_eth, format_gwei, shorten_address, DISPLAY_PLACEHOLDER};

/// `None` becomes the placeholder; zero values still render as numbers.
pub fn or_placeholder<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| DISPLAY_PLACEHOLDER.to_string())
}

/// `1.2345 ETH`
pub fn eth(wei: Option<U256>) -> String {
    or_placeholder(wei.map(|w| format!("{} ETH", format_eth(w))))
}

/// `20.00 Gwei`
pub fn gwei(wei: Option<u128>) -> String {
    or_placeholder(wei.map(|w| format!("{} Gwei", format_gwei(w))))
}

pub fn short_address(address: Option<Address>) -> String {
    or_placeholder(address.map(|a| shorten_address(&a.to_string())))
}
