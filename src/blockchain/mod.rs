// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration module for EVM JSON-RPC endpoints.
//!
//! This module provides functionality for:
//! - Resolving the RPC endpoint for a provider and network
//! - Reading blocks, fees, balances, transactions and receipts
//! - Decoding ERC-20 Transfer logs and token metadata
//! - Signing and broadcasting DataLogger writes

pub mod client;
pub mod data_logger;
pub mod endpoint;
pub mod erc20;
pub mod signing;
pub mod token_cache;
pub mod types;
pub mod units;

#[cfg(test)]
pub mod testing;

pub use client::{ChainClient, ChainClientError, ChainReader, SharedReader};
pub use endpoint::{rpc_url_for, RpcOverrides};
pub use token_cache::TokenMetadataCache;
pub use types::*;
pub use units::{format_amount, format_eth, format_gwei, shorten_address};
