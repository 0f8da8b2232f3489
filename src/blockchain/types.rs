// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.
//!
//! These are the normalized records the rest of the service works with.
//! Alloy RPC types never leave [`super::client`].

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Ethereum mainnet chain ID.
pub const MAINNET_CHAIN_ID: u64 = 1;

/// Sepolia testnet chain ID.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Holesky testnet chain ID.
pub const HOLESKY_CHAIN_ID: u64 = 17_000;

/// Placeholder rendered wherever a value is not available.
pub const DISPLAY_PLACEHOLDER: &str = "—";

/// Human-readable network name for a chain ID.
pub fn network_name(chain_id: u64) -> &'static str {
    match chain_id {
        MAINNET_CHAIN_ID => "mainnet",
        SEPOLIA_CHAIN_ID => "sepolia",
        HOLESKY_CHAIN_ID => "holesky",
        _ => "unknown",
    }
}

/// Hosted JSON-RPC vendor the dashboard reads through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RpcSource {
    #[default]
    Alchemy,
    Infura,
}

impl RpcSource {
    /// The other provider, used as a fallback during URL resolution.
    pub fn alternate(self) -> Self {
        match self {
            RpcSource::Alchemy => RpcSource::Infura,
            RpcSource::Infura => RpcSource::Alchemy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RpcSource::Alchemy => "alchemy",
            RpcSource::Infura => "infura",
        }
    }
}

impl fmt::Display for RpcSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RpcSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alchemy" => Ok(RpcSource::Alchemy),
            "infura" => Ok(RpcSource::Infura),
            other => Err(format!(
                "Unknown RPC source `{other}` (expected `alchemy` or `infura`)"
            )),
        }
    }
}

/// Gas fee data as reported by the endpoint, all in wei.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeSnapshot {
    /// Legacy gas price (`eth_gasPrice`)
    pub gas_price: Option<u128>,
    /// EIP-1559 max fee per gas
    pub max_fee_per_gas: Option<u128>,
    /// EIP-1559 max priority fee per gas
    pub max_priority_fee_per_gas: Option<u128>,
}

/// Network name and chain ID, fetched together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkIdentity {
    pub name: String,
    pub chain_id: u64,
}

impl NetworkIdentity {
    pub fn from_chain_id(chain_id: u64) -> Self {
        Self {
            name: network_name(chain_id).to_string(),
            chain_id,
        }
    }
}

impl fmt::Display for NetworkIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.chain_id)
    }
}

/// A transaction as returned by `eth_getTransactionByHash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub hash: TxHash,
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub value: U256,
    /// Legacy gas price, or the effective gas price once mined
    pub gas_price: Option<u128>,
    /// Only set for dynamic-fee transactions
    pub max_fee_per_gas: Option<u128>,
    pub block_number: Option<u64>,
}

/// One log entry of a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// A transaction receipt. Once present it is authoritative for status and fees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptRecord {
    pub success: bool,
    pub gas_used: u128,
    pub effective_gas_price: Option<u128>,
    pub block_number: Option<u64>,
    pub logs: Vec<LogEntry>,
}

/// ERC-20 token metadata used to render transfer amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub symbol: String,
    pub decimals: u8,
}

/// Symbol assumed when the token contract does not answer `symbol()`.
pub const FALLBACK_TOKEN_SYMBOL: &str = "USDT";

/// Decimals assumed when the token contract does not answer `decimals()`.
pub const FALLBACK_TOKEN_DECIMALS: u8 = 6;

/// Explicit tri-state for anything fetched on demand.
///
/// `Unloaded` means no fetch has completed for the current input, `Absent`
/// means the endpoint confirmed there is nothing to show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Loadable<T> {
    #[default]
    Unloaded,
    Absent,
    Present(T),
}

/// Shape-only view of a [`Loadable`] for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Unloaded,
    Absent,
    Present,
}

impl<T> Loadable<T> {
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Loadable::Present(v),
            None => Loadable::Absent,
        }
    }

    pub fn present(&self) -> Option<&T> {
        match self {
            Loadable::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn state(&self) -> LoadState {
        match self {
            Loadable::Unloaded => LoadState::Unloaded,
            Loadable::Absent => LoadState::Absent,
            Loadable::Present(_) => LoadState::Present,
        }
    }
}

/// Parse a transaction hash exactly as the dashboard input accepts it:
/// `0x` followed by 64 hex characters, surrounding whitespace ignored.
pub fn parse_tx_hash(input: &str) -> Option<TxHash> {
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix("0x")?;
    if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    TxHash::from_str(trimmed).ok()
}

/// Parse a free-text address; blank input means "no address".
pub fn parse_optional_address(input: Option<&str>) -> Result<Option<Address>, String> {
    match input.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => Address::from_str(raw)
            .map(Some)
            .map_err(|e| format!("Invalid address `{raw}`: {e}")),
    }
}
