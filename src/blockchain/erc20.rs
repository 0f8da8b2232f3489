// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 token contract interactions and Transfer log decoding.

use alloy::{
    primitives::{Address, B256, U256},
    providers::Provider,
    sol,
    sol_types::SolEvent,
};

use super::client::ChainClientError;
use super::types::LogEntry;

// Define the ERC-20 interface using alloy's sol! macro
sol! {
    #[sol(rpc)]
    interface IERC20 {
        event Transfer(address indexed from, address indexed to, uint256 value);

        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }
}

/// keccak256("Transfer(address,address,uint256)")
pub const TRANSFER_TOPIC: B256 = IERC20::Transfer::SIGNATURE_HASH;

/// ERC-20 contract wrapper.
pub struct Erc20Contract<P> {
    contract: IERC20::IERC20Instance<P>,
}

impl<P: Provider + Clone> Erc20Contract<P> {
    /// Create a new ERC-20 contract instance.
    pub fn new(provider: &P, address: Address) -> Self {
        Self {
            contract: IERC20::new(address, provider.clone()),
        }
    }

    /// Get the token symbol.
    pub async fn symbol(&self) -> Result<String, ChainClientError> {
        let result = self
            .contract
            .symbol()
            .call()
            .await
            .map_err(|e| ChainClientError::ContractError(e.to_string()))?;
        Ok(result.to_string())
    }

    /// Get the token decimals.
    pub async fn decimals(&self) -> Result<u8, ChainClientError> {
        let result = self
            .contract
            .decimals()
            .call()
            .await
            .map_err(|e| ChainClientError::ContractError(e.to_string()))?;
        Ok(result)
    }
}

/// Arguments of a decoded `Transfer` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTransfer {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

/// Whether a log's primary topic is the ERC-20 Transfer signature.
pub fn is_transfer_log(log: &LogEntry) -> bool {
    log.topics.first() == Some(&TRANSFER_TOPIC)
}

/// Decode `Transfer(from, to, value)` from a raw log.
///
/// Transfer has 3 topics: [event_sig, from, to] and data = value. The
/// 4-topic ERC-721 variant with an indexed token id is rejected.
pub fn decode_transfer_log(log: &LogEntry) -> Result<DecodedTransfer, String> {
    if !is_transfer_log(log) {
        return Err("log is not a Transfer event".to_string());
    }
    if log.topics.len() != 3 {
        return Err(format!(
            "expected 3 topics for Transfer, found {}",
            log.topics.len()
        ));
    }
    if log.data.len() < 32 {
        return Err(format!(
            "expected at least 32 bytes of Transfer data, found {}",
            log.data.len()
        ));
    }

    Ok(DecodedTransfer {
        token: log.address,
        from: Address::from_word(log.topics[1]),
        to: Address::from_word(log.topics[2]),
        value: U256::from_be_slice(&log.data[..32]),
    })
}
