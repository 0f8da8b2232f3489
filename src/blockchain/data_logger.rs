// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! DataLogger contract write path.
//!
//! The contract exposes a single mutating function, `log(string,bytes32)`,
//! which emits `DataLogged`. Calls are signed by the connected wallet and
//! broadcast with alloy's default gas, nonce and chain-id fillers.

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{keccak256, Address, TxHash, B256},
    providers::{PendingTransactionBuilder, ProviderBuilder},
    sol,
    sol_types::SolEvent,
};

use super::client::ChainClientError;

sol! {
    #[sol(rpc)]
    contract DataLogger {
        event DataLogged(address indexed sender, string memo, bytes32 indexed dataId, uint256 timestamp);

        function log(string memo, bytes32 dataId) external;
    }
}

/// Seed hashed when neither a custom id nor a memo is given.
const EMPTY_DATA_ID_SEED: &str = "logger";

/// Resolve the `bytes32` data id for a log call.
///
/// A trimmed custom id of the form `0x` + 64 hex chars is used verbatim.
/// Anything else is a seed: `keccak256(custom || memo || "logger")`.
pub fn derive_data_id(memo: &str, custom_id: Option<&str>) -> Result<B256, String> {
    let manual = custom_id.map(str::trim).unwrap_or_default();

    if manual.starts_with("0x") && manual.len() == 66 {
        return manual
            .parse::<B256>()
            .map_err(|e| format!("Invalid bytes32 data id `{manual}`: {e}"));
    }

    let seed = if !manual.is_empty() {
        manual
    } else if !memo.is_empty() {
        memo
    } else {
        EMPTY_DATA_ID_SEED
    };
    Ok(keccak256(seed.as_bytes()))
}

/// Outcome of a mined log transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfirmation {
    pub block_number: Option<u64>,
    pub success: bool,
    /// Number of `DataLogged` events in the receipt
    pub logged_events: usize,
}

/// Client for one deployed DataLogger contract.
#[derive(Debug, Clone)]
pub struct DataLoggerClient {
    rpc_url: String,
    contract: Address,
}

impl DataLoggerClient {
    pub fn new(rpc_url: impl Into<String>, contract: Address) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            contract,
        }
    }

    /// Sign and broadcast `log(memo, data_id)`.
    pub async fn submit(
        &self,
        wallet: EthereumWallet,
        memo: &str,
        data_id: B256,
    ) -> Result<PendingTransactionBuilder<Ethereum>, ChainClientError> {
        let url: url::Url = self
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| ChainClientError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);
        let contract = DataLogger::new(self.contract, provider);

        contract
            .log(memo.to_string(), data_id)
            .send()
            .await
            .map_err(|e| ChainClientError::TransactionFailed(format!("Failed to send: {}", e)))
    }
}

/// Wait for a broadcast log transaction to be mined.
pub async fn confirm(
    pending: PendingTransactionBuilder<Ethereum>,
) -> Result<LogConfirmation, ChainClientError> {
    let receipt = pending
        .get_receipt()
        .await
        .map_err(|e| ChainClientError::RpcError(format!("Failed to get receipt: {}", e)))?;

    let logged_events = receipt
        .inner
        .logs()
        .iter()
        .filter(|log| log.topics().first() == Some(&DataLogger::DataLogged::SIGNATURE_HASH))
        .count();

    Ok(LogConfirmation {
        block_number: receipt.block_number,
        success: receipt.status(),
        logged_events,
    })
}

/// Hash of a pending broadcast.
pub fn pending_hash(pending: &PendingTransactionBuilder<Ethereum>) -> TxHash {
    *pending.tx_hash()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_bytes32_id_is_used_verbatim() {
        let custom = format!("0x{}", "ab".repeat(32));
        let id = derive_data_id("memo", Some(&format!("  {custom} "))).unwrap();
        assert_eq!(format!("{id:#x}"), custom);
    }

    #[test]
    fn malformed_bytes32_id_is_rejected() {
        let custom = format!("0x{}", "zz".repeat(32));
        assert!(derive_data_id("memo", Some(&custom)).is_err());
    }

    #[test]
    fn short_custom_id_is_hashed() {
        let id = derive_data_id("memo", Some("order-42")).unwrap();
        assert_eq!(id, keccak256("order-42".as_bytes()));
    }

    #[test]
    fn memo_then_default_seed() {
        assert_eq!(
            derive_data_id("Hello from Sepolia testnet", None).unwrap(),
            keccak256("Hello from Sepolia testnet".as_bytes())
        );
        assert_eq!(
            derive_data_id("", Some("   ")).unwrap(),
            keccak256("logger".as_bytes())
        );
    }

    #[test]
    fn data_logged_signature() {
        assert_eq!(
            DataLogger::DataLogged::SIGNATURE,
            "DataLogged(address,string,bytes32,uint256)"
        );
    }
}
