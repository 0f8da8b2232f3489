// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC chain client.
//!
//! [`ChainReader`] is the read surface the poller and lookups depend on.
//! [`ChainClient`] implements it over an alloy HTTP provider and converts
//! alloy RPC types into the records in [`super::types`].

use std::sync::Arc;

use alloy::{
    consensus::Transaction as _,
    eips::BlockNumberOrTag,
    network::{Ethereum, EthereumWallet, TransactionResponse},
    primitives::{Address, TxHash, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    rpc::types::{Transaction, TransactionReceipt},
    signers::local::PrivateKeySigner,
};
use async_trait::async_trait;

use super::erc20::Erc20Contract;
use super::types::*;

/// Priority fee assumed when the node does not answer `eth_maxPriorityFeePerGas`.
pub const DEFAULT_PRIORITY_FEE_WEI: u128 = 1_000_000_000; // 1 gwei

/// HTTP provider type (with all fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Read-only view of a chain endpoint.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Endpoint URL this reader talks to.
    fn endpoint(&self) -> &str;

    async fn block_number(&self) -> Result<u64, ChainClientError>;

    async fn fee_snapshot(&self) -> Result<FeeSnapshot, ChainClientError>;

    async fn network(&self) -> Result<NetworkIdentity, ChainClientError>;

    async fn balance(&self, address: Address) -> Result<U256, ChainClientError>;

    /// `Ok(None)` when the node does not know the transaction.
    async fn transaction(&self, hash: TxHash)
        -> Result<Option<TransactionRecord>, ChainClientError>;

    /// `Ok(None)` while the transaction is unmined or unknown.
    async fn receipt(&self, hash: TxHash) -> Result<Option<ReceiptRecord>, ChainClientError>;

    async fn token_symbol(&self, token: Address) -> Result<String, ChainClientError>;

    async fn token_decimals(&self, token: Address) -> Result<u8, ChainClientError>;
}

/// Shared handle to whichever reader is currently selected.
pub type SharedReader = Arc<dyn ChainReader>;

/// Chain client over one resolved RPC URL.
pub struct ChainClient {
    rpc_url: String,
    provider: HttpProvider,
}

impl ChainClient {
    /// Create a new client for the given endpoint.
    pub fn new(rpc_url: &str) -> Result<Self, ChainClientError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| ChainClientError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url);

        Ok(Self {
            rpc_url: rpc_url.to_string(),
            provider,
        })
    }

    /// Create a client and erase it behind the [`ChainReader`] seam.
    pub fn shared(rpc_url: &str) -> Result<SharedReader, ChainClientError> {
        Ok(Arc::new(Self::new(rpc_url)?))
    }

    /// Create a signer from a private key (hex string, optional 0x prefix).
    pub fn create_signer(private_key_hex: &str) -> Result<PrivateKeySigner, ChainClientError> {
        let trimmed = private_key_hex.trim();
        let key_bytes = alloy::hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))
            .map_err(|e| ChainClientError::InvalidPrivateKey(e.to_string()))?;

        PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| ChainClientError::InvalidPrivateKey(e.to_string()))
    }

    /// Create an Ethereum wallet from a signer.
    pub fn create_wallet(signer: PrivateKeySigner) -> EthereumWallet {
        EthereumWallet::from(signer)
    }
}

#[async_trait]
impl ChainReader for ChainClient {
    fn endpoint(&self) -> &str {
        &self.rpc_url
    }

    async fn block_number(&self) -> Result<u64, ChainClientError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ChainClientError::RpcError(e.to_string()))
    }

    async fn fee_snapshot(&self) -> Result<FeeSnapshot, ChainClientError> {
        let (gas_price, priority_fee, block) = tokio::join!(
            async { self.provider.get_gas_price().await },
            async { self.provider.get_max_priority_fee_per_gas().await },
            async {
                self.provider
                    .get_block_by_number(BlockNumberOrTag::Latest)
                    .await
            },
        );

        let block = block
            .map_err(|e| ChainClientError::RpcError(format!("Failed to get block: {}", e)))?
            .ok_or_else(|| ChainClientError::RpcError("No latest block".to_string()))?;

        let gas_price = match gas_price {
            Ok(price) => Some(price),
            Err(e) => {
                tracing::debug!(error = %e, "eth_gasPrice unavailable");
                None
            }
        };

        Ok(fee_snapshot_from_parts(
            gas_price,
            priority_fee.ok(),
            block.header.base_fee_per_gas,
        ))
    }

    async fn network(&self) -> Result<NetworkIdentity, ChainClientError> {
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .map_err(|e| ChainClientError::RpcError(e.to_string()))?;
        Ok(NetworkIdentity::from_chain_id(chain_id))
    }

    async fn balance(&self, address: Address) -> Result<U256, ChainClientError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| ChainClientError::RpcError(e.to_string()))
    }

    async fn transaction(
        &self,
        hash: TxHash,
    ) -> Result<Option<TransactionRecord>, ChainClientError> {
        let tx = self
            .provider
            .get_transaction_by_hash(hash)
            .await
            .map_err(|e| ChainClientError::RpcError(format!("Failed to get transaction: {}", e)))?;
        Ok(tx.map(|tx| transaction_record(&tx)))
    }

    async fn receipt(&self, hash: TxHash) -> Result<Option<ReceiptRecord>, ChainClientError> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| ChainClientError::RpcError(format!("Failed to get receipt: {}", e)))?;
        Ok(receipt.map(|r| receipt_record(&r)))
    }

    async fn token_symbol(&self, token: Address) -> Result<String, ChainClientError> {
        Erc20Contract::new(&self.provider, token).symbol().await
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, ChainClientError> {
        Erc20Contract::new(&self.provider, token).decimals().await
    }
}

/// Assemble fee data the way wallets estimate it.
///
/// EIP-1559 fields exist only when the latest block has a base fee:
/// `max_fee = 2 * base_fee + priority_fee`.
pub fn fee_snapshot_from_parts(
    gas_price: Option<u128>,
    priority_fee: Option<u128>,
    base_fee_per_gas: Option<u64>,
) -> FeeSnapshot {
    match base_fee_per_gas {
        Some(base_fee) => {
            let priority = priority_fee.unwrap_or(DEFAULT_PRIORITY_FEE_WEI);
            let max_fee = u128::from(base_fee)
                .saturating_mul(2)
                .saturating_add(priority);
            FeeSnapshot {
                gas_price,
                max_fee_per_gas: Some(max_fee),
                max_priority_fee_per_gas: Some(priority),
            }
        }
        None => FeeSnapshot {
            gas_price,
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
        },
    }
}

fn transaction_record(tx: &Transaction) -> TransactionRecord {
    let gas_price = tx
        .effective_gas_price
        .or_else(|| alloy::consensus::Transaction::gas_price(tx));
    let max_fee_per_gas = if tx.is_dynamic_fee() {
        Some(alloy::consensus::Transaction::max_fee_per_gas(tx))
    } else {
        None
    };

    TransactionRecord {
        hash: tx.tx_hash(),
        from: Some(TransactionResponse::from(tx)),
        to: alloy::consensus::Transaction::to(tx),
        value: alloy::consensus::Transaction::value(tx),
        gas_price,
        max_fee_per_gas,
        block_number: tx.block_number,
    }
}

fn receipt_record(receipt: &TransactionReceipt) -> ReceiptRecord {
    let logs = receipt
        .inner
        .logs()
        .iter()
        .map(|log| LogEntry {
            address: log.address(),
            topics: log.topics().to_vec(),
            data: log.data().data.clone(),
        })
        .collect();

    ReceiptRecord {
        success: receipt.status(),
        gas_used: u128::from(receipt.gas_used),
        effective_gas_price: Some(receipt.effective_gas_price),
        block_number: receipt.block_number,
        logs,
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChainClientError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Contract error: {0}")]
    ContractError(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
}
