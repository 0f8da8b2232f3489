// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory [`ChainReader`] for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use tokio::sync::Notify;

use super::client::{ChainClientError, ChainReader};
use super::types::*;

/// Scriptable chain reader. Unknown transactions/receipts read as `None`,
/// unknown token metadata reads as a contract error.
pub struct FakeReader {
    endpoint: String,
    block_number: AtomicU64,
    fail_with: Mutex<Option<String>>,
    fees: FeeSnapshot,
    chain_id: u64,
    balances: Mutex<HashMap<Address, U256>>,
    transactions: Mutex<HashMap<TxHash, TransactionRecord>>,
    receipts: Mutex<HashMap<TxHash, ReceiptRecord>>,
    symbols: Mutex<HashMap<Address, String>>,
    decimals: Mutex<HashMap<Address, u8>>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl FakeReader {
    pub fn new(chain_id: u64) -> Self {
        Self {
            endpoint: "http://fake.rpc".to_string(),
            block_number: AtomicU64::new(100),
            fail_with: Mutex::new(None),
            fees: FeeSnapshot {
                gas_price: Some(20_000_000_000),
                max_fee_per_gas: Some(41_000_000_000),
                max_priority_fee_per_gas: Some(1_000_000_000),
            },
            chain_id,
            balances: Mutex::new(HashMap::new()),
            transactions: Mutex::new(HashMap::new()),
            receipts: Mutex::new(HashMap::new()),
            symbols: Mutex::new(HashMap::new()),
            decimals: Mutex::new(HashMap::new()),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Block-number reads wait for `gate` to be notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn set_block_number(&self, block: u64) {
        self.block_number.store(block, Ordering::SeqCst);
    }

    /// Make every subsequent block-number read fail (`None` to recover).
    pub fn set_failure(&self, message: Option<&str>) {
        *self.fail_with.lock().unwrap() = message.map(str::to_string);
    }

    pub fn with_balance(self, address: Address, balance: U256) -> Self {
        self.balances.lock().unwrap().insert(address, balance);
        self
    }

    pub fn with_transaction(self, tx: TransactionRecord) -> Self {
        self.transactions.lock().unwrap().insert(tx.hash, tx);
        self
    }

    pub fn with_receipt(self, hash: TxHash, receipt: ReceiptRecord) -> Self {
        self.receipts.lock().unwrap().insert(hash, receipt);
        self
    }

    pub fn with_symbol(self, token: Address, symbol: &str) -> Self {
        self.symbols.lock().unwrap().insert(token, symbol.to_string());
        self
    }

    pub fn with_decimals(self, token: Address, decimals: u8) -> Self {
        self.decimals.lock().unwrap().insert(token, decimals);
        self
    }

    /// Total number of reads issued against this reader.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChainReader for FakeReader {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn block_number(&self) -> Result<u64, ChainClientError> {
        self.record_call();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(ChainClientError::RpcError(message));
        }
        Ok(self.block_number.load(Ordering::SeqCst))
    }

    async fn fee_snapshot(&self) -> Result<FeeSnapshot, ChainClientError> {
        self.record_call();
        Ok(self.fees)
    }

    async fn network(&self) -> Result<NetworkIdentity, ChainClientError> {
        self.record_call();
        Ok(NetworkIdentity::from_chain_id(self.chain_id))
    }

    async fn balance(&self, address: Address) -> Result<U256, ChainClientError> {
        self.record_call();
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&address)
            .copied()
            .unwrap_or_default())
    }

    async fn transaction(
        &self,
        hash: TxHash,
    ) -> Result<Option<TransactionRecord>, ChainClientError> {
        self.record_call();
        Ok(self.transactions.lock().unwrap().get(&hash).cloned())
    }

    async fn receipt(&self, hash: TxHash) -> Result<Option<ReceiptRecord>, ChainClientError> {
        self.record_call();
        Ok(self.receipts.lock().unwrap().get(&hash).cloned())
    }

    async fn token_symbol(&self, token: Address) -> Result<String, ChainClientError> {
        self.record_call();
        self.symbols
            .lock()
            .unwrap()
            .get(&token)
            .cloned()
            .ok_or_else(|| ChainClientError::ContractError("execution reverted".into()))
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, ChainClientError> {
        self.record_call();
        self.decimals
            .lock()
            .unwrap()
            .get(&token)
            .copied()
            .ok_or_else(|| ChainClientError::ContractError("execution reverted".into()))
    }
}

/// A mined value transfer with the given gas figures.
pub fn sample_transaction(hash: TxHash, gas_price: Option<u128>) -> TransactionRecord {
    TransactionRecord {
        hash,
        from: Some(Address::repeat_byte(0xaa)),
        to: Some(Address::repeat_byte(0xbb)),
        value: U256::from(1_000_000_000_000_000_000u64),
        gas_price,
        max_fee_per_gas: None,
        block_number: Some(42),
    }
}

pub fn sample_receipt(success: bool, gas_used: u128, logs: Vec<LogEntry>) -> ReceiptRecord {
    ReceiptRecord {
        success,
        gas_used,
        effective_gas_price: None,
        block_number: Some(42),
        logs,
    }
}
