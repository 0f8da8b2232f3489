// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction details: status, inclusion block and fee paid.

use std::fmt;

use alloy::primitives::{TxHash, U256};
use serde::Serialize;
use utoipa::ToSchema;

use super::LookupError;
use crate::blockchain::{ChainReader, Loadable, ReceiptRecord, TransactionRecord};

/// Display status of a looked-up transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum TxStatusLabel {
    Success,
    Failed,
    Pending,
    #[serde(rename = "—")]
    Unknown,
}

impl fmt::Display for TxStatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TxStatusLabel::Success => "Success",
            TxStatusLabel::Failed => "Failed",
            TxStatusLabel::Pending => "Pending",
            TxStatusLabel::Unknown => "—",
        })
    }
}

/// A receipt, when present, decides the status; otherwise a known
/// transaction is pending.
pub fn derive_status(
    transaction: Option<&TransactionRecord>,
    receipt: Option<&ReceiptRecord>,
) -> TxStatusLabel {
    match (receipt, transaction) {
        (Some(r), _) if r.success => TxStatusLabel::Success,
        (Some(_), _) => TxStatusLabel::Failed,
        (None, Some(_)) => TxStatusLabel::Pending,
        (None, None) => TxStatusLabel::Unknown,
    }
}

/// Gas price the fee is charged at: receipt price, then transaction gas
/// price, then the transaction's EIP-1559 max fee.
pub fn effective_gas_price(
    transaction: Option<&TransactionRecord>,
    receipt: Option<&ReceiptRecord>,
) -> Option<u128> {
    receipt
        .and_then(|r| r.effective_gas_price)
        .or_else(|| transaction.and_then(|t| t.gas_price))
        .or_else(|| transaction.and_then(|t| t.max_fee_per_gas))
}

/// `gas_used * gas_price` in wei, if both are known.
///
/// Only a missing factor yields `None`. A zero gas price gives a zero fee,
/// which renders as `0.0000 ETH` rather than the placeholder.
pub fn compute_fee(gas_used: Option<u128>, gas_price: Option<u128>) -> Option<U256> {
    match (gas_used, gas_price) {
        (Some(used), Some(price)) => Some(U256::from(used).saturating_mul(U256::from(price))),
        _ => None,
    }
}

/// Everything the transaction panel renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDetails {
    pub transaction: TransactionRecord,
    pub receipt: Loadable<ReceiptRecord>,
    pub status: TxStatusLabel,
    pub block_number: Option<u64>,
    pub gas_used: Option<u128>,
    pub gas_price: Option<u128>,
    pub fee_wei: Option<U256>,
}

impl TransactionDetails {
    pub fn new(transaction: TransactionRecord, receipt: Option<ReceiptRecord>) -> Self {
        let status = derive_status(Some(&transaction), receipt.as_ref());
        let gas_price = effective_gas_price(Some(&transaction), receipt.as_ref());
        let gas_used = receipt.as_ref().map(|r| r.gas_used);
        let block_number = receipt
            .as_ref()
            .and_then(|r| r.block_number)
            .or(transaction.block_number);

        Self {
            status,
            block_number,
            gas_used,
            gas_price,
            fee_wei: compute_fee(gas_used, gas_price),
            receipt: Loadable::from_option(receipt),
            transaction,
        }
    }
}

/// Fetch a transaction and its receipt concurrently.
pub async fn lookup_transaction(
    reader: &dyn ChainReader,
    hash: TxHash,
) -> Result<TransactionDetails, LookupError> {
    let (transaction, receipt) = tokio::try_join!(reader.transaction(hash), reader.receipt(hash))?;

    let Some(transaction) = transaction else {
        return Err(LookupError::TransactionNotFound);
    };

    Ok(TransactionDetails::new(transaction, receipt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::testing::{sample_receipt, sample_transaction, FakeReader};
    use crate::blockchain::SEPOLIA_CHAIN_ID;

    fn hash() -> TxHash {
        TxHash::repeat_byte(0x42)
    }

    #[test]
    fn status_labels() {
        let tx = sample_transaction(hash(), Some(50));
        let ok = sample_receipt(true, 21_000, vec![]);
        let reverted = sample_receipt(false, 21_000, vec![]);

        assert_eq!(derive_status(Some(&tx), Some(&ok)), TxStatusLabel::Success);
        assert_eq!(derive_status(Some(&tx), Some(&reverted)), TxStatusLabel::Failed);
        assert_eq!(derive_status(Some(&tx), None), TxStatusLabel::Pending);
        assert_eq!(derive_status(None, None), TxStatusLabel::Unknown);
        assert_eq!(TxStatusLabel::Unknown.to_string(), "—");
    }

    #[test]
    fn fee_is_gas_used_times_price() {
        assert_eq!(
            compute_fee(Some(21_000), Some(50)),
            Some(U256::from(1_050_000u64))
        );
        assert_eq!(compute_fee(None, Some(50)), None);
        assert_eq!(compute_fee(Some(21_000), None), None);
    }

    #[test]
    fn zero_gas_price_is_a_zero_fee_not_missing() {
        assert_eq!(compute_fee(Some(21_000), Some(0)), Some(U256::ZERO));
        assert_eq!(
            crate::api::display::eth(compute_fee(Some(21_000), Some(0))),
            "0.0000 ETH"
        );
        assert_eq!(crate::api::display::eth(compute_fee(None, Some(0))), "—");
    }

    #[test]
    fn gas_price_priority() {
        let mut tx = sample_transaction(hash(), Some(30));
        tx.max_fee_per_gas = Some(90);
        let mut receipt = sample_receipt(true, 21_000, vec![]);

        assert_eq!(effective_gas_price(Some(&tx), Some(&receipt)), Some(30));

        receipt.effective_gas_price = Some(25);
        assert_eq!(effective_gas_price(Some(&tx), Some(&receipt)), Some(25));

        tx.gas_price = None;
        assert_eq!(effective_gas_price(Some(&tx), None), Some(90));

        tx.max_fee_per_gas = None;
        assert_eq!(effective_gas_price(Some(&tx), None), None);
    }

    #[test]
    fn block_prefers_receipt() {
        let tx = sample_transaction(hash(), Some(50));
        let mut receipt = sample_receipt(true, 21_000, vec![]);
        receipt.block_number = Some(43);
        let details = TransactionDetails::new(tx.clone(), Some(receipt));
        assert_eq!(details.block_number, Some(43));

        let pending = TransactionDetails::new(TransactionRecord { block_number: None, ..tx }, None);
        assert_eq!(pending.block_number, None);
        assert_eq!(pending.status, TxStatusLabel::Pending);
        assert_eq!(pending.fee_wei, None);
        assert_eq!(pending.receipt, Loadable::Absent);
    }

    #[tokio::test]
    async fn lookup_combines_transaction_and_receipt() {
        let reader = FakeReader::new(SEPOLIA_CHAIN_ID)
            .with_transaction(sample_transaction(hash(), Some(50)))
            .with_receipt(hash(), sample_receipt(true, 21_000, vec![]));

        let details = lookup_transaction(&reader, hash()).await.unwrap();
        assert_eq!(details.status, TxStatusLabel::Success);
        assert_eq!(details.fee_wei, Some(U256::from(1_050_000u64)));
        assert_eq!(details.gas_used, Some(21_000));
    }

    #[tokio::test]
    async fn lookup_of_unknown_hash_is_not_found() {
        let reader = FakeReader::new(SEPOLIA_CHAIN_ID);
        let err = lookup_transaction(&reader, hash()).await.unwrap_err();
        assert!(matches!(err, LookupError::TransactionNotFound));
        assert!(err.is_not_found());
    }
}
