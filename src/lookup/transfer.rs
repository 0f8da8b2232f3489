// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 Transfer decoding for a single transaction.

use alloy::primitives::{Address, TxHash, U256};

use super::LookupError;
use crate::blockchain::erc20::{decode_transfer_log, is_transfer_log};
use crate::blockchain::{
    format_amount, ChainReader, TokenMetadata, TokenMetadataCache, FALLBACK_TOKEN_DECIMALS,
    FALLBACK_TOKEN_SYMBOL,
};

/// Human-readable summary of the first Transfer event in a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSummary {
    pub tx_hash: TxHash,
    pub token_address: Address,
    pub symbol: String,
    pub decimals: u8,
    pub raw_amount: U256,
    pub amount_formatted: String,
    pub from: Address,
    pub to: Address,
    pub block_number: Option<u64>,
    pub chain_id: u64,
}

/// Resolve symbol and decimals for a token, falling back per field.
async fn token_metadata(
    reader: &dyn ChainReader,
    token: Address,
    cache: Option<&TokenMetadataCache>,
) -> TokenMetadata {
    if let Some(hit) = cache.and_then(|c| c.get(&token)) {
        return hit;
    }

    let (symbol, decimals) = tokio::join!(reader.token_symbol(token), reader.token_decimals(token));

    match (symbol, decimals) {
        (Ok(symbol), Ok(decimals)) => {
            let metadata = TokenMetadata { symbol, decimals };
            if let Some(cache) = cache {
                cache.put(token, metadata.clone());
            }
            metadata
        }
        (symbol, decimals) => {
            tracing::warn!(
                token = %token,
                symbol_error = ?symbol.as_ref().err(),
                decimals_error = ?decimals.as_ref().err(),
                "Token metadata unavailable, using defaults"
            );
            TokenMetadata {
                symbol: symbol.unwrap_or_else(|_| FALLBACK_TOKEN_SYMBOL.to_string()),
                decimals: decimals.unwrap_or(FALLBACK_TOKEN_DECIMALS),
            }
        }
    }
}

/// Fetch the receipt for `hash` and decode its first Transfer log.
pub async fn decode_transfer(
    reader: &dyn ChainReader,
    hash: TxHash,
    cache: Option<&TokenMetadataCache>,
) -> Result<TransferSummary, LookupError> {
    let (receipt, network) = tokio::try_join!(reader.receipt(hash), reader.network())?;

    let receipt = receipt.ok_or(LookupError::ReceiptNotFound)?;
    let log = receipt
        .logs
        .iter()
        .find(|log| is_transfer_log(log))
        .ok_or(LookupError::NoTransferEvent)?;
    let transfer = decode_transfer_log(log).map_err(LookupError::MalformedLog)?;

    let metadata = token_metadata(reader, transfer.token, cache).await;

    tracing::debug!(
        tx_hash = %hash,
        token = %transfer.token,
        symbol = %metadata.symbol,
        "Decoded transfer"
    );

    Ok(TransferSummary {
        tx_hash: hash,
        token_address: transfer.token,
        amount_formatted: format_amount(transfer.value, metadata.decimals),
        symbol: metadata.symbol,
        decimals: metadata.decimals,
        raw_amount: transfer.value,
        from: transfer.from,
        to: transfer.to,
        block_number: receipt.block_number,
        chain_id: network.chain_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::erc20::TRANSFER_TOPIC;
    use crate::blockchain::testing::{sample_receipt, FakeReader};
    use crate::blockchain::{LogEntry, SEPOLIA_CHAIN_ID};
    use alloy::primitives::{Bytes, B256};

    fn hash() -> TxHash {
        TxHash::repeat_byte(0x77)
    }

    fn token() -> Address {
        Address::repeat_byte(0x55)
    }

    fn transfer_log(value: u64) -> LogEntry {
        LogEntry {
            address: token(),
            topics: vec![
                TRANSFER_TOPIC,
                Address::repeat_byte(0x01).into_word(),
                Address::repeat_byte(0x02).into_word(),
            ],
            data: Bytes::from(U256::from(value).to_be_bytes::<32>().to_vec()),
        }
    }

    fn approval_log() -> LogEntry {
        LogEntry {
            address: token(),
            topics: vec![B256::repeat_byte(0x8c)],
            data: Bytes::new(),
        }
    }

    #[tokio::test]
    async fn decodes_first_transfer_with_metadata() {
        let reader = FakeReader::new(SEPOLIA_CHAIN_ID)
            .with_receipt(
                hash(),
                sample_receipt(true, 50_000, vec![approval_log(), transfer_log(1_500_000)]),
            )
            .with_symbol(token(), "DAI")
            .with_decimals(token(), 18);

        let summary = decode_transfer(&reader, hash(), None).await.unwrap();
        assert_eq!(summary.symbol, "DAI");
        assert_eq!(summary.decimals, 18);
        assert_eq!(summary.raw_amount, U256::from(1_500_000u64));
        assert_eq!(summary.from, Address::repeat_byte(0x01));
        assert_eq!(summary.to, Address::repeat_byte(0x02));
        assert_eq!(summary.block_number, Some(42));
        assert_eq!(summary.chain_id, SEPOLIA_CHAIN_ID);
    }

    #[tokio::test]
    async fn oversized_decimals_still_format_exactly() {
        let reader = FakeReader::new(SEPOLIA_CHAIN_ID)
            .with_receipt(hash(), sample_receipt(true, 50_000, vec![transfer_log(u64::MAX)]))
            .with_symbol(token(), "ODD")
            .with_decimals(token(), 100);

        let summary = decode_transfer(&reader, hash(), None).await.unwrap();
        assert_eq!(summary.decimals, 100);
        assert_eq!(
            summary.amount_formatted,
            format!("0.{}{}", "0".repeat(80), u64::MAX)
        );
    }

    #[tokio::test]
    async fn no_transfer_topic_yields_no_summary() {
        let reader = FakeReader::new(SEPOLIA_CHAIN_ID)
            .with_receipt(hash(), sample_receipt(true, 50_000, vec![approval_log()]));

        let err = decode_transfer(&reader, hash(), None).await.unwrap_err();
        assert!(matches!(err, LookupError::NoTransferEvent));
        assert_eq!(
            err.to_string(),
            "No ERC-20 Transfer event found in this transaction"
        );
    }

    #[tokio::test]
    async fn missing_receipt_is_reported() {
        let reader = FakeReader::new(SEPOLIA_CHAIN_ID);
        let err = decode_transfer(&reader, hash(), None).await.unwrap_err();
        assert!(matches!(err, LookupError::ReceiptNotFound));
    }

    #[tokio::test]
    async fn metadata_failures_fall_back_to_usdt() {
        let reader = FakeReader::new(SEPOLIA_CHAIN_ID)
            .with_receipt(hash(), sample_receipt(true, 50_000, vec![transfer_log(2_500_000)]));
        let cache = TokenMetadataCache::default();

        let summary = decode_transfer(&reader, hash(), Some(&cache)).await.unwrap();
        assert_eq!(summary.symbol, "USDT");
        assert_eq!(summary.decimals, 6);
        assert_eq!(summary.amount_formatted, "2.5");
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn fallback_is_per_field() {
        let reader = FakeReader::new(SEPOLIA_CHAIN_ID)
            .with_receipt(hash(), sample_receipt(true, 50_000, vec![transfer_log(7)]))
            .with_symbol(token(), "WETH");

        let summary = decode_transfer(&reader, hash(), None).await.unwrap();
        assert_eq!(summary.symbol, "WETH");
        assert_eq!(summary.decimals, 6);
    }

    #[tokio::test]
    async fn fetched_metadata_is_cached() {
        let reader = FakeReader::new(SEPOLIA_CHAIN_ID)
            .with_receipt(hash(), sample_receipt(true, 50_000, vec![transfer_log(1)]))
            .with_symbol(token(), "LINK")
            .with_decimals(token(), 18);
        let cache = TokenMetadataCache::default();

        decode_transfer(&reader, hash(), Some(&cache)).await.unwrap();
        let after_first = reader.calls();
        decode_transfer(&reader, hash(), Some(&cache)).await.unwrap();

        // Second lookup only re-reads the receipt and network.
        assert_eq!(reader.calls() - after_first, 2);
        assert_eq!(cache.get(&token()).unwrap().symbol, "LINK");
    }
}
