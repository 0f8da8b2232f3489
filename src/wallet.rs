// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Connector and Log Submissions
//!
//! The connector holds at most one local signing key, loaded on `connect`
//! from the configured [`SignerSource`] and dropped on `disconnect`. The
//! log service uses it to sign `DataLogger.log` calls and tracks each
//! broadcast until its receipt arrives.

use std::num::NonZeroUsize;
use std::sync::Arc;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash, B256};
use alloy::signers::local::PrivateKeySigner;
use chrono::{DateTime, Utc};
use lru::LruCache;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::blockchain::data_logger::{self, derive_data_id, DataLoggerClient};
use crate::blockchain::{signing, ChainClient, ChainClientError};
use crate::config::SignerSource;

/// Memo used when a submission leaves it out.
pub const DEFAULT_MEMO: &str = "Hello from Sepolia testnet";

/// Submissions kept before the least recently touched one is evicted.
pub const DEFAULT_SUBMISSION_CAPACITY: usize = 1024;

#[derive(Debug, Clone, thiserror::Error)]
pub enum WalletError {
    #[error("No wallet connector available; configure DATA_LOGGER_PRIVATE_KEY or DATA_LOGGER_KEY_PEM")]
    NoConnector,

    #[error("Wallet is not connected")]
    NotConnected,

    #[error("DATA_LOGGER_ADDRESS is not configured; log writes are disabled")]
    LoggerNotConfigured,

    #[error("{0}")]
    InvalidDataId(String),

    #[error("Failed to load signing key: {0}")]
    Signer(ChainClientError),

    #[error(transparent)]
    Chain(#[from] ChainClientError),
}

/// Connection state reported to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletStatus {
    /// A signer source is configured
    pub available: bool,
    pub connected: bool,
    pub address: Option<Address>,
}

/// Local stand-in for a browser-injected wallet.
pub struct WalletConnector {
    source: Option<SignerSource>,
    signer: RwLock<Option<PrivateKeySigner>>,
}

impl WalletConnector {
    pub fn new(source: Option<SignerSource>) -> Self {
        Self {
            source,
            signer: RwLock::new(None),
        }
    }

    /// Load the configured key. Connecting twice keeps the first signer.
    pub async fn connect(&self) -> Result<Address, WalletError> {
        let mut signer = self.signer.write().await;
        if let Some(existing) = signer.as_ref() {
            return Ok(existing.address());
        }

        let loaded = match self.source.as_ref().ok_or(WalletError::NoConnector)? {
            SignerSource::Hex(key) => ChainClient::create_signer(key),
            SignerSource::PemFile(path) => signing::signer_from_pem_file(path),
        }
        .map_err(WalletError::Signer)?;

        let address = loaded.address();
        info!(address = %address, "Wallet connected");
        *signer = Some(loaded);
        Ok(address)
    }

    /// Drop the signer. Returns whether one was connected.
    pub async fn disconnect(&self) -> bool {
        let previous = self.signer.write().await.take();
        if let Some(signer) = &previous {
            info!(address = %signer.address(), "Wallet disconnected");
        }
        previous.is_some()
    }

    pub async fn status(&self) -> WalletStatus {
        let address = self.signer.read().await.as_ref().map(|s| s.address());
        WalletStatus {
            available: self.source.is_some(),
            connected: address.is_some(),
            address,
        }
    }

    /// Wallet filler for the connected signer.
    pub async fn wallet(&self) -> Result<EthereumWallet, WalletError> {
        self.signer
            .read()
            .await
            .clone()
            .map(ChainClient::create_wallet)
            .ok_or(WalletError::NotConnected)
    }
}

/// Lifecycle of one log transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Pending,
    Confirmed {
        block_number: Option<u64>,
        success: bool,
        logged_events: usize,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSubmission {
    pub tx_hash: TxHash,
    pub contract: Address,
    pub sender: Option<Address>,
    pub memo: String,
    pub data_id: B256,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
}

/// Sends `DataLogger.log` calls and remembers their outcome.
pub struct LogService {
    contract: Option<Address>,
    submissions: Arc<Mutex<LruCache<TxHash, LogSubmission>>>,
}

impl LogService {
    pub fn new(contract: Option<Address>) -> Self {
        Self::with_capacity(contract, DEFAULT_SUBMISSION_CAPACITY)
    }

    /// A capacity of zero is treated as one.
    pub fn with_capacity(contract: Option<Address>, capacity: usize) -> Self {
        Self {
            contract,
            submissions: Arc::new(Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            ))),
        }
    }

    pub fn contract(&self) -> Option<Address> {
        self.contract
    }

    /// Data id a submission with these inputs would use.
    pub fn preview_data_id(memo: Option<&str>, custom_id: Option<&str>) -> Result<B256, WalletError> {
        derive_data_id(memo.unwrap_or(DEFAULT_MEMO), custom_id).map_err(WalletError::InvalidDataId)
    }

    /// Sign and broadcast one log call through `rpc_url`.
    ///
    /// Returns as soon as the transaction is broadcast; confirmation is
    /// tracked in the background and visible through [`LogService::get`].
    pub async fn submit(
        &self,
        rpc_url: &str,
        wallet: &WalletConnector,
        memo: Option<String>,
        custom_id: Option<&str>,
    ) -> Result<LogSubmission, WalletError> {
        let contract = self.contract.ok_or(WalletError::LoggerNotConfigured)?;
        let memo = memo.unwrap_or_else(|| DEFAULT_MEMO.to_string());
        let data_id = derive_data_id(&memo, custom_id).map_err(WalletError::InvalidDataId)?;

        let signer = wallet.wallet().await?;
        let sender = wallet.status().await.address;

        let client = DataLoggerClient::new(rpc_url, contract);
        let pending = client.submit(signer, &memo, data_id).await?;
        let tx_hash = data_logger::pending_hash(&pending);

        info!(
            tx_hash = %tx_hash,
            contract = %contract,
            data_id = %data_id,
            "Log transaction broadcast"
        );

        let submission = LogSubmission {
            tx_hash,
            contract,
            sender,
            memo,
            data_id,
            submitted_at: Utc::now(),
            status: SubmissionStatus::Pending,
        };
        self.record(submission.clone()).await;

        let submissions = Arc::clone(&self.submissions);
        tokio::spawn(async move {
            let status = match data_logger::confirm(pending).await {
                Ok(confirmation) => SubmissionStatus::Confirmed {
                    block_number: confirmation.block_number,
                    success: confirmation.success,
                    logged_events: confirmation.logged_events,
                },
                Err(e) => {
                    warn!(tx_hash = %tx_hash, error = %e, "Log transaction not confirmed");
                    SubmissionStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            set_status(&submissions, tx_hash, status).await;
        });

        Ok(submission)
    }

    pub async fn get(&self, tx_hash: &TxHash) -> Option<LogSubmission> {
        self.submissions.lock().await.get(tx_hash).cloned()
    }

    async fn record(&self, submission: LogSubmission) {
        self.submissions
            .lock()
            .await
            .put(submission.tx_hash, submission);
    }
}

/// Evicted hashes are ignored.
async fn set_status(
    submissions: &Mutex<LruCache<TxHash, LogSubmission>>,
    tx_hash: TxHash,
    status: SubmissionStatus,
) {
    if let Some(entry) = submissions.lock().await.get_mut(&tx_hash) {
        if let SubmissionStatus::Confirmed { success, block_number, .. } = &status {
            info!(tx_hash = %tx_hash, success, block_number = ?block_number, "Log transaction mined");
        }
        entry.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::keccak256;
    use std::io::Write;

    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[tokio::test]
    async fn connect_without_source_fails() {
        let connector = WalletConnector::new(None);
        assert!(matches!(
            connector.connect().await,
            Err(WalletError::NoConnector)
        ));
        let status = connector.status().await;
        assert!(!status.available);
        assert!(!status.connected);
    }

    #[tokio::test]
    async fn connect_and_disconnect_hex_key() {
        let connector = WalletConnector::new(Some(SignerSource::Hex(KEY.into())));
        assert!(matches!(
            connector.wallet().await,
            Err(WalletError::NotConnected)
        ));

        let address = connector.connect().await.unwrap();
        assert_eq!(connector.connect().await.unwrap(), address);
        assert_eq!(connector.status().await.address, Some(address));
        assert!(connector.wallet().await.is_ok());

        assert!(connector.disconnect().await);
        assert!(!connector.disconnect().await);
        assert!(!connector.status().await.connected);
    }

    #[tokio::test]
    async fn connect_from_pem_file() {
        use k256::pkcs8::{EncodePrivateKey, LineEnding};

        let secret = k256::SecretKey::from_slice(&[7u8; 32]).unwrap();
        let pem = secret.to_pkcs8_pem(LineEnding::LF).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(pem.as_bytes()).unwrap();

        let connector =
            WalletConnector::new(Some(SignerSource::PemFile(file.path().to_path_buf())));
        let address = connector.connect().await.unwrap();

        let expected = ChainClient::create_signer(&alloy::hex::encode([7u8; 32]))
            .unwrap()
            .address();
        assert_eq!(address, expected);
    }

    #[tokio::test]
    async fn bad_key_is_a_signer_error() {
        let connector = WalletConnector::new(Some(SignerSource::Hex("0xnothex".into())));
        assert!(matches!(
            connector.connect().await,
            Err(WalletError::Signer(_))
        ));
    }

    #[tokio::test]
    async fn submit_requires_logger_address() {
        let service = LogService::new(None);
        let connector = WalletConnector::new(Some(SignerSource::Hex(KEY.into())));
        connector.connect().await.unwrap();

        let err = service
            .submit("http://127.0.0.1:1", &connector, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::LoggerNotConfigured));
    }

    #[tokio::test]
    async fn submit_requires_connected_wallet() {
        let service = LogService::new(Some(Address::repeat_byte(0x10)));
        let connector = WalletConnector::new(Some(SignerSource::Hex(KEY.into())));

        let err = service
            .submit("http://127.0.0.1:1", &connector, Some("memo".into()), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::NotConnected));
    }

    #[tokio::test]
    async fn invalid_custom_id_is_rejected_before_sending() {
        let service = LogService::new(Some(Address::repeat_byte(0x10)));
        let connector = WalletConnector::new(None);
        let bad = format!("0x{}", "zz".repeat(32));

        let err = service
            .submit("http://127.0.0.1:1", &connector, None, Some(&bad))
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidDataId(_)));
    }

    #[test]
    fn preview_uses_default_memo() {
        let id = LogService::preview_data_id(None, None).unwrap();
        assert_eq!(id, keccak256(DEFAULT_MEMO.as_bytes()));
    }

    fn pending(tx_hash: TxHash) -> LogSubmission {
        LogSubmission {
            tx_hash,
            contract: Address::repeat_byte(0x10),
            sender: None,
            memo: "m".into(),
            data_id: B256::ZERO,
            submitted_at: Utc::now(),
            status: SubmissionStatus::Pending,
        }
    }

    #[tokio::test]
    async fn status_updates_apply_to_recorded_submissions() {
        let service = LogService::new(Some(Address::repeat_byte(0x10)));
        let tx_hash = TxHash::repeat_byte(0x33);
        service.record(pending(tx_hash)).await;

        set_status(
            &service.submissions,
            tx_hash,
            SubmissionStatus::Confirmed {
                block_number: Some(9),
                success: true,
                logged_events: 1,
            },
        )
        .await;

        let stored = service.get(&tx_hash).await.unwrap();
        assert!(matches!(
            stored.status,
            SubmissionStatus::Confirmed { logged_events: 1, .. }
        ));

        // Unknown hashes are ignored.
        set_status(&service.submissions, TxHash::ZERO, SubmissionStatus::Pending).await;
        assert!(service.get(&TxHash::ZERO).await.is_none());
    }

    #[tokio::test]
    async fn submissions_are_bounded() {
        let service = LogService::with_capacity(Some(Address::repeat_byte(0x10)), 2);
        let (first, second, third) = (
            TxHash::repeat_byte(0x01),
            TxHash::repeat_byte(0x02),
            TxHash::repeat_byte(0x03),
        );
        service.record(pending(first)).await;
        service.record(pending(second)).await;
        service.record(pending(third)).await;

        assert!(service.get(&first).await.is_none());
        assert!(service.get(&second).await.is_some());
        assert!(service.get(&third).await.is_some());

        // A late confirmation for an evicted hash does not resurrect it.
        set_status(
            &service.submissions,
            first,
            SubmissionStatus::Failed {
                error: "dropped".into(),
            },
        )
        .await;
        assert!(service.get(&first).await.is_none());
    }

    #[tokio::test]
    async fn zero_capacity_keeps_latest_submission() {
        let service = LogService::with_capacity(None, 0);
        service.record(pending(TxHash::repeat_byte(0x01))).await;
        service.record(pending(TxHash::repeat_byte(0x02))).await;

        assert!(service.get(&TxHash::repeat_byte(0x01)).await.is_none());
        assert!(service.get(&TxHash::repeat_byte(0x02)).await.is_some());
    }
}
