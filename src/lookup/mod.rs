// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # On-demand Lookups
//!
//! Transaction details and ERC-20 transfer decoding, both keyed by a
//! transaction hash.
//!
//! Each lookup kind owns one [`LookupSlot`]: the "active" hash plus the
//! latest result. Setting a new hash (or refreshing) bumps the slot's epoch
//! and spawns a fetch; a fetch only commits if the epoch is unchanged when
//! it completes, so a slow response for an old hash can never overwrite the
//! result for the current one.

pub mod transaction;
pub mod transfer;

use std::future::Future;
use std::sync::Arc;

use alloy::primitives::TxHash;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::blockchain::{ChainClientError, Loadable};

pub use transaction::{lookup_transaction, TransactionDetails, TxStatusLabel};
pub use transfer::{decode_transfer, TransferSummary};

/// Errors surfaced by transaction and transfer lookups.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    #[error("Transaction hash must be 0x followed by 64 hex characters")]
    InvalidHash,

    #[error("Transaction not found; check the hash or whether it has been broadcast")]
    TransactionNotFound,

    #[error("Transaction receipt not found; the transaction may not be mined yet")]
    ReceiptNotFound,

    #[error("No ERC-20 Transfer event found in this transaction")]
    NoTransferEvent,

    #[error("Malformed Transfer log: {0}")]
    MalformedLog(String),

    #[error(transparent)]
    Client(#[from] ChainClientError),
}

impl LookupError {
    /// Domain "nothing there" outcomes, as opposed to validation or transport failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LookupError::TransactionNotFound
                | LookupError::ReceiptNotFound
                | LookupError::NoTransferEvent
        )
    }
}

/// Snapshot of a slot for rendering.
#[derive(Debug, Clone)]
pub struct SlotView<T> {
    pub hash: Option<TxHash>,
    pub loading: bool,
    pub error: Option<String>,
    pub value: Loadable<T>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for SlotView<T> {
    fn default() -> Self {
        Self {
            hash: None,
            loading: false,
            error: None,
            value: Loadable::Unloaded,
            updated_at: None,
        }
    }
}

struct SlotState<T> {
    epoch: u64,
    view: SlotView<T>,
}

/// Permission to run one fetch for a slot generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub epoch: u64,
    pub hash: TxHash,
}

/// Generation-tracked holder of one active lookup.
pub struct LookupSlot<T> {
    inner: Arc<RwLock<SlotState<T>>>,
}

impl<T> Clone for LookupSlot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for LookupSlot<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SlotState {
                epoch: 0,
                view: SlotView::default(),
            })),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> LookupSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn view(&self) -> SlotView<T> {
        self.inner.read().await.view.clone()
    }

    /// Point the slot at a new hash.
    ///
    /// `None` clears the slot and returns no ticket, so no fetch is issued.
    /// A new hash resets the value to `Unloaded`; re-selecting the current
    /// hash keeps the displayed value while it reloads.
    pub async fn select(&self, hash: Option<TxHash>) -> Option<Ticket> {
        let mut state = self.inner.write().await;
        state.epoch += 1;

        let Some(hash) = hash else {
            state.view = SlotView::default();
            return None;
        };

        if state.view.hash != Some(hash) {
            state.view.value = Loadable::Unloaded;
            state.view.updated_at = None;
        }
        state.view.hash = Some(hash);
        state.view.loading = true;
        state.view.error = None;

        Some(Ticket {
            epoch: state.epoch,
            hash,
        })
    }

    /// Re-run the lookup for the current hash, if any.
    pub async fn refresh(&self) -> Option<Ticket> {
        let current = self.inner.read().await.view.hash;
        match current {
            Some(hash) => self.select(Some(hash)).await,
            None => None,
        }
    }

    /// Apply a finished fetch. Returns `false` if the ticket was superseded.
    pub async fn commit(&self, ticket: Ticket, result: Result<T, LookupError>) -> bool {
        let mut state = self.inner.write().await;
        if state.epoch != ticket.epoch || state.view.hash != Some(ticket.hash) {
            tracing::debug!(
                tx_hash = %ticket.hash,
                ticket_epoch = ticket.epoch,
                current_epoch = state.epoch,
                "Discarding superseded lookup result"
            );
            return false;
        }

        let view = &mut state.view;
        view.loading = false;
        match result {
            Ok(value) => {
                view.value = Loadable::Present(value);
                view.error = None;
                view.updated_at = Some(Utc::now());
            }
            Err(e) if e.is_not_found() => {
                view.value = Loadable::Absent;
                view.error = Some(e.to_string());
                view.updated_at = Some(Utc::now());
            }
            Err(e) => {
                // Transport failures keep whatever was displayed before.
                tracing::warn!(tx_hash = %ticket.hash, error = %e, "Lookup failed");
                view.error = Some(e.to_string());
            }
        }
        true
    }

    /// Run `fetch` in the background and commit its result under `ticket`.
    pub fn spawn<F>(&self, ticket: Ticket, fetch: F) -> JoinHandle<bool>
    where
        F: Future<Output = Result<T, LookupError>> + Send + 'static,
    {
        let slot = self.clone();
        tokio::spawn(async move {
            let result = fetch.await;
            slot.commit(ticket, result).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(byte: u8) -> TxHash {
        TxHash::repeat_byte(byte)
    }

    #[tokio::test]
    async fn select_none_clears_without_ticket() {
        let slot: LookupSlot<u32> = LookupSlot::new();
        let ticket = slot.select(Some(hash(1))).await.unwrap();
        assert!(slot.commit(ticket, Ok(7)).await);

        assert!(slot.select(None).await.is_none());
        let view = slot.view().await;
        assert_eq!(view.hash, None);
        assert_eq!(view.value, Loadable::Unloaded);
        assert!(!view.loading);
    }

    #[tokio::test]
    async fn superseded_result_is_discarded() {
        let slot: LookupSlot<u32> = LookupSlot::new();
        let old = slot.select(Some(hash(1))).await.unwrap();
        let new = slot.select(Some(hash(2))).await.unwrap();

        assert!(!slot.commit(old, Ok(1)).await);
        assert!(slot.view().await.loading);

        assert!(slot.commit(new, Ok(2)).await);
        let view = slot.view().await;
        assert_eq!(view.hash, Some(hash(2)));
        assert_eq!(view.value, Loadable::Present(2));
        assert!(!view.loading);
    }

    #[tokio::test]
    async fn refresh_supersedes_in_flight_fetch() {
        let slot: LookupSlot<u32> = LookupSlot::new();
        let first = slot.select(Some(hash(3))).await.unwrap();
        let second = slot.refresh().await.unwrap();
        assert_eq!(second.hash, hash(3));
        assert!(!slot.commit(first, Ok(1)).await);
        assert!(slot.commit(second, Ok(2)).await);
    }

    #[tokio::test]
    async fn refresh_without_hash_is_noop() {
        let slot: LookupSlot<u32> = LookupSlot::new();
        assert!(slot.refresh().await.is_none());
    }

    #[tokio::test]
    async fn not_found_clears_value_transport_error_keeps_it() {
        let slot: LookupSlot<u32> = LookupSlot::new();
        let t = slot.select(Some(hash(4))).await.unwrap();
        slot.commit(t, Ok(9)).await;

        let t = slot.refresh().await.unwrap();
        slot.commit(t, Err(ChainClientError::RpcError("timeout".into()).into()))
            .await;
        let view = slot.view().await;
        assert_eq!(view.value, Loadable::Present(9));
        assert_eq!(view.error.as_deref(), Some("RPC error: timeout"));

        let t = slot.refresh().await.unwrap();
        slot.commit(t, Err(LookupError::TransactionNotFound)).await;
        let view = slot.view().await;
        assert_eq!(view.value, Loadable::Absent);
        assert!(view.error.unwrap().starts_with("Transaction not found"));
    }

    #[tokio::test]
    async fn spawn_commits_in_background() {
        let slot: LookupSlot<u32> = LookupSlot::new();
        let ticket = slot.select(Some(hash(5))).await.unwrap();
        let committed = slot.spawn(ticket, async { Ok(11) }).await.unwrap();
        assert!(committed);
        assert_eq!(slot.view().await.value, Loadable::Present(11));
    }
}
