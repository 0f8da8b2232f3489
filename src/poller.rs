// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Chain Data Poller
//!
//! Background task that keeps the latest block number, fee data, network
//! identity and (optionally) an address balance.
//!
//! ## Strategy
//!
//! Each cycle issues all reads concurrently and commits them together, so
//! the balance and fees shown always belong to the same block. A failed
//! cycle records the error and leaves the last good snapshot in place.
//!
//! Inputs (reader and target address) live in a `watch` channel tagged with
//! an epoch. Changing an input or requesting a refresh bumps the epoch; the
//! loop drops any in-flight fetch and starts over, and a commit whose epoch
//! no longer matches is discarded.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken`, like the other background
//! tasks in this service.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use tokio::sync::{watch, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::blockchain::{ChainClientError, FeeSnapshot, NetworkIdentity, SharedReader};

/// Default interval between polling cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(20);

#[derive(Clone)]
struct PollInputs {
    reader: SharedReader,
    target: Option<Address>,
    epoch: u64,
}

/// Values from one successful cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSnapshot {
    pub endpoint: String,
    pub block_number: u64,
    pub fees: FeeSnapshot,
    pub network: NetworkIdentity,
    pub target: Option<Address>,
    /// `None` when no target address was set for the cycle
    pub balance: Option<U256>,
    pub fetched_at: DateTime<Utc>,
}

/// What the dashboard renders for the chain panel.
#[derive(Debug, Clone, Default)]
pub struct ChainState {
    pub epoch: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub snapshot: Option<ChainSnapshot>,
}

/// Control side of the poller, cheap to clone into request handlers.
#[derive(Clone)]
pub struct PollerHandle {
    inputs: Arc<watch::Sender<PollInputs>>,
    state: Arc<RwLock<ChainState>>,
}

impl PollerHandle {
    pub async fn state(&self) -> ChainState {
        self.state.read().await.clone()
    }

    pub fn target(&self) -> Option<Address> {
        self.inputs.borrow().target
    }

    /// Change the address whose balance is polled. Returns the new epoch.
    pub async fn set_target(&self, target: Option<Address>) -> u64 {
        self.bump(|inputs| inputs.target = target).await
    }

    /// Swap the reader after an RPC switch. Returns the new epoch.
    pub async fn set_reader(&self, reader: SharedReader) -> u64 {
        self.bump(|inputs| inputs.reader = reader).await
    }

    /// Start a new cycle immediately. Returns the new epoch.
    pub async fn refresh(&self) -> u64 {
        self.bump(|_| {}).await
    }

    async fn bump(&self, change: impl FnOnce(&mut PollInputs)) -> u64 {
        // The state lock is held across the send so no commit can slip in
        // between the epoch change and the state update.
        let mut state = self.state.write().await;
        let mut epoch = 0;
        self.inputs.send_modify(|inputs| {
            change(inputs);
            inputs.epoch += 1;
            epoch = inputs.epoch;
        });
        state.epoch = epoch;
        state.loading = true;
        state.error = None;
        epoch
    }

    async fn begin_cycle(&self, epoch: u64) -> bool {
        let mut state = self.state.write().await;
        if state.epoch != epoch {
            return false;
        }
        state.loading = true;
        state.error = None;
        true
    }

    /// Apply a finished cycle. Returns `false` if `epoch` was superseded.
    pub(crate) async fn commit(
        &self,
        epoch: u64,
        result: Result<ChainSnapshot, ChainClientError>,
    ) -> bool {
        let mut state = self.state.write().await;
        if state.epoch != epoch {
            debug!(
                cycle_epoch = epoch,
                current_epoch = state.epoch,
                "Discarding superseded poll result"
            );
            return false;
        }

        state.loading = false;
        match result {
            Ok(snapshot) => {
                debug!(
                    block_number = snapshot.block_number,
                    network = %snapshot.network,
                    "Chain poller: snapshot committed"
                );
                state.error = None;
                state.snapshot = Some(snapshot);
            }
            Err(e) => {
                warn!(error = %e, "Chain poller: cycle failed");
                state.error = Some(e.to_string());
            }
        }
        true
    }
}

/// Background chain poller.
pub struct ChainPoller {
    handle: PollerHandle,
    inputs: watch::Receiver<PollInputs>,
    poll_interval: Duration,
}

impl ChainPoller {
    /// Create a poller and the handle that controls it.
    pub fn new(
        reader: SharedReader,
        target: Option<Address>,
        poll_interval: Duration,
    ) -> (Self, PollerHandle) {
        let (tx, rx) = watch::channel(PollInputs {
            reader,
            target,
            epoch: 0,
        });
        let handle = PollerHandle {
            inputs: Arc::new(tx),
            state: Arc::new(RwLock::new(ChainState::default())),
        };
        let poller = Self {
            handle: handle.clone(),
            inputs: rx,
            poll_interval,
        };
        (poller, handle)
    }

    /// Run the poller loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(poller.run(shutdown.clone()));
    /// ```
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.poll_interval.as_secs(),
            "Chain poller starting"
        );

        loop {
            let inputs = self.inputs.borrow_and_update().clone();
            if !self.handle.begin_cycle(inputs.epoch).await {
                continue;
            }

            tokio::select! {
                result = fetch_snapshot(&inputs) => {
                    self.handle.commit(inputs.epoch, result).await;
                }
                changed = self.inputs.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    debug!(epoch = inputs.epoch, "Chain poller: inputs changed mid-fetch");
                    continue;
                }
                _ = shutdown.cancelled() => {
                    info!("Chain poller shutting down");
                    return;
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {
                    // Periodic cycles run under a fresh epoch too.
                    self.handle.refresh().await;
                }
                changed = self.inputs.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                _ = shutdown.cancelled() => {
                    info!("Chain poller shutting down");
                    return;
                }
            }
        }
    }
}

/// One cycle: all reads at once, balance only if a target is set.
async fn fetch_snapshot(inputs: &PollInputs) -> Result<ChainSnapshot, ChainClientError> {
    let reader = inputs.reader.as_ref();
    let balance = async {
        match inputs.target {
            Some(address) => reader.balance(address).await.map(Some),
            None => Ok(None),
        }
    };

    let (block_number, fees, network, balance) = tokio::try_join!(
        reader.block_number(),
        reader.fee_snapshot(),
        reader.network(),
        balance
    )?;

    Ok(ChainSnapshot {
        endpoint: reader.endpoint().to_string(),
        block_number,
        fees,
        network,
        target: inputs.target,
        balance,
        fetched_at: Utc::now(),
    })
}
