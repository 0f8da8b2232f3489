// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use alloy::primitives::TxHash;

use crate::blockchain::{ChainClientError, RpcSource, TokenMetadataCache};
use crate::config::DashboardConfig;
use crate::lookup::{
    decode_transfer, lookup_transaction, LookupSlot, Ticket, TransactionDetails, TransferSummary,
};
use crate::poller::{ChainPoller, PollerHandle};
use crate::rpc::{RpcRegistry, RpcSelection};
use crate::wallet::{LogService, WalletConnector};

#[derive(Clone)]
pub struct AppState {
    pub rpc: Arc<RpcRegistry>,
    pub poller: PollerHandle,
    pub transactions: LookupSlot<TransactionDetails>,
    pub transfers: LookupSlot<TransferSummary>,
    pub token_cache: Arc<TokenMetadataCache>,
    pub wallet: Arc<WalletConnector>,
    pub logs: Arc<LogService>,
}

impl AppState {
    /// Build state from configuration. The returned poller must be spawned.
    pub async fn new(config: &DashboardConfig) -> Result<(Self, ChainPoller), ChainClientError> {
        let registry = RpcRegistry::new(
            config.rpc_overrides.clone(),
            config.rpc_source,
            Some(config.chain_id),
        )?;
        Ok(Self::with_registry(registry, config).await)
    }

    pub async fn with_registry(
        registry: RpcRegistry,
        config: &DashboardConfig,
    ) -> (Self, ChainPoller) {
        let (poller, handle) = ChainPoller::new(
            registry.reader().await,
            config.target_address,
            config.poll_interval,
        );

        let state = Self {
            rpc: Arc::new(registry),
            poller: handle,
            transactions: LookupSlot::new(),
            transfers: LookupSlot::new(),
            token_cache: Arc::new(TokenMetadataCache::default()),
            wallet: Arc::new(WalletConnector::new(config.signer.clone())),
            logs: Arc::new(LogService::new(config.data_logger_address)),
        };
        (state, poller)
    }

    /// Point the transaction slot at `hash` and fetch in the background.
    pub async fn select_transaction(&self, hash: Option<TxHash>) {
        if let Some(ticket) = self.transactions.select(hash).await {
            let reader = self.rpc.reader().await;
            self.transactions.spawn(ticket, async move {
                lookup_transaction(reader.as_ref(), ticket.hash).await
            });
        }
    }

    pub async fn refresh_transaction(&self) {
        if let Some(ticket) = self.transactions.refresh().await {
            let reader = self.rpc.reader().await;
            self.transactions.spawn(ticket, async move {
                lookup_transaction(reader.as_ref(), ticket.hash).await
            });
        }
    }

    /// Point the transfer slot at `hash` and decode in the background.
    pub async fn select_transfer(&self, hash: Option<TxHash>) {
        if let Some(ticket) = self.transfers.select(hash).await {
            self.spawn_transfer(ticket).await;
        }
    }

    async fn spawn_transfer(&self, ticket: Ticket) {
        let reader = self.rpc.reader().await;
        let cache = Arc::clone(&self.token_cache);
        self.transfers.spawn(ticket, async move {
            decode_transfer(reader.as_ref(), ticket.hash, Some(cache.as_ref())).await
        });
    }

    /// Switch RPC provider or network and re-run everything that read
    /// through the previous client.
    pub async fn switch_rpc(
        &self,
        source: RpcSource,
        chain_id: Option<u64>,
    ) -> Result<RpcSelection, ChainClientError> {
        if let Some(selection) = self.rpc.select(source, chain_id).await? {
            self.poller.set_reader(Arc::clone(&selection.reader)).await;
            self.refresh_transaction().await;
            if let Some(ticket) = self.transfers.refresh().await {
                self.spawn_transfer(ticket).await;
            }
        }
        Ok(self.rpc.current().await)
    }
}
