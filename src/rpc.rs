// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Current RPC selection.
//!
//! The registry owns the `(source, chain_id)` the operator picked, the URL
//! it resolves to, and the client built for that URL. Changing either input
//! resolves a new URL and swaps in a fresh client; everything downstream
//! reads the client through [`RpcRegistry::reader`].

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::blockchain::{
    rpc_url_for, ChainClient, ChainClientError, RpcOverrides, RpcSource, SharedReader,
};

/// Builds a reader for a resolved URL.
pub type ReaderFactory = Arc<dyn Fn(&str) -> Result<SharedReader, ChainClientError> + Send + Sync>;

/// The active selection and its client.
#[derive(Clone)]
pub struct RpcSelection {
    pub source: RpcSource,
    pub chain_id: Option<u64>,
    pub url: String,
    pub reader: SharedReader,
}

impl std::fmt::Debug for RpcSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcSelection")
            .field("source", &self.source)
            .field("chain_id", &self.chain_id)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

pub struct RpcRegistry {
    overrides: RpcOverrides,
    factory: ReaderFactory,
    current: RwLock<RpcSelection>,
}

impl RpcRegistry {
    /// Registry backed by real HTTP clients.
    pub fn new(
        overrides: RpcOverrides,
        source: RpcSource,
        chain_id: Option<u64>,
    ) -> Result<Self, ChainClientError> {
        Self::with_factory(overrides, source, chain_id, Arc::new(ChainClient::shared))
    }

    pub fn with_factory(
        overrides: RpcOverrides,
        source: RpcSource,
        chain_id: Option<u64>,
        factory: ReaderFactory,
    ) -> Result<Self, ChainClientError> {
        let selection = build_selection(&overrides, &factory, source, chain_id)?;
        tracing::info!(
            source = %selection.source,
            chain_id = ?selection.chain_id,
            url = %selection.url,
            "RPC endpoint selected"
        );
        Ok(Self {
            overrides,
            factory,
            current: RwLock::new(selection),
        })
    }

    pub async fn current(&self) -> RpcSelection {
        self.current.read().await.clone()
    }

    pub async fn reader(&self) -> SharedReader {
        Arc::clone(&self.current.read().await.reader)
    }

    /// URL that `(source, chain_id)` would resolve to, without switching.
    pub fn resolve(&self, source: RpcSource, chain_id: Option<u64>) -> String {
        rpc_url_for(source, chain_id, &self.overrides)
    }

    /// Switch to a new selection.
    ///
    /// Returns `Ok(None)` if the resolved URL is unchanged, in which case the
    /// existing client is kept.
    pub async fn select(
        &self,
        source: RpcSource,
        chain_id: Option<u64>,
    ) -> Result<Option<RpcSelection>, ChainClientError> {
        let mut current = self.current.write().await;

        let url = self.resolve(source, chain_id);
        if url == current.url {
            current.source = source;
            current.chain_id = chain_id;
            return Ok(None);
        }

        let selection = build_selection(&self.overrides, &self.factory, source, chain_id)?;
        tracing::info!(
            source = %selection.source,
            chain_id = ?selection.chain_id,
            url = %selection.url,
            previous_url = %current.url,
            "RPC endpoint switched"
        );
        *current = selection.clone();
        Ok(Some(selection))
    }
}

fn build_selection(
    overrides: &RpcOverrides,
    factory: &ReaderFactory,
    source: RpcSource,
    chain_id: Option<u64>,
) -> Result<RpcSelection, ChainClientError> {
    let url = rpc_url_for(source, chain_id, overrides);
    let reader = factory(&url)?;
    Ok(RpcSelection {
        source,
        chain_id,
        url,
        reader,
    })
}
