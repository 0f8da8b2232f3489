// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LRU cache for ERC-20 token metadata.
//!
//! Symbol and decimals never change for a deployed token, so repeated
//! transfer lookups against the same contract skip the two `eth_call`s.
//! Only metadata the contract actually returned is cached.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use alloy::primitives::Address;
use lru::LruCache;

use super::types::TokenMetadata;

/// Default number of token contracts to remember.
pub const DEFAULT_TOKEN_CACHE_CAPACITY: usize = 256;

/// Default time-to-live per entry.
pub const DEFAULT_TOKEN_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

struct CacheEntry {
    metadata: TokenMetadata,
    inserted_at: Instant,
}

/// In-process LRU cache keyed by token contract address.
pub struct TokenMetadataCache {
    cache: Mutex<LruCache<Address, CacheEntry>>,
    ttl: Duration,
}

impl TokenMetadataCache {
    /// Create a new cache with the given capacity and TTL.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl,
        }
    }

    /// Returns `None` if not cached or expired.
    pub fn get(&self, token: &Address) -> Option<TokenMetadata> {
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(token) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.metadata.clone());
            }
            // Expired
            cache.pop(token);
        }
        None
    }

    pub fn put(&self, token: Address, metadata: TokenMetadata) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                token,
                CacheEntry {
                    metadata,
                    inserted_at: Instant::now(),
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TokenMetadataCache {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_CACHE_CAPACITY, DEFAULT_TOKEN_CACHE_TTL)
    }
}
