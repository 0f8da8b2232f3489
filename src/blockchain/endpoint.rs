// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RPC endpoint selection.
//!
//! Resolution order for a `(source, chain_id)` pair:
//!
//! 1. the selected provider's explicit override URL
//! 2. the selected provider's default for that network
//! 3. the alternate provider's override URL
//! 4. [`FALLBACK_RPC_URL`]
//!
//! Infura has no keyless endpoints, so its network defaults only exist when
//! a project ID is configured.

use super::types::{RpcSource, HOLESKY_CHAIN_ID, MAINNET_CHAIN_ID, SEPOLIA_CHAIN_ID};

/// Last-resort endpoint when nothing else is configured.
pub const FALLBACK_RPC_URL: &str = "https://eth-mainnet.g.alchemy.com/v2/demo";

/// Alchemy public demo endpoint for Ethereum mainnet.
pub const ALCHEMY_MAINNET_DEFAULT: &str = "https://eth-mainnet.g.alchemy.com/v2/demo";

/// Alchemy public demo endpoint for Sepolia.
pub const ALCHEMY_SEPOLIA_DEFAULT: &str = "https://eth-sepolia.g.alchemy.com/v2/demo";

/// Alchemy public demo endpoint for Holesky.
pub const ALCHEMY_HOLESKY_DEFAULT: &str = "https://eth-holesky.g.alchemy.com/v2/demo";

/// Operator-supplied endpoint overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpcOverrides {
    pub alchemy_url: Option<String>,
    pub infura_url: Option<String>,
    pub infura_project_id: Option<String>,
}

impl RpcOverrides {
    fn url_for(&self, source: RpcSource) -> Option<&str> {
        let raw = match source {
            RpcSource::Alchemy => self.alchemy_url.as_deref(),
            RpcSource::Infura => self.infura_url.as_deref(),
        };
        non_blank(raw)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Network-specific default URL for a provider, if one exists.
fn network_default(
    source: RpcSource,
    chain_id: u64,
    overrides: &RpcOverrides,
) -> Option<String> {
    match source {
        RpcSource::Alchemy => match chain_id {
            MAINNET_CHAIN_ID => Some(ALCHEMY_MAINNET_DEFAULT.to_string()),
            SEPOLIA_CHAIN_ID => Some(ALCHEMY_SEPOLIA_DEFAULT.to_string()),
            HOLESKY_CHAIN_ID => Some(ALCHEMY_HOLESKY_DEFAULT.to_string()),
            _ => None,
        },
        RpcSource::Infura => {
            let project_id = non_blank(overrides.infura_project_id.as_deref())?;
            let subdomain = match chain_id {
                MAINNET_CHAIN_ID => "mainnet",
                SEPOLIA_CHAIN_ID => "sepolia",
                HOLESKY_CHAIN_ID => "holesky",
                _ => return None,
            };
            Some(format!("https://{subdomain}.infura.io/v3/{project_id}"))
        }
    }
}

/// Resolve the endpoint URL for a provider and network.
pub fn rpc_url_for(source: RpcSource, chain_id: Option<u64>, overrides: &RpcOverrides) -> String {
    if let Some(url) = overrides.url_for(source) {
        return url.to_string();
    }

    if let Some(url) = chain_id.and_then(|id| network_default(source, id, overrides)) {
        return url;
    }

    if let Some(url) = overrides.url_for(source.alternate()) {
        return url.to_string();
    }

    FALLBACK_RPC_URL.to_string()
}
