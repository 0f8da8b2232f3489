// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup; a `.env` file in the working directory is honored.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `ALCHEMY_URL` | Alchemy endpoint override | none |
//! | `INFURA_URL` | Infura endpoint override | none |
//! | `INFURA_PROJECT_ID` | Enables Infura network defaults | none |
//! | `RPC_SOURCE` | `alchemy` or `infura` | `alchemy` |
//! | `CHAIN_ID` | Network used for endpoint selection | `11155111` |
//! | `TARGET_ADDRESS` | Address whose balance is polled | none |
//! | `POLL_INTERVAL_SECS` | Seconds between chain polls | `20` |
//! | `DATA_LOGGER_ADDRESS` | DataLogger contract | none (writes disabled) |
//! | `DATA_LOGGER_PRIVATE_KEY` | Hex signing key for the wallet | none |
//! | `DATA_LOGGER_KEY_PEM` | Path to a PEM signing key | none |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;

use crate::blockchain::{parse_optional_address, RpcOverrides, RpcSource, SEPOLIA_CHAIN_ID};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const ALCHEMY_URL_ENV: &str = "ALCHEMY_URL";
pub const INFURA_URL_ENV: &str = "INFURA_URL";
pub const INFURA_PROJECT_ID_ENV: &str = "INFURA_PROJECT_ID";
pub const RPC_SOURCE_ENV: &str = "RPC_SOURCE";
pub const CHAIN_ID_ENV: &str = "CHAIN_ID";
pub const TARGET_ADDRESS_ENV: &str = "TARGET_ADDRESS";
pub const POLL_INTERVAL_ENV: &str = "POLL_INTERVAL_SECS";
pub const DATA_LOGGER_ADDRESS_ENV: &str = "DATA_LOGGER_ADDRESS";

/// Hex private key for the data logger wallet. Takes precedence over
/// [`DATA_LOGGER_KEY_PEM_ENV`] when both are set.
pub const DATA_LOGGER_PRIVATE_KEY_ENV: &str = "DATA_LOGGER_PRIVATE_KEY";

/// Path to a PKCS#8 or SEC1 PEM file holding the data logger key.
pub const DATA_LOGGER_KEY_PEM_ENV: &str = "DATA_LOGGER_KEY_PEM";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CHAIN_ID: u64 = SEPOLIA_CHAIN_ID;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 20;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(name: &'static str, reason: impl fmt::Display) -> Self {
        ConfigError::Invalid {
            name,
            reason: reason.to_string(),
        }
    }
}

/// Where the wallet connector loads its signing key from.
#[derive(Clone, PartialEq, Eq)]
pub enum SignerSource {
    Hex(String),
    PemFile(PathBuf),
}

impl fmt::Debug for SignerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerSource::Hex(_) => f.write_str("Hex(<redacted>)"),
            SignerSource::PemFile(path) => f.debug_tuple("PemFile").field(path).finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Fully parsed service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
    pub rpc_overrides: RpcOverrides,
    pub rpc_source: RpcSource,
    pub chain_id: u64,
    pub target_address: Option<Address>,
    pub poll_interval: Duration,
    pub data_logger_address: Option<Address>,
    pub signer: Option<SignerSource>,
    pub log_format: LogFormat,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            rpc_overrides: RpcOverrides::default(),
            rpc_source: RpcSource::default(),
            chain_id: DEFAULT_CHAIN_ID,
            target_address: None,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            data_logger_address: None,
            signer: None,
            log_format: LogFormat::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = parse_or(get(PORT_ENV), PORT_ENV, DEFAULT_PORT)?;
        let chain_id = parse_or(get(CHAIN_ID_ENV), CHAIN_ID_ENV, DEFAULT_CHAIN_ID)?;
        let poll_secs = parse_or(
            get(POLL_INTERVAL_ENV),
            POLL_INTERVAL_ENV,
            DEFAULT_POLL_INTERVAL_SECS,
        )?;
        if poll_secs == 0 {
            return Err(ConfigError::invalid(POLL_INTERVAL_ENV, "must be at least 1"));
        }

        let rpc_source = match get(RPC_SOURCE_ENV) {
            Some(raw) => raw
                .parse::<RpcSource>()
                .map_err(|e| ConfigError::invalid(RPC_SOURCE_ENV, e))?,
            None => RpcSource::default(),
        };

        let target_address = parse_optional_address(get(TARGET_ADDRESS_ENV).as_deref())
            .map_err(|e| ConfigError::invalid(TARGET_ADDRESS_ENV, e))?;
        let data_logger_address = parse_optional_address(get(DATA_LOGGER_ADDRESS_ENV).as_deref())
            .map_err(|e| ConfigError::invalid(DATA_LOGGER_ADDRESS_ENV, e))?;

        let signer = get(DATA_LOGGER_PRIVATE_KEY_ENV)
            .map(SignerSource::Hex)
            .or_else(|| get(DATA_LOGGER_KEY_PEM_ENV).map(|p| SignerSource::PemFile(p.into())));

        let log_format = match get(LOG_FORMAT_ENV).map(|v| v.to_ascii_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            rpc_overrides: RpcOverrides {
                alchemy_url: get(ALCHEMY_URL_ENV),
                infura_url: get(INFURA_URL_ENV),
                infura_project_id: get(INFURA_PROJECT_ID_ENV),
            },
            rpc_source,
            chain_id,
            target_address,
            poll_interval: Duration::from_secs(poll_secs),
            data_logger_address,
            signer,
            log_format,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(raw: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(value) => value
            .parse()
            .map_err(|e| ConfigError::invalid(name, format!("`{value}`: {e}"))),
        None => Ok(default),
    }
}
