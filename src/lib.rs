// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Chain Dashboard - EVM chain data service
//!
//! Polls block, fee and balance data from a hosted JSON-RPC provider,
//! decodes transactions and ERC-20 transfers on demand, and submits
//! DataLogger writes through a locally configured signer.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - EVM JSON-RPC reads, ERC-20 decoding, signing
//! - `lookup` - Active-hash lookup slots for transactions and transfers
//! - `poller` - Periodic chain data refresh
//! - `rpc` - RPC source selection
//! - `wallet` - Signer connection and DataLogger submissions

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod lookup;
pub mod poller;
pub mod rpc;
pub mod state;
pub mod wallet;
