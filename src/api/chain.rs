// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain panel: latest block, fees, network and target balance.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::display;
use crate::{
    blockchain::parse_optional_address, error::ApiError, poller::ChainState, state::AppState,
};

/// Current chain data as the dashboard renders it.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChainResponse {
    /// A poll cycle is in flight
    pub loading: bool,
    /// Error from the most recent cycle, if it failed
    pub error: Option<String>,
    /// Address whose balance is polled
    pub target_address: Option<String>,
    /// Latest block number, or `—`
    pub block_number: String,
    /// `name (#chain_id)`, or `—`
    pub network: String,
    pub chain_id: Option<u64>,
    /// Legacy gas price in Gwei
    pub gas_price: String,
    pub max_fee_per_gas: String,
    pub max_priority_fee_per_gas: String,
    /// Balance in ETH, or `—` without a target
    pub balance: String,
    /// Raw balance in wei
    pub balance_wei: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl ChainResponse {
    pub fn from_state(state: &ChainState, target: Option<alloy::primitives::Address>) -> Self {
        let snapshot = state.snapshot.as_ref();
        // Only show a balance that belongs to the current target.
        let balance = snapshot
            .filter(|s| s.target == target)
            .and_then(|s| s.balance);

        Self {
            loading: state.loading,
            error: state.error.clone(),
            target_address: target.map(|a| a.to_string()),
            block_number: display::or_placeholder(snapshot.map(|s| s.block_number)),
            network: display::or_placeholder(snapshot.map(|s| &s.network)),
            chain_id: snapshot.map(|s| s.network.chain_id),
            gas_price: display::gwei(snapshot.and_then(|s| s.fees.gas_price)),
            max_fee_per_gas: display::gwei(snapshot.and_then(|s| s.fees.max_fee_per_gas)),
            max_priority_fee_per_gas: display::gwei(
                snapshot.and_then(|s| s.fees.max_priority_fee_per_gas),
            ),
            balance: display::eth(balance),
            balance_wei: balance.map(|b| b.to_string()),
            fetched_at: snapshot.map(|s| s.fetched_at),
        }
    }
}

/// Request body for changing the polled address.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetAddressRequest {
    /// Address to poll; blank or omitted stops balance polling
    pub address: Option<String>,
}

async fn current(state: &AppState) -> ChainResponse {
    ChainResponse::from_state(&state.poller.state().await, state.poller.target())
}

/// Get the latest polled chain data.
#[utoipa::path(
    get,
    path = "/v1/chain",
    tag = "Chain",
    responses(
        (status = 200, description = "Latest chain data", body = ChainResponse)
    )
)]
pub async fn get_chain(State(state): State<AppState>) -> Json<ChainResponse> {
    Json(current(&state).await)
}

/// Change the address whose balance is polled and start a new cycle.
#[utoipa::path(
    put,
    path = "/v1/chain/address",
    tag = "Chain",
    request_body = SetAddressRequest,
    responses(
        (status = 202, description = "Address updated, poll started", body = ChainResponse),
        (status = 400, description = "Invalid address")
    )
)]
pub async fn set_address(
    State(state): State<AppState>,
    Json(request): Json<SetAddressRequest>,
) -> Result<(StatusCode, Json<ChainResponse>), ApiError> {
    let target =
        parse_optional_address(request.address.as_deref()).map_err(ApiError::bad_request)?;
    state.poller.set_target(target).await;
    Ok((StatusCode::ACCEPTED, Json(current(&state).await)))
}

/// Trigger an immediate poll cycle.
#[utoipa::path(
    post,
    path = "/v1/chain/refresh",
    tag = "Chain",
    responses(
        (status = 202, description = "Poll started", body = ChainResponse)
    )
)]
pub async fn refresh_chain(State(state): State<AppState>) -> (StatusCode, Json<ChainResponse>) {
    state.poller.refresh().await;
    (StatusCode::ACCEPTED, Json(current(&state).await))
}
