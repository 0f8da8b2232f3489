// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::display;
use crate::{error::ApiError, state::AppState, wallet::WalletStatus};

/// Wallet connection state.
#[derive(Debug, Serialize, ToSchema)]
pub struct WalletResponse {
    /// A signing key is configured
    pub available: bool,
    pub connected: bool,
    pub address: Option<String>,
    /// `0x1234...abcd`, or `—`
    pub address_short: String,
    /// DataLogger contract, if configured
    pub logger_contract: Option<String>,
}

impl WalletResponse {
    fn new(status: WalletStatus, state: &AppState) -> Self {
        Self {
            available: status.available,
            connected: status.connected,
            address: status.address.map(|a| a.to_string()),
            address_short: display::short_address(status.address),
            logger_contract: state.logs.contract().map(|a| a.to_string()),
        }
    }
}

#[utoipa::path(
    get,
    path = "/v1/wallet",
    tag = "Wallet",
    responses(
        (status = 200, description = "Wallet connection state", body = WalletResponse)
    )
)]
pub async fn get_wallet(State(state): State<AppState>) -> Json<WalletResponse> {
    let status = state.wallet.status().await;
    Json(WalletResponse::new(status, &state))
}

/// Connect the configured signing key.
#[utoipa::path(
    post,
    path = "/v1/wallet/connect",
    tag = "Wallet",
    responses(
        (status = 200, description = "Wallet connected", body = WalletResponse),
        (status = 503, description = "No wallet connector available")
    )
)]
pub async fn connect_wallet(
    State(state): State<AppState>,
) -> Result<Json<WalletResponse>, ApiError> {
    state.wallet.connect().await?;
    let status = state.wallet.status().await;
    Ok(Json(WalletResponse::new(status, &state)))
}

#[utoipa::path(
    post,
    path = "/v1/wallet/disconnect",
    tag = "Wallet",
    responses(
        (status = 200, description = "Wallet disconnected", body = WalletResponse)
    )
)]
pub async fn disconnect_wallet(State(state): State<AppState>) -> Json<WalletResponse> {
    state.wallet.disconnect().await;
    let status = state.wallet.status().await;
    Json(WalletResponse::new(status, &state))
}
