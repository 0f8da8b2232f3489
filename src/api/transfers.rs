// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 transfer decoding endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::display;
use super::transactions::{parse_hash_input, parse_hash_path, SetActiveHashRequest};
use crate::{
    blockchain::LoadState,
    error::ApiError,
    lookup::{decode_transfer, SlotView, TransferSummary},
    state::AppState,
};

/// Rendered transfer summary.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransferView {
    pub tx_hash: String,
    pub token_address: String,
    pub symbol: String,
    pub decimals: u8,
    /// Raw integer amount
    pub raw_amount: String,
    /// Amount scaled by `decimals`, full precision
    pub amount: String,
    /// `amount symbol`
    pub amount_display: String,
    pub from: String,
    pub from_short: String,
    pub to: String,
    pub to_short: String,
    /// Inclusion block, or `—`
    pub block_number: String,
    pub chain_id: u64,
}

impl From<&TransferSummary> for TransferView {
    fn from(summary: &TransferSummary) -> Self {
        Self {
            tx_hash: summary.tx_hash.to_string(),
            token_address: summary.token_address.to_string(),
            symbol: summary.symbol.clone(),
            decimals: summary.decimals,
            raw_amount: summary.raw_amount.to_string(),
            amount: summary.amount_formatted.clone(),
            amount_display: format!("{} {}", summary.amount_formatted, summary.symbol),
            from: summary.from.to_string(),
            from_short: display::short_address(Some(summary.from)),
            to: summary.to.to_string(),
            to_short: display::short_address(Some(summary.to)),
            block_number: display::or_placeholder(summary.block_number),
            chain_id: summary.chain_id,
        }
    }
}

/// The transfer panel: active hash plus its latest decode result.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveTransferResponse {
    pub hash: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub state: LoadState,
    pub transfer: Option<TransferView>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<SlotView<TransferSummary>> for ActiveTransferResponse {
    fn from(view: SlotView<TransferSummary>) -> Self {
        Self {
            hash: view.hash.map(|h| h.to_string()),
            loading: view.loading,
            state: view.value.state(),
            transfer: view.value.present().map(TransferView::from),
            error: view.error,
            updated_at: view.updated_at,
        }
    }
}

/// Decode the first ERC-20 Transfer event of a transaction.
#[utoipa::path(
    get,
    path = "/v1/transfers/{hash}",
    tag = "Transfers",
    params(
        ("hash" = String, Path, description = "Transaction hash (0x + 64 hex)")
    ),
    responses(
        (status = 200, description = "Transfer decoded", body = TransferView),
        (status = 400, description = "Malformed hash"),
        (status = 404, description = "Receipt or Transfer event not found"),
        (status = 502, description = "Transfer log is malformed"),
        (status = 503, description = "RPC endpoint unavailable")
    )
)]
pub async fn get_transfer(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<TransferView>, ApiError> {
    let hash = parse_hash_path(&hash)?;
    let reader = state.rpc.reader().await;
    let summary = decode_transfer(reader.as_ref(), hash, Some(state.token_cache.as_ref())).await?;
    Ok(Json(TransferView::from(&summary)))
}

/// Get the transfer panel.
#[utoipa::path(
    get,
    path = "/v1/transfers/active",
    tag = "Transfers",
    responses(
        (status = 200, description = "Active transfer lookup", body = ActiveTransferResponse)
    )
)]
pub async fn get_active_transfer(State(state): State<AppState>) -> Json<ActiveTransferResponse> {
    Json(state.transfers.view().await.into())
}

/// Set the active transfer hash and start decoding.
#[utoipa::path(
    put,
    path = "/v1/transfers/active",
    tag = "Transfers",
    request_body = SetActiveHashRequest,
    responses(
        (status = 202, description = "Decode started or panel cleared", body = ActiveTransferResponse),
        (status = 400, description = "Malformed hash; nothing is fetched")
    )
)]
pub async fn set_active_transfer(
    State(state): State<AppState>,
    Json(request): Json<SetActiveHashRequest>,
) -> Result<(StatusCode, Json<ActiveTransferResponse>), ApiError> {
    let hash = parse_hash_input(request.hash.as_deref())?;
    state.select_transfer(hash).await;
    Ok((StatusCode::ACCEPTED, Json(state.transfers.view().await.into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, TxHash, U256};

    #[test]
    fn view_renders_summary() {
        let summary = TransferSummary {
            tx_hash: TxHash::repeat_byte(0x01),
            token_address: Address::repeat_byte(0x55),
            symbol: "USDT".into(),
            decimals: 6,
            raw_amount: U256::from(2_500_000u64),
            amount_formatted: "2.5".into(),
            from: Address::repeat_byte(0x11),
            to: Address::repeat_byte(0x22),
            block_number: None,
            chain_id: 11_155_111,
        };
        let view = TransferView::from(&summary);
        assert_eq!(view.amount_display, "2.5 USDT");
        assert_eq!(view.raw_amount, "2500000");
        assert_eq!(view.from_short, "0x1111...1111");
        assert_eq!(view.block_number, "—");
    }
}
