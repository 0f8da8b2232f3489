// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction lookup endpoints.
//!
//! `GET /v1/transactions/{hash}` looks a transaction up and waits for the
//! result. The `active` resource mirrors the dashboard's transaction panel:
//! setting the hash starts a background lookup whose result is read back with
//! `GET`.

use alloy::primitives::TxHash;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::display;
use crate::{
    blockchain::{parse_tx_hash, LoadState},
    error::ApiError,
    lookup::{lookup_transaction, LookupError, SlotView, TransactionDetails, TxStatusLabel},
    state::AppState,
};

/// Rendered transaction details.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionView {
    pub hash: String,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Value in ETH
    pub value: String,
    pub status: TxStatusLabel,
    /// Whether a receipt was found
    pub receipt: LoadState,
    /// Inclusion block, or `—`
    pub block_number: String,
    /// Gas used, or `—`
    pub gas_used: String,
    /// Effective gas price in Gwei, or `—`
    pub gas_price: String,
    /// Fee paid in ETH, or `—`
    pub fee: String,
    pub fee_wei: Option<String>,
}

impl From<&TransactionDetails> for TransactionView {
    fn from(details: &TransactionDetails) -> Self {
        let tx = &details.transaction;
        Self {
            hash: tx.hash.to_string(),
            from: tx.from.map(|a| a.to_string()),
            to: tx.to.map(|a| a.to_string()),
            value: display::eth(Some(tx.value)),
            status: details.status,
            receipt: details.receipt.state(),
            block_number: display::or_placeholder(details.block_number),
            gas_used: display::or_placeholder(details.gas_used),
            gas_price: display::gwei(details.gas_price),
            fee: display::eth(details.fee_wei),
            fee_wei: details.fee_wei.map(|f| f.to_string()),
        }
    }
}

/// The transaction panel: active hash plus its latest lookup result.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveTransactionResponse {
    pub hash: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub state: LoadState,
    /// Status label even when nothing is loaded (`—`)
    pub status: TxStatusLabel,
    pub transaction: Option<TransactionView>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<SlotView<TransactionDetails>> for ActiveTransactionResponse {
    fn from(view: SlotView<TransactionDetails>) -> Self {
        let transaction = view.value.present().map(TransactionView::from);
        Self {
            hash: view.hash.map(|h| h.to_string()),
            loading: view.loading,
            error: view.error,
            state: view.value.state(),
            status: transaction
                .as_ref()
                .map(|t| t.status)
                .unwrap_or(TxStatusLabel::Unknown),
            transaction,
            updated_at: view.updated_at,
        }
    }
}

/// Request body for setting an active hash.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetActiveHashRequest {
    /// `0x` + 64 hex characters; blank or omitted clears the panel
    pub hash: Option<String>,
}

/// Validate an optional hash input. Blank means "clear".
pub(super) fn parse_hash_input(input: Option<&str>) -> Result<Option<TxHash>, ApiError> {
    match input.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_tx_hash(raw)
            .map(Some)
            .ok_or_else(|| LookupError::InvalidHash.into()),
    }
}

pub(super) fn parse_hash_path(raw: &str) -> Result<TxHash, ApiError> {
    parse_tx_hash(raw).ok_or_else(|| LookupError::InvalidHash.into())
}

/// Look up a transaction and its receipt.
#[utoipa::path(
    get,
    path = "/v1/transactions/{hash}",
    tag = "Transactions",
    params(
        ("hash" = String, Path, description = "Transaction hash (0x + 64 hex)")
    ),
    responses(
        (status = 200, description = "Transaction found", body = TransactionView),
        (status = 400, description = "Malformed hash"),
        (status = 404, description = "Transaction not found"),
        (status = 503, description = "RPC endpoint unavailable")
    )
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<TransactionView>, ApiError> {
    let hash = parse_hash_path(&hash)?;
    let reader = state.rpc.reader().await;
    let details = lookup_transaction(reader.as_ref(), hash).await?;
    Ok(Json(TransactionView::from(&details)))
}

/// Get the transaction panel.
#[utoipa::path(
    get,
    path = "/v1/transactions/active",
    tag = "Transactions",
    responses(
        (status = 200, description = "Active transaction lookup", body = ActiveTransactionResponse)
    )
)]
pub async fn get_active_transaction(
    State(state): State<AppState>,
) -> Json<ActiveTransactionResponse> {
    Json(state.transactions.view().await.into())
}

/// Set the active transaction hash and start a lookup.
#[utoipa::path(
    put,
    path = "/v1/transactions/active",
    tag = "Transactions",
    request_body = SetActiveHashRequest,
    responses(
        (status = 202, description = "Lookup started or panel cleared", body = ActiveTransactionResponse),
        (status = 400, description = "Malformed hash; nothing is fetched")
    )
)]
pub async fn set_active_transaction(
    State(state): State<AppState>,
    Json(request): Json<SetActiveHashRequest>,
) -> Result<(StatusCode, Json<ActiveTransactionResponse>), ApiError> {
    let hash = parse_hash_input(request.hash.as_deref())?;
    state.select_transaction(hash).await;
    Ok((
        StatusCode::ACCEPTED,
        Json(state.transactions.view().await.into()),
    ))
}

/// Re-run the lookup for the active hash.
#[utoipa::path(
    post,
    path = "/v1/transactions/active/refresh",
    tag = "Transactions",
    responses(
        (status = 202, description = "Lookup restarted", body = ActiveTransactionResponse),
        (status = 409, description = "No active hash")
    )
)]
pub async fn refresh_active_transaction(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ActiveTransactionResponse>), ApiError> {
    if state.transactions.view().await.hash.is_none() {
        return Err(ApiError::conflict("No active transaction hash"));
    }
    state.refresh_transaction().await;
    Ok((
        StatusCode::ACCEPTED,
        Json(state.transactions.view().await.into()),
    ))
}
