// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! DataLogger write endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::transactions::parse_hash_path;
use crate::{
    error::ApiError,
    state::AppState,
    wallet::{LogService, LogSubmission, SubmissionStatus},
};

/// Request body for a log write.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitLogRequest {
    /// Defaults to "Hello from Sepolia testnet"
    pub memo: Option<String>,
    /// A `0x`-prefixed bytes32 used verbatim, or a seed to hash
    pub custom_id: Option<String>,
}

/// Query parameters for previewing a data id.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DataIdQuery {
    pub memo: Option<String>,
    pub custom_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DataIdResponse {
    pub data_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Pending,
    Confirmed,
    Failed,
}

/// A broadcast log transaction and its confirmation state.
#[derive(Debug, Serialize, ToSchema)]
pub struct LogSubmissionResponse {
    pub tx_hash: String,
    pub contract: String,
    pub sender: Option<String>,
    pub memo: String,
    pub data_id: String,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionState,
    pub block_number: Option<u64>,
    /// Receipt status once mined
    pub success: Option<bool>,
    /// Number of DataLogged events in the receipt
    pub logged_events: Option<usize>,
    pub error: Option<String>,
}

impl From<LogSubmission> for LogSubmissionResponse {
    fn from(submission: LogSubmission) -> Self {
        let (status, block_number, success, logged_events, error) = match submission.status {
            SubmissionStatus::Pending => (SubmissionState::Pending, None, None, None, None),
            SubmissionStatus::Confirmed {
                block_number,
                success,
                logged_events,
            } => (
                SubmissionState::Confirmed,
                block_number,
                Some(success),
                Some(logged_events),
                None,
            ),
            SubmissionStatus::Failed { error } => {
                (SubmissionState::Failed, None, None, None, Some(error))
            }
        };

        Self {
            tx_hash: submission.tx_hash.to_string(),
            contract: submission.contract.to_string(),
            sender: submission.sender.map(|a| a.to_string()),
            memo: submission.memo,
            data_id: submission.data_id.to_string(),
            submitted_at: submission.submitted_at,
            status,
            block_number,
            success,
            logged_events,
            error,
        }
    }
}

/// Sign and broadcast `DataLogger.log(memo, dataId)`.
///
/// Returns once the transaction is broadcast; poll `GET /v1/logs/{tx_hash}`
/// for confirmation.
#[utoipa::path(
    post,
    path = "/v1/logs",
    tag = "Logs",
    request_body = SubmitLogRequest,
    responses(
        (status = 202, description = "Transaction broadcast", body = LogSubmissionResponse),
        (status = 400, description = "Invalid data id"),
        (status = 409, description = "Wallet not connected"),
        (status = 503, description = "Logger not configured or send failed")
    )
)]
pub async fn submit_log(
    State(state): State<AppState>,
    Json(request): Json<SubmitLogRequest>,
) -> Result<(StatusCode, Json<LogSubmissionResponse>), ApiError> {
    let rpc_url = state.rpc.current().await.url;
    let submission = state
        .logs
        .submit(
            &rpc_url,
            &state.wallet,
            request.memo,
            request.custom_id.as_deref(),
        )
        .await?;
    Ok((StatusCode::ACCEPTED, Json(submission.into())))
}

#[utoipa::path(
    get,
    path = "/v1/logs/{tx_hash}",
    tag = "Logs",
    params(
        ("tx_hash" = String, Path, description = "Hash returned by POST /v1/logs")
    ),
    responses(
        (status = 200, description = "Submission state", body = LogSubmissionResponse),
        (status = 400, description = "Malformed hash"),
        (status = 404, description = "Unknown submission")
    )
)]
pub async fn get_log(
    State(state): State<AppState>,
    Path(tx_hash): Path<String>,
) -> Result<Json<LogSubmissionResponse>, ApiError> {
    let tx_hash = parse_hash_path(&tx_hash)?;
    let submission = state
        .logs
        .get(&tx_hash)
        .await
        .ok_or_else(|| ApiError::not_found("Log submission not found"))?;
    Ok(Json(submission.into()))
}

/// Preview the data id a submission would use.
#[utoipa::path(
    get,
    path = "/v1/logs/data-id",
    tag = "Logs",
    params(DataIdQuery),
    responses(
        (status = 200, description = "Derived data id", body = DataIdResponse),
        (status = 400, description = "Invalid custom id")
    )
)]
pub async fn preview_data_id(
    Query(query): Query<DataIdQuery>,
) -> Result<Json<DataIdResponse>, ApiError> {
    let data_id = LogService::preview_data_id(query.memo.as_deref(), query.custom_id.as_deref())?;
    Ok(Json(DataIdResponse {
        data_id: data_id.to_string(),
    }))
}
