// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RPC source selection endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    blockchain::{network_name, RpcSource},
    error::ApiError,
    rpc::RpcSelection,
    state::AppState,
};

/// The active RPC selection.
#[derive(Debug, Serialize, ToSchema)]
pub struct RpcResponse {
    pub source: RpcSource,
    /// Network used for endpoint selection
    pub chain_id: Option<u64>,
    pub network: Option<String>,
    /// Scheme and host of the resolved endpoint; paths may carry API keys
    pub endpoint: String,
}

impl From<&RpcSelection> for RpcResponse {
    fn from(selection: &RpcSelection) -> Self {
        Self {
            source: selection.source,
            chain_id: selection.chain_id,
            network: selection.chain_id.map(|id| network_name(id).to_string()),
            endpoint: endpoint_origin(&selection.url),
        }
    }
}

fn endpoint_origin(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(url) => match url.host_str() {
            Some(host) => format!("{}://{}", url.scheme(), host),
            None => url.scheme().to_string(),
        },
        Err(_) => "invalid".to_string(),
    }
}

/// Request body for switching the RPC source.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectRpcRequest {
    pub source: RpcSource,
    /// Keep the current network when omitted
    pub chain_id: Option<u64>,
}

/// Get the active RPC source and endpoint.
#[utoipa::path(
    get,
    path = "/v1/rpc",
    tag = "RPC",
    responses(
        (status = 200, description = "Active RPC selection", body = RpcResponse)
    )
)]
pub async fn get_rpc(State(state): State<AppState>) -> Json<RpcResponse> {
    Json(RpcResponse::from(&state.rpc.current().await))
}

/// Switch RPC source or network.
///
/// Everything read through the previous endpoint is re-fetched.
#[utoipa::path(
    put,
    path = "/v1/rpc",
    tag = "RPC",
    request_body = SelectRpcRequest,
    responses(
        (status = 200, description = "RPC selection updated", body = RpcResponse),
        (status = 400, description = "Resolved endpoint is not a valid URL")
    )
)]
pub async fn select_rpc(
    State(state): State<AppState>,
    Json(request): Json<SelectRpcRequest>,
) -> Result<Json<RpcResponse>, ApiError> {
    let chain_id = match request.chain_id {
        Some(id) => Some(id),
        None => state.rpc.current().await.chain_id,
    };
    let selection = state.switch_rpc(request.source, chain_id).await?;
    Ok(Json(RpcResponse::from(&selection)))
}
