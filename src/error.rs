// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::blockchain::ChainClientError;
use crate::lookup::LookupError;
use crate::wallet::WalletError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ChainClientError> for ApiError {
    fn from(e: ChainClientError) -> Self {
        match e {
            ChainClientError::InvalidRpcUrl(_) => ApiError::bad_request(e.to_string()),
            ChainClientError::InvalidPrivateKey(_)
            | ChainClientError::RpcError(_)
            | ChainClientError::ContractError(_)
            | ChainClientError::TransactionFailed(_) => ApiError::service_unavailable(e.to_string()),
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::InvalidHash => ApiError::bad_request(e.to_string()),
            LookupError::TransactionNotFound
            | LookupError::ReceiptNotFound
            | LookupError::NoTransferEvent => ApiError::not_found(e.to_string()),
            LookupError::MalformedLog(_) => ApiError::bad_gateway(e.to_string()),
            LookupError::Client(inner) => inner.into(),
        }
    }
}

impl From<WalletError> for ApiError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::NoConnector | WalletError::LoggerNotConfigured => {
                ApiError::service_unavailable(e.to_string())
            }
            WalletError::NotConnected => ApiError::conflict(e.to_string()),
            WalletError::InvalidDataId(_) => ApiError::bad_request(e.to_string()),
            WalletError::Signer(_) => ApiError::service_unavailable(e.to_string()),
            WalletError::Chain(inner) => inner.into(),
        }
    }
}
