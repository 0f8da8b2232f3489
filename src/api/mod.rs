// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub mod chain;
pub mod display;
pub mod health;
pub mod logs;
pub mod rpc;
pub mod transactions;
pub mod transfers;
pub mod wallet;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/chain", get(chain::get_chain))
        .route("/chain/address", put(chain::set_address))
        .route("/chain/refresh", post(chain::refresh_chain))
        .route("/rpc", get(rpc::get_rpc).put(rpc::select_rpc))
        .route(
            "/transactions/active",
            get(transactions::get_active_transaction).put(transactions::set_active_transaction),
        )
        .route(
            "/transactions/active/refresh",
            post(transactions::refresh_active_transaction),
        )
        .route("/transactions/{hash}", get(transactions::get_transaction))
        .route(
            "/transfers/active",
            get(transfers::get_active_transfer).put(transfers::set_active_transfer),
        )
        .route("/transfers/{hash}", get(transfers::get_transfer))
        .route("/wallet", get(wallet::get_wallet))
        .route("/wallet/connect", post(wallet::connect_wallet))
        .route("/wallet/disconnect", post(wallet::disconnect_wallet))
        .route("/logs", post(logs::submit_log))
        .route("/logs/data-id", get(logs::preview_data_id))
        .route("/logs/{tx_hash}", get(logs::get_log));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        chain::get_chain,
        chain::set_address,
        chain::refresh_chain,
        rpc::get_rpc,
        rpc::select_rpc,
        transactions::get_transaction,
        transactions::get_active_transaction,
        transactions::set_active_transaction,
        transactions::refresh_active_transaction,
        transfers::get_transfer,
        transfers::get_active_transfer,
        transfers::set_active_transfer,
        wallet::get_wallet,
        wallet::connect_wallet,
        wallet::disconnect_wallet,
        logs::submit_log,
        logs::get_log,
        logs::preview_data_id
    ),
    components(
        schemas(
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            chain::ChainResponse,
            chain::SetAddressRequest,
            rpc::RpcResponse,
            rpc::SelectRpcRequest,
            transactions::TransactionView,
            transactions::ActiveTransactionResponse,
            transactions::SetActiveHashRequest,
            transfers::TransferView,
            transfers::ActiveTransferResponse,
            wallet::WalletResponse,
            logs::SubmitLogRequest,
            logs::DataIdResponse,
            logs::LogSubmissionResponse,
            logs::SubmissionState
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Chain", description = "Polled block, fee, network and balance data"),
        (name = "RPC", description = "RPC provider and network selection"),
        (name = "Transactions", description = "Transaction details lookup"),
        (name = "Transfers", description = "ERC-20 Transfer decoding"),
        (name = "Wallet", description = "Signing wallet connection"),
        (name = "Logs", description = "DataLogger contract writes")
    )
)]
struct ApiDoc;
