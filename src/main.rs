// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use anyhow::{Context, Result};
use chain_dashboard::{
    api::router,
    config::{DashboardConfig, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = DashboardConfig::from_env().context("Failed to load configuration")?;
    init_logging(config.log_format);

    let (state, poller) = AppState::new(&config)
        .await
        .context("Failed to initialize RPC client")?;

    let selection = state.rpc.current().await;
    info!(
        source = %selection.source,
        chain_id = ?selection.chain_id,
        target = ?config.target_address,
        "Chain dashboard starting"
    );
    if state.logs.contract().is_none() {
        warn!("DATA_LOGGER_ADDRESS not set; log writes are disabled");
    }

    let shutdown = CancellationToken::new();
    let poller_task = tokio::spawn(poller.run(shutdown.clone()));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Chain dashboard listening on http://{addr} (docs at /docs)");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("HTTP server failed")?;

    shutdown.cancel();
    if let Err(e) = poller_task.await {
        warn!(error = %e, "Chain poller task ended abnormally");
    }
    info!("Shutdown complete");
    Ok(())
}

fn init_logging(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal(token: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!(error = %e, "Failed to listen for ctrl-c");
            }
            info!("Shutdown signal received");
            token.cancel();
        }
        _ = token.cancelled() => {}
    }
}
