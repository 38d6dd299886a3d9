// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use visual_edit_gateway::{
    api::router,
    auth::load_secret,
    config::{GatewayConfig, LogFormat, DEFAULT_LOG_FILTER},
    shutdown::spawn_signal_listener,
    state::AppState,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.log_format);

    let secret = load_secret(&config.secret_file);
    if secret.is_none() {
        tracing::warn!(
            path = %config.secret_file.display(),
            "No API key loaded; every edit request will be rejected"
        );
    }

    let addr = config.bind_address();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to bind listener");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        address = %addr,
        project_root = %config.project_root.display(),
        audit_commits = config.audit_commits,
        strict_resolution = config.strict_resolution,
        "Visual edit gateway listening (docs at /docs)"
    );

    let app = router(AppState::new(config, secret));

    let shutdown = CancellationToken::new();
    if let Err(e) = spawn_signal_listener(shutdown.clone()) {
        tracing::error!(error = %e, "Failed to install shutdown signal handlers");
        return ExitCode::FAILURE;
    }

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await;

    match served {
        Ok(()) => {
            tracing::info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
