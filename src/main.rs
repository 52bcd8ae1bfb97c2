// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use forumhub_server::{
    api::router,
    auth::{TokenError, TokenService},
    config::AppConfig,
    logging,
    state::AppState,
    storage::{ForumDatabase, StoreError},
};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("failed to open database: {0}")]
    Store(#[from] StoreError),

    #[error("failed to build token service: {0}")]
    Token(#[from] TokenError),

    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };
    logging::init(config.log_format);

    if let Err(e) = run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    let db = ForumDatabase::open_in(&config.data_dir)?;
    info!(data_dir = %config.data_dir.display(), "Database opened");

    let tokens = TokenService::new(&config.token)?;
    let state = AppState::new(db, tokens);
    let app = router(state);

    let bind_address = config.bind_address();
    let addr: SocketAddr = bind_address
        .parse()
        .map_err(|_| StartupError::BindAddress(bind_address.clone()))?;

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "ForumHub server listening (docs at /docs)");

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Cancel `shutdown` on Ctrl+C or SIGTERM.
async fn wait_for_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }

    shutdown.cancel();
}
