// File: services/pushping_backend/src/main.rs
use pushping_backend::{build_router, AppState};
use pushping_common::logging;
use pushping_config::load_config;
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => Arc::new(config),
        Err(err) => {
            // logging is not initialised yet
            eprintln!("❌ Failed to load configuration: {}", err);
            process::exit(1);
        }
    };

    logging::init_with_level(&config.logging.level);

    let state = match AppState::new(config.clone()).await {
        Ok(state) => state,
        Err(err) => {
            error!("❌ Startup failed: {}", err);
            process::exit(1);
        }
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("❌ Failed to bind {}: {}", addr, err);
            state.close().await;
            process::exit(1);
        }
    };
    info!("🚀 Server listening on http://{}", addr);

    let broadcast = if config.broadcast.enabled {
        Some(state.broadcaster().spawn())
    } else {
        info!("Broadcast disabled");
        None
    };

    let app = build_router(&state);
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", err);
    }

    if let Some(handle) = broadcast {
        handle.shutdown().await;
    }
    state.close().await;
    info!("Shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
