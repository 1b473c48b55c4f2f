use std::sync::Arc;
use std::time::Duration;

use encore::{app, config, initialize_state, telemetry};

/// How often the retention job scans for long-expired rows.
const PURGE_INTERVAL: Duration = Duration::from_secs(3_600);

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    let state = match initialize_state().await {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(error = %err, "cannot initialize application state");
            std::process::exit(1);
        },
    };

    // Out-of-band cleanup: only touches rows already past expiry plus the
    // audit retention window, so it never races request-path rotation.
    let retention_secs = state
        .config
        .token
        .as_ref()
        .map(config::Token::retention_secs)
        .unwrap_or(config::DEFAULT_RETENTION_DAYS * 86_400);
    let purge = Arc::clone(&state.refresh_tokens);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            match purge.purge_expired(retention_secs).await {
                Ok(0) => {},
                Ok(count) => {
                    tracing::info!(count, "expired refresh tokens deleted")
                },
                Err(err) => {
                    tracing::warn!(error = %err, "retention pass failed")
                },
            }
        }
    });

    let port = state.config.port.unwrap_or(8080);
    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", port)).await
    {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, port, "cannot bind address");
            std::process::exit(1);
        },
    };

    tracing::info!(port, "server started");

    if let Err(err) = axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %err, "server stopped unexpectedly");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
