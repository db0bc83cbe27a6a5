//! Gallery metadata server binary.

use gallery_metadata::{create_router, AppState, Config};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting gallery metadata server");

    let config: Config = config::Config::builder()
        .add_source(config::File::with_name("gallery").required(false))
        .add_source(config::Environment::with_prefix("GALLERY"))
        .build()
        .and_then(|c| c.try_deserialize())
        .unwrap_or_else(|e| {
            // Fall back only when no config exists; parsing errors fail hard.
            let err_str = format!("{e}");
            if err_str.contains("not found") || err_str.contains("missing field") {
                warn!(error = %e, "No config file found, using defaults");
                Config::default()
            } else {
                error!(error = %e, "FATAL: Config error — fix env vars or gallery.toml");
                std::process::exit(1);
            }
        });

    info!(
        contract = %config.contract_address,
        rpc = %config.rpc_url,
        catalog = %config.catalog_path,
        "Configuration loaded"
    );

    let bind_address = config.bind_address.clone();
    let poll_interval = Duration::from_secs(config.poll_interval_secs);

    // Bootstraps total supply; refuses to serve when the chain is unreachable.
    let state = Arc::new(AppState::new(config).await?);

    info!(
        supply = state.supply.current(),
        catalog_records = state.catalog.len(),
        "Server ready"
    );

    let cancel = CancellationToken::new();

    let state_bg = Arc::clone(&state);
    let cancel_bg = cancel.clone();
    tokio::spawn(async move {
        state_bg
            .supply
            .run_listener(&state_bg.chain, poll_interval, cancel_bg)
            .await;
    });

    let app = create_router(state.clone());

    info!(address = %bind_address, "Listening");

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped, stopping mint listener...");
    cancel.cancel();

    info!("Server shut down gracefully");
    Ok(())
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
        _ = ctrl_c => info!("Received SIGINT, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
