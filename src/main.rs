//! itemizer - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the subtask generation API.

use itemizer::{api, config::Config};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "itemizer=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    match config.credentials() {
        Some((model, _)) => info!("Loaded configuration: model={}", model),
        None => warn!(
            "HF_MODEL/HF_TOKEN not configured; /generate-items will answer with an error envelope"
        ),
    }

    // Start HTTP server
    let addr = format!("{}:{}", config.host, config.port);
    info!("Starting server on {}", addr);

    api::serve(config).await?;

    Ok(())
}
