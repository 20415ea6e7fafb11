//! Location Relay - Server Entry Point

use std::sync::Arc;

use anyhow::Context;
use location_relay::{api, config, logging, AppState, RelayConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = config::load_dotenv();
    logging::init();
    if let Some(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    let config = RelayConfig::from_env()?;
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let state = Arc::new(AppState::new(config));
    api::serve(listener, state, shutdown_signal()).await?;

    info!("location relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
