//! Headless relay client: reports a fixed position and logs the peer map

use anyhow::Context;
use location_relay::client::{interval_source, MemoryLayer};
use location_relay::{config, logging, ClientConfig, Coordinates, PeerView, RelayClient};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    logging::init();

    let config = ClientConfig::from_env()?;
    let coords = Coordinates::new(config.latitude, config.longitude);
    coords.validate()?;

    let client = RelayClient::new(config.url.as_str(), config.user_name.as_deref());
    let source = interval_source(coords, config.report_interval);
    let mut view = PeerView::new(MemoryLayer::new());

    tokio::select! {
        result = client.run(source, &mut view) => {
            result.with_context(|| format!("relay session with {} failed", config.url))?;
        }
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
    }

    info!(peers = view.peer_count(), "session ended");
    Ok(())
}
