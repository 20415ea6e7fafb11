//! Location Relay
//!
//! A real-time location broadcast relay: clients report their position and
//! display name over a WebSocket, and the server fans every update out to all
//! other connected clients, which keep a live marker per peer on their map.
//!
//! # Modules
//!
//! - `types`: Core value types (ConnectionId, Coordinates, PeerLocation)
//! - `presence`: Server-side registry of connections and their last position
//! - `api`: Axum router, WebSocket relay and wire protocol
//! - `client`: Peer-side marker reconciliation and relay session
//! - `config`: Environment-driven settings
//! - `error`: Error type shared across the crate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use location_relay::{api, AppState, RelayConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RelayConfig::from_env()?;
//!     let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
//!     let state = Arc::new(AppState::new(config));
//!     api::serve(listener, state, std::future::pending()).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod presence;
pub mod types;

// Re-export commonly used items at crate root
pub use api::websocket::{AppState, ClientMessage, ServerEvent, WsMessage};
pub use client::{MarkerLayer, PeerView, PositionSource, RelayClient};
pub use config::{ClientConfig, RelayConfig};
pub use error::{RelayError, RelayResult};
pub use presence::PresenceRegistry;
pub use types::{ConnectionId, Coordinates, DisplayName, PeerLocation, PositionSample};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
