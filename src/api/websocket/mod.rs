//! WebSocket module for the location relay
//!
//! Provides the `/ws` endpoint. Each connection gets a welcome with its id and
//! the peers already on the map, then receives every other client's position
//! updates and join/leave notices.

pub mod broadcaster;
pub mod events;
pub mod handler;
pub mod state;

// Re-export commonly used items
pub use broadcaster::{Broadcaster, RelayEnvelope};
pub use events::{ClientMessage, ServerEvent, WsMessage};
pub use state::AppState;
