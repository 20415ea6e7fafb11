//! Data types for the location relay
//!
//! Value types shared by the server, the wire protocol and the client.

mod connection;
mod location;

pub use connection::ConnectionId;
pub use location::{Coordinates, DisplayName, PeerLocation, PositionSample};
