//! Presence tracking for connected clients
//!
//! The registry is the server's view of who is connected and where each
//! connection last reported itself. It holds only the latest position per
//! connection; nothing is kept once a connection leaves.

mod registry;

pub use registry::{Presence, PresenceRegistry};
