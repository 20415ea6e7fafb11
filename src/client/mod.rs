//! Client half of the relay
//!
//! A client reports samples from its position source and keeps a map layer in
//! step with the server's view of who is connected. The map widget and the
//! sensor are outside this crate; they plug in through [`MarkerLayer`] and
//! [`PositionSource`].

mod markers;
mod sensor;
mod session;
mod view;

pub use markers::{Marker, MarkerLayer, MemoryLayer};
pub use sensor::{interval_source, PositionSource, SensorError};
pub use session::RelayClient;
pub use view::PeerView;
