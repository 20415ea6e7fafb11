//! WebSocket application state

use tokio::sync::broadcast;

use super::broadcaster::{Broadcaster, RelayEnvelope};
use super::events::{ServerEvent, WsMessage};
use crate::config::RelayConfig;
use crate::presence::{Presence, PresenceRegistry};
use crate::types::ConnectionId;

/// Shared application state for WebSocket connections
pub struct AppState {
    /// Who is connected and where they last were
    pub presence: PresenceRegistry,

    /// Fan-out channel shared by all connection tasks
    pub broadcaster: Broadcaster,

    pub config: RelayConfig,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            presence: PresenceRegistry::new(),
            broadcaster: Broadcaster::new(config.broadcast_capacity),
            config,
        }
    }

    /// Broadcast an event to every connection other than `origin`
    pub fn broadcast(&self, event: ServerEvent, origin: Option<&ConnectionId>) -> u64 {
        self.broadcaster.broadcast(event, origin)
    }

    /// Tell every other connection that `id` joined
    pub fn announce_join(&self, id: &ConnectionId) {
        self.broadcast(ServerEvent::UserConnected { id: id.clone() }, Some(id));
    }

    /// Remove `id` from presence. Peers hear about it only if its join was
    /// announced, and only once.
    pub fn leave(&self, id: &ConnectionId, announced: bool) -> Option<Presence> {
        let presence = self.presence.disconnect(id)?;
        if announced {
            self.broadcast(ServerEvent::UserDisconnected { id: id.clone() }, Some(id));
        }
        Some(presence)
    }

    /// Build a message for a single connection
    pub fn direct(&self, event: ServerEvent) -> WsMessage {
        self.broadcaster.direct(event)
    }

    /// Snapshot of every reporting peer other than `id`
    pub fn snapshot_for(&self, id: &ConnectionId) -> Vec<crate::types::PeerLocation> {
        self.presence.snapshot(Some(id))
    }

    /// Get the current sequence ID
    pub fn current_sequence_id(&self) -> u64 {
        self.broadcaster.current_sequence_id()
    }

    /// Subscribe to receive broadcast events
    pub fn subscribe(&self) -> broadcast::Receiver<RelayEnvelope> {
        self.broadcaster.subscribe()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(RelayConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinates;

    #[tokio::test]
    async fn test_broadcast_increments_sequence() {
        let state = AppState::default();

        assert_eq!(state.current_sequence_id(), 0);

        state.broadcast(ServerEvent::UserDisconnected { id: "gone".into() }, None);

        assert_eq!(state.current_sequence_id(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_receives_events() {
        let state = AppState::default();
        let mut rx = state.subscribe();

        let id = state.presence.connect();
        let location = state
            .presence
            .update_location(&id, Coordinates::new(10.0, 20.0), Some("tester".into()))
            .unwrap();
        state.broadcast(ServerEvent::ReceiveLocation(location), Some(&id));

        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.message.sequence_id, 0);
        assert_eq!(envelope.origin.as_ref(), Some(&id));
        assert!(matches!(envelope.message.event, ServerEvent::ReceiveLocation(_)));
    }

    #[tokio::test]
    async fn test_leave_broadcasts_once_after_announced_join() {
        let state = AppState::default();
        let mut rx = state.subscribe();
        let id = state.presence.connect();

        state.announce_join(&id);
        assert!(state.leave(&id, true).is_some());
        assert!(state.leave(&id, true).is_none());

        let joined = rx.recv().await.unwrap();
        assert_eq!(joined.message.event, ServerEvent::UserConnected { id: id.clone() });
        let left = rx.recv().await.unwrap();
        assert_eq!(left.message.event, ServerEvent::UserDisconnected { id: id.clone() });
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unannounced_leave_is_silent() {
        let state = AppState::default();
        let mut rx = state.subscribe();
        let id = state.presence.connect();

        assert!(state.leave(&id, false).is_some());

        assert!(!state.presence.contains(&id));
        assert!(rx.try_recv().is_err());
        assert_eq!(state.current_sequence_id(), 0);
    }

    #[test]
    fn test_snapshot_excludes_requesting_connection() {
        let state = AppState::default();
        let a = state.presence.connect();
        let b = state.presence.connect();
        state.presence.update_location(&a, Coordinates::new(1.0, 1.0), None);
        state.presence.update_location(&b, Coordinates::new(2.0, 2.0), None);

        let peers = state.snapshot_for(&a);
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].id, b);
    }
}
