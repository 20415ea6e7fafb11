//! Connection → last known location map

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::types::{ConnectionId, Coordinates, PeerLocation};

/// Presence entry for one connection
#[derive(Debug, Clone)]
pub struct Presence {
    /// Unix timestamp of the upgrade
    pub connected_at: i64,
    /// Latest reported position, if the client has sent one yet
    pub last_location: Option<PeerLocation>,
}

/// Registry of live connections
pub struct PresenceRegistry {
    entries: RwLock<HashMap<ConnectionId, Presence>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection and return its id
    pub fn connect(&self) -> ConnectionId {
        let id = ConnectionId::generate();
        let presence = Presence {
            connected_at: chrono::Utc::now().timestamp(),
            last_location: None,
        };
        self.entries.write().insert(id.clone(), presence);
        id
    }

    /// Associate the latest position and name with a connection.
    ///
    /// Last write wins for both fields. Returns `None` when the connection is
    /// not registered, so late updates from a departed client go nowhere.
    pub fn update_location(
        &self,
        id: &ConnectionId,
        coords: Coordinates,
        user_name: Option<String>,
    ) -> Option<PeerLocation> {
        let mut entries = self.entries.write();
        let presence = entries.get_mut(id)?;
        let location = PeerLocation::new(id.clone(), coords, user_name);
        presence.last_location = Some(location.clone());
        Some(location)
    }

    /// Remove a connection, returning its entry the first time only
    pub fn disconnect(&self, id: &ConnectionId) -> Option<Presence> {
        self.entries.write().remove(id)
    }

    /// Last known locations of connected peers, sorted by id.
    ///
    /// Connections that have not reported yet are left out.
    pub fn snapshot(&self, exclude: Option<&ConnectionId>) -> Vec<PeerLocation> {
        let entries = self.entries.read();
        let mut peers: Vec<PeerLocation> = entries
            .iter()
            .filter(|(id, _)| Some(*id) != exclude)
            .filter_map(|(_, presence)| presence.last_location.clone())
            .collect();
        peers.sort_by(|a, b| a.id.cmp(&b.id));
        peers
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.entries.read().contains_key(id)
    }

    /// Number of live connections, reporting or not
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for PresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
