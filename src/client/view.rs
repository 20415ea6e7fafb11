//! Peer-side reconciliation of the marker set
//!
//! `PeerView` owns the client's picture of who is on the map and translates
//! server events into calls on a [`MarkerLayer`]:
//!
//! - a location for an unknown peer adds a marker, a location for a known peer
//!   moves and relabels it, so replays are harmless;
//! - a disconnect removes the marker if there is one;
//! - anything about the client's own id is ignored, its own marker is driven
//!   locally through [`PeerView::show_self`];
//! - welcome and snapshot messages replace the whole peer set.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::markers::{Marker, MarkerLayer};
use crate::api::websocket::events::{ServerEvent, WsMessage};
use crate::types::{ConnectionId, Coordinates, DisplayName, PeerLocation};

pub struct PeerView<L> {
    layer: L,
    self_id: Option<ConnectionId>,
    /// Own marker; rendered only once the server has told us our id
    own: Option<Marker>,
    peers: HashMap<ConnectionId, Marker>,
    last_sequence_id: Option<u64>,
}

impl<L: MarkerLayer> PeerView<L> {
    pub fn new(layer: L) -> Self {
        Self {
            layer,
            self_id: None,
            own: None,
            peers: HashMap::new(),
            last_sequence_id: None,
        }
    }

    /// Record the id the server assigned to this client.
    ///
    /// On reconnect the id changes; the own marker follows it.
    pub fn set_self_id(&mut self, id: ConnectionId) {
        if self.self_id.as_ref() == Some(&id) {
            return;
        }
        let previous = self.self_id.replace(id.clone());

        if let Some(own) = &self.own {
            if let Some(previous) = &previous {
                self.layer.remove(previous);
            }
            self.layer.add(&id, own.coords, &own.label);
        }
        // Never show ourselves as a peer
        if self.peers.remove(&id).is_some() {
            self.layer.remove(&id);
        }
    }

    pub fn self_id(&self) -> Option<&ConnectionId> {
        self.self_id.as_ref()
    }

    /// Apply a server message, remembering its sequence id
    pub fn apply_message(&mut self, msg: &WsMessage) {
        self.last_sequence_id = Some(msg.sequence_id);
        self.apply(&msg.event);
    }

    /// Apply a single server event to the marker set
    pub fn apply(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::Connected { id, peers } => {
                self.set_self_id(id.clone());
                self.reconcile(peers);
            }
            ServerEvent::Snapshot { peers } => self.reconcile(peers),
            ServerEvent::ReceiveLocation(location) => self.upsert(location),
            ServerEvent::UserDisconnected { id } => self.remove(id),
            ServerEvent::UserConnected { id } => debug!(%id, "peer joined"),
            ServerEvent::Pong => {}
            ServerEvent::Error { code, message } => warn!(%code, %message, "relay rejected a message"),
        }
    }

    /// Make the peer markers match `peers` exactly (minus ourselves)
    pub fn reconcile(&mut self, peers: &[PeerLocation]) {
        let keep: HashSet<&ConnectionId> = peers.iter().map(|p| &p.id).collect();
        let stale: Vec<ConnectionId> = self
            .peers
            .keys()
            .filter(|id| !keep.contains(id))
            .cloned()
            .collect();
        for id in &stale {
            self.remove(id);
        }
        for peer in peers {
            self.upsert(peer);
        }
    }

    /// Add or move a peer's marker
    pub fn upsert(&mut self, location: &PeerLocation) {
        if self.is_self(&location.id) {
            return;
        }
        let marker = Marker {
            coords: location.coords(),
            label: location.label(),
        };
        match self.peers.get_mut(&location.id) {
            Some(existing) if *existing == marker => {}
            Some(existing) => {
                self.layer.update(&location.id, marker.coords, &marker.label);
                *existing = marker;
            }
            None => {
                self.layer.add(&location.id, marker.coords, &marker.label);
                self.peers.insert(location.id.clone(), marker);
            }
        }
    }

    /// Drop a peer's marker; unknown ids are ignored
    pub fn remove(&mut self, id: &ConnectionId) {
        if self.is_self(id) {
            return;
        }
        if self.peers.remove(id).is_some() {
            self.layer.remove(id);
        }
    }

    /// Place or move this client's own marker
    pub fn show_self(&mut self, coords: Coordinates, name: &DisplayName) {
        let marker = Marker {
            coords,
            label: name.as_str().to_string(),
        };
        let shown = self.own.is_some();
        if self.own.as_ref() == Some(&marker) {
            return;
        }
        if let Some(id) = &self.self_id {
            if shown {
                self.layer.update(id, marker.coords, &marker.label);
            } else {
                self.layer.add(id, marker.coords, &marker.label);
            }
        }
        self.own = Some(marker);
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.peers.contains_key(id)
    }

    /// Number of peer markers, not counting our own
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    pub fn last_sequence_id(&self) -> Option<u64> {
        self.last_sequence_id
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }

    fn is_self(&self, id: &ConnectionId) -> bool {
        self.self_id.as_ref() == Some(id)
    }
}
