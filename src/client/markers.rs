//! Map layer capability

use std::collections::HashMap;

use tracing::debug;

use crate::types::{ConnectionId, Coordinates};

/// A labeled point on the map
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub coords: Coordinates,
    pub label: String,
}

/// The map widget as seen by the client: it can place, move and drop labeled points.
///
/// Callers only `update` or `remove` ids they previously `add`ed.
pub trait MarkerLayer {
    fn add(&mut self, id: &ConnectionId, coords: Coordinates, label: &str);
    fn update(&mut self, id: &ConnectionId, coords: Coordinates, label: &str);
    fn remove(&mut self, id: &ConnectionId);
}

impl<L: MarkerLayer + ?Sized> MarkerLayer for &mut L {
    fn add(&mut self, id: &ConnectionId, coords: Coordinates, label: &str) {
        (**self).add(id, coords, label)
    }

    fn update(&mut self, id: &ConnectionId, coords: Coordinates, label: &str) {
        (**self).update(id, coords, label)
    }

    fn remove(&mut self, id: &ConnectionId) {
        (**self).remove(id)
    }
}

/// Headless layer that keeps markers in memory
#[derive(Debug, Default)]
pub struct MemoryLayer {
    markers: HashMap<ConnectionId, Marker>,
}

impl MemoryLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&Marker> {
        self.markers.get(id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ConnectionId> {
        self.markers.keys()
    }
}

impl MarkerLayer for MemoryLayer {
    fn add(&mut self, id: &ConnectionId, coords: Coordinates, label: &str) {
        debug!(%id, label, lat = coords.latitude, lon = coords.longitude, "marker added");
        let marker = Marker {
            coords,
            label: label.to_string(),
        };
        self.markers.insert(id.clone(), marker);
    }

    fn update(&mut self, id: &ConnectionId, coords: Coordinates, label: &str) {
        debug!(%id, label, lat = coords.latitude, lon = coords.longitude, "marker moved");
        // A move for a point we never drew places it
        let marker = Marker {
            coords,
            label: label.to_string(),
        };
        self.markers.insert(id.clone(), marker);
    }

    fn remove(&mut self, id: &ConnectionId) {
        debug!(%id, "marker removed");
        self.markers.remove(id);
    }
}
