//! WebSocket event broadcaster
//!
//! Every connection task subscribes to one shared channel. Envelopes carry the
//! connection that caused them so each task can drop its own echoes.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

use super::events::{ServerEvent, WsMessage};
use crate::types::ConnectionId;

/// A broadcast message tagged with the connection that produced it
#[derive(Clone, Debug)]
pub struct RelayEnvelope {
    pub origin: Option<ConnectionId>,
    pub message: WsMessage,
}

impl RelayEnvelope {
    /// Whether the given connection should receive this envelope
    pub fn is_for(&self, id: &ConnectionId) -> bool {
        self.origin.as_ref() != Some(id)
    }
}

/// Fan-out of relay events to all connected clients
pub struct Broadcaster {
    tx: broadcast::Sender<RelayEnvelope>,
    sequence_counter: AtomicU64,
}

impl Broadcaster {
    /// Create a new broadcaster with the given per-subscriber capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            sequence_counter: AtomicU64::new(0),
        }
    }

    /// Broadcast an event to every subscriber except `origin`
    pub fn broadcast(&self, event: ServerEvent, origin: Option<&ConnectionId>) -> u64 {
        let seq = self.sequence_counter.fetch_add(1, Ordering::SeqCst);
        let envelope = RelayEnvelope {
            origin: origin.cloned(),
            message: WsMessage::new(event, seq),
        };
        // Ignore errors - just means no receivers are connected
        let _ = self.tx.send(envelope);
        seq
    }

    /// Wrap an event addressed to a single connection without advancing the sequence
    pub fn direct(&self, event: ServerEvent) -> WsMessage {
        WsMessage::new(event, self.current_sequence_id())
    }

    /// Get the current sequence ID
    pub fn current_sequence_id(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }

    /// Subscribe to receive broadcast events
    pub fn subscribe(&self) -> broadcast::Receiver<RelayEnvelope> {
        self.tx.subscribe()
    }
}
