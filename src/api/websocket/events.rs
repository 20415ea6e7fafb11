//! WebSocket message types for the location relay

use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::types::{ConnectionId, PeerLocation};

/// Events pushed from the server to clients
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Welcome for a new connection: its own id and the peers already on the map
    Connected {
        id: ConnectionId,
        #[serde(default)]
        peers: Vec<PeerLocation>,
    },

    /// Another client joined
    UserConnected { id: ConnectionId },

    /// A peer reported a new position
    ReceiveLocation(PeerLocation),

    /// A peer left; its marker should go
    UserDisconnected { id: ConnectionId },

    /// Full resync after this connection fell behind the broadcast buffer
    Snapshot {
        #[serde(default)]
        peers: Vec<PeerLocation>,
    },

    /// Reply to a client ping
    Pong,

    /// A client message was rejected
    Error { code: String, message: String },
}

impl ServerEvent {
    pub fn error(err: &RelayError) -> Self {
        ServerEvent::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// WebSocket message wrapper with metadata
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WsMessage {
    /// The relay event
    #[serde(flatten)]
    pub event: ServerEvent,

    /// Monotonically increasing sequence ID over broadcast events
    #[serde(rename = "sequenceId")]
    pub sequence_id: u64,

    /// Unix timestamp when the message was created
    pub timestamp: i64,
}

impl WsMessage {
    pub fn new(event: ServerEvent, sequence_id: u64) -> Self {
        Self {
            event,
            sequence_id,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Client message types
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Report the sender's current position
    SendLocation {
        latitude: f64,
        longitude: f64,
        #[serde(rename = "userName", default, skip_serializing_if = "Option::is_none")]
        user_name: Option<String>,
    },

    /// Ping for heartbeat
    Ping,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinates;

    #[test]
    fn test_receive_location_serialization() {
        let msg = WsMessage::new(
            ServerEvent::ReceiveLocation(PeerLocation::new(
                "c1".into(),
                Coordinates::new(12.5, -3.25),
                Some("Ada".into()),
            )),
            42,
        );

        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "receive-location");
        assert_eq!(json["id"], "c1");
        assert_eq!(json["latitude"], 12.5);
        assert_eq!(json["userName"], "Ada");
        assert_eq!(json["sequenceId"], 42);
    }

    #[test]
    fn test_ws_message_parsing() {
        let json = r#"{"type":"user-disconnected","id":"c9","sequenceId":7,"timestamp":1700000000}"#;
        let msg: WsMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.sequence_id, 7);
        assert_eq!(msg.event, ServerEvent::UserDisconnected { id: "c9".into() });
    }

    #[test]
    fn test_welcome_parsing_with_peers() {
        let json = r#"{
            "type":"connected","id":"me","sequenceId":3,"timestamp":0,
            "peers":[{"id":"p1","latitude":1,"longitude":2,"userName":"Bo"}]
        }"#;
        let msg: WsMessage = serde_json::from_str(json).unwrap();
        match msg.event {
            ServerEvent::Connected { id, peers } => {
                assert_eq!(id.as_str(), "me");
                assert_eq!(peers.len(), 1);
                assert_eq!(peers[0].latitude, 1.0);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_client_message_parsing() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));

        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"send-location","latitude":48.85,"longitude":2.35,"userName":"Ada"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::SendLocation {
                latitude: 48.85,
                longitude: 2.35,
                user_name: Some("Ada".into()),
            }
        );

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"send-location","latitude":1,"longitude":2}"#).unwrap();
        assert!(matches!(msg, ClientMessage::SendLocation { user_name: None, .. }));
    }

    #[test]
    fn test_unknown_client_message_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"teleport"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"send-location"}"#).is_err());
    }
}
