//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, info_span, warn, Instrument};

use super::broadcaster::RelayEnvelope;
use super::events::{ClientMessage, ServerEvent};
use super::state::AppState;
use crate::error::RelayError;
use crate::types::{ConnectionId, Coordinates};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection from upgrade to cleanup
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    // Subscribe before taking the snapshot so nothing falls between the two
    let mut rx = state.subscribe();
    let id = state.presence.connect();
    let span = info_span!("connection", id = %id);

    async move {
        info!(connections = state.presence.len(), "client connected");

        let welcome = state.direct(ServerEvent::Connected {
            id: id.clone(),
            peers: state.snapshot_for(&id),
        });
        let announced = send_json(&mut socket, &welcome).await;
        if announced {
            state.announce_join(&id);
            run(&mut socket, &state, &id, &mut rx).await;
        } else {
            debug!("client left before the welcome was delivered");
        }

        let session_secs = state
            .leave(&id, announced)
            .map(|presence| chrono::Utc::now().timestamp() - presence.connected_at);
        info!(
            connections = state.presence.len(),
            session_secs, "client disconnected"
        );
    }
    .instrument(span)
    .await
}

/// Pump broadcast envelopes out and client frames in until either side ends
async fn run(
    socket: &mut WebSocket,
    state: &AppState,
    id: &ConnectionId,
    rx: &mut broadcast::Receiver<RelayEnvelope>,
) {
    loop {
        tokio::select! {
            // Broadcast events to client
            result = rx.recv() => {
                match result {
                    Ok(envelope) => {
                        if !envelope.is_for(id) {
                            continue;
                        }
                        if !send_json(socket, &envelope.message).await {
                            break; // Client disconnected
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // Buffered events that remain still arrive after the
                        // snapshot; applying them on top converges on the same state
                        warn!(skipped, "client lagged behind the broadcast buffer, resyncing");
                        let resync = state.direct(ServerEvent::Snapshot {
                            peers: state.snapshot_for(id),
                        });
                        if !send_json(socket, &resync).await {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            // Handle client messages
            result = socket.recv() => {
                match result {
                    Some(Ok(msg)) => {
                        if !handle_client_message(msg, socket, state, id).await {
                            break; // Client requested close or error
                        }
                    }
                    Some(Err(e)) => {
                        debug!(error = %e, "websocket error");
                        break;
                    }
                    None => break, // Client disconnected
                }
            }
        }
    }
}

/// Handle a message from the client
/// Returns false if the connection should be closed
async fn handle_client_message(
    msg: Message,
    socket: &mut WebSocket,
    state: &AppState,
    id: &ConnectionId,
) -> bool {
    match msg {
        Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
            Ok(ClientMessage::SendLocation {
                latitude,
                longitude,
                user_name,
            }) => {
                let coords = Coordinates::new(latitude, longitude);
                if let Err(err) = coords.validate() {
                    debug!(%err, "rejected location");
                    return send_json(socket, &state.direct(ServerEvent::error(&err))).await;
                }
                if let Some(location) = state.presence.update_location(id, coords, user_name) {
                    let seq = state.broadcast(ServerEvent::ReceiveLocation(location), Some(id));
                    debug!(seq, latitude, longitude, "relayed location");
                }
                true
            }
            Ok(ClientMessage::Ping) => send_json(socket, &state.direct(ServerEvent::Pong)).await,
            Err(e) => {
                let err = RelayError::from(e);
                debug!(%err, "unparsable client message");
                send_json(socket, &state.direct(ServerEvent::error(&err))).await
            }
        },
        Message::Binary(_) => true, // Ignore binary messages
        Message::Ping(data) => socket.send(Message::Pong(data)).await.is_ok(),
        Message::Pong(_) => true,   // Ignore pong responses
        Message::Close(_) => false, // Client requested close
    }
}

/// Serialize and send one message; false once the client is gone
async fn send_json<T: Serialize>(socket: &mut WebSocket, msg: &T) -> bool {
    match serde_json::to_string(msg) {
        Ok(json) => socket.send(Message::Text(json)).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "failed to serialize outgoing message");
            true
        }
    }
}
