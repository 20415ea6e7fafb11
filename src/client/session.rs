//! WebSocket session against a relay server

use std::pin::pin;

use futures::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use super::markers::MarkerLayer;
use super::sensor::PositionSource;
use super::view::PeerView;
use crate::api::websocket::events::{ClientMessage, WsMessage};
use crate::error::RelayResult;
use crate::types::{DisplayName, PositionSample};

/// Reports positions to a relay and feeds its events into a [`PeerView`]
#[derive(Debug, Clone)]
pub struct RelayClient {
    url: String,
    name: DisplayName,
}

impl RelayClient {
    pub fn new(url: impl Into<String>, user_name: Option<&str>) -> Self {
        Self {
            url: url.into(),
            name: DisplayName::normalize(user_name),
        }
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Build the wire message for one sample
    pub fn location_message(&self, sample: &PositionSample) -> ClientMessage {
        ClientMessage::SendLocation {
            latitude: sample.coords.latitude,
            longitude: sample.coords.longitude,
            user_name: Some(self.name.as_str().to_string()),
        }
    }

    /// Run one session until the server closes the connection.
    ///
    /// Sensor errors are logged and skipped. If the source ends the client
    /// stops reporting but keeps following the map.
    pub async fn run<S, L>(&self, source: S, view: &mut PeerView<L>) -> RelayResult<()>
    where
        S: PositionSource,
        L: MarkerLayer,
    {
        let (ws, _) = connect_async(self.url.as_str()).await?;
        info!(url = %self.url, name = self.name.as_str(), "connected to relay");
        let (mut sink, mut stream) = ws.split();
        let mut source = pin!(source);
        let mut reporting = true;

        loop {
            tokio::select! {
                sample = source.next(), if reporting => {
                    match sample {
                        Some(Ok(sample)) => {
                            if let Err(err) = sample.coords.validate() {
                                warn!(%err, "discarding sensor reading");
                                continue;
                            }
                            view.show_self(sample.coords, &self.name);
                            let json = serde_json::to_string(&self.location_message(&sample))?;
                            sink.send(Message::text(json)).await?;
                        }
                        Some(Err(err)) => warn!(%err, "position sensor error"),
                        None => {
                            info!("position source ended, no longer reporting");
                            reporting = false;
                        }
                    }
                }

                frame = stream.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<WsMessage>(text.as_str()) {
                                Ok(msg) => view.apply_message(&msg),
                                Err(e) => warn!(error = %e, "unrecognized server message"),
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("relay closed the connection");
                            break;
                        }
                        Some(Ok(_)) => {} // Pings are answered by tungstenite
                        Some(Err(e)) => {
                            debug!(error = %e, "transport error");
                            return Err(e.into());
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_message_uses_normalized_name() {
        let client = RelayClient::new("ws://localhost/ws", Some("   "));
        let msg = client.location_message(&PositionSample::new(1.0, 2.0));

        assert_eq!(
            msg,
            ClientMessage::SendLocation {
                latitude: 1.0,
                longitude: 2.0,
                user_name: Some("Anonymous".into()),
            }
        );
    }
}
