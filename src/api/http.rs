//! HTTP server setup with Axum

use std::future::Future;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::websocket::{handler::ws_handler, state::AppState};
use crate::error::RelayResult;
use crate::types::PeerLocation;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // Any page may embed the map
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket endpoint
        .route("/ws", get(ws_handler))
        // Health check
        .route("/health", get(health_check))
        .route("/api/presence", get(get_presence))
        .layer(cors)
        .with_state(state)
}

/// Serve the relay on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> RelayResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "location relay listening");
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize)]
pub struct PresenceResponse {
    /// Live connections, including those that have not reported yet
    pub count: usize,
    pub peers: Vec<PeerLocation>,
    #[serde(rename = "sequenceId")]
    pub sequence_id: u64,
}

/// Current presence view
async fn get_presence(State(state): State<Arc<AppState>>) -> Json<PresenceResponse> {
    Json(PresenceResponse {
        count: state.presence.len(),
        peers: state.presence.snapshot(None),
        sequence_id: state.current_sequence_id(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinates;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_health_check() {
        let state = Arc::new(AppState::default());
        let app = create_router(state);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_presence_lists_reporting_peers() {
        let state = Arc::new(AppState::default());
        let reporting = state.presence.connect();
        let _silent = state.presence.connect();
        state
            .presence
            .update_location(&reporting, Coordinates::new(1.5, 2.5), Some("Ada".into()));
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/presence")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["peers"].as_array().unwrap().len(), 1);
        assert_eq!(json["peers"][0]["userName"], "Ada");
    }

    #[tokio::test]
    async fn test_ws_requires_upgrade() {
        let app = create_router(Arc::new(AppState::default()));

        let response = app
            .oneshot(Request::builder().uri("/ws").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
