//! Error types shared by the server and client halves of the relay

use thiserror::Error;

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("invalid message: {0}")]
    InvalidMessage(#[from] serde_json::Error),

    #[error("invalid configuration for {key}: {reason}")]
    Config { key: &'static str, reason: String },

    #[error("transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelayError {
    /// Short machine-readable code sent to clients in `error` events
    pub fn code(&self) -> &'static str {
        match self {
            RelayError::InvalidCoordinates { .. } => "invalid_coordinates",
            RelayError::InvalidMessage(_) => "invalid_message",
            RelayError::Config { .. } => "config",
            RelayError::Transport(_) => "transport",
            RelayError::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = RelayError::InvalidCoordinates {
            latitude: 91.0,
            longitude: 0.0,
        };
        assert_eq!(err.code(), "invalid_coordinates");
        assert!(err.to_string().contains("91"));

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(RelayError::from(parse).code(), "invalid_message");
    }
}
