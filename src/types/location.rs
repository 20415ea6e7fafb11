//! Location types

use serde::{Deserialize, Serialize};

use super::ConnectionId;
use crate::error::{RelayError, RelayResult};

/// Name shown for clients that never chose one
pub const ANONYMOUS: &str = "Anonymous";

/// A geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Reject non-finite values and positions outside the WGS84 ranges
    pub fn validate(&self) -> RelayResult<()> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(RelayError::InvalidCoordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// One reading from a geolocation sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub coords: Coordinates,
    /// Accuracy radius in meters, when the sensor reports one
    pub accuracy: Option<f64>,
}

impl PositionSample {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coords: Coordinates::new(latitude, longitude),
            accuracy: None,
        }
    }
}

/// A user's display name after normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// Trim the raw name; blank or missing names become "Anonymous"
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(name) if !name.is_empty() => Self(name.to_string()),
            _ => Self(ANONYMOUS.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Last known position of a connected peer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerLocation {
    pub id: ConnectionId,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "userName", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl PeerLocation {
    pub fn new(id: ConnectionId, coords: Coordinates, user_name: Option<String>) -> Self {
        Self {
            id,
            latitude: coords.latitude,
            longitude: coords.longitude,
            user_name,
        }
    }

    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Marker label: the user name, or "User: <id>" when there is none
    pub fn label(&self) -> String {
        match self.user_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("User: {}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_bounds() {
        assert!(Coordinates::new(90.0, 180.0).validate().is_ok());
        assert!(Coordinates::new(-90.0, -180.0).validate().is_ok());
        assert!(Coordinates::new(51.5, -0.12).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_and_nan() {
        assert!(Coordinates::new(90.5, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, -180.1).validate().is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_display_name_normalization() {
        assert_eq!(DisplayName::normalize(Some("  Ada ")).as_str(), "Ada");
        assert_eq!(DisplayName::normalize(Some("   ")).as_str(), ANONYMOUS);
        assert_eq!(DisplayName::normalize(None).as_str(), ANONYMOUS);
    }

    #[test]
    fn test_label_falls_back_to_id() {
        let id = ConnectionId::from("c1");
        let named = PeerLocation::new(id.clone(), Coordinates::new(1.0, 2.0), Some("Ada".into()));
        assert_eq!(named.label(), "Ada");

        let unnamed = PeerLocation::new(id.clone(), Coordinates::new(1.0, 2.0), None);
        assert_eq!(unnamed.label(), "User: c1");

        let blank = PeerLocation::new(id, Coordinates::new(1.0, 2.0), Some(String::new()));
        assert_eq!(blank.label(), "User: c1");
    }

    #[test]
    fn test_peer_location_wire_names() {
        let peer = PeerLocation::new("c1".into(), Coordinates::new(1.0, 2.0), Some("Ada".into()));
        let json = serde_json::to_value(&peer).unwrap();
        assert_eq!(json["userName"], "Ada");
        assert_eq!(json["id"], "c1");

        let parsed: PeerLocation =
            serde_json::from_str(r#"{"id":"c2","latitude":3.0,"longitude":4.0}"#).unwrap();
        assert_eq!(parsed.user_name, None);
    }
}
