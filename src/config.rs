//! Environment-driven configuration

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{RelayError, RelayResult};

/// Load `.env` from the working directory or its parents, if there is one.
///
/// Variables already present in the environment are not overridden.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Load variables from a specific env file
pub fn load_env_file(path: &Path) -> RelayResult<()> {
    dotenvy::from_path(path).map_err(|e| RelayError::Config {
        key: ".env",
        reason: e.to_string(),
    })
}

/// Server settings
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Broadcast buffer per subscriber; slower clients are resynced with a snapshot
    pub broadcast_capacity: usize,
}

impl RelayConfig {
    pub const DEFAULT_PORT: u16 = 10000;
    pub const DEFAULT_BROADCAST_CAPACITY: usize = 1024;

    /// Read `PORT`, `RELAY_BIND_ADDR` and `RELAY_BROADCAST_CAPACITY`
    pub fn from_env() -> RelayResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RelayResult<Self> {
        let defaults = Self::default();
        let broadcast_capacity = parse_or(
            &lookup,
            "RELAY_BROADCAST_CAPACITY",
            defaults.broadcast_capacity,
        )?;
        if broadcast_capacity == 0 {
            return Err(RelayError::Config {
                key: "RELAY_BROADCAST_CAPACITY",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            bind_addr: parse_or(&lookup, "RELAY_BIND_ADDR", defaults.bind_addr)?,
            port: parse_or(&lookup, "PORT", defaults.port)?,
            broadcast_capacity,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: Self::DEFAULT_PORT,
            broadcast_capacity: Self::DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

/// Client settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub url: String,
    pub user_name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub report_interval: Duration,
}

impl ClientConfig {
    /// Read `RELAY_URL`, `RELAY_USER_NAME`, `RELAY_LATITUDE`, `RELAY_LONGITUDE`
    /// and `RELAY_REPORT_INTERVAL_MS`
    pub fn from_env() -> RelayResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RelayResult<Self> {
        let url = lookup("RELAY_URL")
            .unwrap_or_else(|| format!("ws://127.0.0.1:{}/ws", RelayConfig::DEFAULT_PORT));
        let interval_ms: u64 = parse_or(&lookup, "RELAY_REPORT_INTERVAL_MS", 1000)?;

        Ok(Self {
            url,
            user_name: lookup("RELAY_USER_NAME"),
            latitude: parse_or(&lookup, "RELAY_LATITUDE", 0.0)?,
            longitude: parse_or(&lookup, "RELAY_LONGITUDE", 0.0)?,
            report_interval: Duration::from_millis(interval_ms.max(1)),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> RelayResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|e: T::Err| {
            RelayError::Config {
                key,
                reason: e.to_string(),
            }
        }),
        _ => Ok(default),
    }
}
