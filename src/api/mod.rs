//! API module for HTTP and WebSocket endpoints
//!
//! This module provides the WebSocket relay and a small read-only REST surface.

pub mod http;
pub mod websocket;

pub use http::{create_router, serve};
