//! Position source capability

use std::time::Duration;

use futures::{Stream, StreamExt};
use thiserror::Error;
use tokio_stream::wrappers::IntervalStream;

use crate::types::{Coordinates, PositionSample};

/// Failures a geolocation sensor may report for a single reading
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SensorError {
    #[error("permission to read the position was denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("timed out waiting for a position fix")]
    Timeout,
}

/// A lazy, non-restartable sequence of position readings.
///
/// Sources are expected to be infinite; a source that ends simply stops
/// reporting. A reading error does not end the source.
pub trait PositionSource: Stream<Item = Result<PositionSample, SensorError>> + Send {}

impl<S> PositionSource for S where S: Stream<Item = Result<PositionSample, SensorError>> + Send {}

/// Source that reports the same position on a fixed period, starting immediately
pub fn interval_source(coords: Coordinates, period: Duration) -> impl PositionSource {
    IntervalStream::new(tokio::time::interval(period)).map(move |_| {
        Ok(PositionSample {
            coords,
            accuracy: None,
        })
    })
}
