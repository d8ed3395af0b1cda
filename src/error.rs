//! Error type for widget, readout and generator configuration.
//!
//! Only configuration is fallible. Placement failures are reported as `bool`
//! by the containers, out-of-range readings are clamped, and faults inside
//! background loops stay inside the loop.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while configuring widgets, readouts, generators or processors.
#[derive(Debug, Error)]
pub enum Error {
    /// A repeat or polling interval of zero.
    #[error("interval must be greater than zero, got {0:?}")]
    InvalidInterval(Duration),

    /// A value range whose minimum is not strictly below its maximum.
    #[error("invalid range: min {min} must be below max {max}")]
    InvalidRange { min: f64, max: f64 },

    /// A minimap view radius below zero.
    #[error("view radius must not be negative, got {0}")]
    NegativeRadius(f64),

    /// A location with a position but no bearing, or the other way around.
    #[error("location position and bearing must both be present or both absent")]
    MismatchedLocation,

    /// A button grid without any rows or columns.
    #[error("button grid needs at least one row and one column, got {rows}x{cols}")]
    InvalidGrid { rows: usize, cols: usize },

    /// Image pixel data that does not match its dimensions.
    #[error("image needs {expected} pixels, got {actual}")]
    ImageSize { expected: usize, actual: usize },

    /// An image whose pixel count overflows `u32`.
    #[error("image of {width}x{height} pixels is too large")]
    ImageTooLarge { width: u32, height: u32 },

    /// The background worker thread could not be started.
    #[error("failed to spawn worker thread")]
    Spawn(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Reject a zero interval.
pub(crate) fn check_interval(interval: Duration) -> Result<Duration> {
    if interval.is_zero() { Err(Error::InvalidInterval(interval)) } else { Ok(interval) }
}

/// Reject a range that is empty, inverted or not finite.
pub(crate) fn check_range(min: f64, max: f64) -> Result<()> {
    if min.is_finite() && max.is_finite() && min < max { Ok(()) } else { Err(Error::InvalidRange { min, max }) }
}
