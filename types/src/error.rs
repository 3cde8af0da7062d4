//! Validation errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KerbError {
    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("coordinates out of range: ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("unknown facility type: {0}")]
    UnknownFacilityType(String),
}
