//! Protocol validation error types.

use thiserror::Error;

/// Result type alias for protocol materialization and validation.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Configuration errors detected before any physical operation begins.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("volume references unknown buffer '{name}' (no setup entry)")]
    UnknownBuffer { name: String },

    #[error("duplicate setup entry for buffer '{name}'")]
    DuplicateBuffer { name: String },

    #[error("buffer '{name}' has no transfer requests")]
    EmptyBuffer { name: String },

    #[error("invalid volume {volume} for buffer '{name}' at {destination}: must be positive and finite")]
    NonPositiveVolume {
        name: String,
        destination: String,
        volume: f64,
    },

    #[error(
        "volume {volume} for buffer '{name}' at {destination} exceeds the {instrument} maximum of {max_volume}"
    )]
    VolumeExceedsMaximum {
        name: String,
        destination: String,
        volume: f64,
        instrument: String,
        max_volume: f64,
    },
}
