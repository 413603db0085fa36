//! Error types for liquid-handling backends.

use thiserror::Error;

/// Result type alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors reported by a liquid-handling backend.
///
/// None of these are recoverable by the caller: once a run has failed
/// mid-sequence, robot and liquid state no longer match the request set.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("deck slot {slot} is already occupied by '{occupant}'")]
    SlotOccupied { slot: u8, occupant: String },

    #[error("mount {mount} already carries '{occupant}'")]
    MountOccupied { mount: String, occupant: String },

    #[error("unknown labware handle")]
    UnknownLabware,

    #[error("unknown instrument handle")]
    UnknownInstrument,

    #[error("well '{well}' does not exist on '{labware}'")]
    UnknownWell { well: String, labware: String },

    #[error("instrument '{instrument}' has no tip attached")]
    NoTip { instrument: String },

    #[error("instrument '{instrument}' already holds a tip")]
    TipAlreadyHeld { instrument: String },

    #[error(
        "instrument '{instrument}' holds {held} but was asked to dispense {requested}"
    )]
    InsufficientLiquid {
        instrument: String,
        held: f64,
        requested: f64,
    },

    #[error("backend failure: {0}")]
    Device(String),
}
