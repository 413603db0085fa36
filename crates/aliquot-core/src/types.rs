//! Domain types shared across aliquot crates.
//!
//! The serde-facing protocol document (`ProtocolRequest`) mirrors the wire
//! shape accepted by the robot service: a `setup` list binding buffer names
//! to source wells, and a `buffers` list contributing one transfer per named
//! volume. `Buffer` is the materialized form the planner works with.

use serde::{Deserialize, Serialize};

/// Well identifier within a labware, e.g. `"A1"` or `"H12"`.
pub type WellAddress = String;

// ── Protocol request document ─────────────────────────────────────

/// Binds a buffer name to its source well on the input rack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BufferSetup {
    /// Source well address on the input rack.
    pub address: WellAddress,
    /// Unique buffer name.
    pub name: String,
}

/// One named volume requested into a destination tube.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BufferVolume {
    /// Name of the buffer to draw from (must appear in `setup`).
    pub name: String,
    /// Volume to transfer, in microliters.
    pub volume: f64,
}

/// One destination well and the buffer volumes it receives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BufferTube {
    /// Destination well address on the output plate.
    pub address: WellAddress,
    pub buffer_volumes: Vec<BufferVolume>,
}

/// The full transfer request set for one protocol run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProtocolRequest {
    pub setup: Vec<BufferSetup>,
    pub buffers: Vec<BufferTube>,
}

// ── Materialized transfer lists ───────────────────────────────────

/// A single volume to deliver from a buffer's source well.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferRequest {
    /// Volume in microliters.
    pub volume: f64,
    /// Destination well address on the output plate.
    pub destination: WellAddress,
}

/// A named reagent with one source well and its ordered transfer requests.
///
/// Built by [`ProtocolRequest::materialize`](crate::protocol); buffer order
/// follows the order names were established in `setup`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Buffer {
    pub name: String,
    /// Source well address on the input rack.
    pub source: WellAddress,
    pub requests: Vec<TransferRequest>,
}

impl Buffer {
    /// Sum of all requested volumes.
    pub fn total_volume(&self) -> f64 {
        self.requests.iter().map(|r| r.volume).sum()
    }

    /// Arithmetic mean of the requested volumes, or `None` if there are no
    /// requests (so callers can never divide by zero).
    pub fn mean_volume(&self) -> Option<f64> {
        if self.requests.is_empty() {
            return None;
        }
        Some(self.total_volume() / self.requests.len() as f64)
    }
}
