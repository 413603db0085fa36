//! aliquot-core — shared types, protocol validation, and deck configuration.
//!
//! Everything the planning and execution crates agree on lives here:
//!
//! - The protocol request document (`setup` + `buffers`) and the
//!   materialized per-buffer transfer lists
//! - The two-instrument model (volume ranges, safe capacities, the
//!   classification threshold)
//! - `deck.toml` parsing for labware kinds, slots, and mounts
//! - Well-address helpers shared by the simulator and the CSV converter

pub mod config;
pub mod error;
pub mod instrument;
pub mod protocol;
pub mod types;
pub mod wells;

pub use config::DeckConfig;
pub use error::{ProtocolError, ProtocolResult};
pub use instrument::{InstrumentClass, InstrumentSettings, InstrumentSpec, Mount};
pub use types::*;
