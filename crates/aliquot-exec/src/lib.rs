//! aliquot-exec — replays a run plan against a liquid-handling backend.
//!
//! The executor owns the boundary between the pure planning core and the
//! robot: it loads the deck described by `DeckConfig`, then walks the
//! `RunPlan` buffer by buffer, driving one tip lifecycle per (buffer,
//! instrument class) pair. Any backend error aborts the run immediately;
//! there is no retry and no rollback, because liquid movement is not
//! reversible.

pub mod error;
pub mod executor;

pub use error::{ExecError, ExecResult};
pub use executor::{Deck, RunReport, TransferExecutor};
