//! aliquot-plan — batch packing and buffer scheduling.
//!
//! This crate is the algorithmic core of aliquot. It decides, for each
//! buffer, how to group many small destination transfers into the fewest
//! aspirate/dispense cycles that respect the instruments' safe capacities,
//! and in which order buffers execute. It does NOT touch hardware (that's
//! `aliquot-exec`); everything here is pure, synchronous, and deterministic:
//! the same request set always yields the same plan.
//!
//! # Components
//!
//! - **`packer`** — greedy first-fit batching per instrument class
//! - **`scheduler`** — largest-mean-first buffer ordering and plan assembly

pub mod packer;
pub mod scheduler;

pub use packer::{Batch, PackedBuffer, pack};
pub use scheduler::{PlanEntry, RunPlan, execution_order, schedule};
