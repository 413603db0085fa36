//! Batch packer — groups one buffer's transfers into aspirate/dispense
//! cycles.
//!
//! Deterministic greedy first-fit on the current batch: requests are
//! processed in their original order, each classified to an instrument, and
//! appended to that instrument's open batch; when an append would push the
//! open batch past the instrument's safe capacity, the batch is closed and a
//! fresh one opened. A request is never split across batches, and batches
//! never mix buffers (the packer only ever sees one buffer's requests).
//!
//! Implemented as an explicit fold threading a small accumulator through the
//! request sequence, so the packing state is a value, not captured mutable
//! locals.

use serde::{Deserialize, Serialize};
use tracing::warn;

use aliquot_core::{InstrumentClass, InstrumentSettings, TransferRequest};

/// One aspirate-then-multiple-dispense cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Batch {
    /// Total volume drawn in the single aspirate for this batch.
    pub aspirate_total: f64,
    /// Dispenses in request order.
    pub dispenses: Vec<TransferRequest>,
}

/// A buffer's batches, split by instrument class. Either list may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PackedBuffer {
    pub low: Vec<Batch>,
    pub high: Vec<Batch>,
}

impl PackedBuffer {
    pub fn batches(&self, class: InstrumentClass) -> &[Batch] {
        match class {
            InstrumentClass::LowRange => &self.low,
            InstrumentClass::HighRange => &self.high,
        }
    }

    pub fn batch_count(&self) -> usize {
        self.low.len() + self.high.len()
    }

    pub fn is_empty(&self) -> bool {
        self.low.is_empty() && self.high.is_empty()
    }
}

/// Packing accumulator for a single instrument class.
#[derive(Debug)]
struct ClassState {
    safe_capacity: f64,
    open: Batch,
    closed: Vec<Batch>,
}

impl ClassState {
    fn new(safe_capacity: f64) -> Self {
        Self {
            safe_capacity,
            open: Batch::default(),
            closed: Vec::new(),
        }
    }

    fn push(&mut self, request: &TransferRequest) {
        // Close the open batch when this request would overflow it. An
        // empty open batch is never closed: a request above safe capacity
        // (but within the rated maximum, or validation would have rejected
        // it) packs alone and the aspirate runs over the margin once.
        if !self.open.dispenses.is_empty()
            && self.open.aspirate_total + request.volume > self.safe_capacity
        {
            self.closed.push(std::mem::take(&mut self.open));
        }

        if self.open.dispenses.is_empty() && request.volume > self.safe_capacity {
            warn!(
                volume = request.volume,
                safe_capacity = self.safe_capacity,
                destination = %request.destination,
                "single request exceeds safe capacity, packing as its own batch"
            );
        }

        self.open.aspirate_total += request.volume;
        self.open.dispenses.push(request.clone());
    }

    fn finish(mut self) -> Vec<Batch> {
        if !self.open.dispenses.is_empty() {
            self.closed.push(self.open);
        }
        self.closed
    }
}

/// Full packing state: one accumulator per instrument class.
#[derive(Debug)]
struct PackState {
    low: ClassState,
    high: ClassState,
}

impl PackState {
    fn new(settings: &InstrumentSettings) -> Self {
        Self {
            low: ClassState::new(settings.low.safe_capacity),
            high: ClassState::new(settings.high.safe_capacity),
        }
    }

    fn push(mut self, settings: &InstrumentSettings, request: &TransferRequest) -> Self {
        match settings.classify(request.volume) {
            InstrumentClass::LowRange => self.low.push(request),
            InstrumentClass::HighRange => self.high.push(request),
        }
        self
    }
}

/// Pack one buffer's ordered requests into per-instrument batch lists.
///
/// Guarantees: every request lands in exactly one batch; concatenating the
/// dispense lists in batch order reproduces the input sequence per class; no
/// batch exceeds its class's safe capacity unless a single request alone
/// does; re-packing the same sequence yields an identical partition.
pub fn pack(requests: &[TransferRequest], settings: &InstrumentSettings) -> PackedBuffer {
    let state = requests
        .iter()
        .fold(PackState::new(settings), |state, request| {
            state.push(settings, request)
        });

    PackedBuffer {
        low: state.low.finish(),
        high: state.high.finish(),
    }
}
