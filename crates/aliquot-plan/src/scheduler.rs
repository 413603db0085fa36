//! Buffer scheduler — decides execution order and assembles the run plan.
//!
//! The buffer with the largest mean per-destination volume runs first; the
//! rest follow in their original setup order. Running the largest-average
//! buffer first consumes high-range capacity before small transfers
//! fragment tip usage. A heuristic, not an optimality guarantee.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use aliquot_core::{Buffer, InstrumentSettings};

use crate::packer::{PackedBuffer, pack};

/// One buffer scheduled for execution, with its packed batches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanEntry {
    pub buffer: Buffer,
    pub packed: PackedBuffer,
}

/// The full execution plan for a protocol run, in execution order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunPlan {
    pub entries: Vec<PlanEntry>,
}

impl RunPlan {
    pub fn batch_count(&self) -> usize {
        self.entries.iter().map(|e| e.packed.batch_count()).sum()
    }

    pub fn total_volume(&self) -> f64 {
        self.entries.iter().map(|e| e.buffer.total_volume()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute the execution order over `buffers` as indices.
///
/// The strictly largest mean wins; on ties the first-encountered buffer
/// keeps the lead (strict `>` comparison). Remaining buffers keep their
/// original order. Buffers with no requests never lead and are kept in
/// place, so the mean comparison cannot divide by zero.
pub fn execution_order(buffers: &[Buffer]) -> Vec<usize> {
    let mut leader: Option<usize> = None;
    let mut largest_mean = 0.0;

    for (idx, buffer) in buffers.iter().enumerate() {
        let Some(mean) = buffer.mean_volume() else {
            continue;
        };
        if mean > largest_mean {
            largest_mean = mean;
            leader = Some(idx);
        }
    }

    match leader {
        Some(lead) => std::iter::once(lead)
            .chain((0..buffers.len()).filter(|&idx| idx != lead))
            .collect(),
        None => (0..buffers.len()).collect(),
    }
}

/// Order the buffers and pack each one into a run plan.
pub fn schedule(buffers: Vec<Buffer>, settings: &InstrumentSettings) -> RunPlan {
    let order = execution_order(&buffers);

    let mut by_index: Vec<Option<Buffer>> = buffers.into_iter().map(Some).collect();
    let mut entries = Vec::with_capacity(order.len());

    for idx in order {
        // Order indices are unique, so every take yields a buffer.
        let Some(buffer) = by_index[idx].take() else {
            continue;
        };
        let packed = pack(&buffer.requests, settings);
        debug!(
            buffer = %buffer.name,
            requests = buffer.requests.len(),
            low_batches = packed.low.len(),
            high_batches = packed.high.len(),
            "packed buffer"
        );
        entries.push(PlanEntry { buffer, packed });
    }

    let plan = RunPlan { entries };
    info!(
        buffers = plan.entries.len(),
        batches = plan.batch_count(),
        total_volume = plan.total_volume(),
        "run plan assembled"
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use aliquot_core::TransferRequest;

    fn buffer(name: &str, source: &str, volumes: &[f64]) -> Buffer {
        Buffer {
            name: name.to_string(),
            source: source.to_string(),
            requests: volumes
                .iter()
                .enumerate()
                .map(|(i, &volume)| TransferRequest {
                    volume,
                    destination: format!("d{i}"),
                })
                .collect(),
        }
    }

    #[test]
    fn largest_mean_runs_first() {
        // Setup order [B, A]: A's mean (15) beats B's (5), so A leads.
        let buffers = vec![buffer("B", "A1", &[5.0]), buffer("A", "B1", &[15.0])];

        let plan = schedule(buffers, &InstrumentSettings::default());

        let names: Vec<_> = plan.entries.iter().map(|e| e.buffer.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn remaining_buffers_keep_setup_order() {
        let buffers = vec![
            buffer("a", "A1", &[2.0]),
            buffer("b", "B1", &[9.0]),
            buffer("lead", "C1", &[200.0]),
            buffer("c", "D1", &[4.0]),
        ];

        let plan = schedule(buffers, &InstrumentSettings::default());

        let names: Vec<_> = plan.entries.iter().map(|e| e.buffer.name.as_str()).collect();
        assert_eq!(names, vec!["lead", "a", "b", "c"]);
    }

    #[test]
    fn tie_goes_to_first_encountered() {
        let buffers = vec![
            buffer("first", "A1", &[10.0, 20.0]),
            buffer("second", "B1", &[15.0, 15.0]), // same mean of 15
        ];

        let order = execution_order(&buffers);
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn leader_mean_dominates_all_others() {
        let buffers = vec![
            buffer("x", "A1", &[3.0, 7.0]),
            buffer("y", "B1", &[90.0]),
            buffer("z", "C1", &[30.0, 40.0]),
        ];

        let order = execution_order(&buffers);
        let leader_mean = buffers[order[0]].mean_volume().unwrap();
        for &idx in &order[1..] {
            assert!(leader_mean >= buffers[idx].mean_volume().unwrap());
        }
    }

    #[test]
    fn empty_buffer_never_leads() {
        let buffers = vec![
            Buffer {
                name: "empty".to_string(),
                source: "A1".to_string(),
                requests: vec![],
            },
            buffer("full", "B1", &[1.0]),
        ];

        let order = execution_order(&buffers);
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn single_buffer_plan() {
        let plan = schedule(
            vec![buffer("only", "A1", &[5.0, 25.0])],
            &InstrumentSettings::default(),
        );

        assert_eq!(plan.entries.len(), 1);
        assert_eq!(plan.batch_count(), 2); // one low batch, one high batch
        assert_eq!(plan.total_volume(), 30.0);
    }

    #[test]
    fn scheduling_is_deterministic() {
        let make = || {
            vec![
                buffer("a", "A1", &[6.0, 12.0]),
                buffer("b", "B1", &[40.0, 40.0, 7.0]),
                buffer("c", "C1", &[18.0]),
            ]
        };

        let first = schedule(make(), &InstrumentSettings::default());
        let second = schedule(make(), &InstrumentSettings::default());
        assert_eq!(first, second);
    }
}
