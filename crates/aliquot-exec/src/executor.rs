//! Transfer executor — drives a run plan against the backend.
//!
//! Per scheduled buffer, per instrument class with at least one batch:
//! pick up one tip, then for each batch aspirate the batch total from the
//! buffer's source well and dispense to each destination in request order,
//! then drop the tip. The two classes of a buffer are independent tip
//! lifecycles; high-range batches run first. The state machine per (buffer,
//! class) pair is `no-tip → tip-held (aspirate → dispense*)* → tip-released`.

use tracing::{debug, info};

use aliquot_backend::{InstrumentId, LabwareId, LiquidHandler};
use aliquot_core::{DeckConfig, InstrumentClass};
use aliquot_plan::{PlanEntry, RunPlan};

use crate::error::{ExecError, ExecResult};

/// Handles to everything loaded during deck setup.
#[derive(Debug, Clone, Copy)]
pub struct Deck {
    pub source: LabwareId,
    pub destination: LabwareId,
    pub low: InstrumentId,
    pub high: InstrumentId,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunReport {
    pub buffers: usize,
    pub batches: usize,
    pub tips_used: usize,
    pub volume_moved: f64,
}

/// Replays run plans against a [`LiquidHandler`].
///
/// Holds the backend by `&mut` for its whole lifetime, so exactly one run
/// can own the hardware at a time.
pub struct TransferExecutor<'a, H: LiquidHandler> {
    handler: &'a mut H,
    deck: Deck,
}

impl<'a, H: LiquidHandler> TransferExecutor<'a, H> {
    /// Home the gantry and load labware and instruments per the deck config.
    pub fn setup(handler: &'a mut H, config: &DeckConfig) -> ExecResult<Self> {
        handler.home().map_err(ExecError::Backend)?;

        let destination = handler
            .load_labware(&config.destination.kind, config.destination.slot)
            .map_err(ExecError::Backend)?;
        let source = handler
            .load_labware(&config.source.kind, config.source.slot)
            .map_err(ExecError::Backend)?;

        let low_rack = &config.instruments.low.tip_rack;
        let high_rack = &config.instruments.high.tip_rack;
        let low_tips = handler
            .load_labware(&low_rack.kind, low_rack.slot)
            .map_err(ExecError::Backend)?;
        let high_tips = handler
            .load_labware(&high_rack.kind, high_rack.slot)
            .map_err(ExecError::Backend)?;

        let low = handler
            .load_instrument(
                &config.instruments.low.kind,
                config.instruments.low.mount,
                &[low_tips],
            )
            .map_err(ExecError::Backend)?;
        let high = handler
            .load_instrument(
                &config.instruments.high.kind,
                config.instruments.high.mount,
                &[high_tips],
            )
            .map_err(ExecError::Backend)?;

        info!("deck loaded");
        Ok(Self {
            handler,
            deck: Deck {
                source,
                destination,
                low,
                high,
            },
        })
    }

    /// Replay the plan, buffer by buffer, then home.
    ///
    /// Aborts on the first backend error; the remaining schedule is not
    /// attempted.
    pub fn run(&mut self, plan: &RunPlan) -> ExecResult<RunReport> {
        let mut report = RunReport::default();

        for entry in &plan.entries {
            self.run_buffer(entry, &mut report)?;
            report.buffers += 1;
        }

        self.handler.home().map_err(ExecError::Backend)?;
        info!(
            buffers = report.buffers,
            batches = report.batches,
            tips = report.tips_used,
            volume = report.volume_moved,
            "run complete"
        );
        Ok(report)
    }

    fn run_buffer(&mut self, entry: &PlanEntry, report: &mut RunReport) -> ExecResult<()> {
        // High-range batches first, matching the physical protocol: large
        // transfers lay down the bulk volumes before small ones top up.
        for class in [InstrumentClass::HighRange, InstrumentClass::LowRange] {
            let batches = entry.packed.batches(class);
            if batches.is_empty() {
                continue;
            }

            let buffer = &entry.buffer;
            let instrument = match class {
                InstrumentClass::LowRange => self.deck.low,
                InstrumentClass::HighRange => self.deck.high,
            };

            self.handler
                .pick_up_tip(instrument)
                .map_err(|e| ExecError::transfer(&buffer.name, class, e))?;
            report.tips_used += 1;

            for batch in batches {
                self.handler
                    .aspirate(
                        instrument,
                        batch.aspirate_total,
                        self.deck.source,
                        &buffer.source,
                    )
                    .map_err(|e| ExecError::transfer(&buffer.name, class, e))?;

                for dispense in &batch.dispenses {
                    self.handler
                        .dispense(
                            instrument,
                            dispense.volume,
                            self.deck.destination,
                            &dispense.destination,
                        )
                        .map_err(|e| ExecError::transfer(&buffer.name, class, e))?;
                }

                report.batches += 1;
                report.volume_moved += batch.aspirate_total;
                debug!(
                    buffer = %buffer.name,
                    class = %class,
                    aspirate = batch.aspirate_total,
                    dispenses = batch.dispenses.len(),
                    "batch replayed"
                );
            }

            self.handler
                .drop_tip(instrument)
                .map_err(|e| ExecError::transfer(&buffer.name, class, e))?;

            info!(
                buffer = %buffer.name,
                class = %class,
                batches = batches.len(),
                "buffer batches complete"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aliquot_backend::{Operation, SimHandler};
    use aliquot_core::{Buffer, InstrumentSettings, TransferRequest};
    use aliquot_plan::schedule;

    fn request(volume: f64, destination: &str) -> TransferRequest {
        TransferRequest {
            volume,
            destination: destination.to_string(),
        }
    }

    fn plan_for(buffers: Vec<Buffer>) -> aliquot_plan::RunPlan {
        schedule(buffers, &InstrumentSettings::default())
    }

    #[test]
    fn setup_loads_deck_and_instruments() {
        let mut sim = SimHandler::new();
        TransferExecutor::setup(&mut sim, &DeckConfig::default()).unwrap();

        let loads: Vec<_> = sim
            .ops()
            .iter()
            .filter(|op| matches!(op, Operation::LoadLabware { .. }))
            .collect();
        assert_eq!(loads.len(), 4); // plate, rack, two tip racks

        let instruments: Vec<_> = sim
            .ops()
            .iter()
            .filter(|op| matches!(op, Operation::LoadInstrument { .. }))
            .collect();
        assert_eq!(instruments.len(), 2);
        assert!(matches!(sim.ops()[0], Operation::Home));
    }

    #[test]
    fn one_tip_per_buffer_and_class() {
        let mut sim = SimHandler::new();
        let plan = plan_for(vec![Buffer {
            name: "hepes".to_string(),
            source: "A1".to_string(),
            requests: vec![request(5.0, "A1"), request(25.0, "A2"), request(10.0, "A3")],
        }]);

        let mut executor = TransferExecutor::setup(&mut sim, &DeckConfig::default()).unwrap();
        let report = executor.run(&plan).unwrap();

        assert_eq!(report.tips_used, 2); // one per class
        assert_eq!(report.batches, 2);
        assert_eq!(report.volume_moved, 40.0);

        let picks = sim
            .ops()
            .iter()
            .filter(|op| matches!(op, Operation::PickUpTip { .. }))
            .count();
        let drops = sim
            .ops()
            .iter()
            .filter(|op| matches!(op, Operation::DropTip { .. }))
            .count();
        assert_eq!(picks, 2);
        assert_eq!(drops, 2);
    }

    #[test]
    fn high_range_batches_run_before_low_range() {
        let mut sim = SimHandler::new();
        let plan = plan_for(vec![Buffer {
            name: "hepes".to_string(),
            source: "A1".to_string(),
            requests: vec![request(5.0, "A1"), request(25.0, "A2")],
        }]);

        let mut executor = TransferExecutor::setup(&mut sim, &DeckConfig::default()).unwrap();
        executor.run(&plan).unwrap();

        let aspirates: Vec<f64> = sim
            .ops()
            .iter()
            .filter_map(|op| match op {
                Operation::Aspirate { volume, .. } => Some(*volume),
                _ => None,
            })
            .collect();
        assert_eq!(aspirates, vec![25.0, 5.0]);
    }

    #[test]
    fn tip_is_held_across_batches_of_one_class() {
        // Three 10 µl requests become three low-range batches, but only one
        // tip lifecycle.
        let mut sim = SimHandler::new();
        let plan = plan_for(vec![Buffer {
            name: "nacl".to_string(),
            source: "B1".to_string(),
            requests: vec![request(10.0, "A1"), request(10.0, "A2"), request(10.0, "A3")],
        }]);

        let mut executor = TransferExecutor::setup(&mut sim, &DeckConfig::default()).unwrap();
        let report = executor.run(&plan).unwrap();

        assert_eq!(report.batches, 3);
        assert_eq!(report.tips_used, 1);
    }

    #[test]
    fn backend_error_aborts_the_run() {
        let mut sim = SimHandler::new();
        // Source well Z9 does not exist on the 4x6 tuberack.
        let plan = plan_for(vec![
            Buffer {
                name: "bad".to_string(),
                source: "Z9".to_string(),
                requests: vec![request(50.0, "A1")],
            },
            Buffer {
                name: "never-run".to_string(),
                source: "A1".to_string(),
                requests: vec![request(5.0, "A2")],
            },
        ]);

        let mut executor = TransferExecutor::setup(&mut sim, &DeckConfig::default()).unwrap();
        let err = executor.run(&plan).unwrap_err();

        match err {
            ExecError::Transfer { buffer, class, .. } => {
                assert_eq!(buffer, "bad");
                assert_eq!(class, InstrumentClass::HighRange);
            }
            other => panic!("unexpected error: {other}"),
        }

        // The second buffer was never touched.
        let dispensed = sim
            .ops()
            .iter()
            .any(|op| matches!(op, Operation::Dispense { well, .. } if well == "A2"));
        assert!(!dispensed);
    }

    #[test]
    fn empty_plan_homes_and_reports_zero() {
        let mut sim = SimHandler::new();
        let plan = plan_for(vec![]);

        let mut executor = TransferExecutor::setup(&mut sim, &DeckConfig::default()).unwrap();
        let report = executor.run(&plan).unwrap();

        assert_eq!(report, RunReport::default());
        assert!(matches!(sim.ops().last(), Some(Operation::Home)));
    }
}
