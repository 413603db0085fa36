//! Simulated liquid-handling backend.
//!
//! `SimHandler` records every call in an ordered operation log and enforces
//! the physical rules a real robot would: tips must be picked up before
//! pipetting and dropped before the next pick-up, an instrument cannot
//! dispense more than it holds, well addresses must exist on the target
//! labware, and deck slots and mounts cannot be double-booked.

use tracing::debug;

use aliquot_core::{Mount, wells};

use crate::error::{BackendError, BackendResult};
use crate::{InstrumentId, LabwareId, LiquidHandler};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Home,
    LoadLabware {
        kind: String,
        slot: u8,
    },
    LoadInstrument {
        kind: String,
        mount: Mount,
    },
    PickUpTip {
        instrument: String,
    },
    DropTip {
        instrument: String,
    },
    Aspirate {
        instrument: String,
        volume: f64,
        labware: String,
        well: String,
    },
    Dispense {
        instrument: String,
        volume: f64,
        labware: String,
        well: String,
    },
}

#[derive(Debug)]
struct SimLabware {
    kind: String,
    slot: u8,
    grid: (usize, usize),
}

#[derive(Debug)]
struct SimInstrument {
    kind: String,
    mount: Mount,
    has_tip: bool,
    held_volume: f64,
}

/// Simulate-mode backend: validates the call sequence and records it.
#[derive(Debug, Default)]
pub struct SimHandler {
    labware: Vec<SimLabware>,
    instruments: Vec<SimInstrument>,
    ops: Vec<Operation>,
}

/// Tolerance for floating-point liquid accounting.
const VOLUME_EPSILON: f64 = 1e-9;

impl SimHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded operations, in call order.
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<Operation> {
        self.ops
    }

    fn labware(&self, id: LabwareId) -> BackendResult<&SimLabware> {
        self.labware.get(id.0).ok_or(BackendError::UnknownLabware)
    }

    fn instrument_mut(&mut self, id: InstrumentId) -> BackendResult<&mut SimInstrument> {
        self.instruments
            .get_mut(id.0)
            .ok_or(BackendError::UnknownInstrument)
    }

    fn check_well(&self, labware: LabwareId, well: &str) -> BackendResult<String> {
        let labware = self.labware(labware)?;
        if !wells::within_grid(well, labware.grid) {
            return Err(BackendError::UnknownWell {
                well: well.to_string(),
                labware: labware.kind.clone(),
            });
        }
        Ok(labware.kind.clone())
    }
}

impl LiquidHandler for SimHandler {
    fn home(&mut self) -> BackendResult<()> {
        self.ops.push(Operation::Home);
        Ok(())
    }

    fn load_labware(&mut self, kind: &str, slot: u8) -> BackendResult<LabwareId> {
        if let Some(occupant) = self.labware.iter().find(|l| l.slot == slot) {
            return Err(BackendError::SlotOccupied {
                slot,
                occupant: occupant.kind.clone(),
            });
        }

        let id = LabwareId(self.labware.len());
        self.labware.push(SimLabware {
            kind: kind.to_string(),
            slot,
            grid: wells::grid_for_kind(kind),
        });
        self.ops.push(Operation::LoadLabware {
            kind: kind.to_string(),
            slot,
        });
        debug!(kind, slot, "labware loaded");
        Ok(id)
    }

    fn load_instrument(
        &mut self,
        kind: &str,
        mount: Mount,
        _tip_racks: &[LabwareId],
    ) -> BackendResult<InstrumentId> {
        if let Some(occupant) = self.instruments.iter().find(|i| i.mount == mount) {
            return Err(BackendError::MountOccupied {
                mount: mount.label().to_string(),
                occupant: occupant.kind.clone(),
            });
        }

        let id = InstrumentId(self.instruments.len());
        self.instruments.push(SimInstrument {
            kind: kind.to_string(),
            mount,
            has_tip: false,
            held_volume: 0.0,
        });
        self.ops.push(Operation::LoadInstrument {
            kind: kind.to_string(),
            mount,
        });
        debug!(kind, mount = mount.label(), "instrument loaded");
        Ok(id)
    }

    fn pick_up_tip(&mut self, instrument: InstrumentId) -> BackendResult<()> {
        let inst = self.instrument_mut(instrument)?;
        if inst.has_tip {
            return Err(BackendError::TipAlreadyHeld {
                instrument: inst.kind.clone(),
            });
        }
        inst.has_tip = true;
        let kind = inst.kind.clone();
        self.ops.push(Operation::PickUpTip { instrument: kind });
        Ok(())
    }

    fn drop_tip(&mut self, instrument: InstrumentId) -> BackendResult<()> {
        let inst = self.instrument_mut(instrument)?;
        if !inst.has_tip {
            return Err(BackendError::NoTip {
                instrument: inst.kind.clone(),
            });
        }
        if inst.held_volume > VOLUME_EPSILON {
            debug!(
                instrument = %inst.kind,
                residual = inst.held_volume,
                "tip dropped with residual liquid"
            );
        }
        inst.has_tip = false;
        inst.held_volume = 0.0;
        let kind = inst.kind.clone();
        self.ops.push(Operation::DropTip { instrument: kind });
        Ok(())
    }

    fn aspirate(
        &mut self,
        instrument: InstrumentId,
        volume: f64,
        labware: LabwareId,
        well: &str,
    ) -> BackendResult<()> {
        let labware_kind = self.check_well(labware, well)?;
        let inst = self.instrument_mut(instrument)?;
        if !inst.has_tip {
            return Err(BackendError::NoTip {
                instrument: inst.kind.clone(),
            });
        }
        inst.held_volume += volume;
        let kind = inst.kind.clone();
        self.ops.push(Operation::Aspirate {
            instrument: kind,
            volume,
            labware: labware_kind,
            well: well.to_string(),
        });
        Ok(())
    }

    fn dispense(
        &mut self,
        instrument: InstrumentId,
        volume: f64,
        labware: LabwareId,
        well: &str,
    ) -> BackendResult<()> {
        let labware_kind = self.check_well(labware, well)?;
        let inst = self.instrument_mut(instrument)?;
        if !inst.has_tip {
            return Err(BackendError::NoTip {
                instrument: inst.kind.clone(),
            });
        }
        if volume > inst.held_volume + VOLUME_EPSILON {
            return Err(BackendError::InsufficientLiquid {
                instrument: inst.kind.clone(),
                held: inst.held_volume,
                requested: volume,
            });
        }
        inst.held_volume -= volume;
        let kind = inst.kind.clone();
        self.ops.push(Operation::Dispense {
            instrument: kind,
            volume,
            labware: labware_kind,
            well: well.to_string(),
        });
        Ok(())
    }
}
