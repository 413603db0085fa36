//! aliquot-backend — the liquid-handling backend seam.
//!
//! The executor drives hardware exclusively through the [`LiquidHandler`]
//! trait, which captures the capability set of the robot API: labware and
//! instrument loading, tip handling, aspirate/dispense, and homing. The
//! trait is synchronous; a protocol run never suspends, and one `&mut`
//! handler borrow owns the hardware for the whole run.
//!
//! [`SimHandler`] is the simulate-mode implementation used by tests and dry
//! runs. A real-robot implementation would wrap the vendor driver behind
//! the same trait and is out of scope here.

pub mod error;
pub mod sim;

pub use error::{BackendError, BackendResult};
pub use sim::{Operation, SimHandler};

use aliquot_core::Mount;

/// Handle to a loaded labware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabwareId(pub(crate) usize);

/// Handle to a loaded instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstrumentId(pub(crate) usize);

/// Capability set provided by a liquid-handling robot.
///
/// All operations are fallible; errors must propagate immediately, and the
/// caller treats a failed run as unsafe to resume.
pub trait LiquidHandler {
    /// Home the gantry.
    fn home(&mut self) -> BackendResult<()>;

    /// Place a labware kind into a deck slot.
    fn load_labware(&mut self, kind: &str, slot: u8) -> BackendResult<LabwareId>;

    /// Attach an instrument to a mount, with its tip racks.
    fn load_instrument(
        &mut self,
        kind: &str,
        mount: Mount,
        tip_racks: &[LabwareId],
    ) -> BackendResult<InstrumentId>;

    /// Pick up a fresh tip from the instrument's tip racks.
    fn pick_up_tip(&mut self, instrument: InstrumentId) -> BackendResult<()>;

    /// Drop the current tip into the waste.
    fn drop_tip(&mut self, instrument: InstrumentId) -> BackendResult<()>;

    /// Draw `volume` from a well.
    fn aspirate(
        &mut self,
        instrument: InstrumentId,
        volume: f64,
        labware: LabwareId,
        well: &str,
    ) -> BackendResult<()>;

    /// Deliver `volume` into a well.
    fn dispense(
        &mut self,
        instrument: InstrumentId,
        volume: f64,
        labware: LabwareId,
        well: &str,
    ) -> BackendResult<()>;
}
