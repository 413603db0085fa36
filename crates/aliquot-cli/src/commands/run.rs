use std::path::Path;

use aliquot_backend::{Operation, SimHandler};
use aliquot_exec::TransferExecutor;
use aliquot_plan::schedule;

pub fn run(protocol: &Path, deck: Option<&Path>, show_ops: bool) -> anyhow::Result<()> {
    let config = super::load_deck(deck)?;
    let settings = config.settings();

    let request = super::load_protocol(protocol)?;
    let buffers = request.materialize(&settings)?;
    let plan = schedule(buffers, &settings);

    let mut sim = SimHandler::new();
    let mut executor = TransferExecutor::setup(&mut sim, &config)?;
    let report = executor.run(&plan)?;

    println!(
        "run complete: {} buffers, {} batches, {} tips, {:.1} ul moved",
        report.buffers, report.batches, report.tips_used, report.volume_moved
    );

    if show_ops {
        for op in sim.ops() {
            println!("  {}", describe(op));
        }
    }

    Ok(())
}

fn describe(op: &Operation) -> String {
    match op {
        Operation::Home => "home".to_string(),
        Operation::LoadLabware { kind, slot } => format!("load labware {kind} in slot {slot}"),
        Operation::LoadInstrument { kind, mount } => {
            format!("load instrument {kind} on {} mount", mount.label())
        }
        Operation::PickUpTip { instrument } => format!("{instrument}: pick up tip"),
        Operation::DropTip { instrument } => format!("{instrument}: drop tip"),
        Operation::Aspirate {
            instrument,
            volume,
            well,
            ..
        } => format!("{instrument}: aspirate {volume:.1} ul from {well}"),
        Operation::Dispense {
            instrument,
            volume,
            well,
            ..
        } => format!("{instrument}: dispense {volume:.1} ul into {well}"),
    }
}
