use std::path::Path;

use aliquot_plan::{RunPlan, schedule};

pub fn plan(protocol: &Path, deck: Option<&Path>, format: &str) -> anyhow::Result<()> {
    let config = super::load_deck(deck)?;
    let settings = config.settings();

    let request = super::load_protocol(protocol)?;
    let buffers = request.materialize(&settings)?;
    let plan = schedule(buffers, &settings);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        _ => print_text(&plan),
    }

    Ok(())
}

fn print_text(plan: &RunPlan) {
    for entry in &plan.entries {
        println!(
            "{} (source {}, {} transfers)",
            entry.buffer.name,
            entry.buffer.source,
            entry.buffer.requests.len()
        );
        for (label, batches) in [("high", &entry.packed.high), ("low", &entry.packed.low)] {
            for (index, batch) in batches.iter().enumerate() {
                println!(
                    "  {label} batch {}: aspirate {:.1} ul, {} dispenses",
                    index + 1,
                    batch.aspirate_total,
                    batch.dispenses.len()
                );
            }
        }
    }
    println!(
        "total: {} buffers, {} batches, {:.1} ul",
        plan.entries.len(),
        plan.batch_count(),
        plan.total_volume()
    );
}
