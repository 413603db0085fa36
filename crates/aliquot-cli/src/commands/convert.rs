//! Plate-map CSV to protocol JSON conversion.
//!
//! Bench scientists describe buffer recipes as a component grid: one row
//! per component with its per-tube volumes in `Volume N` columns. This
//! converter assigns source-rack and destination-plate addresses in
//! column-major order (the order tubes are racked by hand) and emits the
//! protocol request document the planner consumes. The grid is plain
//! comma-separated text with no quoting.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;

use aliquot_core::{BufferSetup, BufferTube, BufferVolume, ProtocolRequest, wells};

pub fn convert(csv: &Path, out: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(csv)?;
    let request = parse_plate_map(&content)?;
    std::fs::write(out, serde_json::to_string_pretty(&request)?)?;
    println!(
        "✓ Wrote {} ({} components, {} tubes)",
        out.display(),
        request.setup.len(),
        request.buffers.len()
    );
    Ok(())
}

fn parse_plate_map(content: &str) -> anyhow::Result<ProtocolRequest> {
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());

    let header = lines.next().context("plate map is empty")?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let component_col = columns
        .iter()
        .position(|c| *c == "Component")
        .context("plate map has no Component column")?;
    let volume_cols: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.contains("Volume"))
        .map(|(idx, _)| idx)
        .collect();

    let rack = wells::column_major(4, 6);
    let plate = wells::column_major(8, 12);

    let mut setup = Vec::new();
    let mut tubes: BTreeMap<usize, Vec<BufferVolume>> = BTreeMap::new();

    for line in lines {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let name = fields.get(component_col).copied().unwrap_or("");
        // Summary rows carry no component of their own.
        if name.is_empty() || name == "Total volume" {
            continue;
        }

        let address = rack
            .get(setup.len())
            .with_context(|| format!("more components than source rack wells ({})", rack.len()))?;
        setup.push(BufferSetup {
            address: address.clone(),
            name: name.to_string(),
        });

        // A row's n-th filled volume cell belongs to tube n.
        let mut tube_index = 0;
        for &col in &volume_cols {
            let Some(field) = fields.get(col) else {
                continue;
            };
            if field.is_empty() {
                continue;
            }
            let volume: f64 = field
                .parse()
                .with_context(|| format!("bad volume '{field}' for component '{name}'"))?;
            tubes.entry(tube_index).or_default().push(BufferVolume {
                name: name.to_string(),
                volume,
            });
            tube_index += 1;
        }
    }

    let buffers = tubes
        .into_iter()
        .map(|(tube_index, buffer_volumes)| {
            let address = plate.get(tube_index).with_context(|| {
                format!("more tubes than destination plate wells ({})", plate.len())
            })?;
            Ok(BufferTube {
                address: address.clone(),
                buffer_volumes,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(ProtocolRequest { setup, buffers })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLATE_MAP: &str = "\
Component,Stock,Volume 1,Volume 2,Volume 3
HEPES,1 M,50,50,
NaCl,5 M,10,,8
Glycerol,50%,5,5,5
Total volume,,65,55,13
";

    #[test]
    fn components_get_column_major_rack_addresses() {
        let request = parse_plate_map(PLATE_MAP).unwrap();

        let setup: Vec<(&str, &str)> = request
            .setup
            .iter()
            .map(|s| (s.name.as_str(), s.address.as_str()))
            .collect();
        assert_eq!(
            setup,
            vec![("HEPES", "A1"), ("NaCl", "B1"), ("Glycerol", "C1")]
        );
    }

    #[test]
    fn filled_cells_group_into_tubes() {
        let request = parse_plate_map(PLATE_MAP).unwrap();

        assert_eq!(request.buffers.len(), 3);
        assert_eq!(request.buffers[0].address, "A1");

        // Tube 0 collects each row's first filled volume.
        let first: Vec<(&str, f64)> = request.buffers[0]
            .buffer_volumes
            .iter()
            .map(|bv| (bv.name.as_str(), bv.volume))
            .collect();
        assert_eq!(
            first,
            vec![("HEPES", 50.0), ("NaCl", 10.0), ("Glycerol", 5.0)]
        );

        // NaCl's second filled cell (8) lands in its second tube.
        let nacl_tubes: Vec<f64> = request
            .buffers
            .iter()
            .flat_map(|tube| tube.buffer_volumes.iter())
            .filter(|bv| bv.name == "NaCl")
            .map(|bv| bv.volume)
            .collect();
        assert_eq!(nacl_tubes, vec![10.0, 8.0]);
    }

    #[test]
    fn total_volume_row_is_skipped() {
        let request = parse_plate_map(PLATE_MAP).unwrap();
        assert!(request.setup.iter().all(|s| s.name != "Total volume"));
    }

    #[test]
    fn missing_component_column_is_an_error() {
        let err = parse_plate_map("Name,Volume 1\nHEPES,5\n").unwrap_err();
        assert!(err.to_string().contains("Component"));
    }

    #[test]
    fn unparseable_volume_is_an_error() {
        let err = parse_plate_map("Component,Volume 1\nHEPES,lots\n").unwrap_err();
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn converted_output_validates_and_plans() {
        let request = parse_plate_map(PLATE_MAP).unwrap();
        let settings = aliquot_core::InstrumentSettings::default();

        let buffers = request.materialize(&settings).unwrap();
        let plan = aliquot_plan::schedule(buffers, &settings);
        assert_eq!(plan.entries.len(), 3);
        // HEPES has the largest mean volume, so it leads.
        assert_eq!(plan.entries[0].buffer.name, "HEPES");
    }
}
