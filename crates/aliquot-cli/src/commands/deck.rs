use std::path::Path;

use aliquot_core::DeckConfig;

pub fn init(out: &Path) -> anyhow::Result<()> {
    let config = DeckConfig::default();
    std::fs::write(out, config.to_toml_string()?)?;
    println!("✓ Generated {}", out.display());
    Ok(())
}
