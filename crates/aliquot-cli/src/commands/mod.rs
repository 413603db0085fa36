pub mod convert;
pub mod deck;
pub mod plan;
pub mod run;

use std::path::Path;

use aliquot_core::{DeckConfig, ProtocolRequest};

pub(crate) fn load_deck(path: Option<&Path>) -> anyhow::Result<DeckConfig> {
    match path {
        Some(path) => DeckConfig::from_file(path),
        None => Ok(DeckConfig::default()),
    }
}

pub(crate) fn load_protocol(path: &Path) -> anyhow::Result<ProtocolRequest> {
    let content = std::fs::read_to_string(path)?;
    let request: ProtocolRequest = serde_json::from_str(&content)?;
    Ok(request)
}
