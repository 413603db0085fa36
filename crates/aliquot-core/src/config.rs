//! deck.toml configuration parser.
//!
//! Describes the physical deck a run executes on: source rack, destination
//! plate, and the two instruments with their tip racks and volume limits.
//! Every section has a default matching the standard buffer-prep deck, so an
//! empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::instrument::{InstrumentSettings, InstrumentSpec, Mount};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeckConfig {
    /// Input rack the buffer tubes sit in.
    pub source: LabwareSlot,
    /// Output plate receiving the transfers.
    pub destination: LabwareSlot,
    pub instruments: InstrumentsConfig,
}

/// A labware kind placed in a numbered deck slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabwareSlot {
    pub kind: String,
    pub slot: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InstrumentsConfig {
    /// Classification threshold in microliters.
    pub threshold: f64,
    pub low: InstrumentConfig,
    pub high: InstrumentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstrumentConfig {
    pub kind: String,
    pub mount: Mount,
    pub max_volume: f64,
    pub safe_capacity: f64,
    pub tip_rack: LabwareSlot,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            source: LabwareSlot {
                kind: "opentrons_24_tuberack_generic_2ml_screwcap".to_string(),
                slot: 2,
            },
            destination: LabwareSlot {
                kind: "nest_96_wellplate_100ul_pcr_full_skirt".to_string(),
                slot: 1,
            },
            instruments: InstrumentsConfig::default(),
        }
    }
}

impl Default for InstrumentsConfig {
    fn default() -> Self {
        Self {
            threshold: 20.0,
            low: InstrumentConfig {
                kind: "p20_single_gen2".to_string(),
                mount: Mount::Left,
                max_volume: 20.0,
                safe_capacity: 18.0,
                tip_rack: LabwareSlot {
                    kind: "opentrons_96_tiprack_20ul".to_string(),
                    slot: 3,
                },
            },
            high: InstrumentConfig {
                kind: "p300_single_gen2".to_string(),
                mount: Mount::Right,
                max_volume: 300.0,
                safe_capacity: 270.0,
                tip_rack: LabwareSlot {
                    kind: "opentrons_96_tiprack_300ul".to_string(),
                    slot: 6,
                },
            },
        }
    }
}

impl DeckConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: DeckConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The instrument settings the planner packs against.
    pub fn settings(&self) -> InstrumentSettings {
        InstrumentSettings {
            threshold: self.instruments.threshold,
            low: spec_from(&self.instruments.low),
            high: spec_from(&self.instruments.high),
        }
    }
}

fn spec_from(config: &InstrumentConfig) -> InstrumentSpec {
    InstrumentSpec {
        kind: config.kind.clone(),
        mount: config.mount,
        max_volume: config.max_volume,
        safe_capacity: config.safe_capacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_deck_matches_standard_hardware() {
        let config = DeckConfig::default();
        assert_eq!(config.source.slot, 2);
        assert_eq!(config.destination.kind, "nest_96_wellplate_100ul_pcr_full_skirt");
        assert_eq!(config.instruments.low.tip_rack.slot, 3);
        assert_eq!(config.instruments.high.mount, Mount::Right);
    }

    #[test]
    fn empty_toml_is_fully_defaulted() {
        let config: DeckConfig = toml::from_str("").unwrap();
        assert_eq!(config, DeckConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let toml_str = r#"
[instruments]
threshold = 50.0
"#;
        let config: DeckConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.instruments.threshold, 50.0);
        // Untouched sections keep their defaults.
        assert_eq!(config.instruments.low.safe_capacity, 18.0);
        assert_eq!(config.source.slot, 2);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = DeckConfig::default();
        let rendered = config.to_toml_string().unwrap();
        let reparsed: DeckConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(config, reparsed);
    }

    #[test]
    fn settings_reflect_config() {
        let mut config = DeckConfig::default();
        config.instruments.high.safe_capacity = 250.0;
        let settings = config.settings();
        assert_eq!(settings.high.safe_capacity, 250.0);
        assert_eq!(settings.threshold, 20.0);
    }
}
