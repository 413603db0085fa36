//! The two-instrument model: volume ranges, safe capacities, and the
//! classification threshold that routes a request to one of them.

use serde::{Deserialize, Serialize};

/// Which pipetting head handles a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentClass {
    /// Small volumes (default: up to 20 µl).
    LowRange,
    /// Larger volumes (default: up to 300 µl).
    HighRange,
}

impl InstrumentClass {
    pub fn label(&self) -> &'static str {
        match self {
            InstrumentClass::LowRange => "low-range",
            InstrumentClass::HighRange => "high-range",
        }
    }
}

impl std::fmt::Display for InstrumentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Side of the gantry an instrument is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mount {
    Left,
    Right,
}

impl Mount {
    pub fn label(&self) -> &'static str {
        match self {
            Mount::Left => "left",
            Mount::Right => "right",
        }
    }
}

/// Physical parameters of one pipetting instrument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstrumentSpec {
    /// Vendor instrument kind, e.g. `"p300_single_gen2"`.
    pub kind: String,
    pub mount: Mount,
    /// Rated maximum aspirate volume in microliters.
    pub max_volume: f64,
    /// Per-batch packing ceiling, held below `max_volume` as a margin.
    pub safe_capacity: f64,
}

/// The instrument pair plus the volume threshold that splits requests
/// between them.
///
/// The threshold is a physical property of the installed instruments and
/// moves with them (configured via `deck.toml`); the default split is
/// exactly at 20 µl.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstrumentSettings {
    /// Requests with volume at or below this go to the low-range head.
    pub threshold: f64,
    pub low: InstrumentSpec,
    pub high: InstrumentSpec,
}

impl Default for InstrumentSettings {
    fn default() -> Self {
        Self {
            threshold: 20.0,
            low: InstrumentSpec {
                kind: "p20_single_gen2".to_string(),
                mount: Mount::Left,
                max_volume: 20.0,
                safe_capacity: 18.0,
            },
            high: InstrumentSpec {
                kind: "p300_single_gen2".to_string(),
                mount: Mount::Right,
                max_volume: 300.0,
                safe_capacity: 270.0,
            },
        }
    }
}

impl InstrumentSettings {
    /// Classify a request volume to the instrument that dispenses it.
    ///
    /// Low-range iff `volume <= threshold`, high-range otherwise. Pure and
    /// total over positive volumes.
    pub fn classify(&self, volume: f64) -> InstrumentClass {
        if volume <= self.threshold {
            InstrumentClass::LowRange
        } else {
            InstrumentClass::HighRange
        }
    }

    /// The spec for a given instrument class.
    pub fn spec(&self, class: InstrumentClass) -> &InstrumentSpec {
        match class {
            InstrumentClass::LowRange => &self.low,
            InstrumentClass::HighRange => &self.high,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_splits_at_threshold() {
        let settings = InstrumentSettings::default();

        assert_eq!(settings.classify(5.0), InstrumentClass::LowRange);
        assert_eq!(settings.classify(20.0), InstrumentClass::LowRange); // boundary
        assert_eq!(settings.classify(20.01), InstrumentClass::HighRange);
        assert_eq!(settings.classify(250.0), InstrumentClass::HighRange);
    }

    #[test]
    fn classify_is_deterministic() {
        let settings = InstrumentSettings::default();
        for _ in 0..3 {
            assert_eq!(settings.classify(19.99), InstrumentClass::LowRange);
        }
    }

    #[test]
    fn default_capacities() {
        let settings = InstrumentSettings::default();
        assert_eq!(settings.low.safe_capacity, 18.0);
        assert_eq!(settings.low.max_volume, 20.0);
        assert_eq!(settings.high.safe_capacity, 270.0);
        assert_eq!(settings.high.max_volume, 300.0);
    }

    #[test]
    fn custom_threshold_moves_the_split() {
        let mut settings = InstrumentSettings::default();
        settings.threshold = 50.0;
        assert_eq!(settings.classify(45.0), InstrumentClass::LowRange);
        assert_eq!(settings.classify(50.5), InstrumentClass::HighRange);
    }

    #[test]
    fn spec_lookup_by_class() {
        let settings = InstrumentSettings::default();
        assert_eq!(settings.spec(InstrumentClass::LowRange).kind, "p20_single_gen2");
        assert_eq!(settings.spec(InstrumentClass::HighRange).mount, Mount::Right);
    }
}
