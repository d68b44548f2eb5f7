// Generator configuration.
//
// Everything tunable about a run lives in `GeneratorConfig`, loaded from an
// optional JSON file. Every field has a default, so an empty object (or no
// file at all) gives the reference vocabulary, no smoothing, a clock-derived
// seed, and the stock MIDI settings. Command-line flags override whatever the
// file says; that merging happens in main.rs.
//
// A loaded config is validated before use: a vocabulary the engine cannot
// work with (empty interval lists, overlapping classes, intervals wider
// than the vocabulary) is rejected here
// rather than surfacing as a sea of dead ends later.

use crate::error::ConfigError;
use crate::pitch::Fundamentals;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Playback settings for MIDI export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiSettings {
    pub tempo_bpm: u16,
    /// MIDI key that reference pitch 0 sounds as (36 = C2).
    pub base_note: u8,
    /// General MIDI program for the cantus track (19 = church organ).
    pub cantus_program: u8,
    /// General MIDI program for the counterpoint track (52 = choir aahs).
    pub counterpoint_program: u8,
}

impl Default for MidiSettings {
    fn default() -> Self {
        MidiSettings {
            tempo_bpm: 80,
            base_note: 36,
            cantus_program: 19,
            counterpoint_program: 52,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub fundamentals: Fundamentals,
    /// Run the leap smoothing pass after generation.
    pub smooth: bool,
    /// Fixed seed for reproducible runs. `None` seeds from the clock.
    pub seed: Option<u64>,
    pub midi: MidiSettings,
}

impl GeneratorConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fundamentals.validate()?;
        if self.midi.tempo_bpm == 0 {
            return Err(ConfigError::Invalid("tempo_bpm must be positive".into()));
        }
        if self.midi.base_note > 127
            || self.midi.cantus_program > 127
            || self.midi.counterpoint_program > 127
        {
            return Err(ConfigError::Invalid(
                "MIDI note and program numbers must be at most 127".into(),
            ));
        }
        Ok(())
    }
}
