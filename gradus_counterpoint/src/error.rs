// Error types for the counterpoint library.
//
// Generation itself never fails: dead ends are reported through sentinel
// pitches (see search.rs). These errors cover the edges around it: invalid
// user selections, unreadable config files and MIDI export.

use thiserror::Error;

/// A policy, species or mode outside its enumerated set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown policy '{0}' (expected first..fifth, 1..5 or FirstIteration..FifthIteration)")]
    UnknownPolicy(String),

    #[error("unknown species '{0}' (expected 1..5)")]
    UnknownSpecies(String),

    #[error("unknown mode '{0}' (expected Ionian, Dorian, Phrygian, Lydian, Mixolydian or Aeolian)")]
    UnknownMode(String),
}

/// Loading or validating a generator config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Writing an exercise to a MIDI file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write MIDI file: {0}")]
    Io(#[from] std::io::Error),

    #[error("pitch {pitch} at position {position} maps outside the MIDI key range")]
    PitchOutOfRange { position: usize, pitch: i16 },
}
