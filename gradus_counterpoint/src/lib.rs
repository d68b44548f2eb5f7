// Gradus Counterpoint Generator
//
// Generates a species counterpoint line above a fixed cantus firmus, after
// the exercises in Fux's Gradus ad Parnassum. The user picks one of five
// selection policies, a species (1-5) and one of six church modes; the
// engine fills the counterpoint left to right, taking the first candidate
// that satisfies the policy's ordered consonance and motion strategies, and
// recording a sentinel wherever nothing fits.
//
// Architecture:
// - pitch.rs: Pitch vocabulary (C2..B5), interval classes, mode membership
// - motion.rs: Melodic direction and two-voice motion classification
// - mode.rs: The six church modes, finals and scale degrees
// - cantus.rs: Species and the fixed cantus firmus per mode
// - search.rs: The candidate search engine and the five policies
// - smoothing.rs: Optional repair pass for wide melodic leaps
// - exercise.rs: Validated requests, generation, text summary
// - config.rs: JSON generator configuration
// - midi.rs: MIDI file output from finished exercises
// - error.rs: Library error types
//
// The generator is deterministic given a seed, supporting reproducible output.

pub mod cantus;
pub mod config;
pub mod error;
pub mod exercise;
pub mod midi;
pub mod mode;
pub mod motion;
pub mod pitch;
pub mod search;
pub mod smoothing;
