// Cantus firmus provider.
//
// Each mode has one fixed cantus firmus, taken from Fux's Gradus ad Parnassum
// and written on the reference pitch scale (0 = C2). Higher species put
// several counterpoint notes against each cantus note; rather than model
// durations, the cantus is expanded so that every counterpoint note has its
// own cantus pitch sounding with it:
//
//   species 1   -> each pitch once    (1:1)
//   species 2-3 -> each pitch twice   (2:1, 3:1 uses the same expansion)
//   species 4-5 -> each pitch 4 times
//
// Pure data; no randomness.

use crate::error::SelectionError;
use crate::mode::Mode;
use crate::pitch::Pitch;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Species of counterpoint, 1 through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
}

impl Species {
    pub const ALL: [Species; 5] = [
        Species::First,
        Species::Second,
        Species::Third,
        Species::Fourth,
        Species::Fifth,
    ];

    pub fn number(self) -> u8 {
        match self {
            Species::First => 1,
            Species::Second => 2,
            Species::Third => 3,
            Species::Fourth => 4,
            Species::Fifth => 5,
        }
    }

    /// How many times each cantus pitch is repeated.
    pub fn repeat(self) -> usize {
        match self {
            Species::First => 1,
            Species::Second | Species::Third => 2,
            Species::Fourth | Species::Fifth => 4,
        }
    }
}

impl TryFrom<u8> for Species {
    type Error = SelectionError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Species::ALL
            .into_iter()
            .find(|s| s.number() == n)
            .ok_or_else(|| SelectionError::UnknownSpecies(n.to_string()))
    }
}

impl FromStr for Species {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(|n| Species::try_from(n).ok())
            .ok_or_else(|| SelectionError::UnknownSpecies(s.to_string()))
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// The unexpanded cantus firmus for a mode.
pub fn base_line(mode: Mode) -> &'static [Pitch] {
    match mode {
        Mode::Ionian => &[24, 28, 29, 31, 28, 33, 31, 28, 29, 28, 26, 24],
        Mode::Dorian => &[26, 29, 28, 26, 31, 29, 33, 31, 29, 28, 26],
        Mode::Phrygian => &[28, 24, 26, 24, 21, 33, 31, 28, 29, 28],
        Mode::Lydian => &[17, 19, 21, 17, 14, 16, 17, 24, 21, 17, 19, 17],
        Mode::Mixolydian => &[19, 24, 23, 19, 24, 28, 26, 31, 28, 24, 26, 23, 21, 19],
        Mode::Aeolian => &[21, 24, 23, 26, 24, 28, 29, 28, 26, 24, 23, 21],
    }
}

/// The cantus firmus for `mode`, expanded for `species`.
pub fn get_cantus(species: Species, mode: Mode) -> Vec<Pitch> {
    let repeat = species.repeat();
    base_line(mode)
        .iter()
        .flat_map(|&pitch| std::iter::repeat_n(pitch, repeat))
        .collect()
}
