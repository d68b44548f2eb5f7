// The six church modes used by Fux's exercises.
//
// Each mode is a diatonic pattern anchored on a final. All six are used
// untransposed (finals C, D, E, F, G, A), so their pitch sets are the white
// keys and differ only in which note is the final. The fixed cantus firmus
// for each mode lives in cantus.rs.
//
// Membership in a mode is answered by `Fundamentals::is_pitch_in_mode`, which
// consults `contains_pitch_class` here only under the stricter
// `MembershipRule::ScaleDegrees`.

use crate::error::SelectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// C Ionian: C D E F G A B C
    Ionian,
    /// D Dorian: D E F G A B C D
    Dorian,
    /// E Phrygian: E F G A B C D E
    Phrygian,
    /// F Lydian: F G A B C D E F
    Lydian,
    /// G Mixolydian: G A B C D E F G
    Mixolydian,
    /// A Aeolian: A B C D E F G A
    Aeolian,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Ionian,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Aeolian,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Ionian => "Ionian",
            Mode::Dorian => "Dorian",
            Mode::Phrygian => "Phrygian",
            Mode::Lydian => "Lydian",
            Mode::Mixolydian => "Mixolydian",
            Mode::Aeolian => "Aeolian",
        }
    }

    /// Semitone intervals from the final to each of the seven degrees.
    pub fn intervals(self) -> [u8; 7] {
        match self {
            Mode::Ionian => [0, 2, 4, 5, 7, 9, 11],
            Mode::Dorian => [0, 2, 3, 5, 7, 9, 10],
            Mode::Phrygian => [0, 1, 3, 5, 7, 8, 10],
            Mode::Lydian => [0, 2, 4, 6, 7, 9, 11],
            Mode::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
            Mode::Aeolian => [0, 2, 3, 5, 7, 8, 10],
        }
    }

    /// Pitch class of the final (0 = C).
    pub fn final_pc(self) -> u8 {
        match self {
            Mode::Ionian => 0,
            Mode::Dorian => 2,
            Mode::Phrygian => 4,
            Mode::Lydian => 5,
            Mode::Mixolydian => 7,
            Mode::Aeolian => 9,
        }
    }

    /// True if absolute pitch class `pc` (0 = C) is a degree of this mode.
    pub fn contains_pitch_class(self, pc: u8) -> bool {
        self.scale_degree(pc).is_some()
    }

    /// Scale degree (0-6) of pitch class `pc`, or `None` outside the mode.
    pub fn scale_degree(self, pc: u8) -> Option<u8> {
        let relative = (pc % 12 + 12 - self.final_pc()) % 12;
        self.intervals()
            .iter()
            .position(|&iv| iv == relative)
            .map(|d| d as u8)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = SelectionError;

    /// Case-insensitive mode name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Mode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SelectionError::UnknownMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_names() {
        assert_eq!("Ionian".parse::<Mode>().unwrap(), Mode::Ionian);
        assert_eq!("dorian".parse::<Mode>().unwrap(), Mode::Dorian);
        assert_eq!(" MIXOLYDIAN ".parse::<Mode>().unwrap(), Mode::Mixolydian);
        assert!(matches!(
            "Locrian".parse::<Mode>(),
            Err(SelectionError::UnknownMode(name)) if name == "Locrian"
        ));
    }

    #[test]
    fn test_white_key_modes() {
        // Every mode here is untransposed, so C D E F G A B are all in mode
        // and none of the sharps are.
        for mode in Mode::ALL {
            for pc in [0, 2, 4, 5, 7, 9, 11] {
                assert!(mode.contains_pitch_class(pc), "{mode} should contain pc {pc}");
            }
            for pc in [1, 3, 6, 8, 10] {
                assert!(!mode.contains_pitch_class(pc), "{mode} should not contain pc {pc}");
            }
        }
    }

    #[test]
    fn test_scale_degree_of_final() {
        for mode in Mode::ALL {
            assert_eq!(mode.scale_degree(mode.final_pc()), Some(0));
        }
        assert_eq!(Mode::Dorian.scale_degree(9), Some(4)); // A is Dorian's fifth
        assert_eq!(Mode::Phrygian.scale_degree(5), Some(1)); // F over E
        assert_eq!(Mode::Ionian.scale_degree(1), None);
    }
}
