// Pitch vocabulary and interval classification.
//
// Pitches are plain integers on a contiguous semitone scale. The reference
// vocabulary spans four octaves, C2 (0) through B5 (47), and every value has
// exactly one canonical name: a letter, an optional sharp, and an octave digit.
// Enharmonic spellings are ignored.
//
// Interval classes are a static lookup rather than derived from theory:
// perfect {0, 5, 7, 12}, imperfect {3, 4, 8, 9}, dissonant {1, 2, 6, 10, 11}.
// Anything else is unclassified and unusable.
//
// `Fundamentals` bundles the vocabulary, the interval lists and the mode
// membership rule. It is built once (`Fundamentals::reference()`) or loaded
// from the JSON config, and is passed by reference to the search engine and
// the smoothing pass. Nothing mutates it after construction.

use crate::error::ConfigError;
use crate::mode::Mode;
use crate::motion::Direction;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// A pitch on the semitone scale. Signed so that candidate arithmetic below
/// the vocabulary stays representable; only `0..len` name real pitches.
pub type Pitch = i16;

/// Committed in place of a pitch when no strategy finds a usable note.
pub const SENTINEL: Pitch = 0;

/// Pitch-class spellings used by the reference vocabulary (sharps only).
const SPELLINGS: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Lowest octave number in the reference vocabulary.
const FIRST_OCTAVE: u8 = 2;

/// Number of octaves in the reference vocabulary.
const OCTAVES: u8 = 4;

/// The three disjoint interval categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalClass {
    Perfect,
    Imperfect,
    Dissonant,
}

/// How `is_pitch_in_mode` decides membership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipRule {
    /// The pitch's spelling (letter plus accidental) must be in the accepted
    /// set. With the reference set of seven naturals this ignores the mode.
    #[default]
    Spelling,
    /// The pitch class must be a scale degree of the mode, counted from its
    /// final.
    ScaleDegrees,
}

/// Immutable pitch and interval vocabulary. Fields missing from a config
/// file fall back to the reference values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fundamentals {
    /// Canonical name of each pitch, indexed by pitch value.
    pub pitch_names: Vec<String>,
    pub perfect: Vec<Pitch>,
    pub imperfect: Vec<Pitch>,
    pub dissonant: Vec<Pitch>,
    /// Spellings (name without octave) accepted by `MembershipRule::Spelling`.
    pub accepted_spellings: Vec<String>,
    pub membership: MembershipRule,
}

static REFERENCE: LazyLock<Fundamentals> = LazyLock::new(Fundamentals::standard);

impl Default for Fundamentals {
    fn default() -> Self {
        Fundamentals::standard()
    }
}

impl Fundamentals {
    /// The shared reference vocabulary.
    pub fn reference() -> &'static Fundamentals {
        &REFERENCE
    }

    /// Build the reference vocabulary: C2..B5, the Fux interval lists and
    /// the seven natural spellings.
    pub fn standard() -> Self {
        let pitch_names = (FIRST_OCTAVE..FIRST_OCTAVE + OCTAVES)
            .flat_map(|octave| SPELLINGS.iter().map(move |s| format!("{s}{octave}")))
            .collect();
        Fundamentals {
            pitch_names,
            perfect: vec![0, 5, 7, 12],
            imperfect: vec![3, 4, 8, 9],
            dissonant: vec![1, 2, 6, 10, 11],
            accepted_spellings: ["A", "B", "C", "D", "E", "F", "G"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            membership: MembershipRule::Spelling,
        }
    }

    /// Reject vocabularies the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pitch_names.is_empty() {
            return Err(ConfigError::Invalid("pitch vocabulary is empty".into()));
        }
        if self.pitch_names.len() > Pitch::MAX as usize {
            return Err(ConfigError::Invalid(format!(
                "pitch vocabulary has {} entries, at most {} are supported",
                self.pitch_names.len(),
                Pitch::MAX
            )));
        }
        if self.perfect.is_empty() || self.imperfect.is_empty() {
            return Err(ConfigError::Invalid(
                "perfect and imperfect interval lists must not be empty".into(),
            ));
        }
        let lists = [&self.perfect, &self.imperfect, &self.dissonant];
        for (i, a) in lists.iter().enumerate() {
            if a.iter().any(|&iv| iv < 0) {
                return Err(ConfigError::Invalid(format!(
                    "negative interval in {a:?}"
                )));
            }
            // No two vocabulary pitches are further apart than this.
            if let Some(iv) = a.iter().find(|&&iv| iv as usize >= self.len()) {
                return Err(ConfigError::Invalid(format!(
                    "interval {iv} spans more than the {}-pitch vocabulary",
                    self.len()
                )));
            }
            for b in &lists[i + 1..] {
                if let Some(shared) = a.iter().find(|&&iv| b.contains(&iv)) {
                    return Err(ConfigError::Invalid(format!(
                        "interval {shared} is listed in more than one class"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of pitches in the vocabulary.
    pub fn len(&self) -> usize {
        self.pitch_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitch_names.is_empty()
    }

    /// True if `pitch` names a pitch in the vocabulary.
    pub fn contains(&self, pitch: Pitch) -> bool {
        pitch >= 0 && (pitch as usize) < self.pitch_names.len()
    }

    /// Canonical name of a pitch, e.g. `"F#3"`.
    pub fn name(&self, pitch: Pitch) -> Option<&str> {
        if !self.contains(pitch) {
            return None;
        }
        self.pitch_names.get(pitch as usize).map(String::as_str)
    }

    /// Inverse of `name`.
    pub fn pitch_of(&self, name: &str) -> Option<Pitch> {
        self.pitch_names
            .iter()
            .position(|n| n == name)
            .map(|i| i as Pitch)
    }

    /// Name without the trailing octave digits, e.g. `"F#"`.
    pub fn spelling(&self, pitch: Pitch) -> Option<&str> {
        self.name(pitch)
            .map(|n| n.trim_end_matches(|c: char| c.is_ascii_digit()))
    }

    /// The interval list for a class.
    pub fn intervals(&self, class: IntervalClass) -> &[Pitch] {
        match class {
            IntervalClass::Perfect => &self.perfect,
            IntervalClass::Imperfect => &self.imperfect,
            IntervalClass::Dissonant => &self.dissonant,
        }
    }

    /// Classify an interval by lookup. `None` means the value is in no list.
    pub fn classify_interval(&self, interval: Pitch) -> Option<IntervalClass> {
        if self.perfect.contains(&interval) {
            Some(IntervalClass::Perfect)
        } else if self.imperfect.contains(&interval) {
            Some(IntervalClass::Imperfect)
        } else if self.dissonant.contains(&interval) {
            Some(IntervalClass::Dissonant)
        } else {
            None
        }
    }

    pub fn is_perfect(&self, interval: Pitch) -> bool {
        self.classify_interval(interval) == Some(IntervalClass::Perfect)
    }

    pub fn is_imperfect(&self, interval: Pitch) -> bool {
        self.classify_interval(interval) == Some(IntervalClass::Imperfect)
    }

    /// True for perfect or imperfect consonances.
    pub fn is_consonant(&self, interval: Pitch) -> bool {
        matches!(
            self.classify_interval(interval),
            Some(IntervalClass::Perfect | IntervalClass::Imperfect)
        )
    }

    /// Whether `pitch` is acceptable in `mode` under the configured rule.
    /// Pitches outside the vocabulary are never in mode.
    pub fn is_pitch_in_mode(&self, pitch: Pitch, mode: Mode) -> bool {
        match self.membership {
            MembershipRule::Spelling => self
                .spelling(pitch)
                .is_some_and(|s| self.accepted_spellings.iter().any(|a| a == s)),
            MembershipRule::ScaleDegrees => {
                self.contains(pitch) && mode.contains_pitch_class((pitch % 12) as u8)
            }
        }
    }

    /// Walk from `from` one semitone at a time in `direction` and return the
    /// first in-mode pitch, or `None` once the walk leaves the vocabulary.
    /// A static direction never moves.
    pub fn next_in_mode(&self, from: Pitch, direction: Direction, mode: Mode) -> Option<Pitch> {
        let step = direction.step();
        if step == 0 {
            return None;
        }
        let mut pitch = from + step;
        while self.contains(pitch) {
            if self.is_pitch_in_mode(pitch, mode) {
                return Some(pitch);
            }
            pitch += step;
        }
        None
    }
}

/// Distance between two pitches reduced to within an octave (0..=11).
pub fn reduce_to_octave(a: Pitch, b: Pitch) -> Pitch {
    (a - b).abs() % 12
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vocabulary_names() {
        let f = Fundamentals::reference();
        assert_eq!(f.len(), 48);
        assert_eq!(f.name(0), Some("C2"));
        assert_eq!(f.name(13), Some("C#3"));
        assert_eq!(f.name(24), Some("C4"));
        assert_eq!(f.name(47), Some("B5"));
        assert_eq!(f.name(48), None);
        assert_eq!(f.name(-1), None);
        assert_eq!(f.pitch_of("A4"), Some(33));
        assert_eq!(f.spelling(30), Some("F#"));
    }

    #[test]
    fn test_every_name_is_unique() {
        let f = Fundamentals::reference();
        for (pitch, name) in f.pitch_names.iter().enumerate() {
            assert_eq!(f.pitch_of(name), Some(pitch as Pitch));
        }
    }

    #[test]
    fn test_classify_interval() {
        let f = Fundamentals::reference();
        for iv in [0, 5, 7, 12] {
            assert_eq!(f.classify_interval(iv), Some(IntervalClass::Perfect));
        }
        for iv in [3, 4, 8, 9] {
            assert_eq!(f.classify_interval(iv), Some(IntervalClass::Imperfect));
        }
        for iv in [1, 2, 6, 10, 11] {
            assert_eq!(f.classify_interval(iv), Some(IntervalClass::Dissonant));
        }
        assert_eq!(f.classify_interval(13), None);
        assert_eq!(f.classify_interval(-3), None);
    }

    #[test]
    fn test_reduce_to_octave() {
        assert_eq!(reduce_to_octave(38, 0), 2); // D5 over C2
        assert_eq!(reduce_to_octave(0, 38), 2);
        assert_eq!(reduce_to_octave(24, 36), 0);
        assert_eq!(reduce_to_octave(28, 24), 4);
    }

    #[test]
    fn test_spelling_rule_accepts_naturals_only() {
        let f = Fundamentals::reference();
        assert!(f.is_pitch_in_mode(24, Mode::Dorian)); // C4
        assert!(f.is_pitch_in_mode(29, Mode::Phrygian)); // F4
        assert!(!f.is_pitch_in_mode(25, Mode::Ionian)); // C#4
        assert!(!f.is_pitch_in_mode(30, Mode::Lydian)); // F#4
        assert!(!f.is_pitch_in_mode(48, Mode::Ionian)); // off the top
    }

    #[test]
    fn test_scale_degree_rule_agrees_for_church_modes() {
        let spelling = Fundamentals::standard();
        let strict = Fundamentals {
            membership: MembershipRule::ScaleDegrees,
            ..Fundamentals::standard()
        };
        for mode in Mode::ALL {
            for pitch in 0..48 {
                assert_eq!(
                    spelling.is_pitch_in_mode(pitch, mode),
                    strict.is_pitch_in_mode(pitch, mode),
                    "{mode:?} disagrees on pitch {pitch}"
                );
            }
        }
    }

    #[test]
    fn test_next_in_mode_skips_sharps() {
        let f = Fundamentals::reference();
        // E4 up: F4 (a half step), no sharp in between.
        assert_eq!(f.next_in_mode(28, Direction::Ascending, Mode::Ionian), Some(29));
        // F4 up skips F#4 to G4.
        assert_eq!(f.next_in_mode(29, Direction::Ascending, Mode::Ionian), Some(31));
        // C4 down is B3.
        assert_eq!(f.next_in_mode(24, Direction::Descending, Mode::Ionian), Some(23));
        // Walking off either end fails.
        assert_eq!(f.next_in_mode(47, Direction::Ascending, Mode::Ionian), None);
        assert_eq!(f.next_in_mode(0, Direction::Descending, Mode::Ionian), None);
        assert_eq!(f.next_in_mode(24, Direction::Static, Mode::Ionian), None);
    }

    #[test]
    fn test_validate_rejects_overlapping_classes() {
        let mut f = Fundamentals::standard();
        assert!(f.validate().is_ok());
        f.imperfect.push(7);
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_intervals_wider_than_the_vocabulary() {
        let mut f = Fundamentals::standard();
        f.perfect.push(47);
        assert!(f.validate().is_ok());
        f.perfect.push(48);
        assert!(f.validate().is_err());
        let f = Fundamentals {
            dissonant: vec![Pitch::MAX],
            ..Fundamentals::standard()
        };
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_lists() {
        let f = Fundamentals {
            perfect: Vec::new(),
            ..Fundamentals::standard()
        };
        assert!(f.validate().is_err());
    }
}
