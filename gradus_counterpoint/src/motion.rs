// Melodic direction and relative motion between two voices.
//
// Neither is stored: both are derived from consecutive pitches on demand.

use crate::pitch::Pitch;
use serde::{Deserialize, Serialize};

/// Direction of a single line between two consecutive positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
    Static,
}

impl Direction {
    pub fn between(from: Pitch, to: Pitch) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Direction::Ascending,
            std::cmp::Ordering::Less => Direction::Descending,
            std::cmp::Ordering::Equal => Direction::Static,
        }
    }

    /// Static stays static.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
            Direction::Static => Direction::Static,
        }
    }

    /// Signed semitone step in this direction.
    pub fn step(self) -> Pitch {
        match self {
            Direction::Ascending => 1,
            Direction::Descending => -1,
            Direction::Static => 0,
        }
    }
}

/// Relative motion of two voices moving from one position to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Motion {
    /// The voices move in opposite directions.
    Contrary,
    /// Same direction, same interval (also used when neither voice moves).
    Parallel,
    /// One voice moves, the other holds.
    Oblique,
    /// Same direction, different interval.
    Similar,
}

impl Motion {
    /// Classify the motion from `(lower_from, upper_from)` to
    /// `(lower_to, upper_to)`.
    pub fn between(from: (Pitch, Pitch), to: (Pitch, Pitch)) -> Self {
        let lower = Direction::between(from.0, to.0);
        let upper = Direction::between(from.1, to.1);
        match (lower, upper) {
            (Direction::Static, Direction::Static) => Motion::Parallel,
            (Direction::Static, _) | (_, Direction::Static) => Motion::Oblique,
            (l, u) if l != u => Motion::Contrary,
            _ if to.1 - to.0 == from.1 - from.0 => Motion::Parallel,
            _ => Motion::Similar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_between() {
        assert_eq!(Direction::between(24, 26), Direction::Ascending);
        assert_eq!(Direction::between(26, 24), Direction::Descending);
        assert_eq!(Direction::between(24, 24), Direction::Static);
        assert_eq!(Direction::Ascending.opposite(), Direction::Descending);
        assert_eq!(Direction::Static.opposite(), Direction::Static);
    }

    #[test]
    fn test_motion_kinds() {
        // C4-E4 to D4-C4: cantus up, counterpoint down.
        assert_eq!(Motion::between((24, 28), (26, 24)), Motion::Contrary);
        // Thirds moving up together.
        assert_eq!(Motion::between((24, 28), (26, 30)), Motion::Parallel);
        // Third to fifth, both ascending.
        assert_eq!(Motion::between((24, 28), (26, 33)), Motion::Similar);
        // Cantus holds, counterpoint moves.
        assert_eq!(Motion::between((24, 28), (24, 31)), Motion::Oblique);
        assert_eq!(Motion::between((24, 28), (24, 28)), Motion::Parallel);
    }
}
