// Leap smoothing: an optional repair pass over a finished counterpoint line.
//
// The search engine only looks one note back, so it can leave wide melodic
// leaps. This pass walks the line once, left to right, over three-note
// windows `(a, b, c)` at positions `(i, i+1, i+2)`. When `|a - b|` exceeds a
// perfect fifth, `b` is replaced by an in-mode pitch within a fifth of `a`
// that is consonant above the cantus note under `b`: an imperfect consonance
// if one is in reach, else a perfect one, nearest the midpoint of `a` and `c`
// either way. When neither is in reach the leap stays and the position is
// reported as skipped, so a repair never writes a dissonance or drops below
// the cantus.
//
// Windows run for `i` in `0..L-3`, so the opening note and the two cadence
// notes are never rewritten. Windows touching a sentinel are left alone, so
// dead-end accounting done by the search stays valid after smoothing.

use crate::mode::Mode;
use crate::pitch::{Fundamentals, Pitch, SENTINEL};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Widest melodic step left untouched (a perfect fifth).
pub const MAX_LEAP: Pitch = 7;

/// One rewritten position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repair {
    pub position: usize,
    pub from: Pitch,
    pub to: Pitch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmoothingReport {
    pub repairs: Vec<Repair>,
    /// Positions following a wide leap that were left as they were, either
    /// because the window holds a sentinel or no consonance was in reach.
    pub skipped: Vec<usize>,
}

/// Smooth `line` in place against `cantus`.
pub fn smooth(
    line: &mut [Pitch],
    cantus: &[Pitch],
    fundamentals: &Fundamentals,
    mode: Mode,
) -> SmoothingReport {
    let mut report = SmoothingReport::default();

    for i in 0..line.len().saturating_sub(3) {
        let (a, b, c) = (line[i], line[i + 1], line[i + 2]);
        if (a - b).abs() <= MAX_LEAP {
            continue;
        }
        let position = i + 1;
        let anchor = match cantus.get(position) {
            Some(&p) if ![a, b, c].contains(&SENTINEL) => p,
            _ => {
                debug!(position, "leap next to a sentinel left as is");
                report.skipped.push(position);
                continue;
            }
        };

        match replacement(a, c, anchor, fundamentals, mode) {
            Some(to) => {
                info!(position, from = b, to, "smoothed leap");
                line[position] = to;
                report.repairs.push(Repair {
                    position,
                    from: b,
                    to,
                });
            }
            None => {
                debug!(position, cantus = anchor, "no consonance within reach");
                report.skipped.push(position);
            }
        }
    }

    report
}

/// Best pitch to stand between `a` and `c` over cantus note `anchor`.
fn replacement(
    a: Pitch,
    c: Pitch,
    anchor: Pitch,
    fundamentals: &Fundamentals,
    mode: Mode,
) -> Option<Pitch> {
    let midpoint = (i32::from(a) + i32::from(c)).div_euclid(2);
    let downward = a > c;

    let mut candidates: Vec<Pitch> = (a.saturating_sub(MAX_LEAP)..=a.saturating_add(MAX_LEAP))
        .filter(|&p| p != SENTINEL && fundamentals.is_pitch_in_mode(p, mode))
        .collect();
    // Nearest the midpoint first; on a tie, the side the line is heading.
    candidates.sort_by_key(|&p| {
        let p = i32::from(p);
        ((p - midpoint).abs(), if downward { p } else { -p })
    });

    let imperfect =
        |p: &Pitch| p.checked_sub(anchor).is_some_and(|iv| fundamentals.is_imperfect(iv));
    let perfect = |p: &Pitch| p.checked_sub(anchor).is_some_and(|iv| fundamentals.is_perfect(iv));
    candidates
        .iter()
        .copied()
        .find(imperfect)
        .or_else(|| candidates.iter().copied().find(perfect))
}
