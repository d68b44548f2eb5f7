// Candidate search: builds a counterpoint line against a cantus firmus.
//
// The line is filled strictly left to right. Each position is decided once
// and never revisited:
//
// - Position 0 takes a random perfect consonance above the cantus.
// - Position L-2 is fixed a major sixth (9) above the cantus.
// - Position L-1 is fixed an octave (12) above the cantus.
// - Every interior position runs the policy's strategy list in order and
//   commits the first acceptable pitch (first-fit, not best-fit).
//
// When every strategy fails, the sentinel pitch 0 is committed, a `DeadEnd`
// is recorded and a warning is logged. Generation always runs to the end of
// the cantus, so the number of sentinels in the line equals the number of
// dead ends.
//
// The five policies differ only in their strategy list and in whether the
// interval lists are tried in declared order or in a fresh random order per
// strategy invocation. Candidates are always measured as the raw difference
// `candidate - cantus`, so accepted notes sit between unison and an octave
// above the cantus note.
//
// Randomness comes exclusively from the `RandomSource` passed in, which is
// what makes runs reproducible from a seed or a scripted sequence.

use crate::error::SelectionError;
use crate::mode::Mode;
use crate::motion::{Direction, Motion};
use crate::pitch::{Fundamentals, IntervalClass, Pitch, SENTINEL};
use gradus_prng::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Interval above the cantus at the penultimate position (major sixth).
pub const PENULTIMATE_INTERVAL: Pitch = 9;

/// Interval above the cantus at the final position (octave).
pub const FINAL_INTERVAL: Pitch = 12;

/// Order in which a strategy tries the intervals of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalOrder {
    Declared,
    /// A fresh permutation for every strategy invocation.
    Shuffled,
}

/// Motion a consonance strategy requires of the counterpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Approach {
    /// Against the cantus; holding still is fine while the cantus moves, and
    /// the counterpoint must move while the cantus holds.
    Contrary,
    /// Same direction as the cantus, including both holding.
    Parallel,
}

impl Approach {
    fn accepts(self, cantus: Direction, counterpoint: Direction) -> bool {
        match self {
            Approach::Contrary => match cantus {
                Direction::Ascending => counterpoint != Direction::Ascending,
                Direction::Descending => counterpoint != Direction::Descending,
                Direction::Static => counterpoint != Direction::Static,
            },
            Approach::Parallel => counterpoint == cantus,
        }
    }
}

/// Variants of the stepwise strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepwisePlan {
    /// Contrary step if consonant, else the other step if imperfect.
    ContraryThenParallel,
    /// Imperfect contrary step, imperfect other step, then a perfect
    /// contrary step.
    ImperfectFirst,
    /// Two contrary steps (consonant), then two steps the other way
    /// (imperfect only).
    DoubleStep,
}

/// One way of proposing and accepting a candidate pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// `cantus + interval` for each interval of `class`.
    Consonance {
        class: IntervalClass,
        approach: Approach,
    },
    /// Neighbouring in-mode pitches of the previous counterpoint note.
    Stepwise(StepwisePlan),
    /// Every imperfect interval, then every perfect interval that follows
    /// the cantus away from the previous note.
    ExhaustiveScan,
}

const IMPERFECT_CONTRARY: Strategy = Strategy::Consonance {
    class: IntervalClass::Imperfect,
    approach: Approach::Contrary,
};
const PERFECT_CONTRARY: Strategy = Strategy::Consonance {
    class: IntervalClass::Perfect,
    approach: Approach::Contrary,
};
const IMPERFECT_PARALLEL: Strategy = Strategy::Consonance {
    class: IntervalClass::Imperfect,
    approach: Approach::Parallel,
};

/// The five selection policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    /// Imperfect contrary, perfect contrary, imperfect parallel; declared order.
    First,
    /// As `First`, with intervals in random order.
    Second,
    /// Stepwise motion first, then the `Second` chain.
    Third,
    /// Stepwise motion preferring imperfect consonances, then the `Second` chain.
    Fourth,
    /// Double stepwise guesses, then an exhaustive scan.
    Fifth,
}

impl Policy {
    pub const ALL: [Policy; 5] = [
        Policy::First,
        Policy::Second,
        Policy::Third,
        Policy::Fourth,
        Policy::Fifth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Policy::First => "first",
            Policy::Second => "second",
            Policy::Third => "third",
            Policy::Fourth => "fourth",
            Policy::Fifth => "fifth",
        }
    }

    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn interval_order(self) -> IntervalOrder {
        match self {
            Policy::First => IntervalOrder::Declared,
            _ => IntervalOrder::Shuffled,
        }
    }

    /// Strategies tried at every interior position, in priority order.
    pub fn strategies(self) -> &'static [Strategy] {
        match self {
            Policy::First | Policy::Second => {
                &[IMPERFECT_CONTRARY, PERFECT_CONTRARY, IMPERFECT_PARALLEL]
            }
            Policy::Third => &[
                Strategy::Stepwise(StepwisePlan::ContraryThenParallel),
                IMPERFECT_CONTRARY,
                PERFECT_CONTRARY,
                IMPERFECT_PARALLEL,
            ],
            Policy::Fourth => &[
                Strategy::Stepwise(StepwisePlan::ImperfectFirst),
                IMPERFECT_CONTRARY,
                PERFECT_CONTRARY,
                IMPERFECT_PARALLEL,
            ],
            Policy::Fifth => &[
                Strategy::Stepwise(StepwisePlan::DoubleStep),
                Strategy::ExhaustiveScan,
            ],
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = SelectionError;

    /// Accepts `first`..`fifth`, `1`..`5` and `FirstIteration`..`FifthIteration`,
    /// ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let wanted = wanted.strip_suffix("iteration").unwrap_or(&wanted);
        Policy::ALL
            .into_iter()
            .find(|p| p.name() == wanted || p.number().to_string() == wanted)
            .ok_or_else(|| SelectionError::UnknownPolicy(s.to_string()))
    }
}

/// Why a position holds the pitch it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    Opening,
    Penultimate,
    Final,
    Found(Strategy),
    DeadEnd,
}

/// A position where no strategy produced a pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadEnd {
    pub position: usize,
    pub cantus_pitch: Pitch,
}

/// The output of one search run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    pub line: Vec<Pitch>,
    /// One entry per position, parallel to `line`.
    pub origins: Vec<Origin>,
    pub dead_ends: Vec<DeadEnd>,
}

impl Generation {
    /// True if no position fell back to the sentinel.
    pub fn is_complete(&self) -> bool {
        self.dead_ends.is_empty()
    }
}

/// Everything an interior decision may look at.
struct Position {
    cantus: Pitch,
    cantus_direction: Direction,
    previous: Pitch,
    previous_interval: Pitch,
}

struct Search<'a> {
    fundamentals: &'a Fundamentals,
    mode: Mode,
    policy: Policy,
}

/// Generate a counterpoint line above `cantus`.
///
/// Never fails: positions without an acceptable pitch hold `SENTINEL` and
/// are listed in `Generation::dead_ends`.
pub fn generate_counterpoint(
    cantus: &[Pitch],
    policy: Policy,
    mode: Mode,
    fundamentals: &Fundamentals,
    rng: &mut impl RandomSource,
) -> Generation {
    let search = Search {
        fundamentals,
        mode,
        policy,
    };
    let len = cantus.len();
    let mut line: Vec<Pitch> = Vec::with_capacity(len);
    let mut origins = Vec::with_capacity(len);
    let mut dead_ends = Vec::new();

    for (i, &cantus_pitch) in cantus.iter().enumerate() {
        let (pitch, origin) = if i == 0 {
            match search.opening(cantus_pitch, rng) {
                Some(p) => (p, Origin::Opening),
                None => (SENTINEL, Origin::DeadEnd),
            }
        } else if i + 2 == len {
            match cantus_pitch.checked_add(PENULTIMATE_INTERVAL) {
                Some(p) => (p, Origin::Penultimate),
                None => (SENTINEL, Origin::DeadEnd),
            }
        } else if i + 1 == len {
            match cantus_pitch.checked_add(FINAL_INTERVAL) {
                Some(p) => (p, Origin::Final),
                None => (SENTINEL, Origin::DeadEnd),
            }
        } else {
            let previous = line[i - 1];
            let position = Position {
                cantus: cantus_pitch,
                cantus_direction: Direction::between(cantus[i - 1], cantus_pitch),
                previous,
                previous_interval: previous.saturating_sub(cantus[i - 1]),
            };
            match search.interior(&position, rng) {
                Some((p, strategy)) => {
                    debug!(
                        position = i,
                        pitch = p,
                        ?strategy,
                        motion = ?Motion::between((cantus[i - 1], previous), (cantus_pitch, p)),
                        "committed"
                    );
                    (p, Origin::Found(strategy))
                }
                None => (SENTINEL, Origin::DeadEnd),
            }
        };

        if origin == Origin::DeadEnd {
            warn!(
                position = i,
                cantus = cantus_pitch,
                policy = %policy,
                mode = %mode,
                "no suitable pitch found"
            );
            dead_ends.push(DeadEnd {
                position: i,
                cantus_pitch,
            });
        }
        line.push(pitch);
        origins.push(origin);
    }

    Generation {
        line,
        origins,
        dead_ends,
    }
}

impl Search<'_> {
    /// A uniformly chosen perfect consonance above the first cantus note.
    fn opening(&self, cantus: Pitch, rng: &mut impl RandomSource) -> Option<Pitch> {
        let perfect = &self.fundamentals.perfect;
        if perfect.is_empty() {
            return None;
        }
        cantus.checked_add(perfect[rng.below(perfect.len())])
    }

    fn interior(
        &self,
        position: &Position,
        rng: &mut impl RandomSource,
    ) -> Option<(Pitch, Strategy)> {
        self.policy.strategies().iter().find_map(|&strategy| {
            self.attempt(strategy, position, rng)
                .map(|pitch| (pitch, strategy))
        })
    }

    fn attempt(
        &self,
        strategy: Strategy,
        position: &Position,
        rng: &mut impl RandomSource,
    ) -> Option<Pitch> {
        match strategy {
            Strategy::Consonance { class, approach } => {
                self.consonance(class, approach, position, rng)
            }
            Strategy::Stepwise(plan) => self.stepwise(plan, position),
            Strategy::ExhaustiveScan => self.exhaustive_scan(position, rng),
        }
    }

    /// The intervals of `class` in the order this policy tries them.
    fn ordered(&self, class: IntervalClass, rng: &mut impl RandomSource) -> Vec<Pitch> {
        let mut intervals = self.fundamentals.intervals(class).to_vec();
        if self.policy.interval_order() == IntervalOrder::Shuffled {
            rng.shuffle(&mut intervals);
        }
        intervals
    }

    /// `cantus + interval` for each interval of `class`, in policy order.
    /// Sums past the pitch range are dropped.
    fn candidates(
        &self,
        class: IntervalClass,
        cantus: Pitch,
        rng: &mut impl RandomSource,
    ) -> impl Iterator<Item = Pitch> {
        self.ordered(class, rng)
            .into_iter()
            .filter_map(move |interval| cantus.checked_add(interval))
    }

    fn in_mode(&self, pitch: Pitch) -> bool {
        self.fundamentals.is_pitch_in_mode(pitch, self.mode)
    }

    fn class_above(&self, pitch: Pitch, position: &Position) -> Option<IntervalClass> {
        pitch
            .checked_sub(position.cantus)
            .and_then(|interval| self.fundamentals.classify_interval(interval))
    }

    fn consonance(
        &self,
        class: IntervalClass,
        approach: Approach,
        position: &Position,
        rng: &mut impl RandomSource,
    ) -> Option<Pitch> {
        // Parallel motion out of a perfect consonance risks parallel perfects.
        if approach == Approach::Parallel
            && self.fundamentals.is_perfect(position.previous_interval)
        {
            return None;
        }
        self.candidates(class, position.cantus, rng)
            .find(|&candidate| {
                self.in_mode(candidate)
                    && approach.accepts(
                        position.cantus_direction,
                        Direction::between(position.previous, candidate),
                    )
            })
    }

    fn step(&self, from: Pitch, direction: Direction) -> Option<Pitch> {
        self.fundamentals.next_in_mode(from, direction, self.mode)
    }

    fn stepwise(&self, plan: StepwisePlan, position: &Position) -> Option<Pitch> {
        let contrary = contrary_step(position.cantus_direction);
        let other = contrary.opposite();
        let consonant = |p: &Pitch| {
            matches!(
                self.class_above(*p, position),
                Some(IntervalClass::Perfect | IntervalClass::Imperfect)
            )
        };
        let imperfect = |p: &Pitch| {
            p.checked_sub(position.cantus)
                .is_some_and(|interval| self.fundamentals.is_imperfect(interval))
        };

        match plan {
            StepwisePlan::ContraryThenParallel => self
                .step(position.previous, contrary)
                .filter(consonant)
                .or_else(|| self.step(position.previous, other).filter(imperfect)),
            StepwisePlan::ImperfectFirst => {
                let first = self.step(position.previous, contrary);
                first
                    .filter(imperfect)
                    .or_else(|| self.step(position.previous, other).filter(imperfect))
                    .or_else(|| {
                        first.filter(|p| {
                            self.class_above(*p, position) == Some(IntervalClass::Perfect)
                        })
                    })
            }
            StepwisePlan::DoubleStep => self
                .two_steps(position.previous, contrary)
                .into_iter()
                .flatten()
                .find(consonant)
                .or_else(|| {
                    self.two_steps(position.previous, other)
                        .into_iter()
                        .flatten()
                        .find(imperfect)
                }),
        }
    }

    /// The nearest and second-nearest in-mode pitches in one direction.
    fn two_steps(&self, from: Pitch, direction: Direction) -> [Option<Pitch>; 2] {
        let first = self.step(from, direction);
        let second = first.and_then(|p| self.step(p, direction));
        [first, second]
    }

    fn exhaustive_scan(&self, position: &Position, rng: &mut impl RandomSource) -> Option<Pitch> {
        let imperfect = self
            .candidates(IntervalClass::Imperfect, position.cantus, rng)
            .find(|&candidate| self.in_mode(candidate));
        if imperfect.is_some() {
            return imperfect;
        }
        self.candidates(IntervalClass::Perfect, position.cantus, rng)
            .find(|&candidate| {
                self.in_mode(candidate)
                    && follows_cantus(position.cantus_direction, position.previous, candidate)
            })
    }
}

/// Direction a stepwise guess tries first: against the cantus, upward when
/// the cantus holds.
fn contrary_step(cantus: Direction) -> Direction {
    match cantus {
        Direction::Ascending => Direction::Descending,
        Direction::Descending | Direction::Static => Direction::Ascending,
    }
}

/// Height filter on perfect candidates in the exhaustive scan: above the
/// previous note while the cantus rises or holds, at or below it while the
/// cantus falls.
fn follows_cantus(cantus: Direction, previous: Pitch, candidate: Pitch) -> bool {
    match cantus {
        Direction::Descending => candidate <= previous,
        Direction::Ascending | Direction::Static => candidate > previous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cantus::{Species, get_cantus};
    use gradus_prng::{ExerciseRng, FixedSequence};

    fn reference() -> &'static Fundamentals {
        Fundamentals::reference()
    }

    fn run(policy: Policy, cantus: &[Pitch], rng: &mut impl RandomSource) -> Generation {
        generate_counterpoint(cantus, policy, Mode::Ionian, reference(), rng)
    }

    #[test]
    fn test_first_policy_cadence_on_ionian() {
        let cantus = get_cantus(Species::First, Mode::Ionian);
        let generation = run(Policy::First, &cantus, &mut ExerciseRng::new(1));
        assert_eq!(generation.line.len(), 12);
        assert_eq!(generation.line[10], cantus[10] + 9);
        assert_eq!(generation.line[11], cantus[11] + 12);
        assert_eq!(generation.origins[10], Origin::Penultimate);
        assert_eq!(generation.origins[11], Origin::Final);
    }

    #[test]
    fn test_first_policy_with_zero_draws_is_fully_determined() {
        // Draw 0 picks the unison opening; the rest of policy 1 draws nothing.
        let cantus = get_cantus(Species::First, Mode::Ionian);
        let mut rng = FixedSequence::zeros();
        let generation = run(Policy::First, &cantus, &mut rng);
        assert_eq!(rng.draws(), 1);
        assert_eq!(
            generation.line,
            vec![24, 0, 33, 31, 31, 36, 40, 40, 33, 36, 35, 36]
        );
        // C4 over C4, then the cantus rises to E4: every candidate sits above
        // C4, so nothing moves against it and parallel motion out of the
        // unison is off.
        assert_eq!(
            generation.dead_ends,
            vec![DeadEnd {
                position: 1,
                cantus_pitch: 28
            }]
        );
        // After the sentinel the next note can only move with the cantus.
        assert_eq!(generation.origins[2], Origin::Found(IMPERFECT_PARALLEL));
        assert_eq!(generation.origins[3], Origin::Found(PERFECT_CONTRARY));
        assert_eq!(generation.origins[4], Origin::Found(IMPERFECT_CONTRARY));
    }

    #[test]
    fn test_first_policy_on_ionian_strands_every_opening() {
        // The Ionian cantus climbs C4 E4 F4 G4. Declared order offers every
        // candidate at or above the cantus, so once the line sits under the
        // next cantus note nothing can move against it, and the parallel
        // escape is closed after a perfect interval. Whatever the opening,
        // the line still runs to the cadence.
        let cantus = get_cantus(Species::First, Mode::Ionian);
        for (draw, first_dead_end) in [(0, 1), (1, 2), (2, 3), (3, 3)] {
            let generation = run(Policy::First, &cantus, &mut FixedSequence::new(vec![draw]));
            assert_eq!(generation.line.len(), 12);
            assert!(!generation.is_complete());
            assert_eq!(generation.dead_ends[0].position, first_dead_end, "draw {draw}");
            assert_eq!(generation.line[10], cantus[10] + PENULTIMATE_INTERVAL);
            assert_eq!(generation.line[11], cantus[11] + FINAL_INTERVAL);
        }
    }

    #[test]
    fn test_opening_uses_the_drawn_perfect_interval() {
        let cantus = get_cantus(Species::First, Mode::Dorian);
        for (draw, interval) in [0, 5, 7, 12].into_iter().enumerate() {
            let generation = generate_counterpoint(
                &cantus,
                Policy::First,
                Mode::Dorian,
                reference(),
                &mut FixedSequence::new(vec![draw]),
            );
            assert_eq!(generation.line[0], cantus[0] + interval);
            assert_eq!(generation.origins[0], Origin::Opening);
        }
    }

    #[test]
    fn test_boundary_invariant_for_every_combination() {
        let f = reference();
        let mut rng = ExerciseRng::new(2024);
        for policy in Policy::ALL {
            for species in Species::ALL {
                for mode in Mode::ALL {
                    let cantus = get_cantus(species, mode);
                    let g = generate_counterpoint(&cantus, policy, mode, f, &mut rng);
                    let l = cantus.len();
                    assert_eq!(g.line.len(), l);
                    assert!(f.is_perfect(g.line[0] - cantus[0]));
                    assert_eq!(g.line[l - 2] - cantus[l - 2], 9);
                    assert_eq!(g.line[l - 1] - cantus[l - 1], 12);
                }
            }
        }
    }

    #[test]
    fn test_sentinels_match_dead_ends() {
        let f = reference();
        for seed in 0..20 {
            let mut rng = ExerciseRng::new(seed);
            for policy in Policy::ALL {
                for mode in Mode::ALL {
                    let cantus = get_cantus(Species::Second, mode);
                    let g = generate_counterpoint(&cantus, policy, mode, f, &mut rng);
                    let sentinels: Vec<usize> = g
                        .line
                        .iter()
                        .enumerate()
                        .filter(|&(_, &p)| p == SENTINEL)
                        .map(|(i, _)| i)
                        .collect();
                    let recorded: Vec<usize> = g.dead_ends.iter().map(|d| d.position).collect();
                    assert_eq!(sentinels, recorded);
                    assert_eq!(g.is_complete(), sentinels.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_interior_pitches_are_in_mode_and_consonant() {
        let f = reference();
        let mut rng = ExerciseRng::new(77);
        for policy in Policy::ALL {
            for mode in Mode::ALL {
                let cantus = get_cantus(Species::First, mode);
                let g = generate_counterpoint(&cantus, policy, mode, f, &mut rng);
                for i in 1..cantus.len() - 2 {
                    if g.line[i] == SENTINEL {
                        continue;
                    }
                    assert!(f.is_pitch_in_mode(g.line[i], mode));
                    assert!(
                        f.is_consonant(g.line[i] - cantus[i]),
                        "{policy} {mode} position {i}: {} over {}",
                        g.line[i],
                        cantus[i]
                    );
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_line() {
        for policy in Policy::ALL {
            let cantus = get_cantus(Species::Fourth, Mode::Mixolydian);
            let a = generate_counterpoint(
                &cantus,
                policy,
                Mode::Mixolydian,
                reference(),
                &mut ExerciseRng::new(9),
            );
            let b = generate_counterpoint(
                &cantus,
                policy,
                Mode::Mixolydian,
                reference(),
                &mut ExerciseRng::new(9),
            );
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_committed_prefix_ignores_later_cantus() {
        // Changing the cantus from position k onward must not change any
        // decision before k: positions are never revisited.
        let f = reference();
        let cantus = get_cantus(Species::First, Mode::Aeolian);
        let len = cantus.len();
        for policy in Policy::ALL {
            for k in 2..len - 2 {
                let mut altered = cantus.clone();
                for p in &mut altered[k..] {
                    *p = 26;
                }
                let a = generate_counterpoint(&cantus, policy, Mode::Aeolian, f, &mut ExerciseRng::new(5));
                let b = generate_counterpoint(&altered, policy, Mode::Aeolian, f, &mut ExerciseRng::new(5));
                assert_eq!(a.line[..k], b.line[..k], "{policy} diverged before {k}");
            }
        }
    }

    #[test]
    fn test_parallel_skipped_after_perfect_interval() {
        let search = Search {
            fundamentals: reference(),
            mode: Mode::Ionian,
            policy: Policy::First,
        };
        // Previous note a fifth above the cantus: parallel imperfect is off.
        let position = Position {
            cantus: 28,
            cantus_direction: Direction::Ascending,
            previous: 31,
            previous_interval: 7,
        };
        let mut rng = FixedSequence::zeros();
        assert_eq!(
            search.consonance(IntervalClass::Imperfect, Approach::Parallel, &position, &mut rng),
            None
        );
        // After a third the same move is allowed: E4 + m3 = G4 is in mode
        // and rises with the cantus.
        let position = Position {
            previous: 27,
            previous_interval: 3,
            ..position
        };
        assert_eq!(
            search.consonance(IntervalClass::Imperfect, Approach::Parallel, &position, &mut rng),
            Some(31)
        );
    }

    #[test]
    fn test_contrary_accepts_oblique_but_not_with_static_cantus() {
        assert!(Approach::Contrary.accepts(Direction::Ascending, Direction::Static));
        assert!(Approach::Contrary.accepts(Direction::Ascending, Direction::Descending));
        assert!(!Approach::Contrary.accepts(Direction::Ascending, Direction::Ascending));
        assert!(!Approach::Contrary.accepts(Direction::Static, Direction::Static));
        assert!(Approach::Contrary.accepts(Direction::Static, Direction::Ascending));
        assert!(Approach::Parallel.accepts(Direction::Static, Direction::Static));
        assert!(!Approach::Parallel.accepts(Direction::Descending, Direction::Ascending));
    }

    #[test]
    fn test_stepwise_plans() {
        let f = reference();
        let search = |policy| Search {
            fundamentals: f,
            mode: Mode::Ionian,
            policy,
        };
        // Cantus rises to C4 (24); previous counterpoint E4 (28).
        // Contrary step is D4 (26), a major second: dissonant.
        // Other step is F4 (29), a perfect fourth over C4.
        let position = Position {
            cantus: 24,
            cantus_direction: Direction::Ascending,
            previous: 28,
            previous_interval: 5,
        };
        assert_eq!(
            search(Policy::Third).stepwise(StepwisePlan::ContraryThenParallel, &position),
            None
        );
        assert_eq!(
            search(Policy::Fourth).stepwise(StepwisePlan::ImperfectFirst, &position),
            None
        );
        // Double step reaches C4 (24) two steps down: a unison.
        assert_eq!(
            search(Policy::Fifth).stepwise(StepwisePlan::DoubleStep, &position),
            Some(24)
        );

        // Previous G4 (31) over a rising cantus at E4 (28): the contrary step
        // F4 is dissonant, the other step A4 is a perfect fourth, so only the
        // double step finds E4 (unison, perfect).
        let position = Position {
            cantus: 28,
            previous: 31,
            ..position
        };
        assert_eq!(
            search(Policy::Third).stepwise(StepwisePlan::ContraryThenParallel, &position),
            None
        );
        assert_eq!(
            search(Policy::Fifth).stepwise(StepwisePlan::DoubleStep, &position),
            Some(28)
        );

        // Previous A4 (33) over a rising cantus at E4 (28): the contrary step
        // G4 is a minor third.
        let position = Position {
            cantus: 28,
            previous: 33,
            ..position
        };
        assert_eq!(
            search(Policy::Third).stepwise(StepwisePlan::ContraryThenParallel, &position),
            Some(31)
        );
        assert_eq!(
            search(Policy::Fourth).stepwise(StepwisePlan::ImperfectFirst, &position),
            Some(31)
        );
    }

    #[test]
    fn test_imperfect_first_prefers_imperfect_other_step() {
        let search = Search {
            fundamentals: reference(),
            mode: Mode::Ionian,
            policy: Policy::Fourth,
        };
        // Cantus descends to C4 (24); previous F4 (29).
        // Contrary (up) step is G4 (31): a fifth, perfect.
        // Other (down) step is E4 (28): a major third, imperfect.
        let position = Position {
            cantus: 24,
            cantus_direction: Direction::Descending,
            previous: 29,
            previous_interval: 1,
        };
        assert_eq!(
            search.stepwise(StepwisePlan::ImperfectFirst, &position),
            Some(28)
        );
        // ContraryThenParallel takes the perfect contrary step immediately.
        assert_eq!(
            search.stepwise(StepwisePlan::ContraryThenParallel, &position),
            Some(31)
        );
    }

    #[test]
    fn test_exhaustive_scan_filters_perfect_by_height() {
        // A vocabulary where only perfect intervals land in mode forces the
        // scan into its second half.
        let f = Fundamentals {
            imperfect: vec![1],
            dissonant: vec![2, 3, 4, 6, 8, 9, 10, 11],
            ..Fundamentals::standard()
        };
        let search = Search {
            fundamentals: &f,
            mode: Mode::Ionian,
            policy: Policy::First,
        };
        // Cantus E4 (28): E4 + 1 = F4 is in mode, so the scan still finds it.
        let position = Position {
            cantus: 28,
            cantus_direction: Direction::Ascending,
            previous: 33,
            previous_interval: 0,
        };
        let mut rng = FixedSequence::zeros();
        assert_eq!(search.exhaustive_scan(&position, &mut rng), Some(29));

        // Cantus rises to F4 (29): F#4 is out of mode, so perfect intervals
        // are tried and the candidate must climb above A4 (33). F4 and A#4
        // fail, C5 (a fifth) is the first to qualify.
        let position = Position {
            cantus: 29,
            ..position
        };
        assert_eq!(search.exhaustive_scan(&position, &mut rng), Some(36));

        // From C4 (24) the unison F4 already lies above the previous note.
        let rising_from_below = Position {
            previous: 24,
            ..position
        };
        assert_eq!(search.exhaustive_scan(&rising_from_below, &mut rng), Some(29));

        // A holding cantus is treated like a rising one.
        let holding = Position {
            cantus_direction: Direction::Static,
            previous: 29,
            ..position
        };
        assert_eq!(search.exhaustive_scan(&holding, &mut rng), Some(36));

        // A falling cantus wants the candidate at or below the previous note:
        // from A4 the unison F4 qualifies, from F4 it does as a held note,
        // and from C4 nothing does.
        let falling = Position {
            cantus_direction: Direction::Descending,
            ..position
        };
        assert_eq!(search.exhaustive_scan(&falling, &mut rng), Some(29));
        let falling_held = Position {
            previous: 29,
            ..falling
        };
        assert_eq!(search.exhaustive_scan(&falling_held, &mut rng), Some(29));
        let falling_from_below = Position {
            previous: 24,
            ..falling
        };
        assert_eq!(search.exhaustive_scan(&falling_from_below, &mut rng), None);
    }

    #[test]
    fn test_oversized_intervals_are_not_usable() {
        let f = Fundamentals {
            perfect: vec![Pitch::MAX],
            ..Fundamentals::standard()
        };
        let cantus = get_cantus(Species::First, Mode::Ionian);
        let g = generate_counterpoint(&cantus, Policy::Fifth, Mode::Ionian, &f, &mut FixedSequence::zeros());
        assert_eq!(g.line.len(), cantus.len());
        assert_eq!(g.line[0], SENTINEL);
        assert_eq!(g.origins[0], Origin::DeadEnd);
        assert_eq!(g.dead_ends[0].position, 0);
        let len = cantus.len();
        assert_eq!(g.line[len - 1], cantus[len - 1] + FINAL_INTERVAL);

        let g = generate_counterpoint(&[Pitch::MAX - 4; 3], Policy::First, Mode::Ionian, reference(), &mut FixedSequence::zeros());
        assert_eq!(g.line, vec![Pitch::MAX - 4, SENTINEL, SENTINEL]);
        assert_eq!(g.dead_ends.len(), 2);
    }

    #[test]
    fn test_dead_end_records_sentinel_and_continues() {
        // An empty mode vocabulary leaves every interior position stranded.
        let f = Fundamentals {
            accepted_spellings: Vec::new(),
            ..Fundamentals::standard()
        };
        let cantus = get_cantus(Species::First, Mode::Phrygian);
        let g = generate_counterpoint(&cantus, Policy::Third, Mode::Phrygian, &f, &mut FixedSequence::zeros());
        let interior = cantus.len() - 3;
        assert_eq!(g.dead_ends.len(), interior);
        assert!(g.line[1..cantus.len() - 2].iter().all(|&p| p == SENTINEL));
        // The cadence is still written.
        assert_eq!(g.line[cantus.len() - 1], cantus[cantus.len() - 1] + 12);
        assert_eq!(g.dead_ends[0], DeadEnd { position: 1, cantus_pitch: cantus[1] });
    }

    #[test]
    fn test_short_lines() {
        let f = reference();
        let mut rng = FixedSequence::zeros();
        assert!(generate_counterpoint(&[], Policy::First, Mode::Ionian, f, &mut rng).line.is_empty());
        // The opening rule wins over the cadence rules.
        let g = generate_counterpoint(&[24, 26], Policy::First, Mode::Ionian, f, &mut rng);
        assert_eq!(g.line, vec![24, 38]);
        let g = generate_counterpoint(&[24, 26, 24], Policy::First, Mode::Ionian, f, &mut rng);
        assert_eq!(g.line, vec![24, 35, 36]);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("first".parse::<Policy>().unwrap(), Policy::First);
        assert_eq!("3".parse::<Policy>().unwrap(), Policy::Third);
        assert_eq!("FourthIteration".parse::<Policy>().unwrap(), Policy::Fourth);
        assert_eq!(" FIFTH ".parse::<Policy>().unwrap(), Policy::Fifth);
        assert!(matches!(
            "sixth".parse::<Policy>(),
            Err(SelectionError::UnknownPolicy(_))
        ));
        assert!("iteration".parse::<Policy>().is_err());
    }

    #[test]
    fn test_only_first_policy_is_declared_order() {
        for policy in Policy::ALL {
            let expected = if policy == Policy::First {
                IntervalOrder::Declared
            } else {
                IntervalOrder::Shuffled
            };
            assert_eq!(policy.interval_order(), expected);
        }
    }
}
