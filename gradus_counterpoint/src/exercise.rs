// Exercise orchestration: validated selection in, finished exercise out.
//
// An `ExerciseRequest` is the (policy, species, mode) triple, validated
// against the three enumerations before anything runs. `Exercise::generate`
// then fetches the cantus, runs the search engine, optionally smooths the
// result, and keeps everything a caller might want to show: both lines, the
// origin of every counterpoint note, the dead ends and the smoothing report.
//
// Dead ends do not make generation fail. They leave sentinels in the line,
// `is_valid` reports false, and the summary prints them as `--`.

use crate::cantus::{Species, get_cantus};
use crate::error::SelectionError;
use crate::mode::Mode;
use crate::pitch::{Fundamentals, Pitch, SENTINEL};
use crate::search::{DeadEnd, Origin, Policy, generate_counterpoint};
use crate::smoothing::{SmoothingReport, smooth};
use gradus_prng::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Width of one note column in the text summary.
const COLUMN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExerciseRequest {
    pub policy: Policy,
    pub species: Species,
    pub mode: Mode,
}

impl ExerciseRequest {
    pub fn new(policy: Policy, species: Species, mode: Mode) -> Self {
        ExerciseRequest {
            policy,
            species,
            mode,
        }
    }

    /// Validate three user-supplied strings. The first invalid one is
    /// reported.
    pub fn parse(policy: &str, species: &str, mode: &str) -> Result<Self, SelectionError> {
        Ok(ExerciseRequest {
            policy: policy.parse()?,
            species: species.parse()?,
            mode: mode.parse()?,
        })
    }
}

impl fmt::Display for ExerciseRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Policy {}, species {}, {} mode",
            self.policy, self.species, self.mode
        )
    }
}

/// A generated exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub request: ExerciseRequest,
    pub cantus: Vec<Pitch>,
    pub counterpoint: Vec<Pitch>,
    pub origins: Vec<Origin>,
    pub dead_ends: Vec<DeadEnd>,
    /// Present only when smoothing ran.
    pub smoothing: Option<SmoothingReport>,
}

impl Exercise {
    pub fn generate(
        request: &ExerciseRequest,
        fundamentals: &Fundamentals,
        smooth_leaps: bool,
        rng: &mut impl RandomSource,
    ) -> Exercise {
        let cantus = get_cantus(request.species, request.mode);
        let generation =
            generate_counterpoint(&cantus, request.policy, request.mode, fundamentals, rng);
        let mut counterpoint = generation.line;

        let smoothing = smooth_leaps
            .then(|| smooth(&mut counterpoint, &cantus, fundamentals, request.mode));

        info!(
            %request,
            notes = counterpoint.len(),
            dead_ends = generation.dead_ends.len(),
            repairs = smoothing.as_ref().map_or(0, |r| r.repairs.len()),
            "exercise generated"
        );

        Exercise {
            request: *request,
            cantus,
            counterpoint,
            origins: generation.origins,
            dead_ends: generation.dead_ends,
            smoothing,
        }
    }

    /// True if every position holds a real pitch.
    pub fn is_valid(&self) -> bool {
        !self.counterpoint.contains(&SENTINEL)
    }

    /// Positions holding the sentinel.
    pub fn invalid_positions(&self) -> Vec<usize> {
        self.counterpoint
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p == SENTINEL)
            .map(|(i, _)| i)
            .collect()
    }

    /// Header line, then the counterpoint row above the cantus row, as note
    /// names. Dead ends print as `--`.
    pub fn summary(&self, fundamentals: &Fundamentals) -> String {
        let mut out = format!("{}\n", self.request);
        for (label, line) in [
            ("Counterpoint", &self.counterpoint),
            ("Cantus", &self.cantus),
        ] {
            out.push_str(&format!("{label:>12}: "));
            let cells: Vec<String> = line
                .iter()
                .map(|&p| {
                    let name = if p == SENTINEL {
                        "--"
                    } else {
                        fundamentals.name(p).unwrap_or("??")
                    };
                    format!("{name:<width$}", width = COLUMN)
                })
                .collect();
            out.push_str(cells.concat().trim_end());
            out.push('\n');
        }
        out
    }

    /// The line printed once an exercise is done.
    pub fn completion_line(&self) -> String {
        format!(
            "{}: Species {} in {} mode completed",
            self.request.policy, self.request.species, self.request.mode
        )
    }
}
