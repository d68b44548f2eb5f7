// Gradus counterpoint generator: CLI entry point.
//
// Two ways in:
//   gradus generate --policy P --species N --mode M [--seed S] [--smooth] [--midi PATH]
//   gradus interactive [--seed S] [--smooth]
//
// `generate` runs one exercise from flags; `interactive` keeps prompting for
// policy, species and mode until Ctrl-C or Ctrl-D. Both accept a JSON config
// (`--config` or GRADUS_CONFIG); flags override the config. The seed in use
// is always printed so a run can be reproduced.
//
// Policies: first..fifth (or 1..5). Modes: Ionian, Dorian, Phrygian, Lydian,
// Mixolydian, Aeolian.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gradus_counterpoint::config::GeneratorConfig;
use gradus_counterpoint::error::SelectionError;
use gradus_counterpoint::exercise::{Exercise, ExerciseRequest};
use gradus_counterpoint::midi::write_midi;
use gradus_prng::ExerciseRng;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Fux species counterpoint generator
#[derive(Parser)]
#[command(name = "gradus")]
#[command(about = "Generate species counterpoint against a fixed cantus firmus", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, env = "GRADUS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a single exercise
    Generate {
        /// Selection policy: first..fifth or 1..5
        #[arg(short, long)]
        policy: String,

        /// Species, 1..5
        #[arg(short, long)]
        species: String,

        /// Church mode
        #[arg(short, long)]
        mode: String,

        /// Random seed (defaults to the config seed, then the clock)
        #[arg(long)]
        seed: Option<u64>,

        /// Smooth wide leaps after generation
        #[arg(long)]
        smooth: bool,

        /// Also write the exercise to this MIDI file
        #[arg(long)]
        midi: Option<PathBuf>,
    },

    /// Prompt for exercises until interrupted
    Interactive {
        /// Random seed for the whole session
        #[arg(long)]
        seed: Option<u64>,

        /// Smooth wide leaps after generation
        #[arg(long)]
        smooth: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    debug!(seed = ?config.seed, smooth = config.smooth, "configuration loaded");

    match cli.command {
        Command::Generate {
            policy,
            species,
            mode,
            seed,
            smooth,
            midi,
        } => {
            let request =
                ExerciseRequest::parse(&policy, &species, &mode).context("invalid selection")?;
            let seed = resolve_seed(seed, &config);
            println!("Seed: {seed}");
            let mut rng = ExerciseRng::new(seed);
            let exercise = Exercise::generate(
                &request,
                &config.fundamentals,
                smooth || config.smooth,
                &mut rng,
            );
            report(&exercise, &config);
            if let Some(path) = midi {
                export(&exercise, &config, &path)?;
            }
        }
        Command::Interactive { seed, smooth } => {
            let seed = resolve_seed(seed, &config);
            println!("Seed: {seed}");
            interactive(&config, seed, smooth || config.smooth)?;
        }
    }

    Ok(())
}

/// Flag, then config, then the clock.
fn resolve_seed(flag: Option<u64>, config: &GeneratorConfig) -> u64 {
    flag.or(config.seed).unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    })
}

fn report(exercise: &Exercise, config: &GeneratorConfig) {
    print!("{}", exercise.summary(&config.fundamentals));
    if !exercise.is_valid() {
        println!(
            "warning: no suitable pitch at position(s) {:?}",
            exercise.invalid_positions()
        );
    }
    if let Some(smoothing) = &exercise.smoothing {
        println!("Smoothed {} leap(s)", smoothing.repairs.len());
    }
    println!("{}", exercise.completion_line());
}

fn export(exercise: &Exercise, config: &GeneratorConfig, path: &Path) -> Result<()> {
    write_midi(exercise, &config.midi, path)
        .with_context(|| format!("writing MIDI file {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn interactive(config: &GeneratorConfig, seed: u64, smooth: bool) -> Result<()> {
    let mut editor = DefaultEditor::new().context("starting line editor")?;
    let mut rng = ExerciseRng::new(seed);

    loop {
        let Some(policy) = prompt(&mut editor, "Algorithm version: ")? else {
            break;
        };
        let Some(species) = prompt(&mut editor, "Species: ")? else {
            break;
        };
        let Some(mode) = prompt(&mut editor, "Mode: ")? else {
            break;
        };
        let request = ExerciseRequest::new(policy, species, mode);
        let exercise = Exercise::generate(&request, &config.fundamentals, smooth, &mut rng);
        report(&exercise, config);
        println!();
    }

    println!("Goodbye!");
    Ok(())
}

/// Ask until the answer parses. `None` means the user ended the session.
fn prompt<T>(editor: &mut DefaultEditor, label: &str) -> Result<Option<T>>
where
    T: FromStr<Err = SelectionError>,
{
    loop {
        match editor.readline(label) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line)?;
                match line.parse() {
                    Ok(value) => return Ok(Some(value)),
                    Err(err) => println!("{err}"),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(None),
            Err(err) => return Err(err).context("reading input"),
        }
    }
}
