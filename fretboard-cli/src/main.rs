//! # Fretboard - Guitar Theory Trainer
//!
//! Command-line front end for the fretboard theory engine. One-shot subcommands
//! answer theory questions (chord notes, intervals, degree labels, fretboard cells);
//! `quiz` runs an interactive session that reads taps from standard input.
//!
//! ## Architecture
//! - **Engine**: built once from the default or a JSON configuration
//! - **Session**: owned by the quiz loop, mutated one input line at a time
//! - **Logging**: `RUST_LOG=debug` shows recomputation traces

mod app;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fretboard_core::{ChordKind, EngineConfig, PitchClass, Session, TheoryEngine};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use app::{Flow, Message, ModeArg, QuizApp};

/// Guitar fretboard theory trainer
#[derive(Debug, Parser)]
#[command(name = "fretboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Engine configuration file (JSON); built-in catalogs when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the highest fret searched
    #[arg(long, global = true)]
    max_fret: Option<u8>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the notes of a chord or scale
    Notes {
        /// Root note (C, F#, Bb, ...)
        root: String,
        /// Chord or scale name, e.g. "Major 7"
        type_name: String,
        /// Look the name up among scales only
        #[arg(long)]
        scale: bool,
    },

    /// Print the note an interval label names above a root
    Interval {
        root: String,
        /// Degree label, e.g. b3
        label: String,
    },

    /// Print the degree label of a note relative to a root
    Function { note: String, root: String },

    /// List every fretboard cell of a chord or scale
    Positions {
        root: String,
        type_name: String,
        #[arg(long)]
        scale: bool,
    },

    /// List chord and scale types with their degrees
    Catalog,

    /// Print the effective configuration as JSON
    Config,

    /// Run an interactive quiz session on stdin
    Quiz {
        #[arg(short, long, value_enum, default_value = "fill-chord")]
        mode: ModeArg,

        #[arg(short, long)]
        root: Option<String>,

        /// Chord type for display and fill-chord
        #[arg(short = 't', long = "type")]
        chord_type: Option<String>,

        /// Scale for find-scale
        #[arg(short, long)]
        scale: Option<String>,

        /// Seed for reproducible interval draws
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let engine = build_engine(&cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli.command, &engine, &mut out)
}

/// Loads the configuration (if any), applies overrides and resolves the engine.
fn build_engine(cli: &Cli) -> Result<TheoryEngine> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(max_fret) = cli.max_fret {
        config.max_fret = max_fret;
    }
    TheoryEngine::new(config).context("invalid engine configuration")
}

fn resolve_notes(
    engine: &TheoryEngine,
    root: &str,
    type_name: &str,
    scale: bool,
) -> Result<Vec<PitchClass>> {
    let notes = if scale {
        engine.notes_for_kind(root.parse()?, type_name, ChordKind::Scale)?
    } else {
        engine.notes_for_chord_or_scale(root, type_name)?
    };
    Ok(notes)
}

fn run<W: Write>(command: Commands, engine: &TheoryEngine, out: &mut W) -> Result<()> {
    match command {
        Commands::Notes {
            root,
            type_name,
            scale,
        } => {
            let notes = resolve_notes(engine, &root, &type_name, scale)?;
            let names: Vec<&str> = notes.iter().map(|n| n.name()).collect();
            writeln!(out, "{}", names.join(" "))?;
        }
        Commands::Interval { root, label } => {
            writeln!(out, "{}", engine.notes_for_interval(&root, &label)?)?;
        }
        Commands::Function { note, root } => {
            writeln!(out, "{}", engine.function_label(&note, &root)?)?;
        }
        Commands::Positions {
            root,
            type_name,
            scale,
        } => {
            let notes = resolve_notes(engine, &root, &type_name, scale)?;
            let root: PitchClass = root.parse()?;
            for label in engine.cell_labels(&engine.fret_positions(&notes), root) {
                writeln!(out, "{} {} {}", label.position.string, label.position.fret, label)?;
            }
        }
        Commands::Catalog => {
            for kind in [ChordKind::Chord, ChordKind::Scale] {
                writeln!(out, "{kind}s:")?;
                for entry in engine.catalog().types().iter().filter(|t| t.kind == kind) {
                    writeln!(out, "  {}", engine.describe(entry))?;
                }
            }
        }
        Commands::Config => {
            let tuning = engine.fretboard().tuning();
            let config = EngineConfig {
                instrument_tuning: tuning.names().iter().map(|s| s.to_string()).collect(),
                max_fret: engine.fretboard().max_fret(),
                chord_catalog: engine
                    .catalog()
                    .types()
                    .iter()
                    .filter(|t| t.kind == ChordKind::Chord)
                    .map(|t| (t.name.clone(), t.offsets.clone()))
                    .collect(),
                scale_catalog: engine
                    .catalog()
                    .types()
                    .iter()
                    .filter(|t| t.kind == ChordKind::Scale)
                    .map(|t| (t.name.clone(), t.offsets.clone()))
                    .collect(),
                interval_catalog: engine.intervals().entries().iter().cloned().collect(),
            };
            writeln!(out, "{}", config.to_json_pretty()?)?;
        }
        Commands::Quiz {
            mode,
            root,
            chord_type,
            scale,
            seed,
        } => {
            let rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let mut session = Session::new(engine, rng)?;
            if let Some(root) = root {
                session.set_root(&root)?;
            }
            if let Some(chord_type) = chord_type {
                session.set_chord_type(&chord_type)?;
            }
            if let Some(scale) = scale {
                session.set_scale_type(&scale)?;
            }
            session.set_mode(mode.into())?;

            info!("[MAIN] Starting quiz in {} mode", session.mode());
            let mut app = QuizApp::new(engine, session);
            app.render(out)?;
            quiz_loop(&mut app, io::stdin().lock(), out)?;
        }
    }
    Ok(())
}

/// Feeds input lines to the app until EOF or `quit`.
fn quiz_loop<R, I, W>(app: &mut QuizApp<'_, R>, input: I, out: &mut W) -> Result<()>
where
    R: rand::Rng,
    I: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line.context("failed to read input")?;
        let message = match line.parse::<Message>() {
            Ok(message) => message,
            Err(e) => {
                writeln!(out, "error: {e:#}")?;
                continue;
            }
        };
        if app.update(message, out)? == Flow::Exit {
            break;
        }
    }
    info!("[MAIN] Quiz finished");
    Ok(())
}
