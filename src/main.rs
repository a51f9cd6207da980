//! Shadowops CLI - play, inspect and replay Shadowops campaigns.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use shadowops::{ActionKind, BuildingKind, ObjectiveId};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Shadowops - a deterministic turn-based tactical operations engine
#[derive(Parser, Debug)]
#[command(name = "shadowops")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Save file the game is read from and written back to
    #[arg(short, long, global = true, default_value = "shadowops.json")]
    save: PathBuf,

    /// Log every resolved operation (overrides the environment filter)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a new game, replacing any existing save
    New {
        /// JSON file with a game config (id, resources, objectives)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show resources, base and objectives
    Status {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Execute an operation against an objective
    Op {
        /// Operation: raid, robbery, capture, or destruction
        action: ActionKind,

        /// Target objective id
        objective: ObjectiveId,
    },

    /// Preview odds and expected outcome without executing
    Preview {
        /// Operation: raid, robbery, capture, or destruction
        action: ActionKind,

        /// Target objective id
        objective: ObjectiveId,
    },

    /// Upgrade a base building
    Upgrade {
        /// Building: storage or barracks
        building: BuildingKind,
    },

    /// Recruit units (100 money + 5 food each)
    Recruit {
        /// Number of units
        count: u32,
    },

    /// Buy supplies (ammo 5 money, food 2 money each)
    Buy {
        /// Ammo to buy
        #[arg(short, long, default_value = "0")]
        ammo: u32,

        /// Food to buy
        #[arg(short, long, default_value = "0")]
        food: u32,
    },

    /// Pause the game
    Pause,

    /// Resume a paused game
    Resume,

    /// Run a command script from a fresh game
    Replay {
        /// Script file (JSON)
        #[arg(required = true)]
        script: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Also write the final state to the save file
        #[arg(long)]
        keep: bool,
    },

    /// Check scripts replay deterministically and match their fingerprints
    Verify {
        /// Script files (JSON)
        #[arg(required = true)]
        scripts: Vec<PathBuf>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    let save = args.save.as_path();

    let result = match args.command {
        Commands::New { config } => cli::play::new_game(save, config.as_deref()),
        Commands::Status { format } => cli::play::status(save, format),
        Commands::Op { action, objective } => cli::play::operation(save, action, objective),
        Commands::Preview { action, objective } => cli::play::preview(save, action, objective),
        Commands::Upgrade { building } => cli::play::upgrade(save, building),
        Commands::Recruit { count } => cli::play::recruit(save, count),
        Commands::Buy { ammo, food } => cli::play::buy(save, ammo, food),
        Commands::Pause => cli::play::pause(save),
        Commands::Resume => cli::play::resume(save),
        Commands::Replay {
            script,
            format,
            keep,
        } => cli::replay::execute(&script, format, keep.then_some(save)),
        Commands::Verify {
            scripts,
            threads,
            progress,
        } => cli::verify::execute(&scripts, threads, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
