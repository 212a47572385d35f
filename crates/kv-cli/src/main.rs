//! CLI frontend for the Kaltvik narrative engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "kv",
    about = "Kaltvik: try out the narrative interpretation engine",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a 2d10 skill check
    Check {
        /// Skill level (clamped to 0-10)
        level: i32,

        /// Difficulty to beat
        difficulty: i32,

        /// Fixed dice faces, e.g. "3,4"
        #[arg(long)]
        dice: Option<String>,

        /// RNG seed when no dice are given
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Normalize player text into intents
    Parse {
        /// Raw player input
        text: String,

        /// Content pack whose scene synonyms apply
        #[arg(short, long)]
        content: Option<PathBuf>,

        /// Scene id within the content pack
        #[arg(long)]
        scene: Option<String>,

        /// Engine config JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Parse a condition expression and print its canonical form
    Cond {
        /// Condition source, e.g. "skill(Logic) >= 3 and flag(met_priest)"
        expr: String,

        /// Also print the tagged JSON tree
        #[arg(long)]
        json: bool,
    },

    /// Screen dialogue for lies against held evidence
    Scan {
        /// Dialogue text
        dialogue: String,

        /// Evidence JSON file (array of evidence records)
        #[arg(short, long)]
        evidence: PathBuf,

        /// Level of the gating skill
        #[arg(short, long, default_value = "3")]
        level: i32,

        /// Fixed dice faces for the gating checks
        #[arg(long)]
        dice: Option<String>,

        /// RNG seed when no dice are given
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// List contradictions without rolling
        #[arg(long)]
        ungated: bool,

        /// Engine config JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Render a scene at a given mental state
    Compose {
        /// Content pack JSON
        content: PathBuf,

        /// Scene id
        scene: String,

        #[command(flatten)]
        state: commands::compose::StateArgs,
    },

    /// Load and validate a content pack and optional engine config
    Validate {
        /// Content pack JSON
        content: PathBuf,

        /// Engine config JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Play a content pack interactively
    Play {
        /// Content pack JSON
        content: PathBuf,

        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Lens: believer, skeptic, haunted, neutral
        #[arg(long, default_value = "neutral")]
        lens: String,

        /// Starting skill as Name=level (repeatable)
        #[arg(long = "skill")]
        skills: Vec<String>,

        /// Fixed dice faces for every skill check, e.g. "6,5"
        #[arg(long)]
        dice: Option<String>,

        /// Engine config JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            level,
            difficulty,
            dice,
            seed,
        } => commands::check::run(level, difficulty, dice.as_deref(), seed),
        Commands::Parse {
            text,
            content,
            scene,
            config,
        } => commands::parse::run(&text, content.as_deref(), scene.as_deref(), config.as_deref()),
        Commands::Cond { expr, json } => commands::cond::run(&expr, json),
        Commands::Scan {
            dialogue,
            evidence,
            level,
            dice,
            seed,
            ungated,
            config,
        } => commands::scan::run(
            &dialogue,
            &evidence,
            commands::scan::Gate {
                level,
                dice: dice.as_deref(),
                seed,
                ungated,
            },
            config.as_deref(),
        ),
        Commands::Compose {
            content,
            scene,
            state,
        } => commands::compose::run(&content, &scene, &state),
        Commands::Validate { content, config } => {
            commands::validate::run(&content, config.as_deref())
        }
        Commands::Play {
            content,
            seed,
            lens,
            skills,
            dice,
            config,
        } => commands::play::run(
            &content,
            commands::play::Setup {
                seed,
                lens: &lens,
                skills: &skills,
                dice: dice.as_deref(),
            },
            config.as_deref(),
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
