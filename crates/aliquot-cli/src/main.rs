use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "aliquot",
    about = "aliquot — liquid-transfer batching for pipetting robots",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute and print the batch plan for a protocol without executing it
    Plan {
        /// Path to the protocol request JSON
        #[arg(short, long)]
        protocol: PathBuf,
        /// Path to a deck.toml (defaults to the standard deck)
        #[arg(short, long)]
        deck: Option<PathBuf>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Execute a protocol against the simulated backend
    Run {
        /// Path to the protocol request JSON
        #[arg(short, long)]
        protocol: PathBuf,
        /// Path to a deck.toml (defaults to the standard deck)
        #[arg(short, long)]
        deck: Option<PathBuf>,
        /// Print every simulated robot operation
        #[arg(long)]
        ops: bool,
    },
    /// Convert a plate-map CSV into a protocol request JSON
    Convert {
        /// Path to the plate-map CSV (Component column + Volume N columns)
        #[arg(long)]
        csv: PathBuf,
        /// Output path for the protocol JSON
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Deck configuration helpers
    Deck {
        #[command(subcommand)]
        action: DeckAction,
    },
}

#[derive(Subcommand)]
enum DeckAction {
    /// Write a deck.toml scaffold with the standard deck layout
    Init {
        #[arg(short, long, default_value = "deck.toml")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("aliquot=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            protocol,
            deck,
            format,
        } => commands::plan::plan(&protocol, deck.as_deref(), &format),
        Commands::Run {
            protocol,
            deck,
            ops,
        } => commands::run::run(&protocol, deck.as_deref(), ops),
        Commands::Convert { csv, out } => commands::convert::convert(&csv, &out),
        Commands::Deck { action } => match action {
            DeckAction::Init { out } => commands::deck::init(&out),
        },
    }
}
