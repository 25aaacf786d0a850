//! Dronefield CLI - run matches and tournaments between built-in agents.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use dronefield::AgentKind;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::filter::EnvFilter;

/// Dronefield - a deterministic drone zone-control contest
#[derive(Parser, Debug)]
#[command(name = "dronefield")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a single match
    Run {
        /// Agents, one per team (1-4)
        #[arg(short, long, required = true, num_args = 1..=4, value_enum)]
        agents: Vec<AgentKind>,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Drones per team (default: drawn from the seed)
        #[arg(short, long)]
        drones: Option<usize>,

        /// Zones on the field (default: drawn from the seed)
        #[arg(short, long)]
        zones: Option<usize>,

        /// Turns to play (default: 200)
        #[arg(short, long, default_value = "200")]
        turns: u32,

        /// Strategy configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Run mass parallel matches and aggregate statistics
    Tournament {
        /// Agents, one per team (1-4)
        #[arg(short, long, required = true, num_args = 1..=4, value_enum)]
        agents: Vec<AgentKind>,

        /// Number of matches to run (default: 100)
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// Starting seed (increments for each match)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Strategy configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            agents,
            seed,
            drones,
            zones,
            turns,
            config,
            format,
        } => cli::run::execute(&agents, seed, drones, zones, turns, config, format),

        Commands::Tournament {
            agents,
            games,
            seed,
            threads,
            config,
            format,
            progress,
        } => cli::tournament::execute(&agents, games, seed, threads, config, format, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
