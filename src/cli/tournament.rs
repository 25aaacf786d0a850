//! Tournament command implementation.

use super::output::{
    format_tournament_csv, format_tournament_text, JsonTournamentResult, TournamentStats,
};
use super::{build_agents, load_strategy, seed_or_clock, CliError, TournamentFormat};
use dronefield::agent::AgentKind;
use dronefield::tournament::{run_match, MatchConfig};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if the config or agents are invalid.
#[allow(clippy::needless_pass_by_value, clippy::cast_precision_loss)]
pub(crate) fn execute(
    agents: &[AgentKind],
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    config: Option<PathBuf>,
    format: TournamentFormat,
    progress: bool,
) -> Result<(), CliError> {
    let strategy = load_strategy(config.as_deref())?;
    // Fail fast on a bad roster; every match builds its own fresh agents
    build_agents(agents, &strategy)?;
    let names: Vec<String> = agents.iter().map(|k| k.name().to_string()).collect();

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = seed_or_clock(seed);
    let match_config = MatchConfig::default();
    match_config.validate(agents.len())?;

    let pb = if progress {
        let pb = ProgressBar::new(games);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} matches ({per_sec})")
                .map_err(|e| CliError::new(format!("Bad progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let num_teams = agents.len();

    // Each thread accumulates into its own TournamentStats, merged at the end
    let stats = (0..games)
        .into_par_iter()
        .fold(
            || TournamentStats::new(num_teams),
            |mut local_stats, i| {
                let match_seed = base_seed.wrapping_add(i);
                let outcome = build_agents(agents, &strategy)
                    .map_err(|e| e.to_string())
                    .and_then(|mut players| {
                        run_match(match_seed, &mut players, &match_config).map_err(|e| e.to_string())
                    });
                match outcome {
                    Ok(result) => local_stats.add_result(&result),
                    Err(error) => {
                        warn!(seed = match_seed, %error, "match skipped");
                        local_stats.failures += 1;
                    }
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                local_stats
            },
        )
        .reduce(
            || TournamentStats::new(num_teams),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats, &names));
            println!();
            println!("Duration: {:.2}s ({:.0} matches/sec)", duration.as_secs_f64(), games_per_sec);
        }
        TournamentFormat::Json => {
            let json_result = JsonTournamentResult::from_stats(&stats, &names);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        TournamentFormat::Csv => {
            print!("{}", format_tournament_csv(&stats, &names));
        }
    }

    Ok(())
}
