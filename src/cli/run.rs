//! Run command implementation.

use super::output::{format_text, JsonMatchResult};
use super::{build_agents, load_strategy, seed_or_clock, CliError, OutputFormat};
use dronefield::agent::AgentKind;
use dronefield::tournament::{run_match, MatchConfig};
use std::path::PathBuf;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the match fails to run.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(
    agents: &[AgentKind],
    seed: Option<u64>,
    drones: Option<usize>,
    zones: Option<usize>,
    turns: u32,
    config: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let strategy = load_strategy(config.as_deref())?;
    let mut players = build_agents(agents, &strategy)?;
    let seed = seed_or_clock(seed);

    let mut match_config = MatchConfig {
        turns,
        ..MatchConfig::default()
    };
    if let Some(d) = drones {
        match_config.min_drones = d;
        match_config.max_drones = d;
    }
    if let Some(z) = zones {
        match_config.min_zones = z;
        match_config.max_zones = z;
    }

    let result = run_match(seed, &mut players, &match_config)?;

    match format {
        OutputFormat::Text => {
            print!("{}", format_text(&result));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonMatchResult::from_match_result(&result))
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
