//! Output formatting utilities for CLI.

#![allow(clippy::cast_precision_loss)]

use dronefield::tournament::MatchResult;
use serde::Serialize;
use std::fmt::Write;

/// JSON-serializable match result.
#[derive(Debug, Serialize)]
pub(super) struct JsonMatchResult {
    /// Random seed used.
    pub(super) seed: u64,
    /// Winning team ID.
    pub(super) winner: Option<u8>,
    /// Total turns played.
    pub(super) turns_played: u32,
    /// Zones on the field.
    pub(super) zones: usize,
    /// Drones per team.
    pub(super) drones: usize,
    /// Per-team results.
    pub(super) teams: Vec<JsonTeamResult>,
}

/// JSON-serializable team result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTeamResult {
    /// Team ID (0-based).
    pub(super) id: usize,
    /// Agent name.
    pub(super) agent: String,
    /// Final score.
    pub(super) score: u32,
    /// Turns whose orders were rejected.
    pub(super) rejected_turns: u32,
}

impl JsonMatchResult {
    /// Create from a `MatchResult`.
    pub(super) fn from_match_result(result: &MatchResult) -> Self {
        Self {
            seed: result.seed,
            winner: result.winner,
            turns_played: result.turns_played,
            zones: result.zones,
            drones: result.drones,
            teams: result
                .scores
                .iter()
                .enumerate()
                .map(|(id, &score)| JsonTeamResult {
                    id,
                    agent: result.agents.get(id).cloned().unwrap_or_default(),
                    score,
                    rejected_turns: result.rejected_turns.get(id).copied().unwrap_or(0),
                })
                .collect(),
        }
    }
}

/// Format a match result as human-readable text.
pub(super) fn format_text(result: &MatchResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Match Result (seed: {})", result.seed);
    let _ = writeln!(
        output,
        "  Field: {} zones, {} drones per team",
        result.zones, result.drones
    );
    if let Some(winner) = result.winner {
        let name = result
            .agents
            .get(usize::from(winner))
            .map_or("Unknown", String::as_str);
        let _ = writeln!(output, "  Winner: Team {winner} ({name})");
    } else {
        output.push_str("  Winner: none\n");
    }
    let _ = writeln!(output, "  Turns: {}\n", result.turns_played);

    for (i, score) in result.scores.iter().enumerate() {
        let name = result.agents.get(i).map_or("Unknown", String::as_str);
        let _ = write!(output, "  Team {i}: {score} points ({name})");
        if let Some(&rejected) = result.rejected_turns.get(i)
            && rejected > 0
        {
            let _ = write!(output, " [{rejected} turns rejected]");
        }
        output.push('\n');
    }

    output
}

/// Tournament statistics for aggregated results.
#[derive(Debug, Default)]
pub(super) struct TournamentStats {
    /// Total matches played.
    pub(super) games_played: u64,
    /// Matches that could not be played.
    pub(super) failures: u64,
    /// Win count per team, ties counted for the match winner.
    pub(super) wins: Vec<u64>,
    /// Matches whose top score was shared. Each is also one of `wins`.
    pub(super) draws: u64,
    /// Total score per team.
    total_scores: Vec<f64>,
    /// Score sum of squares for std dev calculation.
    score_sq_sums: Vec<f64>,
    /// Rejected turns per team.
    rejected_turns: Vec<u64>,
}

impl TournamentStats {
    /// Create new stats for n teams.
    pub(super) fn new(num_teams: usize) -> Self {
        Self {
            games_played: 0,
            failures: 0,
            wins: vec![0; num_teams],
            draws: 0,
            total_scores: vec![0.0; num_teams],
            score_sq_sums: vec![0.0; num_teams],
            rejected_turns: vec![0; num_teams],
        }
    }

    /// Add a match result to the stats.
    pub(super) fn add_result(&mut self, result: &MatchResult) {
        self.games_played += 1;

        // The match winner takes ties, so wins always add up to matches played
        if let Some(slot) = result
            .winner
            .and_then(|w| self.wins.get_mut(usize::from(w)))
        {
            *slot += 1;
        }
        let top = result.scores.iter().copied().max().unwrap_or(0);
        if result.scores.iter().filter(|&&s| s == top).count() > 1 {
            self.draws += 1;
        }

        for (i, &score) in result.scores.iter().enumerate() {
            if i < self.total_scores.len() {
                let score = f64::from(score);
                self.total_scores[i] += score;
                self.score_sq_sums[i] += score * score;
            }
        }
        for (slot, &rejected) in self.rejected_turns.iter_mut().zip(&result.rejected_turns) {
            *slot += u64::from(rejected);
        }
    }

    /// Merge another thread's stats into these.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.failures += other.failures;
        self.draws += other.draws;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.total_scores.iter_mut().zip(&other.total_scores) {
            *a += b;
        }
        for (a, b) in self.score_sq_sums.iter_mut().zip(&other.score_sq_sums) {
            *a += b;
        }
        for (a, b) in self.rejected_turns.iter_mut().zip(&other.rejected_turns) {
            *a += b;
        }
    }

    /// Get win rate for a team (0.0-1.0).
    pub(super) fn win_rate(&self, team: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(team).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Get average score for a team.
    pub(super) fn avg_score(&self, team: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_scores.get(team).copied().unwrap_or(0.0) / self.games_played as f64
    }

    /// Get score standard deviation for a team.
    pub(super) fn score_std_dev(&self, team: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let n = self.games_played as f64;
        let mean = self.avg_score(team);
        let sq_sum = self.score_sq_sums.get(team).copied().unwrap_or(0.0);
        let variance = (sq_sum / n) - (mean * mean);
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    /// Teams ordered by wins, then average score.
    pub(super) fn ranking(&self) -> Vec<usize> {
        let mut teams: Vec<usize> = (0..self.wins.len()).collect();
        teams.sort_by(|&a, &b| {
            self.wins[b]
                .cmp(&self.wins[a])
                .then(self.avg_score(b).total_cmp(&self.avg_score(a)))
        });
        teams
    }
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Total matches played.
    games_played: u64,
    /// Matches that could not be played.
    failures: u64,
    /// Matches with a shared top score, already counted as a win for the
    /// lowest tied team id.
    draws: u64,
    /// Per-team statistics, best first.
    teams: Vec<JsonTournamentTeam>,
}

/// JSON-serializable per-team tournament stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentTeam {
    /// Team index (0-based).
    team: usize,
    /// Agent name.
    agent: String,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average score.
    avg_score: f64,
    /// Score standard deviation.
    score_std_dev: f64,
    /// Rejected turns across all matches.
    rejected_turns: u64,
}

impl JsonTournamentResult {
    /// Create from stats and agent names.
    pub(super) fn from_stats(stats: &TournamentStats, names: &[String]) -> Self {
        let teams = stats
            .ranking()
            .into_iter()
            .map(|i| JsonTournamentTeam {
                team: i,
                agent: names.get(i).cloned().unwrap_or_default(),
                wins: stats.wins.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
                avg_score: stats.avg_score(i),
                score_std_dev: stats.score_std_dev(i),
                rejected_turns: stats.rejected_turns.get(i).copied().unwrap_or(0),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            failures: stats.failures,
            draws: stats.draws,
            teams,
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats, names: &[String]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Tournament Results ({} matches)", stats.games_played);
    output.push_str("========================================\n\n");

    output.push_str("Ranking:\n");
    for (rank, i) in stats.ranking().into_iter().enumerate() {
        let name = names.get(i).map_or("Unknown", String::as_str);
        let _ = writeln!(
            output,
            "  {}. Team {i} ({name}): {:.1}% ({} wins), avg {:.1} (+/- {:.1})",
            rank + 1,
            stats.win_rate(i) * 100.0,
            stats.wins.get(i).copied().unwrap_or(0),
            stats.avg_score(i),
            stats.score_std_dev(i)
        );
    }
    let draw_rate = if stats.games_played == 0 {
        0.0
    } else {
        stats.draws as f64 / stats.games_played as f64 * 100.0
    };
    let _ = writeln!(
        output,
        "  Shared top scores: {} ({draw_rate:.1}%), won by the lowest tied team id",
        stats.draws
    );
    if stats.failures > 0 {
        let _ = writeln!(output, "  Failed matches: {}", stats.failures);
    }

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats, names: &[String]) -> String {
    let mut output = String::new();

    output.push_str("team,agent,wins,win_rate,avg_score,score_std_dev,rejected_turns\n");

    for (i, name) in names.iter().enumerate() {
        let _ = writeln!(
            output,
            "{i},{name},{},{:.4},{:.2},{:.2},{}",
            stats.wins.get(i).copied().unwrap_or(0),
            stats.win_rate(i),
            stats.avg_score(i),
            stats.score_std_dev(i),
            stats.rejected_turns.get(i).copied().unwrap_or(0)
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(scores: Vec<u32>, winner: u8) -> MatchResult {
        MatchResult {
            seed: 1,
            agents: vec!["task-based".into(), "corner".into()],
            scores,
            winner: Some(winner),
            turns_played: 200,
            rejected_turns: vec![0, 2],
            zones: 4,
            drones: 3,
        }
    }

    #[test]
    fn test_stats_fold_and_merge() {
        let mut a = TournamentStats::new(2);
        a.add_result(&result(vec![300, 100], 0));
        let mut b = TournamentStats::new(2);
        b.add_result(&result(vec![50, 50], 0));
        b.add_result(&result(vec![10, 90], 1));
        a.merge(&b);

        assert_eq!(a.games_played, 3);
        assert_eq!(a.wins, vec![2, 1]);
        assert_eq!(a.draws, 1);
        assert_eq!(a.rejected_turns, vec![0, 6]);
        assert!((a.avg_score(0) - 120.0).abs() < 1e-9);
        assert_eq!(a.ranking(), vec![0, 1]);
    }

    #[test]
    fn test_tied_match_counts_for_its_winner() {
        let mut stats = TournamentStats::new(2);
        stats.add_result(&result(vec![80, 80], 0));
        stats.add_result(&result(vec![80, 80], 0));
        stats.add_result(&result(vec![10, 90], 1));

        assert_eq!(stats.wins, vec![2, 1]);
        assert_eq!(stats.wins.iter().sum::<u64>(), stats.games_played);
        assert_eq!(stats.draws, 2);
        assert!((stats.win_rate(0) - 2.0 / 3.0).abs() < 1e-9);

        let names = vec!["task-based".to_string(), "corner".to_string()];
        let text = format_tournament_text(&stats, &names);
        assert!(text.contains("Team 0 (task-based): 66.7% (2 wins)"));
        assert!(text.contains("Shared top scores: 2"));
        assert!(format_tournament_csv(&stats, &names).contains("0,task-based,2,"));
    }

    #[test]
    fn test_text_and_csv() {
        let r = result(vec![300, 100], 0);
        let text = format_text(&r);
        assert!(text.contains("Winner: Team 0 (task-based)"));
        assert!(text.contains("[2 turns rejected]"));

        let mut stats = TournamentStats::new(2);
        stats.add_result(&r);
        let names = r.agents.clone();
        let csv = format_tournament_csv(&stats, &names);
        assert!(csv.starts_with("team,agent,"));
        assert!(csv.contains("1,corner,0,0.0000,100.00,0.00,2"));
    }
}
