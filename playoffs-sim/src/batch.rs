//! Batch runs - many seeded postseasons from the same standings
//!
//! Level 1 - Orchestration

use playoffs_core::{PlayoffBracket, Standings, TeamId};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::config::SimConfig;
use crate::runner::{run_postseason, PostseasonSummary, SimError};
use crate::scores::RandomScores;

/// Tallies across a batch of postseasons
#[derive(Clone, Debug, Default)]
pub struct BatchResult {
    /// Postseasons completed
    pub runs: usize,
    /// Titles per team
    pub championships: FxHashMap<TeamId, u32>,
    /// Finals appearances per team
    pub finals_appearances: FxHashMap<TeamId, u32>,
    /// Total games played across all runs
    pub total_games: u64,
}

impl BatchResult {
    fn record(&mut self, summary: &PostseasonSummary) {
        self.runs += 1;
        *self.championships.entry(summary.champion).or_insert(0) += 1;
        *self.finals_appearances.entry(summary.champion).or_insert(0) += 1;
        *self.finals_appearances.entry(summary.runner_up).or_insert(0) += 1;
        self.total_games += summary.total_games() as u64;
    }

    /// Share of runs a team won
    pub fn championship_rate(&self, team: TeamId) -> f32 {
        if self.runs == 0 {
            0.0
        } else {
            self.championships.get(&team).copied().unwrap_or(0) as f32 / self.runs as f32
        }
    }

    /// Average games per postseason
    pub fn avg_games(&self) -> f32 {
        if self.runs == 0 {
            0.0
        } else {
            self.total_games as f32 / self.runs as f32
        }
    }

    /// Teams by titles (descending), ties by team id
    pub fn ranked_champions(&self) -> Vec<(TeamId, u32)> {
        let mut ranked: Vec<(TeamId, u32)> =
            self.championships.iter().map(|(&team, &titles)| (team, titles)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

/// Run `config.runs` postseasons from the same standings
///
/// Run `i` uses seed `base + i`, so a fixed `config.seed` reproduces the
/// whole batch whether it runs in parallel or not.
pub fn run_batch(
    season: &str,
    east: &Standings,
    west: &Standings,
    config: &SimConfig,
) -> Result<BatchResult, SimError> {
    let base_seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(
        "Running {} postseasons (seed={}, parallel={})",
        config.runs,
        base_seed,
        config.parallel
    );

    let run_one = |i: usize| -> Result<PostseasonSummary, SimError> {
        let mut bracket = PlayoffBracket::new(season);
        bracket.initialize(east, west)?;
        let mut scores = RandomScores::new(
            Some(base_seed.wrapping_add(i as u64)),
            config.min_score,
            config.max_score,
        );
        run_postseason(&mut bracket, &mut scores, config.start_date)
    };

    let summaries: Vec<Result<PostseasonSummary, SimError>> = if config.parallel {
        (0..config.runs).into_par_iter().map(run_one).collect()
    } else {
        (0..config.runs).map(run_one).collect()
    };

    let mut result = BatchResult::default();
    for summary in summaries {
        result.record(&summary?);
    }

    tracing::info!(
        "Batch done: {} runs, {:.1} games per postseason",
        result.runs,
        result.avg_games()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standings(first: u32) -> Standings {
        (first..first + 10).map(TeamId).collect()
    }

    #[test]
    fn test_batch_counts_every_run() {
        let config = SimConfig::new(20).with_seed(1).sequential();
        let result = run_batch("2025", &standings(1), &standings(101), &config).unwrap();

        assert_eq!(result.runs, 20);
        assert_eq!(result.championships.values().sum::<u32>(), 20);
        assert_eq!(result.finals_appearances.values().sum::<u32>(), 40);
        // Six play-in games plus at least 15 * 4 series games per run
        assert!(result.avg_games() >= 66.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = SimConfig::new(16).with_seed(5).sequential();
        let parallel = SimConfig::new(16).with_seed(5);

        let a = run_batch("2025", &standings(1), &standings(101), &sequential).unwrap();
        let b = run_batch("2025", &standings(1), &standings(101), &parallel).unwrap();

        assert_eq!(a.ranked_champions(), b.ranked_champions());
        assert_eq!(a.total_games, b.total_games);
    }

    #[test]
    fn test_batch_rejects_short_standings() {
        let short: Standings = (1..=8).map(TeamId).collect();
        let config = SimConfig::new(3).with_seed(1).sequential();
        assert!(matches!(
            run_batch("2025", &short, &standings(101), &config),
            Err(SimError::Postseason(_))
        ));
    }

    #[test]
    fn test_empty_batch() {
        let result = BatchResult::default();
        assert_eq!(result.championship_rate(TeamId(1)), 0.0);
        assert_eq!(result.avg_games(), 0.0);
        assert!(result.ranked_champions().is_empty());
    }
}
