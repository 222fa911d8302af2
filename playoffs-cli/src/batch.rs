//! Batch command - many seeded postseasons, title counts per team

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use playoffs_sim::{run_batch, BatchResult, SimConfig, DEFAULT_MAX_SCORE, DEFAULT_MIN_SCORE};

use crate::league::{LeagueFile, TeamDirectory};

#[derive(Args)]
pub struct BatchArgs {
    /// League file with conference standings
    #[arg(long, value_name = "FILE")]
    pub standings: PathBuf,

    /// Number of postseasons to run
    #[arg(long, default_value = "1000")]
    pub runs: usize,

    /// Run on a single thread
    #[arg(long)]
    pub no_parallel: bool,

    /// Lowest random regulation score
    #[arg(long, default_value_t = DEFAULT_MIN_SCORE)]
    pub min_score: u32,

    /// Highest random regulation score
    #[arg(long, default_value_t = DEFAULT_MAX_SCORE)]
    pub max_score: u32,

    /// Teams to list
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run batch command
pub fn run(args: BatchArgs, seed: Option<u64>) -> Result<()> {
    let league = LeagueFile::load(&args.standings)?;
    let config = build_config(&args, seed);

    let result = run_batch(
        &league.season,
        &league.east_standings(),
        &league.west_standings(),
        &config,
    )
    .context("Batch simulation failed")?;

    let directory = league.directory();
    if args.json {
        print_json_results(&result, &directory, args.top);
    } else {
        print_text_results(&result, &directory, args.top);
    }
    Ok(())
}

fn build_config(args: &BatchArgs, seed: Option<u64>) -> SimConfig {
    let mut config = SimConfig::new(args.runs).with_score_range(args.min_score, args.max_score);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if args.no_parallel {
        config = config.sequential();
    }
    config
}

fn print_json_results(result: &BatchResult, directory: &TeamDirectory, top: usize) {
    #[derive(serde::Serialize)]
    struct JsonTeam {
        team: String,
        titles: u32,
        finals: u32,
        title_rate: f32,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        runs: usize,
        avg_games: f32,
        teams: Vec<JsonTeam>,
    }

    let output = JsonOutput {
        runs: result.runs,
        avg_games: result.avg_games(),
        teams: result
            .ranked_champions()
            .into_iter()
            .take(top)
            .map(|(team, titles)| JsonTeam {
                team: directory.name(team),
                titles,
                finals: result.finals_appearances.get(&team).copied().unwrap_or(0),
                title_rate: result.championship_rate(team),
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text_results(result: &BatchResult, directory: &TeamDirectory, top: usize) {
    println!("\n=== Batch Results ===");
    println!("Postseasons:  {}", result.runs);
    println!("Avg games:    {:.1}", result.avg_games());
    println!("\nTitles:");
    for (team, titles) in result.ranked_champions().into_iter().take(top) {
        println!(
            "  {:<24} {:>5} ({:.1}%), {} Finals",
            directory.name(team),
            titles,
            result.championship_rate(team) * 100.0,
            result.finals_appearances.get(&team).copied().unwrap_or(0)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> BatchArgs {
        BatchArgs {
            standings: PathBuf::from("league.json"),
            runs: 50,
            no_parallel: true,
            min_score: 90,
            max_score: 120,
            top: 5,
            json: false,
        }
    }

    #[test]
    fn test_build_config() {
        let config = build_config(&args(), Some(3));
        assert_eq!(config.runs, 50);
        assert_eq!(config.seed, Some(3));
        assert!(!config.parallel);
        assert_eq!((config.min_score, config.max_score), (90, 120));
    }

    #[test]
    fn test_build_config_without_seed() {
        let mut args = args();
        args.no_parallel = false;
        let config = build_config(&args, None);
        assert_eq!(config.seed, None);
        assert!(config.parallel);
    }
}
