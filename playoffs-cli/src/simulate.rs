//! Simulate command - play one postseason with random scores
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: open_bracket(), run_postseason(), report
//! - Level 4: argument handling

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;

use playoffs_core::PlayoffBracket;
use playoffs_sim::{run_postseason, RandomScores, DEFAULT_MAX_SCORE, DEFAULT_MIN_SCORE};

use crate::league::{LeagueFile, TeamDirectory};
use crate::report::{print_bracket, print_json_summary};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// League file with conference standings
    #[arg(long, value_name = "FILE", required_unless_present = "resume")]
    pub standings: Option<PathBuf>,

    /// Continue a saved bracket instead of starting a new one
    #[arg(long, value_name = "FILE")]
    pub resume: Option<PathBuf>,

    /// Save the finished bracket as JSON
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,

    /// Date of the first game day (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Lowest random regulation score
    #[arg(long, default_value_t = DEFAULT_MIN_SCORE)]
    pub min_score: u32,

    /// Highest random regulation score
    #[arg(long, default_value_t = DEFAULT_MAX_SCORE)]
    pub max_score: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// 1. Open a new or saved bracket
/// 2. Play it to a champion
/// 3. Save and report
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    let (mut bracket, directory) = open_bracket(&args)?;

    tracing::info!(
        "Simulating {} postseason from {:?}",
        bracket.season(),
        bracket.phase()
    );

    let mut scores = RandomScores::new(seed, args.min_score, args.max_score);
    let summary = run_postseason(&mut bracket, &mut scores, args.start_date)
        .context("Postseason simulation failed")?;

    if let Some(path) = &args.save {
        bracket
            .save(path)
            .with_context(|| format!("Failed to save bracket: {}", path.display()))?;
        tracing::info!("Saved bracket to {}", path.display());
    }

    if args.json {
        print_json_summary(&summary, &directory);
    } else {
        print_bracket(&bracket, &directory);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load a saved bracket or seed a new one from standings
fn open_bracket(args: &SimulateArgs) -> Result<(PlayoffBracket, TeamDirectory)> {
    let league = args
        .standings
        .as_deref()
        .map(LeagueFile::load)
        .transpose()?;
    let directory = league
        .as_ref()
        .map(LeagueFile::directory)
        .unwrap_or_default();

    if let Some(path) = &args.resume {
        let bracket = PlayoffBracket::load(path)
            .with_context(|| format!("Failed to load bracket: {}", path.display()))?;
        return Ok((bracket, directory));
    }

    let league = league.context("--standings is required without --resume")?;
    let mut bracket = PlayoffBracket::new(league.season.clone());
    bracket
        .initialize(&league.east_standings(), &league.west_standings())
        .context("Failed to seed the postseason")?;
    Ok((bracket, directory))
}
