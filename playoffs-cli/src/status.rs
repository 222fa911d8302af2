//! Status command - print a saved bracket

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use playoffs_core::PlayoffBracket;

use crate::league::{LeagueFile, TeamDirectory};
use crate::report::print_bracket;

#[derive(Args)]
pub struct StatusArgs {
    /// Saved bracket JSON file
    #[arg(long, value_name = "FILE")]
    pub bracket: PathBuf,

    /// League file, used for team names
    #[arg(long, value_name = "FILE")]
    pub standings: Option<PathBuf>,
}

/// Run status command
pub fn run(args: StatusArgs) -> Result<()> {
    let bracket = PlayoffBracket::load(&args.bracket)
        .with_context(|| format!("Failed to load bracket: {}", args.bracket.display()))?;

    let directory = match &args.standings {
        Some(path) => LeagueFile::load(path)?.directory(),
        None => TeamDirectory::default(),
    };

    print_bracket(&bracket, &directory);

    let pending = pending_lines(&bracket, &directory);
    if !pending.is_empty() {
        println!("\nStill to play:");
        for line in pending {
            println!("  {}", line);
        }
    }

    Ok(())
}

/// Undecided series and play-in games that can be played now
fn pending_lines(bracket: &PlayoffBracket, directory: &TeamDirectory) -> Vec<String> {
    let series = bracket.active_series().into_iter().map(|series| {
        format!(
            "{}: {}",
            series.id(),
            series.status_string(|team| directory.abbreviation(team))
        )
    });
    let play_in = bracket
        .play_in()
        .pending_games()
        .into_iter()
        .map(|game| format!("{} play-in {}", game.conference, game.game_type.label()));
    series.chain(play_in).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use playoffs_core::{Conference, PlayInGameType, Standings, TeamId};

    fn started() -> PlayoffBracket {
        let east: Standings = (1..=10).map(TeamId).collect();
        let west: Standings = (11..=20).map(TeamId).collect();
        let mut bracket = PlayoffBracket::new("2025");
        bracket.initialize(&east, &west).unwrap();
        bracket
    }

    #[test]
    fn test_pending_lines_during_play_in() {
        let bracket = started();
        let lines = pending_lines(&bracket, &TeamDirectory::default());
        assert_eq!(
            lines,
            vec![
                "East play-in 7v8",
                "East play-in 9v10",
                "West play-in 7v8",
                "West play-in 9v10",
            ]
        );
    }

    #[test]
    fn test_pending_lines_during_first_round() {
        let mut bracket = started();
        for conference in Conference::ALL {
            for game_type in PlayInGameType::ALL {
                bracket
                    .record_play_in_result(conference, game_type, 100, 90)
                    .unwrap();
            }
        }
        bracket.try_advance_round().unwrap();

        let lines = pending_lines(&bracket, &TeamDirectory::default());
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "East R1 1v8: #1 vs #8");
    }
}
