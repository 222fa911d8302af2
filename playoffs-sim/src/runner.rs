//! Postseason runner - drives a bracket to a champion
//!
//! Level 1 - Orchestration and Level 2 - Phases
//!
//! The runner plays one "slate" per game day: every pending play-in game, or
//! the next game of every active series. After each slate it asks the bracket
//! to advance. A bracket that is already part-way through (for example one
//! loaded from disk) simply picks up where it stopped.

use chrono::{Days, NaiveDate};
use playoffs_core::{
    Conference, PlayInGameType, PlayoffBracket, PlayoffPhase, PostseasonError, SeriesId, TeamId,
};

use crate::scores::{GameContext, ScoreSource};

/// Errors from driving a bracket
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Postseason(#[from] PostseasonError),

    #[error("bracket made no progress in phase {0:?}")]
    Stalled(PlayoffPhase),
}

/// Outcome of one decided series
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeriesSummary {
    pub id: SeriesId,
    pub winner: TeamId,
    pub loser: TeamId,
    pub winner_wins: u8,
    pub loser_wins: u8,
}

/// Result of a full postseason
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostseasonSummary {
    pub season: String,
    pub champion: TeamId,
    pub runner_up: TeamId,
    /// Play-in games played by this run
    pub play_in_games: u32,
    /// Series games played by this run
    pub series_games: u32,
    /// Every series in bracket order, Finals last
    pub series: Vec<SeriesSummary>,
}

impl PostseasonSummary {
    pub fn total_games(&self) -> u32 {
        self.play_in_games + self.series_games
    }

    /// Finals result
    pub fn finals(&self) -> Option<&SeriesSummary> {
        self.series.last().filter(|s| s.id.conference.is_none())
    }
}

/// Games played in one slate
#[derive(Clone, Copy, Debug, Default)]
struct SlateCount {
    play_in: u32,
    series: u32,
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Play a bracket through to its champion
///
/// The bracket must already be initialized. `start_date` stamps the first
/// slate; each later slate is one day after the previous one.
pub fn run_postseason<S: ScoreSource>(
    bracket: &mut PlayoffBracket,
    source: &mut S,
    start_date: Option<NaiveDate>,
) -> Result<PostseasonSummary, SimError> {
    if bracket.phase() == PlayoffPhase::NotStarted {
        return Err(PostseasonError::WrongPhase {
            expected: PlayoffPhase::PlayIn,
            actual: PlayoffPhase::NotStarted,
        }
        .into());
    }

    let mut totals = SlateCount::default();
    let mut day = 0u64;

    while !bracket.is_complete() {
        let date = start_date.and_then(|d| d.checked_add_days(Days::new(day)));
        let slate = play_slate(bracket, source, date)?;
        let advanced = bracket.try_advance_round()?;
        if slate.play_in + slate.series == 0 && !advanced {
            return Err(SimError::Stalled(bracket.phase()));
        }

        totals.play_in += slate.play_in;
        totals.series += slate.series;
        day += 1;
    }

    summarize(bracket, totals)
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

/// Play one game day for the current phase
fn play_slate<S: ScoreSource>(
    bracket: &mut PlayoffBracket,
    source: &mut S,
    date: Option<NaiveDate>,
) -> Result<SlateCount, SimError> {
    match bracket.phase() {
        PlayoffPhase::PlayIn => Ok(SlateCount {
            play_in: play_in_slate(bracket, source)?,
            series: 0,
        }),
        PlayoffPhase::FirstRound
        | PlayoffPhase::ConferenceSemis
        | PlayoffPhase::ConferenceFinals
        | PlayoffPhase::Finals => Ok(SlateCount {
            play_in: 0,
            series: series_slate(bracket, source, date)?,
        }),
        PlayoffPhase::NotStarted | PlayoffPhase::Complete => Ok(SlateCount::default()),
    }
}

/// Play every play-in game that is ready now
fn play_in_slate<S: ScoreSource>(
    bracket: &mut PlayoffBracket,
    source: &mut S,
) -> Result<u32, SimError> {
    let pending: Vec<(Conference, PlayInGameType, GameContext)> = bracket
        .play_in()
        .pending_games()
        .into_iter()
        .filter_map(|game| {
            let ctx = GameContext {
                home: game.home_team()?,
                away: game.away_team()?,
                round: None,
                game_number: 1,
            };
            Some((game.conference, game.game_type, ctx))
        })
        .collect();

    for (conference, game_type, ctx) in &pending {
        let (home, away) = source.game_score(ctx);
        bracket.record_play_in_result(*conference, *game_type, home, away)?;
    }
    Ok(pending.len() as u32)
}

/// Play the next game of every active series
fn series_slate<S: ScoreSource>(
    bracket: &mut PlayoffBracket,
    source: &mut S,
    date: Option<NaiveDate>,
) -> Result<u32, SimError> {
    let ids: Vec<SeriesId> = bracket.active_series().iter().map(|s| s.id()).collect();
    let mut played = 0;

    for id in &ids {
        let Some(game) = bracket.create_next_game(id, date)? else {
            continue;
        };
        let ctx = GameContext {
            home: game.home_team,
            away: game.away_team,
            round: Some(id.round),
            game_number: game.game_number,
        };
        let (home, away) = source.game_score(&ctx);
        bracket.record_series_result(id, ctx.game_number, home, away)?;
        played += 1;
    }
    Ok(played)
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Build the summary of a completed bracket
fn summarize(bracket: &PlayoffBracket, totals: SlateCount) -> Result<PostseasonSummary, SimError> {
    let (Some(champion), Some(runner_up)) = (bracket.champion().team(), bracket.runner_up().team())
    else {
        return Err(SimError::Stalled(bracket.phase()));
    };

    let series = bracket
        .all_series()
        .into_iter()
        .filter_map(|s| {
            let winner = s.winner()?;
            let loser = s.loser()?;
            Some(SeriesSummary {
                id: s.id(),
                winner,
                loser,
                winner_wins: s.team_wins(winner),
                loser_wins: s.team_wins(loser),
            })
        })
        .collect();

    Ok(PostseasonSummary {
        season: bracket.season().to_string(),
        champion,
        runner_up,
        play_in_games: totals.play_in,
        series_games: totals.series,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::{RandomScores, ScriptedScores};
    use playoffs_core::{SeriesRound, Slot, Standings};

    fn started() -> PlayoffBracket {
        let east: Standings = (1..=10).map(TeamId).collect();
        let west: Standings = (101..=110).map(TeamId).collect();
        let mut bracket = PlayoffBracket::new("2025");
        bracket.initialize(&east, &west).unwrap();
        bracket
    }

    /// Home team always wins
    fn home_wins() -> ScriptedScores<impl FnMut(&GameContext) -> (u32, u32)> {
        ScriptedScores(|_: &GameContext| (105, 100))
    }

    #[test]
    fn test_run_requires_initialized_bracket() {
        let mut bracket = PlayoffBracket::new("2025");
        let result = run_postseason(&mut bracket, &mut home_wins(), None);
        assert!(matches!(
            result,
            Err(SimError::Postseason(PostseasonError::WrongPhase { .. }))
        ));
    }

    #[test]
    fn test_home_team_always_wins() {
        let mut bracket = started();
        let summary = run_postseason(&mut bracket, &mut home_wins(), None).unwrap();

        assert!(bracket.is_complete());
        assert_eq!(summary.play_in_games, 6);
        // Home court wins every game: each series goes seven
        assert_eq!(summary.series_games, 15 * 7);
        assert_eq!(summary.series.len(), 15);
        assert!(summary.series.iter().all(|s| s.winner_wins == 4 && s.loser_wins == 3));

        // Higher seeds win every series, so both 1-seeds reach the Finals
        let finals = summary.finals().unwrap();
        assert_eq!(finals.id.round, SeriesRound::Finals);
        assert_eq!(summary.champion, TeamId(1));
        assert_eq!(summary.runner_up, TeamId(101));
        assert_eq!(bracket.champion(), Slot::Team(TeamId(1)));
    }

    #[test]
    fn test_random_run_is_reproducible() {
        let mut a = started();
        let mut b = started();
        let first = run_postseason(&mut a, &mut RandomScores::new(Some(99), 85, 130), None).unwrap();
        let second = run_postseason(&mut b, &mut RandomScores::new(Some(99), 85, 130), None).unwrap();
        assert_eq!(first, second);
        assert_eq!(a, b);
    }

    #[test]
    fn test_games_are_dated_one_day_per_slate() {
        let mut bracket = started();
        let start = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
        run_postseason(&mut bracket, &mut home_wins(), Some(start)).unwrap();

        // Two play-in days, then game 1 of the First Round
        let first_round = &bracket.conference(Conference::East).round_series(SeriesRound::FirstRound)[0];
        assert_eq!(first_round.games()[0].date, NaiveDate::from_ymd_opt(2025, 4, 17));
        assert_eq!(first_round.games()[6].date, NaiveDate::from_ymd_opt(2025, 4, 23));
    }

    #[test]
    fn test_resume_partial_bracket() {
        let mut bracket = started();
        for conference in Conference::ALL {
            bracket
                .record_play_in_result(conference, PlayInGameType::SevenVsEight, 90, 100)
                .unwrap();
        }

        let summary = run_postseason(&mut bracket, &mut home_wins(), None).unwrap();
        assert_eq!(summary.play_in_games, 4);
        // 8-seed won 7v8, so it holds the 7 slot
        assert_eq!(
            bracket.conference(Conference::East).seed(7),
            Slot::Team(TeamId(8))
        );
    }
}
