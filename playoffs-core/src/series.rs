//! Best-of-seven playoff series
//!
//! A series tracks one game record per played (or scheduled) game and a win
//! counter per side. Home court follows a fixed 2-2-1-1-1 template keyed by
//! game number, so the host of any game is known before it is played.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PostseasonError, Result};
use crate::team::{Conference, SeededTeam, TeamId};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Wins needed to take a series
pub const GAMES_TO_WIN: u8 = 4;

/// Maximum games in a series
pub const MAX_GAMES: u8 = 7;

/// Home court by game index: `true` means the higher seed hosts
pub const HOME_COURT_PATTERN: [bool; MAX_GAMES as usize] =
    [true, true, false, false, true, false, true];

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Playoff round a series belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeriesRound {
    FirstRound,
    ConferenceSemis,
    ConferenceFinals,
    Finals,
}

impl SeriesRound {
    pub fn short_name(self) -> &'static str {
        match self {
            SeriesRound::FirstRound => "R1",
            SeriesRound::ConferenceSemis => "Semis",
            SeriesRound::ConferenceFinals => "CF",
            SeriesRound::Finals => "Finals",
        }
    }
}

/// Identifies a series within one bracket
///
/// Seed pairs are unique per conference and round, so the seeds double as
/// the key. Finals carry no conference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesId {
    pub conference: Option<Conference>,
    pub round: SeriesRound,
    pub higher_seed: u8,
    pub lower_seed: u8,
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(conference) = self.conference {
            write!(f, "{} ", conference)?;
        }
        write!(
            f,
            "{} {}v{}",
            self.round.short_name(),
            self.higher_seed,
            self.lower_seed
        )
    }
}

// ============================================================================
// GAMES
// ============================================================================

/// One game of a series
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffGame {
    pub series_id: SeriesId,
    /// 1-based game number
    pub game_number: u8,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub date: Option<NaiveDate>,
}

impl PlayoffGame {
    fn scheduled(
        series_id: SeriesId,
        game_number: u8,
        home_team: TeamId,
        away_team: TeamId,
        date: Option<NaiveDate>,
    ) -> Self {
        Self {
            series_id,
            game_number,
            home_team,
            away_team,
            home_score: None,
            away_score: None,
            date,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }

    pub fn winner(&self) -> Option<TeamId> {
        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) if home > away => Some(self.home_team),
            (Some(_), Some(_)) => Some(self.away_team),
            _ => None,
        }
    }

    pub fn loser(&self) -> Option<TeamId> {
        let winner = self.winner()?;
        Some(if winner == self.home_team {
            self.away_team
        } else {
            self.home_team
        })
    }
}

// ============================================================================
// SERIES
// ============================================================================

/// Best-of-seven series between two seeded teams
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffSeries {
    id: SeriesId,
    higher: SeededTeam,
    lower: SeededTeam,
    higher_wins: u8,
    lower_wins: u8,
    /// Scheduled or played games, ordered by game number
    games: Vec<PlayoffGame>,
}

impl PlayoffSeries {
    /// Create a series; `higher` holds home-court advantage
    pub fn new(
        conference: Option<Conference>,
        round: SeriesRound,
        higher: SeededTeam,
        lower: SeededTeam,
    ) -> Self {
        let id = SeriesId {
            conference,
            round,
            higher_seed: higher.seed,
            lower_seed: lower.seed,
        };
        Self {
            id,
            higher,
            lower,
            higher_wins: 0,
            lower_wins: 0,
            games: Vec::new(),
        }
    }

    pub fn id(&self) -> SeriesId {
        self.id
    }

    pub fn round(&self) -> SeriesRound {
        self.id.round
    }

    pub fn conference(&self) -> Option<Conference> {
        self.id.conference
    }

    pub fn higher(&self) -> SeededTeam {
        self.higher
    }

    pub fn lower(&self) -> SeededTeam {
        self.lower
    }

    pub fn higher_wins(&self) -> u8 {
        self.higher_wins
    }

    pub fn lower_wins(&self) -> u8 {
        self.lower_wins
    }

    pub fn games(&self) -> &[PlayoffGame] {
        &self.games
    }

    /// Completed games so far
    pub fn games_played(&self) -> u8 {
        self.higher_wins + self.lower_wins
    }

    /// Host of a game; numbers outside 1-7 fall back to the higher seed
    pub fn home_team_for_game(&self, game_number: u8) -> TeamId {
        match game_number {
            1..=MAX_GAMES if !HOME_COURT_PATTERN[game_number as usize - 1] => self.lower.team,
            _ => self.higher.team,
        }
    }

    fn away_team_for_game(&self, game_number: u8) -> TeamId {
        if self.home_team_for_game(game_number) == self.higher.team {
            self.lower.team
        } else {
            self.higher.team
        }
    }

    /// Record the final score of a game
    ///
    /// Only the next game in sequence can be recorded, and only once.
    pub fn record_game_result(
        &mut self,
        game_number: u8,
        home_score: u32,
        away_score: u32,
    ) -> Result<&PlayoffGame> {
        if !(1..=MAX_GAMES).contains(&game_number) {
            return Err(PostseasonError::InvalidGameNumber(game_number));
        }
        if self.is_complete() {
            return Err(PostseasonError::SeriesAlreadyComplete(self.id));
        }
        if self
            .games
            .iter()
            .any(|g| g.game_number == game_number && g.is_complete())
        {
            return Err(PostseasonError::GameAlreadyPlayed {
                series: self.id,
                game: game_number,
            });
        }
        let expected = self.games_played() + 1;
        if game_number != expected {
            return Err(PostseasonError::GameOutOfOrder {
                expected,
                got: game_number,
            });
        }
        if home_score == away_score {
            return Err(PostseasonError::TiedScore(home_score));
        }

        let idx = self.game_slot(game_number, None);
        let game = &mut self.games[idx];
        game.home_score = Some(home_score);
        game.away_score = Some(away_score);

        let winner = if home_score > away_score {
            game.home_team
        } else {
            game.away_team
        };
        if winner == self.higher.team {
            self.higher_wins += 1;
        } else {
            self.lower_wins += 1;
        }

        tracing::debug!(
            "{} game {}: {} {} - {} {} (series {}-{})",
            self.id,
            game_number,
            self.games[idx].home_team,
            home_score,
            away_score,
            self.games[idx].away_team,
            self.higher_wins,
            self.lower_wins
        );

        Ok(&self.games[idx])
    }

    /// Schedule the next game, or `None` once the series is decided
    ///
    /// Calling again before the game is played returns the same game.
    pub fn create_next_game(&mut self, date: Option<NaiveDate>) -> Option<&PlayoffGame> {
        if self.is_complete() {
            return None;
        }
        let idx = self.game_slot(self.games_played() + 1, date);
        Some(&self.games[idx])
    }

    /// Index of the record for `game_number`, creating it if needed
    fn game_slot(&mut self, game_number: u8, date: Option<NaiveDate>) -> usize {
        if let Some(idx) = self.games.iter().position(|g| g.game_number == game_number) {
            if date.is_some() {
                self.games[idx].date = date;
            }
            return idx;
        }
        let game = PlayoffGame::scheduled(
            self.id,
            game_number,
            self.home_team_for_game(game_number),
            self.away_team_for_game(game_number),
            date,
        );
        self.games.push(game);
        self.games.len() - 1
    }

    /// Check a series read from disk against the rules recording enforces
    ///
    /// Games must run 1, 2, 3... with the 2-2-1-1-1 hosts, only the last one
    /// may be unplayed, and the win counters must match the game results.
    pub fn validate(&self) -> Result<()> {
        let corrupt = |reason| {
            Err(PostseasonError::CorruptSeries {
                series: self.id,
                reason,
            })
        };

        if self.id.higher_seed != self.higher.seed || self.id.lower_seed != self.lower.seed {
            return corrupt("id does not match the seeds");
        }
        if self.higher_wins > GAMES_TO_WIN || self.lower_wins > GAMES_TO_WIN {
            return corrupt("more than four wins");
        }
        if self.higher_wins == GAMES_TO_WIN && self.lower_wins == GAMES_TO_WIN {
            return corrupt("both sides have four wins");
        }
        if self.games.len() > MAX_GAMES as usize {
            return corrupt("more than seven games");
        }

        let (mut higher, mut lower) = (0u8, 0u8);
        for (idx, game) in self.games.iter().enumerate() {
            let number = idx as u8 + 1;
            if game.series_id != self.id || game.game_number != number {
                return corrupt("games out of sequence");
            }
            if game.home_team != self.home_team_for_game(number)
                || game.away_team != self.away_team_for_game(number)
            {
                return corrupt("wrong host");
            }
            if higher == GAMES_TO_WIN || lower == GAMES_TO_WIN {
                return corrupt("game after the series was decided");
            }
            match (game.home_score, game.away_score) {
                (Some(home), Some(away)) if home == away => return corrupt("tied game"),
                (Some(_), Some(_)) => {
                    if game.winner() == Some(self.higher.team) {
                        higher += 1;
                    } else {
                        lower += 1;
                    }
                }
                (None, None) if idx + 1 == self.games.len() => {}
                (None, None) => return corrupt("unplayed game before a played one"),
                _ => return corrupt("partial score"),
            }
        }

        if (higher, lower) != (self.higher_wins, self.lower_wins) {
            return corrupt("win counters disagree with game results");
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.higher_wins == GAMES_TO_WIN || self.lower_wins == GAMES_TO_WIN
    }

    /// Winning side with the seed it carried
    pub fn winning_side(&self) -> Option<SeededTeam> {
        if self.higher_wins == GAMES_TO_WIN {
            Some(self.higher)
        } else if self.lower_wins == GAMES_TO_WIN {
            Some(self.lower)
        } else {
            None
        }
    }

    pub fn winner(&self) -> Option<TeamId> {
        self.winning_side().map(|side| side.team)
    }

    pub fn winner_seed(&self) -> Option<u8> {
        self.winning_side().map(|side| side.seed)
    }

    pub fn loser(&self) -> Option<TeamId> {
        let winner = self.winner()?;
        Some(if winner == self.higher.team {
            self.lower.team
        } else {
            self.higher.team
        })
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.higher.team == team || self.lower.team == team
    }

    /// Wins for a team; zero if it is not in this series
    pub fn team_wins(&self, team: TeamId) -> u8 {
        if team == self.higher.team {
            self.higher_wins
        } else if team == self.lower.team {
            self.lower_wins
        } else {
            0
        }
    }

    /// Next game can end the series
    ///
    /// False once the series is decided, so a finished 4-3 series is not
    /// still facing an elimination game.
    pub fn is_elimination_game(&self) -> bool {
        !self.is_complete() && (self.higher_wins == GAMES_TO_WIN - 1 || self.lower_wins == GAMES_TO_WIN - 1)
    }

    pub fn is_game7(&self) -> bool {
        self.higher_wins == GAMES_TO_WIN - 1 && self.lower_wins == GAMES_TO_WIN - 1
    }

    /// Human-readable state such as "BOS leads 3-1"
    pub fn status_string<F>(&self, team_name: F) -> String
    where
        F: Fn(TeamId) -> String,
    {
        let (hw, lw) = (self.higher_wins, self.lower_wins);
        if hw == lw {
            if hw == 0 {
                return format!("{} vs {}", team_name(self.higher.team), team_name(self.lower.team));
            }
            return format!("Series tied {}-{}", hw, lw);
        }

        let (leader, lead, trail) = if hw > lw {
            (self.higher.team, hw, lw)
        } else {
            (self.lower.team, lw, hw)
        };
        let verb = if self.is_complete() { "wins" } else { "leads" };
        format!("{} {} {}-{}", team_name(leader), verb, lead, trail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIGH: TeamId = TeamId(1);
    const LOW: TeamId = TeamId(8);

    fn make_series() -> PlayoffSeries {
        PlayoffSeries::new(
            Some(Conference::East),
            SeriesRound::FirstRound,
            SeededTeam::new(HIGH, 1),
            SeededTeam::new(LOW, 8),
        )
    }

    /// Record a game won by `winner`, whichever side hosts it
    fn win_game(series: &mut PlayoffSeries, winner: TeamId) {
        let n = series.games_played() + 1;
        let (home, away) = if series.home_team_for_game(n) == winner {
            (101, 99)
        } else {
            (99, 101)
        };
        series.record_game_result(n, home, away).unwrap();
    }

    fn name(team: TeamId) -> String {
        match team.0 {
            1 => "BOS".to_string(),
            8 => "MIA".to_string(),
            _ => "???".to_string(),
        }
    }

    #[test]
    fn test_home_court_pattern() {
        let series = make_series();
        for n in [1, 2, 5, 7] {
            assert_eq!(series.home_team_for_game(n), HIGH, "game {}", n);
        }
        for n in [3, 4, 6] {
            assert_eq!(series.home_team_for_game(n), LOW, "game {}", n);
        }
    }

    #[test]
    fn test_home_court_fallback_for_out_of_range() {
        let series = make_series();
        assert_eq!(series.home_team_for_game(0), HIGH);
        assert_eq!(series.home_team_for_game(8), HIGH);
    }

    #[test]
    fn test_sweep() {
        let mut series = make_series();
        for _ in 0..4 {
            win_game(&mut series, HIGH);
        }
        assert!(series.is_complete());
        assert_eq!(series.winner(), Some(HIGH));
        assert_eq!(series.loser(), Some(LOW));
        assert_eq!(series.winner_seed(), Some(1));
        assert_eq!(series.games_played(), 4);
    }

    #[test]
    fn test_win_count_invariant_through_seven_games() {
        let mut series = make_series();
        let order = [LOW, HIGH, LOW, HIGH, LOW, HIGH, HIGH];
        for (i, &winner) in order.iter().enumerate() {
            assert!(!series.is_complete());
            win_game(&mut series, winner);
            let completed = series.games().iter().filter(|g| g.is_complete()).count();
            assert_eq!((series.higher_wins() + series.lower_wins()) as usize, completed);
            assert_eq!(completed, i + 1);
        }
        assert!(series.is_complete());
        assert_eq!(series.higher_wins(), 4);
        assert_eq!(series.lower_wins(), 3);
        assert_eq!(series.winner(), Some(HIGH));
    }

    #[test]
    fn test_road_win_credits_away_team() {
        let mut series = make_series();
        // Game 1 is hosted by the higher seed; the away side wins
        let game = series.record_game_result(1, 90, 100).unwrap();
        assert_eq!(game.winner(), Some(LOW));
        assert_eq!(series.lower_wins(), 1);
        assert_eq!(series.higher_wins(), 0);
    }

    #[test]
    fn test_rejects_invalid_game_number() {
        let mut series = make_series();
        assert_eq!(
            series.record_game_result(0, 100, 90),
            Err(PostseasonError::InvalidGameNumber(0))
        );
        assert_eq!(
            series.record_game_result(8, 100, 90),
            Err(PostseasonError::InvalidGameNumber(8))
        );
        assert_eq!(series.games_played(), 0);
        assert!(series.games().is_empty());
    }

    #[test]
    fn test_rerecording_a_game_is_rejected() {
        let mut series = make_series();
        series.record_game_result(1, 100, 90).unwrap();
        let err = series.record_game_result(1, 80, 95).unwrap_err();
        assert_eq!(
            err,
            PostseasonError::GameAlreadyPlayed {
                series: series.id(),
                game: 1
            }
        );
        assert_eq!(series.higher_wins(), 1);
        assert_eq!(series.lower_wins(), 0);
        assert_eq!(series.games()[0].home_score, Some(100));
    }

    #[test]
    fn test_rejects_out_of_order_game() {
        let mut series = make_series();
        assert_eq!(
            series.record_game_result(3, 100, 90),
            Err(PostseasonError::GameOutOfOrder { expected: 1, got: 3 })
        );
    }

    #[test]
    fn test_rejects_tie() {
        let mut series = make_series();
        assert_eq!(
            series.record_game_result(1, 100, 100),
            Err(PostseasonError::TiedScore(100))
        );
    }

    #[test]
    fn test_rejects_results_after_completion() {
        let mut series = make_series();
        for _ in 0..4 {
            win_game(&mut series, LOW);
        }
        let id = series.id();
        assert_eq!(
            series.record_game_result(5, 100, 90),
            Err(PostseasonError::SeriesAlreadyComplete(id))
        );
        assert_eq!(series.lower_wins(), 4);
    }

    #[test]
    fn test_validate_accepts_recorded_series() {
        let mut series = make_series();
        assert_eq!(series.validate(), Ok(()));
        win_game(&mut series, HIGH);
        win_game(&mut series, LOW);
        series.create_next_game(None);
        assert_eq!(series.validate(), Ok(()));
        for _ in 0..3 {
            win_game(&mut series, HIGH);
        }
        assert_eq!(series.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_tampered_series() {
        let mut series = make_series();
        win_game(&mut series, HIGH);
        win_game(&mut series, LOW);
        let saved = serde_json::to_value(&series).unwrap();

        let tamper = |edit: &dyn Fn(&mut serde_json::Value)| {
            let mut value = saved.clone();
            edit(&mut value);
            let loaded: PlayoffSeries = serde_json::from_value(value).unwrap();
            match loaded.validate() {
                Err(PostseasonError::CorruptSeries { reason, .. }) => reason,
                other => panic!("expected corrupt series, got {:?}", other),
            }
        };

        assert_eq!(
            tamper(&|v| {
                v["higher_wins"] = serde_json::json!(200);
                v["lower_wins"] = serde_json::json!(100);
            }),
            "more than four wins"
        );
        assert_eq!(
            tamper(&|v| v["higher_wins"] = serde_json::json!(3)),
            "win counters disagree with game results"
        );
        assert_eq!(
            tamper(&|v| v["games"][1]["game_number"] = serde_json::json!(3)),
            "games out of sequence"
        );
        assert_eq!(
            tamper(&|v| v["games"][0]["away_score"] = serde_json::Value::Null),
            "partial score"
        );
    }

    #[test]
    fn test_create_next_game() {
        let mut series = make_series();
        let date = NaiveDate::from_ymd_opt(2025, 4, 19);

        let game = series.create_next_game(date).unwrap();
        assert_eq!(game.game_number, 1);
        assert_eq!(game.home_team, HIGH);
        assert_eq!(game.away_team, LOW);
        assert!(!game.is_complete());

        // Same pending game comes back until it is played
        let again = series.create_next_game(None).unwrap();
        assert_eq!(again.game_number, 1);
        assert_eq!(again.date, date);
        assert_eq!(series.games().len(), 1);

        win_game(&mut series, HIGH);
        win_game(&mut series, HIGH);
        let game = series.create_next_game(None).unwrap();
        assert_eq!(game.game_number, 3);
        assert_eq!(game.home_team, LOW);
        assert_eq!(series.games()[0].date, date);
    }

    #[test]
    fn test_create_next_game_none_when_complete() {
        let mut series = make_series();
        for _ in 0..4 {
            win_game(&mut series, HIGH);
        }
        assert!(series.create_next_game(None).is_none());
    }

    #[test]
    fn test_elimination_and_game7() {
        let mut series = make_series();
        for winner in [HIGH, HIGH, HIGH] {
            win_game(&mut series, winner);
        }
        assert!(series.is_elimination_game());
        assert!(!series.is_game7());

        for winner in [LOW, LOW, LOW] {
            win_game(&mut series, winner);
        }
        assert!(series.is_elimination_game());
        assert!(series.is_game7());

        win_game(&mut series, LOW);
        assert!(!series.is_elimination_game());
        assert_eq!(series.winner(), Some(LOW));
    }

    #[test]
    fn test_team_wins() {
        let mut series = make_series();
        win_game(&mut series, LOW);
        assert_eq!(series.team_wins(LOW), 1);
        assert_eq!(series.team_wins(HIGH), 0);
        assert_eq!(series.team_wins(TeamId(99)), 0);
    }

    #[test]
    fn test_status_string() {
        let mut series = make_series();
        assert_eq!(series.status_string(name), "BOS vs MIA");

        win_game(&mut series, HIGH);
        assert_eq!(series.status_string(name), "BOS leads 1-0");

        win_game(&mut series, LOW);
        assert_eq!(series.status_string(name), "Series tied 1-1");

        for _ in 0..3 {
            win_game(&mut series, LOW);
        }
        assert_eq!(series.status_string(name), "MIA wins 4-1");
    }

    #[test]
    fn test_series_id_display() {
        let series = make_series();
        assert_eq!(series.id().to_string(), "East R1 1v8");

        let finals = PlayoffSeries::new(
            None,
            SeriesRound::Finals,
            SeededTeam::new(HIGH, 2),
            SeededTeam::new(LOW, 1),
        );
        assert_eq!(finals.id().to_string(), "Finals 2v1");
    }
}
