//! Top-level postseason bracket and its phase machine
//!
//! ## Phases
//!
//! `NotStarted -> PlayIn -> FirstRound -> ConferenceSemis -> ConferenceFinals
//! -> Finals -> Complete`
//!
//! A phase is only left through [`PlayoffBracket::try_advance_round`], and only
//! once its round is decided in both conferences. Each transition builds the
//! next round for both conferences in one step or not at all.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::conference::ConferenceBracket;
use crate::error::{PostseasonError, Result};
use crate::play_in::{PlayInGame, PlayInGameType, PlayInTournament};
use crate::series::{PlayoffGame, PlayoffSeries, SeriesId, SeriesRound};
use crate::team::{Conference, SeededTeam, Slot, Standings, TeamId};

/// Stage of the postseason
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayoffPhase {
    NotStarted,
    PlayIn,
    FirstRound,
    ConferenceSemis,
    ConferenceFinals,
    Finals,
    Complete,
}

impl PlayoffPhase {
    /// Series round played during this phase
    pub fn series_round(self) -> Option<SeriesRound> {
        match self {
            PlayoffPhase::FirstRound => Some(SeriesRound::FirstRound),
            PlayoffPhase::ConferenceSemis => Some(SeriesRound::ConferenceSemis),
            PlayoffPhase::ConferenceFinals => Some(SeriesRound::ConferenceFinals),
            PlayoffPhase::Finals => Some(SeriesRound::Finals),
            PlayoffPhase::NotStarted | PlayoffPhase::PlayIn | PlayoffPhase::Complete => None,
        }
    }
}

/// Order the two conference champions for the Finals
///
/// More accumulated playoff wins takes home court. This compares playoff
/// wins, not regular-season record. Ties go to the lower seed number, then
/// to the East.
pub fn seed_finals(
    east: SeededTeam,
    east_wins: u32,
    west: SeededTeam,
    west_wins: u32,
) -> (SeededTeam, SeededTeam) {
    let east_first = match east_wins.cmp(&west_wins) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => east.seed <= west.seed,
    };
    if east_first {
        (east, west)
    } else {
        (west, east)
    }
}

/// A full postseason: play-in, both conferences, and the Finals
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffBracket {
    season: String,
    phase: PlayoffPhase,
    play_in: PlayInTournament,
    east: ConferenceBracket,
    west: ConferenceBracket,
    finals: Option<PlayoffSeries>,
    champion: Slot,
    runner_up: Slot,
}

impl PlayoffBracket {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    pub fn new(season: impl Into<String>) -> Self {
        Self {
            season: season.into(),
            phase: PlayoffPhase::NotStarted,
            play_in: PlayInTournament::new(),
            east: ConferenceBracket::new(Conference::East),
            west: ConferenceBracket::new(Conference::West),
            finals: None,
            champion: Slot::Unresolved,
            runner_up: Slot::Unresolved,
        }
    }

    /// Seed both conferences and open the play-in
    pub fn initialize(&mut self, east: &Standings, west: &Standings) -> Result<()> {
        self.expect_phase(PlayoffPhase::NotStarted)?;

        let mut play_in = PlayInTournament::new();
        play_in.initialize(east, west)?;
        let mut east_bracket = ConferenceBracket::new(Conference::East);
        east_bracket.initialize(east)?;
        let mut west_bracket = ConferenceBracket::new(Conference::West);
        west_bracket.initialize(west)?;

        self.play_in = play_in;
        self.east = east_bracket;
        self.west = west_bracket;
        self.enter(PlayoffPhase::PlayIn);
        Ok(())
    }

    /// Load a saved bracket from JSON
    ///
    /// A file that parses but breaks the bracket rules is rejected.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let bracket: Self = serde_json::from_str(&content)?;
        bracket.validate()?;
        Ok(bracket)
    }

    /// Save as pretty JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    // ========================================================================
    // PHASE MACHINE
    // ========================================================================

    /// Move to the next phase if the current one is finished
    ///
    /// Returns `Ok(false)` without changing anything when the current phase
    /// still has games to play.
    pub fn try_advance_round(&mut self) -> Result<bool> {
        match self.phase {
            PlayoffPhase::NotStarted | PlayoffPhase::Complete => Ok(false),
            PlayoffPhase::PlayIn => self.finish_play_in(),
            PlayoffPhase::FirstRound => self.advance_conferences(
                SeriesRound::FirstRound,
                ConferenceBracket::setup_conference_semis,
                PlayoffPhase::ConferenceSemis,
            ),
            PlayoffPhase::ConferenceSemis => self.advance_conferences(
                SeriesRound::ConferenceSemis,
                ConferenceBracket::setup_conference_finals,
                PlayoffPhase::ConferenceFinals,
            ),
            PlayoffPhase::ConferenceFinals => self.start_finals(),
            PlayoffPhase::Finals => self.finish_finals(),
        }
    }

    fn finish_play_in(&mut self) -> Result<bool> {
        if !self.play_in.is_complete() {
            return Ok(false);
        }

        let mut east = self.east.clone();
        let mut west = self.west.clone();
        for bracket in [&mut east, &mut west] {
            let play_in = self.play_in.bracket(bracket.conference());
            let (Some(seed7), Some(seed8)) = (play_in.seven_seed().team(), play_in.eight_seed().team())
            else {
                return Ok(false);
            };
            bracket.set_play_in_results(seed7, seed8)?;
        }

        self.east = east;
        self.west = west;
        self.enter(PlayoffPhase::FirstRound);
        Ok(true)
    }

    /// Build the next round in both conferences once `round` is done in both
    fn advance_conferences(
        &mut self,
        round: SeriesRound,
        build_next: fn(&mut ConferenceBracket) -> Result<()>,
        next: PlayoffPhase,
    ) -> Result<bool> {
        if !(self.east.is_round_complete(round) && self.west.is_round_complete(round)) {
            return Ok(false);
        }

        let mut east = self.east.clone();
        build_next(&mut east)?;
        let mut west = self.west.clone();
        build_next(&mut west)?;

        self.east = east;
        self.west = west;
        self.enter(next);
        Ok(true)
    }

    fn start_finals(&mut self) -> Result<bool> {
        let (Some(east), Some(west)) = (self.east.champion(), self.west.champion()) else {
            return Ok(false);
        };

        let east_wins = self.east.team_total_wins(east.team);
        let west_wins = self.west.team_total_wins(west.team);
        let (higher, lower) = seed_finals(east, east_wins, west, west_wins);
        tracing::debug!(
            "Finals: {} ({} playoff wins) hosts {} ({} playoff wins)",
            higher.team,
            if higher == east { east_wins } else { west_wins },
            lower.team,
            if lower == east { east_wins } else { west_wins }
        );

        self.finals = Some(PlayoffSeries::new(None, SeriesRound::Finals, higher, lower));
        self.enter(PlayoffPhase::Finals);
        Ok(true)
    }

    fn finish_finals(&mut self) -> Result<bool> {
        let Some(finals) = &self.finals else {
            return Ok(false);
        };
        let (Some(champion), Some(runner_up)) = (finals.winner(), finals.loser()) else {
            return Ok(false);
        };

        self.champion = Slot::Team(champion);
        self.runner_up = Slot::Team(runner_up);
        tracing::debug!("Season {} champion: {}", self.season, champion);
        self.enter(PlayoffPhase::Complete);
        Ok(true)
    }

    /// Check that the built rounds, series and champion agree with the phase
    pub fn validate(&self) -> Result<()> {
        let phase = self.phase;
        let inconsistent = |reason| Err(PostseasonError::InconsistentBracket { phase, reason });

        let rounds_built = match phase {
            PlayoffPhase::NotStarted | PlayoffPhase::PlayIn => 0,
            PlayoffPhase::FirstRound => 1,
            PlayoffPhase::ConferenceSemis => 2,
            PlayoffPhase::ConferenceFinals | PlayoffPhase::Finals | PlayoffPhase::Complete => 3,
        };
        self.east.validate(rounds_built, phase)?;
        self.west.validate(rounds_built, phase)?;
        if phase >= PlayoffPhase::Finals
            && !(self.east.is_round_complete(SeriesRound::ConferenceFinals)
                && self.west.is_round_complete(SeriesRound::ConferenceFinals))
        {
            return inconsistent("Finals started before both conferences finished");
        }

        match (&self.finals, phase >= PlayoffPhase::Finals) {
            (Some(finals), true) => {
                if finals.round() != SeriesRound::Finals || finals.conference().is_some() {
                    return inconsistent("Finals series is mislabeled");
                }
                finals.validate()?;
            }
            (None, false) => {}
            _ => return inconsistent("Finals series does not match the phase"),
        }

        let decided = self.finals.as_ref().and_then(|f| Some((f.winner()?, f.loser()?)));
        match (phase, decided) {
            (PlayoffPhase::Complete, Some((champion, runner_up)))
                if self.champion == Slot::Team(champion) && self.runner_up == Slot::Team(runner_up) => {}
            (PlayoffPhase::Complete, _) => return inconsistent("champion does not match the Finals"),
            _ if self.champion.is_resolved() || self.runner_up.is_resolved() => {
                return inconsistent("champion set before the Finals ended")
            }
            _ => {}
        }
        Ok(())
    }

    fn enter(&mut self, next: PlayoffPhase) {
        tracing::debug!("Season {}: {:?} -> {:?}", self.season, self.phase, next);
        self.phase = next;
    }

    fn expect_phase(&self, expected: PlayoffPhase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(PostseasonError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    // ========================================================================
    // RESULT RECORDING
    // ========================================================================

    /// Record a play-in game
    pub fn record_play_in_result(
        &mut self,
        conference: Conference,
        game_type: PlayInGameType,
        higher_score: u32,
        lower_score: u32,
    ) -> Result<&PlayInGame> {
        self.expect_phase(PlayoffPhase::PlayIn)?;
        self.play_in
            .record_game_result(conference, game_type, higher_score, lower_score)
            .inspect_err(|e| tracing::warn!("Rejected play-in result: {}", e))
    }

    /// Record a game of a series in the current round
    pub fn record_series_result(
        &mut self,
        id: &SeriesId,
        game_number: u8,
        home_score: u32,
        away_score: u32,
    ) -> Result<&PlayoffGame> {
        self.active_series_mut(id)?
            .record_game_result(game_number, home_score, away_score)
            .inspect_err(|e| tracing::warn!("Rejected result for {}: {}", id, e))
    }

    /// Schedule the next game of a series in the current round
    ///
    /// `Ok(None)` once that series is decided.
    pub fn create_next_game(
        &mut self,
        id: &SeriesId,
        date: Option<NaiveDate>,
    ) -> Result<Option<&PlayoffGame>> {
        Ok(self.active_series_mut(id)?.create_next_game(date))
    }

    fn active_series_mut(&mut self, id: &SeriesId) -> Result<&mut PlayoffSeries> {
        if self.series(id).is_none() {
            return Err(PostseasonError::UnknownSeries(*id));
        }
        if self.phase.series_round() != Some(id.round) {
            return Err(PostseasonError::SeriesNotActive(*id));
        }
        let series = match id.conference {
            Some(conference) => self.conference_mut(conference).series_mut(id),
            None => self.finals.as_mut(),
        };
        series.ok_or(PostseasonError::UnknownSeries(*id))
    }

    fn conference_mut(&mut self, conference: Conference) -> &mut ConferenceBracket {
        match conference {
            Conference::East => &mut self.east,
            Conference::West => &mut self.west,
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn season(&self) -> &str {
        &self.season
    }

    pub fn phase(&self) -> PlayoffPhase {
        self.phase
    }

    pub fn play_in(&self) -> &PlayInTournament {
        &self.play_in
    }

    pub fn conference(&self, conference: Conference) -> &ConferenceBracket {
        match conference {
            Conference::East => &self.east,
            Conference::West => &self.west,
        }
    }

    pub fn finals(&self) -> Option<&PlayoffSeries> {
        self.finals.as_ref()
    }

    pub fn series(&self, id: &SeriesId) -> Option<&PlayoffSeries> {
        match id.conference {
            Some(conference) => self.conference(conference).series(id),
            None => self.finals.as_ref().filter(|s| s.id() == *id),
        }
    }

    /// Every series built so far: East, West, then the Finals
    pub fn all_series(&self) -> Vec<&PlayoffSeries> {
        self.east
            .all_series()
            .chain(self.west.all_series())
            .chain(self.finals.iter())
            .collect()
    }

    /// Series that still need games
    pub fn active_series(&self) -> Vec<&PlayoffSeries> {
        self.all_series()
            .into_iter()
            .filter(|s| !s.is_complete())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == PlayoffPhase::Complete
    }

    pub fn champion(&self) -> Slot {
        self.champion
    }

    pub fn runner_up(&self) -> Slot {
        self.runner_up
    }

    /// Playoff series wins for a team across the whole bracket
    pub fn team_total_wins(&self, team: TeamId) -> u32 {
        self.all_series().iter().map(|s| s.team_wins(team) as u32).sum()
    }
}
