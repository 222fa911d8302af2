//! Play-in tournament for seeds 7-10
//!
//! Each conference plays three single games: 7v8 and 9v10 (in any order),
//! then a decider between the 7v8 loser and the 9v10 winner. The 7v8 winner
//! is the conference's 7-seed and the decider winner is its 8-seed.
//!
//! A team keeps its own seed number when it moves into the decider, so an
//! 8-seed that wins 7v8 sends the 7-seed into the decider still carrying 7.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PostseasonError, Result};
use crate::team::{Conference, SeededTeam, Slot, Standings, TeamId};

/// Minimum ranked teams per conference for a play-in
pub const PLAY_IN_MIN_TEAMS: usize = 10;

/// First seed that enters the play-in
const FIRST_PLAY_IN_SEED: u8 = 7;

// ============================================================================
// GAMES
// ============================================================================

/// The three play-in games of a conference
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayInGameType {
    SevenVsEight,
    NineVsTen,
    EightSeedDecider,
}

impl PlayInGameType {
    pub const ALL: [PlayInGameType; 3] = [
        PlayInGameType::SevenVsEight,
        PlayInGameType::NineVsTen,
        PlayInGameType::EightSeedDecider,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PlayInGameType::SevenVsEight => "7v8",
            PlayInGameType::NineVsTen => "9v10",
            PlayInGameType::EightSeedDecider => "8-seed decider",
        }
    }
}

/// Final score of a play-in game, by slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameScore {
    pub higher: u32,
    pub lower: u32,
}

/// A single play-in game; the higher seed slot hosts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayInGame {
    pub conference: Conference,
    pub game_type: PlayInGameType,
    pub higher: Option<SeededTeam>,
    pub lower: Option<SeededTeam>,
    pub score: Option<GameScore>,
    pub date: Option<NaiveDate>,
}

impl PlayInGame {
    fn empty(conference: Conference, game_type: PlayInGameType) -> Self {
        Self {
            conference,
            game_type,
            higher: None,
            lower: None,
            score: None,
            date: None,
        }
    }

    fn between(
        conference: Conference,
        game_type: PlayInGameType,
        higher: SeededTeam,
        lower: SeededTeam,
    ) -> Self {
        Self {
            higher: Some(higher),
            lower: Some(lower),
            ..Self::empty(conference, game_type)
        }
    }

    /// Both participants are known
    pub fn has_teams(&self) -> bool {
        self.higher.is_some() && self.lower.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.score.is_some()
    }

    pub fn home_team(&self) -> Option<TeamId> {
        self.higher.map(|side| side.team)
    }

    pub fn away_team(&self) -> Option<TeamId> {
        self.lower.map(|side| side.team)
    }

    pub fn winner(&self) -> Option<SeededTeam> {
        let score = self.score?;
        if score.higher > score.lower {
            self.higher
        } else {
            self.lower
        }
    }

    pub fn loser(&self) -> Option<SeededTeam> {
        let score = self.score?;
        if score.higher > score.lower {
            self.lower
        } else {
            self.higher
        }
    }
}

// ============================================================================
// CONFERENCE BRACKET
// ============================================================================

/// Progress of a conference play-in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayInState {
    NotInitialized,
    /// 7v8 and/or 9v10 still to play
    FeedersPending,
    DeciderPending,
    Complete,
}

/// One conference's play-in
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayInBracket {
    conference: Conference,
    seven_vs_eight: PlayInGame,
    nine_vs_ten: PlayInGame,
    decider: PlayInGame,
    seven_seed: Slot,
    eight_seed: Slot,
}

impl PlayInBracket {
    pub fn new(conference: Conference) -> Self {
        Self {
            conference,
            seven_vs_eight: PlayInGame::empty(conference, PlayInGameType::SevenVsEight),
            nine_vs_ten: PlayInGame::empty(conference, PlayInGameType::NineVsTen),
            decider: PlayInGame::empty(conference, PlayInGameType::EightSeedDecider),
            seven_seed: Slot::Unresolved,
            eight_seed: Slot::Unresolved,
        }
    }

    /// Seed 7-10 from standings and set up 7v8 and 9v10
    ///
    /// Resets any earlier progress.
    pub fn initialize(&mut self, standings: &Standings) -> Result<()> {
        if standings.len() < PLAY_IN_MIN_TEAMS {
            return Err(PostseasonError::InsufficientStandings {
                conference: self.conference,
                required: PLAY_IN_MIN_TEAMS,
                found: standings.len(),
            });
        }

        let teams = standings.teams();
        let seeded = |seed: u8| SeededTeam::new(teams[seed as usize - 1], seed);
        let conference = self.conference;
        let base = FIRST_PLAY_IN_SEED;

        *self = Self::new(conference);
        self.seven_vs_eight = PlayInGame::between(
            conference,
            PlayInGameType::SevenVsEight,
            seeded(base),
            seeded(base + 1),
        );
        self.nine_vs_ten = PlayInGame::between(
            conference,
            PlayInGameType::NineVsTen,
            seeded(base + 2),
            seeded(base + 3),
        );

        tracing::debug!(
            "{} play-in: {} v {}, {} v {}",
            conference,
            teams[6],
            teams[7],
            teams[8],
            teams[9]
        );
        Ok(())
    }

    pub fn conference(&self) -> Conference {
        self.conference
    }

    pub fn is_initialized(&self) -> bool {
        self.seven_vs_eight.has_teams()
    }

    pub fn game(&self, game_type: PlayInGameType) -> &PlayInGame {
        match game_type {
            PlayInGameType::SevenVsEight => &self.seven_vs_eight,
            PlayInGameType::NineVsTen => &self.nine_vs_ten,
            PlayInGameType::EightSeedDecider => &self.decider,
        }
    }

    fn game_mut(&mut self, game_type: PlayInGameType) -> &mut PlayInGame {
        match game_type {
            PlayInGameType::SevenVsEight => &mut self.seven_vs_eight,
            PlayInGameType::NineVsTen => &mut self.nine_vs_ten,
            PlayInGameType::EightSeedDecider => &mut self.decider,
        }
    }

    /// All three games in play order
    pub fn games(&self) -> [&PlayInGame; 3] {
        [&self.seven_vs_eight, &self.nine_vs_ten, &self.decider]
    }

    /// Game can be played now
    fn is_ready(&self, game_type: PlayInGameType) -> bool {
        match game_type {
            PlayInGameType::SevenVsEight | PlayInGameType::NineVsTen => self.is_initialized(),
            PlayInGameType::EightSeedDecider => {
                self.seven_vs_eight.is_complete() && self.nine_vs_ten.is_complete()
            }
        }
    }

    /// Record a game's final score and move teams along
    pub fn record_game_result(
        &mut self,
        game_type: PlayInGameType,
        higher_score: u32,
        lower_score: u32,
    ) -> Result<&PlayInGame> {
        let conference = self.conference;
        if !self.is_initialized() {
            return Err(PostseasonError::PlayInNotInitialized(conference));
        }
        if self.game(game_type).is_complete() {
            return Err(PostseasonError::PlayInGameAlreadyPlayed {
                conference,
                game: game_type,
            });
        }
        let game = self.game(game_type);
        let (Some(higher), Some(lower)) = (game.higher, game.lower) else {
            return Err(PostseasonError::GameNotReady {
                conference,
                game: game_type,
            });
        };
        if !self.is_ready(game_type) {
            return Err(PostseasonError::GameNotReady {
                conference,
                game: game_type,
            });
        }
        if higher_score == lower_score {
            return Err(PostseasonError::TiedScore(higher_score));
        }

        self.game_mut(game_type).score = Some(GameScore {
            higher: higher_score,
            lower: lower_score,
        });
        let (winner, loser) = if higher_score > lower_score {
            (higher, lower)
        } else {
            (lower, higher)
        };

        match game_type {
            PlayInGameType::SevenVsEight => {
                self.seven_seed = Slot::Team(winner.team);
                self.decider.higher = Some(loser);
                tracing::debug!("{} 7-seed: {} (seed {})", conference, winner.team, winner.seed);
            }
            PlayInGameType::NineVsTen => {
                self.decider.lower = Some(winner);
                tracing::debug!("{} seed {} {} eliminated", conference, loser.seed, loser.team);
            }
            PlayInGameType::EightSeedDecider => {
                self.eight_seed = Slot::Team(winner.team);
                tracing::debug!("{} 8-seed: {} (seed {})", conference, winner.team, winner.seed);
            }
        }

        Ok(self.game(game_type))
    }

    /// Games that can be played now, in play order
    pub fn pending_games(&self) -> Vec<&PlayInGame> {
        PlayInGameType::ALL
            .into_iter()
            .filter(|&t| self.is_ready(t) && !self.game(t).is_complete())
            .map(|t| self.game(t))
            .collect()
    }

    pub fn next_game(&self) -> Option<&PlayInGame> {
        self.pending_games().into_iter().next()
    }

    pub fn state(&self) -> PlayInState {
        if !self.is_initialized() {
            PlayInState::NotInitialized
        } else if self.decider.is_complete() {
            PlayInState::Complete
        } else if self.is_ready(PlayInGameType::EightSeedDecider) {
            PlayInState::DeciderPending
        } else {
            PlayInState::FeedersPending
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == PlayInState::Complete
    }

    pub fn seven_seed(&self) -> Slot {
        self.seven_seed
    }

    pub fn eight_seed(&self) -> Slot {
        self.eight_seed
    }
}

// ============================================================================
// TOURNAMENT
// ============================================================================

/// Both conferences' play-ins
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayInTournament {
    east: PlayInBracket,
    west: PlayInBracket,
}

impl Default for PlayInTournament {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayInTournament {
    pub fn new() -> Self {
        Self {
            east: PlayInBracket::new(Conference::East),
            west: PlayInBracket::new(Conference::West),
        }
    }

    /// Initialize both conferences; on error neither is touched
    pub fn initialize(&mut self, east: &Standings, west: &Standings) -> Result<()> {
        let mut east_bracket = PlayInBracket::new(Conference::East);
        east_bracket.initialize(east)?;
        let mut west_bracket = PlayInBracket::new(Conference::West);
        west_bracket.initialize(west)?;

        self.east = east_bracket;
        self.west = west_bracket;
        Ok(())
    }

    pub fn bracket(&self, conference: Conference) -> &PlayInBracket {
        match conference {
            Conference::East => &self.east,
            Conference::West => &self.west,
        }
    }

    fn bracket_mut(&mut self, conference: Conference) -> &mut PlayInBracket {
        match conference {
            Conference::East => &mut self.east,
            Conference::West => &mut self.west,
        }
    }

    pub fn record_game_result(
        &mut self,
        conference: Conference,
        game_type: PlayInGameType,
        higher_score: u32,
        lower_score: u32,
    ) -> Result<&PlayInGame> {
        self.bracket_mut(conference)
            .record_game_result(game_type, higher_score, lower_score)
    }

    /// Pending games, East first
    pub fn pending_games(&self) -> Vec<&PlayInGame> {
        let mut games = self.east.pending_games();
        games.extend(self.west.pending_games());
        games
    }

    pub fn next_game(&self) -> Option<&PlayInGame> {
        self.east.next_game().or_else(|| self.west.next_game())
    }

    pub fn is_complete(&self) -> bool {
        self.east.is_complete() && self.west.is_complete()
    }
}
