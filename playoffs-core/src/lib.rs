//! Playoffs Core - Postseason tournament engine
//!
//! This crate turns conference standings into a champion:
//! - Best-of-seven series with a fixed home-court template
//! - Per-conference play-in for seeds 7-10
//! - Conference brackets (First Round, Semis, Conference Finals)
//! - The top-level bracket and its phase machine, including the Finals
//!
//! The engine never decides games. Scores come from the caller, one game at a
//! time, and the bracket only sequences and records them.

pub mod bracket;
pub mod conference;
pub mod error;
pub mod play_in;
pub mod series;
pub mod team;

// Re-exports for convenient access
pub use bracket::{seed_finals, PlayoffBracket, PlayoffPhase};
pub use conference::{ConferenceBracket, FIRST_ROUND_PAIRINGS};
pub use error::{PostseasonError, Result};
pub use play_in::{GameScore, PlayInBracket, PlayInGame, PlayInGameType, PlayInState, PlayInTournament};
pub use series::{PlayoffGame, PlayoffSeries, SeriesId, SeriesRound, HOME_COURT_PATTERN};
pub use team::{Conference, SeededTeam, Slot, Standings, TeamId};
