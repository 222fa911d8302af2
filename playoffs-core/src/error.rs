//! Error types for postseason operations

use crate::bracket::PlayoffPhase;
use crate::play_in::PlayInGameType;
use crate::series::{SeriesId, SeriesRound};
use crate::team::Conference;

/// Errors returned when a postseason call is rejected
///
/// A rejected call leaves the bracket exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostseasonError {
    #[error("{conference} standings need at least {required} teams, got {found}")]
    InsufficientStandings {
        conference: Conference,
        required: usize,
        found: usize,
    },

    #[error("game number {0} is outside 1-7")]
    InvalidGameNumber(u8),

    #[error("expected game {expected}, got game {got}")]
    GameOutOfOrder { expected: u8, got: u8 },

    #[error("game {game} of {series} was already played")]
    GameAlreadyPlayed { series: SeriesId, game: u8 },

    #[error("series {0} is already decided")]
    SeriesAlreadyComplete(SeriesId),

    #[error("scores are tied {0}-{0}")]
    TiedScore(u32),

    #[error("{0} play-in bracket is not initialized")]
    PlayInNotInitialized(Conference),

    #[error("{conference} play-in game {game:?} was already played")]
    PlayInGameAlreadyPlayed {
        conference: Conference,
        game: PlayInGameType,
    },

    #[error("{conference} play-in game {game:?} is waiting on earlier games")]
    GameNotReady {
        conference: Conference,
        game: PlayInGameType,
    },

    #[error("{conference} seeds 1-{needed} are not all resolved")]
    SeedsUnresolved { conference: Conference, needed: u8 },

    #[error("{conference} {round:?} is not complete")]
    RoundNotComplete {
        conference: Conference,
        round: SeriesRound,
    },

    #[error("{conference} {round:?} was already built")]
    RoundAlreadyBuilt {
        conference: Conference,
        round: SeriesRound,
    },

    #[error("bracket is in phase {actual:?}, expected {expected:?}")]
    WrongPhase {
        expected: PlayoffPhase,
        actual: PlayoffPhase,
    },

    #[error("no series {0} in this bracket")]
    UnknownSeries(SeriesId),

    #[error("series {0} is not part of the current round")]
    SeriesNotActive(SeriesId),

    #[error("series {series} is corrupt: {reason}")]
    CorruptSeries {
        series: SeriesId,
        reason: &'static str,
    },

    #[error("bracket in phase {phase:?} is inconsistent: {reason}")]
    InconsistentBracket {
        phase: PlayoffPhase,
        reason: &'static str,
    },
}

/// Result alias for postseason operations
pub type Result<T> = std::result::Result<T, PostseasonError>;
