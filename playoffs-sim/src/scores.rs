//! Score sources - where game results come from
//!
//! Level 3 - Steps

use playoffs_core::{SeriesRound, TeamId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::SimConfig;

/// Points added per overtime period
const OVERTIME_RANGE: std::ops::RangeInclusive<u32> = 1..=12;

/// What a score source is told about the game it scores
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameContext {
    pub home: TeamId,
    pub away: TeamId,
    /// `None` for play-in games
    pub round: Option<SeriesRound>,
    /// 1 for play-in games
    pub game_number: u8,
}

/// Supplies final scores as `(home, away)`
///
/// Implementations must never return a tie.
pub trait ScoreSource {
    fn game_score(&mut self, ctx: &GameContext) -> (u32, u32);
}

/// Uniform random scores with overtime for ties
#[derive(Clone, Debug)]
pub struct RandomScores {
    rng: ChaCha8Rng,
    min: u32,
    max: u32,
}

impl RandomScores {
    pub fn new(seed: Option<u64>, min: u32, max: u32) -> Self {
        Self {
            rng: create_rng(seed),
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.seed, config.min_score, config.max_score)
    }
}

impl ScoreSource for RandomScores {
    fn game_score(&mut self, _ctx: &GameContext) -> (u32, u32) {
        let mut home = self.rng.gen_range(self.min..=self.max);
        let mut away = self.rng.gen_range(self.min..=self.max);
        while home == away {
            home += self.rng.gen_range(OVERTIME_RANGE);
            away += self.rng.gen_range(OVERTIME_RANGE);
        }
        (home, away)
    }
}

/// Scores from a closure, for tests and replays
pub struct ScriptedScores<F>(pub F);

impl<F> ScoreSource for ScriptedScores<F>
where
    F: FnMut(&GameContext) -> (u32, u32),
{
    fn game_score(&mut self, ctx: &GameContext) -> (u32, u32) {
        (self.0)(ctx)
    }
}

/// Create RNG from seed or random
pub(crate) fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}
