//! Configuration types for postseason simulation
//!
//! Level 4 - Utilities and configuration

use chrono::NaiveDate;

/// Lowest score a random team can post in regulation
pub const DEFAULT_MIN_SCORE: u32 = 85;

/// Highest score a random team can post in regulation
pub const DEFAULT_MAX_SCORE: u32 = 130;

/// Simulation configuration
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
    /// Score range for random games (inclusive)
    pub min_score: u32,
    pub max_score: u32,
    /// Postseasons to run in a batch
    pub runs: usize,
    /// Whether to run batch postseasons in parallel
    pub parallel: bool,
    /// Date of the first game day; later days follow one per slate
    pub start_date: Option<NaiveDate>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            min_score: DEFAULT_MIN_SCORE,
            max_score: DEFAULT_MAX_SCORE,
            runs: 100,
            parallel: true,
            start_date: None,
        }
    }
}

impl SimConfig {
    /// Create config for a batch of `runs` postseasons
    pub fn new(runs: usize) -> Self {
        Self {
            runs,
            ..Default::default()
        }
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set score range; bounds are swapped if given backwards
    pub fn with_score_range(mut self, min: u32, max: u32) -> Self {
        self.min_score = min.min(max);
        self.max_score = min.max(max);
        self
    }

    /// Set the first game day
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Run batches on a single thread
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}
