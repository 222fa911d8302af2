//! Playoffs Sim - Drives postseason brackets with external scores
//!
//! This crate stands in for the game simulation around the engine:
//! - Score sources (seeded random, scripted)
//! - Running one bracket through to its champion
//! - Batches of seeded postseasons, optionally in parallel
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_postseason, run_batch (orchestration)
//! - Level 2: play-in and series slates (phases)
//! - Level 3: score sources, summaries (steps)
//! - Level 4: configuration

mod batch;
mod config;
mod runner;
mod scores;

pub use batch::{run_batch, BatchResult};
pub use config::{SimConfig, DEFAULT_MAX_SCORE, DEFAULT_MIN_SCORE};
pub use runner::{run_postseason, PostseasonSummary, SeriesSummary, SimError};
pub use scores::{GameContext, RandomScores, ScoreSource, ScriptedScores};
