//! Conference bracket: First Round, Conference Semis, Conference Finals
//!
//! Seeds 1-6 come straight from standings; 7 and 8 arrive from the play-in.
//! Each later round pairs adjacent winners of the previous round, and the
//! lower seed number always takes home court regardless of bracket position.

use serde::{Deserialize, Serialize};

use crate::bracket::PlayoffPhase;
use crate::error::{PostseasonError, Result};
use crate::series::{PlayoffSeries, SeriesId, SeriesRound};
use crate::team::{by_seed, Conference, SeededTeam, Slot, Standings, TeamId};

/// Minimum ranked teams for direct seeding
pub const CONFERENCE_MIN_TEAMS: usize = 6;

/// Seeds in a conference bracket
pub const BRACKET_SEEDS: usize = 8;

/// First Round matchups by seed number, in bracket order
pub const FIRST_ROUND_PAIRINGS: [(u8, u8); 4] = [(1, 8), (4, 5), (3, 6), (2, 7)];

/// Seeds 1-8 and the three conference rounds
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceBracket {
    conference: Conference,
    /// Index 0 is seed 1
    seeds: [Slot; BRACKET_SEEDS],
    first_round: Vec<PlayoffSeries>,
    semis: Vec<PlayoffSeries>,
    finals: Option<PlayoffSeries>,
}

impl ConferenceBracket {
    pub fn new(conference: Conference) -> Self {
        Self {
            conference,
            seeds: [Slot::Unresolved; BRACKET_SEEDS],
            first_round: Vec::new(),
            semis: Vec::new(),
            finals: None,
        }
    }

    pub fn conference(&self) -> Conference {
        self.conference
    }

    /// Fill seeds 1-6 from standings, clearing everything else
    pub fn initialize(&mut self, standings: &Standings) -> Result<()> {
        if standings.len() < CONFERENCE_MIN_TEAMS {
            return Err(PostseasonError::InsufficientStandings {
                conference: self.conference,
                required: CONFERENCE_MIN_TEAMS,
                found: standings.len(),
            });
        }

        *self = Self::new(self.conference);
        for (slot, &team) in self.seeds.iter_mut().zip(standings.teams()).take(CONFERENCE_MIN_TEAMS) {
            *slot = Slot::Team(team);
        }
        Ok(())
    }

    /// Team at a 1-based seed
    pub fn seed(&self, seed: u8) -> Slot {
        match seed as usize {
            1..=BRACKET_SEEDS => self.seeds[seed as usize - 1],
            _ => Slot::Unresolved,
        }
    }

    fn seeded(&self, seed: u8) -> Result<SeededTeam> {
        self.seed(seed)
            .team()
            .map(|team| SeededTeam::new(team, seed))
            .ok_or(PostseasonError::SeedsUnresolved {
                conference: self.conference,
                needed: seed,
            })
    }

    /// Fill seeds 7 and 8 and build the First Round
    pub fn set_play_in_results(&mut self, seed7: TeamId, seed8: TeamId) -> Result<()> {
        if !self.first_round.is_empty() {
            return Err(self.already_built(SeriesRound::FirstRound));
        }
        if !self.seeds[..CONFERENCE_MIN_TEAMS].iter().all(|s| s.is_resolved()) {
            return Err(PostseasonError::SeedsUnresolved {
                conference: self.conference,
                needed: CONFERENCE_MIN_TEAMS as u8,
            });
        }

        self.seeds[6] = Slot::Team(seed7);
        self.seeds[7] = Slot::Team(seed8);

        let mut series = Vec::with_capacity(FIRST_ROUND_PAIRINGS.len());
        for (high, low) in FIRST_ROUND_PAIRINGS {
            series.push(PlayoffSeries::new(
                Some(self.conference),
                SeriesRound::FirstRound,
                self.seeded(high)?,
                self.seeded(low)?,
            ));
        }
        self.first_round = series;

        tracing::debug!("{} First Round set", self.conference);
        Ok(())
    }

    /// Pair First Round winners: (1v8, 4v5) and (3v6, 2v7)
    pub fn setup_conference_semis(&mut self) -> Result<()> {
        if !self.semis.is_empty() {
            return Err(self.already_built(SeriesRound::ConferenceSemis));
        }
        self.semis = self.next_round(SeriesRound::FirstRound, SeriesRound::ConferenceSemis)?;
        tracing::debug!("{} Conference Semis set", self.conference);
        Ok(())
    }

    /// Pair the two Semis winners
    pub fn setup_conference_finals(&mut self) -> Result<()> {
        if self.finals.is_some() {
            return Err(self.already_built(SeriesRound::ConferenceFinals));
        }
        let mut finals = self.next_round(SeriesRound::ConferenceSemis, SeriesRound::ConferenceFinals)?;
        self.finals = finals.pop();
        tracing::debug!("{} Conference Finals set", self.conference);
        Ok(())
    }

    /// Build `next` from adjacent winner pairs of `previous`
    fn next_round(&self, previous: SeriesRound, next: SeriesRound) -> Result<Vec<PlayoffSeries>> {
        if !self.is_round_complete(previous) {
            return Err(PostseasonError::RoundNotComplete {
                conference: self.conference,
                round: previous,
            });
        }

        let winners: Vec<SeededTeam> = self
            .round_series(previous)
            .iter()
            .filter_map(PlayoffSeries::winning_side)
            .collect();

        Ok(winners
            .chunks(2)
            .filter_map(|pair| match *pair {
                [a, b] => {
                    let (higher, lower) = by_seed(a, b);
                    Some(PlayoffSeries::new(Some(self.conference), next, higher, lower))
                }
                _ => None,
            })
            .collect())
    }

    fn already_built(&self, round: SeriesRound) -> PostseasonError {
        PostseasonError::RoundAlreadyBuilt {
            conference: self.conference,
            round,
        }
    }

    /// Series of one round; empty until built, and always empty for Finals
    pub fn round_series(&self, round: SeriesRound) -> &[PlayoffSeries] {
        match round {
            SeriesRound::FirstRound => &self.first_round,
            SeriesRound::ConferenceSemis => &self.semis,
            SeriesRound::ConferenceFinals => self.finals.as_slice(),
            SeriesRound::Finals => &[],
        }
    }

    /// Round is built and every series in it is decided
    pub fn is_round_complete(&self, round: SeriesRound) -> bool {
        let series = self.round_series(round);
        !series.is_empty() && series.iter().all(PlayoffSeries::is_complete)
    }

    pub fn all_series(&self) -> impl Iterator<Item = &PlayoffSeries> {
        self.first_round
            .iter()
            .chain(self.semis.iter())
            .chain(self.finals.iter())
    }

    pub fn series(&self, id: &SeriesId) -> Option<&PlayoffSeries> {
        self.all_series().find(|s| s.id() == *id)
    }

    pub(crate) fn series_mut(&mut self, id: &SeriesId) -> Option<&mut PlayoffSeries> {
        self.first_round
            .iter_mut()
            .chain(self.semis.iter_mut())
            .chain(self.finals.iter_mut())
            .find(|s| s.id() == *id)
    }

    /// Check a bracket read from disk: exactly `rounds_built` rounds exist,
    /// each with the right number of series, and every series is sound
    pub(crate) fn validate(&self, rounds_built: usize, phase: PlayoffPhase) -> Result<()> {
        let inconsistent = |reason| Err(PostseasonError::InconsistentBracket { phase, reason });

        let rounds = [
            (SeriesRound::FirstRound, FIRST_ROUND_PAIRINGS.len()),
            (SeriesRound::ConferenceSemis, 2),
            (SeriesRound::ConferenceFinals, 1),
        ];
        for (idx, (round, expected)) in rounds.into_iter().enumerate() {
            let series = self.round_series(round);
            let wanted = if idx < rounds_built { expected } else { 0 };
            if series.len() != wanted {
                return inconsistent("built rounds do not match the phase");
            }
            if series
                .iter()
                .any(|s| s.round() != round || s.conference() != Some(self.conference))
            {
                return inconsistent("series filed under the wrong round");
            }
            for s in series {
                s.validate()?;
            }
            if idx + 1 < rounds_built && !self.is_round_complete(round) {
                return inconsistent("later round built before an earlier one finished");
            }
        }
        Ok(())
    }

    /// Conference Finals winner with its seed
    pub fn champion(&self) -> Option<SeededTeam> {
        self.finals.as_ref().and_then(PlayoffSeries::winning_side)
    }

    /// Series wins for a team across every round of this conference
    pub fn team_total_wins(&self, team: TeamId) -> u32 {
        self.all_series().map(|s| s.team_wins(team) as u32).sum()
    }
}
