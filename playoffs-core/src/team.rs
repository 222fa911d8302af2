//! Team identifiers, conferences and standings input

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque team identifier supplied by the standings provider
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for TeamId {
    fn from(id: u32) -> Self {
        TeamId(id)
    }
}

/// Conference
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conference {
    East,
    West,
}

impl Conference {
    pub const ALL: [Conference; 2] = [Conference::East, Conference::West];

    pub fn name(self) -> &'static str {
        match self {
            Conference::East => "East",
            Conference::West => "West",
        }
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A bracket position that may not have a team yet
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    #[default]
    Unresolved,
    Team(TeamId),
}

impl Slot {
    pub fn team(self) -> Option<TeamId> {
        match self {
            Slot::Unresolved => None,
            Slot::Team(id) => Some(id),
        }
    }

    pub fn is_resolved(self) -> bool {
        matches!(self, Slot::Team(_))
    }
}

impl From<Option<TeamId>> for Slot {
    fn from(team: Option<TeamId>) -> Self {
        team.map_or(Slot::Unresolved, Slot::Team)
    }
}

/// A team together with the seed it carries in a matchup
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededTeam {
    pub team: TeamId,
    pub seed: u8,
}

impl SeededTeam {
    pub fn new(team: TeamId, seed: u8) -> Self {
        Self { team, seed }
    }
}

/// Orders two seeded teams so the lower seed number comes first
pub fn by_seed(a: SeededTeam, b: SeededTeam) -> (SeededTeam, SeededTeam) {
    if b.seed < a.seed {
        (b, a)
    } else {
        (a, b)
    }
}

/// Conference standings, best team first, already tie-broken upstream
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Standings {
    teams: Vec<TeamId>,
}

impl Standings {
    pub fn new(teams: Vec<TeamId>) -> Self {
        Self { teams }
    }

    /// Team holding a 1-based seed
    pub fn seed(&self, seed: u8) -> Option<TeamId> {
        if seed == 0 {
            return None;
        }
        self.teams.get(seed as usize - 1).copied()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn teams(&self) -> &[TeamId] {
        &self.teams
    }
}

impl From<Vec<TeamId>> for Standings {
    fn from(teams: Vec<TeamId>) -> Self {
        Self::new(teams)
    }
}

impl FromIterator<TeamId> for Standings {
    fn from_iter<I: IntoIterator<Item = TeamId>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standings_seed_is_one_based() {
        let standings: Standings = (10..20).map(TeamId).collect();
        assert_eq!(standings.seed(1), Some(TeamId(10)));
        assert_eq!(standings.seed(10), Some(TeamId(19)));
        assert_eq!(standings.seed(11), None);
        assert_eq!(standings.seed(0), None);
    }

    #[test]
    fn test_slot_conversions() {
        assert_eq!(Slot::from(Some(TeamId(3))).team(), Some(TeamId(3)));
        assert!(!Slot::from(None).is_resolved());
        assert_eq!(Slot::default(), Slot::Unresolved);
    }

    #[test]
    fn test_by_seed_orders_lower_number_first() {
        let a = SeededTeam::new(TeamId(1), 5);
        let b = SeededTeam::new(TeamId(2), 4);
        assert_eq!(by_seed(a, b), (b, a));
        assert_eq!(by_seed(b, a), (b, a));
    }

    #[test]
    fn test_standings_serde_is_plain_list() {
        let standings = Standings::new(vec![TeamId(1), TeamId(2)]);
        let json = serde_json::to_string(&standings).unwrap();
        assert_eq!(json, "[1,2]");
    }
}
