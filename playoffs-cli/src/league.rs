//! League file - standings and team names loaded from JSON
//!
//! ```json
//! {
//!   "season": "2024-25",
//!   "teams": [{ "id": 1, "name": "Boston", "abbreviation": "BOS" }],
//!   "east": [1, 2, 3],
//!   "west": [16, 17, 18]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use playoffs_core::{Standings, TeamId};
use serde::{Deserialize, Serialize};

/// Display info for one team
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: TeamId,
    pub name: String,
    pub abbreviation: String,
}

/// Standings for both conferences plus optional team names
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueFile {
    pub season: String,
    #[serde(default)]
    pub teams: Vec<TeamInfo>,
    pub east: Vec<TeamId>,
    pub west: Vec<TeamId>,
}

impl LeagueFile {
    /// Load and validate a league file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let league: LeagueFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        league.validate()?;
        Ok(league)
    }

    /// A team may only be ranked once across both conferences
    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for team in self.east.iter().chain(self.west.iter()) {
            if !seen.insert(team) {
                anyhow::bail!("Team {} is ranked more than once", team);
            }
        }
        Ok(())
    }

    pub fn east_standings(&self) -> Standings {
        Standings::new(self.east.clone())
    }

    pub fn west_standings(&self) -> Standings {
        Standings::new(self.west.clone())
    }

    pub fn directory(&self) -> TeamDirectory {
        TeamDirectory::new(&self.teams)
    }
}

/// Team name lookup with a fallback to the raw id
#[derive(Clone, Debug, Default)]
pub struct TeamDirectory {
    teams: HashMap<TeamId, TeamInfo>,
}

impl TeamDirectory {
    pub fn new(teams: &[TeamInfo]) -> Self {
        Self {
            teams: teams.iter().map(|t| (t.id, t.clone())).collect(),
        }
    }

    /// Short label such as "BOS", or "#3" for unknown teams
    pub fn abbreviation(&self, team: TeamId) -> String {
        self.teams
            .get(&team)
            .map(|t| t.abbreviation.clone())
            .unwrap_or_else(|| team.to_string())
    }

    pub fn name(&self, team: TeamId) -> String {
        self.teams
            .get(&team)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| team.to_string())
    }
}
