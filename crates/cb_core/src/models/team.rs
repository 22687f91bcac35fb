use super::player::{Player, PlayerId, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which team: away bats in the top half, home in the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Away,
    Home,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Away => Side::Home,
            Side::Home => Side::Away,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Away => 0,
            Side::Home => 1,
        }
    }
}

/// One batting-order slot and the defensive position it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupSlot {
    pub player_id: PlayerId,
    pub position: Position,
}

/// Nine batters in order plus the starting pitcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartingLineup {
    pub batters: Vec<LineupSlot>,
    pub pitcher: PlayerId,
}

impl StartingLineup {
    /// True when the pitcher occupies a batting slot (no designated hitter).
    pub fn pitcher_bats(&self) -> bool {
        self.batters.iter().any(|s| s.position.is_pitcher())
    }
}

/// A team as handed to the engine: roster snapshot plus an optional lineup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSheet {
    pub team: TeamId,
    #[serde(default)]
    pub roster: Vec<Player>,
    #[serde(default)]
    pub lineup: Option<StartingLineup>,
}

impl TeamSheet {
    pub fn new(team: TeamId, roster: Vec<Player>) -> Self {
        Self {
            team,
            roster,
            lineup: None,
        }
    }

    pub fn with_lineup(mut self, lineup: StartingLineup) -> Self {
        self.lineup = Some(lineup);
        self
    }
}
