//! Simulation contexts
//!
//! - [`SimulationContext`]: read-only inputs shared by every game of a
//!   season (tuning, league baselines, pitch table). Built by the caller and
//!   passed by reference; nothing is cached globally.
//! - [`GameSimulationContext`]: per-game mutable state threaded through the
//!   half-inning and substitution code: inning, score, and who has already
//!   appeared.

use super::config::EngineConfig;
use super::probability::PitchCatalog;
use crate::models::{LeagueAverages, PlayerId, Side};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationContext {
    pub config: EngineConfig,
    pub league: LeagueAverages,
    pub pitches: PitchCatalog,
}

impl SimulationContext {
    pub fn new(config: EngineConfig, league: LeagueAverages) -> Self {
        Self {
            config,
            league,
            pitches: PitchCatalog::default(),
        }
    }

    pub fn with_pitches(mut self, pitches: PitchCatalog) -> Self {
        self.pitches = pitches;
        self
    }
}

#[derive(Debug, Clone)]
pub struct GameSimulationContext {
    pub inning: u8,
    /// Side currently at bat
    pub batting: Side,
    score: [u32; 2],
    /// Players who have appeared, per side. Appearing is permanent: a
    /// player who leaves the game never comes back.
    used: [HashSet<PlayerId>; 2],
}

impl Default for GameSimulationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSimulationContext {
    pub fn new() -> Self {
        Self {
            inning: 1,
            batting: Side::Away,
            score: [0, 0],
            used: [HashSet::new(), HashSet::new()],
        }
    }

    pub fn fielding(&self) -> Side {
        self.batting.opponent()
    }

    pub fn score(&self, side: Side) -> u32 {
        self.score[side.index()]
    }

    pub fn add_runs(&mut self, side: Side, runs: u32) {
        self.score[side.index()] += runs;
    }

    /// `side` runs minus opponent runs
    pub fn lead(&self, side: Side) -> i32 {
        self.score(side) as i32 - self.score(side.opponent()) as i32
    }

    pub fn is_used(&self, side: Side, player: PlayerId) -> bool {
        self.used[side.index()].contains(&player)
    }

    /// Returns false if the player had already appeared.
    pub fn mark_used(&mut self, side: Side, player: PlayerId) -> bool {
        self.used[side.index()].insert(player)
    }

    pub fn used_count(&self, side: Side) -> usize {
        self.used[side.index()].len()
    }

    /// Home team ahead while batting in the 9th or later.
    pub fn is_walk_off(&self) -> bool {
        self.batting == Side::Home && self.inning >= 9 && self.lead(Side::Home) > 0
    }
}
