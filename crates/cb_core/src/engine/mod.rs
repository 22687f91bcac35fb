//! Game simulation engine
//!
//! Bottom-up: `probability` / `defense` / `baserunning` / `stealing` /
//! `pitching` are pure rules over explicit rng handles; `half_inning`,
//! `substitutions` and `game` drive them through [`GameEngine`]; `batch`
//! runs whole league days.

pub mod baserunning;
pub mod batch;
pub mod config;
pub mod context;
pub mod decisions;
pub mod defense;
pub mod game;
mod half_inning;
pub mod lineup;
pub mod pitching;
pub mod probability;
pub mod stats;
pub mod stealing;
mod substitutions;

pub use batch::{
    round_robin, simulate_day, simulate_days, LeagueDay, LeagueStore, Matchup, TeamRecord,
};
pub use config::{EngineConfig, FatigueConfig, PitchingConfig};
pub use context::{GameSimulationContext, SimulationContext};
pub use game::{GameEngine, GamePlan, REGULATION_INNINGS};
pub use lineup::{DefaultLineupProvider, LineupProvider, RosterProvider};
pub use probability::PitchCatalog;
pub use stats::TeamTotals;
