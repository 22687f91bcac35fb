//! # cb_core - Deterministic Baseball Game Simulation Engine
//!
//! Plate-appearance level simulation of a baseball game: outcome model,
//! defense, baserunning, steals, pitcher usage and substitutions, decisions
//! and box scores.
//!
//! ## Features
//! - Deterministic: same seed, same rosters, same `GameResult`
//! - Never fails on bad rosters; input is normalised at entry
//! - Parallel league days with a single-writer roster store
//! - JSON API for easy integration
//!
//! ```rust
//! use cb_core::engine::{GameEngine, GamePlan, SimulationContext};
//! use cb_core::models::{TeamId, TeamSheet};
//! use chrono::NaiveDate;
//!
//! let sim = SimulationContext::default();
//! let plan = GamePlan {
//!     seed: 7,
//!     date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
//!     season: 2024,
//!     home: TeamSheet::new(TeamId::new("home"), Vec::new()),
//!     away: TeamSheet::new(TeamId::new("away"), Vec::new()),
//! };
//! let outcome = GameEngine::new(plan, &sim).simulate();
//! assert!(outcome.result.details.home_batting.len() >= 9);
//! ```

// Simulation entry points carry a lot of explicit context
#![allow(clippy::too_many_arguments)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;

pub use api::{simulate_game_json, simulate_game_request, GameRequest};
pub use engine::{
    DefaultLineupProvider, GameEngine, GamePlan, LeagueStore, LineupProvider, RosterProvider,
    SimulationContext,
};
pub use error::{GameError, Result};
pub use models::{GameOutcome, GameResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
