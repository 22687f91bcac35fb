//! JSON boundary
//!
//! One request in, one serialized [`GameOutcome`] out. Rosters are
//! normalised by the engine, so the only rejected requests are malformed
//! JSON, a wrong schema version and a team playing itself.

use crate::engine::{EngineConfig, GameEngine, GamePlan, PitchCatalog, SimulationContext};
use crate::error::{GameError, Result};
use crate::models::{GameOutcome, LeagueAverages, Player, TeamSheet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRequest {
    pub schema_version: u32,
    pub seed: u64,
    pub date: NaiveDate,
    #[serde(default)]
    pub season: u16,
    pub home: TeamSheet,
    pub away: TeamSheet,
    /// Computed from both rosters when absent.
    #[serde(default)]
    pub league_averages: Option<LeagueAverages>,
    #[serde(default)]
    pub config: Option<EngineConfig>,
    #[serde(default)]
    pub pitches: Option<PitchCatalog>,
}

impl GameRequest {
    fn validate(&self) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(GameError::SchemaVersion {
                found: self.schema_version,
                expected: SCHEMA_VERSION,
            });
        }
        if self.home.team.0.is_empty() || self.away.team.0.is_empty() {
            return Err(GameError::InvalidRequest("team id must not be empty".into()));
        }
        if self.home.team == self.away.team {
            return Err(GameError::InvalidRequest(format!(
                "home and away are the same team: {}",
                self.home.team
            )));
        }
        Ok(())
    }

    fn context(&self) -> SimulationContext {
        let league = self.league_averages.clone().unwrap_or_else(|| {
            let players: Vec<Player> = self
                .home
                .roster
                .iter()
                .chain(&self.away.roster)
                .cloned()
                .collect();
            LeagueAverages::from_players(&players)
        });
        let sim = SimulationContext::new(self.config.clone().unwrap_or_default(), league);
        match &self.pitches {
            Some(pitches) => sim.with_pitches(pitches.clone()),
            None => sim,
        }
    }
}

pub fn simulate_game_request(request: &GameRequest) -> Result<GameOutcome> {
    request.validate()?;
    let sim = request.context();
    let plan = GamePlan {
        seed: request.seed,
        date: request.date,
        season: request.season,
        home: request.home.clone(),
        away: request.away.clone(),
    };
    debug!(home = %plan.home.team, away = %plan.away.team, seed = plan.seed, "game request");
    Ok(GameEngine::new(plan, &sim).simulate())
}

pub fn simulate_game_json(request_json: &str) -> Result<String> {
    let request: GameRequest = serde_json::from_str(request_json)?;
    let outcome = simulate_game_request(&request)?;
    Ok(serde_json::to_string(&outcome)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(home: &str, away: &str, version: u32) -> serde_json::Value {
        json!({
            "schema_version": version,
            "seed": 12345,
            "date": "2024-04-02",
            "season": 2024,
            "home": { "team": home, "roster": [] },
            "away": { "team": away, "roster": [] },
        })
    }

    #[test]
    fn test_simulate_game_json_round_trip() {
        let body = request("home", "away", 1).to_string();
        let out = simulate_game_json(&body).unwrap();
        let outcome: GameOutcome = serde_json::from_str(&out).unwrap();

        assert_eq!(outcome.result.home_team.0, "home");
        assert_eq!(outcome.result.season, 2024);
        assert_eq!(
            outcome.result.line_score.total(crate::models::Side::Home),
            outcome.result.home_score
        );
        // same request, same game
        assert_eq!(simulate_game_json(&body).unwrap(), out);
    }

    #[test]
    fn test_rejects_wrong_schema_version() {
        let err = simulate_game_json(&request("a", "b", 2).to_string()).unwrap_err();
        assert!(matches!(
            err,
            GameError::SchemaVersion {
                found: 2,
                expected: 1
            }
        ));
    }

    #[test]
    fn test_rejects_same_team() {
        let err = simulate_game_json(&request("a", "a", 1).to_string()).unwrap_err();
        assert!(matches!(err, GameError::InvalidRequest(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = simulate_game_json("{ not json").unwrap_err();
        assert!(matches!(err, GameError::Serialization(_)));
    }

    #[test]
    fn test_config_override_is_applied() {
        let mut body = request("a", "b", 1);
        body["config"] = json!({ "max_innings": 9 });
        let req: GameRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.context().config.max_innings, 9);

        let outcome = simulate_game_request(&req).unwrap();
        assert!(outcome.result.innings <= 9);
    }
}
