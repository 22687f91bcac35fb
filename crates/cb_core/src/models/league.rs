//! League-average fielding/running baselines.
//!
//! Built by the caller once per season and passed into the engine; UZR and
//! UBR credits are measured against these values.

use super::player::{Player, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub fielding: f32,
    pub arm: f32,
    pub speed: f32,
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            fielding: 6.0,
            arm: 6.0,
            speed: 6.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueAverages {
    #[serde(default)]
    pub by_position: BTreeMap<Position, Baseline>,
    #[serde(default)]
    pub all: Baseline,
}

impl LeagueAverages {
    /// Position bonus: players listed at a position include bench and
    /// two-way players, so their raw mean runs low.
    const POSITION_BONUS: f32 = 3.0;

    /// Baseline at a position, falling back to the league-wide mean.
    pub fn baseline(&self, position: Position) -> Baseline {
        self.by_position
            .get(&position)
            .copied()
            .unwrap_or(self.all)
    }

    pub fn from_players(players: &[Player]) -> Self {
        if players.is_empty() {
            return Self::default();
        }

        let mut sums: BTreeMap<Position, (f32, f32, f32, usize)> = BTreeMap::new();
        for p in players {
            let entry = sums.entry(p.position).or_insert((0.0, 0.0, 0.0, 0));
            entry.0 += p.abilities.fielding;
            entry.1 += p.abilities.arm;
            entry.2 += p.abilities.speed;
            entry.3 += 1;
        }

        let by_position = sums
            .into_iter()
            .map(|(pos, (f, a, s, n))| {
                let n = n as f32;
                (
                    pos,
                    Baseline {
                        fielding: f / n + Self::POSITION_BONUS,
                        arm: a / n + Self::POSITION_BONUS,
                        speed: s / n + Self::POSITION_BONUS,
                    },
                )
            })
            .collect();

        let n = players.len() as f32;
        let all = Baseline {
            fielding: players.iter().map(|p| p.abilities.fielding).sum::<f32>() / n,
            arm: players.iter().map(|p| p.abilities.arm).sum::<f32>() / n,
            speed: players.iter().map(|p| p.abilities.speed).sum::<f32>() / n,
        };

        Self { by_position, all }
    }
}
