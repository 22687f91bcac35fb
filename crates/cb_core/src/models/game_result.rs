use super::game_stats::PlayerGameStats;
use super::player::PlayerId;
use super::team::{Side, TeamId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Marks a bottom half that was not played (home already ahead).
pub const UNPLAYED_HALF: i16 = -1;

/// Runs per half-inning, one entry per inning started.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineScore {
    pub away: Vec<i16>,
    pub home: Vec<i16>,
}

impl LineScore {
    pub fn total(&self, side: Side) -> u32 {
        let halves = match side {
            Side::Away => &self.away,
            Side::Home => &self.home,
        };
        halves.iter().filter(|r| **r > 0).map(|r| *r as u32).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub winning_pitcher: Option<PlayerId>,
    pub losing_pitcher: Option<PlayerId>,
    pub save_pitcher: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mvp {
    pub player_id: PlayerId,
    pub name: String,
}

/// Box score: players who batted / pitched, per side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameDetails {
    pub home_batting: Vec<PlayerGameStats>,
    pub away_batting: Vec<PlayerGameStats>,
    pub home_pitching: Vec<PlayerGameStats>,
    pub away_pitching: Vec<PlayerGameStats>,
}

impl GameDetails {
    pub fn batting(&self, side: Side) -> &[PlayerGameStats] {
        match side {
            Side::Away => &self.away_batting,
            Side::Home => &self.home_batting,
        }
    }

    pub fn pitching(&self, side: Side) -> &[PlayerGameStats] {
        match side {
            Side::Away => &self.away_pitching,
            Side::Home => &self.home_pitching,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub id: Uuid,
    pub date: NaiveDate,
    pub season: u16,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub home_score: u32,
    pub away_score: u32,
    pub innings: u8,
    pub line_score: LineScore,
    pub decision: Decision,
    pub mvp: Option<Mvp>,
    pub details: GameDetails,
}

impl GameResult {
    pub fn winner(&self) -> Option<Side> {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn is_tie(&self) -> bool {
        self.home_score == self.away_score
    }

    pub fn team(&self, side: Side) -> &TeamId {
        match side {
            Side::Away => &self.away_team,
            Side::Home => &self.home_team,
        }
    }
}

/// Post-game fatigue change for one pitcher, to be merged by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueDelta {
    pub team: TeamId,
    pub player_id: PlayerId,
    pub delta: f32,
}

/// Everything one simulated game hands back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub result: GameResult,
    pub fatigue: Vec<FatigueDelta>,
}
