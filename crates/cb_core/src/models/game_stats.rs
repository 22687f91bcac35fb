//! Per-player stat line accumulated during one game.

use super::player::{Player, PlayerId, Position};
use serde::{Deserialize, Serialize};

/// Scorer's notation for one plate appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayNotation {
    Single,
    Double,
    Triple,
    HomeRun,
    Walk,
    HitByPitch,
    StrikeoutSwinging,
    StrikeoutLooking,
    GroundOut,
    FlyOut,
    LineOut,
    DoublePlay,
    ReachedOnError,
}

impl PlayNotation {
    pub fn is_hit(&self) -> bool {
        matches!(
            self,
            PlayNotation::Single | PlayNotation::Double | PlayNotation::Triple | PlayNotation::HomeRun
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtBatDetail {
    pub inning: u8,
    pub notation: PlayNotation,
    /// Batted-ball direction 1-9 (scorer numbering) when the ball was in play.
    pub direction: Option<u8>,
}

/// Batting, fielding and pitching accumulator for one player in one game.
///
/// Every counter starts at zero; derived rates never divide by zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerGameStats {
    pub player_id: PlayerId,
    pub name: String,
    /// Box-score label (starting position, or PH / PR for substitutes)
    pub position: Position,
    /// Batting-order slot 1-9 once the player has entered the lineup
    pub order: Option<u8>,
    pub is_starter: bool,

    // Batting
    pub plate_appearances: u32,
    pub at_bats: u32,
    pub hits: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub runs: u32,
    pub rbi: u32,
    pub walks: u32,
    pub hit_by_pitch: u32,
    pub strikeouts: u32,
    pub stolen_bases: u32,
    pub caught_stealing: u32,
    pub double_plays: u32,
    pub at_bat_details: Vec<AtBatDetail>,

    // Fielding / running credits
    pub errors: u32,
    pub uzr: f32,
    pub ubr: f32,

    // Pitching
    pub pitching_order: Option<u8>,
    pub is_starting_pitcher: bool,
    pub outs_recorded: u32,
    pub batters_faced: u32,
    pub pitch_count: u32,
    pub runs_allowed: u32,
    pub earned_runs: u32,
    pub hits_allowed: u32,
    pub home_runs_allowed: u32,
    pub walks_allowed: u32,
    pub hit_batters: u32,
    pub pitching_strikeouts: u32,
    pub wins: u32,
    pub losses: u32,
    pub saves: u32,
    pub complete_game: bool,
    pub shutout: bool,
    pub quality_start: bool,
}

impl PlayerGameStats {
    pub fn new(player: &Player) -> Self {
        Self {
            player_id: player.id,
            name: player.name.clone(),
            position: player.position,
            ..Default::default()
        }
    }

    pub fn innings_pitched(&self) -> f32 {
        self.outs_recorded as f32 / 3.0
    }

    /// Baseball innings notation: 6 outs + 1 → "2.1"
    pub fn innings_pitched_notation(&self) -> String {
        format!("{}.{}", self.outs_recorded / 3, self.outs_recorded % 3)
    }

    pub fn singles(&self) -> u32 {
        self.hits
            .saturating_sub(self.doubles + self.triples + self.home_runs)
    }

    pub fn total_bases(&self) -> u32 {
        self.singles() + self.doubles * 2 + self.triples * 3 + self.home_runs * 4
    }

    pub fn batting_average(&self) -> f32 {
        ratio(self.hits as f32, self.at_bats as f32)
    }

    pub fn era(&self) -> f32 {
        ratio(self.earned_runs as f32 * 27.0, self.outs_recorded as f32)
    }

    pub fn batted(&self) -> bool {
        self.plate_appearances > 0 || self.order.is_some()
    }

    pub fn pitched(&self) -> bool {
        self.outs_recorded > 0 || self.batters_faced > 0
    }
}

/// Division that yields 0 on an empty denominator.
pub(crate) fn ratio(numerator: f32, denominator: f32) -> f32 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
