//! Defense resolution for balls in play
//!
//! Each batted ball goes to the fielder at its direction and runs up to two
//! checks: an error roll, then either a great-play roll (hits) or an
//! infield-hit roll (ground outs). The fielder is credited with UZR measured
//! against a league-average player at that position.

use crate::models::{Abilities, Baseline, PlayerId, Position};
use rand::Rng;

/// Run value of one out for UZR
pub const UZR_RUN_VALUE: f32 = 0.75;
/// Share of infield outs that are ground balls
const GROUND_BALL_SHARE: f32 = 0.75;
const MIN_ERROR_CHANCE: f32 = 0.001;

/// Ball in play as decided by the outcome model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallInPlay {
    Single,
    Double,
    Triple,
    Out,
}

/// Ball in play after the defense has had its say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldedBall {
    Single,
    Double,
    Triple,
    Out,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldingPlay {
    pub result: FieldedBall,
    pub fielder: PlayerId,
    pub uzr: f32,
}

// ============================================================================
// Rates
// ============================================================================

/// (base error rate, fielding slope) by position group
fn error_params(position: Position) -> (f32, f32) {
    match position {
        Position::LeftField | Position::CenterField | Position::RightField => (0.015, 0.013),
        Position::SecondBase | Position::ThirdBase | Position::Shortstop => (0.045, 0.040),
        _ => (0.03, 0.025),
    }
}

pub fn error_chance(position: Position, fielding: f32) -> f32 {
    let (base, slope) = error_params(position);
    base - (fielding / 80.0) * slope
}

/// Range + glove chance to rob a hit
pub fn great_play_chance(fielding: f32, speed: f32) -> f32 {
    (fielding + speed) / 2.0 / 100.0 * 0.15
}

/// Batter beats the throw when faster than the fielder's range + arm
pub fn infield_hit_chance(batter_speed: f32, fielding: f32, arm: f32) -> f32 {
    let defense = (fielding + arm) / 2.0;
    if batter_speed > defense {
        0.05 + (batter_speed - defense) / 100.0 * 0.2
    } else {
        0.0
    }
}

// ============================================================================
// Fielder lookup
// ============================================================================

/// 타구 방향의 수비수. Falls back to an unassigned player, then to the
/// first entry of the alignment.
pub fn fielder_at(alignment: &[(Position, PlayerId)], direction: u8) -> Option<PlayerId> {
    let target = Position::from_direction(direction);
    alignment
        .iter()
        .find(|(pos, _)| *pos == target)
        .or_else(|| alignment.iter().find(|(pos, _)| *pos == Position::Unknown))
        .or_else(|| alignment.first())
        .map(|(_, id)| *id)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve one ball in play hit toward `direction` (1-9).
pub fn resolve_ball_in_play<R: Rng>(
    ball: BallInPlay,
    direction: u8,
    fielder_id: PlayerId,
    fielder: &Abilities,
    batter_speed: f32,
    baseline: Baseline,
    rng: &mut R,
) -> FieldingPlay {
    let position = Position::from_direction(direction);
    let fielding = fielder.fielding;
    let arm = fielder.arm;
    let speed = fielder.speed;

    let chance = error_chance(position, fielding);
    let avg_error = error_chance(position, baseline.fielding);

    let (result, expected_out, is_out) = if rng.gen::<f32>() < chance.max(MIN_ERROR_CHANCE) {
        (FieldedBall::Error, 0.0, 0.0)
    } else {
        match ball {
            BallInPlay::Single | BallInPlay::Double | BallInPlay::Triple => {
                let avg_save = great_play_chance(baseline.fielding, baseline.speed);
                let expected = (1.0 - avg_error) * avg_save;
                if rng.gen::<f32>() < great_play_chance(fielding, speed) {
                    (FieldedBall::Out, expected, 1.0)
                } else {
                    let kept = match ball {
                        BallInPlay::Single => FieldedBall::Single,
                        BallInPlay::Double => FieldedBall::Double,
                        _ => FieldedBall::Triple,
                    };
                    (kept, expected, 0.0)
                }
            }
            BallInPlay::Out if direction <= 6 => {
                let avg_ih = infield_hit_chance(batter_speed, baseline.fielding, baseline.arm);
                let expected = (1.0 - avg_error) * (1.0 - avg_ih);
                if rng.gen::<f32>() < infield_hit_chance(batter_speed, fielding, arm) {
                    (FieldedBall::Single, expected, 0.0)
                } else {
                    (FieldedBall::Out, expected, 1.0)
                }
            }
            BallInPlay::Out => (FieldedBall::Out, 1.0 - avg_error, 1.0),
        }
    };

    FieldingPlay {
        result,
        fielder: fielder_id,
        uzr: (is_out - expected_out) * UZR_RUN_VALUE,
    }
}

/// Infield outs are ground balls three times in four.
pub fn is_ground_ball<R: Rng>(result: FieldedBall, direction: u8, rng: &mut R) -> bool {
    result == FieldedBall::Out && direction <= 6 && rng.gen::<f32>() < GROUND_BALL_SHARE
}
