//! Stolen-base attempts between plate appearances

use super::baserunning::BaseState;
use crate::models::{Player, PlayerId};
use rand::Rng;

/// Runners slower than this never go.
const MIN_STEAL_SPEED: f32 = 6.0;
const DEFAULT_CATCHER_ARM: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatcherDefense {
    pub arm: f32,
    pub aptitude: f32,
}

impl CatcherDefense {
    /// Ratings of whoever is catching; no catcher plays as a weak arm.
    pub fn of(catcher: Option<&Player>) -> Self {
        match catcher {
            Some(p) => Self {
                arm: if p.abilities.arm > 0.0 {
                    p.abilities.arm
                } else {
                    DEFAULT_CATCHER_ARM
                },
                aptitude: p.aptitudes.catcher,
            },
            None => Self {
                arm: DEFAULT_CATCHER_ARM,
                aptitude: 0.0,
            },
        }
    }
}

/// 도루 시도 확률
pub fn steal_attempt_chance(speed: f32, catcher: CatcherDefense) -> f32 {
    if speed < MIN_STEAL_SPEED {
        return 0.0;
    }
    let speed_factor = (speed - 5.0) * 15.0;
    let arm_factor = ((10.0 - catcher.arm) / 7.0).max(0.0);
    let aptitude_factor = ((10.2 - catcher.aptitude) / 5.0).max(0.0);
    speed_factor * arm_factor * aptitude_factor * 0.008
}

/// 도루 성공 확률
pub fn steal_success_chance(speed: f32, catcher: CatcherDefense) -> f32 {
    let defense = catcher.arm * 2.0 + catcher.aptitude * 0.5;
    (0.65 + (speed - 10.0) * 0.05 - (defense - 12.0) * 0.03).clamp(0.1, 0.95)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StealEvent {
    /// `to` is the base index reached (1 = second, 2 = third)
    Stolen { runner: PlayerId, to: usize },
    CaughtStealing { runner: PlayerId, to: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StealReport {
    pub bases: BaseState,
    pub events: Vec<StealEvent>,
    pub outs_added: u8,
}

/// Runner on second tries for third, then the runner on first tries for
/// second (the bag may have just opened up). Stops once the side is out.
pub fn attempt_steals<R: Rng>(
    state: &BaseState,
    outs: u8,
    catcher: CatcherDefense,
    rng: &mut R,
) -> StealReport {
    let mut bases = *state;
    let mut events = Vec::new();
    let mut outs_added = 0;

    for (from, to) in [(1usize, 2usize), (0, 1)] {
        if outs + outs_added >= 3 {
            break;
        }
        let Some(runner) = bases.bases[from] else {
            continue;
        };
        if bases.bases[to].is_some() {
            continue;
        }
        if rng.gen::<f32>() >= steal_attempt_chance(runner.speed, catcher) {
            continue;
        }

        bases.bases[from] = None;
        if rng.gen::<f32>() < steal_success_chance(runner.speed, catcher) {
            bases.bases[to] = Some(runner);
            events.push(StealEvent::Stolen {
                runner: runner.id,
                to,
            });
        } else {
            outs_added += 1;
            events.push(StealEvent::CaughtStealing {
                runner: runner.id,
                to,
            });
        }
    }

    StealReport {
        bases,
        events,
        outs_added,
    }
}
