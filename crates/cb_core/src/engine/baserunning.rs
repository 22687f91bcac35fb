//! Baserunner state machine
//!
//! [`advance`] is a pure transition `(BaseState, outcome) → (BaseState, runs)`.
//! The only decisions it cannot make itself, whether a runner tries for an
//! extra base and makes it, go through the [`AdvanceJudge`] seam so tests can
//! script them.
//!
//! Earned-run rule: a run is earned iff the runner reached without the help
//! of an error and fewer than three potential outs have been recorded in the
//! half-inning when he crosses the plate.

use crate::models::PlayerId;
use rand::Rng;

/// Run value of one extra base for UBR
pub const UBR_RUN_VALUE: f32 = 0.2;
const DEFAULT_RUNNER_SPEED: f32 = 10.0;
const MAX_ADVANCE_CHANCE: f32 = 0.95;
/// Potential outs at which earned-run accrual stops
pub const EARNED_RUN_CUTOFF: u8 = 3;

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Runner {
    pub id: PlayerId,
    /// False once the runner reached base on an error
    pub earned: bool,
    /// Raw speed rating (0 = unrated)
    pub speed: f32,
}

impl Runner {
    pub fn new(id: PlayerId, speed: f32) -> Self {
        Self {
            id,
            earned: true,
            speed,
        }
    }
}

/// Three base slots: index 0 = first, 1 = second, 2 = third.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BaseState {
    pub bases: [Option<Runner>; 3],
}

impl BaseState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.iter().all(Option::is_none)
    }

    pub fn occupied(&self, base: usize) -> bool {
        self.bases[base].is_some()
    }

    pub fn runner_count(&self) -> usize {
        self.bases.iter().flatten().count()
    }

    /// Runner on second or third
    pub fn scoring_position(&self) -> bool {
        self.occupied(1) || self.occupied(2)
    }

    pub fn loaded(&self) -> bool {
        self.runner_count() == 3
    }
}

/// Result of a plate appearance as far as the bases are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseOutcome {
    Out { double_play: bool },
    Strikeout,
    Single,
    Double,
    Triple,
    HomeRun,
    Walk,
    HitByPitch,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunScored {
    pub runner: PlayerId,
    pub earned: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub bases: BaseState,
    pub runs: Vec<RunScored>,
    /// Outs added by this play (0-2)
    pub outs: u8,
    /// Potential outs after the play
    pub potential_outs: u8,
    /// UBR credits from extra-advance attempts
    pub ubr: Vec<(PlayerId, f32)>,
}

impl Transition {
    pub fn earned_runs(&self) -> u32 {
        self.runs.iter().filter(|r| r.earned).count() as u32
    }
}

// ============================================================================
// Extra advances
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceAttempt {
    /// Runner on second tries to score on a single
    SecondToHomeOnSingle,
    /// Runner on first tries for third on a single
    FirstToThirdOnSingle,
    /// Runner on first tries to score on a double
    FirstToHomeOnDouble,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvanceRoll {
    pub success: bool,
    pub ubr: f32,
}

impl AdvanceRoll {
    pub const HOLD: AdvanceRoll = AdvanceRoll {
        success: false,
        ubr: 0.0,
    };
}

/// Decides extra-base attempts during a transition.
pub trait AdvanceJudge {
    fn attempt(&mut self, runner: &Runner, attempt: AdvanceAttempt, direction: Option<u8>)
        -> AdvanceRoll;
}

/// Base chance of taking the extra base before the speed adjustment.
pub fn extra_advance_base(attempt: AdvanceAttempt, direction: Option<u8>) -> f32 {
    match attempt {
        AdvanceAttempt::SecondToHomeOnSingle => match direction {
            Some(7) => 0.45,
            Some(d) if d >= 8 => 0.6,
            _ => 0.0,
        },
        AdvanceAttempt::FirstToThirdOnSingle => match direction {
            Some(9) => 0.5,
            Some(8) => 0.25,
            Some(7) => 0.05,
            _ => 0.0,
        },
        AdvanceAttempt::FirstToHomeOnDouble => 0.4,
    }
}

/// 추가 진루 성공 확률 (속도 보정)
pub fn extra_advance_chance(base: f32, speed: f32) -> f32 {
    (base + (speed - 5.0) * 0.01).clamp(0.0, MAX_ADVANCE_CHANCE)
}

/// Production judge: rolls against runner speed and credits UBR relative to
/// a league-average runner.
pub struct RolledAdvance<'a, R: Rng> {
    rng: &'a mut R,
    league_speed: f32,
}

impl<'a, R: Rng> RolledAdvance<'a, R> {
    pub fn new(rng: &'a mut R, league_speed: f32) -> Self {
        Self { rng, league_speed }
    }
}

impl<R: Rng> AdvanceJudge for RolledAdvance<'_, R> {
    fn attempt(
        &mut self,
        runner: &Runner,
        attempt: AdvanceAttempt,
        direction: Option<u8>,
    ) -> AdvanceRoll {
        let base = extra_advance_base(attempt, direction);
        if base <= 0.0 {
            return AdvanceRoll::HOLD;
        }
        let speed = if runner.speed > 0.0 {
            runner.speed
        } else {
            DEFAULT_RUNNER_SPEED
        };
        let chance = extra_advance_chance(base, speed);
        let avg_chance = extra_advance_chance(base, self.league_speed);
        let success = self.rng.gen::<f32>() < chance;
        let ubr = ((success as u8 as f32) - avg_chance) * UBR_RUN_VALUE;
        AdvanceRoll { success, ubr }
    }
}

// ============================================================================
// Double plays
// ============================================================================

/// 병살 확률: lead-runner speed vs. middle-infield glove
pub fn double_play_chance(runner_speed: f32, shortstop_fielding: f32, second_fielding: f32) -> f32 {
    let or_default = |v: f32| if v > 0.0 { v } else { 10.0 };
    let middle = (or_default(shortstop_fielding) + or_default(second_fielding)) / 2.0;
    (0.60 - (or_default(runner_speed) - 10.0) * 0.02 + (middle - 10.0) * 0.02).clamp(0.1, 0.9)
}

// ============================================================================
// Transition
// ============================================================================

struct Scorer {
    potential_outs: u8,
    runs: Vec<RunScored>,
}

impl Scorer {
    fn score(&mut self, runner: Runner) {
        self.runs.push(RunScored {
            runner: runner.id,
            earned: runner.earned && self.potential_outs < EARNED_RUN_CUTOFF,
        });
    }

    fn score_unearned(&mut self, runner: Runner) {
        self.runs.push(RunScored {
            runner: runner.id,
            earned: false,
        });
    }
}

/// Apply a plate-appearance outcome to the bases.
///
/// `batter` is the runner the batter becomes if he reaches. Outs do not move
/// runners; a double play removes the runner on first.
pub fn advance<J: AdvanceJudge>(
    state: &BaseState,
    outcome: BaseOutcome,
    batter: Runner,
    direction: Option<u8>,
    potential_outs: u8,
    judge: &mut J,
) -> Transition {
    let [first, second, third] = state.bases;
    let mut next: [Option<Runner>; 3] = [None, None, None];
    let mut scorer = Scorer {
        potential_outs,
        runs: Vec::new(),
    };
    let mut ubr = Vec::new();
    let mut outs = 0;

    match outcome {
        BaseOutcome::Strikeout | BaseOutcome::Out { double_play: false } => {
            outs = 1;
            next = state.bases;
        }
        BaseOutcome::Out { double_play: true } => {
            outs = 2;
            next = [None, second, third];
        }
        BaseOutcome::HomeRun => {
            for runner in state.bases.into_iter().flatten() {
                scorer.score(runner);
            }
            scorer.score(Runner {
                earned: true,
                ..batter
            });
        }
        BaseOutcome::Triple => {
            for runner in state.bases.into_iter().flatten() {
                scorer.score(runner);
            }
            next[2] = Some(batter);
        }
        BaseOutcome::Double => {
            if let Some(r) = third {
                scorer.score(r);
            }
            if let Some(r) = second {
                scorer.score(r);
            }
            if let Some(r) = first {
                let roll = judge.attempt(&r, AdvanceAttempt::FirstToHomeOnDouble, direction);
                ubr.push((r.id, roll.ubr));
                if roll.success {
                    scorer.score(r);
                } else {
                    next[2] = Some(r);
                }
            }
            next[1] = Some(batter);
        }
        BaseOutcome::Single => {
            if let Some(r) = third {
                scorer.score(r);
            }
            if let Some(r) = second {
                let roll = judge.attempt(&r, AdvanceAttempt::SecondToHomeOnSingle, direction);
                ubr.push((r.id, roll.ubr));
                if roll.success {
                    scorer.score(r);
                } else {
                    next[2] = Some(r);
                }
            }
            if let Some(r) = first {
                let roll = judge.attempt(&r, AdvanceAttempt::FirstToThirdOnSingle, direction);
                ubr.push((r.id, roll.ubr));
                if roll.success && next[2].is_none() {
                    next[2] = Some(r);
                } else {
                    next[1] = Some(r);
                }
            }
            next[0] = Some(batter);
        }
        BaseOutcome::Walk | BaseOutcome::HitByPitch => {
            // forced advances only
            next[0] = Some(batter);
            match (first, second, third) {
                (None, _, _) => {
                    next[1] = second;
                    next[2] = third;
                }
                (Some(f), None, _) => {
                    next[1] = Some(f);
                    next[2] = third;
                }
                (Some(f), Some(s), t) => {
                    next[1] = Some(f);
                    next[2] = Some(s);
                    if let Some(t) = t {
                        scorer.score(t);
                    }
                }
            }
        }
        BaseOutcome::Error => {
            scorer.potential_outs = scorer.potential_outs.saturating_add(1);
            if let Some(r) = third {
                scorer.score_unearned(r);
            }
            next[2] = second;
            next[1] = first;
            next[0] = Some(Runner {
                earned: false,
                ..batter
            });
        }
    }

    let potential_outs = scorer.potential_outs.saturating_add(outs);
    Transition {
        bases: BaseState { bases: next },
        runs: scorer.runs,
        outs,
        potential_outs,
        ubr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Judge that always gives the same answer.
    struct Always(bool);

    impl AdvanceJudge for Always {
        fn attempt(&mut self, _: &Runner, _: AdvanceAttempt, _: Option<u8>) -> AdvanceRoll {
            AdvanceRoll {
                success: self.0,
                ubr: if self.0 { 0.1 } else { -0.1 },
            }
        }
    }

    fn runner(id: u32) -> Runner {
        Runner::new(PlayerId(id), 10.0)
    }

    fn loaded() -> BaseState {
        BaseState {
            bases: [Some(runner(1)), Some(runner(2)), Some(runner(3))],
        }
    }

    #[test]
    fn test_bases_loaded_single_to_right() {
        let batter = runner(9);
        let all_go = advance(&loaded(), BaseOutcome::Single, batter, Some(9), 0, &mut Always(true));
        assert_eq!(all_go.runs.len(), 2);
        assert_eq!(all_go.bases.bases[2].map(|r| r.id), Some(PlayerId(1)));
        assert_eq!(all_go.bases.bases[0].map(|r| r.id), Some(PlayerId(9)));
        assert_eq!(all_go.ubr.len(), 2);

        let all_hold = advance(&loaded(), BaseOutcome::Single, batter, Some(9), 0, &mut Always(false));
        assert_eq!(all_hold.runs.len(), 1);
        assert!(all_hold.bases.loaded());
        assert_eq!(all_hold.bases.bases[2].map(|r| r.id), Some(PlayerId(2)));

        for t in [&all_go, &all_hold] {
            assert!((1..=3).contains(&t.runs.len()));
            assert_eq!(t.outs, 0);
        }
    }

    #[test]
    fn test_first_to_third_blocked_by_runner_holding_at_third() {
        // second holds at third, so first stops at second even on success
        struct Split;
        impl AdvanceJudge for Split {
            fn attempt(&mut self, _: &Runner, a: AdvanceAttempt, _: Option<u8>) -> AdvanceRoll {
                AdvanceRoll {
                    success: a == AdvanceAttempt::FirstToThirdOnSingle,
                    ubr: 0.0,
                }
            }
        }
        let state = BaseState {
            bases: [Some(runner(1)), Some(runner(2)), None],
        };
        let t = advance(&state, BaseOutcome::Single, runner(9), Some(9), 0, &mut Split);
        assert!(t.runs.is_empty());
        assert_eq!(t.bases.bases[1].map(|r| r.id), Some(PlayerId(1)));
        assert_eq!(t.bases.bases[2].map(|r| r.id), Some(PlayerId(2)));
    }

    #[test]
    fn test_walk_forces_only() {
        let state = BaseState {
            bases: [None, Some(runner(2)), Some(runner(3))],
        };
        let t = advance(&state, BaseOutcome::Walk, runner(9), None, 0, &mut Always(true));
        assert!(t.runs.is_empty());
        assert!(t.bases.loaded());

        let t = advance(&loaded(), BaseOutcome::HitByPitch, runner(9), None, 1, &mut Always(true));
        assert_eq!(t.runs, vec![RunScored { runner: PlayerId(3), earned: true }]);
        assert!(t.bases.loaded());

        let state = BaseState {
            bases: [Some(runner(1)), None, Some(runner(3))],
        };
        let t = advance(&state, BaseOutcome::Walk, runner(9), None, 0, &mut Always(true));
        assert!(t.runs.is_empty());
        assert_eq!(t.bases.bases[2].map(|r| r.id), Some(PlayerId(3)));
        assert_eq!(t.bases.bases[1].map(|r| r.id), Some(PlayerId(1)));
    }

    #[test]
    fn test_error_puts_unearned_batter_on_and_scores_third_unearned() {
        let t = advance(&loaded(), BaseOutcome::Error, runner(9), Some(6), 1, &mut Always(true));
        assert_eq!(t.potential_outs, 2);
        assert_eq!(t.runs, vec![RunScored { runner: PlayerId(3), earned: false }]);
        let on_first = t.bases.bases[0].unwrap();
        assert_eq!(on_first.id, PlayerId(9));
        assert!(!on_first.earned);
        assert_eq!(t.bases.bases[2].map(|r| r.id), Some(PlayerId(2)));
    }

    #[test]
    fn test_unearned_runner_stays_unearned_on_homer() {
        let state = BaseState {
            bases: [
                Some(Runner {
                    earned: false,
                    ..runner(1)
                }),
                None,
                None,
            ],
        };
        let t = advance(&state, BaseOutcome::HomeRun, runner(9), Some(8), 0, &mut Always(true));
        assert_eq!(t.runs.len(), 2);
        assert_eq!(t.earned_runs(), 1);
        assert!(t.bases.is_empty());
    }

    #[test]
    fn test_earned_runs_stop_at_three_potential_outs() {
        let t = advance(&loaded(), BaseOutcome::HomeRun, runner(9), Some(7), 3, &mut Always(true));
        assert_eq!(t.runs.len(), 4);
        assert_eq!(t.earned_runs(), 0);

        let t = advance(&loaded(), BaseOutcome::Triple, runner(9), Some(7), 2, &mut Always(true));
        assert_eq!(t.earned_runs(), 3);
        assert_eq!(t.bases.bases[2].map(|r| r.id), Some(PlayerId(9)));
    }

    #[test]
    fn test_double_play_clears_first() {
        let state = BaseState {
            bases: [Some(runner(1)), None, Some(runner(3))],
        };
        let t = advance(
            &state,
            BaseOutcome::Out { double_play: true },
            runner(9),
            Some(6),
            0,
            &mut Always(true),
        );
        assert_eq!(t.outs, 2);
        assert_eq!(t.potential_outs, 2);
        assert!(!t.bases.occupied(0));
        assert!(t.bases.occupied(2));
        assert!(t.runs.is_empty());
    }

    #[test]
    fn test_double_scores_from_first_on_success() {
        let state = BaseState {
            bases: [Some(runner(1)), None, None],
        };
        let t = advance(&state, BaseOutcome::Double, runner(9), Some(8), 0, &mut Always(true));
        assert_eq!(t.runs.len(), 1);
        let t = advance(&state, BaseOutcome::Double, runner(9), Some(8), 0, &mut Always(false));
        assert!(t.runs.is_empty());
        assert_eq!(t.bases.bases[2].map(|r| r.id), Some(PlayerId(1)));
        assert_eq!(t.bases.bases[1].map(|r| r.id), Some(PlayerId(9)));
    }

    #[test]
    fn test_extra_advance_tables() {
        assert_eq!(extra_advance_base(AdvanceAttempt::SecondToHomeOnSingle, Some(4)), 0.0);
        assert_eq!(extra_advance_base(AdvanceAttempt::SecondToHomeOnSingle, Some(7)), 0.45);
        assert_eq!(extra_advance_base(AdvanceAttempt::SecondToHomeOnSingle, Some(9)), 0.6);
        assert_eq!(extra_advance_base(AdvanceAttempt::FirstToThirdOnSingle, Some(8)), 0.25);
        assert_eq!(extra_advance_chance(0.9, 20.0), 0.95);
    }

    #[test]
    fn test_rolled_advance_holds_without_rolling_on_infield_single() {
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
        let mut judge = RolledAdvance::new(&mut rng, 6.0);
        let roll = judge.attempt(&runner(2), AdvanceAttempt::SecondToHomeOnSingle, Some(5));
        assert_eq!(roll, AdvanceRoll::HOLD);
    }

    #[test]
    fn test_double_play_chance_bounds() {
        assert!((double_play_chance(10.0, 10.0, 10.0) - 0.6).abs() < 1e-6);
        assert!((double_play_chance(0.0, 0.0, 0.0) - 0.6).abs() < 1e-6);
        assert_eq!(double_play_chance(60.0, 1.0, 1.0), 0.1);
        assert_eq!(double_play_chance(1.0, 40.0, 40.0), 0.9);
    }
}
