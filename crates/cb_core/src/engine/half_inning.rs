//! Half-inning loop and plate-appearance resolution

use super::baserunning::{
    advance, double_play_chance, BaseOutcome, BaseState, RolledAdvance, Runner,
};
use super::defense::{fielder_at, is_ground_ball, resolve_ball_in_play, BallInPlay, FieldedBall};
use super::game::{split_teams, GameEngine};
use super::pitching::pitches_for;
use super::probability::{outcome_probabilities, PlateOutcome};
use super::stealing::{attempt_steals, CatcherDefense, StealEvent};
use crate::models::{AtBatDetail, PlayNotation, Position};
use rand::Rng;
use tracing::{debug, warn};

/// Share of strikeouts that are swinging
const SWINGING_STRIKEOUT_SHARE: f32 = 0.7;
/// Share of infield air outs caught as line drives
const LINE_OUT_SHARE: f32 = 0.4;

/// Running state of one half-inning.
#[derive(Debug, Clone, Default)]
pub(crate) struct HalfInning {
    pub outs: u8,
    pub potential_outs: u8,
    pub bases: BaseState,
    pub runs: u32,
    pub plate_appearances: u32,
    pub pinch_runner_used: bool,
}

impl<'a, R: Rng> GameEngine<'a, R> {
    /// Play the current half-inning to three outs (or a walk-off). Returns
    /// runs scored.
    pub(crate) fn play_half(&mut self) -> u32 {
        let batting = self.game.batting;
        let fielding = batting.opponent();
        self.replace_lifted_pitcher(fielding);
        self.defensive_substitutions(fielding);

        let mut half = HalfInning::default();
        while half.outs < 3 {
            if half.plate_appearances >= self.sim.config.max_plate_appearances_per_half {
                warn!(
                    inning = self.game.inning,
                    side = ?batting,
                    "plate-appearance cap reached, ending half-inning"
                );
                break;
            }

            self.consider_pitching_change(fielding, half.runs);

            if !half.bases.is_empty() {
                self.run_steals(&mut half);
                if half.outs >= 3 {
                    break;
                }
            }

            self.consider_pinch_hitter(&half);
            self.plate_appearance(&mut half);

            if self.game.is_walk_off() {
                break;
            }
            if half.outs < 3 && !half.pinch_runner_used {
                self.consider_pinch_runner(&mut half);
            }
        }
        half.runs
    }

    fn run_steals(&mut self, half: &mut HalfInning) {
        let inning = self.game.inning;
        let (bat, fld) = split_teams(&mut self.teams, self.game.batting);
        let catcher = CatcherDefense::of(fld.fielder(Position::Catcher));
        let report = attempt_steals(&half.bases, half.outs, catcher, &mut self.rng);

        for event in &report.events {
            match *event {
                StealEvent::Stolen { runner, to } => {
                    if let Some(line) = bat.line_mut(runner) {
                        line.stolen_bases += 1;
                    }
                    debug!(inning, %runner, base = to + 1, "stolen base");
                }
                StealEvent::CaughtStealing { runner, to } => {
                    if let Some(line) = bat.line_mut(runner) {
                        line.caught_stealing += 1;
                    }
                    if let Some(line) = fld.line_mut(fld.pitcher) {
                        line.outs_recorded += 1;
                    }
                    debug!(inning, %runner, base = to + 1, "caught stealing");
                }
            }
        }

        half.bases = report.bases;
        half.outs += report.outs_added;
        half.potential_outs += report.outs_added;
    }

    fn plate_appearance(&mut self, half: &mut HalfInning) {
        let batting = self.game.batting;
        let inning = self.game.inning;
        let sim = self.sim;
        let rng = &mut self.rng;
        let (bat, fld) = split_teams(&mut self.teams, batting);
        half.plate_appearances += 1;

        let order_len = bat.lineup.len().max(1);
        let slot = bat.next_batter % order_len;
        bat.next_batter = (slot + 1) % order_len;
        let Some(batter_id) = bat.lineup.get(slot).map(|s| s.player_id) else {
            return;
        };
        let (Some(bi), Some(pi)) = (bat.index_of(batter_id), fld.index_of(fld.pitcher)) else {
            return;
        };

        let batter_speed = bat.roster[bi].abilities.speed;
        let probabilities = outcome_probabilities(
            &bat.roster[bi].abilities,
            &fld.roster[pi].abilities,
            &sim.pitches,
        );

        // 1. Outcome, direction and fielding
        let mut direction = None;
        let mut ground_ball = false;
        let outcome = match probabilities.pick(rng.gen()) {
            PlateOutcome::HomeRun => {
                direction = Some(rng.gen_range(7..=9u8));
                BaseOutcome::HomeRun
            }
            PlateOutcome::Walk => {
                if rng.gen::<f32>() < sim.config.hit_by_pitch_share {
                    BaseOutcome::HitByPitch
                } else {
                    BaseOutcome::Walk
                }
            }
            PlateOutcome::Strikeout => BaseOutcome::Strikeout,
            in_play => {
                let ball = match in_play {
                    PlateOutcome::Single => BallInPlay::Single,
                    PlateOutcome::Double => BallInPlay::Double,
                    PlateOutcome::Triple => BallInPlay::Triple,
                    _ => BallInPlay::Out,
                };
                let dir = rng.gen_range(1..=9u8);
                direction = Some(dir);

                let fielder_id = fielder_at(&fld.alignment(), dir).unwrap_or(fld.pitcher);
                let fi = fld.index_of(fielder_id).unwrap_or(pi);
                let baseline = sim.league.baseline(Position::from_direction(dir));
                let play = resolve_ball_in_play(
                    ball,
                    dir,
                    fld.roster[fi].id,
                    &fld.roster[fi].abilities,
                    batter_speed,
                    baseline,
                    rng,
                );
                fld.stats[fi].uzr += play.uzr;

                match play.result {
                    FieldedBall::Single => BaseOutcome::Single,
                    FieldedBall::Double => BaseOutcome::Double,
                    FieldedBall::Triple => BaseOutcome::Triple,
                    FieldedBall::Error => {
                        fld.stats[fi].errors += 1;
                        BaseOutcome::Error
                    }
                    FieldedBall::Out => {
                        ground_ball = is_ground_ball(play.result, dir, rng);
                        let double_play = match half.bases.bases[0] {
                            Some(runner) if ground_ball && half.outs < 2 => {
                                let fielding = |pos: Position| {
                                    fld.fielder(pos).map_or(0.0, |p| p.abilities.fielding)
                                };
                                let chance = double_play_chance(
                                    runner.speed,
                                    fielding(Position::Shortstop),
                                    fielding(Position::SecondBase),
                                );
                                rng.gen::<f32>() < chance
                            }
                            _ => false,
                        };
                        BaseOutcome::Out { double_play }
                    }
                }
            }
        };

        let notation = match outcome {
            BaseOutcome::HomeRun => PlayNotation::HomeRun,
            BaseOutcome::Triple => PlayNotation::Triple,
            BaseOutcome::Double => PlayNotation::Double,
            BaseOutcome::Single => PlayNotation::Single,
            BaseOutcome::Walk => PlayNotation::Walk,
            BaseOutcome::HitByPitch => PlayNotation::HitByPitch,
            BaseOutcome::Error => PlayNotation::ReachedOnError,
            BaseOutcome::Strikeout => {
                if rng.gen::<f32>() < SWINGING_STRIKEOUT_SHARE {
                    PlayNotation::StrikeoutSwinging
                } else {
                    PlayNotation::StrikeoutLooking
                }
            }
            BaseOutcome::Out { double_play: true } => PlayNotation::DoublePlay,
            BaseOutcome::Out { .. } => match direction {
                Some(d) if d >= 7 => PlayNotation::FlyOut,
                _ if ground_ball => PlayNotation::GroundOut,
                _ if rng.gen::<f32>() < LINE_OUT_SHARE => PlayNotation::LineOut,
                _ => PlayNotation::FlyOut,
            },
        };
        let pitches = pitches_for(outcome, rng);

        // 2. Box score lines
        let line = &mut bat.stats[bi];
        line.plate_appearances += 1;
        if !matches!(outcome, BaseOutcome::Walk | BaseOutcome::HitByPitch) {
            line.at_bats += 1;
        }
        match outcome {
            BaseOutcome::Single => line.hits += 1,
            BaseOutcome::Double => {
                line.hits += 1;
                line.doubles += 1;
            }
            BaseOutcome::Triple => {
                line.hits += 1;
                line.triples += 1;
            }
            BaseOutcome::HomeRun => {
                line.hits += 1;
                line.home_runs += 1;
            }
            BaseOutcome::Walk => line.walks += 1,
            BaseOutcome::HitByPitch => line.hit_by_pitch += 1,
            BaseOutcome::Strikeout => line.strikeouts += 1,
            BaseOutcome::Out { double_play: true } => line.double_plays += 1,
            BaseOutcome::Out { .. } | BaseOutcome::Error => {}
        }
        line.at_bat_details.push(AtBatDetail {
            inning,
            notation,
            direction,
        });

        let line = &mut fld.stats[pi];
        line.batters_faced += 1;
        line.pitch_count += pitches;
        match outcome {
            BaseOutcome::Single | BaseOutcome::Double | BaseOutcome::Triple => {
                line.hits_allowed += 1
            }
            BaseOutcome::HomeRun => {
                line.hits_allowed += 1;
                line.home_runs_allowed += 1;
            }
            BaseOutcome::Walk => line.walks_allowed += 1,
            BaseOutcome::HitByPitch => line.hit_batters += 1,
            BaseOutcome::Strikeout => line.pitching_strikeouts += 1,
            BaseOutcome::Out { .. } | BaseOutcome::Error => {}
        }

        // 3. Bases
        let mut judge = RolledAdvance::new(rng, sim.league.all.speed);
        let transition = advance(
            &half.bases,
            outcome,
            Runner::new(batter_id, batter_speed),
            direction,
            half.potential_outs,
            &mut judge,
        );

        half.bases = transition.bases;
        half.outs += transition.outs;
        half.potential_outs = transition.potential_outs;
        fld.stats[pi].outs_recorded += u32::from(transition.outs);

        for (runner, ubr) in &transition.ubr {
            if let Some(line) = bat.line_mut(*runner) {
                line.ubr += ubr;
            }
        }
        for run in &transition.runs {
            if let Some(line) = bat.line_mut(run.runner) {
                line.runs += 1;
            }
            let pitcher = &mut fld.stats[pi];
            pitcher.runs_allowed += 1;
            if run.earned {
                pitcher.earned_runs += 1;
            }
        }
        let runs = transition.runs.len() as u32;
        if outcome != BaseOutcome::Error {
            bat.stats[bi].rbi += runs;
        }

        half.runs += runs;
        self.game.add_runs(batting, runs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::context::SimulationContext;
    use crate::engine::game::GamePlan;
    use crate::models::{Player, Side, TeamId, TeamSheet};
    use chrono::NaiveDate;

    fn roster(base: u32) -> Vec<Player> {
        let mut roster: Vec<Player> = (0..9)
            .map(|i| Player::new(base + i, format!("B{i}"), Position::Unknown))
            .collect();
        let mut p = Player::new(base + 50, "SP", Position::Pitcher);
        p.abilities.stamina = 12.0;
        roster.push(p);
        roster
    }

    fn engine(sim: &SimulationContext, seed: u64) -> GameEngine<'_> {
        GameEngine::new(
            GamePlan {
                seed,
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                season: 2024,
                home: TeamSheet::new(TeamId::new("h"), roster(1)),
                away: TeamSheet::new(TeamId::new("a"), roster(101)),
            },
            sim,
        )
    }

    #[test]
    fn test_half_inning_ends_on_three_outs() {
        let sim = SimulationContext::default();
        for seed in 0..50 {
            let mut engine = engine(&sim, seed);
            engine.game.batting = Side::Away;
            let runs = engine.play_half();
            assert_eq!(engine.game.score(Side::Away), runs);

            let away = &engine.teams[Side::Away.index()];
            let home = &engine.teams[Side::Home.index()];
            let pa: u32 = away.stats.iter().map(|s| s.plate_appearances).sum();
            let faced: u32 = home.stats.iter().map(|s| s.batters_faced).sum();
            let outs: u32 = home.stats.iter().map(|s| s.outs_recorded).sum();
            assert_eq!(pa, faced);
            assert_eq!(outs, 3);
            assert!(pa >= 3);
        }
    }

    #[test]
    fn test_batting_order_wraps_and_continues() {
        let sim = SimulationContext::default();
        let mut engine = engine(&sim, 9);
        engine.game.batting = Side::Away;
        for _ in 0..3 {
            engine.play_half();
        }
        let away = &engine.teams[Side::Away.index()];
        let pa: u32 = away.stats.iter().map(|s| s.plate_appearances).sum();
        assert_eq!(away.next_batter, pa as usize % 9);
    }

    #[test]
    fn test_rbi_never_exceeds_runs() {
        let sim = SimulationContext::default();
        for seed in 0..30 {
            let mut engine = engine(&sim, seed);
            engine.game.batting = Side::Home;
            engine.play_half();
            let home = &engine.teams[Side::Home.index()];
            let runs: u32 = home.stats.iter().map(|s| s.runs).sum();
            let rbi: u32 = home.stats.iter().map(|s| s.rbi).sum();
            assert!(rbi <= runs);
            assert_eq!(runs, engine.game.score(Side::Home));
            let details: usize = home.stats.iter().map(|s| s.at_bat_details.len()).sum();
            let pa: u32 = home.stats.iter().map(|s| s.plate_appearances).sum();
            assert_eq!(details, pa as usize);
        }
    }
}
