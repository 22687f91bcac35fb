//! Player Substitution Logic
//!
//! 교체 판단은 순수 함수, 적용은 `GameEngine` 메서드.
//!
//! ## 포함 함수
//! - defensive_replacement: 7회 이후 리드/동점 시 수비 강화
//! - pinch_hitter: 7회 이후 약한 타자 / 투수 타석 대타
//! - pinch_runner: 8회 이후 접전에서 느린 주자 대주자
//! - forced_reliever: 대타로 빠진 투수의 후임
//!
//! Every substitute comes from players who have not appeared yet, and a
//! player who leaves never returns (`GameSimulationContext::mark_used`).

use super::baserunning::Runner;
use super::game::GameEngine;
use super::half_inning::HalfInning;
use super::pitching::{choose_relief, relief_score, ReliefSituation};
use crate::engine::config::PitchingConfig;
use crate::models::{PitcherRole, Player, PlayerId, Position, Side};
use rand::Rng;
use tracing::{debug, warn};

const DEFENSIVE_SUB_INNING: u8 = 7;
const PINCH_HIT_INNING: u8 = 7;
const PINCH_RUN_INNING: u8 = 8;
/// Aptitude below this is a liability in the field
const MIN_APTITUDE: f32 = 3.0;
/// 접전 (3점 이내) 수비력 기준
const CLOSE_GAME_FIELDING: f32 = 10.0;
/// Weak hitter: contact and power both below these
const WEAK_CONTACT: f32 = 10.0;
const WEAK_POWER: f32 = 12.0;
/// Runners this fast stay in
const PINCH_RUN_SPEED: f32 = 10.0;

// ============================================================================
// Decisions
// ============================================================================

/// Does the fielder at `position` need replacing? `lead` is the fielding
/// side's lead.
pub fn needs_defensive_upgrade(player: &Player, position: Position, lead: i32) -> bool {
    player.aptitude_at(position) < MIN_APTITUDE
        || (player.abilities.fielding < CLOSE_GAME_FIELDING && lead <= 3)
}

/// 수비 교체 후보: apt ≥ 3 and a better glove than the current fielder,
/// best by `aptitude*2 + fielding + arm/2`.
pub fn defensive_replacement<'a>(
    current: &Player,
    position: Position,
    inning: u8,
    lead: i32,
    bench: &[&'a Player],
) -> Option<&'a Player> {
    if inning < DEFENSIVE_SUB_INNING || lead < 0 {
        return None;
    }
    if position.is_pitcher() || !position.is_defensive() {
        return None;
    }
    if !needs_defensive_upgrade(current, position, lead) {
        return None;
    }

    let score = |p: &Player| {
        p.aptitude_at(position) * 2.0 + p.abilities.fielding + p.abilities.arm * 0.5
    };
    let mut best: Option<(&'a Player, f32)> = None;
    for candidate in bench.iter().copied() {
        if candidate.is_pitcher()
            || candidate.aptitude_at(position) < MIN_APTITUDE
            || candidate.abilities.fielding <= current.abilities.fielding
        {
            continue;
        }
        let s = score(candidate);
        if best.map_or(true, |(_, b)| s > b) {
            best = Some((candidate, s));
        }
    }
    best.map(|(p, _)| p)
}

fn pinch_score(p: &Player, scoring_position: bool) -> f32 {
    let (contact, power) = (p.abilities.contact, p.abilities.power);
    if scoring_position {
        contact * 2.0 + power
    } else {
        contact + power * 2.0
    }
}

/// 대타 판단. `lead` is the batting side's lead.
///
/// A due-up pitcher is always hit for. A weak hitter is hit for with a
/// runner in scoring position, or when trailing from the 8th on, provided
/// the bench has a better bat.
pub fn pinch_hitter<'a>(
    batter: &Player,
    pitcher_slot: bool,
    inning: u8,
    lead: i32,
    scoring_position: bool,
    bench: &[&'a Player],
) -> Option<&'a Player> {
    if inning < PINCH_HIT_INNING || lead > 1 {
        return None;
    }
    let weak = batter.abilities.contact < WEAK_CONTACT && batter.abilities.power < WEAK_POWER;
    let needed = pitcher_slot || (weak && (scoring_position || (inning >= 8 && lead < 0)));
    if !needed {
        return None;
    }

    let mut best: Option<(&'a Player, f32)> = None;
    for candidate in bench.iter().copied().filter(|p| !p.is_pitcher()) {
        let s = pinch_score(candidate, scoring_position);
        if best.map_or(true, |(_, b)| s > b) {
            best = Some((candidate, s));
        }
    }
    let (candidate, score) = best?;
    if pitcher_slot || score > pinch_score(batter, scoring_position) {
        Some(candidate)
    } else {
        None
    }
}

/// 대주자: fastest bench player, only if faster than a slow runner.
pub fn pinch_runner<'a>(
    runner_speed: f32,
    inning: u8,
    lead: i32,
    bench: &[&'a Player],
) -> Option<&'a Player> {
    if inning < PINCH_RUN_INNING || lead.abs() > 2 || runner_speed >= PINCH_RUN_SPEED {
        return None;
    }
    let mut best: Option<&'a Player> = None;
    let mut top = runner_speed;
    for candidate in bench.iter().copied().filter(|p| !p.is_pitcher()) {
        if candidate.abilities.speed > top {
            top = candidate.abilities.speed;
            best = Some(candidate);
        }
    }
    best
}

/// Pitcher to take over a lifted pitcher's spot: the best unused reliever,
/// or an unused starter when the bullpen is empty.
pub fn forced_reliever<'a>(bench: &[&'a Player], cfg: &PitchingConfig) -> Option<&'a Player> {
    let mut best: Option<(&'a Player, bool, f32)> = None;
    for candidate in bench.iter().copied().filter(|p| p.is_pitcher()) {
        let reliever = candidate.pitcher_role != Some(PitcherRole::Starter);
        let s = relief_score(candidate, 1.0, cfg);
        let better = match best {
            None => true,
            Some((_, best_reliever, b)) => (reliever, s) > (best_reliever, b),
        };
        if better {
            best = Some((candidate, reliever, s));
        }
    }
    best.map(|(p, _, _)| p)
}

// ============================================================================
// Application
// ============================================================================

impl<'a, R: Rng> GameEngine<'a, R> {
    /// Swap `incoming` into batting slot `slot`.
    fn substitute(
        &mut self,
        side: Side,
        slot: usize,
        incoming: PlayerId,
        label: Position,
    ) -> PlayerId {
        self.game.mark_used(side, incoming);
        self.teams[side.index()].replace_in_slot(slot, incoming, label)
    }

    fn bring_in(&mut self, side: Side, incoming: PlayerId) {
        self.game.mark_used(side, incoming);
        let inning = self.game.inning;
        let team = &mut self.teams[side.index()];
        let outgoing = team.pitcher;
        team.bring_in_pitcher(incoming);
        debug!(inning, team = %team.team, from = %outgoing, to = %incoming, "pitching change");
    }

    /// A pitcher whose batting slot went to a pinch hitter or runner must be
    /// replaced before his side takes the field again.
    pub(crate) fn replace_lifted_pitcher(&mut self, side: Side) {
        let team = &self.teams[side.index()];
        if !team.pitcher_lifted {
            return;
        }
        let bench = team.bench(&self.game);
        match forced_reliever(&bench, &self.sim.config.pitching).map(|p| p.id) {
            Some(incoming) => self.bring_in(side, incoming),
            None => {
                warn!(team = %team.team, "no pitcher left to replace the lifted pitcher");
                self.teams[side.index()].pitcher_lifted = false;
            }
        }
    }

    pub(crate) fn defensive_substitutions(&mut self, side: Side) {
        let inning = self.game.inning;
        let lead = self.game.lead(side);
        if inning < DEFENSIVE_SUB_INNING || lead < 0 {
            return;
        }

        for slot in 0..self.teams[side.index()].lineup.len() {
            let team = &self.teams[side.index()];
            let position = team.lineup[slot].position;
            let Some(current) = team.player(team.lineup[slot].player_id) else {
                continue;
            };
            let bench = team.bench(&self.game);
            let Some(incoming) =
                defensive_replacement(current, position, inning, lead, &bench).map(|p| p.id)
            else {
                continue;
            };
            let outgoing = self.substitute(side, slot, incoming, position);
            debug!(inning, %position, from = %outgoing, to = %incoming, "defensive substitution");
        }
    }

    pub(crate) fn consider_pitching_change(&mut self, side: Side, inning_runs: u32) {
        let team = &self.teams[side.index()];
        let (Some(current), Some(line)) = (team.current_pitcher(), team.line(team.pitcher)) else {
            return;
        };
        let situation = ReliefSituation {
            inning: self.game.inning,
            lead: self.game.lead(side),
            inning_runs,
            is_game_starter: team.pitcher == team.game_starter,
        };
        let bench = team.bench(&self.game);
        let Some(incoming) =
            choose_relief(current, line, &situation, &bench, &self.sim.config.pitching).map(|p| p.id)
        else {
            return;
        };
        self.bring_in(side, incoming);
    }

    pub(crate) fn consider_pinch_hitter(&mut self, half: &HalfInning) {
        let side = self.game.batting;
        let inning = self.game.inning;
        let team = &self.teams[side.index()];
        if team.lineup.is_empty() {
            return;
        }
        let slot = team.next_batter % team.lineup.len();
        let pitcher_slot = team.lineup[slot].position.is_pitcher();
        let Some(batter) = team.player(team.lineup[slot].player_id) else {
            return;
        };
        let bench = team.bench(&self.game);
        // the pitcher bats for himself when nobody could take the mound
        if pitcher_slot && forced_reliever(&bench, &self.sim.config.pitching).is_none() {
            return;
        }
        let Some(incoming) = pinch_hitter(
            batter,
            pitcher_slot,
            inning,
            self.game.lead(side),
            half.bases.scoring_position(),
            &bench,
        )
        .map(|p| p.id) else {
            return;
        };

        let outgoing = self.substitute(side, slot, incoming, Position::PinchHitter);
        if pitcher_slot {
            self.teams[side.index()].pitcher_lifted = true;
        }
        debug!(inning, from = %outgoing, to = %incoming, "pinch hitter");
    }

    /// At most one pinch runner per half-inning.
    pub(crate) fn consider_pinch_runner(&mut self, half: &mut HalfInning) {
        let side = self.game.batting;
        let inning = self.game.inning;
        let lead = self.game.lead(side);

        for base in 0..3 {
            let Some(runner) = half.bases.bases[base] else {
                continue;
            };
            let team = &self.teams[side.index()];
            let Some(slot) = team.lineup.iter().position(|s| s.player_id == runner.id) else {
                continue;
            };
            let pitcher_slot = team.lineup[slot].position.is_pitcher();
            let bench = team.bench(&self.game);
            if pitcher_slot && forced_reliever(&bench, &self.sim.config.pitching).is_none() {
                continue;
            }
            let Some((incoming, speed)) =
                pinch_runner(runner.speed, inning, lead, &bench).map(|p| (p.id, p.abilities.speed))
            else {
                continue;
            };

            self.substitute(side, slot, incoming, Position::PinchRunner);
            if pitcher_slot {
                self.teams[side.index()].pitcher_lifted = true;
            }
            half.bases.bases[base] = Some(Runner {
                id: incoming,
                speed,
                ..runner
            });
            half.pinch_runner_used = true;
            debug!(inning, base = base + 1, from = %runner.id, to = %incoming, "pinch runner");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: u32, position: Position) -> Player {
        Player::new(id, format!("#{id}"), position)
    }

    fn glove(id: u32, aptitude: f32, fielding: f32) -> Player {
        let mut p = player(id, Position::Shortstop);
        p.aptitudes.short = aptitude;
        p.abilities.fielding = fielding;
        p
    }

    fn bat(id: u32, contact: f32, power: f32) -> Player {
        let mut p = player(id, Position::FirstBase);
        p.abilities.contact = contact;
        p.abilities.power = power;
        p
    }

    #[test]
    fn test_defensive_sub_only_late_and_not_trailing() {
        let starter = glove(1, 2.0, 6.0);
        let sub = glove(2, 5.0, 14.0);
        let bench = [&sub];
        assert!(defensive_replacement(&starter, Position::Shortstop, 6, 1, &bench).is_none());
        assert!(defensive_replacement(&starter, Position::Shortstop, 7, -1, &bench).is_none());
        assert_eq!(
            defensive_replacement(&starter, Position::Shortstop, 7, 0, &bench).map(|p| p.id),
            Some(PlayerId(2))
        );
    }

    #[test]
    fn test_defensive_sub_requires_aptitude_and_better_glove() {
        let starter = glove(1, 5.0, 8.0);
        // close game: fielding 8 < 10 triggers a look
        let worse = glove(2, 5.0, 7.0);
        let clumsy = glove(3, 1.0, 15.0);
        let good = glove(4, 3.0, 12.0);
        let poor_bench = [&worse, &clumsy];
        assert!(defensive_replacement(&starter, Position::Shortstop, 8, 2, &poor_bench).is_none());
        assert_eq!(
            defensive_replacement(&starter, Position::Shortstop, 8, 2, &[&worse, &clumsy, &good])
                .map(|p| p.id),
            Some(PlayerId(4))
        );
        // comfortable lead and a natural shortstop: no change
        assert!(defensive_replacement(&starter, Position::Shortstop, 8, 5, &[&good]).is_none());
        // DH never gets a defensive replacement
        assert!(
            defensive_replacement(&starter, Position::DesignatedHitter, 8, 0, &[&good]).is_none()
        );
    }

    #[test]
    fn test_pitcher_is_always_hit_for_late() {
        let pitcher = player(1, Position::Pitcher);
        let weak_bat = bat(2, 1.0, 1.0);
        assert_eq!(
            pinch_hitter(&pitcher, true, 7, 0, false, &[&weak_bat]).map(|p| p.id),
            Some(PlayerId(2))
        );
        // too early, or comfortably ahead
        assert!(pinch_hitter(&pitcher, true, 6, 0, false, &[&weak_bat]).is_none());
        assert!(pinch_hitter(&pitcher, true, 8, 2, false, &[&weak_bat]).is_none());
    }

    #[test]
    fn test_weak_hitter_pinch_hit_in_scoring_position() {
        let weak = bat(1, 8.0, 8.0);
        let contact = bat(2, 15.0, 5.0);
        let slugger = bat(3, 8.0, 18.0);
        let bench = [&contact, &slugger];
        // RISP: contact weighted
        assert_eq!(
            pinch_hitter(&weak, false, 7, 0, true, &bench).map(|p| p.id),
            Some(PlayerId(2))
        );
        // no RISP, not trailing late: keep the batter
        assert!(pinch_hitter(&weak, false, 7, 0, false, &bench).is_none());
        // trailing in the 8th: power weighted
        assert_eq!(
            pinch_hitter(&weak, false, 8, -1, false, &bench).map(|p| p.id),
            Some(PlayerId(3))
        );
        // a decent hitter stays
        let solid = bat(4, 12.0, 8.0);
        assert!(pinch_hitter(&solid, false, 9, -3, true, &bench).is_none());
    }

    #[test]
    fn test_pinch_runner_needs_close_late_game_and_faster_legs() {
        let mut burner = player(2, Position::CenterField);
        burner.abilities.speed = 16.0;
        let mut pitcher = player(3, Position::Pitcher);
        pitcher.abilities.speed = 20.0;
        let bench = [&burner, &pitcher];

        assert_eq!(pinch_runner(5.0, 8, -2, &bench).map(|p| p.id), Some(PlayerId(2)));
        assert!(pinch_runner(5.0, 7, 0, &bench).is_none());
        assert!(pinch_runner(5.0, 9, 3, &bench).is_none());
        assert!(pinch_runner(12.0, 9, 0, &bench).is_none());
        assert!(pinch_runner(5.0, 9, 0, &[&pitcher]).is_none());
    }

    #[test]
    fn test_forced_reliever_prefers_relievers_over_starters() {
        let cfg = PitchingConfig::default();
        let mut starter = player(1, Position::Pitcher);
        starter.pitcher_role = Some(PitcherRole::Starter);
        starter.abilities.stamina = 15.0;
        let mut long_man = player(2, Position::Pitcher);
        long_man.pitcher_role = Some(PitcherRole::Reliever);
        long_man.abilities.stamina = 8.0;
        let fielder = player(3, Position::Catcher);
        assert_eq!(
            forced_reliever(&[&starter, &fielder, &long_man], &cfg).map(|p| p.id),
            Some(PlayerId(2))
        );
        assert!(forced_reliever(&[&fielder], &cfg).is_none());
    }

    #[test]
    fn test_forced_reliever_falls_back_to_unused_starter() {
        let cfg = PitchingConfig::default();
        let mut spot = player(1, Position::Pitcher);
        spot.pitcher_role = Some(PitcherRole::Starter);
        spot.abilities.stamina = 9.0;
        let mut ace = player(2, Position::Pitcher);
        ace.pitcher_role = Some(PitcherRole::Starter);
        ace.abilities.stamina = 15.0;
        ace.abilities.control = 15.0;
        let fielder = player(3, Position::Catcher);
        assert_eq!(
            forced_reliever(&[&fielder, &spot, &ace], &cfg).map(|p| p.id),
            Some(PlayerId(2))
        );

        // any reliever still beats a starter
        let mut mop_up = player(4, Position::Pitcher);
        mop_up.pitcher_role = Some(PitcherRole::Reliever);
        mop_up.abilities.stamina = 5.0;
        assert_eq!(
            forced_reliever(&[&ace, &mop_up], &cfg).map(|p| p.id),
            Some(PlayerId(4))
        );
    }
}
