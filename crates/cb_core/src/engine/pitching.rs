//! Pitcher usage: stamina budget, relief selection, rotation, fatigue
//!
//! Pure functions over ratings and the current game line; the game loop
//! decides who is still available.

use super::baserunning::BaseOutcome;
use super::config::{FatigueConfig, PitchingConfig};
use crate::models::{PitcherRole, Player, PlayerGameStats};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;

// ============================================================================
// Stamina
// ============================================================================

/// Stamina rating clamped to the configured cap; unrated → default.
pub fn effective_stamina(player: &Player, cfg: &PitchingConfig) -> f32 {
    let raw = if player.abilities.stamina > 0.0 {
        player.abilities.stamina
    } else {
        cfg.default_stamina
    };
    raw.min(cfg.stamina_cap)
}

/// Pitch-unit budget for the pitcher on the mound.
pub fn stamina_budget(player: &Player, is_game_starter: bool, cfg: &PitchingConfig) -> f32 {
    effective_stamina(player, cfg) * multiplier(is_game_starter, cfg)
}

fn multiplier(is_game_starter: bool, cfg: &PitchingConfig) -> f32 {
    if is_game_starter {
        cfg.starter_stamina_multiplier
    } else {
        cfg.reliever_stamina_multiplier
    }
}

/// Actual pitch count, or an estimate from the line when none was tracked.
pub fn effective_pitch_count(stats: &PlayerGameStats) -> f32 {
    if stats.pitch_count > 0 {
        stats.pitch_count as f32
    } else {
        stats.innings_pitched() * 15.0
            + stats.hits_allowed as f32 * 5.0
            + stats.walks_allowed as f32 * 5.0
    }
}

/// 대량 실점 (이번 이닝 또는 누적 자책)
pub fn is_blown_up(stats: &PlayerGameStats, inning_runs: u32, cfg: &PitchingConfig) -> bool {
    inning_runs >= cfg.blowup_inning_runs || stats.earned_runs >= cfg.blowup_earned_runs
}

// ============================================================================
// Relief
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReliefSituation {
    pub inning: u8,
    /// Fielding team's runs minus the batting team's
    pub lead: i32,
    /// Runs the fielding team has allowed this half-inning
    pub inning_runs: u32,
    /// Current pitcher started this game
    pub is_game_starter: bool,
}

impl ReliefSituation {
    pub fn is_save_situation(&self) -> bool {
        (1..=3).contains(&self.lead) && self.inning >= 9
    }
}

/// Decide whether to go to the bullpen and whom to bring in.
///
/// `available` holds teammates who have not appeared in this game; the
/// function itself skips starters and non-pitchers.
pub fn choose_relief<'a>(
    current: &Player,
    stats: &PlayerGameStats,
    situation: &ReliefSituation,
    available: &[&'a Player],
    cfg: &PitchingConfig,
) -> Option<&'a Player> {
    let mult = multiplier(situation.is_game_starter, cfg);
    let budget = stamina_budget(current, situation.is_game_starter, cfg);
    let pitch_count = effective_pitch_count(stats);
    let stamina_factor = ((budget - pitch_count) / mult / 10.0 + 1.0).max(0.1);
    let blown_up = is_blown_up(stats, situation.inning_runs, cfg);

    // Complete-game pace: a starter protecting a lead in the 9th+
    if situation.is_game_starter && situation.inning >= 9 && situation.lead > 0 && !blown_up {
        let mut limit = cfg.complete_game_pitch_limit;
        if stats.earned_runs == 0 {
            limit += cfg.shutout_pitch_bonus;
        }
        if pitch_count < limit as f32 && current.fatigue < cfg.complete_game_fatigue_limit {
            return None;
        }
    }

    if situation.is_save_situation() {
        if current.pitcher_role == Some(PitcherRole::Closer) {
            if !blown_up {
                return None;
            }
        } else if let Some(closer) = available
            .iter()
            .find(|p| p.pitcher_role == Some(PitcherRole::Closer))
        {
            if closer.fatigue < cfg.closer_fatigue_limit {
                return Some(*closer);
            }
        }
    }

    let penalty = late_inning_penalty(situation, stats, pitch_count, cfg);

    let mut best: Option<(&'a Player, f32)> = None;
    for candidate in available.iter().copied() {
        if !candidate.is_pitcher() || candidate.pitcher_role == Some(PitcherRole::Starter) {
            continue;
        }
        if candidate.fatigue >= cfg.reliever_fatigue_limit && !blown_up {
            continue;
        }
        let score = relief_score(candidate, stamina_factor, cfg);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }

    let threshold = budget - penalty;
    match best {
        Some((pitcher, score)) if score > threshold || blown_up => Some(pitcher),
        _ => None,
    }
}

fn late_inning_penalty(
    situation: &ReliefSituation,
    stats: &PlayerGameStats,
    pitch_count: f32,
    cfg: &PitchingConfig,
) -> f32 {
    if situation.inning < cfg.late_inning {
        return 0.0;
    }
    if !situation.is_game_starter {
        // reliever going into a second inning
        return if stats.outs_recorded >= 3 {
            cfg.multi_inning_penalty
        } else {
            0.0
        };
    }
    let mut penalty = if pitch_count > cfg.high_pitch_count as f32 {
        cfg.starter_high_count_penalty
    } else {
        cfg.starter_late_penalty
    };
    if situation.inning >= 8 {
        penalty += cfg.eighth_inning_penalty;
    }
    penalty
}

/// 불펜 평가값: stamina in pitch units, scaled by how spent the current
/// pitcher is, discounted for fatigue and season workload.
pub fn relief_score(candidate: &Player, stamina_factor: f32, cfg: &PitchingConfig) -> f32 {
    let stamina = effective_stamina(candidate, cfg) * cfg.reliever_stamina_multiplier;
    let fatigue_factor = 1.0 - (candidate.fatigue * cfg.fatigue_score_penalty).min(cfg.fatigue_score_cap);
    let usage_factor = if candidate.games_pitched > cfg.workload_games {
        cfg.workload_factor
    } else {
        1.0
    };
    stamina / stamina_factor * fatigue_factor * usage_factor
}

// ============================================================================
// Rotation
// ============================================================================

/// Rotation slot for a game date: Tue..Sat → 0..4, Sun → 5, Monday off.
pub fn rotation_slot(date: NaiveDate) -> Option<usize> {
    match date.weekday() {
        Weekday::Mon => None,
        Weekday::Sun => Some(5),
        day => Some(day.num_days_from_monday() as usize - 1),
    }
}

pub fn rotation_score(pitcher: &Player) -> f32 {
    pitcher.abilities.starter_aptitude * 2.0 + pitcher.abilities.stamina + pitcher.abilities.overall
}

/// Starter-role pitchers, best first.
pub fn rotation(roster: &[Player]) -> Vec<&Player> {
    let mut starters: Vec<&Player> = roster
        .iter()
        .filter(|p| p.pitcher_role == Some(PitcherRole::Starter))
        .collect();
    starters.sort_by(|a, b| rotation_score(b).total_cmp(&rotation_score(a)));
    starters
}

// ============================================================================
// Pitch counts and fatigue
// ============================================================================

/// 타석당 투구수 (±1 랜덤, 최소 1)
pub fn pitches_for<R: Rng>(outcome: BaseOutcome, rng: &mut R) -> u32 {
    let base: i32 = match outcome {
        BaseOutcome::Strikeout => 5,
        BaseOutcome::Walk => 6,
        BaseOutcome::HitByPitch => 2,
        BaseOutcome::Single | BaseOutcome::Double | BaseOutcome::Triple | BaseOutcome::HomeRun => 4,
        BaseOutcome::Out { .. } | BaseOutcome::Error => 3,
    };
    (base + rng.gen_range(-1..=1)).max(1) as u32
}

/// Post-game fatigue added to a pitcher who appeared.
pub fn fatigue_delta(
    pitcher: &Player,
    stats: &PlayerGameStats,
    is_game_starter: bool,
    pitching: &PitchingConfig,
    cfg: &FatigueConfig,
) -> f32 {
    let base = if is_game_starter {
        cfg.starter_base
    } else {
        cfg.reliever_base
    };
    let stamina = effective_stamina(pitcher, pitching);
    let relief = (1.0 - stamina / pitching.stamina_cap * cfg.stamina_relief).max(cfg.min_factor);
    base + stats.pitch_count as f32 / cfg.pitches_per_unit * relief
}

/// One day of rest.
pub fn recover(fatigue: f32, recovery: f32) -> f32 {
    (fatigue - recovery).max(0.0)
}
