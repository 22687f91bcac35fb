//! Bullpen usage parameters

use serde::{Deserialize, Serialize};

/// In-game pitching change thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchingConfig {
    // === Stamina Budget ===
    /// 선발 스태미나 → 투구수 배율 (기본: 8.5)
    pub starter_stamina_multiplier: f32,
    /// 불펜 스태미나 → 투구수 배율 (기본: 3.0)
    pub reliever_stamina_multiplier: f32,
    /// 스태미나 상한 (기본: 15)
    pub stamina_cap: f32,
    /// 미평가 스태미나 기본값 (기본: 10)
    pub default_stamina: f32,

    // === Blow-up ===
    /// 이번 이닝 실점 (기본: 5)
    pub blowup_inning_runs: u32,
    /// 누적 자책점 (기본: 8)
    pub blowup_earned_runs: u32,

    // === Complete Game Pace ===
    /// 완투 허용 투구수 (기본: 115)
    pub complete_game_pitch_limit: u32,
    /// 완봉 페이스 추가 투구수 (기본: 10)
    pub shutout_pitch_bonus: u32,
    /// 완투 허용 피로도 (기본: 30)
    pub complete_game_fatigue_limit: f32,

    // === Relief Availability ===
    /// 마무리 투입 가능 피로도 (기본: 20)
    pub closer_fatigue_limit: f32,
    /// 불펜 투입 가능 피로도, 대량 실점 시 무시 (기본: 10)
    pub reliever_fatigue_limit: f32,
    /// 피로도 1당 평가 감소 (기본: 0.15)
    pub fatigue_score_penalty: f32,
    /// 평가 감소 상한 (기본: 0.9)
    pub fatigue_score_cap: f32,
    /// 등판 과다 기준 경기수 (기본: 50)
    pub workload_games: u32,
    /// 등판 과다 평가 배율 (기본: 0.7)
    pub workload_factor: f32,

    // === Late-inning Pressure ===
    /// 후반 이닝 시작 (기본: 7)
    pub late_inning: u8,
    /// 회 넘김 불펜 페널티 (기본: 50)
    pub multi_inning_penalty: f32,
    /// 선발 후반 페널티 (기본: 20)
    pub starter_late_penalty: f32,
    /// 선발 고투구수 페널티 (기본: 40)
    pub starter_high_count_penalty: f32,
    /// 고투구수 기준 (기본: 100)
    pub high_pitch_count: u32,
    /// 8회 이후 추가 페널티 (기본: 30)
    pub eighth_inning_penalty: f32,
}

impl Default for PitchingConfig {
    fn default() -> Self {
        Self {
            starter_stamina_multiplier: 8.5,
            reliever_stamina_multiplier: 3.0,
            stamina_cap: 15.0,
            default_stamina: 10.0,

            blowup_inning_runs: 5,
            blowup_earned_runs: 8,

            complete_game_pitch_limit: 115,
            shutout_pitch_bonus: 10,
            complete_game_fatigue_limit: 30.0,

            closer_fatigue_limit: 20.0,
            reliever_fatigue_limit: 10.0,
            fatigue_score_penalty: 0.15,
            fatigue_score_cap: 0.9,
            workload_games: 50,
            workload_factor: 0.7,

            late_inning: 7,
            multi_inning_penalty: 50.0,
            starter_late_penalty: 20.0,
            starter_high_count_penalty: 40.0,
            high_pitch_count: 100,
            eighth_inning_penalty: 30.0,
        }
    }
}
