//! # Engine Configuration
//!
//! 시뮬레이션 튜닝 상수를 한곳에서 관리.
//!
//! ```rust
//! use cb_core::engine::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! let quick_hook = EngineConfig::quick_hook();
//! assert!(quick_hook.pitching.starter_stamina_multiplier < config.pitching.starter_stamina_multiplier);
//! ```

mod fatigue_config;
mod pitching_config;

pub use fatigue_config::FatigueConfig;
pub use pitching_config::PitchingConfig;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 투수 교체 설정
    pub pitching: PitchingConfig,
    /// 경기 후 피로/회복 설정
    pub fatigue: FatigueConfig,
    /// 최대 이닝 (연장 포함) (기본: 12)
    pub max_innings: u8,
    /// 볼넷 중 사구 비율 (기본: 0.08)
    pub hit_by_pitch_share: f32,
    /// 하프이닝당 타석 안전 상한 (기본: 60)
    pub max_plate_appearances_per_half: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pitching: PitchingConfig::default(),
            fatigue: FatigueConfig::default(),
            max_innings: 12,
            hit_by_pitch_share: 0.08,
            max_plate_appearances_per_half: 60,
        }
    }
}

impl EngineConfig {
    /// 기본 설정
    pub fn standard() -> Self {
        Self::default()
    }

    /// 불펜 위주 운용 (선발이 빨리 내려감)
    pub fn quick_hook() -> Self {
        let mut cfg = Self::default();
        cfg.pitching.starter_stamina_multiplier = 7.0;
        cfg.pitching.complete_game_pitch_limit = 105;
        cfg.pitching.reliever_fatigue_limit = 14.0;
        cfg
    }

    /// 선발 완투 지향
    pub fn workhorse() -> Self {
        let mut cfg = Self::default();
        cfg.pitching.starter_stamina_multiplier = 9.5;
        cfg.pitching.complete_game_pitch_limit = 130;
        cfg.pitching.eighth_inning_penalty = 10.0;
        cfg
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.max_innings, 12);
        assert!((cfg.pitching.starter_stamina_multiplier - 8.5).abs() < 1e-6);
        assert!((cfg.fatigue.reliever_base - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_presets_shift_starter_budget() {
        let standard = EngineConfig::standard();
        assert!(
            EngineConfig::quick_hook().pitching.starter_stamina_multiplier
                < standard.pitching.starter_stamina_multiplier
        );
        assert!(
            EngineConfig::workhorse().pitching.complete_game_pitch_limit
                > standard.pitching.complete_game_pitch_limit
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"max_innings": 10}"#).unwrap();
        assert_eq!(cfg.max_innings, 10);
        assert_eq!(cfg.pitching.complete_game_pitch_limit, 115);
    }
}
