//! Post-game fatigue and daily recovery

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FatigueConfig {
    /// 선발 기본 피로 (기본: 0)
    pub starter_base: f32,
    /// 불펜 등판 기본 피로 (기본: 4)
    pub reliever_base: f32,
    /// 피로 1단위당 투구수 (기본: 5)
    pub pitches_per_unit: f32,
    /// 스태미나 최대 경감률 (기본: 0.3)
    pub stamina_relief: f32,
    /// 경감 후 최소 배율 (기본: 0.7)
    pub min_factor: f32,
    /// 일일 회복량 (선수 recovery 미설정 시) (기본: 3)
    pub daily_recovery: f32,
}

impl Default for FatigueConfig {
    fn default() -> Self {
        Self {
            starter_base: 0.0,
            reliever_base: 4.0,
            pitches_per_unit: 5.0,
            stamina_relief: 0.3,
            min_factor: 0.7,
            daily_recovery: 3.0,
        }
    }
}
