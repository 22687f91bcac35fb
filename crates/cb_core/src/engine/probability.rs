//! Plate-appearance outcome model
//!
//! All functions are pure - they take ratings as input and return
//! probabilities. The engine draws one uniform roll and maps it through
//! [`OutcomeProbabilities::pick`].

use crate::models::player::{Abilities, PitchType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Constants
// ============================================================================

/// 기준 타율 (Contact 10 vs Control 10)
const BASE_HIT_RATE: f32 = 0.210;
/// HR 비율 산출용 기준 타율 (클램프 없음)
const TRUE_BASE_HIT_RATE: f32 = 0.250;
const HIT_RATE_MIN: f32 = 0.10;
const HIT_RATE_MAX: f32 = 0.45;

const CONTACT_HIT_SLOPE: f32 = 0.010;
const CONTROL_HIT_SLOPE: f32 = -0.010;

const BASE_WALK_RATE: f32 = 0.08;
const WALK_MIN: f32 = 0.02;
const WALK_MAX: f32 = 0.25;

const BASE_K_RATE: f32 = 0.18;
const K_MIN: f32 = 0.05;
const K_MAX: f32 = 0.40;
const K_SCALE: f32 = 0.9;
/// 삼진은 남은 아웃의 90%를 넘지 않음
const K_SHARE_CAP: f32 = 0.9;
const VELOCITY_PIVOT: f32 = 146.0;

/// 일반 아웃 중 유지되는 비율; 나머지는 단타로 이동
const OUT_RETENTION: f32 = 0.88;

const DEFAULT_RATING: f32 = 10.0;
const DEFAULT_VELOCITY: f32 = 140.0;
const DEFAULT_DISCIPLINE: f32 = 2.5;
const DEFAULT_PITCH_MOD: f32 = 5.0;
const DEFAULT_PITCH_WEIGHT: f32 = 10.0;

#[inline]
fn rated(value: f32, default: f32) -> f32 {
    if value > 0.0 {
        value
    } else {
        default
    }
}

// ============================================================================
// Secondary pitches
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchEffect {
    /// 0-10, higher induces more ground balls
    pub ground_ball_mod: f32,
    /// 0-10, higher induces more swings and misses
    pub whiff_mod: f32,
}

impl Default for PitchEffect {
    fn default() -> Self {
        Self {
            ground_ball_mod: DEFAULT_PITCH_MOD,
            whiff_mod: DEFAULT_PITCH_MOD,
        }
    }
}

/// Secondary-pitch master table. Unknown pitch names behave as 5/5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PitchCatalog {
    pitches: HashMap<String, PitchEffect>,
}

impl Default for PitchCatalog {
    fn default() -> Self {
        let table = [
            ("slider", 5.0, 7.0),
            ("curve", 5.0, 6.0),
            ("forkball", 6.0, 8.0),
            ("splitter", 6.0, 7.0),
            ("changeup", 5.0, 6.0),
            ("sinker", 8.0, 4.0),
            ("shuuto", 7.0, 4.0),
            ("cutter", 6.0, 5.0),
            ("two_seam", 7.0, 3.0),
            ("knuckle", 5.0, 6.0),
            ("palm", 6.0, 5.0),
        ];
        let pitches = table
            .into_iter()
            .map(|(name, ground, whiff)| {
                (
                    name.to_string(),
                    PitchEffect {
                        ground_ball_mod: ground,
                        whiff_mod: whiff,
                    },
                )
            })
            .collect();
        Self { pitches }
    }
}

impl PitchCatalog {
    pub fn empty() -> Self {
        Self {
            pitches: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, effect: PitchEffect) {
        self.pitches.insert(name.into(), effect);
    }

    pub fn effect(&self, name: &str) -> PitchEffect {
        self.pitches.get(name).copied().unwrap_or_default()
    }
}

/// Hit / strikeout / home-run adjustments from a pitcher's repertoire.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PitchMixFactors {
    pub hit: f32,
    pub strikeout: f32,
    pub home_run: f32,
}

/// 변화구 보정 (가중 평균 whiff / ground-ball)
pub fn pitch_mix_factors(pitches: &[PitchType], catalog: &PitchCatalog) -> PitchMixFactors {
    let mut total_whiff = 0.0;
    let mut total_ground = 0.0;
    let mut total_weight = 0.0;

    for pitch in pitches {
        let effect = catalog.effect(&pitch.name);
        let weight = rated(pitch.value, DEFAULT_PITCH_WEIGHT);
        total_whiff += effect.whiff_mod * weight;
        total_ground += effect.ground_ball_mod * weight;
        total_weight += weight;
    }

    if total_weight <= 0.0 {
        return PitchMixFactors::default();
    }

    let avg_whiff = total_whiff / total_weight;
    let avg_ground = total_ground / total_weight;
    PitchMixFactors {
        strikeout: (avg_whiff - 4.0) * 0.01,
        hit: (avg_ground - 4.0) * -0.005,
        home_run: (avg_ground - 4.0) * -0.01,
    }
}

// ============================================================================
// Outcome distribution
// ============================================================================

/// Raw plate-appearance result before defense is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlateOutcome {
    HomeRun,
    Triple,
    Double,
    Single,
    Walk,
    Strikeout,
    Out,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OutcomeProbabilities {
    pub home_run: f32,
    pub triple: f32,
    pub double: f32,
    pub single: f32,
    pub walk: f32,
    pub strikeout: f32,
    pub out: f32,
}

impl OutcomeProbabilities {
    pub fn total(&self) -> f32 {
        self.home_run
            + self.triple
            + self.double
            + self.single
            + self.walk
            + self.strikeout
            + self.out
    }

    pub fn hit(&self) -> f32 {
        self.home_run + self.triple + self.double + self.single
    }

    /// Map a uniform roll in [0, 1) to an outcome by cumulative probability.
    pub fn pick(&self, roll: f32) -> PlateOutcome {
        let buckets = [
            (self.home_run, PlateOutcome::HomeRun),
            (self.triple, PlateOutcome::Triple),
            (self.double, PlateOutcome::Double),
            (self.single, PlateOutcome::Single),
            (self.walk, PlateOutcome::Walk),
            (self.strikeout, PlateOutcome::Strikeout),
        ];
        let mut cumulative = 0.0;
        for (p, outcome) in buckets {
            cumulative += p;
            if roll < cumulative {
                return outcome;
            }
        }
        PlateOutcome::Out
    }

    fn normalized(mut self) -> Self {
        let total = self.total();
        if total > 1.0 {
            self.home_run /= total;
            self.triple /= total;
            self.double /= total;
            self.single /= total;
            self.walk /= total;
            self.strikeout /= total;
            self.out /= total;
        }
        self
    }
}

/// 타석 결과 확률 계산 (순수 함수)
///
/// The home-run share is taken from an un-clamped "true" hit rate so power
/// stays meaningful against pitchers who push the clamped rate to its floor.
pub fn outcome_probabilities(
    batter: &Abilities,
    pitcher: &Abilities,
    catalog: &PitchCatalog,
) -> OutcomeProbabilities {
    let contact = rated(batter.contact, DEFAULT_RATING);
    let power = rated(batter.power, DEFAULT_RATING);
    let speed = rated(batter.speed, DEFAULT_RATING);
    let control = rated(pitcher.control, DEFAULT_RATING);
    let velocity = rated(pitcher.velocity, DEFAULT_VELOCITY);
    let eye = rated(batter.eye, rated(batter.contact, DEFAULT_DISCIPLINE));
    let aggressiveness = rated(batter.aggressiveness, DEFAULT_DISCIPLINE);

    let mix = pitch_mix_factors(&pitcher.pitch_types, catalog);

    let skill = (contact - DEFAULT_RATING) * CONTACT_HIT_SLOPE
        + (control - DEFAULT_RATING) * CONTROL_HIT_SLOPE
        + mix.hit;
    let hit = (BASE_HIT_RATE + skill).clamp(HIT_RATE_MIN, HIT_RATE_MAX);
    // HR rate rides on the unclamped hit rate, floored at 0
    let true_hit = (TRUE_BASE_HIT_RATE + skill).max(0.0);

    // Extra-base shares of a hit
    let hr_ratio = (0.10 + (power - DEFAULT_RATING) * 0.03).max(0.01);
    let hr_ratio = (hr_ratio + mix.home_run).max(0.005);
    let triple_ratio = (0.02 + (speed - DEFAULT_RATING) * 0.005).max(0.005);
    let double_ratio =
        (0.20 + (speed - DEFAULT_RATING) * 0.01 + (power - DEFAULT_RATING) * 0.005).max(0.10);

    let home_run = true_hit * hr_ratio;
    let triple = hit * triple_ratio;
    let double = hit * double_ratio;
    let single = (hit - home_run - triple - double).max(0.0);

    // Walks
    let walk = (BASE_WALK_RATE
        + (eye - DEFAULT_DISCIPLINE) * 0.005
        + (aggressiveness - DEFAULT_DISCIPLINE) * -0.005
        + (DEFAULT_RATING - control) * 0.005)
        .clamp(WALK_MIN, WALK_MAX);

    let remaining = (1.0 - hit - walk).max(0.0);

    // Strikeouts
    let k_rate = (BASE_K_RATE
        + (velocity - VELOCITY_PIVOT) * 0.009
        + (contact - DEFAULT_RATING) * -0.005
        + mix.strikeout
        + (aggressiveness - DEFAULT_DISCIPLINE) * -0.005
        + (eye - DEFAULT_DISCIPLINE) * -0.005)
        .clamp(K_MIN, K_MAX)
        * K_SCALE;

    // k_rate is a share of all PAs; remaining = 1 - hit - walk
    let strikeout = (remaining * K_SHARE_CAP).min(k_rate);

    let plain_out = (remaining - strikeout).max(0.0);
    let kept_out = plain_out * OUT_RETENTION;

    OutcomeProbabilities {
        home_run,
        triple,
        double,
        single: single + (plain_out - kept_out),
        walk,
        strikeout,
        out: kept_out,
    }
    .normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn average_batter() -> Abilities {
        Abilities {
            contact: 10.0,
            power: 10.0,
            speed: 10.0,
            eye: 2.5,
            aggressiveness: 2.5,
            ..Default::default()
        }
    }

    fn average_pitcher() -> Abilities {
        Abilities {
            control: 10.0,
            velocity: 140.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_average_matchup() {
        let p = outcome_probabilities(&average_batter(), &average_pitcher(), &PitchCatalog::default());
        assert!((p.total() - 1.0).abs() < 1e-4);
        assert!((p.home_run - 0.025).abs() < 1e-4);
        assert!((p.walk - 0.08).abs() < 1e-4);
        assert!((p.strikeout - 0.1134).abs() < 1e-3);
        // out bucket trimmed by 12%
        assert!((p.out - 0.5966 * 0.88).abs() < 1e-3);
    }

    #[test]
    fn test_contact_raises_hits_power_raises_homers() {
        let catalog = PitchCatalog::default();
        let base = outcome_probabilities(&average_batter(), &average_pitcher(), &catalog);

        let mut slugger = average_batter();
        slugger.power = 18.0;
        let s = outcome_probabilities(&slugger, &average_pitcher(), &catalog);
        assert!(s.home_run > base.home_run * 2.0);

        let mut hitter = average_batter();
        hitter.contact = 16.0;
        let h = outcome_probabilities(&hitter, &average_pitcher(), &catalog);
        assert!(h.hit() > base.hit());
        assert!(h.strikeout < base.strikeout);
    }

    #[test]
    fn test_hit_rate_clamped_but_homers_use_true_rate() {
        let catalog = PitchCatalog::default();
        let mut ace = average_pitcher();
        ace.control = 30.0;
        let mut weak = average_batter();
        weak.contact = 1.0;
        weak.power = 20.0;
        let p = outcome_probabilities(&weak, &ace, &catalog);
        // clamped hit rate would be .10; the HR share is still derived from
        // the un-clamped rate (0.25 - 0.09 - 0.20 < 0 → 0)
        assert_eq!(p.home_run, 0.0);
        assert!(p.triple > 0.0);
        assert!((p.total() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_ratings_fall_back_to_defaults() {
        let catalog = PitchCatalog::default();
        let unrated = outcome_probabilities(&Abilities::default(), &Abilities::default(), &catalog);
        assert!((unrated.total() - 1.0).abs() < 1e-4);
        assert!(unrated.home_run > 0.0);
        for v in [unrated.single, unrated.walk, unrated.strikeout, unrated.out] {
            assert!(v.is_finite() && v >= 0.0);
        }
    }

    #[test]
    fn test_ground_ball_pitches_cut_homers() {
        let catalog = PitchCatalog::default();
        let mut sinkerballer = average_pitcher();
        sinkerballer.pitch_types = vec![PitchType {
            name: "sinker".into(),
            value: 80.0,
        }];
        let base = outcome_probabilities(&average_batter(), &average_pitcher(), &catalog);
        let p = outcome_probabilities(&average_batter(), &sinkerballer, &catalog);
        assert!(p.home_run < base.home_run);
        assert!(p.hit() < base.hit());
    }

    #[test]
    fn test_unknown_pitch_is_neutral_five() {
        let catalog = PitchCatalog::empty();
        let f = pitch_mix_factors(
            &[PitchType {
                name: "gyroball".into(),
                value: 0.0,
            }],
            &catalog,
        );
        assert!((f.strikeout - 0.01).abs() < 1e-6);
        assert!((f.hit + 0.005).abs() < 1e-6);
    }

    #[test]
    fn test_pick_walks_cumulative_buckets() {
        let p = OutcomeProbabilities {
            home_run: 0.1,
            triple: 0.1,
            double: 0.1,
            single: 0.1,
            walk: 0.1,
            strikeout: 0.1,
            out: 0.4,
        };
        assert_eq!(p.pick(0.05), PlateOutcome::HomeRun);
        assert_eq!(p.pick(0.35), PlateOutcome::Single);
        assert_eq!(p.pick(0.55), PlateOutcome::Strikeout);
        assert_eq!(p.pick(0.99), PlateOutcome::Out);
    }
}
