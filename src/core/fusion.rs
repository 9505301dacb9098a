//! Risk Fusion Engine: emotional trend + physical indicators → one verdict
//!
//! Score contributions:
//! - steps_today < 500: +2
//! - not left home today: +1
//! - any fall alert: +3 (not scaled by count)
//! - emotional risk high: +3, medium: +2
//!
//! Levels: critical ≥ 6, high ≥ 4, moderate ≥ 2, else low.

use crate::{
    LOW_STEPS_THRESHOLD, RISK_CRITICAL_SCORE, RISK_HIGH_SCORE, RISK_MODERATE_SCORE,
    RISK_WEIGHT_EMOTIONAL_HIGH, RISK_WEIGHT_EMOTIONAL_MEDIUM, RISK_WEIGHT_FALL,
    RISK_WEIGHT_LOW_ACTIVITY, RISK_WEIGHT_STAYED_HOME,
};
use crate::types::{CombinedRisk, OverallRisk, RiskLevel, SensorState, TrendResult};

/// Combine sensor state with the emotional trend. Pure: reads, never mutates.
pub fn assess_combined_risk(sensors: &SensorState, trend: &TrendResult) -> CombinedRisk {
    let mut factors = Vec::new();
    let mut score = 0;

    if sensors.motion.steps_today < LOW_STEPS_THRESHOLD {
        factors.push(format!("Very low physical activity (< {} steps)", LOW_STEPS_THRESHOLD));
        score += RISK_WEIGHT_LOW_ACTIVITY;
    }

    if !sensors.location.left_home_today {
        factors.push("Has not left home today".to_string());
        score += RISK_WEIGHT_STAYED_HOME;
    }

    let falls = sensors.motion.fall_alerts.len();
    if falls > 0 {
        factors.push(format!("{} fall alert(s) detected", falls));
        score += RISK_WEIGHT_FALL;
    }

    score += emotional_score(trend.risk_level);

    let level = overall_level(score);

    CombinedRisk {
        overall_risk_level: level,
        risk_score: score,
        emotional_component: trend.clone(),
        physical_risk_factors: factors,
        recommendation: level.recommendation().to_string(),
    }
}

/// Score contribution of the emotional risk level
pub fn emotional_score(level: RiskLevel) -> u32 {
    match level {
        RiskLevel::High => RISK_WEIGHT_EMOTIONAL_HIGH,
        RiskLevel::Medium => RISK_WEIGHT_EMOTIONAL_MEDIUM,
        RiskLevel::Low => 0,
    }
}

/// Map a summed score onto a risk level
pub fn overall_level(score: u32) -> OverallRisk {
    if score >= RISK_CRITICAL_SCORE {
        OverallRisk::Critical
    } else if score >= RISK_HIGH_SCORE {
        OverallRisk::High
    } else if score >= RISK_MODERATE_SCORE {
        OverallRisk::Moderate
    } else {
        OverallRisk::Low
    }
}

// =============================================================================
// TESTS
// =============================================================================
