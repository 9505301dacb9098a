//! Combined emotional + physical risk verdict

use serde::{Deserialize, Serialize};
use crate::types::TrendResult;

/// Overall risk level after fusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallRisk {
    Low,
    Moderate,
    High,
    Critical,
}

impl OverallRisk {
    /// Caregiver recommendation for this level
    pub fn recommendation(&self) -> &'static str {
        match self {
            OverallRisk::Critical => "IMMEDIATE ACTION REQUIRED: Contact user immediately.",
            OverallRisk::High => "HIGH PRIORITY: Reach out to user soon.",
            OverallRisk::Moderate => "MONITOR CLOSELY: Continue observation.",
            OverallRisk::Low => "ROUTINE MONITORING: User appears stable.",
        }
    }

    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            OverallRisk::Low => "\x1b[32m",      // Green
            OverallRisk::Moderate => "\x1b[33m", // Yellow
            OverallRisk::High => "\x1b[35m",     // Magenta
            OverallRisk::Critical => "\x1b[31m", // Red
        }
    }
}

impl std::fmt::Display for OverallRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OverallRisk::Low => "low",
            OverallRisk::Moderate => "moderate",
            OverallRisk::High => "high",
            OverallRisk::Critical => "critical",
        };
        write!(f, "{}", name)
    }
}

/// Fused risk verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedRisk {
    pub overall_risk_level: OverallRisk,
    pub risk_score: u32,
    pub emotional_component: TrendResult,
    /// Triggered physical conditions in evaluation order: motion, location, fall
    pub physical_risk_factors: Vec<String>,
    pub recommendation: String,
}
