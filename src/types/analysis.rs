//! Trend and pattern results computed over the sentiment history

use serde::{Deserialize, Serialize};

/// Recommendation when a distress pattern is present
pub const RECOMMEND_CHECK_IN: &str = "Consider reaching out for a personal check-in";

/// Recommendation when no pattern is present
pub const RECOMMEND_MONITOR: &str = "Continue monitoring";

/// Reason reported when the history is too short for pattern detection
pub const PATTERN_INSUFFICIENT_REASON: &str = "Insufficient data (need 3+ conversations)";

/// Direction of the negativity trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    InsufficientData,
    Worsening,
    Improving,
    Stable,
}

/// Emotional risk level from the recent negativity average
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Trend::InsufficientData => "insufficient_data",
            Trend::Worsening => "worsening",
            Trend::Improving => "improving",
            Trend::Stable => "stable",
        };
        write!(f, "{}", name)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        write!(f, "{}", name)
    }
}

/// Short-window vs. longer-window negativity trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub trend: Trend,
    pub risk_level: RiskLevel,
    /// Mean negativity of the last 3 records, rounded to 2 decimals
    pub recent_avg_negativity: f64,
}

impl TrendResult {
    /// Result for a history below the sample threshold
    pub fn insufficient() -> Self {
        Self {
            trend: Trend::InsufficientData,
            risk_level: RiskLevel::Low,
            recent_avg_negativity: 0.0,
        }
    }
}

/// Severity of a detected pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternSeverity {
    Moderate,
    High,
}

impl std::fmt::Display for PatternSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PatternSeverity::Moderate => "moderate",
            PatternSeverity::High => "high",
        };
        write!(f, "{}", name)
    }
}

/// Recurring or escalating distress over the recent window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternResult {
    pub pattern_detected: bool,
    /// Absent only when the history is too short
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub severity: Option<PatternSeverity>,
    /// Why the alert fired, in evaluation order
    pub reasons: Vec<String>,
    /// Set only when the history is too short
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
    pub high_negativity_count: usize,
    pub loneliness_mentions: usize,
    pub escalating: bool,
    pub recommendation: String,
}

impl PatternResult {
    /// Result for a history below the sample threshold
    pub fn insufficient() -> Self {
        Self {
            pattern_detected: false,
            severity: None,
            reasons: Vec::new(),
            reason: Some(PATTERN_INSUFFICIENT_REASON.to_string()),
            high_negativity_count: 0,
            loneliness_mentions: 0,
            escalating: false,
            recommendation: RECOMMEND_MONITOR.to_string(),
        }
    }

    /// Was there enough data to scan?
    pub fn is_sufficient(&self) -> bool {
        self.reason.is_none()
    }
}
