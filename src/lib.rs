//! CompanionMind: emotional trend and sensor fusion engine
//!
//! Utterances flow through the keyword classifier into a per-subject history,
//! the trend analyzer and pattern detector read that history, and the fusion
//! engine combines the trend with motion/location/light sensor state into one
//! caregiver-facing risk verdict.

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod types;

pub use error::{Error, Result};

// =============================================================================
// CLASSIFIER SCORING
// =============================================================================

/// Confidence added per matched phrase within one category
pub const CONFIDENCE_PER_MATCH: u32 = 25;

/// Negativity added per matched phrase across all categories
pub const NEGATIVITY_PER_MATCH: u32 = 15;

/// Upper bound for every score and percentage
pub const SCORE_MAX: u32 = 100;

/// negativity_score at or above this is "severe"
pub const SEVERE_THRESHOLD: u8 = 60;

/// negativity_score at or above this is "moderate" and needs attention
pub const MODERATE_THRESHOLD: u8 = 30;

// =============================================================================
// TREND ANALYZER
// =============================================================================

/// Records required before a trend is computed
pub const TREND_MIN_SAMPLES: usize = 4;

/// Size of the "recent" and "older" trend windows
pub const TREND_WINDOW: usize = 3;

/// Average difference that counts as worsening/improving
pub const TREND_DELTA: f64 = 10.0;

/// Recent average at or above this is high risk
pub const TREND_HIGH_RISK: f64 = 60.0;

/// Recent average at or above this is medium risk
pub const TREND_MEDIUM_RISK: f64 = 30.0;

// =============================================================================
// PATTERN DETECTOR
// =============================================================================

/// Records required before patterns are scanned
pub const PATTERN_MIN_SAMPLES: usize = 3;

/// Number of most recent records scanned
pub const PATTERN_WINDOW: usize = 10;

/// Window length required for the escalation check
pub const ESCALATION_MIN_WINDOW: usize = 5;

/// Head/tail average gap that counts as escalating
pub const ESCALATION_DELTA: f64 = 20.0;

/// High-negativity records in the window that raise an alert
pub const HIGH_NEGATIVITY_ALERT: usize = 3;

/// High-negativity records in the window that make the alert "high"
pub const HIGH_NEGATIVITY_SEVERE: usize = 5;

/// Loneliness-primary records in the window that raise an alert
pub const LONELINESS_ALERT: usize = 2;

// =============================================================================
// SENSORS + FUSION
// =============================================================================

/// Maximum retained fall alerts
pub const MAX_FALL_ALERTS: usize = 50;

/// Maximum retained snapshots per sensor history
pub const MAX_SENSOR_HISTORY: usize = 100;

/// Step count below which activity is a risk factor
pub const LOW_STEPS_THRESHOLD: u64 = 500;

/// Risk weights
pub const RISK_WEIGHT_LOW_ACTIVITY: u32 = 2;
pub const RISK_WEIGHT_STAYED_HOME: u32 = 1;
pub const RISK_WEIGHT_FALL: u32 = 3;
pub const RISK_WEIGHT_EMOTIONAL_HIGH: u32 = 3;
pub const RISK_WEIGHT_EMOTIONAL_MEDIUM: u32 = 2;

/// Overall risk thresholds on the summed score
pub const RISK_CRITICAL_SCORE: u32 = 6;
pub const RISK_HIGH_SCORE: u32 = 4;
pub const RISK_MODERATE_SCORE: u32 = 2;

// =============================================================================
// REPLY GENERATION
// =============================================================================

/// Time bound on one reply generation (seconds)
pub const REPLY_TIMEOUT_SECS: u64 = 30;

/// Conversation messages passed along as reply context
pub const REPLY_CONTEXT_MESSAGES: usize = 5;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";

/// Service name reported by the status endpoint
pub const SERVICE_NAME: &str = "CompanionMind AI Engine";
