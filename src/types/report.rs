//! Read-only reporting views for dashboards and status checks

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::types::{
    ActivitySnapshot, ActivityStatus, CombinedRisk, FallAlert, LocationSnapshot,
    PatternResult, SentimentRecord, TrendResult,
};

/// Everything the dashboard shows for one subject
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_conversations: usize,
    pub loneliness_mentions: u32,
    /// Mean negativity over the last 10 records, 2 decimals
    pub average_negativity: f64,
    pub recent_sentiments: Vec<SentimentRecord>,
    /// Present once the history holds enough records for pattern detection
    pub pattern_alert: Option<PatternResult>,
    pub trend: TrendResult,
    pub last_conversation: Option<DateTime<Utc>>,
    pub sensors: SensorsReport,
    pub combined_risk: CombinedRisk,
}

/// Sensor section of the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorsReport {
    pub motion: MotionReport,
    pub location: LocationReport,
    pub light: LightReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionReport {
    pub activity_status: ActivityStatus,
    pub steps_today: u64,
    /// Share of active snapshots among the last 20, 1 decimal
    pub activity_percentage: f64,
    pub last_movement: Option<i64>,
    pub fall_alerts: Vec<FallAlert>,
    pub recent_activity: Vec<ActivitySnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationReport {
    pub is_home: bool,
    pub left_home_today: bool,
    pub last_update: Option<i64>,
    pub recent_history: Vec<LocationSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightReport {
    pub current_level: Option<f64>,
    pub is_dark: bool,
    pub dark_duration_minutes: f64,
    pub last_update: Option<i64>,
}

/// Which sensor channels have reported at least once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorsActive {
    pub motion: bool,
    pub location: bool,
    pub light: bool,
}

/// Service status for the root endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub service: String,
    pub status: String,
    pub model: String,
    pub conversations: usize,
    pub sensors_active: SensorsActive,
}

/// Output of recording one utterance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtteranceAnalysis {
    pub sentiment: SentimentRecord,
    pub pattern: PatternResult,
    pub trend: TrendResult,
}

/// Live update pushed to dashboard subscribers after every event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskUpdate {
    pub subject_id: String,
    /// Event type that caused the update
    pub trigger: String,
    pub combined_risk: CombinedRisk,
    pub timestamp: DateTime<Utc>,
}
