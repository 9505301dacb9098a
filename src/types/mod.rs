//! Core types for CompanionMind

mod emotion;
mod sentiment;
mod analysis;
mod sensors;
mod risk;
mod conversation;
mod report;
mod message;

pub use emotion::{EmotionCategory, Severity};
pub use sentiment::SentimentRecord;
pub use analysis::{
    Trend, RiskLevel, TrendResult, PatternSeverity, PatternResult,
    RECOMMEND_CHECK_IN, RECOMMEND_MONITOR, PATTERN_INSUFFICIENT_REASON,
};
pub use sensors::{
    BoundedHistory, ActivityStatus, ActivitySnapshot, FallAlert, LocationSnapshot, LightSnapshot,
    MotionState, LocationState, LightState, SensorState,
    MotionEvent, FallEvent, LocationEvent, LightEvent, SensorEvent,
};
pub use risk::{OverallRisk, CombinedRisk};
pub use conversation::{Role, ChatMessage};
pub use report::{
    DashboardStats, SensorsReport, MotionReport, LocationReport, LightReport,
    SensorsActive, ServiceStatus, UtteranceAnalysis, RiskUpdate,
};
pub use message::{InboundMessage, ResponseMetadata, ServerMessage, FALL_ALERT_ACK};
