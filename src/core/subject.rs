//! Subject: all mutable state of one monitored person
//!
//! Owns the sentiment history, sensor state and conversation log. Callers
//! hold the subject's lock for the duration of each mutation so history
//! positions stay in arrival order.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::core::{assess_combined_risk, append_and_analyze, SentimentClassifier, SentimentHistory};
use crate::types::{
    ChatMessage, CombinedRisk, DashboardStats, EmotionCategory, LightReport, LocationReport,
    MotionReport, PatternResult, RiskUpdate, Role, SensorEvent, SensorState, SensorsActive,
    SensorsReport, ServiceStatus, TrendResult, UtteranceAnalysis,
};
use crate::core::trend::{mean_negativity, round2};
use crate::{PATTERN_MIN_SAMPLES, PATTERN_WINDOW, SERVICE_NAME};

/// Records shown on the dashboard
const DASHBOARD_RECENT_RECORDS: usize = PATTERN_WINDOW;

/// Motion snapshots used for the activity percentage
const DASHBOARD_RECENT_ACTIVITY: usize = 20;

/// Fall alerts and location snapshots shown on the dashboard
const DASHBOARD_RECENT_EVENTS: usize = 10;

/// Buffered live updates per subject
const UPDATE_CHANNEL_SIZE: usize = 100;

/// State of one monitored subject
#[derive(Debug)]
pub struct Subject {
    id: String,
    created_at: DateTime<Utc>,
    classifier: SentimentClassifier,
    history: SentimentHistory,
    sensors: SensorState,
    conversation: Vec<ChatMessage>,
    loneliness_mentions: u32,
    update_tx: broadcast::Sender<RiskUpdate>,
}

impl Subject {
    /// Create a subject with empty state
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_classifier(id, SentimentClassifier::new())
    }

    /// Create a subject with a specific classifier
    pub fn with_classifier(id: impl Into<String>, classifier: SentimentClassifier) -> Self {
        let (update_tx, _) = broadcast::channel(UPDATE_CHANNEL_SIZE);
        Self {
            id: id.into(),
            created_at: Utc::now(),
            classifier,
            history: SentimentHistory::new(),
            sensors: SensorState::new(),
            conversation: Vec::new(),
            loneliness_mentions: 0,
            update_tx,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn history(&self) -> &SentimentHistory {
        &self.history
    }

    pub fn sensors(&self) -> &SensorState {
        &self.sensors
    }

    pub fn conversation(&self) -> &[ChatMessage] {
        &self.conversation
    }

    /// Running count of loneliness-primary utterances (never windowed)
    pub fn loneliness_mentions(&self) -> u32 {
        self.loneliness_mentions
    }

    /// Completed exchanges (user + assistant message pairs)
    pub fn total_conversations(&self) -> usize {
        self.conversation.len() / 2
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Log, classify and analyze one user utterance
    pub fn record_utterance(&mut self, text: &str) -> UtteranceAnalysis {
        self.conversation.push(ChatMessage::user(text));

        let sentiment = self.classifier.classify(text);

        if let Some(emotion) = sentiment.primary_emotion {
            info!(
                subject = %self.id,
                emotion = %emotion,
                confidence = sentiment.confidence,
                severity = %sentiment.severity,
                negativity = sentiment.negativity_score,
                "Emotion detected"
            );
            if emotion == EmotionCategory::Loneliness {
                self.loneliness_mentions += 1;
                info!(subject = %self.id, count = self.loneliness_mentions, "Loneliness mention");
            }
        }

        let (trend, pattern) = append_and_analyze(&mut self.history, sentiment.clone());

        if pattern.pattern_detected {
            warn!(
                subject = %self.id,
                severity = ?pattern.severity,
                reasons = %pattern.reasons.join(", "),
                "PATTERN ALERT"
            );
        }

        UtteranceAnalysis { sentiment, pattern, trend }
    }

    /// Log the assistant's reply
    pub fn record_reply(&mut self, text: &str) {
        self.conversation.push(ChatMessage::assistant(text));
    }

    /// Apply a sensor event to its channel
    pub fn apply_sensor_event(&mut self, event: &SensorEvent) {
        self.sensors.apply(event);
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Last `n` conversation messages, oldest first
    pub fn recent_conversation(&self, n: usize) -> Vec<ChatMessage> {
        let start = self.conversation.len().saturating_sub(n);
        self.conversation[start..].to_vec()
    }

    /// Last `n` conversation messages before the newest user message
    pub fn reply_context(&self, n: usize) -> Vec<ChatMessage> {
        let end = match self.conversation.last() {
            Some(last) if last.role == Role::User => self.conversation.len() - 1,
            _ => self.conversation.len(),
        };
        let start = end.saturating_sub(n);
        self.conversation[start..end].to_vec()
    }

    pub fn trend(&self) -> TrendResult {
        self.history.trend()
    }

    pub fn pattern(&self) -> PatternResult {
        self.history.pattern()
    }

    pub fn combined_risk(&self) -> CombinedRisk {
        assess_combined_risk(&self.sensors, &self.trend())
    }

    /// Aggregated dashboard view
    pub fn dashboard(&self) -> DashboardStats {
        let recent = self.history.tail(DASHBOARD_RECENT_RECORDS);
        let motion = &self.sensors.motion;
        let location = &self.sensors.location;
        let light = &self.sensors.light;

        let pattern_alert = if self.history.len() >= PATTERN_MIN_SAMPLES {
            Some(self.pattern())
        } else {
            None
        };

        let activity_percentage =
            (self.sensors.activity_percentage(DASHBOARD_RECENT_ACTIVITY) * 10.0).round() / 10.0;

        DashboardStats {
            total_conversations: self.total_conversations(),
            loneliness_mentions: self.loneliness_mentions,
            average_negativity: round2(mean_negativity(recent)),
            recent_sentiments: recent.to_vec(),
            pattern_alert,
            trend: self.trend(),
            last_conversation: self.conversation.last().map(|m| m.timestamp),
            sensors: SensorsReport {
                motion: MotionReport {
                    activity_status: motion.current_activity,
                    steps_today: motion.steps_today,
                    activity_percentage,
                    last_movement: motion.last_movement,
                    fall_alerts: motion.fall_alerts.tail(DASHBOARD_RECENT_EVENTS),
                    recent_activity: motion.activity_history.tail(DASHBOARD_RECENT_ACTIVITY),
                },
                location: LocationReport {
                    is_home: location.is_home,
                    left_home_today: location.left_home_today,
                    last_update: location.last_update,
                    recent_history: location.history.tail(DASHBOARD_RECENT_EVENTS),
                },
                light: LightReport {
                    current_level: light.current_level,
                    is_dark: light.is_dark,
                    dark_duration_minutes: light.dark_duration_minutes,
                    last_update: light.last_update,
                },
            },
            combined_risk: self.combined_risk(),
        }
    }

    /// Service status as seen from this subject
    pub fn status(&self, model: &str) -> ServiceStatus {
        ServiceStatus {
            service: SERVICE_NAME.to_string(),
            status: "running".to_string(),
            model: model.to_string(),
            conversations: self.total_conversations(),
            sensors_active: SensorsActive {
                motion: self.sensors.motion.last_movement.is_some(),
                location: self.sensors.location.last_update.is_some(),
                light: self.sensors.light.last_update.is_some(),
            },
        }
    }

    // =========================================================================
    // LIVE UPDATES
    // =========================================================================

    /// Subscribe to risk updates
    pub fn subscribe(&self) -> broadcast::Receiver<RiskUpdate> {
        self.update_tx.subscribe()
    }

    /// Push the current combined risk to subscribers
    pub fn publish(&self, trigger: &str) {
        let update = RiskUpdate {
            subject_id: self.id.clone(),
            trigger: trigger.to_string(),
            combined_risk: self.combined_risk(),
            timestamp: Utc::now(),
        };
        // No subscribers is fine
        let _ = self.update_tx.send(update);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FallEvent, MotionEvent, OverallRisk, Trend};

    #[test]
    fn test_record_utterance() {
        let mut subject = Subject::new("s1");
        let analysis = subject.record_utterance("I feel so lonely and nobody calls me anymore");
        assert_eq!(analysis.sentiment.primary_emotion, Some(EmotionCategory::Loneliness));
        assert_eq!(analysis.trend.trend, Trend::InsufficientData);
        assert!(!analysis.pattern.is_sufficient());
        assert_eq!(subject.loneliness_mentions(), 1);
        assert_eq!(subject.history().len(), 1);
        assert_eq!(subject.conversation().len(), 1);
    }

    #[test]
    fn test_total_conversations_counts_pairs() {
        let mut subject = Subject::new("s1");
        subject.record_utterance("hello");
        assert_eq!(subject.total_conversations(), 0);
        subject.record_reply("Hi there.");
        assert_eq!(subject.total_conversations(), 1);
    }

    #[test]
    fn test_reply_context_excludes_current_utterance() {
        let mut subject = Subject::new("s1");
        subject.record_utterance("one");
        subject.record_reply("reply one");
        subject.record_utterance("two");
        let context = subject.reply_context(5);
        assert_eq!(context.len(), 2);
        assert_eq!(context[1].content, "reply one");
        assert_eq!(subject.recent_conversation(1)[0].content, "two");
    }

    #[test]
    fn test_dashboard_pattern_needs_three_records() {
        let mut subject = Subject::new("s1");
        subject.record_utterance("sad");
        subject.record_utterance("sad");
        assert!(subject.dashboard().pattern_alert.is_none());
        subject.record_utterance("sad");
        assert!(subject.dashboard().pattern_alert.is_some());
    }

    #[test]
    fn test_dashboard_averages() {
        let mut subject = Subject::new("s1");
        subject.record_utterance("lonely");  // 15
        subject.record_utterance("fine");    // 0
        subject.record_utterance("sad and scared"); // 30
        let stats = subject.dashboard();
        assert_eq!(stats.average_negativity, 15.0);
        assert_eq!(stats.recent_sentiments.len(), 3);
    }

    #[test]
    fn test_dashboard_sensors_and_risk() {
        let mut subject = Subject::new("s1");
        subject.apply_sensor_event(&SensorEvent::Motion(MotionEvent {
            is_active: Some(true),
            steps: Some(100),
            ..Default::default()
        }));
        subject.apply_sensor_event(&SensorEvent::Fall(FallEvent::default()));
        let stats = subject.dashboard();
        assert_eq!(stats.sensors.motion.steps_today, 100);
        assert_eq!(stats.sensors.motion.activity_percentage, 100.0);
        assert_eq!(stats.sensors.motion.fall_alerts.len(), 1);
        assert_eq!(stats.combined_risk.risk_score, 6);
        assert_eq!(stats.combined_risk.overall_risk_level, OverallRisk::Critical);
    }

    #[test]
    fn test_status_sensor_flags() {
        let mut subject = Subject::new("s1");
        let status = subject.status("phi3:mini");
        assert!(!status.sensors_active.motion);
        subject.apply_sensor_event(&SensorEvent::Motion(MotionEvent {
            last_movement: Some(1),
            ..Default::default()
        }));
        assert!(subject.status("phi3:mini").sensors_active.motion);
        assert_eq!(status.service, SERVICE_NAME);
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let subject = Subject::new("s1");
        let mut rx = subject.subscribe();
        subject.publish("motion_update");
        let update = rx.recv().await.unwrap();
        assert_eq!(update.subject_id, "s1");
        assert_eq!(update.trigger, "motion_update");
    }
}
