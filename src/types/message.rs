//! WebSocket wire messages
//!
//! Inbound frames are JSON objects tagged by `type`. Sensor tags carry sensor
//! fields; any other tag (default `message`) carries an utterance in
//! `content`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use chrono::{DateTime, Utc};
use crate::types::{CombinedRisk, PatternResult, SensorEvent, SentimentRecord, TrendResult};

/// Acknowledgement text for fall alerts
pub const FALL_ALERT_ACK: &str = "Fall alert received and logged.";

/// A decoded inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Sensor(SensorEvent),
    /// Trimmed utterance text, possibly empty
    Utterance(String),
}

impl InboundMessage {
    /// Decode a JSON frame; never fails
    pub fn from_json(data: &Value) -> Self {
        let kind = data.get("type").and_then(Value::as_str).unwrap_or("message");
        if let Some(event) = SensorEvent::from_tagged(kind, data) {
            return InboundMessage::Sensor(event);
        }
        let content = data
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim()
            .to_string();
        InboundMessage::Utterance(content)
    }
}

/// Metadata attached to every reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub sentiment: SentimentRecord,
    pub pattern_alert: PatternResult,
    pub trend: TrendResult,
    pub combined_risk: CombinedRisk,
    pub timestamp: DateTime<Utc>,
}

/// Outbound frames
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    FallAlertReceived {
        message: String,
    },
    Response {
        content: String,
        metadata: Box<ResponseMetadata>,
    },
}

impl ServerMessage {
    /// Fall alert acknowledgement
    pub fn fall_ack() -> Self {
        ServerMessage::FallAlertReceived {
            message: FALL_ALERT_ACK.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_type_is_utterance() {
        let msg = InboundMessage::from_json(&json!({"content": "  hello  "}));
        assert_eq!(msg, InboundMessage::Utterance("hello".to_string()));
    }

    #[test]
    fn test_missing_content_is_empty_utterance() {
        let msg = InboundMessage::from_json(&json!({"type": "message"}));
        assert_eq!(msg, InboundMessage::Utterance(String::new()));
    }

    #[test]
    fn test_sensor_tag() {
        let msg = InboundMessage::from_json(&json!({"type": "light_update", "isDark": true}));
        match msg {
            InboundMessage::Sensor(SensorEvent::Light(ev)) => assert_eq!(ev.is_dark, Some(true)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_fall_ack_shape() {
        let json = serde_json::to_value(ServerMessage::fall_ack()).unwrap();
        assert_eq!(json["type"], "fall_alert_received");
        assert_eq!(json["message"], FALL_ALERT_ACK);
    }
}
