//! Companion service: routes inbound events to subjects
//!
//! One utterance is one turn: classify + analyze under the state lock, then
//! generate the reply with the state lock released, then log the reply and
//! fuse risk. The subject's turn lock is held throughout, so turns on one
//! subject never interleave while sensor events keep flowing.

use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;

use crate::config::ReplyConfig;
use crate::core::{reply_or_fallback, ReplyGenerator, SubjectRegistry};
use crate::error::Result;
use crate::types::{CombinedRisk, InboundMessage, ResponseMetadata, SensorEvent, ServerMessage};

/// Shared application core
pub struct CompanionService {
    registry: SubjectRegistry,
    reply: Arc<dyn ReplyGenerator>,
    reply_timeout: Duration,
    context_messages: usize,
}

/// Result of applying one sensor event
#[derive(Debug, Clone)]
pub struct SensorOutcome {
    /// Set for fall alerts
    pub acknowledgement: Option<ServerMessage>,
    /// Risk right after this event, computed under the same lock
    pub combined_risk: CombinedRisk,
}

impl std::fmt::Debug for CompanionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompanionService")
            .field("registry", &self.registry)
            .field("model", &self.reply.model())
            .field("reply_timeout", &self.reply_timeout)
            .finish()
    }
}

impl CompanionService {
    /// Create a service with a fresh registry
    pub fn new(reply: Arc<dyn ReplyGenerator>, config: &ReplyConfig) -> Self {
        Self {
            registry: SubjectRegistry::new(),
            reply,
            reply_timeout: Duration::from_secs(config.timeout_secs),
            context_messages: config.context_messages,
        }
    }

    pub fn registry(&self) -> &SubjectRegistry {
        &self.registry
    }

    /// Model name of the reply generator
    pub fn model(&self) -> &str {
        self.reply.model()
    }

    /// Handle one decoded inbound frame
    pub async fn handle_inbound(
        &self,
        subject_id: &str,
        message: InboundMessage,
    ) -> Result<Option<ServerMessage>> {
        match message {
            InboundMessage::Sensor(event) => {
                let outcome = self.handle_sensor(subject_id, &event).await?;
                Ok(outcome.acknowledgement)
            }
            InboundMessage::Utterance(text) => self.handle_utterance(subject_id, &text).await,
        }
    }

    /// Apply a sensor event; fall alerts are acknowledged
    pub async fn handle_sensor(&self, subject_id: &str, event: &SensorEvent) -> Result<SensorOutcome> {
        let handle = self.registry.get(subject_id).await?;
        let mut subject = handle.lock().await;
        subject.apply_sensor_event(event);
        subject.publish(event.kind());

        let acknowledgement = match event {
            SensorEvent::Fall(_) => Some(ServerMessage::fall_ack()),
            _ => None,
        };
        Ok(SensorOutcome {
            acknowledgement,
            combined_risk: subject.combined_risk(),
        })
    }

    /// Classify an utterance, generate a reply and fuse risk. Blank text is ignored.
    pub async fn handle_utterance(
        &self,
        subject_id: &str,
        text: &str,
    ) -> Result<Option<ServerMessage>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let handle = self.registry.get(subject_id).await?;
        let _turn = handle.begin_turn().await;

        let (analysis, context) = {
            let mut subject = handle.lock().await;
            let analysis = subject.record_utterance(text);
            (analysis, subject.reply_context(self.context_messages))
        };

        let reply = reply_or_fallback(self.reply.as_ref(), text, &context, self.reply_timeout).await;

        let combined_risk = {
            let mut subject = handle.lock().await;
            subject.record_reply(&reply);
            subject.publish("message");
            subject.combined_risk()
        };

        tracing::info!(subject = %subject_id, reply = %reply, "Reply sent");

        Ok(Some(ServerMessage::Response {
            content: reply,
            metadata: Box::new(ResponseMetadata {
                sentiment: analysis.sentiment,
                pattern_alert: analysis.pattern,
                trend: analysis.trend,
                combined_risk,
                timestamp: Utc::now(),
            }),
        }))
    }
}
