//! Per-utterance classifier output

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::types::{EmotionCategory, Severity};

/// Result of classifying one utterance. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    /// When this was computed
    pub timestamp: DateTime<Utc>,
    /// Highest-confidence active category, if any matched
    pub primary_emotion: Option<EmotionCategory>,
    /// Confidence of the primary emotion (0-100)
    pub confidence: u8,
    pub severity: Severity,
    /// 15 per matched phrase, capped at 100
    pub negativity_score: u8,
    /// Confidence for every category with at least one match
    pub emotion_breakdown: BTreeMap<EmotionCategory, u8>,
    /// Matched phrases per category, in lexicon order
    pub detected_keywords: BTreeMap<EmotionCategory, Vec<String>>,
    pub needs_attention: bool,
}

impl SentimentRecord {
    /// Record for text with no matches
    pub fn neutral() -> Self {
        Self {
            timestamp: Utc::now(),
            primary_emotion: None,
            confidence: 0,
            severity: Severity::None,
            negativity_score: 0,
            emotion_breakdown: BTreeMap::new(),
            detected_keywords: BTreeMap::new(),
            needs_attention: false,
        }
    }

    /// Total matched phrases, counting a phrase once per category it matched in
    pub fn match_count(&self) -> usize {
        self.detected_keywords.values().map(Vec::len).sum()
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        format!(
            "{}{}{}",
            self.severity.color_code(),
            self.to_parseable_string(),
            Severity::color_reset()
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        let emotion = self
            .primary_emotion
            .map(|e| e.to_string())
            .unwrap_or_else(|| "none".to_string());
        format!(
            "emotion={} ({}%) | severity={} | negativity={}",
            emotion, self.confidence, self.severity, self.negativity_score
        )
    }
}
