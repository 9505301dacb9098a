//! Utterance classifier: scores one utterance against the lexicon
//!
//! Deterministic and total. Every string, including empty or non-ASCII
//! text, yields a record.

use std::collections::BTreeMap;
use chrono::Utc;
use crate::{CONFIDENCE_PER_MATCH, MODERATE_THRESHOLD, NEGATIVITY_PER_MATCH, SCORE_MAX};
use crate::core::Lexicon;
use crate::types::{EmotionCategory, SentimentRecord, Severity};

/// Keyword-evidence emotion classifier
#[derive(Debug, Clone, Default)]
pub struct SentimentClassifier {
    lexicon: Lexicon,
}

impl SentimentClassifier {
    /// Create a classifier over the built-in lexicon
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier over a custom lexicon
    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Classify one utterance
    pub fn classify(&self, text: &str) -> SentimentRecord {
        let lowered = text.to_lowercase();

        let mut emotion_breakdown: BTreeMap<EmotionCategory, u8> = BTreeMap::new();
        let mut detected_keywords: BTreeMap<EmotionCategory, Vec<String>> = BTreeMap::new();

        for (category, phrases) in self.lexicon.entries() {
            let matches: Vec<String> = phrases
                .iter()
                .filter(|p| lowered.contains(p.as_str()))
                .cloned()
                .collect();

            if !matches.is_empty() {
                emotion_breakdown.insert(category, scaled(matches.len(), CONFIDENCE_PER_MATCH));
                detected_keywords.insert(category, matches);
            }
        }

        // Strictly greater keeps the first declared category on ties
        let mut primary: Option<(EmotionCategory, u8)> = None;
        for (&category, &confidence) in &emotion_breakdown {
            if primary.map_or(true, |(_, best)| confidence > best) {
                primary = Some((category, confidence));
            }
        }

        // A phrase listed under two categories counts twice
        let total_matches: usize = detected_keywords.values().map(Vec::len).sum();
        let negativity_score = scaled(total_matches, NEGATIVITY_PER_MATCH);

        SentimentRecord {
            timestamp: Utc::now(),
            primary_emotion: primary.map(|(c, _)| c),
            confidence: primary.map(|(_, c)| c).unwrap_or(0),
            severity: Severity::from_negativity(negativity_score),
            negativity_score,
            emotion_breakdown,
            detected_keywords,
            needs_attention: negativity_score >= MODERATE_THRESHOLD,
        }
    }
}

/// `count * step`, capped at 100
fn scaled(count: usize, step: u32) -> u8 {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    count.saturating_mul(step).min(SCORE_MAX) as u8
}

// =============================================================================
// TESTS
// =============================================================================
