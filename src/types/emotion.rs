//! Emotion categories and severity labels

use serde::{Deserialize, Serialize};
use crate::{MODERATE_THRESHOLD, SEVERE_THRESHOLD};

/// The closed set of emotion categories the lexicon knows about.
///
/// Declaration order matters: it is the lexicon order and the tie-break
/// order for the primary emotion (first declared wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionCategory {
    Loneliness,
    Sadness,
    Anxiety,
    SocialDisconnection,
}

impl EmotionCategory {
    /// All categories in declaration order
    pub const ALL: [EmotionCategory; 4] = [
        EmotionCategory::Loneliness,
        EmotionCategory::Sadness,
        EmotionCategory::Anxiety,
        EmotionCategory::SocialDisconnection,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionCategory::Loneliness => "loneliness",
            EmotionCategory::Sadness => "sadness",
            EmotionCategory::Anxiety => "anxiety",
            EmotionCategory::SocialDisconnection => "social_disconnection",
        }
    }
}

impl std::fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of one utterance, derived from its negativity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// Map a negativity score onto a severity label
    pub fn from_negativity(score: u8) -> Self {
        if score >= SEVERE_THRESHOLD {
            Severity::Severe
        } else if score >= MODERATE_THRESHOLD {
            Severity::Moderate
        } else if score > 0 {
            Severity::Mild
        } else {
            Severity::None
        }
    }

    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            Severity::None => "\x1b[90m",     // Gray
            Severity::Mild => "\x1b[33m",     // Yellow
            Severity::Moderate => "\x1b[35m", // Magenta
            Severity::Severe => "\x1b[31m",   // Red
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::None => "none",
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        };
        write!(f, "{}", name)
    }
}
