//! Pattern Detector: recurring or escalating distress in the last 10 records

use crate::{
    ESCALATION_DELTA, ESCALATION_MIN_WINDOW, HIGH_NEGATIVITY_ALERT, HIGH_NEGATIVITY_SEVERE,
    LONELINESS_ALERT, MODERATE_THRESHOLD, PATTERN_MIN_SAMPLES, PATTERN_WINDOW,
};
use crate::core::trend::mean_negativity;
use crate::types::{
    EmotionCategory, PatternResult, PatternSeverity, SentimentRecord,
    RECOMMEND_CHECK_IN, RECOMMEND_MONITOR,
};

/// Head/tail slice length for the escalation check
const ESCALATION_SLICE: usize = 3;

/// Distress pattern detector
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternDetector;

impl PatternDetector {
    /// Create new detector
    pub fn new() -> Self {
        Self
    }

    /// Scan the tail of a chronological history
    pub fn detect(&self, history: &[SentimentRecord]) -> PatternResult {
        if history.len() < PATTERN_MIN_SAMPLES {
            return PatternResult::insufficient();
        }

        let window = &history[history.len().saturating_sub(PATTERN_WINDOW)..];

        let high_negativity_count = window
            .iter()
            .filter(|r| r.negativity_score >= MODERATE_THRESHOLD)
            .count();

        let loneliness_mentions = window
            .iter()
            .filter(|r| r.primary_emotion == Some(EmotionCategory::Loneliness))
            .count();

        let escalating = window.len() >= ESCALATION_MIN_WINDOW && {
            let head = mean_negativity(&window[..ESCALATION_SLICE]);
            let tail = mean_negativity(&window[window.len() - ESCALATION_SLICE..]);
            tail > head + ESCALATION_DELTA
        };

        let mut reasons = Vec::new();
        if high_negativity_count >= HIGH_NEGATIVITY_ALERT {
            reasons.push(format!("{} negative conversations detected", high_negativity_count));
        }
        if loneliness_mentions >= LONELINESS_ALERT {
            reasons.push(format!("Loneliness mentioned {} times", loneliness_mentions));
        }
        if escalating {
            reasons.push("Emotional state appears to be worsening".to_string());
        }

        let pattern_detected = !reasons.is_empty();

        let severity = if high_negativity_count >= HIGH_NEGATIVITY_SEVERE {
            PatternSeverity::High
        } else {
            PatternSeverity::Moderate
        };

        let recommendation = if pattern_detected {
            RECOMMEND_CHECK_IN
        } else {
            RECOMMEND_MONITOR
        };

        PatternResult {
            pattern_detected,
            severity: Some(severity),
            reasons,
            reason: None,
            high_negativity_count,
            loneliness_mentions,
            escalating,
            recommendation: recommendation.to_string(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::trend::tests::record;
    use crate::types::PATTERN_INSUFFICIENT_REASON;

    fn lonely(score: u8) -> SentimentRecord {
        let mut r = record(score);
        r.primary_emotion = Some(EmotionCategory::Loneliness);
        r
    }

    #[test]
    fn test_insufficient_data() {
        let detector = PatternDetector::new();
        let result = detector.detect(&[record(90), record(90)]);
        assert!(!result.pattern_detected);
        assert_eq!(result.reason.as_deref(), Some(PATTERN_INSUFFICIENT_REASON));
        assert!(result.severity.is_none());
    }

    #[test]
    fn test_three_negative_in_window() {
        let detector = PatternDetector::new();
        let mut history: Vec<_> = (0..7).map(|_| record(0)).collect();
        history.extend([record(30), record(45), record(60)]);
        let result = detector.detect(&history);
        assert!(result.pattern_detected);
        assert_eq!(result.high_negativity_count, 3);
        assert_eq!(result.reasons[0], "3 negative conversations detected");
        assert_eq!(result.severity, Some(PatternSeverity::Moderate));
        assert_eq!(result.recommendation, RECOMMEND_CHECK_IN);
    }

    #[test]
    fn test_window_is_last_ten() {
        let detector = PatternDetector::new();
        let mut history: Vec<_> = (0..5).map(|_| record(90)).collect();
        history.extend((0..10).map(|_| record(0)));
        let result = detector.detect(&history);
        assert_eq!(result.high_negativity_count, 0);
        assert!(!result.pattern_detected);
        assert_eq!(result.recommendation, RECOMMEND_MONITOR);
        assert_eq!(result.severity, Some(PatternSeverity::Moderate));
    }

    #[test]
    fn test_loneliness_mentions() {
        let detector = PatternDetector::new();
        let result = detector.detect(&[lonely(15), record(0), lonely(15)]);
        assert!(result.pattern_detected);
        assert_eq!(result.loneliness_mentions, 2);
        assert_eq!(result.reasons, vec!["Loneliness mentioned 2 times".to_string()]);
    }

    #[test]
    fn test_escalation_needs_five_records() {
        let detector = PatternDetector::new();
        let result = detector.detect(&[record(0), record(0), record(0), record(15)]);
        assert!(!result.escalating);

        let result = detector.detect(&[record(0), record(0), record(0), record(15), record(15)]);
        // head [0,0,0] = 0, tail [0,15,15] = 10
        assert!(!result.escalating);

        let result = detector.detect(&[record(0), record(0), record(0), record(15), record(15), record(45)]);
        // tail [15,15,45] = 25 > 20
        assert!(result.escalating);
        assert!(result.pattern_detected);
        assert_eq!(result.reasons, vec!["Emotional state appears to be worsening".to_string()]);
    }

    #[test]
    fn test_high_severity_and_reason_order() {
        let detector = PatternDetector::new();
        let history: Vec<_> = [0, 0, 0, 15, 45, 60, 60, 75, 90, 100]
            .iter()
            .map(|&s| if s >= 60 { lonely(s) } else { record(s) })
            .collect();
        let result = detector.detect(&history);
        assert_eq!(result.high_negativity_count, 6);
        assert_eq!(result.loneliness_mentions, 5);
        assert!(result.escalating);
        assert_eq!(result.severity, Some(PatternSeverity::High));
        assert_eq!(
            result.reasons,
            vec![
                "6 negative conversations detected".to_string(),
                "Loneliness mentioned 5 times".to_string(),
                "Emotional state appears to be worsening".to_string(),
            ]
        );
    }
}
