//! Trend Analyzer: recent vs. older negativity over the sentiment history
//!
//! recent = last 3 records, older = the up-to-3 records before them.
//! Both averages divide by the number of records actually present.

use crate::{TREND_DELTA, TREND_HIGH_RISK, TREND_MEDIUM_RISK, TREND_MIN_SAMPLES, TREND_WINDOW};
use crate::types::{RiskLevel, SentimentRecord, Trend, TrendResult};

/// Negativity trend analyzer
#[derive(Debug, Default, Clone, Copy)]
pub struct TrendAnalyzer;

impl TrendAnalyzer {
    /// Create new analyzer
    pub fn new() -> Self {
        Self
    }

    /// Analyze a chronological history
    pub fn analyze(&self, history: &[SentimentRecord]) -> TrendResult {
        if history.len() < TREND_MIN_SAMPLES {
            return TrendResult::insufficient();
        }

        let len = history.len();
        let recent = &history[len - TREND_WINDOW..];
        let older = &history[len.saturating_sub(2 * TREND_WINDOW)..len - TREND_WINDOW];

        let recent_avg = mean_negativity(recent);

        let trend = if older.is_empty() {
            Trend::Stable
        } else {
            let older_avg = mean_negativity(older);
            if recent_avg > older_avg + TREND_DELTA {
                Trend::Worsening
            } else if recent_avg < older_avg - TREND_DELTA {
                Trend::Improving
            } else {
                Trend::Stable
            }
        };

        TrendResult {
            trend,
            risk_level: risk_for(recent_avg),
            recent_avg_negativity: round2(recent_avg),
        }
    }
}

/// Emotional risk level for an average negativity
pub fn risk_for(avg: f64) -> RiskLevel {
    if avg >= TREND_HIGH_RISK {
        RiskLevel::High
    } else if avg >= TREND_MEDIUM_RISK {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Mean negativity; 0 for an empty slice
pub fn mean_negativity(records: &[SentimentRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records.iter().map(|r| f64::from(r.negativity_score)).sum();
    sum / records.len() as f64
}

/// Round to 2 decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::Severity;

    /// Record with only a negativity score set
    pub(crate) fn record(score: u8) -> SentimentRecord {
        let mut r = SentimentRecord::neutral();
        r.negativity_score = score;
        r.severity = Severity::from_negativity(score);
        r
    }

    fn history(scores: &[u8]) -> Vec<SentimentRecord> {
        scores.iter().copied().map(record).collect()
    }

    #[test]
    fn test_insufficient_data() {
        let analyzer = TrendAnalyzer::new();
        let result = analyzer.analyze(&history(&[100, 100, 100]));
        assert_eq!(result.trend, Trend::InsufficientData);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.recent_avg_negativity, 0.0);
    }

    #[test]
    fn test_worsening_high() {
        let analyzer = TrendAnalyzer::new();
        let result = analyzer.analyze(&history(&[10, 10, 10, 70, 70, 70]));
        assert_eq!(result.trend, Trend::Worsening);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.recent_avg_negativity, 70.0);
    }

    #[test]
    fn test_improving() {
        let analyzer = TrendAnalyzer::new();
        let result = analyzer.analyze(&history(&[60, 60, 60, 15, 15, 0]));
        assert_eq!(result.trend, Trend::Improving);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.recent_avg_negativity, 10.0);
    }

    #[test]
    fn test_stable_within_delta() {
        let analyzer = TrendAnalyzer::new();
        let result = analyzer.analyze(&history(&[30, 30, 30, 40, 40, 40]));
        assert_eq!(result.trend, Trend::Stable);
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_short_older_window_uses_actual_length() {
        let analyzer = TrendAnalyzer::new();
        // older = [45] only; recent avg 45 -> stable, not worsening
        let result = analyzer.analyze(&history(&[45, 45, 45, 45]));
        assert_eq!(result.trend, Trend::Stable);
        // older = [0, 30] averages 15; recent avg 30 -> worsening
        let result = analyzer.analyze(&history(&[0, 30, 30, 30, 30]));
        assert_eq!(result.trend, Trend::Worsening);
    }

    #[test]
    fn test_only_last_six_matter() {
        let analyzer = TrendAnalyzer::new();
        let result = analyzer.analyze(&history(&[100, 100, 100, 0, 0, 0, 0, 0, 0]));
        assert_eq!(result.trend, Trend::Stable);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_rounding() {
        let analyzer = TrendAnalyzer::new();
        let result = analyzer.analyze(&history(&[0, 15, 15, 30]));
        assert_eq!(result.recent_avg_negativity, 20.0);
        let result = analyzer.analyze(&history(&[0, 0, 15, 15, 15, 30]));
        assert_eq!(result.recent_avg_negativity, 20.0);
        assert_eq!(round2(45.0 / 3.0 + 1.0 / 3.0), 15.33);
    }
}
