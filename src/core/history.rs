//! History Store: chronological sentiment records of one subject
//!
//! Insertion order is chronological order. Analysis reads positions, not
//! timestamps, so records must be appended one at a time under the
//! subject's lock.

use crate::core::{PatternDetector, TrendAnalyzer};
use crate::types::{PatternResult, SentimentRecord, TrendResult};

/// Append-only series of classifier outputs
#[derive(Debug, Clone, Default)]
pub struct SentimentHistory {
    records: Vec<SentimentRecord>,
    limit: Option<usize>,
}

impl SentimentHistory {
    /// Create an unbounded history
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history that keeps at most `limit` records, dropping the oldest
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: Vec::new(),
            limit: Some(limit.max(1)),
        }
    }

    /// Append one record
    pub fn push(&mut self, record: SentimentRecord) {
        self.records.push(record);
        if let Some(limit) = self.limit {
            if self.records.len() > limit {
                let excess = self.records.len() - limit;
                self.records.drain(..excess);
            }
        }
    }

    /// All records, oldest first
    pub fn records(&self) -> &[SentimentRecord] {
        &self.records
    }

    /// Last `n` records, oldest first
    pub fn tail(&self, n: usize) -> &[SentimentRecord] {
        &self.records[self.records.len().saturating_sub(n)..]
    }

    /// Most recent record
    pub fn last(&self) -> Option<&SentimentRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Trend over the current history
    pub fn trend(&self) -> TrendResult {
        TrendAnalyzer::new().analyze(&self.records)
    }

    /// Patterns over the current history
    pub fn pattern(&self) -> PatternResult {
        PatternDetector::new().detect(&self.records)
    }
}

/// Append a record, then run trend and pattern analysis over the new history
pub fn append_and_analyze(
    history: &mut SentimentHistory,
    record: SentimentRecord,
) -> (TrendResult, PatternResult) {
    history.push(record);
    (history.trend(), history.pattern())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::trend::tests::record;
    use crate::types::Trend;

    #[test]
    fn test_unbounded_by_default() {
        let mut history = SentimentHistory::new();
        for _ in 0..250 {
            history.push(record(0));
        }
        assert_eq!(history.len(), 250);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = SentimentHistory::with_limit(3);
        for score in [10, 20, 30, 40, 50] {
            history.push(record(score));
        }
        let scores: Vec<u8> = history.records().iter().map(|r| r.negativity_score).collect();
        assert_eq!(scores, vec![30, 40, 50]);
    }

    #[test]
    fn test_tail() {
        let mut history = SentimentHistory::new();
        for score in [10, 20, 30] {
            history.push(record(score));
        }
        assert_eq!(history.tail(2).len(), 2);
        assert_eq!(history.tail(2)[0].negativity_score, 20);
        assert_eq!(history.tail(10).len(), 3);
    }

    #[test]
    fn test_append_and_analyze() {
        let mut history = SentimentHistory::new();
        for score in [10, 10, 10, 70, 70] {
            history.push(record(score));
        }
        let (trend, pattern) = append_and_analyze(&mut history, record(70));
        assert_eq!(history.len(), 6);
        assert_eq!(trend.trend, Trend::Worsening);
        assert!(pattern.pattern_detected);
        assert_eq!(pattern.high_negativity_count, 3);
    }
}
