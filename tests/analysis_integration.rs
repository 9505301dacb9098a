//! Integration tests for history, trend and pattern analysis
//!
//! Tests the path: utterances → classifier → history → trend + pattern

use companion_mind::core::{append_and_analyze, SentimentClassifier, SentimentHistory, TrendAnalyzer};
use companion_mind::types::{PatternSeverity, RiskLevel, Trend, PATTERN_INSUFFICIENT_REASON};
use pretty_assertions::assert_eq;

/// 0 negativity
const CALM: &str = "hello";

/// 5 sadness phrases → 75 negativity
const DESPAIR: &str = "sad depressed unhappy miserable hopeless";

fn feed(texts: &[&str]) -> (SentimentHistory, Vec<companion_mind::types::TrendResult>) {
    let classifier = SentimentClassifier::new();
    let mut history = SentimentHistory::new();
    let mut trends = Vec::new();
    for text in texts {
        let (trend, _) = append_and_analyze(&mut history, classifier.classify(text));
        trends.push(trend);
    }
    (history, trends)
}

#[test]
fn test_worsening_conversation() {
    let (history, trends) = feed(&[CALM, CALM, CALM, DESPAIR, DESPAIR, DESPAIR]);

    // Below four records there is no trend
    for trend in &trends[..3] {
        assert_eq!(trend.trend, Trend::InsufficientData);
        assert_eq!(trend.risk_level, RiskLevel::Low);
    }

    let last = trends.last().unwrap();
    assert_eq!(last.trend, Trend::Worsening);
    assert_eq!(last.risk_level, RiskLevel::High);
    assert_eq!(last.recent_avg_negativity, 75.0);

    let pattern = history.pattern();
    assert!(pattern.pattern_detected);
    assert_eq!(pattern.severity, Some(PatternSeverity::Moderate));
    assert_eq!(pattern.high_negativity_count, 3);
    assert!(pattern.escalating);
    assert_eq!(
        pattern.reasons,
        vec![
            "3 negative conversations detected".to_string(),
            "Emotional state appears to be worsening".to_string(),
        ]
    );
}

#[test]
fn test_improving_conversation() {
    let (_, trends) = feed(&[DESPAIR, DESPAIR, DESPAIR, CALM, CALM, CALM]);
    let last = trends.last().unwrap();
    assert_eq!(last.trend, Trend::Improving);
    assert_eq!(last.risk_level, RiskLevel::Low);
    assert_eq!(last.recent_avg_negativity, 0.0);
}

#[test]
fn test_four_records_compare_against_one() {
    // older window holds only the first record
    let (_, trends) = feed(&[DESPAIR, "sad", "sad", "sad"]);
    let last = trends.last().unwrap();
    assert_eq!(last.trend, Trend::Improving);
    assert_eq!(last.recent_avg_negativity, 15.0);
}

#[test]
fn test_pattern_needs_three_records() {
    let (history, _) = feed(&[DESPAIR, DESPAIR]);
    let pattern = history.pattern();
    assert!(!pattern.pattern_detected);
    assert_eq!(pattern.reason.as_deref(), Some(PATTERN_INSUFFICIENT_REASON));
    assert_eq!(pattern.severity, None);
}

#[test]
fn test_loneliness_pattern() {
    let (history, _) = feed(&["I feel lonely", CALM, "all by myself today"]);
    let pattern = history.pattern();
    assert!(pattern.pattern_detected);
    assert_eq!(pattern.loneliness_mentions, 2);
    assert_eq!(pattern.reasons, vec!["Loneliness mentioned 2 times".to_string()]);
}

#[test]
fn test_pattern_window_is_last_ten() {
    let mut texts = vec![DESPAIR; 5];
    texts.extend(vec![CALM; 10]);
    let (history, _) = feed(&texts);

    let pattern = history.pattern();
    assert_eq!(pattern.high_negativity_count, 0);
    assert!(!pattern.pattern_detected);
}

#[test]
fn test_severe_pattern() {
    let (history, _) = feed(&[DESPAIR; 5]);
    let pattern = history.pattern();
    assert_eq!(pattern.severity, Some(PatternSeverity::High));
    assert!(!pattern.escalating);
}

#[test]
fn test_analysis_is_repeatable() {
    let (history, _) = feed(&[CALM, DESPAIR, "worried", "sad and alone", CALM]);
    let analyzer = TrendAnalyzer::new();
    assert_eq!(analyzer.analyze(history.records()), analyzer.analyze(history.records()));
    assert_eq!(history.pattern(), history.pattern());
}
