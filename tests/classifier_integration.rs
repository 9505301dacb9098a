//! Integration tests for the classifier
//!
//! Tests the path: text → lexicon match → scored sentiment record

use companion_mind::core::{Lexicon, SentimentClassifier};
use companion_mind::types::{EmotionCategory, Severity};
use companion_mind::{MODERATE_THRESHOLD, SCORE_MAX};
use pretty_assertions::assert_eq;

#[test]
fn test_lonely_utterance_scores() {
    let classifier = SentimentClassifier::new();
    let record = classifier.classify("I feel so lonely and nobody calls me anymore");

    assert_eq!(record.primary_emotion, Some(EmotionCategory::Loneliness));
    assert_eq!(record.confidence, 50);
    assert_eq!(record.negativity_score, 45);
    assert_eq!(record.severity, Severity::Moderate);
    assert!(record.needs_attention);
    assert_eq!(
        record.detected_keywords[&EmotionCategory::Loneliness],
        vec!["lonely".to_string(), "nobody".to_string()]
    );
    assert_eq!(
        record.detected_keywords[&EmotionCategory::SocialDisconnection],
        vec!["nobody calls".to_string()]
    );
    assert_eq!(record.emotion_breakdown[&EmotionCategory::SocialDisconnection], 25);
}

#[test]
fn test_neutral_utterance() {
    let record = SentimentClassifier::new().classify("The garden looks lovely this morning");

    assert_eq!(record.primary_emotion, None);
    assert_eq!(record.confidence, 0);
    assert_eq!(record.negativity_score, 0);
    assert_eq!(record.severity, Severity::None);
    assert!(record.emotion_breakdown.is_empty());
    assert!(!record.needs_attention);
}

#[test]
fn test_scores_stay_in_range() {
    let classifier = SentimentClassifier::new();
    let text = "lonely alone isolated forgotten abandoned empty sad depressed hopeless \
                crying worried anxious scared afraid panic";
    let record = classifier.classify(text);

    assert!(u32::from(record.negativity_score) <= SCORE_MAX);
    assert_eq!(record.negativity_score, 100);
    assert_eq!(record.severity, Severity::Severe);
    assert!(record.emotion_breakdown.values().all(|&v| u32::from(v) <= SCORE_MAX));
}

#[test]
fn test_needs_attention_matches_threshold() {
    let classifier = SentimentClassifier::new();
    for text in ["sad", "sad and worried", "sad, worried and alone", "hello"] {
        let record = classifier.classify(text);
        assert_eq!(record.needs_attention, record.negativity_score >= MODERATE_THRESHOLD, "{}", text);
    }
}

#[test]
fn test_custom_lexicon() {
    let lexicon = Lexicon::new([(EmotionCategory::Anxiety, &["Storm", "thunder"][..])]);
    let classifier = SentimentClassifier::with_lexicon(lexicon);

    let record = classifier.classify("The STORM and the thunder kept me up");
    assert_eq!(record.primary_emotion, Some(EmotionCategory::Anxiety));
    assert_eq!(record.negativity_score, 30);

    // Built-in phrases are not consulted
    assert_eq!(classifier.classify("so lonely").negativity_score, 0);
}

#[test]
fn test_json_shape() {
    let record = SentimentClassifier::new().classify("I'm scared");
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["primary_emotion"], "anxiety");
    assert_eq!(json["severity"], "mild");
    assert_eq!(json["emotion_breakdown"]["anxiety"], 25);
    assert_eq!(json["detected_keywords"]["anxiety"][0], "scared");
}
