//! Lexicon: emotion category → trigger phrases
//!
//! Phrases are matched by plain case-insensitive substring containment.
//! There is no tokenization, so "miss" also matches inside "dismissed".

use std::collections::BTreeMap;
use lazy_static::lazy_static;
use crate::types::EmotionCategory;

lazy_static! {
    /// The built-in lexicon
    pub static ref STANDARD_LEXICON: Lexicon = Lexicon::new([
        (
            EmotionCategory::Loneliness,
            &[
                "lonely", "alone", "isolated", "forgotten", "nobody",
                "no one", "by myself", "on my own", "miss", "missing",
                "abandoned", "left behind", "empty", "solitary",
            ][..],
        ),
        (
            EmotionCategory::Sadness,
            &[
                "sad", "depressed", "down", "blue", "unhappy",
                "miserable", "hopeless", "despair", "crying", "tears",
                "heartbroken", "grief", "sorrow",
            ][..],
        ),
        (
            EmotionCategory::Anxiety,
            &[
                "worried", "anxious", "scared", "afraid", "fear",
                "nervous", "stress", "panic", "overwhelmed", "restless",
            ][..],
        ),
        (
            EmotionCategory::SocialDisconnection,
            &[
                "nobody calls", "nobody visits", "don't talk to anyone",
                "haven't heard from", "they forgot", "too busy for me",
                "don't care", "ignored", "excluded",
            ][..],
        ),
    ]);
}

/// Immutable category → ordered phrase set mapping
///
/// Iteration follows category declaration order; phrases keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    entries: BTreeMap<EmotionCategory, Vec<String>>,
}

impl Default for Lexicon {
    fn default() -> Self {
        STANDARD_LEXICON.clone()
    }
}

impl Lexicon {
    /// Build a lexicon. Phrases are lowercased; empty and repeated phrases are dropped.
    pub fn new<I, P, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (EmotionCategory, P)>,
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map: BTreeMap<EmotionCategory, Vec<String>> = BTreeMap::new();
        for (category, phrases) in entries {
            let list = map.entry(category).or_default();
            for phrase in phrases {
                let phrase = phrase.as_ref().to_lowercase();
                if !phrase.is_empty() && !list.contains(&phrase) {
                    list.push(phrase);
                }
            }
        }
        Self { entries: map }
    }

    /// The built-in lexicon
    pub fn standard() -> &'static Lexicon {
        &STANDARD_LEXICON
    }

    /// Categories with their phrases, in declaration order
    pub fn entries(&self) -> impl Iterator<Item = (EmotionCategory, &[String])> {
        self.entries.iter().map(|(c, p)| (*c, p.as_slice()))
    }

    /// Phrases for one category
    pub fn phrases(&self, category: EmotionCategory) -> &[String] {
        self.entries.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
