use aho_corasick::AhoCorasick;

use super::{Polarity, SentimentClassifier};
use crate::error::RatingError;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "awesome", "nice", "love", "excellent", "amazing",
    "like", "well", "fantastic", "brilliant", "happy", "recommend",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "hate", "awful", "worst", "dislike",
    "sucks", "stupid", "vulgar", "disgusting", "scam", "fraud",
];

/// Lexical rule matcher
///
/// Score = (#positive words present) - (#negative words present), matched as
/// case-insensitive substrings; each word counts at most once.
#[derive(Debug, Clone)]
pub struct LexiconClassifier {
    positive: AhoCorasick,
    negative: AhoCorasick,
}

impl LexiconClassifier {
    pub fn new() -> Result<Self, RatingError> {
        Ok(Self {
            positive: build_matcher(POSITIVE_WORDS, "positive")?,
            negative: build_matcher(NEGATIVE_WORDS, "negative")?,
        })
    }

    pub fn score(&self, text: &str) -> i32 {
        distinct_hits(&self.positive, text) - distinct_hits(&self.negative, text)
    }
}

fn build_matcher(words: &[&str], side: &str) -> Result<AhoCorasick, RatingError> {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(words)
        .map_err(|e| RatingError::ClassifierSetup(format!("Failed to build {} word matcher: {}", side, e)))
}

/// Number of distinct words found; overlapping matches all count
fn distinct_hits(matcher: &AhoCorasick, text: &str) -> i32 {
    let mut seen = vec![false; matcher.patterns_len()];
    for m in matcher.find_overlapping_iter(text) {
        seen[m.pattern().as_usize()] = true;
    }
    seen.iter().filter(|&&hit| hit).count() as i32
}

impl SentimentClassifier for LexiconClassifier {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn classify(&self, text: Option<&str>) -> Polarity {
        let Some(text) = text else {
            return Polarity::Neutral;
        };
        match self.score(text) {
            s if s > 0 => Polarity::Positive,
            s if s < 0 => Polarity::Negative,
            _ => Polarity::Neutral,
        }
    }
}
