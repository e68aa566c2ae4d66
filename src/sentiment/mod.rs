//! Sentiment resolution for comment feedback
//!
//! The engine only sees the three-way `Polarity` contract. Two classifiers
//! implement it: the lexicon matcher (always available) and a model-backed
//! classifier wrapping a pluggable `SentimentModel`.

pub mod lexicon;
pub mod model;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SentimentConfig;
use crate::error::RatingError;

pub use lexicon::LexiconClassifier;
pub use model::{ModelClassifier, SentimentModel};

/// Resolved direction of a feedback event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

impl Polarity {
    /// +1, -1 or 0
    pub fn direction(self) -> f64 {
        match self {
            Polarity::Positive => 1.0,
            Polarity::Negative => -1.0,
            Polarity::Neutral => 0.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
            Polarity::Neutral => "neutral",
        }
    }
}

/// Total text -> polarity mapping. Implementations never fail.
pub trait SentimentClassifier: Send + Sync {
    fn name(&self) -> &str;
    fn classify(&self, text: Option<&str>) -> Polarity;
}

/// Pick the classifier the config asks for.
///
/// `advanced = true` only takes effect when a model is actually supplied;
/// otherwise the lexicon is used, same as when the feature is off.
pub fn build_classifier(
    config: &SentimentConfig,
    model: Option<Box<dyn SentimentModel>>,
) -> Result<Box<dyn SentimentClassifier>, RatingError> {
    let classifier: Box<dyn SentimentClassifier> = match (config.advanced, model) {
        (true, Some(model)) => {
            info!("Sentiment: model '{}' (prefix {} chars, lexicon fallback)", model.name(), config.max_input_chars);
            Box::new(ModelClassifier::new(model, config.max_input_chars)?)
        }
        (true, None) => {
            warn!("Advanced sentiment requested but no model available, using lexicon");
            Box::new(LexiconClassifier::new()?)
        }
        (false, Some(model)) => {
            info!("Sentiment model '{}' supplied but advanced sentiment is disabled, using lexicon", model.name());
            Box::new(LexiconClassifier::new()?)
        }
        (false, None) => Box::new(LexiconClassifier::new()?),
    };
    Ok(classifier)
}
