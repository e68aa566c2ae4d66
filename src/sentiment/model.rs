use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use super::{LexiconClassifier, Polarity, SentimentClassifier};
use crate::error::{ClassifierFault, RatingError};

/// Pluggable sentiment model (e.g. an inference backend).
///
/// Returns the model's own label; anything containing "pos" or "neg"
/// (case-insensitive) is mapped to a polarity, everything else is neutral.
pub trait SentimentModel: Send + Sync {
    fn name(&self) -> &str;
    fn predict(&self, text: &str) -> Result<String, ClassifierFault>;
}

/// Model-backed classifier with lexicon fallback
pub struct ModelClassifier {
    model: Box<dyn SentimentModel>,
    fallback: LexiconClassifier,
    max_input_chars: usize,
}

impl ModelClassifier {
    pub fn new(model: Box<dyn SentimentModel>, max_input_chars: usize) -> Result<Self, RatingError> {
        Ok(Self {
            model,
            fallback: LexiconClassifier::new()?,
            max_input_chars,
        })
    }

    /// Run the model; a panic inside it is reported as a fault like any other
    fn predict(&self, text: &str) -> Result<String, ClassifierFault> {
        panic::catch_unwind(AssertUnwindSafe(|| self.model.predict(text)))
            .unwrap_or_else(|payload| Err(ClassifierFault(panic_message(payload.as_ref()))))
    }

    /// Heuristic label mapping
    pub fn map_label(label: &str) -> Polarity {
        let label = label.to_lowercase();
        if label.contains("pos") {
            Polarity::Positive
        } else if label.contains("neg") {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("model panicked: {}", detail)
}

/// First `max_chars` characters of `text`, cut on a char boundary
fn prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

impl SentimentClassifier for ModelClassifier {
    fn name(&self) -> &str {
        self.model.name()
    }

    fn classify(&self, text: Option<&str>) -> Polarity {
        let Some(text) = text else {
            return self.fallback.classify(None);
        };
        match self.predict(prefix(text, self.max_input_chars)) {
            Ok(label) => Self::map_label(&label),
            Err(e) => {
                warn!("{} - falling back to lexicon", e);
                self.fallback.classify(Some(text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Records what it was asked and answers with a fixed label
    struct Scripted {
        label: Result<String, ClassifierFault>,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl SentimentModel for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn predict(&self, text: &str) -> Result<String, ClassifierFault> {
            self.seen.lock().push(text.to_string());
            self.label.clone()
        }
    }

    fn scripted(label: Result<&str, &str>) -> (ModelClassifier, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let model = Scripted {
            label: label.map(str::to_string).map_err(|e| ClassifierFault(e.to_string())),
            seen: seen.clone(),
        };
        (ModelClassifier::new(Box::new(model), 512).unwrap(), seen)
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(ModelClassifier::map_label("POSITIVE"), Polarity::Positive);
        assert_eq!(ModelClassifier::map_label("LABEL_neg"), Polarity::Negative);
        assert_eq!(ModelClassifier::map_label("NEUTRAL"), Polarity::Neutral);
        assert_eq!(ModelClassifier::map_label("LABEL_1"), Polarity::Neutral);
    }

    #[test]
    fn test_model_label_wins_over_lexicon() {
        let (classifier, _) = scripted(Ok("NEGATIVE"));
        assert_eq!(classifier.classify(Some("great, love it")), Polarity::Negative);
    }

    #[test]
    fn test_fault_falls_back_to_lexicon() {
        let (classifier, seen) = scripted(Err("backend unavailable"));
        assert_eq!(classifier.classify(Some("great, love it")), Polarity::Positive);
        assert_eq!(classifier.classify(Some("awful scam")), Polarity::Negative);
        assert_eq!(seen.lock().len(), 2);
    }

    /// Indexes past the end of an empty buffer
    struct OutOfBounds;

    impl SentimentModel for OutOfBounds {
        fn name(&self) -> &str {
            "out-of-bounds"
        }

        fn predict(&self, text: &str) -> Result<String, ClassifierFault> {
            let logits: Vec<&str> = Vec::new();
            Ok(logits[text.len()].to_string())
        }
    }

    #[test]
    fn test_panicking_model_falls_back_to_lexicon() {
        let classifier = ModelClassifier::new(Box::new(OutOfBounds), 512).unwrap();
        assert_eq!(classifier.classify(Some("great stuff")), Polarity::Positive);
        assert_eq!(classifier.classify(Some("awful scam")), Polarity::Negative);
        assert_eq!(classifier.classify(Some("")), Polarity::Neutral);
    }

    #[test]
    fn test_panic_message_is_kept() {
        let classifier = ModelClassifier::new(Box::new(OutOfBounds), 512).unwrap();
        let fault = classifier.predict("x").unwrap_err();
        assert!(fault.0.starts_with("model panicked: "), "got {}", fault);
        assert!(fault.0.contains("index out of bounds"), "got {}", fault);
    }

    #[test]
    fn test_input_truncated_to_prefix() {
        let (classifier, seen) = scripted(Ok("POSITIVE"));
        let long = "é".repeat(600);
        classifier.classify(Some(long.as_str()));
        let seen = seen.lock();
        assert_eq!(seen[0].chars().count(), 512);
    }

    #[test]
    fn test_missing_text_skips_model() {
        let (classifier, seen) = scripted(Ok("POSITIVE"));
        assert_eq!(classifier.classify(None), Polarity::Neutral);
        assert!(seen.lock().is_empty());
    }
}
