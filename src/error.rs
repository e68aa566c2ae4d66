use thiserror::Error;

/// Errors surfaced to callers of the rating engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RatingError {
    /// Input the engine refuses to act on (e.g. unknown feedback type)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration the engine cannot honor
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Sentiment classifier could not be built
    #[error("Classifier setup failed: {0}")]
    ClassifierSetup(String),
}

/// Failure inside a pluggable sentiment model.
///
/// Never reaches engine callers: the model classifier logs it and
/// falls back to the lexicon.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Sentiment model fault: {0}")]
pub struct ClassifierFault(pub String);

pub type Result<T> = std::result::Result<T, RatingError>;
