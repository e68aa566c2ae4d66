use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RatingError;

/// Kind of peer feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    Like,
    Dislike,
    Comment,
}

impl FeedbackType {
    /// Weight by type: comments cost the most to write and carry full weight
    pub fn multiplier(self) -> f64 {
        match self {
            FeedbackType::Like => 0.6,
            FeedbackType::Dislike => 0.8,
            FeedbackType::Comment => 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FeedbackType::Like => "like",
            FeedbackType::Dislike => "dislike",
            FeedbackType::Comment => "comment",
        }
    }
}

impl FromStr for FeedbackType {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(FeedbackType::Like),
            "dislike" => Ok(FeedbackType::Dislike),
            "comment" => Ok(FeedbackType::Comment),
            other => Err(RatingError::InvalidArgument(format!(
                "feedback_type must be 'like'|'dislike'|'comment' (got '{}')",
                other
            ))),
        }
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One feedback event as received from a caller, type not yet validated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub target: String,
    pub rater: String,
    pub feedback_type: String,
    #[serde(default)]
    pub comment_text: Option<String>,
}

impl FeedbackRequest {
    pub fn new(target: &str, rater: &str, feedback_type: &str, comment_text: Option<&str>) -> Self {
        Self {
            target: target.to_string(),
            rater: rater.to_string(),
            feedback_type: feedback_type.to_string(),
            comment_text: comment_text.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        assert_eq!("like".parse::<FeedbackType>().unwrap(), FeedbackType::Like);
        assert_eq!("dislike".parse::<FeedbackType>().unwrap(), FeedbackType::Dislike);
        assert_eq!("comment".parse::<FeedbackType>().unwrap(), FeedbackType::Comment);
    }

    #[test]
    fn test_parse_rejects_unknown_and_wrong_case() {
        assert!(matches!("spam".parse::<FeedbackType>(), Err(RatingError::InvalidArgument(_))));
        assert!("LIKE".parse::<FeedbackType>().is_err());
    }

    #[test]
    fn test_request_deserializes_without_comment() {
        let req: FeedbackRequest =
            serde_json::from_str(r#"{"target":"alice","rater":"bob","feedback_type":"like"}"#).unwrap();
        assert_eq!(req, FeedbackRequest::new("alice", "bob", "like", None));
    }
}
