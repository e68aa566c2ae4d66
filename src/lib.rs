//! star-ledger: peer feedback star ratings
//!
//! Ratings move on likes, dislikes and comments, weighted by the rater's own
//! standing and damped near the top of the scale. Repeat feedback from the
//! same rater is gated by a cooldown, and every rating relaxes toward neutral
//! over time. Each change lands in a bounded per-user history.

pub mod appeal;
pub mod clock;
pub mod config;
pub mod error;
pub mod rating;
pub mod replay;
pub mod report;
pub mod sentiment;

pub use appeal::Appeal;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{ClassifierFault, RatingError};
pub use rating::engine::RatingEngine;
pub use rating::store::HistoryEvent;
pub use rating::types::{FeedbackRequest, FeedbackType};
pub use report::{AnonymizedReport, FullReport};
pub use sentiment::{Polarity, SentimentClassifier, SentimentModel};
