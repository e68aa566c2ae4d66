use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::rating::store::HistoryEvent;

/// Rating and counters only; no history, no rater identities
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnonymizedReport {
    pub rating: f64,
    pub received_count: u64,
    pub positive_count: u64,
    pub negative_count: u64,
}

/// Everything tracked for a user, full history included.
/// `last_updated` is `None` for users never touched by feedback or decay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullReport {
    pub user: String,
    pub rating: f64,
    pub received_count: u64,
    pub positive_count: u64,
    pub negative_count: u64,
    pub last_updated: Option<DateTime<Utc>>,
    pub history: Vec<HistoryEvent>,
}
