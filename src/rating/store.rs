use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RatingConfig;
use crate::rating::types::FeedbackType;
use crate::sentiment::Polarity;

/// Current rating per user. Unseen users read as `neutral`.
#[derive(Debug, Clone)]
pub struct RatingStore {
    ratings: HashMap<String, f64>,
    min: f64,
    max: f64,
    neutral: f64,
}

impl RatingStore {
    pub fn new(config: &RatingConfig) -> Self {
        Self {
            ratings: HashMap::new(),
            min: config.min_rating,
            max: config.max_rating,
            neutral: config.neutral_rating,
        }
    }

    pub fn get(&self, user: &str) -> f64 {
        self.ratings.get(user).copied().unwrap_or(self.neutral)
    }

    /// Store `rating` clamped to the configured bounds; returns the stored value
    pub fn set(&mut self, user: &str, rating: f64) -> f64 {
        let clamped = self.clamp(rating);
        self.ratings.insert(user.to_string(), clamped);
        clamped
    }

    pub fn clamp(&self, rating: f64) -> f64 {
        rating.clamp(self.min, self.max)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

/// One entry in a user's audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HistoryEvent {
    Feedback {
        at: DateTime<Utc>,
        rater: String,
        feedback_type: FeedbackType,
        polarity: Polarity,
        old_rating: f64,
        /// Rounded to 4 decimal places
        change: f64,
        new_rating: f64,
    },
    Decay {
        at: DateTime<Utc>,
        old_rating: f64,
        new_rating: f64,
    },
}

impl HistoryEvent {
    pub fn new_rating(&self) -> f64 {
        match self {
            HistoryEvent::Feedback { new_rating, .. } | HistoryEvent::Decay { new_rating, .. } => *new_rating,
        }
    }
}

/// Fixed-capacity event log, oldest evicted first
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct HistoryLog {
    events: VecDeque<HistoryEvent>,
    #[serde(skip)]
    capacity: usize,
}

impl HistoryLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, event: HistoryEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEvent> {
        self.events.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoryEvent> {
        self.events.iter().cloned().collect()
    }
}

/// Per-user counters and audit trail
#[derive(Debug, Clone)]
pub struct UserMetadata {
    /// Accepted feedback events, neutral ones included; decay never counts
    pub received_count: u64,
    pub positive_count: u64,
    pub negative_count: u64,
    pub last_updated: DateTime<Utc>,
    pub history: HistoryLog,
}

impl UserMetadata {
    pub fn new(created_at: DateTime<Utc>, history_capacity: usize) -> Self {
        Self {
            received_count: 0,
            positive_count: 0,
            negative_count: 0,
            last_updated: created_at,
            history: HistoryLog::with_capacity(history_capacity),
        }
    }

    /// Count an accepted feedback event
    pub fn record_feedback(&mut self, polarity: Polarity) {
        self.received_count += 1;
        match polarity {
            Polarity::Positive => self.positive_count += 1,
            Polarity::Negative => self.negative_count += 1,
            Polarity::Neutral => {}
        }
    }

    /// Move `last_updated` forward; never backwards
    pub fn touch(&mut self, at: DateTime<Utc>) {
        if at > self.last_updated {
            self.last_updated = at;
        }
    }
}

/// Last accepted feedback time per (rater, target) pair
#[derive(Debug, Clone)]
pub struct CooldownTracker {
    last_feedback: HashMap<(String, String), DateTime<Utc>>,
    window_days: i64,
}

impl CooldownTracker {
    pub fn new(window_days: i64) -> Self {
        Self {
            last_feedback: HashMap::new(),
            window_days,
        }
    }

    /// True while fewer than `window_days` whole days have passed since the
    /// rater's last accepted feedback to this target
    pub fn is_cooling(&self, rater: &str, target: &str, now: DateTime<Utc>) -> bool {
        match self.last_feedback.get(&(rater.to_string(), target.to_string())) {
            Some(last) => (now - *last).num_days() < self.window_days,
            None => false,
        }
    }

    pub fn record(&mut self, rater: &str, target: &str, at: DateTime<Utc>) {
        self.last_feedback.insert((rater.to_string(), target.to_string()), at);
    }

    pub fn len(&self) -> usize {
        self.last_feedback.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_feedback.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn decay_event(at: DateTime<Utc>, new_rating: f64) -> HistoryEvent {
        HistoryEvent::Decay { at, old_rating: 0.0, new_rating }
    }

    #[test]
    fn test_rating_store_default_and_clamp() {
        let mut store = RatingStore::new(&RatingConfig::default());
        assert_eq!(store.get("nobody"), 2.5);

        assert_eq!(store.set("a", 9.0), 5.0);
        assert_eq!(store.set("b", -1.0), 0.0);
        assert_eq!(store.get("a"), 5.0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_history_evicts_oldest() {
        let now = Utc::now();
        let mut log = HistoryLog::with_capacity(3);
        for i in 0..5 {
            log.push(decay_event(now, i as f64));
        }
        assert_eq!(log.len(), 3);
        let kept: Vec<f64> = log.iter().map(|e| e.new_rating()).collect();
        assert_eq!(kept, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_history_serializes_as_tagged_list() {
        let now = Utc::now();
        let mut log = HistoryLog::with_capacity(2);
        log.push(decay_event(now, 2.6));
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json[0]["event"], "decay");
        assert_eq!(json[0]["new_rating"], 2.6);
    }

    #[test]
    fn test_metadata_counts() {
        let mut meta = UserMetadata::new(Utc::now(), 10);
        meta.record_feedback(Polarity::Positive);
        meta.record_feedback(Polarity::Negative);
        meta.record_feedback(Polarity::Neutral);
        assert_eq!(meta.received_count, 3);
        assert_eq!(meta.positive_count, 1);
        assert_eq!(meta.negative_count, 1);
    }

    #[test]
    fn test_metadata_touch_is_monotonic() {
        let start = Utc::now();
        let mut meta = UserMetadata::new(start, 10);
        meta.touch(start - Duration::hours(1));
        assert_eq!(meta.last_updated, start);
        meta.touch(start + Duration::hours(1));
        assert_eq!(meta.last_updated, start + Duration::hours(1));
    }

    #[test]
    fn test_cooldown_whole_days() {
        let start = Utc::now();
        let mut cooldowns = CooldownTracker::new(7);
        assert!(!cooldowns.is_cooling("bob", "alice", start));

        cooldowns.record("bob", "alice", start);
        assert!(cooldowns.is_cooling("bob", "alice", start + Duration::days(6)));
        assert!(cooldowns.is_cooling("bob", "alice", start + Duration::days(7) - Duration::seconds(1)));
        assert!(!cooldowns.is_cooling("bob", "alice", start + Duration::days(7)));
    }

    #[test]
    fn test_cooldown_is_directional() {
        let now = Utc::now();
        let mut cooldowns = CooldownTracker::new(7);
        cooldowns.record("bob", "alice", now);
        assert!(!cooldowns.is_cooling("alice", "bob", now));
        assert!(!cooldowns.is_cooling("bob", "carol", now));
        assert!(cooldowns.is_cooling("bob", "alice", now));
    }

    #[test]
    fn test_zero_day_cooldown_never_blocks() {
        let now = Utc::now();
        let mut cooldowns = CooldownTracker::new(0);
        cooldowns.record("bob", "alice", now);
        assert!(!cooldowns.is_cooling("bob", "alice", now));
    }
}
