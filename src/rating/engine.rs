use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::appeal::{Appeal, AppealLog};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::Result;
use crate::rating::formula;
use crate::rating::store::{CooldownTracker, HistoryEvent, RatingStore, UserMetadata};
use crate::rating::types::{FeedbackRequest, FeedbackType};
use crate::report::{AnonymizedReport, FullReport};
use crate::sentiment::{self, Polarity, SentimentClassifier, SentimentModel};

/// Mutable rating state. Always accessed under one lock so the
/// cooldown check and the commit that follows cannot interleave.
struct Ledger {
    ratings: RatingStore,
    meta: HashMap<String, UserMetadata>,
    cooldowns: CooldownTracker,
}

/// Core rating engine - feedback, decay, reports and appeals
pub struct RatingEngine {
    config: Arc<Config>,
    ledger: Mutex<Ledger>,
    appeals: AppealLog,
    classifier: Box<dyn SentimentClassifier>,
    clock: Arc<dyn Clock>,
}

impl RatingEngine {
    /// Engine with the lexicon classifier and the system clock
    pub fn new(config: Arc<Config>) -> Result<Self> {
        Self::build(config, None)
    }

    /// Engine with a pluggable sentiment model, used when `sentiment.advanced` is set
    pub fn with_model(config: Arc<Config>, model: Box<dyn SentimentModel>) -> Result<Self> {
        Self::build(config, Some(model))
    }

    fn build(config: Arc<Config>, model: Option<Box<dyn SentimentModel>>) -> Result<Self> {
        config.validate()?;
        let classifier = sentiment::build_classifier(&config.sentiment, model)?;
        let ledger = Ledger {
            ratings: RatingStore::new(&config.rating),
            meta: HashMap::new(),
            cooldowns: CooldownTracker::new(config.cooldown.days),
        };

        info!(
            "Rating engine ready (scale {}..{}, neutral {}, cooldown {}d, half-life {}d, sentiment: {})",
            config.rating.min_rating,
            config.rating.max_rating,
            config.rating.neutral_rating,
            config.cooldown.days,
            config.decay.half_life_days,
            classifier.name()
        );

        Ok(Self {
            config,
            ledger: Mutex::new(ledger),
            appeals: AppealLog::new(),
            classifier,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source (tests, replays of historic streams)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Current rating; `neutral_rating` for unseen users
    pub fn get_rating(&self, user: &str) -> f64 {
        self.ledger.lock().ratings.get(user)
    }

    /// Apply one feedback event and return the target's resulting rating.
    ///
    /// An unknown `feedback_type` fails with `InvalidArgument` before any state
    /// is touched. Feedback inside the rater's cooldown window for this target
    /// is a no-op that returns the current rating.
    pub fn process_feedback(
        &self,
        target: &str,
        rater: &str,
        feedback_type: &str,
        comment_text: Option<&str>,
    ) -> Result<f64> {
        let kind: FeedbackType = feedback_type.parse()?;
        Ok(self.apply(target, rater, kind, comment_text))
    }

    pub fn process_request(&self, request: &FeedbackRequest) -> Result<f64> {
        self.process_feedback(
            &request.target,
            &request.rater,
            &request.feedback_type,
            request.comment_text.as_deref(),
        )
    }

    /// Apply feedback strictly in order; the first failure aborts the rest
    pub fn bulk_process<'a, I>(&self, feedbacks: I) -> Result<Vec<f64>>
    where
        I: IntoIterator<Item = &'a FeedbackRequest>,
    {
        feedbacks
            .into_iter()
            .map(|request| self.process_request(request))
            .collect()
    }

    fn apply(&self, target: &str, rater: &str, kind: FeedbackType, comment_text: Option<&str>) -> f64 {
        let now = self.clock.now();
        let rating = &self.config.rating;
        let mut ledger = self.ledger.lock();

        if ledger.cooldowns.is_cooling(rater, target, now) {
            let current = ledger.ratings.get(target);
            debug!("Cooldown: {} -> {} suppressed (rating stays {:.4})", rater, target, current);
            return current;
        }

        let polarity = match kind {
            FeedbackType::Like => Polarity::Positive,
            FeedbackType::Dislike => Polarity::Negative,
            FeedbackType::Comment => self.classifier.classify(comment_text),
        };

        let old_rating = ledger.ratings.get(target);
        let influence = formula::influence_weight(ledger.ratings.get(rater), rating.max_rating);
        let change = formula::rating_change(
            rating.base_change,
            influence,
            kind.multiplier(),
            polarity.direction(),
            old_rating,
            rating.max_rating,
        );
        let new_rating = ledger.ratings.set(target, old_rating + change);

        let capacity = self.config.history.capacity;
        let meta = ledger
            .meta
            .entry(target.to_string())
            .or_insert_with(|| UserMetadata::new(now, capacity));
        meta.record_feedback(polarity);
        meta.touch(now);
        meta.history.push(HistoryEvent::Feedback {
            at: now,
            rater: rater.to_string(),
            feedback_type: kind,
            polarity,
            old_rating,
            change: formula::round4(change),
            new_rating,
        });

        ledger.cooldowns.record(rater, target, now);

        debug!(
            "Feedback: {} -> {} {} ({}) influence={:.3} change={:+.4} rating {:.4} -> {:.4}",
            rater,
            target,
            kind,
            polarity.name(),
            influence,
            change,
            old_rating,
            new_rating
        );
        new_rating
    }

    /// Relax every tracked user's rating toward neutral by the time elapsed
    /// since their last update. Returns how many users were relaxed.
    pub fn apply_decay(&self) -> usize {
        let now = self.clock.now();
        let neutral = self.config.rating.neutral_rating;
        let half_life = self.config.decay.half_life_days;

        let mut ledger = self.ledger.lock();
        let Ledger { ratings, meta, .. } = &mut *ledger;

        let mut relaxed = 0;
        for (user, m) in meta.iter_mut() {
            let days = elapsed_days(m.last_updated, now);
            if days <= 0.0 {
                continue;
            }
            let old_rating = ratings.get(user);
            let decayed = formula::decay_toward(old_rating, neutral, half_life, days);
            let new_rating = ratings.set(user, decayed);
            m.touch(now);
            m.history.push(HistoryEvent::Decay {
                at: now,
                old_rating,
                new_rating,
            });
            relaxed += 1;
        }

        info!("Decay sweep: {} of {} users relaxed toward {}", relaxed, meta.len(), neutral);
        relaxed
    }

    /// Periodic decay sweep driven by `decay.sweep_interval_secs`
    pub async fn run_decay_loop(&self) {
        if !self.config.decay.enabled {
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.decay.sweep_interval_secs.max(1));
        info!("Decay scheduler started (interval: {:?})", interval);

        loop {
            tokio::time::sleep(interval).await;
            self.apply_decay();
        }
    }

    /// Record a dispute; ratings are untouched
    pub fn file_appeal(&self, target: &str, reason: &str) {
        self.appeals.file(target, reason, self.clock.now());
        info!("Appeal filed for {}: {}", target, reason);
    }

    pub fn appeals(&self) -> Vec<Appeal> {
        self.appeals.all()
    }

    /// Appeals filed for one user, oldest first
    pub fn appeals_for(&self, user: &str) -> Vec<Appeal> {
        self.appeals.for_user(user)
    }

    pub fn anonymized_report(&self, user: &str) -> AnonymizedReport {
        let ledger = self.ledger.lock();
        let meta = ledger.meta.get(user);
        AnonymizedReport {
            rating: ledger.ratings.get(user),
            received_count: meta.map_or(0, |m| m.received_count),
            positive_count: meta.map_or(0, |m| m.positive_count),
            negative_count: meta.map_or(0, |m| m.negative_count),
        }
    }

    pub fn full_report(&self, user: &str) -> FullReport {
        let ledger = self.ledger.lock();
        let meta = ledger.meta.get(user);
        FullReport {
            user: user.to_string(),
            rating: ledger.ratings.get(user),
            received_count: meta.map_or(0, |m| m.received_count),
            positive_count: meta.map_or(0, |m| m.positive_count),
            negative_count: meta.map_or(0, |m| m.negative_count),
            last_updated: meta.map(|m| m.last_updated),
            history: meta.map(|m| m.history.to_vec()).unwrap_or_default(),
        }
    }

    /// Get stats for logs and the replay `stats` command
    pub fn get_stats(&self) -> serde_json::Value {
        let ledger = self.ledger.lock();
        serde_json::json!({
            "rated_users": ledger.ratings.len(),
            "tracked_users": ledger.meta.len(),
            "cooldown_entries": ledger.cooldowns.len(),
            "appeals": self.appeals.len(),
            "classifier": self.classifier.name(),
            "history_capacity": self.config.history.capacity,
        })
    }
}

/// Fractional days from `since` to `now` (negative when `now` is earlier)
fn elapsed_days(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let elapsed = now - since;
    match elapsed.num_microseconds() {
        Some(us) => us as f64 / 86_400_000_000.0,
        None => elapsed.num_seconds() as f64 / 86_400.0,
    }
}
