use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Dispute filed by (or for) a user about their rating.
/// Advisory only: appeals never change ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appeal {
    pub user: String,
    pub reason: String,
    pub time: DateTime<Utc>,
}

/// Append-only appeal log
#[derive(Debug, Default)]
pub struct AppealLog {
    entries: RwLock<Vec<Appeal>>,
}

impl AppealLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self, user: &str, reason: &str, time: DateTime<Utc>) {
        self.entries.write().push(Appeal {
            user: user.to_string(),
            reason: reason.to_string(),
            time,
        });
    }

    /// All appeals, oldest first
    pub fn all(&self) -> Vec<Appeal> {
        self.entries.read().clone()
    }

    pub fn for_user(&self, user: &str) -> Vec<Appeal> {
        self.entries
            .read()
            .iter()
            .filter(|a| a.user == user)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
