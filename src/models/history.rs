use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recommendation query remembered for a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub title: String,
    pub k: usize,
    /// Titles returned, best first
    pub recommended: Vec<String>,
    pub queried_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(title: String, k: usize, recommended: Vec<String>) -> Self {
        Self {
            title,
            k,
            recommended,
            queried_at: Utc::now(),
        }
    }
}
