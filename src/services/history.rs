use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::HistoryEntry;

#[derive(Default)]
struct SessionHistory {
    entries: VecDeque<HistoryEntry>,
    /// Value of the store clock at the last write
    last_used: u64,
}

#[derive(Default)]
struct Sessions {
    by_id: HashMap<Uuid, SessionHistory>,
    clock: u64,
}

/// Per-session query history, isolated by session id.
///
/// Holds at most `max_sessions` sessions; recording into a new session
/// beyond that evicts the least recently written one.
#[derive(Clone)]
pub struct HistoryStore {
    sessions: Arc<RwLock<Sessions>>,
    limit: usize,
    max_sessions: usize,
}

impl HistoryStore {
    /// Creates an empty store keeping at most `limit` entries per session
    /// and at most `max_sessions` sessions
    pub fn new(limit: usize, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(Sessions::default())),
            limit,
            max_sessions,
        }
    }

    /// Appends an entry, evicting the oldest once the session is full
    pub async fn record(&self, session: Uuid, entry: HistoryEntry) {
        if self.limit == 0 || self.max_sessions == 0 {
            return;
        }

        let mut sessions = self.sessions.write().await;
        sessions.clock += 1;
        let now = sessions.clock;

        if !sessions.by_id.contains_key(&session) && sessions.by_id.len() >= self.max_sessions {
            let oldest = sessions
                .by_id
                .iter()
                .min_by_key(|(_, h)| h.last_used)
                .map(|(id, _)| *id);
            if let Some(oldest) = oldest {
                sessions.by_id.remove(&oldest);
                tracing::debug!(session = %oldest, "Evicted least recently used session");
            }
        }

        let history = sessions.by_id.entry(session).or_default();
        if history.entries.len() >= self.limit {
            history.entries.pop_front();
        }
        history.entries.push_back(entry);
        history.last_used = now;

        tracing::debug!(session = %session, entries = history.entries.len(), "History recorded");
    }

    /// Number of sessions currently held
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.by_id.len()
    }

    /// Returns a session's entries, oldest first
    pub async fn list(&self, session: Uuid) -> Vec<HistoryEntry> {
        let sessions = self.sessions.read().await;
        sessions
            .by_id
            .get(&session)
            .map(|h| h.entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Forgets a session, returning how many entries were dropped
    pub async fn clear(&self, session: Uuid) -> usize {
        let mut sessions = self.sessions.write().await;
        sessions
            .by_id
            .remove(&session)
            .map(|h| h.entries.len())
            .unwrap_or(0)
    }
}
