// Session management for concurrent HTTP clients

use crate::config::SessionConfig;
use crate::conversation::ConversationHistory;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task::JoinHandle;
use tokio::time;
use uuid::Uuid;

const MAX_SESSION_ID_LEN: usize = 128;

/// Per-session state
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Unique session identifier
    pub id: String,
    /// Conversation memory for this session
    pub conversation: ConversationHistory,
    /// Last activity timestamp
    pub last_activity: DateTime<Utc>,
    /// Session creation time
    pub created_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(id: String, max_messages: usize) -> Self {
        let now = Utc::now();
        Self {
            id,
            conversation: ConversationHistory::with_limit(max_messages),
            last_activity: now,
            created_at: now,
        }
    }

    /// Update last activity timestamp
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Check if session has expired
    pub fn is_expired(&self, timeout_minutes: u64) -> bool {
        let elapsed = Utc::now().signed_duration_since(self.last_activity);
        elapsed.num_minutes() >= timeout_minutes as i64
    }
}

/// A session shared between the map and in-flight requests.
/// Holding the lock serializes requests within one conversation.
pub type SharedSession = Arc<Mutex<SessionState>>;

/// Concurrent session manager using DashMap
pub struct SessionManager {
    sessions: Arc<DashMap<String, SharedSession>>,
    max_sessions: usize,
    timeout_minutes: u64,
    max_messages: usize,
}

impl SessionManager {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            max_sessions: config.max_sessions.max(1),
            timeout_minutes: config.timeout_minutes,
            max_messages: config.max_messages,
        }
    }

    /// Get the session for `session_id`, creating it if needed
    ///
    /// A client-supplied id is kept when it is a valid identifier; otherwise a
    /// fresh UUID is assigned. At capacity the least recently active idle
    /// session is evicted.
    pub fn get_or_create(&self, session_id: Option<&str>) -> SharedSession {
        let requested = session_id.filter(|id| is_valid_session_id(id));

        if let Some(id) = requested {
            if let Some(session) = self.sessions.get(id) {
                return Arc::clone(session.value());
            }
        }

        if self.sessions.len() >= self.max_sessions {
            self.evict_oldest();
        }

        let id = requested
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        self.sessions
            .entry(id.clone())
            .or_insert_with(|| {
                tracing::info!(session_id = %id, "Created new session");
                Arc::new(Mutex::new(SessionState::new(id.clone(), self.max_messages)))
            })
            .value()
            .clone()
    }

    /// Get or create a session and lock it
    ///
    /// The returned guard always belongs to a session that is still in the
    /// map. Locked sessions are skipped by eviction and expiry, so a turn
    /// written through the guard cannot land in a detached session.
    pub async fn acquire(&self, session_id: Option<&str>) -> OwnedMutexGuard<SessionState> {
        loop {
            let session = self.get_or_create(session_id);
            let guard = Arc::clone(&session).lock_owned().await;

            if self.is_current(&guard.id, &session) {
                return guard;
            }
            tracing::debug!(session_id = %guard.id, "Session removed before lock, retrying");
        }
    }

    fn is_current(&self, session_id: &str, session: &SharedSession) -> bool {
        self.sessions
            .get(session_id)
            .is_some_and(|entry| Arc::ptr_eq(entry.value(), session))
    }

    pub fn get(&self, session_id: &str) -> Option<SharedSession> {
        self.sessions
            .get(session_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Delete a session
    pub fn delete(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Get active session count
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    fn evict_oldest(&self) {
        // Sessions whose lock is held are serving a request and are never evicted
        let oldest = self
            .sessions
            .iter()
            .filter_map(|entry| {
                let state = entry.value().try_lock().ok()?;
                Some((entry.key().clone(), state.last_activity))
            })
            .min_by_key(|(_, last_activity)| *last_activity)
            .map(|(id, _)| id);

        if let Some(id) = oldest {
            self.sessions.remove(&id);
            tracing::info!(session_id = %id, "Evicted least recently used session");
        }
    }

    /// Remove expired sessions; returns how many were dropped
    pub fn cleanup_expired(&self) -> usize {
        cleanup_expired(&self.sessions, self.timeout_minutes)
    }

    /// Start background cleanup task (checks every minute)
    pub fn start_cleanup_task(&self) -> JoinHandle<()> {
        let sessions = Arc::clone(&self.sessions);
        let timeout_minutes = self.timeout_minutes;

        tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(60));

            loop {
                interval.tick().await;
                cleanup_expired(&sessions, timeout_minutes);
            }
        })
    }
}

fn cleanup_expired(sessions: &DashMap<String, SharedSession>, timeout_minutes: u64) -> usize {
    let expired_sessions: Vec<String> = sessions
        .iter()
        .filter(|entry| {
            entry
                .value()
                .try_lock()
                .map(|state| state.is_expired(timeout_minutes))
                .unwrap_or(false)
        })
        .map(|entry| entry.key().clone())
        .collect();

    let mut removed_count = 0;
    for session_id in expired_sessions {
        if sessions.remove(&session_id).is_some() {
            removed_count += 1;
            tracing::debug!(session_id = %session_id, "Removed expired session");
        }
    }

    if removed_count > 0 {
        tracing::info!(
            removed = removed_count,
            active = sessions.len(),
            "Cleaned up expired sessions"
        );
    }

    removed_count
}

/// 1-128 characters from `[A-Za-z0-9_-]`
pub fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
