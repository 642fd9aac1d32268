//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! - **Prover** — circuit asset table and external tool settings
//! - **Chat client** — HTTP pool and model settings for the relay
//! - **Sessions** — one [`ChatSession`] per conversation, keyed by id
//!
//! Each session sits behind its own async mutex: turns within a session
//! are serialized, and separate sessions never see each other's history.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use hzk_chat::{ChatClient, ChatSession};
use hzk_prover::Prover;
use parking_lot::RwLock;
use uuid::Uuid;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 5000;
/// Default idle lifetime of a chat session.
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;
/// Default cap on live chat sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// Server settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub sessions: SessionLimits,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            sessions: SessionLimits::default(),
        }
    }
}

impl AppConfig {
    /// Load from environment variables.
    ///
    /// - `PORT` (default: 5000)
    /// - `SESSION_IDLE_SECS` (default: 1800)
    /// - `MAX_SESSIONS` (default: 1024)
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT").unwrap_or(DEFAULT_PORT),
            sessions: SessionLimits {
                idle_ttl: Duration::from_secs(
                    env_parse("SESSION_IDLE_SECS").unwrap_or(DEFAULT_SESSION_IDLE_SECS),
                ),
                max_sessions: env_parse("MAX_SESSIONS")
                    .filter(|&n: &usize| n > 0)
                    .unwrap_or(DEFAULT_MAX_SESSIONS),
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(var: &str) -> Option<T> {
    std::env::var(var).ok().and_then(|v| v.parse().ok())
}

/// Retention bounds for [`SessionStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Sessions unused for this long are dropped.
    pub idle_ttl: Duration,
    /// Live sessions beyond this count evict the least recently used.
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            idle_ttl: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

/// Handle to one conversation.
pub type SessionHandle = Arc<tokio::sync::Mutex<ChatSession>>;

#[derive(Debug)]
struct SessionEntry {
    handle: SessionHandle,
    last_used: Instant,
}

/// Thread-safe, cloneable registry of live chat sessions.
///
/// The map lock is `parking_lot` and is never held across `.await`;
/// callers clone the handle out and lock the session itself. Expired
/// sessions are swept on every `create`, and the store never holds more
/// than `max_sessions` entries.
#[derive(Debug, Clone)]
pub struct SessionStore {
    limits: SessionLimits,
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionLimits::default())
    }
}

impl SessionStore {
    pub fn new(limits: SessionLimits) -> Self {
        Self {
            limits,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn limits(&self) -> SessionLimits {
        self.limits
    }

    /// Open a new session on `client`.
    pub fn create(&self, client: &ChatClient) -> (Uuid, SessionHandle) {
        let id = Uuid::new_v4();
        let handle = Arc::new(tokio::sync::Mutex::new(client.start_chat()));
        let now = Instant::now();

        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_used) < self.limits.idle_ttl);
        let max = self.limits.max_sessions.max(1);
        while sessions.len() >= max {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    sessions.remove(&oldest);
                }
                None => break,
            }
        }
        let dropped = before - sessions.len();
        if dropped > 0 {
            tracing::debug!(dropped, live = sessions.len(), "evicted chat sessions");
        }

        sessions.insert(
            id,
            SessionEntry {
                handle: Arc::clone(&handle),
                last_used: now,
            },
        );
        (id, handle)
    }

    /// Look up a live session and mark it used. An expired session is
    /// removed and reported as absent.
    pub fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        let now = Instant::now();
        let mut sessions = self.sessions.write();
        match sessions.get_mut(id) {
            None => return None,
            Some(entry) if now.duration_since(entry.last_used) < self.limits.idle_ttl => {
                entry.last_used = now;
                return Some(Arc::clone(&entry.handle));
            }
            Some(_) => {}
        }
        sessions.remove(id);
        None
    }

    /// End a session. Returns whether it existed.
    pub fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub prover: Arc<Prover>,
    pub chat: ChatClient,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: AppConfig, prover: Prover, chat: ChatClient) -> Self {
        Self {
            sessions: SessionStore::new(config.sessions),
            config,
            prover: Arc::new(prover),
            chat,
        }
    }
}
