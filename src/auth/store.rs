//! Server-side session storage.
//!
//! The store exclusively owns the token → identity mapping. Every operation
//! takes the lock for its own duration only; callers never hold it across I/O.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;
use uuid::Uuid;

use super::error::AuthError;

/// A live session as stored server-side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRecord {
    pub identity: String,
    pub created_at_unix: i64,
}

pub trait SessionStore: Send + Sync {
    /// Bind a fresh token to `identity`.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidIdentity` when `identity` is empty.
    fn create(&self, identity: &str) -> Result<String, AuthError>;

    /// Full record for `token`, if live.
    fn record(&self, token: &str) -> Option<SessionRecord>;

    /// Identity bound to `token`.
    ///
    /// # Errors
    /// Returns `AuthError::NotFound` for empty or unknown tokens.
    fn resolve(&self, token: &str) -> Result<String, AuthError> {
        if token.is_empty() {
            return Err(AuthError::NotFound);
        }
        self.record(token)
            .map(|record| record.identity)
            .ok_or(AuthError::NotFound)
    }

    /// Remove `token`; returns whether it was live.
    fn revoke(&self, token: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Random `UUIDv4` rendered as a hyphenated lowercase string.
#[must_use]
pub fn generate_session_token() -> String {
    Uuid::new_v4().to_string()
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self, identity: &str) -> Result<String, AuthError> {
        if identity.trim().is_empty() {
            return Err(AuthError::InvalidIdentity);
        }

        let record = SessionRecord {
            identity: identity.to_string(),
            created_at_unix: now_unix(),
        };

        let mut sessions = self.sessions.write();
        // Collisions are negligible for v4 UUIDs, but the map must stay unique.
        let mut token = generate_session_token();
        while sessions.contains_key(&token) {
            token = generate_session_token();
        }
        sessions.insert(token.clone(), record);
        drop(sessions);

        debug!("session created");
        Ok(token)
    }

    fn record(&self, token: &str) -> Option<SessionRecord> {
        if token.is_empty() {
            return None;
        }
        self.sessions.read().get(token).cloned()
    }

    fn revoke(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        let removed = self.sessions.write().remove(token).is_some();
        if removed {
            debug!("session revoked");
        }
        removed
    }

    fn len(&self) -> usize {
        self.sessions.read().len()
    }
}
