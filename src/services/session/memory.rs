//! In-memory session stores for tests.
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::services::cache::CacheError;
use crate::services::session::store::{SessionStore, SessionStoreError};

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, HashSet<String>>>,
    lookups: AtomicUsize,
}

impl MemorySessionStore {
    pub fn with_session(self, user_id: &str, token: &str) -> Self {
        self.insert(user_id, token);
        self
    }

    pub fn insert(&self, user_id: &str, token: &str) {
        self.sessions
            .lock()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .insert(token.to_string());
    }

    // Simulates a logout.
    pub fn remove(&self, user_id: &str, token: &str) {
        if let Some(tokens) = self.sessions.lock().unwrap().get_mut(user_id) {
            tokens.remove(token);
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn exists(&self, user_id: &str, token: &str) -> Result<bool, SessionStoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .get(user_id)
            .is_some_and(|tokens| tokens.contains(token)))
    }
}

/// Always fails, as an unreachable backend would.
#[derive(Debug, Default)]
pub struct FailingSessionStore;

#[async_trait]
impl SessionStore for FailingSessionStore {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn exists(&self, _user_id: &str, _token: &str) -> Result<bool, SessionStoreError> {
        Err(CacheError::BackendConnection("connection refused".into()).into())
    }
}

/// Answers `true`, but only after `delay`.
#[derive(Debug)]
pub struct SlowSessionStore {
    pub delay: Duration,
}

#[async_trait]
impl SessionStore for SlowSessionStore {
    fn backend_name(&self) -> &'static str {
        "slow"
    }

    async fn exists(&self, _user_id: &str, _token: &str) -> Result<bool, SessionStoreError> {
        tokio::time::sleep(self.delay).await;
        Ok(true)
    }
}
