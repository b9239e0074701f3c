//! Expiring in-process session store.
//!
//! Replaces an unbounded process-lifetime map: every entry carries a TTL,
//! refreshed on access, and a background sweeper evicts whatever expired
//! between accesses. Writes go through compare-and-swap on the question
//! index so two concurrent submissions for one session cannot both advance
//! it — the loser gets `StoreError::Conflict`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::session::Session;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session not found")]
    NotFound,

    #[error("session was modified concurrently")]
    Conflict,
}

struct StoredSession {
    session: Session,
    expires_at: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, StoredSession>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn insert(&self, session: Session) {
        let mut map = self.inner.write().await;
        map.insert(
            session.id,
            StoredSession {
                session,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Returns a snapshot of the session and refreshes its TTL. An expired
    /// entry is removed and reported as absent.
    pub async fn get(&self, id: Uuid) -> Option<Session> {
        let mut map = self.inner.write().await;
        let now = Instant::now();
        match map.get_mut(&id) {
            Some(stored) if stored.expires_at > now => {
                stored.expires_at = now + self.ttl;
                Some(stored.session.clone())
            }
            Some(_) => {
                map.remove(&id);
                None
            }
            None => None,
        }
    }

    /// Replaces the stored session with `next` only if the stored question
    /// index still equals `expected_index`. The session id is taken from
    /// `next`.
    pub async fn compare_and_swap(
        &self,
        expected_index: usize,
        next: Session,
    ) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        let now = Instant::now();
        let stored = map.get_mut(&next.id).ok_or(StoreError::NotFound)?;
        if stored.expires_at <= now {
            map.remove(&next.id);
            return Err(StoreError::NotFound);
        }
        if stored.session.current_index != expected_index {
            return Err(StoreError::Conflict);
        }
        stored.session = next;
        stored.expires_at = now + self.ttl;
        Ok(())
    }

    /// Removes expired entries; returns how many were evicted.
    pub async fn sweep(&self) -> usize {
        let mut map = self.inner.write().await;
        let now = Instant::now();
        let before = map.len();
        map.retain(|_, stored| stored.expires_at > now);
        let evicted = before - map.len();
        if evicted > 0 {
            debug!("Evicted {evicted} expired interview session(s)");
        }
        evicted
    }

    /// Spawns the periodic eviction task. Runs for the life of the process.
    pub fn spawn_sweeper(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        info!("Session sweeper running every {}s", interval.as_secs());
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately
            loop {
                ticker.tick().await;
                store.sweep().await;
            }
        })
    }
}
