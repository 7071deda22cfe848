//! In-memory session store
//!
//! Reference implementation of the session store contract: a map guarded
//! by per-key locks plus a scheduled sweeper for TTL eviction. A production
//! deployment would target a wide-column store with a single-row
//! conditional write and row-level TTL behind the same contract.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use vg_core::domain::entities::session::RegistrationSession;
use vg_core::errors::StoreError;
use vg_core::repositories::session::{SessionMutator, SessionStore};

type SessionSlot = Arc<Mutex<RegistrationSession>>;

/// Session store backed by an in-process map
///
/// The outer map lock is held only long enough to resolve the per-session
/// slot; all reads and conditional writes happen under that session's own
/// lock, so operations on different sessions never contend.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<Uuid, SessionSlot>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Remove every expired session, returning how many were evicted
    pub async fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();

        let mut live = HashMap::with_capacity(before);
        for (id, slot) in sessions.drain() {
            let expired = slot.lock().await.is_expired(now);
            if !expired {
                live.insert(id, slot);
            }
        }

        *sessions = live;
        before - sessions.len()
    }

    /// Spawn the periodic TTL sweeper
    ///
    /// The task holds only a weak reference and exits once the store is
    /// dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let store = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let Some(store) = store.upgrade() else {
                    break;
                };

                let evicted = store.sweep_expired().await;
                if evicted > 0 {
                    debug!(evicted, "Swept expired sessions");
                }
            }
        })
    }

    async fn slot(&self, session_id: &Uuid) -> Option<SessionSlot> {
        self.sessions.lock().await.get(session_id).cloned()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: RegistrationSession, _ttl: Duration) -> Result<RegistrationSession, StoreError> {
        let mut session = session;
        session.id = Uuid::new_v4();

        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(&session.id) {
            // A 128-bit collision means the id source is broken
            warn!("Random session id collided with a live session");
            return Err(StoreError::Unavailable("session id collision".to_string()));
        }

        sessions.insert(session.id, Arc::new(Mutex::new(session.clone())));
        Ok(session)
    }

    async fn get(&self, session_id: &Uuid) -> Result<RegistrationSession, StoreError> {
        let slot = self.slot(session_id).await.ok_or(StoreError::NotFound)?;
        let session = slot.lock().await;

        if session.is_expired(Utc::now()) {
            return Err(StoreError::NotFound);
        }

        Ok(session.clone())
    }

    async fn update(&self, session_id: &Uuid, mutator: SessionMutator<'_>) -> Result<RegistrationSession, StoreError> {
        let slot = self.slot(session_id).await.ok_or(StoreError::NotFound)?;
        let mut session = slot.lock().await;

        if session.is_expired(Utc::now()) {
            return Err(StoreError::NotFound);
        }

        let previous_version = session.version;
        let mut updated = mutator(session.clone());

        // The slot lock serializes writers, so a version moving between the
        // read and this write can only mean the mutator touched it
        if updated.version != previous_version {
            return Err(StoreError::Conflict);
        }

        updated.version = previous_version + 1;
        updated.id = *session_id;
        *session = updated.clone();

        Ok(updated)
    }
}
