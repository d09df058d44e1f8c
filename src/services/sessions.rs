use crate::core::{MatchController, ProfileCatalog, QuotaPolicy, TriggerPolicy};
use crate::models::Tier;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur with session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(Uuid),

    #[error("Session limit reached: {0} live sessions")]
    CapacityExceeded(u64),
}

/// A session's controller, locked for the duration of each operation
pub type SharedController = Arc<tokio::sync::Mutex<MatchController>>;

/// In-memory store of browsing sessions
///
/// Sessions are bounded in number and dropped after sitting idle; nothing is
/// persisted. Each controller is behind its own mutex so requests of one
/// session are applied one at a time while sessions proceed independently.
///
/// The cache itself has no size bound: a live session only ends by deletion
/// or idle expiry. `max_sessions` is enforced at creation instead.
#[derive(Clone)]
pub struct SessionStore {
    sessions: moka::future::Cache<Uuid, SharedController>,
    max_sessions: u64,
    admission: Arc<tokio::sync::Mutex<()>>,
    catalog: Arc<ProfileCatalog>,
    quota: QuotaPolicy,
    trigger: TriggerPolicy,
}

impl SessionStore {
    /// Create a new session store
    pub fn new(
        catalog: Arc<ProfileCatalog>,
        quota: QuotaPolicy,
        trigger: TriggerPolicy,
        max_sessions: u64,
        idle_timeout_secs: u64,
    ) -> Self {
        let sessions = moka::future::Cache::builder()
            .time_to_idle(Duration::from_secs(idle_timeout_secs))
            .build();

        Self {
            sessions,
            max_sessions,
            admission: Arc::new(tokio::sync::Mutex::new(())),
            catalog,
            quota,
            trigger,
        }
    }

    /// Open a session with a fresh controller
    ///
    /// Fails with [`SessionError::CapacityExceeded`] when `max_sessions` are
    /// live; existing sessions are never displaced to make room.
    pub async fn create(&self, tier: Tier) -> Result<(Uuid, SharedController), SessionError> {
        // Count and insert under one lock so concurrent creates cannot overshoot
        let _admission = self.admission.lock().await;

        // Flush expirations so entry_count is exact
        self.sessions.run_pending_tasks().await;
        let live = self.sessions.entry_count();
        if live >= self.max_sessions {
            tracing::warn!("Refusing new session: {} of {} live", live, self.max_sessions);
            return Err(SessionError::CapacityExceeded(live));
        }

        let id = Uuid::new_v4();
        let controller = MatchController::new(self.catalog.clone(), tier, &self.quota, self.trigger);
        let shared = Arc::new(tokio::sync::Mutex::new(controller));

        self.sessions.insert(id, shared.clone()).await;

        tracing::debug!("Session created: {} ({:?})", id, tier);
        Ok((id, shared))
    }

    /// Look up a live session
    pub async fn get(&self, id: Uuid) -> Result<SharedController, SessionError> {
        self.sessions.get(&id).await.ok_or(SessionError::NotFound(id))
    }

    /// End a session, discarding its matches and quota
    pub async fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        self.sessions
            .remove(&id)
            .await
            .map(|_| ())
            .ok_or(SessionError::NotFound(id))?;

        tracing::debug!("Session removed: {}", id);
        Ok(())
    }

    pub fn catalog(&self) -> &Arc<ProfileCatalog> {
        &self.catalog
    }

    pub fn quota_policy(&self) -> QuotaPolicy {
        self.quota
    }

    /// Get session statistics
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            live_sessions: self.sessions.entry_count(),
        }
    }
}

/// Session statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub live_sessions: u64,
}
