//! Session Registry - live conversations held in process memory.
//!
//! Each session sits behind its own async mutex, so two requests never
//! interleave on one [`SessionState`]. The cancellation token lives outside
//! the mutex so a run can be cancelled while it holds the lock.
//!
//! Sessions leave the registry when their run ends (completed, aborted or
//! cancelled) or after sitting idle longer than the configured timeout.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::domain::foundation::SessionId;
use crate::domain::workflow::SessionState;

/// A registered session and the token that cancels its runs.
pub struct SessionHandle {
    id: SessionId,
    state: Mutex<SessionState>,
    cancel: CancellationToken,
    last_active: StdMutex<Instant>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> &Mutex<SessionState> {
        &self.state
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Marks the session as used just now.
    pub fn touch(&self) {
        *self.last_active.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new session and returns its handle.
    pub async fn insert(&self, state: SessionState) -> Arc<SessionHandle> {
        let handle = Arc::new(SessionHandle {
            id: state.id(),
            state: Mutex::new(state),
            cancel: CancellationToken::new(),
            last_active: StdMutex::new(Instant::now()),
        });
        self.sessions.write().await.insert(handle.id, handle.clone());
        handle
    }

    /// Looks up a session and marks it active.
    pub async fn get(&self, id: &SessionId) -> Option<Arc<SessionHandle>> {
        let handle = self.sessions.read().await.get(id).cloned()?;
        handle.touch();
        Some(handle)
    }

    /// Drops a session. A run still holding its handle finishes normally.
    pub async fn remove(&self, id: &SessionId) -> Option<Arc<SessionHandle>> {
        let removed = self.sessions.write().await.remove(id);
        if removed.is_some() {
            tracing::debug!(session_id = %id, "Session discarded");
        }
        removed
    }

    /// Cancels any in-flight run of a session and drops it from the registry.
    ///
    /// Returns false when the session is unknown.
    pub async fn cancel(&self, id: &SessionId) -> bool {
        match self.remove(id).await {
            Some(handle) => {
                handle.cancel.cancel();
                tracing::info!(session_id = %id, "Session cancelled");
                true
            }
            None => false,
        }
    }

    /// Drops sessions idle for at least `max_idle`. Sessions with a run in
    /// progress are kept.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| handle.idle_for() < max_idle || handle.state.try_lock().is_err());
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Periodically evicts idle sessions until `shutdown` fires.
pub async fn sweep_idle_sessions(
    registry: Arc<SessionRegistry>,
    max_idle: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(max_idle.min(Duration::from_secs(60)));
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                registry.evict_idle(max_idle).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::CustomerId;

    fn state() -> SessionState {
        SessionState::new(CustomerId::new("cust-1").unwrap())
    }

    #[tokio::test]
    async fn inserted_sessions_can_be_found() {
        let registry = SessionRegistry::new();
        let handle = registry.insert(state()).await;

        let found = registry.get(&handle.id()).await.expect("registered");
        assert_eq!(found.state().lock().await.id(), handle.id());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let registry = SessionRegistry::new();
        assert!(registry.get(&SessionId::new()).await.is_none());
        assert!(!registry.cancel(&SessionId::new()).await);
    }

    #[tokio::test]
    async fn cancel_does_not_wait_for_the_state_lock() {
        let registry = SessionRegistry::new();
        let handle = registry.insert(state()).await;
        let _guard = handle.state().lock().await;

        assert!(registry.cancel(&handle.id()).await);
        assert!(handle.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_sessions_are_discarded() {
        let registry = SessionRegistry::new();
        let handle = registry.insert(state()).await;

        registry.cancel(&handle.id()).await;

        assert!(registry.get(&handle.id()).await.is_none());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn removed_sessions_are_gone() {
        let registry = SessionRegistry::new();
        let handle = registry.insert(state()).await;

        assert!(registry.remove(&handle.id()).await.is_some());
        assert!(registry.remove(&handle.id()).await.is_none());
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_are_evicted() {
        let registry = SessionRegistry::new();
        let stale = registry.insert(state()).await;
        tokio::time::advance(Duration::from_secs(120)).await;
        let fresh = registry.insert(state()).await;

        assert_eq!(registry.evict_idle(Duration::from_secs(60)).await, 1);
        assert!(registry.get(&stale.id()).await.is_none());
        assert!(registry.get(&fresh.id()).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn sessions_mid_run_are_not_evicted() {
        let registry = SessionRegistry::new();
        let handle = registry.insert(state()).await;
        let _running = handle.state().lock().await;
        tokio::time::advance(Duration::from_secs(120)).await;

        assert_eq!(registry.evict_idle(Duration::from_secs(60)).await, 0);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn lookups_keep_a_session_alive() {
        let registry = SessionRegistry::new();
        let handle = registry.insert(state()).await;
        tokio::time::advance(Duration::from_secs(50)).await;
        registry.get(&handle.id()).await;
        tokio::time::advance(Duration::from_secs(50)).await;

        assert_eq!(registry.evict_idle(Duration::from_secs(60)).await, 0);
    }
}
