//! In-Memory Session Store Adapter
//!
//! Holds active engagement sessions in process memory. The map is guarded by
//! a read-write lock held only for lookups and inserts; each session has its
//! own mutex, held for the whole turn through a `SessionLease`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::engagement::SessionData;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::{SessionLease, SessionSlot, SessionStore, SessionStoreError};

type Slot = Arc<Mutex<SessionSlot>>;

#[derive(Debug, Default)]
struct Registry {
    sessions: HashMap<SessionId, Slot>,
    closed: bool,
}

/// In-memory registry of active sessions.
///
/// Empty on construction. Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    registry: Arc<RwLock<Registry>>,
}

impl InMemorySessionStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active sessions
    pub async fn count(&self) -> usize {
        self.registry.read().await.sessions.len()
    }

    /// Returns true if the session is active
    pub async fn contains(&self, id: &SessionId) -> bool {
        self.registry.read().await.sessions.contains_key(id)
    }

    async fn slot_for(&self, id: &SessionId) -> Result<(Slot, bool), SessionStoreError> {
        {
            let registry = self.registry.read().await;
            if registry.closed {
                return Err(SessionStoreError::Closed);
            }
            if let Some(slot) = registry.sessions.get(id) {
                return Ok((slot.clone(), false));
            }
        }

        let mut registry = self.registry.write().await;
        if registry.closed {
            return Err(SessionStoreError::Closed);
        }
        let mut created = false;
        let slot = registry
            .sessions
            .entry(id.clone())
            .or_insert_with(|| {
                created = true;
                Arc::new(Mutex::new(SessionSlot::new(SessionData::new(
                    id.clone(),
                    Timestamp::now(),
                ))))
            })
            .clone();
        Ok((slot, created))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn checkout(&self, id: &SessionId) -> Result<SessionLease, SessionStoreError> {
        loop {
            let (slot, created) = self.slot_for(id).await?;
            let guard = slot.lock_owned().await;
            // Retired while we waited: drop the stale entry, then look up again.
            if guard.is_retired() {
                tracing::debug!(session_id = %id, "session retired while waiting, retrying");
                let mut registry = self.registry.write().await;
                if registry
                    .sessions
                    .get(id)
                    .is_some_and(|current| Arc::ptr_eq(current, OwnedMutexGuard::mutex(&guard)))
                {
                    registry.sessions.remove(id);
                }
                continue;
            }
            return Ok(SessionLease::new(guard, created));
        }
    }

    async fn commit(&self, mut lease: SessionLease) -> Result<(), SessionStoreError> {
        if lease.is_retired() {
            return Err(SessionStoreError::Retired(lease.session_id().clone()));
        }
        lease.touch(Timestamp::now());
        Ok(())
    }

    async fn retire(&self, mut lease: SessionLease) -> Result<SessionData, SessionStoreError> {
        if lease.is_retired() {
            return Err(SessionStoreError::Retired(lease.session_id().clone()));
        }
        // Mark and remove under one registry lock, with no await in between.
        let mut registry = self.registry.write().await;
        lease.touch(Timestamp::now());
        let snapshot = lease.retire();
        let same_slot = registry
            .sessions
            .get(snapshot.session_id())
            .is_some_and(|slot| Arc::ptr_eq(slot, lease.slot()));
        if same_slot {
            registry.sessions.remove(snapshot.session_id());
        }
        Ok(snapshot)
    }

    async fn active_sessions(&self) -> Vec<SessionId> {
        self.registry.read().await.sessions.keys().cloned().collect()
    }

    async fn drain(&self) -> usize {
        let mut registry = self.registry.write().await;
        registry.closed = true;
        let drained = registry.sessions.len();
        registry.sessions.clear();
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sid(value: &str) -> SessionId {
        SessionId::new(value).unwrap()
    }

    #[tokio::test]
    async fn new_store_is_empty() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.count().await, 0);
        assert!(store.active_sessions().await.is_empty());
    }

    #[tokio::test]
    async fn checkout_creates_then_reuses() {
        let store = InMemorySessionStore::new();

        let mut lease = store.checkout(&sid("a")).await.unwrap();
        assert!(lease.was_created());
        lease.record_message("hello");
        store.commit(lease).await.unwrap();

        let lease = store.checkout(&sid("a")).await.unwrap();
        assert!(!lease.was_created());
        assert_eq!(lease.turn_count(), 1);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn retire_removes_and_returns_final_state() {
        let store = InMemorySessionStore::new();
        let mut lease = store.checkout(&sid("a")).await.unwrap();
        lease.record_message("bye");

        let snapshot = store.retire(lease).await.unwrap();
        assert_eq!(snapshot.turn_count(), 1);
        assert!(!store.contains(&sid("a")).await);

        let fresh = store.checkout(&sid("a")).await.unwrap();
        assert!(fresh.was_created());
        assert_eq!(fresh.turn_count(), 0);
    }

    #[tokio::test]
    async fn concurrent_turns_on_one_session_serialize() {
        let store = InMemorySessionStore::new();
        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let mut lease = store.checkout(&sid("shared")).await.unwrap();
                let before = lease.turn_count();
                tokio::task::yield_now().await;
                lease.record_message(format!("msg {}", i));
                assert_eq!(lease.turn_count(), before + 1);
                store.commit(lease).await.unwrap();
            }));
        }
        for joined in futures::future::join_all(handles).await {
            joined.unwrap();
        }

        let lease = store.checkout(&sid("shared")).await.unwrap();
        assert_eq!(lease.turn_count(), 20);
    }

    #[tokio::test]
    async fn different_sessions_do_not_block() {
        let store = InMemorySessionStore::new();
        let held = store.checkout(&sid("a")).await.unwrap();

        let other = tokio::time::timeout(Duration::from_secs(1), store.checkout(&sid("b"))).await;
        assert!(other.is_ok());
        drop(held);
    }

    #[tokio::test]
    async fn waiter_on_retired_session_gets_a_fresh_one() {
        let store = InMemorySessionStore::new();
        let mut lease = store.checkout(&sid("a")).await.unwrap();
        lease.record_message("first");

        let waiter = {
            let store = store.clone();
            tokio::spawn(async move { store.checkout(&sid("a")).await.unwrap().turn_count() })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        store.retire(lease).await.unwrap();
        assert_eq!(waiter.await.unwrap(), 0);
    }

    #[tokio::test]
    async fn cancelled_retire_leaves_the_session_usable() {
        let store = InMemorySessionStore::new();
        let mut lease = store.checkout(&sid("a")).await.unwrap();
        lease.record_message("last");

        let reader = store.registry.clone().read_owned().await;
        let retired =
            tokio::time::timeout(Duration::from_millis(50), store.retire(lease)).await;
        assert!(retired.is_err());
        drop(reader);

        let lease = tokio::time::timeout(Duration::from_secs(2), store.checkout(&sid("a")))
            .await
            .expect("checkout after a cancelled retire must not hang")
            .unwrap();
        assert!(!lease.was_created());
        assert_eq!(lease.turn_count(), 1);

        store.retire(lease).await.unwrap();
        assert!(!store.contains(&sid("a")).await);
    }

    #[tokio::test]
    async fn checkout_discards_a_retired_slot_left_in_the_map() {
        let store = InMemorySessionStore::new();
        let mut lease = store.checkout(&sid("a")).await.unwrap();
        lease.record_message("stale");
        lease.retire();
        drop(lease);
        assert!(store.contains(&sid("a")).await);

        let fresh = tokio::time::timeout(Duration::from_secs(2), store.checkout(&sid("a")))
            .await
            .expect("checkout must replace a retired slot")
            .unwrap();
        assert!(fresh.was_created());
        assert_eq!(fresh.turn_count(), 0);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn drain_empties_and_closes() {
        let store = InMemorySessionStore::new();
        store.commit(store.checkout(&sid("a")).await.unwrap()).await.unwrap();
        store.commit(store.checkout(&sid("b")).await.unwrap()).await.unwrap();

        assert_eq!(store.drain().await, 2);
        assert_eq!(store.count().await, 0);
        assert_eq!(
            store.checkout(&sid("c")).await.unwrap_err(),
            SessionStoreError::Closed
        );
    }

    #[tokio::test]
    async fn active_sessions_lists_ids() {
        let store = InMemorySessionStore::new();
        for id in ["x", "y"] {
            store.commit(store.checkout(&sid(id)).await.unwrap()).await.unwrap();
        }
        let mut ids = store.active_sessions().await;
        ids.sort();
        assert_eq!(ids, vec![sid("x"), sid("y")]);
    }
}
