//! Session store port.
//!
//! Defines the contract for the registry of active engagement sessions.
//!
//! # Design
//!
//! - **Leased access**: every read-modify-write holds an exclusive per-session
//!   lease from `checkout` until `commit` or `retire`
//! - **Independent sessions**: leases on different ids never block each other
//! - **Active only**: retired sessions leave the store immediately

use async_trait::async_trait;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::engagement::SessionData;
use crate::domain::foundation::{SessionId, Timestamp};

/// Errors from session store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStoreError {
    /// The store has been drained and accepts no new work.
    #[error("session store is closed")]
    Closed,

    /// The lease refers to a session that was already retired.
    #[error("session {0} is no longer active")]
    Retired(SessionId),
}

/// Storage cell for one session.
///
/// A slot is marked retired before it is removed from the store, so a
/// request that was waiting on its lock can tell it must start over.
#[derive(Debug)]
pub struct SessionSlot {
    data: SessionData,
    retired: bool,
}

impl SessionSlot {
    pub fn new(data: SessionData) -> Self {
        Self {
            data,
            retired: false,
        }
    }

    pub fn is_retired(&self) -> bool {
        self.retired
    }

    pub fn mark_retired(&mut self) {
        self.retired = true;
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }
}

/// Exclusive access to one session for the duration of a turn.
///
/// Dereferences to the [`SessionData`]. Dropping the lease without calling
/// `commit` keeps any in-place changes but does not refresh `last_updated_at`.
#[derive(Debug)]
pub struct SessionLease {
    guard: OwnedMutexGuard<SessionSlot>,
    created: bool,
}

impl SessionLease {
    pub fn new(guard: OwnedMutexGuard<SessionSlot>, created: bool) -> Self {
        Self { guard, created }
    }

    /// Returns true if this checkout created the session.
    pub fn was_created(&self) -> bool {
        self.created
    }

    /// The slot mutex this lease locks, for identity checks.
    pub fn slot(&self) -> &Arc<Mutex<SessionSlot>> {
        OwnedMutexGuard::mutex(&self.guard)
    }

    pub fn is_retired(&self) -> bool {
        self.guard.is_retired()
    }

    /// Marks the slot retired and returns a snapshot of the session.
    pub fn retire(&mut self) -> SessionData {
        self.guard.mark_retired();
        self.guard.data.clone()
    }

    /// Stamps the session as updated.
    pub fn touch(&mut self, now: Timestamp) {
        self.guard.data.touch(now);
    }
}

impl Deref for SessionLease {
    type Target = SessionData;

    fn deref(&self) -> &Self::Target {
        &self.guard.data
    }
}

impl DerefMut for SessionLease {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard.data
    }
}

/// Port for the active-session registry.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Leases the session for `id`, creating it if unseen.
    ///
    /// Waits while another request holds the same session.
    ///
    /// # Errors
    ///
    /// - `Closed` once the store has been drained
    async fn checkout(&self, id: &SessionId) -> Result<SessionLease, SessionStoreError>;

    /// Persists the leased session and releases the lease.
    ///
    /// # Errors
    ///
    /// - `Retired` if the lease was already retired
    async fn commit(&self, lease: SessionLease) -> Result<(), SessionStoreError>;

    /// Removes the leased session from the store and returns its final state.
    ///
    /// # Errors
    ///
    /// - `Retired` if the lease was already retired
    async fn retire(&self, lease: SessionLease) -> Result<SessionData, SessionStoreError>;

    /// Ids of all active sessions.
    async fn active_sessions(&self) -> Vec<SessionId>;

    /// Drops every session and refuses further checkouts.
    ///
    /// Returns how many sessions were dropped.
    async fn drain(&self) -> usize;
}
