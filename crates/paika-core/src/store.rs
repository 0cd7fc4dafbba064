//! Durable key-value persistence for the queue core.
//!
//! The session reads and writes persisted flags only through this
//! interface, never through ambient global state. The trait is synchronous
//! (no async) so the state machine stays free of I/O.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{identity::BindingProfile, queue::QueueId};

/// Errors from a store backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backend read/write failure.
    #[error("storage I/O error: {0}")]
    Io(String),

    /// Stored data could not be decoded.
    #[error("storage decode error: {0}")]
    Decode(String),
}

/// Persisted queue membership, keyed per player name.
///
/// Maps onto the `hasJoinedQueue_{name}` / `lastJoinedParty_{name}` key
/// pair of the original storage layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    /// Whether the player is currently joined.
    pub joined: bool,

    /// Queue the player last joined.
    pub queue_id: QueueId,
}

/// Durable key-value storage for the queue core.
///
/// This trait must be:
/// - `Clone`: shareable between the session and other screens
/// - `Send + Sync`: safe across the driver task boundary
/// - Synchronous: no async methods
///
/// # Clone Semantics
///
/// Implementations typically share internal state via `Arc`, so clones
/// access the same underlying storage.
pub trait QueueStore: Clone + Send + Sync + 'static {
    /// Persisted queue status for a player. `None` if the player never
    /// joined a queue.
    fn queue_status(&self, player: &str) -> Result<Option<QueueStatus>, StoreError>;

    /// Persist the queue status for a player, overwriting any prior value.
    fn set_queue_status(&self, player: &str, status: &QueueStatus) -> Result<(), StoreError>;

    /// Cached username. `None` if the user never entered one.
    fn username(&self) -> Result<Option<String>, StoreError>;

    /// Cache the username.
    fn set_username(&self, name: &str) -> Result<(), StoreError>;

    /// Game-account binding record. `None` if no account was ever bound.
    fn binding(&self) -> Result<Option<BindingProfile>, StoreError>;

    /// Persist the binding record, overwriting any prior value.
    fn set_binding(&self, profile: &BindingProfile) -> Result<(), StoreError>;
}

/// In-memory store for tests and simulation.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    statuses: HashMap<String, QueueStatus>,
    username: Option<String>,
    binding: Option<BindingProfile>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryInner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Io("poisoned lock".to_string()))
    }
}

impl QueueStore for MemoryStore {
    fn queue_status(&self, player: &str) -> Result<Option<QueueStatus>, StoreError> {
        Ok(self.lock()?.statuses.get(player).cloned())
    }

    fn set_queue_status(&self, player: &str, status: &QueueStatus) -> Result<(), StoreError> {
        self.lock()?.statuses.insert(player.to_string(), status.clone());
        Ok(())
    }

    fn username(&self) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.username.clone())
    }

    fn set_username(&self, name: &str) -> Result<(), StoreError> {
        self.lock()?.username = Some(name.to_string());
        Ok(())
    }

    fn binding(&self) -> Result<Option<BindingProfile>, StoreError> {
        Ok(self.lock()?.binding.clone())
    }

    fn set_binding(&self, profile: &BindingProfile) -> Result<(), StoreError> {
        self.lock()?.binding = Some(profile.clone());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_per_player() {
        let store = MemoryStore::new();
        let status = QueueStatus {
            joined: true,
            queue_id: QueueId::parse("Q1").unwrap(),
        };

        store.set_queue_status("Alice", &status).unwrap();

        assert_eq!(store.queue_status("Alice").unwrap(), Some(status));
        assert_eq!(store.queue_status("Bob").unwrap(), None);
    }

    #[test]
    fn clones_share_state() {
        let store = MemoryStore::new();
        let clone = store.clone();

        store.set_username("Alice").unwrap();

        assert_eq!(clone.username().unwrap().as_deref(), Some("Alice"));
    }

    #[test]
    fn set_overwrites_prior_status() {
        let store = MemoryStore::new();
        let q1 = QueueId::parse("Q1").unwrap();

        store
            .set_queue_status("Alice", &QueueStatus { joined: true, queue_id: q1.clone() })
            .unwrap();
        store
            .set_queue_status("Alice", &QueueStatus { joined: false, queue_id: q1.clone() })
            .unwrap();

        let status = store.queue_status("Alice").unwrap().unwrap();
        assert!(!status.joined);
        assert_eq!(status.queue_id, q1);
    }
}
