//! Session error taxonomy.
//!
//! Guard failures (`AlreadyMember`, `AlreadyQueued`) are informational to
//! the user, not fault conditions; callers render them as notices. Nothing
//! here is fatal to the process.

use paika_core::{QueueId, QueueIdError, StoreError};
use thiserror::Error;

/// Errors surfaced by the session state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Queue id was malformed or empty.
    #[error("invalid queue id: {0}")]
    InvalidQueueId(#[from] QueueIdError),

    /// The player already appears in the roster (idempotency guard).
    #[error("{name} is already in the queue")]
    AlreadyMember {
        /// Display name that collided.
        name: String,
    },

    /// A persisted join for this queue already exists (idempotency guard
    /// against duplicate joins across restarts).
    #[error("already queued in {queue_id}")]
    AlreadyQueued {
        /// Queue the player is recorded as having joined.
        queue_id: QueueId,
    },

    /// The operation needs an active queue but none is being polled.
    #[error("no active queue")]
    NoActiveQueue,

    /// Persistence backend failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
