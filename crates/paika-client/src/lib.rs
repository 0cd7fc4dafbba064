//! Queue session client.
//!
//! Sans-IO state machine for joining, watching, and advancing through an
//! arcade cabinet queue. The session receives events ([`SessionEvent`]),
//! processes them through pure state machine logic, and returns actions
//! ([`SessionAction`]) for the caller to execute.
//!
//! # Architecture
//!
//! - [`QueueSession`]: the state machine; owns the roster, the polling
//!   flag, and the auto-play trigger latch, and persists resume state
//!   through an injected [`QueueStore`]
//! - [`SessionEvent`]: events fed into the session
//! - [`SessionAction`]: actions produced by the session
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::RemoteQueue`]: blocking HTTP bindings to the queue service
//! - [`transport::SessionDriver`]: tokio task owning the 2-second poll loop

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod event;
mod session;

#[cfg(feature = "transport")]
pub mod transport;

pub use error::SessionError;
pub use event::{CallKind, CallOutcome, Notice, QueueCall, SessionAction, SessionEvent};
pub use paika_core::{Identity, MemoryStore, Occupant, QueueId, QueueStatus, QueueStore};
pub use session::{POLL_INTERVAL, PlaySlot, QueueSession};
