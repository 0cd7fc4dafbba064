//! Core domain types for the Paika queue client.
//!
//! A queue ("party") is a named waiting line for a shared arcade cabinet.
//! The remote service represents it as a single comma-separated string of
//! `name(avatarId)` entries; position in the sequence is meaningful, and
//! occupants are identified (weakly) by display name alone.
//!
//! # Components
//!
//! - [`QueueId`]: validated opaque queue identifier
//! - [`Occupant`] and the roster wire codec in [`roster`]
//! - [`Identity`]: the local player, loaded from persisted state
//! - [`QueueStore`]: injected key-value persistence for resume state

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod identity;
pub mod link;
pub mod queue;
pub mod roster;
pub mod store;

pub use identity::{BindingProfile, Identity};
pub use link::{LinkError, extract_queue_id};
pub use queue::{QueueId, QueueIdError};
pub use roster::{Occupant, encode_roster, parse_roster};
pub use store::{MemoryStore, QueueStatus, QueueStore, StoreError};
