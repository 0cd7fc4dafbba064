//! Local player identity.

use serde::{Deserialize, Serialize};

use crate::store::{QueueStore, StoreError};

/// Avatar id used before any account is bound.
const DEFAULT_AVATAR_ID: &str = "0";

/// The local player, immutable for the lifetime of a session.
///
/// Like roster occupants, identity is keyed by display name only. That is
/// a known weak point of the wire protocol (two players sharing a name
/// collide) and is carried forward as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Display name (identity key).
    pub name: String,

    /// Raw avatar id sent alongside the name.
    pub avatar_id: String,
}

impl Identity {
    /// Create an identity from its parts.
    pub fn new(name: impl Into<String>, avatar_id: impl Into<String>) -> Self {
        Self { name: name.into(), avatar_id: avatar_id.into() }
    }

    /// Wire form used in `people=` query parameters: `name(avatarId)`.
    pub fn encode_entry(&self) -> String {
        format!("{}({})", self.name, self.avatar_id)
    }

    /// Load the identity from persisted state.
    ///
    /// Prefers the cached username, borrowing the bound account's icon when
    /// one exists. Falls back to the bound game account, and returns `None`
    /// when neither is available so the caller can prompt for a name.
    pub fn load<S: QueueStore>(store: &S) -> Result<Option<Self>, StoreError> {
        if let Some(name) = store.username()? {
            let avatar_id = store
                .binding()?
                .filter(|profile| profile.bound)
                .map_or_else(|| DEFAULT_AVATAR_ID.to_string(), |profile| profile.avatar_id);
            return Ok(Some(Self { name, avatar_id }));
        }

        match store.binding()? {
            Some(profile) if profile.bound => {
                Ok(Some(Self { name: profile.name, avatar_id: profile.avatar_id }))
            },
            _ => Ok(None),
        }
    }
}

/// Persisted game-account binding record.
///
/// Owned by the settings screen; the queue core only reads it as an
/// identity fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingProfile {
    /// Whether a game account is currently bound.
    pub bound: bool,

    /// Bound account display name.
    pub name: String,

    /// Bound account avatar/icon id.
    pub avatar_id: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn cached_username_wins() {
        let store = MemoryStore::new();
        store.set_username("Alice").unwrap();

        let identity = Identity::load(&store).unwrap().unwrap();
        assert_eq!(identity.name, "Alice");
        assert_eq!(identity.avatar_id, "0");
    }

    #[test]
    fn cached_username_borrows_bound_icon() {
        let store = MemoryStore::new();
        store.set_username("Alice").unwrap();
        store
            .set_binding(&BindingProfile {
                bound: true,
                name: "MAI-ALICE".to_string(),
                avatar_id: "7".to_string(),
            })
            .unwrap();

        let identity = Identity::load(&store).unwrap().unwrap();
        assert_eq!(identity.name, "Alice");
        assert_eq!(identity.avatar_id, "7");
    }

    #[test]
    fn falls_back_to_bound_account() {
        let store = MemoryStore::new();
        store
            .set_binding(&BindingProfile {
                bound: true,
                name: "MAI-BOB".to_string(),
                avatar_id: "3".to_string(),
            })
            .unwrap();

        let identity = Identity::load(&store).unwrap().unwrap();
        assert_eq!(identity.name, "MAI-BOB");
        assert_eq!(identity.avatar_id, "3");
    }

    #[test]
    fn unbound_profile_is_not_an_identity() {
        let store = MemoryStore::new();
        store
            .set_binding(&BindingProfile {
                bound: false,
                name: "MAI-BOB".to_string(),
                avatar_id: "3".to_string(),
            })
            .unwrap();

        assert!(Identity::load(&store).unwrap().is_none());
    }

    #[test]
    fn empty_store_yields_none() {
        let store = MemoryStore::new();
        assert!(Identity::load(&store).unwrap().is_none());
    }

    #[test]
    fn encode_entry_matches_wire_form() {
        assert_eq!(Identity::new("Alice", "7").encode_entry(), "Alice(7)");
    }
}
