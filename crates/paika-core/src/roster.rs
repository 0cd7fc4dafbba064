//! Occupant roster model and wire codec.
//!
//! The remote service encodes a whole queue as one comma-separated string,
//! each entry `name(avatarId)`. Malformed entries are dropped instead of
//! failing the parse: the roster is best-effort display data, not
//! transactional state, so partial data beats a hard failure.

use serde::{Deserialize, Serialize};

/// Prefix of the fully-qualified avatar image URL.
const AVATAR_URL_BASE: &str = "https://assets2.lxns.net/maimai/icon/";

/// Characters scrubbed from raw names and avatar ids.
///
/// The service occasionally wraps the payload in JSON-style brackets and
/// quotes; they are display noise and never part of an identity.
const SCRUBBED: [char; 3] = ['[', ']', '"'];

/// A single entry in the queue.
///
/// Position in the roster is semantically meaningful: indices 2 and 3
/// (zero-based) map to the cabinet's two active play seats. Identity is
/// keyed by display name only - two players sharing a name are
/// indistinguishable on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occupant {
    /// Display name (identity key).
    pub name: String,

    /// Raw avatar id as received. Never displayed directly; see
    /// [`Occupant::avatar_url`].
    pub avatar_id: String,
}

impl Occupant {
    /// Create an occupant from its parts.
    pub fn new(name: impl Into<String>, avatar_id: impl Into<String>) -> Self {
        Self { name: name.into(), avatar_id: avatar_id.into() }
    }

    /// Fully-qualified avatar image URL built from the fixed template.
    pub fn avatar_url(&self) -> String {
        format!("{AVATAR_URL_BASE}{}.png", self.avatar_id)
    }

    /// Wire form used in `people=` query parameters: `name(avatarId)`.
    pub fn encode_entry(&self) -> String {
        format!("{}({})", self.name, self.avatar_id)
    }
}

/// Parse a raw roster payload into ordered occupants.
///
/// Splits on `,`, then recovers `name` and `avatarId` from the first
/// `(`...`)` pair of each entry. Entries with a missing paren pair, more
/// than one `(`, or an empty name are dropped silently.
pub fn parse_roster(raw: &str) -> Vec<Occupant> {
    raw.split(',').filter_map(parse_entry).collect()
}

fn parse_entry(entry: &str) -> Option<Occupant> {
    let entry = entry.trim();
    if entry.matches('(').count() != 1 {
        // Wrong segment count; exactly one open paren per entry, wherever
        // the extra one sits.
        return None;
    }
    let (name, rest) = entry.split_once('(')?;
    let (avatar_id, _) = rest.split_once(')')?;
    let name = scrub(name);
    if name.is_empty() {
        return None;
    }
    Some(Occupant { name, avatar_id: scrub(avatar_id) })
}

fn scrub(raw: &str) -> String {
    raw.chars().filter(|c| !SCRUBBED.contains(c)).collect()
}

/// Re-encode occupants into the comma-joined wire form.
pub fn encode_roster(occupants: &[Occupant]) -> String {
    occupants.iter().map(Occupant::encode_entry).collect::<Vec<_>>().join(",")
}
