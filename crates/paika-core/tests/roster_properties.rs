//! Property-based tests for the roster wire codec.
//!
//! The codec must never panic on arbitrary payloads, and well-formed
//! entries must survive an encode/parse round trip in order.

use paika_core::{Occupant, encode_roster, parse_roster};
use proptest::prelude::*;

/// Names and avatar ids that are representable on the wire: non-empty and
/// free of the delimiter characters `,`, `(`, `)` and the scrubbed set.
fn wire_field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_]{1,12}"
}

fn occupant_strategy() -> impl Strategy<Value = Occupant> {
    (wire_field(), wire_field()).prop_map(|(name, avatar_id)| Occupant { name, avatar_id })
}

proptest! {
    /// INVARIANT: encode-then-parse preserves ordered name/avatar pairs.
    #[test]
    fn encode_parse_round_trips(occupants in proptest::collection::vec(occupant_strategy(), 0..8)) {
        let encoded = encode_roster(&occupants);
        prop_assert_eq!(parse_roster(&encoded), occupants);
    }

    /// INVARIANT: the parser is total - arbitrary input never panics and
    /// never yields an occupant with delimiter characters in its fields.
    #[test]
    fn parse_never_panics(raw in ".{0,256}") {
        for occupant in parse_roster(&raw) {
            prop_assert!(!occupant.name.is_empty());
            prop_assert!(!occupant.name.contains('('));
            prop_assert!(!occupant.avatar_id.contains('('));
        }
    }

    /// INVARIANT: parsing is order-preserving for interleaved valid and
    /// malformed entries - dropping never reorders survivors.
    #[test]
    fn malformed_entries_never_reorder_survivors(
        occupants in proptest::collection::vec(occupant_strategy(), 1..6),
        junk in "[A-Za-z0-9)]{0,8}",
    ) {
        let mut entries: Vec<String> = occupants.iter().map(Occupant::encode_entry).collect();
        // Splice a paren-less entry into the middle; it must be dropped.
        entries.insert(entries.len() / 2, junk);
        prop_assert_eq!(parse_roster(&entries.join(",")), occupants);
    }
}
