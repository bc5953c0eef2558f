//! Lookup from type id or debug name to a message type's parsers.
//!
//! The table itself is generated next to the message types, one entry per
//! [`MessageType`] in id order. Checks that run at compile time keep ids
//! and names unique and make sure every legacy name in [`RENAMES`] points
//! at a registered type.

use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::trace;

use crate::error::{DecodeError, ParseError};
use crate::message::{ENTRIES, Message, MessageType};

type WireParser = fn(&str) -> Result<Message, DecodeError>;
type DebugParser = fn(&str) -> Result<Message, ParseError>;

/// One registered message type and its two parsers.
#[derive(Clone, Copy)]
pub struct Entry {
    message_type: MessageType,
    parse_wire: WireParser,
    parse_debug: DebugParser,
}

impl Entry {
    pub(crate) const fn new(
        message_type: MessageType,
        parse_wire: WireParser,
        parse_debug: DebugParser,
    ) -> Self {
        Self {
            message_type,
            parse_wire,
            parse_debug,
        }
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    pub fn id(&self) -> u32 {
        self.message_type.id()
    }

    pub fn name(&self) -> &'static str {
        self.message_type.name()
    }

    /// Parses the data after `id|`.
    pub fn parse_wire(&self, data: &str) -> Result<Message, DecodeError> {
        (self.parse_wire)(data)
    }

    /// Parses the body after `Name:`.
    pub fn parse_debug(&self, body: &str) -> Result<Message, ParseError> {
        (self.parse_debug)(body)
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id())
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// Debug names used by older versions, and the current name each maps to.
pub const RENAMES: &[(&str, &str)] = &[
    ("SOCJoin", "SOCJoinChannel"),
    ("SOCJoinAuth", "SOCJoinChannelAuth"),
    ("SOCLeave", "SOCLeaveChannel"),
    ("SOCTextMsg", "SOCChannelTextMsg"),
    ("SOCMembers", "SOCChannelMembers"),
    ("SOCBuyCardRequest", "SOCBuyDevCardRequest"),
    ("SOCDevCard", "SOCDevCardAction"),
    ("SOCDiscoveryPick", "SOCPickResources"),
    ("SOCMonopolyPick", "SOCPickResourceType"),
    ("SOCJoinGameRequest", "SOCBotJoinGameRequest"),
];

// ---------------------------------------------------------------------------
// Compile-time checks
// ---------------------------------------------------------------------------

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

const fn is_current_name(entries: &[Entry], name: &str) -> bool {
    let mut i = 0;
    while i < entries.len() {
        if str_eq(entries[i].message_type.name(), name) {
            return true;
        }
        i += 1;
    }
    false
}

/// Ids strictly increase, so they are unique and binary-searchable; no
/// two entries share a name.
const fn entries_are_valid(entries: &[Entry]) -> bool {
    let mut i = 0;
    while i < entries.len() {
        let name = entries[i].message_type.name();
        if i > 0 && entries[i - 1].message_type.id() >= entries[i].message_type.id() {
            return false;
        }
        let mut j = i + 1;
        while j < entries.len() {
            if str_eq(name, entries[j].message_type.name()) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

/// Every target is registered and no legacy name shadows a current one.
const fn renames_are_valid(entries: &[Entry], renames: &[(&str, &str)]) -> bool {
    let mut i = 0;
    while i < renames.len() {
        let (legacy, current) = renames[i];
        if !is_current_name(entries, current) || is_current_name(entries, legacy) {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = assert!(
    entries_are_valid(ENTRIES),
    "message ids must be unique and ascending, names unique"
);
const _: () = assert!(
    renames_are_valid(ENTRIES, RENAMES),
    "legacy names must map to registered types and not shadow them"
);

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

static NAME_INDEX: LazyLock<HashMap<&'static str, &'static Entry>> = LazyLock::new(|| {
    let index: HashMap<_, _> = ENTRIES.iter().map(|e| (e.name(), e)).collect();
    trace!(entries = index.len(), renames = RENAMES.len(), "built message name index");
    index
});

/// Every registered message type, in id order.
pub fn entries() -> &'static [Entry] {
    ENTRIES
}

pub fn lookup_by_id(type_id: u32) -> Option<&'static Entry> {
    ENTRIES
        .binary_search_by_key(&type_id, Entry::id)
        .ok()
        .map(|i| &ENTRIES[i])
}

/// Finds a type by its current debug name, or by a legacy name through
/// [`RENAMES`].
pub fn lookup_by_name(name: &str) -> Option<&'static Entry> {
    if let Some(entry) = NAME_INDEX.get(name) {
        return Some(*entry);
    }
    let current = current_name(name)?;
    NAME_INDEX.get(current).copied()
}

/// The current name for a legacy debug name.
pub fn current_name(legacy: &str) -> Option<&'static str> {
    RENAMES
        .iter()
        .find(|(old, _)| *old == legacy)
        .map(|(_, current)| *current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        let entry = lookup_by_id(1039).unwrap();
        assert_eq!(entry.message_type(), MessageType::AcceptOffer);
        assert_eq!(entry.name(), "SOCAcceptOffer");
        assert_eq!(lookup_by_id(10001).unwrap().message_type(), MessageType::RevealFogHex);
        assert!(lookup_by_id(1003).is_none());
        assert!(lookup_by_id(0).is_none());
    }

    #[test]
    fn test_every_type_is_registered() {
        assert_eq!(entries().len(), MessageType::ALL.len());
        for t in MessageType::ALL {
            assert_eq!(lookup_by_id(t.id()).unwrap().message_type(), *t);
            assert_eq!(lookup_by_name(t.name()).unwrap().message_type(), *t);
        }
    }

    #[test]
    fn test_lookup_through_renames() {
        let cases = [
            ("SOCJoin", MessageType::JoinChannel),
            ("SOCJoinAuth", MessageType::JoinChannelAuth),
            ("SOCLeave", MessageType::LeaveChannel),
            ("SOCTextMsg", MessageType::ChannelTextMsg),
            ("SOCMembers", MessageType::ChannelMembers),
            ("SOCBuyCardRequest", MessageType::BuyDevCardRequest),
            ("SOCDevCard", MessageType::DevCardAction),
            ("SOCDiscoveryPick", MessageType::PickResources),
            ("SOCMonopolyPick", MessageType::PickResourceType),
            ("SOCJoinGameRequest", MessageType::BotJoinGameRequest),
        ];
        assert_eq!(cases.len(), RENAMES.len());
        for (legacy, expected) in cases {
            assert_eq!(lookup_by_name(legacy).unwrap().message_type(), expected, "{legacy}");
        }
        assert!(lookup_by_name("SOCNoSuchThing").is_none());
        assert_eq!(current_name("SOCDevCard"), Some("SOCDevCardAction"));
        assert_eq!(current_name("SOCDevCardAction"), None);
    }

    #[test]
    fn test_entry_parsers_dispatch() {
        let entry = lookup_by_id(1039).unwrap();
        let msg = entry.parse_wire("ga,2,3").unwrap();
        assert_eq!(msg.to_wire(), "1039|ga,2,3");
        let msg = entry.parse_debug("game=ga|accepting=2|offering=3").unwrap();
        assert_eq!(msg.message_type(), MessageType::AcceptOffer);
        assert!(format!("{entry:?}").contains("SOCAcceptOffer"));
    }
}
