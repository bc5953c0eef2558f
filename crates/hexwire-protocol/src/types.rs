//! Value types shared by several message types.
//!
//! These are the small building blocks that appear inside messages: a
//! resource set inside trade and discard messages, a seat lock state, the
//! action codes of player and dev-card element updates. Each knows its own
//! wire token and debug name.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Resource type numbers, as carried in element and robbery messages.
pub mod resource {
    pub const CLAY: i32 = 1;
    pub const ORE: i32 = 2;
    pub const SHEEP: i32 = 3;
    pub const WHEAT: i32 = 4;
    pub const WOOD: i32 = 5;
    /// Resources whose type the receiver isn't allowed to see.
    pub const UNKNOWN: i32 = 6;
}

/// Amounts of each resource type.
///
/// The debug form is `clay=0|ore=1|sheep=0|wheat=1|wood=0|unknown=0`;
/// on the wire most messages send only the five known types, in the same
/// order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct ResourceSet {
    clay: i32,
    ore: i32,
    sheep: i32,
    wheat: i32,
    wood: i32,
    unknown: i32,
}

impl ResourceSet {
    pub const EMPTY: Self = Self::new(0, 0, 0, 0, 0, 0);

    pub const fn new(
        clay: i32,
        ore: i32,
        sheep: i32,
        wheat: i32,
        wood: i32,
        unknown: i32,
    ) -> Self {
        Self {
            clay,
            ore,
            sheep,
            wheat,
            wood,
            unknown,
        }
    }

    /// A set of the five known types, no unknowns.
    pub const fn known(clay: i32, ore: i32, sheep: i32, wheat: i32, wood: i32) -> Self {
        Self::new(clay, ore, sheep, wheat, wood, 0)
    }

    pub fn clay(&self) -> i32 {
        self.clay
    }

    pub fn ore(&self) -> i32 {
        self.ore
    }

    pub fn sheep(&self) -> i32 {
        self.sheep
    }

    pub fn wheat(&self) -> i32 {
        self.wheat
    }

    pub fn wood(&self) -> i32 {
        self.wood
    }

    pub fn unknown(&self) -> i32 {
        self.unknown
    }

    /// Amount of resource type `res_type` (see [`resource`]), 0 for
    /// anything out of range.
    pub fn amount(&self, res_type: i32) -> i32 {
        match res_type {
            resource::CLAY => self.clay,
            resource::ORE => self.ore,
            resource::SHEEP => self.sheep,
            resource::WHEAT => self.wheat,
            resource::WOOD => self.wood,
            resource::UNKNOWN => self.unknown,
            _ => 0,
        }
    }

    /// Returns a copy with `amount` more of `res_type`, or `None` if the
    /// type is outside 1..=6 or the amount overflows.
    #[must_use]
    pub fn checked_add(mut self, amount: i32, res_type: i32) -> Option<Self> {
        let slot = match res_type {
            resource::CLAY => &mut self.clay,
            resource::ORE => &mut self.ore,
            resource::SHEEP => &mut self.sheep,
            resource::WHEAT => &mut self.wheat,
            resource::WOOD => &mut self.wood,
            resource::UNKNOWN => &mut self.unknown,
            _ => return None,
        };
        *slot = slot.checked_add(amount)?;
        Some(self)
    }

    /// Adds one `type, amount` pair read from a resource list.
    ///
    /// Lists are written from [`nonzero_known`](Self::nonzero_known), so a
    /// pair read back must name a known type not already in the set, with
    /// a nonzero amount. Anything else could not be written out again.
    pub fn add_listed(self, res_type: i32, amount: i32) -> Result<Self, String> {
        if !(resource::CLAY..=resource::WOOD).contains(&res_type) {
            return Err(format!("resource type {res_type} is not clay through wood"));
        }
        if amount == 0 {
            return Err(format!("resource type {res_type} listed with amount 0"));
        }
        if self.amount(res_type) != 0 {
            return Err(format!("resource type {res_type} listed twice"));
        }
        self.checked_add(amount, res_type)
            .ok_or_else(|| format!("amount {amount} of type {res_type} overflows"))
    }

    /// The five known amounts in wire order.
    pub fn known_amounts(&self) -> [i32; 5] {
        [self.clay, self.ore, self.sheep, self.wheat, self.wood]
    }

    /// Known amounts plus unknown, in wire order.
    pub fn all_amounts(&self) -> [i32; 6] {
        [self.clay, self.ore, self.sheep, self.wheat, self.wood, self.unknown]
    }

    /// `(res_type, amount)` for each known type with a nonzero amount.
    pub fn nonzero_known(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (resource::CLAY..=resource::WOOD)
            .map(|rt| (rt, self.amount(rt)))
            .filter(|(_, amount)| *amount != 0)
    }

    /// Sum of all amounts, saturating at the `i32` bounds.
    pub fn total(&self) -> i32 {
        self.all_amounts()
            .iter()
            .fold(0, |sum: i32, amount| sum.saturating_add(*amount))
    }
}

impl fmt::Display for ResourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "clay={}|ore={}|sheep={}|wheat={}|wood={}|unknown={}",
            self.clay, self.ore, self.sheep, self.wheat, self.wood, self.unknown
        )
    }
}

// ---------------------------------------------------------------------------
// Seat locks
// ---------------------------------------------------------------------------

/// Lock state of one seat at a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatLockState {
    Unlocked,
    Locked,
    /// Unlocked now, but the seat's robot won't rejoin after a board reset.
    /// Older peers only know `Unlocked` and `Locked`.
    ClearOnReset,
}

impl SeatLockState {
    /// Numeric value used by the seat-lock fallback table.
    pub fn value(self) -> i32 {
        match self {
            Self::Unlocked => 0,
            Self::Locked => 1,
            Self::ClearOnReset => 2,
        }
    }

    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Unlocked),
            1 => Some(Self::Locked),
            2 => Some(Self::ClearOnReset),
            _ => None,
        }
    }

    pub fn wire_token(self) -> &'static str {
        match self {
            Self::Unlocked => "false",
            Self::Locked => "true",
            Self::ClearOnReset => "clear",
        }
    }

    pub fn from_wire_token(token: &str) -> Option<Self> {
        match token {
            "false" => Some(Self::Unlocked),
            "true" => Some(Self::Locked),
            "clear" => Some(Self::ClearOnReset),
            _ => None,
        }
    }

    pub fn debug_name(self) -> &'static str {
        match self {
            Self::Unlocked => "UNLOCKED",
            Self::Locked => "LOCKED",
            Self::ClearOnReset => "CLEAR_ON_RESET",
        }
    }

    pub fn from_debug_name(name: &str) -> Option<Self> {
        match name {
            "UNLOCKED" => Some(Self::Unlocked),
            "LOCKED" => Some(Self::Locked),
            "CLEAR_ON_RESET" => Some(Self::ClearOnReset),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dev card and element actions
// ---------------------------------------------------------------------------

/// What happened to a development card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DevCardActionKind {
    Draw,
    Play,
    AddNew,
    AddOld,
    CannotPlay,
}

impl DevCardActionKind {
    pub fn value(self) -> i32 {
        match self {
            Self::Draw => 0,
            Self::Play => 1,
            Self::AddNew => 2,
            Self::AddOld => 3,
            Self::CannotPlay => 4,
        }
    }

    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Draw),
            1 => Some(Self::Play),
            2 => Some(Self::AddNew),
            3 => Some(Self::AddOld),
            4 => Some(Self::CannotPlay),
            _ => None,
        }
    }

    pub fn debug_name(self) -> &'static str {
        match self {
            Self::Draw => "DRAW",
            Self::Play => "PLAY",
            Self::AddNew => "ADD_NEW",
            Self::AddOld => "ADD_OLD",
            Self::CannotPlay => "CANNOT_PLAY",
        }
    }

    /// Accepts the debug name or, as old captures print it, the number.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DRAW" => Some(Self::Draw),
            "PLAY" => Some(Self::Play),
            "ADD_NEW" => Some(Self::AddNew),
            "ADD_OLD" => Some(Self::AddOld),
            "CANNOT_PLAY" => Some(Self::CannotPlay),
            _ => s.parse().ok().and_then(Self::from_value),
        }
    }
}

/// How a player or game element value changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementAction {
    Set,
    Gain,
    Lose,
}

impl ElementAction {
    pub fn value(self) -> i32 {
        match self {
            Self::Set => 100,
            Self::Gain => 101,
            Self::Lose => 102,
        }
    }

    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            100 => Some(Self::Set),
            101 => Some(Self::Gain),
            102 => Some(Self::Lose),
            _ => None,
        }
    }

    pub fn debug_name(self) -> &'static str {
        match self {
            Self::Set => "SET",
            Self::Gain => "GAIN",
            Self::Lose => "LOSE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SET" => Some(Self::Set),
            "GAIN" => Some(Self::Gain),
            "LOSE" => Some(Self::Lose),
            _ => s.parse().ok().and_then(Self::from_value),
        }
    }
}

// ---------------------------------------------------------------------------
// Named code tables
// ---------------------------------------------------------------------------

/// A fixed table of `(code, NAME)` pairs for codes printed by name in debug
/// forms. Codes missing from the table print as plain numbers.
#[derive(Debug, Clone, Copy)]
pub struct CodeNames(&'static [(i32, &'static str)]);

impl CodeNames {
    pub fn name(&self, code: i32) -> Option<&'static str> {
        self.0.iter().find(|(c, _)| *c == code).map(|(_, n)| *n)
    }

    pub fn code(&self, name: &str) -> Option<i32> {
        self.0.iter().find(|(_, n)| *n == name).map(|(c, _)| *c)
    }

    /// The name, or the decimal code if it has none.
    pub fn display(&self, code: i32) -> String {
        self.name(code).map_or_else(|| code.to_string(), str::to_string)
    }

    /// Accepts a name or a decimal code.
    pub fn parse(&self, s: &str) -> Option<i32> {
        self.code(s).or_else(|| s.parse().ok())
    }
}

/// Player element types.
pub const PLAYER_ELEMENT_TYPES: CodeNames = CodeNames(&[
    (1, "CLAY"),
    (2, "ORE"),
    (3, "SHEEP"),
    (4, "WHEAT"),
    (5, "WOOD"),
    (6, "UNKNOWN_RESOURCE"),
    (10, "ROADS"),
    (11, "SETTLEMENTS"),
    (12, "CITIES"),
    (13, "SHIPS"),
    (15, "NUMKNIGHTS"),
    (16, "ASK_SPECIAL_BUILD"),
    (17, "RESOURCE_COUNT"),
    (18, "LAST_SETTLEMENT_NODE"),
    (19, "PLAYED_DEV_CARD_FLAG"),
    (101, "NUM_PICK_GOLD_HEX_RESOURCES"),
    (102, "SCENARIO_SVP"),
    (103, "SCENARIO_PLAYEREVENTS_BITMASK"),
    (104, "SCENARIO_SVP_LANDAREAS_BITMASK"),
    (105, "STARTING_LANDAREAS"),
    (106, "SCENARIO_CLOTH_COUNT"),
    (107, "SCENARIO_WARSHIP_COUNT"),
]);

/// Game element types.
pub const GAME_ELEMENT_TYPES: CodeNames = CodeNames(&[
    (1, "ROUND_COUNT"),
    (2, "DEV_CARD_COUNT"),
    (3, "FIRST_PLAYER"),
    (4, "CURRENT_PLAYER"),
    (5, "LARGEST_ARMY_PLAYER"),
    (6, "LONGEST_ROAD_PLAYER"),
]);

/// Special item operations.
pub const SPECIAL_ITEM_OPS: CodeNames = CodeNames(&[
    (1, "SET"),
    (2, "CLEAR"),
    (3, "PICK"),
    (4, "DECLINE"),
    (5, "SET_PICK"),
    (6, "CLEAR_PICK"),
]);

/// Inventory item actions.
pub const INVENTORY_ACTIONS: CodeNames = CodeNames(&[
    (1, "BUY"),
    (2, "ADD_PLAYABLE"),
    (3, "ADD_OTHER"),
    (4, "PLAY"),
    (5, "CANNOT_PLAY"),
    (6, "PLAYED"),
    (7, "PLACING_EXTRA"),
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_set_display() {
        let rs = ResourceSet::new(2, 1, 3, 1, 2, 0);
        assert_eq!(
            rs.to_string(),
            "clay=2|ore=1|sheep=3|wheat=1|wood=2|unknown=0"
        );
        assert_eq!(rs.total(), 9);
    }

    #[test]
    fn test_resource_set_amount_and_add() {
        let rs = ResourceSet::EMPTY
            .checked_add(7, resource::CLAY)
            .and_then(|rs| rs.checked_add(6, resource::WHEAT))
            .unwrap();
        assert_eq!(rs.amount(resource::CLAY), 7);
        assert_eq!(rs.amount(resource::WHEAT), 6);
        assert_eq!(rs.amount(99), 0);
        assert_eq!(
            rs.nonzero_known().collect::<Vec<_>>(),
            vec![(1, 7), (4, 6)]
        );
    }

    #[test]
    fn test_resource_set_add_is_checked() {
        let full = ResourceSet::known(i32::MAX, 0, 0, 0, 0);
        assert_eq!(full.checked_add(1, resource::CLAY), None);
        assert_eq!(ResourceSet::EMPTY.checked_add(1, 9), None);
        assert_eq!(
            ResourceSet::EMPTY.checked_add(2, resource::UNKNOWN).map(|rs| rs.unknown()),
            Some(2)
        );
        assert_eq!(ResourceSet::new(i32::MAX, 1, 0, 0, 0, 0).total(), i32::MAX);
    }

    #[test]
    fn test_resource_set_add_listed() {
        let rs = ResourceSet::EMPTY.add_listed(resource::ORE, 3).unwrap();
        assert_eq!(rs.ore(), 3);
        assert!(rs.add_listed(resource::ORE, 1).is_err());
        assert!(rs.add_listed(resource::UNKNOWN, 1).is_err());
        assert!(rs.add_listed(9, 1).is_err());
        assert!(rs.add_listed(resource::CLAY, 0).is_err());
    }

    #[test]
    fn test_seat_lock_tokens() {
        for state in [
            SeatLockState::Unlocked,
            SeatLockState::Locked,
            SeatLockState::ClearOnReset,
        ] {
            assert_eq!(
                SeatLockState::from_wire_token(state.wire_token()),
                Some(state)
            );
            assert_eq!(
                SeatLockState::from_debug_name(state.debug_name()),
                Some(state)
            );
            assert_eq!(SeatLockState::from_value(state.value()), Some(state));
        }
        assert_eq!(SeatLockState::from_wire_token("maybe"), None);
    }

    #[test]
    fn test_dev_card_action_parses_name_or_number() {
        assert_eq!(DevCardActionKind::parse("ADD_OLD"), Some(DevCardActionKind::AddOld));
        assert_eq!(DevCardActionKind::parse("0"), Some(DevCardActionKind::Draw));
        assert_eq!(DevCardActionKind::parse("9"), None);
    }

    #[test]
    fn test_element_action_values() {
        assert_eq!(ElementAction::from_value(101), Some(ElementAction::Gain));
        assert_eq!(ElementAction::parse("LOSE"), Some(ElementAction::Lose));
        assert_eq!(ElementAction::Set.value(), 100);
    }

    #[test]
    fn test_code_names() {
        assert_eq!(PLAYER_ELEMENT_TYPES.display(106), "SCENARIO_CLOTH_COUNT");
        assert_eq!(PLAYER_ELEMENT_TYPES.display(999), "999");
        assert_eq!(SPECIAL_ITEM_OPS.parse("CLEAR_PICK"), Some(6));
        assert_eq!(SPECIAL_ITEM_OPS.parse("42"), Some(42));
        assert_eq!(INVENTORY_ACTIONS.name(4), Some("PLAY"));
    }
}
