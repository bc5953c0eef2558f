//! What to send a peer running an older protocol version.
//!
//! Values such as status codes and seat lock states grew over time. Each
//! family has a [`FallbackTable`] listing the version that introduced
//! every value and what an older peer should see instead. Whole message
//! types also have a minimum version; [`adapt_for_peer`] rewrites a
//! message into forms the peer understands, or says why it can't.
//!
//! ```
//! use hexwire_protocol::compat::{fallback_for_version, valid_at_version};
//!
//! // PW_REQUIRED (16) is new in 1119; older clients get PW_WRONG (3).
//! assert_eq!(fallback_for_version(16, 1118), Ok(3));
//! assert!(valid_at_version(16, 1119));
//! ```
//!
//! ## Fallback tables
//!
//! A table row holds a value, the version that introduced it, and a
//! [`Fallback`]. Looking up a value for a peer walks the rows:
//!
//! 1. If the peer is new enough, the value is sent as it is.
//! 2. [`Fallback::To`] names an older value, which is checked the same
//!    way, so a chain of renames ends at something the peer knows.
//! 3. [`Fallback::Generic`] takes the rung of the table's catch-all
//!    ladder for the peer's version.
//! 4. [`Fallback::Unavailable`] fails with [`NoFallbackAvailable`].
//!
//! [`FallbackTable::validate`] checks that every chain ends and only
//! points at older values.
//!
//! ## Adapting whole messages
//!
//! Some messages change shape rather than value for old peers:
//!
//! | Message | Older peer gets |
//! |---|---|
//! | [`SetSeatLock`] for all seats | one message per seat |
//! | `GameServerText` | a `GameTextMsg` from the server |
//! | `PotentialSettlements` with land areas | the plain node list |
//!
//! Every other type passes through untouched once the peer reaches its
//! [`min_version`], and fails with [`CompatError::PeerTooOld`] before.
//!
//! ```
//! use hexwire_protocol::compat::adapt_for_peer;
//! use hexwire_protocol::message::{LandAreas, PotentialSettlements};
//! use hexwire_protocol::Message;
//!
//! let areas = LandAreas::new(1, vec![vec![0xa0f], vec![0x60a]]).unwrap();
//! let msg = Message::from(
//!     PotentialSettlements::with_board_info("ga", 3, None, Some(areas), None).unwrap(),
//! );
//! let old = adapt_for_peer(&msg, 1999).unwrap();
//! assert_eq!(old[0].to_wire(), "1057|ga,3,2575");
//! ```

use tracing::warn;

use crate::error::{CompatError, NoFallbackAvailable};
use crate::message::{
    GameTextMsg, Message, MessageType, PotentialSettlements, SeatLocks, SetSeatLock,
    status_value as sv,
};
use crate::types::SeatLockState;

/// The first protocol version; every peer understands it.
pub const BASE_VERSION: i32 = 1000;

/// What to send instead of a value the peer is too old for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Use the table's catch-all ladder.
    Generic,
    /// Send this value instead, re-checked against the peer's version.
    To(i32),
    /// The value has no older equivalent.
    Unavailable,
}

/// One value, the version that introduced it, and its fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackEntry {
    pub value: i32,
    pub min_version: i32,
    pub fallback: Fallback,
}

const fn entry(value: i32, min_version: i32, fallback: Fallback) -> FallbackEntry {
    FallbackEntry {
        value,
        min_version,
        fallback,
    }
}

/// The values of one family, in ascending order, with their versions.
#[derive(Debug, Clone, Copy)]
pub struct FallbackTable {
    name: &'static str,
    entries: &'static [FallbackEntry],
    /// `(peer_version_at_least, value)` rungs, newest first, used for
    /// [`Fallback::Generic`] and for values missing from `entries`.
    catch_all: &'static [(i32, i32)],
}

impl FallbackTable {
    pub const fn new(
        name: &'static str,
        entries: &'static [FallbackEntry],
        catch_all: &'static [(i32, i32)],
    ) -> Self {
        Self {
            name,
            entries,
            catch_all,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entries(&self) -> &'static [FallbackEntry] {
        self.entries
    }

    pub fn entry(&self, value: i32) -> Option<&'static FallbackEntry> {
        self.entries.iter().find(|e| e.value == value)
    }

    /// The version that introduced `value`, if the table knows it.
    pub fn min_version(&self, value: i32) -> Option<i32> {
        self.entry(value).map(|e| e.min_version)
    }

    /// Whether a peer at `peer_version` understands `value`. Values the
    /// table doesn't know are never valid.
    pub fn valid_at_version(&self, value: i32, peer_version: i32) -> bool {
        self.min_version(value).is_some_and(|min| min <= peer_version)
    }

    fn generic(&self, peer_version: i32) -> Option<i32> {
        self.catch_all
            .iter()
            .find(|(at_least, _)| peer_version >= *at_least)
            .map(|(_, value)| *value)
    }

    /// The value to send a peer at `peer_version` in place of `value`:
    /// `value` itself when the peer understands it, otherwise the end of
    /// its fallback chain.
    pub fn fallback_for_version(
        &self,
        value: i32,
        peer_version: i32,
    ) -> Result<i32, NoFallbackAvailable> {
        let missing = NoFallbackAvailable {
            value,
            peer_version,
        };
        let mut current = value;
        // Each step moves to a different value, so a well-formed table
        // never needs more steps than it has entries.
        for _ in 0..=self.entries.len() {
            if self.valid_at_version(current, peer_version) {
                return Ok(current);
            }
            let rule = self.entry(current).map_or(Fallback::Generic, |e| e.fallback);
            current = match rule {
                Fallback::To(next) => next,
                Fallback::Generic => match self.generic(peer_version) {
                    Some(next) if next != current => next,
                    _ => break,
                },
                Fallback::Unavailable => break,
            };
        }
        warn!(
            table = self.name,
            value,
            peer_version,
            "no fallback for value at peer version"
        );
        Err(missing)
    }

    /// Checks that every chain ends: explicit fallbacks point at known,
    /// strictly older values, and each catch-all rung is valid at its own
    /// version.
    pub fn validate(&self) -> Result<(), String> {
        for pair in self.entries.windows(2) {
            if pair[0].value >= pair[1].value {
                return Err(format!("{}: values out of order at {}", self.name, pair[1].value));
            }
        }
        for e in self.entries {
            if e.min_version < BASE_VERSION {
                return Err(format!("{}: value {} predates version {BASE_VERSION}", self.name, e.value));
            }
            if let Fallback::To(target) = e.fallback {
                match self.min_version(target) {
                    Some(min) if min < e.min_version => {}
                    Some(_) => {
                        return Err(format!(
                            "{}: {} falls back to {target}, which is not older",
                            self.name, e.value
                        ));
                    }
                    None => {
                        return Err(format!(
                            "{}: {} falls back to unknown value {target}",
                            self.name, e.value
                        ));
                    }
                }
            }
        }
        for (at_least, value) in self.catch_all {
            if !self.valid_at_version(*value, *at_least) {
                return Err(format!(
                    "{}: catch-all {value} is not valid at {at_least}",
                    self.name
                ));
            }
        }
        Ok(())
    }
}

const STATUS_ENTRIES: &[FallbackEntry] = &[
    entry(sv::OK, 1000, Fallback::Generic),
    entry(sv::NOT_OK_GENERIC, 1106, Fallback::Generic),
    entry(sv::NAME_NOT_FOUND, 1106, Fallback::Generic),
    entry(sv::PW_WRONG, 1106, Fallback::Generic),
    entry(sv::NAME_IN_USE, 1106, Fallback::Generic),
    entry(sv::CANT_JOIN_GAME_VERSION, 1106, Fallback::Generic),
    entry(sv::PROBLEM_WITH_DB, 1106, Fallback::Generic),
    entry(sv::ACCT_CREATED_OK, 1106, Fallback::Generic),
    entry(sv::ACCT_NOT_CREATED_ERR, 1106, Fallback::Generic),
    entry(sv::NEWGAME_OPTION_UNKNOWN, 1107, Fallback::Generic),
    entry(sv::NEWGAME_OPTION_VALUE_TOONEW, 1107, Fallback::Generic),
    entry(sv::NEWGAME_ALREADY_EXISTS, 1107, Fallback::Generic),
    entry(sv::NEWGAME_NAME_REJECTED, 1107, Fallback::Generic),
    entry(sv::NEWGAME_NAME_TOO_LONG, 1107, Fallback::Generic),
    entry(sv::NEWGAME_TOO_MANY_CREATED, 1110, Fallback::Generic),
    entry(sv::NEWCHANNEL_TOO_MANY_CREATED, 1110, Fallback::Generic),
    entry(sv::PW_REQUIRED, 1119, Fallback::To(sv::PW_WRONG)),
    entry(sv::ACCT_NOT_CREATED_DENIED, 1119, Fallback::Generic),
    entry(sv::ACCT_CREATED_OK_FIRST_ONE, 1120, Fallback::To(sv::ACCT_CREATED_OK)),
    entry(sv::NAME_NOT_ALLOWED, 1200, Fallback::Generic),
    entry(sv::OK_SET_NICKNAME, 1200, Fallback::Unavailable),
    entry(sv::OK_DEBUG_MODE_ON, 2000, Fallback::To(sv::OK)),
];

/// Status values carried by [`StatusMessage`](crate::message::StatusMessage).
pub static STATUS_VALUES: FallbackTable = FallbackTable::new(
    "status",
    STATUS_ENTRIES,
    // Peers before 1106 only understand OK.
    &[(1106, sv::NOT_OK_GENERIC), (BASE_VERSION, sv::OK)],
);

const SEAT_LOCK_ENTRIES: &[FallbackEntry] = &[
    entry(0, 1000, Fallback::Unavailable),
    entry(1, 1000, Fallback::Unavailable),
    entry(2, 2000, Fallback::To(0)),
];

/// Seat lock states, by [`SeatLockState::value`].
pub static SEAT_LOCK_STATES: FallbackTable =
    FallbackTable::new("seat lock", SEAT_LOCK_ENTRIES, &[]);

/// Version that added the all-seats form of [`SetSeatLock`].
pub const VERSION_FOR_ALL_SEAT_LOCKS: i32 = 2000;

/// Version that added land areas, sea edges, and the all-players form
/// of [`PotentialSettlements`].
pub const VERSION_FOR_LAND_AREAS: i32 = 2000;

/// [`FallbackTable::fallback_for_version`] over [`STATUS_VALUES`].
pub fn fallback_for_version(value: i32, peer_version: i32) -> Result<i32, NoFallbackAvailable> {
    STATUS_VALUES.fallback_for_version(value, peer_version)
}

/// [`FallbackTable::valid_at_version`] over [`STATUS_VALUES`].
pub fn valid_at_version(value: i32, peer_version: i32) -> bool {
    STATUS_VALUES.valid_at_version(value, peer_version)
}

/// Builds a message around the status value a peer at `peer_version`
/// should see in place of `value`.
///
/// ```
/// use hexwire_protocol::compat::build_for_version;
/// use hexwire_protocol::message::{Message, StatusMessage, status_value};
///
/// let msg = build_for_version(status_value::PW_REQUIRED, 1118, |sv| {
///     StatusMessage::with_value(sv, "password required").map(Message::from)
/// })
/// .unwrap()
/// .unwrap();
/// assert_eq!(msg.to_wire(), "1069|3,password required");
/// ```
pub fn build_for_version<T>(
    value: i32,
    peer_version: i32,
    build: impl FnOnce(i32) -> T,
) -> Result<T, NoFallbackAvailable> {
    fallback_for_version(value, peer_version).map(build)
}

/// The oldest protocol version that knows message type `t`.
pub fn min_version(t: MessageType) -> i32 {
    use MessageType as T;
    match t {
        T::Version | T::ResetBoardAuth | T::ResetBoardVote | T::RollDicePrompt => 1100,
        T::GameOptionGetInfos | T::NewGameWithOptions | T::NewGameWithOptionsRequest => 1107,
        T::PlayerStats => 1109,
        T::DebugFreePlace => 1112,
        T::SimpleRequest => 1118,
        T::SimpleAction => 1119,
        T::MovePiece
        | T::RemovePiece
        | T::RevealFogHex
        | T::SetSpecialItem
        | T::LocalizedStrings
        | T::ScenarioInfo
        | T::GameElements
        | T::PlayerElements
        | T::DiceResultResources
        | T::GameServerText => 2000,
        T::ReportRobbery => 2450,
        _ => BASE_VERSION,
    }
}

fn seat_lock_for_version(
    state: SeatLockState,
    peer_version: i32,
) -> Result<SeatLockState, NoFallbackAvailable> {
    let value = SEAT_LOCK_STATES.fallback_for_version(state.value(), peer_version)?;
    SeatLockState::from_value(value).ok_or(NoFallbackAvailable {
        value: state.value(),
        peer_version,
    })
}

fn adapt_seat_locks(
    msg: &SetSeatLock,
    peer_version: i32,
) -> Result<Vec<Message>, CompatError> {
    match msg.locks() {
        SeatLocks::One {
            player_number,
            state,
        } => {
            let state = seat_lock_for_version(*state, peer_version)?;
            Ok(vec![SetSeatLock::new(msg.game(), *player_number, state)?.into()])
        }
        SeatLocks::All(states) if peer_version >= VERSION_FOR_ALL_SEAT_LOCKS => {
            let states = states
                .iter()
                .map(|s| seat_lock_for_version(*s, peer_version))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(vec![SetSeatLock::all_seats(msg.game(), states)?.into()])
        }
        SeatLocks::All(states) => states
            .iter()
            .zip(0..)
            .map(|(state, pn)| -> Result<Message, CompatError> {
                let state = seat_lock_for_version(*state, peer_version)?;
                Ok(SetSeatLock::new(msg.game(), pn, state)?.into())
            })
            .collect(),
    }
}

fn adapt_potential_settlements(
    msg: &PotentialSettlements,
    peer_version: i32,
) -> Result<Vec<Message>, CompatError> {
    if msg.player_number() < 0 {
        return Err(CompatError::PeerTooOld {
            message: MessageType::PotentialSettlements,
            min_version: VERSION_FOR_LAND_AREAS,
            peer_version,
        });
    }
    let plain = PotentialSettlements::new(msg.game(), msg.player_number(), msg.potential_nodes())?;
    Ok(vec![plain.into()])
}

/// Rewrites `msg` into the messages a peer at `peer_version` should
/// receive. The input is left as it is; the result is usually one
/// message, sometimes several.
///
/// # Errors
///
/// [`CompatError::PeerTooOld`] when the type is newer than the peer and
/// has no older form, [`CompatError::NoFallback`] when a value inside it
/// has no older equivalent.
pub fn adapt_for_peer(msg: &Message, peer_version: i32) -> Result<Vec<Message>, CompatError> {
    match msg {
        Message::StatusMessage(m) => {
            let value = fallback_for_version(m.status_value(), peer_version)?;
            Ok(vec![m.with_status_value(value).into()])
        }
        Message::SetSeatLock(m) => adapt_seat_locks(m, peer_version),
        Message::PotentialSettlements(m) if peer_version < VERSION_FOR_LAND_AREAS => {
            adapt_potential_settlements(m, peer_version)
        }
        Message::GameServerText(m) if peer_version < min_version(MessageType::GameServerText) => {
            let text = GameTextMsg::new(m.game(), GameTextMsg::SERVER_NAME, m.text())?;
            Ok(vec![text.into()])
        }
        _ => {
            let t = msg.message_type();
            let min = min_version(t);
            if peer_version < min {
                return Err(CompatError::PeerTooOld {
                    message: t,
                    min_version: min,
                    peer_version,
                });
            }
            Ok(vec![msg.clone()])
        }
    }
}
