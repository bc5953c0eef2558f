//! Message types.
//!
//! Every message the protocol knows is a small immutable struct with
//! private fields, a validating constructor, and read accessors. The
//! [`Message`] enum wraps them all so code can `match` on what arrived,
//! and [`MessageType`] names each kind with its stable numeric id.
//!
//! ```text
//! wire:  1039|ga,2,3
//! debug: SOCAcceptOffer:game=ga|accepting=2|offering=3
//! ```
//!
//! Each struct knows how to write and read its own data through the
//! crate-internal [`MessageBody`] trait. The type id prefix and the debug
//! name prefix are added by the encoder, so bodies never see them.

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, ParseError, ProtocolError, invalid};
use crate::field::{self, SEP, SEP2};

// ---------------------------------------------------------------------------
// Body trait
// ---------------------------------------------------------------------------

/// Reads and writes the data part of one message type.
///
/// `write_wire` and `write_debug` append to `out` and never fail: every
/// field was validated when the message was constructed. The parsers get
/// the text after the `|` (wire) or after the `:` (debug).
pub(crate) trait MessageBody: Sized {
    fn write_wire(&self, out: &mut String);
    fn write_debug(&self, out: &mut String);
    fn parse_wire(data: &str) -> Result<Self, DecodeError>;
    fn parse_debug(body: &str) -> Result<Self, ParseError>;
}

fn parse_wire_as<T: MessageBody + Into<Message>>(
    data: &str,
) -> Result<Message, DecodeError> {
    T::parse_wire(data).map(Into::into)
}

fn parse_debug_as<T: MessageBody + Into<Message>>(
    body: &str,
) -> Result<Message, ParseError> {
    T::parse_debug(body).map(Into::into)
}

// ---------------------------------------------------------------------------
// Constructor checks
// ---------------------------------------------------------------------------

/// A game, channel, or player name: non-empty and free of separators.
pub(crate) fn check_name(what: &str, value: &str) -> Result<(), ProtocolError> {
    if value.is_empty() {
        return Err(invalid(format!("{what} is empty")));
    }
    check_token(what, value)
}

/// A field that may be empty but must not contain separators.
pub(crate) fn check_token(what: &str, value: &str) -> Result<(), ProtocolError> {
    if field::is_single_line_and_safe(value, false) {
        Ok(())
    } else {
        Err(invalid(format!("{what} contains a separator: {value:?}")))
    }
}

/// Trailing free text: one line, and without `sep` if the message uses
/// one before its text.
pub(crate) fn check_text(
    what: &str,
    value: &str,
    sep: Option<char>,
) -> Result<(), ProtocolError> {
    if value.contains(['\n', '\r']) {
        return Err(invalid(format!("{what} spans more than one line")));
    }
    if let Some(sep) = sep.filter(|s| value.contains(*s)) {
        return Err(invalid(format!("{what} contains separator {sep:?}")));
    }
    Ok(())
}

/// Renders a list of names for the debug form.
pub(crate) fn write_names(out: &mut String, names: &[String]) {
    field::write_list(out, names);
}

// ---------------------------------------------------------------------------
// Game-plus-integers messages
// ---------------------------------------------------------------------------

/// Debug rendering of a board coordinate: lowercase hex, no prefix.
pub(crate) struct Hex(pub i32);

impl std::fmt::Display for Hex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&field::hex(self.0))
    }
}

/// Debug rendering of a coordinate with a `0x` prefix.
pub(crate) struct PrefixedHex(pub i32);

impl std::fmt::Display for PrefixedHex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 < 0 {
            write!(f, "-0x{:x}", self.0.unsigned_abs())
        } else {
            write!(f, "0x{:x}", self.0)
        }
    }
}

// Most messages are a game name followed by a few integers. This macro
// writes the struct, its constructor and accessors, and both codecs.
// Each field lists its debug names: the first is written, all are read.
// `as Hex` or `as PrefixedHex` prints a coordinate field in hex.
macro_rules! game_message {
    (@first $first:literal $(, $rest:literal)*) => {
        $first
    };
    (@show $value:expr) => {
        $value
    };
    (@show $value:expr, $fmt:ident) => {
        crate::message::$fmt($value)
    };
    (@read $f:ident, $keys:expr) => {
        $f.int($keys)
    };
    (@read $f:ident, $keys:expr, $fmt:ident) => {
        $f.hex($keys)
    };
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident : [$($key:literal),+] $(as $fmt:ident)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        pub struct $name {
            game: String,
            $( $field: i32, )*
        }

        impl $name {
            pub fn new(
                game: impl Into<String>
                $(, $field: i32)*
            ) -> Result<Self, crate::error::ProtocolError> {
                let game = game.into();
                crate::message::check_name("game", &game)?;
                Ok(Self { game $(, $field)* })
            }

            pub fn game(&self) -> &str {
                &self.game
            }

            $(
                $(#[$fmeta])*
                pub fn $field(&self) -> i32 {
                    self.$field
                }
            )*
        }

        impl crate::message::MessageBody for $name {
            fn write_wire(&self, out: &mut String) {
                out.push_str(&self.game);
                $(
                    let _ = ::std::fmt::Write::write_fmt(
                        out,
                        format_args!(",{}", self.$field),
                    );
                )*
            }

            fn write_debug(&self, out: &mut String) {
                out.push_str("game=");
                out.push_str(&self.game);
                $(
                    let _ = ::std::fmt::Write::write_fmt(
                        out,
                        format_args!(
                            "|{}={}",
                            game_message!(@first $($key),+),
                            game_message!(@show self.$field $(, $fmt)?),
                        ),
                    );
                )*
            }

            fn parse_wire(
                data: &str,
            ) -> Result<Self, crate::error::DecodeError> {
                let mut f = crate::field::WireFields::new(data);
                let game = f.name("game")?;
                $( let $field = f.int()?; )*
                f.build(Self::new(game $(, $field)*))
            }

            fn parse_debug(
                body: &str,
            ) -> Result<Self, crate::error::ParseError> {
                let mut f = crate::field::DebugFields::new(body);
                let game = f.string(&["game"])?;
                $(
                    let $field =
                        game_message!(@read f, &[$($key),+] $(, $fmt)?)?;
                )*
                f.finish()?;
                Ok(Self::new(game $(, $field)*)?)
            }
        }
    };
}

mod board;
mod cards;
mod channel;
mod connection;
mod elements;
mod lobby;
mod status;
mod trade;
mod turn;

pub use board::{
    BuildRequest, CancelBuildRequest, DebugFreePlace, LandAreas, LargestArmy,
    LastSettlement, LongestRoad, MovePiece, PieceValue, PotentialSettlements,
    PutPiece, RemovePiece, RevealFogHex, SetSpecialItem, SvpTextMessage,
    special_item_op,
};
pub use cards::{
    BuyDevCardRequest, DevCardAction, DevCardCount, InventoryItemAction,
    PickResourceType, PickResources, PlayDevCardRequest, SetPlayedDevCard,
    inventory_action,
};
pub use channel::{
    ChannelMembers, ChannelTextMsg, DeleteChannel, JoinChannel,
    JoinChannelAuth, LeaveChannel, NewChannel,
};
pub use connection::{
    AdminReset, BCastTextMsg, ImARobot, LeaveAll, RejectConnection,
    RobotParameters, ServerPing, UpdateRobotParams, Version,
};
pub use elements::{
    GameElements, PlayerElement, PlayerElements, PlayerStats, ResourceCount,
    game_element,
};
pub use lobby::{
    BoardSize, BotJoinGameRequest, ChangeFace, DeleteGame, GameMembers,
    GameOptionGetInfos, GameServerText, GameStats, GameTextMsg, JoinGame,
    JoinGameAuth, LeaveGame, LocalizedStrings, NewGame, NewGameWithOptions,
    NewGameWithOptionsRequest, RobotDismiss, ScenarioContent, ScenarioInfo,
    SeatLocks, SetSeatLock, SitDown, StartGame, TimingPing,
};
pub use status::{StatusMessage, status_value};
pub use trade::{
    AcceptOffer, BankTrade, ClearOffer, ClearTradeMsg, MakeOffer, RejectOffer,
    TradeOffer,
};
pub use turn::{
    ChoosePlayer, ChoosePlayerRequest, Discard, DiceResult,
    DiceResultResources, DiscardRequest, EndTurn, FirstPlayer, GameState,
    MoveRobber, PlayerRoll, ReportRobbery, ResetBoardAuth, ResetBoardReject,
    ResetBoardRequest, ResetBoardVote, ResetBoardVoteRequest, RollDice,
    RollDicePrompt, Robbed, SetTurn, SimpleAction, SimpleRequest, Turn,
};

// ---------------------------------------------------------------------------
// The message set
// ---------------------------------------------------------------------------

macro_rules! message_set {
    ( $( $variant:ident = $id:literal => $name:literal, )* ) => {
        /// The kind of a message: its stable wire id and current debug name.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
        )]
        #[repr(u32)]
        pub enum MessageType {
            $( $variant = $id, )*
        }

        impl MessageType {
            /// Every message type, in type-id order.
            pub const ALL: &'static [MessageType] = &[
                $( MessageType::$variant, )*
            ];

            /// The numeric id written before `|` on the wire.
            pub const fn id(self) -> u32 {
                self as u32
            }

            /// The current debug-form name, such as `SOCAcceptOffer`.
            pub const fn name(self) -> &'static str {
                match self {
                    $( MessageType::$variant => $name, )*
                }
            }
        }

        /// Any protocol message.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub enum Message {
            $( $variant($variant), )*
        }

        impl Message {
            pub fn message_type(&self) -> MessageType {
                match self {
                    $( Message::$variant(_) => MessageType::$variant, )*
                }
            }

            pub(crate) fn write_wire_data(&self, out: &mut String) {
                match self {
                    $( Message::$variant(m) => m.write_wire(out), )*
                }
            }

            pub(crate) fn write_debug_body(&self, out: &mut String) {
                match self {
                    $( Message::$variant(m) => m.write_debug(out), )*
                }
            }
        }

        $(
            impl From<$variant> for Message {
                fn from(msg: $variant) -> Self {
                    Message::$variant(msg)
                }
            }
        )*

        pub(crate) const ENTRIES: &[crate::registry::Entry] = &[
            $(
                crate::registry::Entry::new(
                    MessageType::$variant,
                    parse_wire_as::<$variant>,
                    parse_debug_as::<$variant>,
                ),
            )*
        ];
    };
}

message_set! {
    NewChannel = 1001 => "SOCNewChannel",
    ChannelMembers = 1002 => "SOCChannelMembers",
    JoinChannel = 1004 => "SOCJoinChannel",
    ChannelTextMsg = 1005 => "SOCChannelTextMsg",
    LeaveChannel = 1006 => "SOCLeaveChannel",
    DeleteChannel = 1007 => "SOCDeleteChannel",
    LeaveAll = 1008 => "SOCLeaveAll",
    PutPiece = 1009 => "SOCPutPiece",
    GameTextMsg = 1010 => "SOCGameTextMsg",
    LeaveGame = 1011 => "SOCLeaveGame",
    SitDown = 1012 => "SOCSitDown",
    JoinGame = 1013 => "SOCJoinGame",
    DeleteGame = 1015 => "SOCDeleteGame",
    NewGame = 1016 => "SOCNewGame",
    GameMembers = 1017 => "SOCGameMembers",
    StartGame = 1018 => "SOCStartGame",
    JoinChannelAuth = 1020 => "SOCJoinChannelAuth",
    JoinGameAuth = 1021 => "SOCJoinGameAuth",
    ImARobot = 1022 => "SOCImARobot",
    BotJoinGameRequest = 1023 => "SOCBotJoinGameRequest",
    PlayerElement = 1024 => "SOCPlayerElement",
    GameState = 1025 => "SOCGameState",
    Turn = 1026 => "SOCTurn",
    DiceResult = 1028 => "SOCDiceResult",
    DiscardRequest = 1029 => "SOCDiscardRequest",
    RollDice = 1031 => "SOCRollDice",
    EndTurn = 1032 => "SOCEndTurn",
    Discard = 1033 => "SOCDiscard",
    MoveRobber = 1034 => "SOCMoveRobber",
    ChoosePlayer = 1035 => "SOCChoosePlayer",
    ChoosePlayerRequest = 1036 => "SOCChoosePlayerRequest",
    RejectOffer = 1037 => "SOCRejectOffer",
    ClearOffer = 1038 => "SOCClearOffer",
    AcceptOffer = 1039 => "SOCAcceptOffer",
    BankTrade = 1040 => "SOCBankTrade",
    MakeOffer = 1041 => "SOCMakeOffer",
    ClearTradeMsg = 1042 => "SOCClearTradeMsg",
    BuildRequest = 1043 => "SOCBuildRequest",
    CancelBuildRequest = 1044 => "SOCCancelBuildRequest",
    BuyDevCardRequest = 1045 => "SOCBuyDevCardRequest",
    DevCardAction = 1046 => "SOCDevCardAction",
    DevCardCount = 1047 => "SOCDevCardCount",
    SetPlayedDevCard = 1048 => "SOCSetPlayedDevCard",
    PlayDevCardRequest = 1049 => "SOCPlayDevCardRequest",
    PickResources = 1052 => "SOCPickResources",
    PickResourceType = 1053 => "SOCPickResourceType",
    FirstPlayer = 1054 => "SOCFirstPlayer",
    SetTurn = 1055 => "SOCSetTurn",
    RobotDismiss = 1056 => "SOCRobotDismiss",
    PotentialSettlements = 1057 => "SOCPotentialSettlements",
    ChangeFace = 1058 => "SOCChangeFace",
    RejectConnection = 1059 => "SOCRejectConnection",
    LastSettlement = 1060 => "SOCLastSettlement",
    GameStats = 1061 => "SOCGameStats",
    BCastTextMsg = 1062 => "SOCBCastTextMsg",
    ResourceCount = 1063 => "SOCResourceCount",
    AdminReset = 1065 => "SOCAdminReset",
    LongestRoad = 1066 => "SOCLongestRoad",
    LargestArmy = 1067 => "SOCLargestArmy",
    SetSeatLock = 1068 => "SOCSetSeatLock",
    StatusMessage = 1069 => "SOCStatusMessage",
    UpdateRobotParams = 1071 => "SOCUpdateRobotParams",
    RollDicePrompt = 1072 => "SOCRollDicePrompt",
    ResetBoardRequest = 1073 => "SOCResetBoardRequest",
    ResetBoardAuth = 1074 => "SOCResetBoardAuth",
    ResetBoardVoteRequest = 1075 => "SOCResetBoardVoteRequest",
    ResetBoardVote = 1076 => "SOCResetBoardVote",
    ResetBoardReject = 1077 => "SOCResetBoardReject",
    NewGameWithOptionsRequest = 1078 => "SOCNewGameWithOptionsRequest",
    NewGameWithOptions = 1079 => "SOCNewGameWithOptions",
    GameOptionGetInfos = 1081 => "SOCGameOptionGetInfos",
    PlayerStats = 1085 => "SOCPlayerStats",
    PlayerElements = 1086 => "SOCPlayerElements",
    DebugFreePlace = 1087 => "SOCDebugFreePlace",
    TimingPing = 1088 => "SOCTimingPing",
    SimpleRequest = 1089 => "SOCSimpleRequest",
    SimpleAction = 1090 => "SOCSimpleAction",
    GameServerText = 1091 => "SOCGameServerText",
    DiceResultResources = 1092 => "SOCDiceResultResources",
    MovePiece = 1093 => "SOCMovePiece",
    RemovePiece = 1094 => "SOCRemovePiece",
    PieceValue = 1095 => "SOCPieceValue",
    GameElements = 1096 => "SOCGameElements",
    SvpTextMessage = 1097 => "SOCSVPTextMessage",
    InventoryItemAction = 1098 => "SOCInventoryItemAction",
    SetSpecialItem = 1099 => "SOCSetSpecialItem",
    LocalizedStrings = 1100 => "SOCLocalizedStrings",
    ScenarioInfo = 1101 => "SOCScenarioInfo",
    ReportRobbery = 1102 => "SOCReportRobbery",
    Version = 9998 => "SOCVersion",
    ServerPing = 9999 => "SOCServerPing",
    RevealFogHex = 10001 => "SOCRevealFogHex",
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name(), self.id())
    }
}

impl Message {
    /// The canonical wire form: type id, then `|` and the data if any.
    pub fn to_wire(&self) -> String {
        let mut out = self.message_type().id().to_string();
        out.push(SEP);
        let header = out.len();
        self.write_wire_data(&mut out);
        // Data-less messages are the bare id.
        if out.len() == header {
            out.pop();
        }
        out
    }

    /// The debug form: `SOCName:field=value|...`.
    pub fn to_debug(&self) -> String {
        let mut out = self.message_type().name().to_string();
        out.push(':');
        self.write_debug_body(&mut out);
        out
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_debug())
    }
}

/// Splits `a,b,c` into owned names, rejecting empty items.
pub(crate) fn names_from_wire(
    f: &mut field::WireFields<'_>,
) -> Result<Vec<String>, DecodeError> {
    let mut names = Vec::with_capacity(f.remaining());
    while f.has_more() {
        names.push(f.raw()?.to_string());
    }
    Ok(names)
}

/// Writes `,a,b,c`.
pub(crate) fn write_names_sep2(out: &mut String, names: &[String]) {
    for name in names {
        out.push(SEP2);
        out.push_str(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_ids_and_names() {
        assert_eq!(MessageType::AcceptOffer.id(), 1039);
        assert_eq!(MessageType::AcceptOffer.name(), "SOCAcceptOffer");
        assert_eq!(MessageType::RevealFogHex.id(), 10001);
        assert_eq!(MessageType::SvpTextMessage.name(), "SOCSVPTextMessage");
    }

    #[test]
    fn test_all_is_sorted_by_id() {
        let ids: Vec<u32> = MessageType::ALL.iter().map(|t| t.id()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert_eq!(ENTRIES.len(), MessageType::ALL.len());
    }

    #[test]
    fn test_game_message_macro_codecs() {
        let msg = AcceptOffer::new("ga", 2, 3).unwrap();
        let msg = Message::from(msg);
        assert_eq!(msg.to_wire(), "1039|ga,2,3");
        assert_eq!(msg.to_debug(), "SOCAcceptOffer:game=ga|accepting=2|offering=3");
        assert_eq!(msg.message_type(), MessageType::AcceptOffer);
    }

    #[test]
    fn test_data_less_message_is_bare_id() {
        let msg = Message::from(AdminReset);
        assert_eq!(msg.to_wire(), "1065");
        assert_eq!(msg.to_debug(), "SOCAdminReset:");
    }

    #[test]
    fn test_name_checks() {
        assert!(check_name("game", "ga").is_ok());
        assert!(check_name("game", "").is_err());
        assert!(check_name("game", "a,b").is_err());
        assert!(check_name("game", "a|b").is_err());
        assert!(check_name("game", field::GAME_NONE).is_ok());
        assert!(check_text("text", "may, have, commas", None).is_ok());
        assert!(check_text("text", "two\nlines", None).is_err());
        assert!(check_text("text", "a\0b", Some(field::TEXT_SEP)).is_err());
    }

    #[test]
    fn test_display_is_debug_form() {
        let msg = Message::from(RollDice::new("ga").unwrap());
        assert_eq!(msg.to_string(), "SOCRollDice:game=ga");
        assert_eq!(MessageType::RollDice.to_string(), "SOCRollDice(1031)");
    }
}
