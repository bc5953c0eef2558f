//! Game membership and setup: creating, joining, sitting down, options,
//! seat locks, and game chat.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::channel::{
    check_members, normalize_host, read_masked_password, write_masked_password,
};
use super::{
    MessageBody, check_name, check_text, check_token, names_from_wire,
    write_names, write_names_sep2,
};
use crate::error::{DecodeError, ParseError, ProtocolError, invalid};
use crate::field::{
    self, DebugFields, SEP, SEP2, TEXT_SEP, UNLIKELY_CHAR1, WireFields,
};
use crate::types::SeatLockState;

game_message! {
    /// A game was created.
    NewGame {}
}

game_message! {
    /// A game was destroyed.
    DeleteGame {}
}

game_message! {
    /// The server asks a robot to leave a game.
    RobotDismiss {}
}

game_message! {
    /// Sent once a second to a game with a timed turn, so clients can
    /// update their clocks.
    TimingPing {}
}

game_message! {
    /// The game has started, in the given state.
    StartGame {
        game_state: ["gameState"],
    }
}

game_message! {
    /// A player picked a new face icon.
    ChangeFace {
        player_number: ["playerNumber"],
        face_id: ["faceId"],
    }
}

// ---------------------------------------------------------------------------
// Joining and leaving
// ---------------------------------------------------------------------------

/// Client asks to join (creating if needed) a game.
///
/// Wire: `1013|nickname,password,host,game`, laid out like
/// [`JoinChannel`](super::JoinChannel).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinGame {
    nickname: String,
    password: String,
    host: String,
    game: String,
}

impl JoinGame {
    pub fn new(
        nickname: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        game: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let (nickname, password, host, game) =
            (nickname.into(), password.into(), host.into(), game.into());
        check_token("nickname", &nickname)?;
        check_token("password", &password)?;
        let host = normalize_host(host)?;
        check_name("game", &game)?;
        Ok(Self {
            nickname,
            password,
            host,
            game,
        })
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn game(&self) -> &str {
        &self.game
    }
}

impl MessageBody for JoinGame {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}{SEP2}{}",
            field::encode_str(&self.nickname),
            field::encode_str(&self.password),
            self.host,
            self.game
        );
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "nickname={}|", self.nickname);
        write_masked_password(out, &self.password);
        let _ = write!(out, "|host={}|game={}", self.host, self.game);
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let nickname = f.string()?;
        let password = f.string()?;
        let host = f.raw()?.to_string();
        let game = f.name("game")?;
        f.build(Self::new(nickname, password, host, game))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let nickname = f.string(&["nickname"])?;
        let password = read_masked_password(&mut f)?;
        let host = f.string(&["host"])?;
        let game = f.string(&["game"])?;
        f.finish()?;
        Ok(Self::new(nickname, password, host, game)?)
    }
}

/// Board dimensions for games on a non-classic board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSize {
    pub height: i32,
    pub width: i32,
}

/// Server accepts a client into a game.
///
/// Wire: `1021|ga`, or `1021|ga,20,21` with the board size, optionally
/// followed by `S` and per-seat values: `1021|ga,20,21,S,-2,1,3,0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinGameAuth {
    game: String,
    board_size: Option<BoardSize>,
    seat_values: Option<Vec<i32>>,
}

impl JoinGameAuth {
    pub fn new(game: impl Into<String>) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        Ok(Self {
            game,
            board_size: None,
            seat_values: None,
        })
    }

    /// For a game with a non-classic board size.
    pub fn with_board(
        game: impl Into<String>,
        board_size: BoardSize,
        seat_values: Option<Vec<i32>>,
    ) -> Result<Self, ProtocolError> {
        if seat_values.as_ref().is_some_and(Vec::is_empty) {
            return Err(invalid("seat value list is empty"));
        }
        Ok(Self {
            board_size: Some(board_size),
            seat_values,
            ..Self::new(game)?
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn board_size(&self) -> Option<BoardSize> {
        self.board_size
    }

    pub fn seat_values(&self) -> Option<&[i32]> {
        self.seat_values.as_deref()
    }
}

/// Marks the start of the seat values in [`JoinGameAuth`].
const SEAT_VALUES_MARKER: &str = "S";

impl MessageBody for JoinGameAuth {
    fn write_wire(&self, out: &mut String) {
        out.push_str(&self.game);
        if let Some(size) = self.board_size {
            let _ = write!(out, "{SEP2}{}{SEP2}{}", size.height, size.width);
            if let Some(values) = &self.seat_values {
                out.push(SEP2);
                out.push_str(SEAT_VALUES_MARKER);
                field::write_sep2_each(out, values);
            }
        }
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "game={}", self.game);
        if let Some(size) = self.board_size {
            let _ = write!(out, "|bh={}|bw={}", size.height, size.width);
            if let Some(values) = &self.seat_values {
                out.push_str("|vs=");
                field::write_list(out, values);
            }
        }
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        if !f.has_more() {
            return f.build(Self::new(game));
        }
        let board_size = BoardSize {
            height: f.int()?,
            width: f.int()?,
        };
        let mut seat_values = None;
        if f.has_more() {
            let index = f.index();
            if f.raw()? != SEAT_VALUES_MARKER {
                return Err(DecodeError::malformed(index, "expected S marker"));
            }
            let values = f.ints()?;
            if values.is_empty() {
                return Err(DecodeError::ArityMismatch {
                    expected: index + 2,
                    found: index + 1,
                });
            }
            seat_values = Some(values);
        }
        f.build(Self::with_board(game, board_size, seat_values))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let Some(height) = f.opt_value(&["bh"]) else {
            f.finish()?;
            return Ok(Self::new(game)?);
        };
        let height = field::parse_int("bh", height)?;
        let width = f.int(&["bw"])?;
        let seat_values = match f.opt_value(&["vs"]) {
            Some(list) => Some(
                field::split_list(list)
                    .iter()
                    .map(|v| field::parse_int("vs", v))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };
        f.finish()?;
        Ok(Self::with_board(game, BoardSize { height, width }, seat_values)?)
    }
}

/// A member left a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaveGame {
    nickname: String,
    host: String,
    game: String,
}

impl LeaveGame {
    pub fn new(
        nickname: impl Into<String>,
        host: impl Into<String>,
        game: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let (nickname, host, game) = (nickname.into(), host.into(), game.into());
        check_name("nickname", &nickname)?;
        let host = normalize_host(host)?;
        check_name("game", &game)?;
        Ok(Self {
            nickname,
            host,
            game,
        })
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn game(&self) -> &str {
        &self.game
    }
}

impl MessageBody for LeaveGame {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(out, "{}{SEP2}{}{SEP2}{}", self.nickname, self.host, self.game);
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "nickname={}|host={}|game={}",
            self.nickname, self.host, self.game
        );
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let nickname = f.name("nickname")?;
        let host = f.raw()?.to_string();
        let game = f.name("game")?;
        f.build(Self::new(nickname, host, game))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let nickname = f.string(&["nickname"])?;
        let host = f.string(&["host"])?;
        let game = f.string(&["game"])?;
        f.finish()?;
        Ok(Self::new(nickname, host, game)?)
    }
}

/// Member list of a game, sent to a client that just joined it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameMembers {
    game: String,
    members: Vec<String>,
}

impl GameMembers {
    pub fn new(
        game: impl Into<String>,
        members: Vec<String>,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        check_members(&members)?;
        Ok(Self { game, members })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }
}

impl MessageBody for GameMembers {
    fn write_wire(&self, out: &mut String) {
        out.push_str(&self.game);
        write_names_sep2(out, &self.members);
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "game={}|members=", self.game);
        write_names(out, &self.members);
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let members = names_from_wire(&mut f)?;
        if members.is_empty() {
            return Err(DecodeError::ArityMismatch {
                expected: 2,
                found: 1,
            });
        }
        f.build(Self::new(game, members))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let members = f.list(&["members"])?;
        f.finish()?;
        Ok(Self::new(game, members)?)
    }
}

/// A player took a seat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SitDown {
    game: String,
    nickname: String,
    player_number: i32,
    robot: bool,
}

impl SitDown {
    pub fn new(
        game: impl Into<String>,
        nickname: impl Into<String>,
        player_number: i32,
        robot: bool,
    ) -> Result<Self, ProtocolError> {
        let (game, nickname) = (game.into(), nickname.into());
        check_name("game", &game)?;
        check_name("nickname", &nickname)?;
        Ok(Self {
            game,
            nickname,
            player_number,
            robot,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn player_number(&self) -> i32 {
        self.player_number
    }

    pub fn is_robot(&self) -> bool {
        self.robot
    }
}

impl MessageBody for SitDown {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}{SEP2}{}",
            self.game, self.nickname, self.player_number, self.robot
        );
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "game={}|nickname={}|playerNumber={}|robotFlag={}",
            self.game, self.nickname, self.player_number, self.robot
        );
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let nickname = f.name("nickname")?;
        let player_number = f.int()?;
        let robot = f.bool()?;
        f.build(Self::new(game, nickname, player_number, robot))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let nickname = f.string(&["nickname"])?;
        let player_number = f.int(&["playerNumber"])?;
        let robot = f.bool(&["robotFlag"])?;
        f.finish()?;
        Ok(Self::new(game, nickname, player_number, robot)?)
    }
}

// ---------------------------------------------------------------------------
// Game options
// ---------------------------------------------------------------------------

/// Written in place of an absent option string.
const NO_OPTIONS: &str = "-";

/// Option strings such as `PL=4,RD=t` are rest-of-line fields: commas and
/// `=` are fine, `|` and line breaks are not.
fn check_options(options: &Option<String>) -> Result<(), ProtocolError> {
    match options.as_deref() {
        None => Ok(()),
        Some("") | Some(NO_OPTIONS) => {
            Err(invalid("option string is empty; use None"))
        }
        Some(opts) => check_text("options", opts, Some(SEP)),
    }
}

fn options_text(options: &Option<String>) -> &str {
    options.as_deref().unwrap_or(NO_OPTIONS)
}

fn options_from_text(text: &str) -> Option<String> {
    (text != NO_OPTIONS && !text.is_empty()).then(|| text.to_string())
}

/// Server announces a new game along with its options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewGameWithOptions {
    game: String,
    min_version: i32,
    options: Option<String>,
}

impl NewGameWithOptions {
    /// `min_version` is the oldest client version that can join, or -1.
    pub fn new(
        game: impl Into<String>,
        min_version: i32,
        options: Option<String>,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        check_options(&options)?;
        Ok(Self {
            game,
            min_version,
            options,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn min_version(&self) -> i32 {
        self.min_version
    }

    pub fn options(&self) -> Option<&str> {
        self.options.as_deref()
    }
}

impl MessageBody for NewGameWithOptions {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}",
            self.game,
            self.min_version,
            options_text(&self.options)
        );
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "game={}|param1={}|param2={}",
            self.game,
            self.min_version,
            options_text(&self.options)
        );
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let min_version = f.int()?;
        let options = options_from_text(f.rest()?);
        f.build(Self::new(game, min_version, options))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let min_version = f.int(&["param1", "minVersion"])?;
        let options = options_from_text(f.rest(&["param2", "opts"])?);
        Ok(Self::new(game, min_version, options)?)
    }
}

/// Client asks the server to create a game with options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewGameWithOptionsRequest {
    nickname: String,
    password: String,
    host: String,
    game: String,
    options: Option<String>,
}

impl NewGameWithOptionsRequest {
    pub fn new(
        nickname: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        game: impl Into<String>,
        options: Option<String>,
    ) -> Result<Self, ProtocolError> {
        let (nickname, password, host, game) =
            (nickname.into(), password.into(), host.into(), game.into());
        check_token("nickname", &nickname)?;
        check_token("password", &password)?;
        let host = normalize_host(host)?;
        check_name("game", &game)?;
        check_options(&options)?;
        Ok(Self {
            nickname,
            password,
            host,
            game,
            options,
        })
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn options(&self) -> Option<&str> {
        self.options.as_deref()
    }
}

impl MessageBody for NewGameWithOptionsRequest {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}{SEP2}{}{SEP2}{}",
            field::encode_str(&self.nickname),
            field::encode_str(&self.password),
            self.host,
            self.game,
            options_text(&self.options)
        );
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "nickname={}|", self.nickname);
        write_masked_password(out, &self.password);
        let _ = write!(
            out,
            "|host={}|game={}|opts={}",
            self.host,
            self.game,
            options_text(&self.options)
        );
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let nickname = f.string()?;
        let password = f.string()?;
        let host = f.raw()?.to_string();
        let game = f.name("game")?;
        let options = options_from_text(f.rest()?);
        f.build(Self::new(nickname, password, host, game, options))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let nickname = f.string(&["nickname"])?;
        let password = read_masked_password(&mut f)?;
        let host = f.string(&["host"])?;
        let game = f.string(&["game"])?;
        let options = options_from_text(f.rest(&["opts"])?);
        Ok(Self::new(nickname, password, host, game, options)?)
    }
}

/// Server asks a robot to join a game and sit at a seat.
///
/// Wire: `1023|ga,3,PL=2,RD=t`, or `-` for no options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BotJoinGameRequest {
    game: String,
    player_number: i32,
    options: Option<String>,
}

impl BotJoinGameRequest {
    pub fn new(
        game: impl Into<String>,
        player_number: i32,
        options: Option<String>,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        check_options(&options)?;
        Ok(Self {
            game,
            player_number,
            options,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn player_number(&self) -> i32 {
        self.player_number
    }

    pub fn options(&self) -> Option<&str> {
        self.options.as_deref()
    }
}

impl MessageBody for BotJoinGameRequest {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}",
            self.game,
            self.player_number,
            options_text(&self.options)
        );
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "game={}|playerNumber={}|opts={}",
            self.game,
            self.player_number,
            options_text(&self.options)
        );
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let player_number = f.int()?;
        let options = options_from_text(f.rest()?);
        f.build(Self::new(game, player_number, options))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let player_number = f.int(&["playerNumber"])?;
        let options = options_from_text(f.rest(&["opts"])?);
        Ok(Self::new(game, player_number, options)?)
    }
}

/// Client asks for game option descriptions.
///
/// Wire: `1081|-` for all options, or a key list such as `SC,PLP`,
/// followed by `?CHANGES` to also get options changed since the client's
/// version and `?I18N` for localized descriptions. `1081|?I18N` alone asks
/// only for localized descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameOptionGetInfos {
    keys: Option<Vec<String>>,
    any_changes: bool,
    i18n: bool,
    only_i18n: bool,
}

const ANY_CHANGES: &str = "?CHANGES";
const I18N: &str = "?I18N";

impl GameOptionGetInfos {
    pub fn new(
        keys: Option<Vec<String>>,
        any_changes: bool,
        i18n: bool,
    ) -> Result<Self, ProtocolError> {
        if let Some(keys) = &keys {
            if keys.is_empty() {
                return Err(invalid("option key list is empty; use None"));
            }
            for key in keys {
                check_name("option key", key)?;
                if key == NO_OPTIONS || key.starts_with('?') {
                    return Err(invalid(format!("reserved option key {key:?}")));
                }
            }
        }
        Ok(Self {
            keys,
            any_changes,
            i18n,
            only_i18n: false,
        })
    }

    /// Asks only for localized descriptions of all options.
    pub fn only_i18n() -> Self {
        Self {
            keys: None,
            any_changes: false,
            i18n: true,
            only_i18n: true,
        }
    }

    /// The requested option keys; `None` means all.
    pub fn keys(&self) -> Option<&[String]> {
        self.keys.as_deref()
    }

    pub fn any_changes(&self) -> bool {
        self.any_changes
    }

    pub fn i18n(&self) -> bool {
        self.i18n
    }

    pub fn is_only_i18n(&self) -> bool {
        self.only_i18n
    }

    fn write_tokens(&self, out: &mut String) {
        if self.only_i18n {
            out.push_str(I18N);
            return;
        }
        match &self.keys {
            Some(keys) => out.push_str(&keys.join(",")),
            None => out.push_str(NO_OPTIONS),
        }
        if self.any_changes {
            out.push(SEP2);
            out.push_str(ANY_CHANGES);
        }
        if self.i18n {
            out.push(SEP2);
            out.push_str(I18N);
        }
    }

    fn from_tokens(text: &str) -> Result<Self, String> {
        let mut tokens: Vec<&str> = text.split(SEP2).collect();
        let i18n = tokens.last() == Some(&I18N);
        if i18n {
            tokens.pop();
        }
        let any_changes = tokens.last() == Some(&ANY_CHANGES);
        if any_changes {
            tokens.pop();
        }
        match tokens.as_slice() {
            [] if i18n && !any_changes => Ok(Self::only_i18n()),
            [] => Err(format!("no option keys in {text:?}")),
            [single] if *single == NO_OPTIONS => {
                Self::new(None, any_changes, i18n).map_err(|e| e.to_string())
            }
            keys => Self::new(
                Some(keys.iter().map(|k| k.to_string()).collect()),
                any_changes,
                i18n,
            )
            .map_err(|e| e.to_string()),
        }
    }
}

impl MessageBody for GameOptionGetInfos {
    fn write_wire(&self, out: &mut String) {
        self.write_tokens(out);
    }

    fn write_debug(&self, out: &mut String) {
        out.push_str("options=");
        self.write_tokens(out);
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let text = WireFields::new(data).rest()?;
        Self::from_tokens(text).map_err(|reason| DecodeError::malformed(0, reason))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let text = f.value(&["options"])?;
        f.finish()?;
        Self::from_tokens(text).map_err(|reason| ParseError::malformed("options", reason))
    }
}

// ---------------------------------------------------------------------------
// Seat locks
// ---------------------------------------------------------------------------

/// One seat's lock, or every seat's at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatLocks {
    One {
        player_number: i32,
        state: SeatLockState,
    },
    All(Vec<SeatLockState>),
}

/// Seat lock change.
///
/// Wire: `1068|ga,2,true` for one seat, `1068|ga,false,clear,true,false`
/// for all 4 or 6 seats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetSeatLock {
    game: String,
    locks: SeatLocks,
}

impl SetSeatLock {
    pub fn new(
        game: impl Into<String>,
        player_number: i32,
        state: SeatLockState,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        if player_number < 0 {
            return Err(invalid(format!("negative seat number {player_number}")));
        }
        Ok(Self {
            game,
            locks: SeatLocks::One {
                player_number,
                state,
            },
        })
    }

    /// Every seat's lock state, for a 4- or 6-player game.
    pub fn all_seats(
        game: impl Into<String>,
        states: Vec<SeatLockState>,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        if states.len() != 4 && states.len() != 6 {
            return Err(invalid(format!(
                "seat lock list has {} seats, expected 4 or 6",
                states.len()
            )));
        }
        Ok(Self {
            game,
            locks: SeatLocks::All(states),
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn locks(&self) -> &SeatLocks {
        &self.locks
    }
}

impl MessageBody for SetSeatLock {
    fn write_wire(&self, out: &mut String) {
        out.push_str(&self.game);
        match &self.locks {
            SeatLocks::One {
                player_number,
                state,
            } => {
                let _ = write!(out, "{SEP2}{player_number}{SEP2}{}", state.wire_token());
            }
            SeatLocks::All(states) => {
                for state in states {
                    out.push(SEP2);
                    out.push_str(state.wire_token());
                }
            }
        }
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "game={}", self.game);
        match &self.locks {
            SeatLocks::One {
                player_number,
                state,
            } => {
                let _ = write!(
                    out,
                    "|playerNumber={player_number}|state={}",
                    state.debug_name()
                );
            }
            SeatLocks::All(states) => {
                let names: Vec<&str> = states.iter().map(|s| s.debug_name()).collect();
                let _ = write!(out, "|states={}", names.join(","));
            }
        }
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let lock_state = |index: usize, token: &str| {
            SeatLockState::from_wire_token(token).ok_or_else(|| {
                DecodeError::malformed(index, format!("unknown lock state {token:?}"))
            })
        };

        let starts_with_digit = f
            .peek()
            .is_some_and(|t| t.starts_with(|c: char| c.is_ascii_digit()));
        if starts_with_digit {
            let player_number = f.int()?;
            let index = f.index();
            let state = lock_state(index, f.raw()?)?;
            f.build(Self::new(game, player_number, state))
        } else {
            let mut states = Vec::with_capacity(6);
            while f.has_more() {
                let index = f.index();
                states.push(lock_state(index, f.raw()?)?);
            }
            if states.len() != 4 && states.len() != 6 {
                return Err(DecodeError::ArityMismatch {
                    expected: if states.len() < 4 { 5 } else { 7 },
                    found: states.len() + 1,
                });
            }
            f.build(Self::all_seats(game, states))
        }
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let lock_state = |name: &str| {
            SeatLockState::from_debug_name(name).ok_or_else(|| {
                ParseError::malformed("state", format!("unknown lock state {name:?}"))
            })
        };

        if let Some(list) = f.opt_value(&["states"]) {
            let states = list
                .split(SEP2)
                .map(lock_state)
                .collect::<Result<Vec<_>, _>>()?;
            f.finish()?;
            return Ok(Self::all_seats(game, states)?);
        }
        let player_number = f.int(&["playerNumber"])?;
        let state = lock_state(f.value(&["state"])?)?;
        f.finish()?;
        Ok(Self::new(game, player_number, state)?)
    }
}

// ---------------------------------------------------------------------------
// Game chat
// ---------------------------------------------------------------------------

/// A line of chat in a game, or server text for clients too old for
/// [`GameServerText`].
///
/// Wire: `1010|ga\0nickname\0text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameTextMsg {
    game: String,
    nickname: String,
    text: String,
}

impl GameTextMsg {
    /// The nickname used for text from the server itself.
    pub const SERVER_NAME: &'static str = "Server";

    pub fn new(
        game: impl Into<String>,
        nickname: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let (game, nickname, text) = (game.into(), nickname.into(), text.into());
        check_name("game", &game)?;
        check_name("nickname", &nickname)?;
        check_text("text", &text, Some(TEXT_SEP))?;
        Ok(Self {
            game,
            nickname,
            text,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl MessageBody for GameTextMsg {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{TEXT_SEP}{}{TEXT_SEP}{}",
            self.game,
            self.nickname,
            field::encode_str(&self.text)
        );
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "game={}|nickname={}|text={}",
            self.game, self.nickname, self.text
        );
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::with_separator(data, TEXT_SEP);
        let game = f.name("game")?;
        let nickname = f.name("nickname")?;
        let text = field::decode_str(f.rest()?).to_string();
        f.build(Self::new(game, nickname, text))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let nickname = f.string(&["nickname"])?;
        let text = f.rest(&["text"])?;
        Ok(Self::new(game, nickname, text)?)
    }
}

/// Text from the server to everyone in a game.
///
/// Wire: `1091|ga\u{1}text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameServerText {
    game: String,
    text: String,
}

impl GameServerText {
    pub fn new(
        game: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let (game, text) = (game.into(), text.into());
        check_name("game", &game)?;
        check_text("text", &text, Some(UNLIKELY_CHAR1))?;
        Ok(Self { game, text })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl MessageBody for GameServerText {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{UNLIKELY_CHAR1}{}",
            self.game,
            field::encode_str(&self.text)
        );
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "game={}|text={}", self.game, self.text);
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::with_separator(data, UNLIKELY_CHAR1);
        let game = f.name("game")?;
        let text = field::decode_str(f.rest()?).to_string();
        f.build(Self::new(game, text))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let text = f.rest(&["text"])?;
        Ok(Self::new(game, text)?)
    }
}

// ---------------------------------------------------------------------------
// Localized strings
// ---------------------------------------------------------------------------

/// Localized text for game options or scenarios.
///
/// Wire: `1100|S|0|SC_FOG|name text|desc text`, every parameter separated
/// by `|`. The flags field is hex. A missing string is the tab sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalizedStrings {
    string_type: String,
    flags: i32,
    strings: Vec<Option<String>>,
}

const NULL_STRING: &str = "(null)";
const EMPTY_LIST: &str = "(strs empty)";

impl LocalizedStrings {
    /// Strings for game options.
    pub const TYPE_GAMEOPT: &'static str = "O";
    /// Strings for scenarios.
    pub const TYPE_SCENARIO: &'static str = "S";

    pub const FLAG_TYPE_UNKNOWN: i32 = 0x01;
    pub const FLAG_REQ_ALL: i32 = 0x02;
    pub const FLAG_SENT_ALL: i32 = 0x04;

    /// Follows a key the server has no strings for.
    pub const MARKER_KEY_UNKNOWN: &'static str = "\u{16}K";

    pub fn new(
        string_type: impl Into<String>,
        flags: i32,
        strings: Vec<Option<String>>,
    ) -> Result<Self, ProtocolError> {
        let string_type = string_type.into();
        check_name("string type", &string_type)?;
        if flags < 0 {
            return Err(invalid(format!("negative flags {flags}")));
        }
        let strings: Vec<Option<String>> = strings
            .into_iter()
            .map(|s| s.filter(|s| !s.is_empty()))
            .collect();
        for s in strings.iter().flatten() {
            check_text("string", s, Some(SEP))?;
            if s == NULL_STRING || s == EMPTY_LIST {
                return Err(invalid(format!("reserved string {s:?}")));
            }
            if s.starts_with('\u{16}') && s != Self::MARKER_KEY_UNKNOWN {
                return Err(invalid(format!("unknown marker {s:?}")));
            }
        }
        Ok(Self {
            string_type,
            flags,
            strings,
        })
    }

    pub fn string_type(&self) -> &str {
        &self.string_type
    }

    pub fn flags(&self) -> i32 {
        self.flags
    }

    pub fn strings(&self) -> &[Option<String>] {
        &self.strings
    }
}

impl MessageBody for LocalizedStrings {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(out, "{}{SEP}{:x}", self.string_type, self.flags);
        for s in &self.strings {
            out.push(SEP);
            out.push_str(field::encode_opt(s.as_deref()));
        }
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "type={}|flags=0x{:x}|", self.string_type, self.flags);
        if self.strings.is_empty() {
            out.push_str(EMPTY_LIST);
            return;
        }
        out.push_str("strs=");
        let rendered: Vec<&str> = self
            .strings
            .iter()
            .map(|s| s.as_deref().unwrap_or(NULL_STRING))
            .collect();
        out.push_str(&rendered.join("|"));
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::with_separator(data, SEP);
        let string_type = f.name("string type")?;
        let index = f.index();
        let flags_token = f.raw()?;
        let flags = flags_token
            .starts_with(|c: char| c.is_ascii_hexdigit())
            .then(|| i32::from_str_radix(flags_token, 16).ok())
            .flatten()
            .ok_or_else(|| {
                DecodeError::malformed(
                    index,
                    format!("expected hex flags, got {flags_token:?}"),
                )
            })?;
        let mut strings = Vec::with_capacity(f.remaining());
        while f.has_more() {
            strings.push(field::decode_opt(f.raw()?));
        }
        f.build(Self::new(string_type, flags, strings))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let string_type = f.string(&["type"])?;
        let flags = f.hex(&["flags"])?;
        let strings = match f.raw_rest() {
            None => return Err(ParseError::MissingField("strs".into())),
            Some(EMPTY_LIST) => Vec::new(),
            Some(rest) => rest
                .strip_prefix("strs=")
                .unwrap_or(rest)
                .split(SEP)
                .map(|s| (s != NULL_STRING).then(|| s.to_string()))
                .collect(),
        };
        Ok(Self::new(string_type, flags, strings)?)
    }
}

// ---------------------------------------------------------------------------
// Scenario info
// ---------------------------------------------------------------------------

const SCENARIO_REQUEST: &str = "[";
const SCENARIO_ANY_CHANGED: &str = "?";
const SCENARIO_NO_MORE: &str = "-";
const SCENARIO_KEY_UNKNOWN: i32 = -2;
const SCENARIO_KEY_UNKNOWN_NAME: &str = "MARKER_KEY_UNKNOWN";

/// What a [`ScenarioInfo`] says.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioContent {
    /// A client asks about these scenarios, and with `any_changed` about
    /// every scenario changed since the client's version.
    Request { keys: Vec<String>, any_changed: bool },
    /// The server describes one scenario.
    Scenario {
        key: String,
        min_version: i32,
        last_mod_version: i32,
        options: String,
        title: String,
        description: Option<String>,
    },
    /// The server has never heard of `key`.
    UnknownKey { key: String },
    /// Ends the server's replies to an any-changed request.
    NoMoreScenarios,
}

/// Scenario requests from a client and the server's answers.
///
/// Wire: `1101|[|SC_FOG|SC_4ISL|?` for a request, and
/// `1101|SC_4ISL|2000|2000|_SC_SEAC=t,SBL=t,VP=t12|4 islands|long desc`
/// for an answer. Every parameter is separated by `|`, so titles and
/// descriptions may hold commas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScenarioInfo {
    content: ScenarioContent,
}

fn check_scenario_key(key: &str) -> Result<(), ProtocolError> {
    check_name("scenario key", key)?;
    if [SCENARIO_REQUEST, SCENARIO_ANY_CHANGED, SCENARIO_NO_MORE].contains(&key) {
        return Err(invalid(format!("scenario key {key:?} is a marker")));
    }
    Ok(())
}

impl ScenarioInfo {
    /// A client's request. `keys` may be empty only with `any_changed`.
    pub fn request(keys: Vec<String>, any_changed: bool) -> Result<Self, ProtocolError> {
        if keys.is_empty() && !any_changed {
            return Err(invalid("scenario request names no scenarios"));
        }
        for key in &keys {
            check_scenario_key(key)?;
        }
        Ok(Self {
            content: ScenarioContent::Request { keys, any_changed },
        })
    }

    /// The server's description of one scenario.
    pub fn scenario(
        key: impl Into<String>,
        min_version: i32,
        last_mod_version: i32,
        options: impl Into<String>,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, ProtocolError> {
        let (key, options, title) = (key.into(), options.into(), title.into());
        check_scenario_key(&key)?;
        if last_mod_version == SCENARIO_KEY_UNKNOWN {
            return Err(invalid("last modified version is the unknown-key marker"));
        }
        if options.is_empty() {
            return Err(invalid(format!("scenario {key} has no options")));
        }
        check_text("scenario options", &options, Some(SEP))?;
        if title.is_empty() {
            return Err(invalid(format!("scenario {key} has no title")));
        }
        check_text("scenario title", &title, Some(SEP))?;
        let description = description.filter(|d| !d.is_empty());
        if let Some(d) = &description {
            check_text("scenario description", d, Some(SEP))?;
        }
        Ok(Self {
            content: ScenarioContent::Scenario {
                key,
                min_version,
                last_mod_version,
                options,
                title,
                description,
            },
        })
    }

    /// The server's reply for a key it doesn't know.
    pub fn unknown_key(key: impl Into<String>) -> Result<Self, ProtocolError> {
        let key = key.into();
        check_scenario_key(&key)?;
        Ok(Self {
            content: ScenarioContent::UnknownKey { key },
        })
    }

    pub fn no_more_scenarios() -> Self {
        Self {
            content: ScenarioContent::NoMoreScenarios,
        }
    }

    pub fn content(&self) -> &ScenarioContent {
        &self.content
    }

    /// The scenario this reply is about, if it is a reply.
    pub fn key(&self) -> Option<&str> {
        match &self.content {
            ScenarioContent::Scenario { key, .. } | ScenarioContent::UnknownKey { key } => {
                Some(key)
            }
            _ => None,
        }
    }

    fn params(&self) -> Vec<String> {
        match &self.content {
            ScenarioContent::Request { keys, any_changed } => {
                let mut params = vec![SCENARIO_REQUEST.to_string()];
                params.extend(keys.iter().cloned());
                if *any_changed {
                    params.push(SCENARIO_ANY_CHANGED.to_string());
                }
                params
            }
            ScenarioContent::NoMoreScenarios => {
                let mut params = vec![SCENARIO_NO_MORE.to_string()];
                params.resize(5, String::new());
                params
            }
            _ => Vec::new(),
        }
    }
}

impl MessageBody for ScenarioInfo {
    fn write_wire(&self, out: &mut String) {
        match &self.content {
            ScenarioContent::Scenario {
                key,
                min_version,
                last_mod_version,
                options,
                title,
                description,
            } => {
                let _ = write!(
                    out,
                    "{key}{SEP}{min_version}{SEP}{last_mod_version}{SEP}{options}{SEP}{title}"
                );
                if let Some(d) = description {
                    let _ = write!(out, "{SEP}{d}");
                }
            }
            ScenarioContent::UnknownKey { key } => {
                let _ = write!(out, "{key}{SEP}0{SEP}{SCENARIO_KEY_UNKNOWN}");
            }
            _ => {
                let params = self.params();
                let encoded: Vec<&str> = params.iter().map(|p| field::encode_str(p)).collect();
                out.push_str(&encoded.join("|"));
            }
        }
    }

    fn write_debug(&self, out: &mut String) {
        match &self.content {
            ScenarioContent::Scenario {
                key,
                min_version,
                last_mod_version,
                options,
                title,
                description,
            } => {
                let _ = write!(
                    out,
                    "key={key}|minVers={min_version}|lastModVers={last_mod_version}\
                     |opts={options}|title={title}"
                );
                if let Some(d) = description {
                    let _ = write!(out, "|desc={d}");
                }
            }
            ScenarioContent::UnknownKey { key } => {
                let _ = write!(
                    out,
                    "key={key}|minVers=0|lastModVers={SCENARIO_KEY_UNKNOWN_NAME}"
                );
            }
            _ => {
                let rendered: Vec<String> =
                    self.params().iter().map(|p| format!("p={p}")).collect();
                out.push_str(&rendered.join("|"));
            }
        }
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::with_separator(data, SEP);
        let first = f.raw()?;
        if first == SCENARIO_REQUEST {
            let mut keys = Vec::with_capacity(f.remaining());
            while f.has_more() {
                keys.push(f.raw()?.to_string());
            }
            let any_changed = keys.last().is_some_and(|k| k == SCENARIO_ANY_CHANGED);
            if any_changed {
                keys.pop();
            }
            return f.build(Self::request(keys, any_changed));
        }
        if first == SCENARIO_NO_MORE {
            while f.has_more() {
                let index = f.index();
                if f.raw()? != field::EMPTYSTR {
                    return Err(DecodeError::malformed(index, "expected empty field"));
                }
            }
            return f.build(Ok(Self::no_more_scenarios()));
        }

        let key = first.to_string();
        let min_index = f.index();
        let min_version = f.int()?;
        let last_mod_version = f.int()?;
        if last_mod_version == SCENARIO_KEY_UNKNOWN {
            if min_version != 0 {
                return Err(DecodeError::malformed(min_index, "unknown key with a version"));
            }
            // Older servers pad the reply with empty options and title.
            while f.has_more() {
                let index = f.index();
                if f.raw()? != field::EMPTYSTR {
                    return Err(DecodeError::malformed(index, "expected empty field"));
                }
            }
            return f.build(Self::unknown_key(key));
        }
        let options = f.string()?;
        let title = f.string()?;
        let description = if f.has_more() { Some(f.string()?) } else { None };
        f.build(Self::scenario(
            key,
            min_version,
            last_mod_version,
            options,
            title,
            description,
        ))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        if f.has(&["p"]) {
            let mut params = Vec::new();
            while let Some(p) = f.opt_value(&["p"]) {
                params.push(p);
            }
            f.finish()?;
            return match params.as_slice() {
                [SCENARIO_NO_MORE, rest @ ..] if rest.iter().all(|p| p.is_empty()) => {
                    Ok(Self::no_more_scenarios())
                }
                [SCENARIO_REQUEST, keys @ ..] => {
                    let (keys, any_changed) = match keys {
                        [head @ .., SCENARIO_ANY_CHANGED] => (head, true),
                        _ => (keys, false),
                    };
                    let keys = keys.iter().map(|k| k.to_string()).collect();
                    Ok(Self::request(keys, any_changed)?)
                }
                _ => Err(ParseError::malformed("p", format!("unexpected params {params:?}"))),
            };
        }

        let key = f.string(&["key"])?;
        let min_version = f.int(&["minVers"])?;
        let last_mod = f.value(&["lastModVers"])?;
        if last_mod == SCENARIO_KEY_UNKNOWN_NAME {
            if min_version != 0 {
                return Err(ParseError::malformed("minVers", "unknown key with a version"));
            }
            f.finish()?;
            return Ok(Self::unknown_key(key)?);
        }
        let last_mod_version = field::parse_int("lastModVers", last_mod)?;
        let options = f.string(&["opts"])?;
        let title = f.string(&["title"])?;
        let description = f.opt_value(&["desc"]).map(str::to_string);
        f.finish()?;
        Ok(Self::scenario(
            key,
            min_version,
            last_mod_version,
            options,
            title,
            description,
        )?)
    }
}

// ---------------------------------------------------------------------------
// Game stats
// ---------------------------------------------------------------------------

/// End-of-game scores, and which seats were robots.
///
/// Wire: `1061|ga,10,4,3,2,false,true,true,true`; the first half of the
/// values are scores. The debug form prints the values without names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameStats {
    game: String,
    scores: Vec<i32>,
    robots: Vec<bool>,
}

impl GameStats {
    pub fn new(
        game: impl Into<String>,
        scores: Vec<i32>,
        robots: Vec<bool>,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        if scores.is_empty() || scores.len() != robots.len() {
            return Err(invalid(format!(
                "{} scores and {} robot flags",
                scores.len(),
                robots.len()
            )));
        }
        Ok(Self {
            game,
            scores,
            robots,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn scores(&self) -> &[i32] {
        &self.scores
    }

    pub fn robots(&self) -> &[bool] {
        &self.robots
    }
}

impl MessageBody for GameStats {
    fn write_wire(&self, out: &mut String) {
        out.push_str(&self.game);
        field::write_sep2_each(out, &self.scores);
        field::write_sep2_each(out, &self.robots);
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "game={}", self.game);
        for score in &self.scores {
            let _ = write!(out, "|{score}");
        }
        for robot in &self.robots {
            let _ = write!(out, "|{robot}");
        }
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let remaining = f.remaining();
        if remaining == 0 || remaining % 2 != 0 {
            return Err(DecodeError::ArityMismatch {
                expected: 1 + remaining.max(1).next_multiple_of(2),
                found: 1 + remaining,
            });
        }
        let seats = remaining / 2;
        let scores = (0..seats).map(|_| f.int()).collect::<Result<Vec<_>, _>>()?;
        let robots = (0..seats).map(|_| f.bool()).collect::<Result<Vec<_>, _>>()?;
        f.build(Self::new(game, scores, robots))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let mut values = Vec::new();
        while let Some(v) = f.next_raw() {
            values.push(v);
        }
        if values.is_empty() || values.len() % 2 != 0 {
            return Err(ParseError::ArityMismatch {
                expected: 1 + values.len().max(1).next_multiple_of(2),
                found: 1 + values.len(),
            });
        }
        let (scores, robots) = values.split_at(values.len() / 2);
        let scores = scores
            .iter()
            .map(|v| field::parse_int("score", v))
            .collect::<Result<Vec<_>, _>>()?;
        let robots = robots
            .iter()
            .map(|v| field::parse_bool("robot", v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(game, scores, robots)?)
    }
}
