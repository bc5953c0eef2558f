//! Turn flow: game state, dice, discards, the robber, and board resets.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::{MessageBody, check_name};
use crate::error::{DecodeError, ParseError, ProtocolError, invalid};
use crate::field::{self, DebugFields, SEP, SEP2, WireFields};
use crate::types::{PLAYER_ELEMENT_TYPES, ResourceSet};

game_message! {
    /// The game moved to a new state.
    GameState {
        state: ["state"],
    }
}

game_message! {
    /// Sets whose turn it is, without the other effects of a new turn.
    SetTurn {
        player_number: ["param", "playerNumber"],
    }
}

game_message! {
    /// The player who goes first.
    FirstPlayer {
        player_number: ["playerNumber"],
    }
}

game_message! {
    /// Client asks to roll the dice.
    RollDice {}
}

game_message! {
    /// Client ends its turn.
    EndTurn {}
}

game_message! {
    /// Prompts a player to roll or play a card.
    RollDicePrompt {
        player_number: ["playerNumber"],
    }
}

game_message! {
    /// The dice total of a roll.
    DiceResult {
        result: ["param", "result"],
    }
}

game_message! {
    /// A player must discard this many resources.
    DiscardRequest {
        num_discards: ["numDiscards"],
    }
}

game_message! {
    /// The player a robbing player chose to steal from, or a negative
    /// choice code.
    ChoosePlayer {
        choice: ["choice"],
    }
}

game_message! {
    /// The robber or pirate moved. A negative coordinate is the pirate.
    MoveRobber {
        player_number: ["playerNumber"],
        coord: ["coord"] as Hex,
    }
}

game_message! {
    /// Client asks to reset the board, which starts a vote.
    ResetBoardRequest {}
}

game_message! {
    /// The board reset was voted down.
    ResetBoardReject {}
}

game_message! {
    /// The board was reset; `rejoin_pn` rejoins at its old seat.
    ResetBoardAuth {
        rejoin_pn: ["rejoinPN", "param1"],
        requesting_pn: ["requestingPN", "param2"],
    }
}

game_message! {
    /// Asks the other players to vote on a board reset.
    ResetBoardVoteRequest {
        requesting_pn: ["param"],
    }
}

game_message! {
    /// A request from a client, answered by the server with a
    /// [`SimpleAction`] or a rejection.
    SimpleRequest {
        player_number: ["pn"],
        request_type: ["reqType"],
        value1: ["v1"],
        value2: ["v2"],
    }
}

game_message! {
    /// A small game action announced by the server.
    SimpleAction {
        player_number: ["pn"],
        action_type: ["actType"],
        value1: ["v1"],
        value2: ["v2"],
    }
}

/// Start of a player's turn.
///
/// Wire: `1026|ga,3` or `1026|ga,3,15`; a game state of 0 is not sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    game: String,
    player_number: i32,
    game_state: i32,
}

impl Turn {
    /// `game_state` 0 means the client keeps its current state.
    pub fn new(
        game: impl Into<String>,
        player_number: i32,
        game_state: i32,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        Ok(Self {
            game,
            player_number,
            game_state,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn player_number(&self) -> i32 {
        self.player_number
    }

    pub fn game_state(&self) -> i32 {
        self.game_state
    }
}

impl MessageBody for Turn {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(out, "{}{SEP2}{}", self.game, self.player_number);
        if self.game_state != 0 {
            let _ = write!(out, "{SEP2}{}", self.game_state);
        }
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "game={}|playerNumber={}", self.game, self.player_number);
        if self.game_state != 0 {
            let _ = write!(out, "|gameState={}", self.game_state);
        }
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let player_number = f.int()?;
        let game_state = if f.has_more() { f.int()? } else { 0 };
        f.build(Self::new(game, player_number, game_state))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let player_number = f.int(&["playerNumber"])?;
        let game_state = match f.opt_value(&["gameState"]) {
            Some(v) => field::parse_int("gameState", v)?,
            None => 0,
        };
        f.finish()?;
        Ok(Self::new(game, player_number, game_state)?)
    }
}

/// Resources a player discards.
///
/// Wire: `1033|ga,2,1,3,1,2,0`, all six amounts including unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Discard {
    game: String,
    resources: ResourceSet,
}

impl Discard {
    pub fn new(
        game: impl Into<String>,
        resources: ResourceSet,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        if resources.all_amounts().iter().any(|a| *a < 0) {
            return Err(invalid(format!("negative discard amount in {resources}")));
        }
        Ok(Self { game, resources })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn resources(&self) -> ResourceSet {
        self.resources
    }
}

impl MessageBody for Discard {
    fn write_wire(&self, out: &mut String) {
        out.push_str(&self.game);
        field::write_sep2_each(out, &self.resources.all_amounts());
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "game={}|resources={}", self.game, self.resources);
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let resources = ResourceSet::new(
            f.int()?,
            f.int()?,
            f.int()?,
            f.int()?,
            f.int()?,
            f.int()?,
        );
        f.build(Self::new(game, resources))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let resources = f.resource_set(&["resources"])?;
        f.finish()?;
        Ok(Self::new(game, resources)?)
    }
}

/// Asks the current player to choose whom to rob.
///
/// Wire: `1036|ga,true,false,false,true`, one flag per seat, with `NONE`
/// after the game name when choosing nobody is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChoosePlayerRequest {
    game: String,
    choices: Vec<bool>,
    can_choose_none: bool,
}

const CHOOSE_NONE: &str = "NONE";

impl ChoosePlayerRequest {
    pub fn new(
        game: impl Into<String>,
        choices: Vec<bool>,
        can_choose_none: bool,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        if choices.is_empty() {
            return Err(invalid("choice list is empty"));
        }
        Ok(Self {
            game,
            choices,
            can_choose_none,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    /// Which seats may be chosen.
    pub fn choices(&self) -> &[bool] {
        &self.choices
    }

    pub fn can_choose_none(&self) -> bool {
        self.can_choose_none
    }
}

impl MessageBody for ChoosePlayerRequest {
    fn write_wire(&self, out: &mut String) {
        out.push_str(&self.game);
        if self.can_choose_none {
            out.push(SEP2);
            out.push_str(CHOOSE_NONE);
        }
        field::write_sep2_each(out, &self.choices);
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "game={}", self.game);
        if self.can_choose_none {
            out.push_str("|canChooseNone=true");
        }
        out.push_str("|choices=");
        field::write_list(out, &self.choices);
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let can_choose_none = f.peek() == Some(CHOOSE_NONE);
        if can_choose_none {
            f.raw()?;
        }
        let mut choices = Vec::with_capacity(f.remaining());
        while f.has_more() {
            choices.push(f.bool()?);
        }
        if choices.is_empty() {
            return Err(DecodeError::ArityMismatch {
                expected: f.index() + 1,
                found: f.index(),
            });
        }
        f.build(Self::new(game, choices, can_choose_none))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let can_choose_none = match f.opt_value(&["canChooseNone"]) {
            Some(v) => field::parse_bool("canChooseNone", v)?,
            None => false,
        };
        let choices = f
            .list(&["choices"])?
            .iter()
            .map(|v| field::parse_bool("choices", v))
            .collect::<Result<Vec<_>, _>>()?;
        f.finish()?;
        Ok(Self::new(game, choices, can_choose_none)?)
    }
}

/// A player's vote on a board reset.
///
/// Wire: `1076|ga,3,1`; the vote is `1` for yes and `0` for no.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResetBoardVote {
    game: String,
    player_number: i32,
    vote: bool,
}

impl ResetBoardVote {
    pub fn new(
        game: impl Into<String>,
        player_number: i32,
        vote: bool,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        Ok(Self {
            game,
            player_number,
            vote,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn player_number(&self) -> i32 {
        self.player_number
    }

    pub fn vote(&self) -> bool {
        self.vote
    }
}

fn vote_from_int(v: i32) -> Option<bool> {
    match v {
        1 => Some(true),
        0 => Some(false),
        _ => None,
    }
}

impl MessageBody for ResetBoardVote {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}",
            self.game,
            self.player_number,
            i32::from(self.vote)
        );
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "game={}|pn={}|vote={}",
            self.game,
            self.player_number,
            i32::from(self.vote)
        );
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let player_number = f.int()?;
        let index = f.index();
        let vote = vote_from_int(f.int()?)
            .ok_or_else(|| DecodeError::malformed(index, "vote must be 1 or 0"))?;
        f.build(Self::new(game, player_number, vote))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let player_number = f.int(&["pn", "param1"])?;
        let vote = vote_from_int(f.int(&["vote", "param2"])?)
            .ok_or_else(|| ParseError::malformed("vote", "vote must be 1 or 0"))?;
        f.finish()?;
        Ok(Self::new(game, player_number, vote)?)
    }
}

// ---------------------------------------------------------------------------
// Robbery
// ---------------------------------------------------------------------------

/// What was taken in a robbery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Robbed {
    /// Some amount of one resource type, possibly unknown (6).
    Resource { res_type: i32, amount: i32 },
    /// Several resource types at once.
    Resources(ResourceSet),
    /// A player element such as scenario cloth.
    Element { element_type: i32, amount: i32 },
}

/// Result of a robbery, reported to the players involved.
///
/// Wire: `1102|ga,perp,victim,` then `R,resType,amount`, or `S` and
/// `type,amount` pairs, or `E,elementType,amount`; then `T` or `F` for
/// gain/lose versus a new total, and the optional victim amount and extra
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportRobbery {
    game: String,
    perpetrator: i32,
    victim: i32,
    robbed: Robbed,
    is_gain_lose: bool,
    victim_amount: i32,
    extra_value: i32,
}

impl ReportRobbery {
    /// `perpetrator` and `victim` may be -1 when not revealed to the
    /// recipient. When `is_gain_lose` is false, `amount` and
    /// `victim_amount` are new totals.
    pub fn new(
        game: impl Into<String>,
        perpetrator: i32,
        victim: i32,
        robbed: Robbed,
        is_gain_lose: bool,
        victim_amount: i32,
        extra_value: i32,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        match robbed {
            Robbed::Resources(set) => {
                if !is_gain_lose || victim_amount != 0 {
                    return Err(invalid("a resource set robbery is always gain/lose"));
                }
                if set.unknown() != 0 || set.nonzero_known().next().is_none() {
                    return Err(invalid(format!(
                        "robbed set must hold known resources only: {set}"
                    )));
                }
            }
            Robbed::Element { element_type, .. } => {
                if PLAYER_ELEMENT_TYPES.name(element_type).is_none() {
                    return Err(invalid(format!(
                        "unknown player element type {element_type}"
                    )));
                }
            }
            Robbed::Resource { .. } => {}
        }
        Ok(Self {
            game,
            perpetrator,
            victim,
            robbed,
            is_gain_lose,
            victim_amount,
            extra_value,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn perpetrator(&self) -> i32 {
        self.perpetrator
    }

    pub fn victim(&self) -> i32 {
        self.victim
    }

    pub fn robbed(&self) -> Robbed {
        self.robbed
    }

    pub fn is_gain_lose(&self) -> bool {
        self.is_gain_lose
    }

    pub fn victim_amount(&self) -> i32 {
        self.victim_amount
    }

    pub fn extra_value(&self) -> i32 {
        self.extra_value
    }
}

fn starts_like_int(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_digit() || c == '-')
}

impl MessageBody for ReportRobbery {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}{SEP2}",
            self.game, self.perpetrator, self.victim
        );
        match self.robbed {
            Robbed::Resources(set) => {
                out.push('S');
                for (res_type, amount) in set.nonzero_known() {
                    let _ = write!(out, "{SEP2}{res_type}{SEP2}{amount}");
                }
            }
            Robbed::Element {
                element_type,
                amount,
            } => {
                let _ = write!(out, "E{SEP2}{element_type}{SEP2}{amount}");
            }
            Robbed::Resource { res_type, amount } => {
                let _ = write!(out, "R{SEP2}{res_type}{SEP2}{amount}");
            }
        }
        out.push(SEP2);
        out.push(if self.is_gain_lose { 'T' } else { 'F' });
        if self.victim_amount != 0 || self.extra_value != 0 {
            let _ = write!(out, "{SEP2}{}", self.victim_amount);
            if self.extra_value != 0 {
                let _ = write!(out, "{SEP2}{}", self.extra_value);
            }
        }
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "game={}|perp={}|victim={}",
            self.game, self.perpetrator, self.victim
        );
        match self.robbed {
            Robbed::Resources(set) => {
                let _ = write!(out, "|resSet={set}");
            }
            Robbed::Element {
                element_type,
                amount,
            } => {
                let _ = write!(
                    out,
                    "|peType={}|amount={amount}",
                    PLAYER_ELEMENT_TYPES.display(element_type)
                );
            }
            Robbed::Resource { res_type, amount } => {
                let _ = write!(out, "|resType={res_type}|amount={amount}");
            }
        }
        let _ = write!(out, "|isGainLose={}", self.is_gain_lose);
        if self.victim_amount != 0 || !self.is_gain_lose {
            let _ = write!(out, "|victimAmount={}", self.victim_amount);
        }
        if self.extra_value != 0 {
            let _ = write!(out, "|extraValue={}", self.extra_value);
        }
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let perpetrator = f.int()?;
        let victim = f.int()?;
        let kind_index = f.index();
        let robbed = match f.raw()? {
            "S" => {
                let mut set = ResourceSet::EMPTY;
                loop {
                    let index = f.index();
                    let res_type = f.int()?;
                    let amount = f.int()?;
                    set = set
                        .add_listed(res_type, amount)
                        .map_err(|reason| DecodeError::malformed(index, reason))?;
                    if !f.peek().is_some_and(starts_like_int) {
                        break;
                    }
                }
                Robbed::Resources(set)
            }
            "R" => Robbed::Resource {
                res_type: f.int()?,
                amount: f.int()?,
            },
            "E" => Robbed::Element {
                element_type: f.int()?,
                amount: f.int()?,
            },
            other => {
                return Err(DecodeError::malformed(
                    kind_index,
                    format!("expected R, S, or E, got {other:?}"),
                ));
            }
        };
        let flag_index = f.index();
        let is_gain_lose = match f.raw()? {
            "T" => true,
            "F" => false,
            other => {
                return Err(DecodeError::malformed(
                    flag_index,
                    format!("expected T or F, got {other:?}"),
                ));
            }
        };
        let victim_amount = if f.has_more() { f.int()? } else { 0 };
        let extra_value = if f.has_more() { f.int()? } else { 0 };
        f.build(Self::new(
            game,
            perpetrator,
            victim,
            robbed,
            is_gain_lose,
            victim_amount,
            extra_value,
        ))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let perpetrator = f.int(&["perp"])?;
        let victim = f.int(&["victim"])?;
        let robbed = if f.has(&["resSet"]) {
            Robbed::Resources(f.resource_set(&["resSet"])?)
        } else if let Some(name) = f.opt_value(&["peType"]) {
            let element_type = PLAYER_ELEMENT_TYPES.parse(name).ok_or_else(|| {
                ParseError::malformed("peType", format!("unknown element type {name:?}"))
            })?;
            Robbed::Element {
                element_type,
                amount: f.int(&["amount"])?,
            }
        } else {
            Robbed::Resource {
                res_type: f.int(&["resType"])?,
                amount: f.int(&["amount"])?,
            }
        };
        let is_gain_lose = f.bool(&["isGainLose"])?;
        let victim_amount = match f.opt_value(&["victimAmount"]) {
            Some(v) => field::parse_int("victimAmount", v)?,
            None => 0,
        };
        let extra_value = match f.opt_value(&["extraValue"]) {
            Some(v) => field::parse_int("extraValue", v)?,
            None => 0,
        };
        f.finish()?;
        Ok(Self::new(
            game,
            perpetrator,
            victim,
            robbed,
            is_gain_lose,
            victim_amount,
            extra_value,
        )?)
    }
}

// ---------------------------------------------------------------------------
// Dice result resources
// ---------------------------------------------------------------------------

/// One player's gains from a dice roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRoll {
    pub player_number: i32,
    /// The player's new total resource count.
    pub total: i32,
    pub gained: ResourceSet,
}

/// Resources gained by each player from a roll, with their new totals.
///
/// Wire: `1092|ga|2|1|6|4|1|2|5|0|3|7|2|2|5|4`. After the player count,
/// each player is `pn|total` then `amount|type` pairs, and a 0 separates
/// one player from the next.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceResultResources {
    game: String,
    rolls: Vec<PlayerRoll>,
}

impl DiceResultResources {
    pub fn new(
        game: impl Into<String>,
        rolls: Vec<PlayerRoll>,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        if rolls.is_empty() {
            return Err(invalid("no players gained resources"));
        }
        for roll in &rolls {
            let gained = roll.gained;
            if gained.unknown() != 0 || gained.nonzero_known().next().is_none() {
                return Err(invalid(format!(
                    "player {} must gain known resources, got {gained}",
                    roll.player_number
                )));
            }
        }
        Ok(Self { game, rolls })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn rolls(&self) -> &[PlayerRoll] {
        &self.rolls
    }

    fn to_ints(&self) -> Vec<i32> {
        let mut ints = vec![self.rolls.len() as i32];
        for (i, roll) in self.rolls.iter().enumerate() {
            if i > 0 {
                ints.push(0);
            }
            ints.push(roll.player_number);
            ints.push(roll.total);
            for (res_type, amount) in roll.gained.nonzero_known() {
                ints.push(amount);
                ints.push(res_type);
            }
        }
        ints
    }

    fn rolls_from_ints(ints: &[i32]) -> Result<Vec<PlayerRoll>, String> {
        let (&count, mut rest) = ints.split_first().ok_or("missing player count")?;
        let mut rolls = Vec::new();
        while !rest.is_empty() {
            let [player_number, total, tail @ ..] = rest else {
                return Err("player entry ends early".to_string());
            };
            let mut gained = ResourceSet::EMPTY;
            rest = tail;
            loop {
                match rest {
                    [] => break,
                    [0, tail @ ..] => {
                        rest = tail;
                        break;
                    }
                    [amount, res_type, tail @ ..] => {
                        gained = gained.add_listed(*res_type, *amount)?;
                        rest = tail;
                    }
                    [_] => return Err("resource amount without a type".to_string()),
                }
            }
            rolls.push(PlayerRoll {
                player_number: *player_number,
                total: *total,
                gained,
            });
        }
        if usize::try_from(count).ok() != Some(rolls.len()) {
            return Err(format!(
                "player count {count} but {} players listed",
                rolls.len()
            ));
        }
        Ok(rolls)
    }
}

impl MessageBody for DiceResultResources {
    fn write_wire(&self, out: &mut String) {
        out.push_str(&self.game);
        for v in self.to_ints() {
            let _ = write!(out, "{SEP}{v}");
        }
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "game={}", self.game);
        for v in self.to_ints() {
            let _ = write!(out, "|p={v}");
        }
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::with_separator(data, SEP);
        let game = f.name("game")?;
        let ints = f.ints()?;
        let rolls =
            Self::rolls_from_ints(&ints).map_err(|reason| DecodeError::malformed(1, reason))?;
        f.build(Self::new(game, rolls))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let mut ints = Vec::new();
        while let Some(v) = f.opt_value(&["p"]) {
            ints.push(field::parse_int("p", v)?);
        }
        f.finish()?;
        let rolls =
            Self::rolls_from_ints(&ints).map_err(|reason| ParseError::malformed("p", reason))?;
        Ok(Self::new(game, rolls)?)
    }
}
