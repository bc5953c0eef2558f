//! Player-to-player trade offers and trades with the bank or a port.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::{MessageBody, check_name};
use crate::error::{DecodeError, ParseError, ProtocolError, invalid};
use crate::field::{self, DebugFields, SEP2, WireFields};
use crate::types::ResourceSet;

game_message! {
    /// A player accepted another player's offer.
    AcceptOffer {
        accepting: ["accepting"],
        offering: ["offering"],
    }
}

game_message! {
    /// A player rejected the offers made to them.
    RejectOffer {
        player_number: ["playerNumber"],
    }
}

game_message! {
    /// A player withdrew their offer.
    ClearOffer {
        player_number: ["playerNumber"],
    }
}

game_message! {
    /// Clear a player's trade message area, or everyone's with -1.
    ClearTradeMsg {
        player_number: ["playerNumber"],
    }
}

/// Trade offers carry known resources only, in non-negative amounts.
fn check_trade_set(what: &str, set: &ResourceSet) -> Result<(), ProtocolError> {
    if set.unknown() != 0 {
        return Err(invalid(format!("{what} has unknown resources: {set}")));
    }
    if set.known_amounts().iter().any(|a| *a < 0) {
        return Err(invalid(format!("{what} has a negative amount: {set}")));
    }
    Ok(())
}

/// One player's offer: what they give, what they want, and which seats
/// the offer is open to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeOffer {
    from: i32,
    to: Vec<bool>,
    give: ResourceSet,
    get: ResourceSet,
}

impl TradeOffer {
    /// `to` has one flag per seat.
    pub fn new(
        from: i32,
        to: Vec<bool>,
        give: ResourceSet,
        get: ResourceSet,
    ) -> Result<Self, ProtocolError> {
        if to.is_empty() {
            return Err(invalid("offer is open to no seats"));
        }
        check_trade_set("give", &give)?;
        check_trade_set("get", &get)?;
        Ok(Self { from, to, give, get })
    }

    pub fn from(&self) -> i32 {
        self.from
    }

    pub fn to(&self) -> &[bool] {
        &self.to
    }

    pub fn give(&self) -> ResourceSet {
        self.give
    }

    pub fn get(&self) -> ResourceSet {
        self.get
    }
}

/// A trade offer made to other players.
///
/// Wire: `1041|ga,3,false,false,true,false,0,1,0,1,0,0,0,1,0,0`. The
/// number of seat flags is whatever is left after the ten amounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MakeOffer {
    game: String,
    offer: TradeOffer,
}

impl MakeOffer {
    pub fn new(
        game: impl Into<String>,
        offer: TradeOffer,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        Ok(Self { game, offer })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn offer(&self) -> &TradeOffer {
        &self.offer
    }
}

const TRADE_AMOUNTS: usize = 10;

impl MessageBody for MakeOffer {
    fn write_wire(&self, out: &mut String) {
        let o = &self.offer;
        let _ = write!(out, "{}{SEP2}{}", self.game, o.from);
        field::write_sep2_each(out, &o.to);
        field::write_sep2_each(out, &o.give.known_amounts());
        field::write_sep2_each(out, &o.get.known_amounts());
    }

    fn write_debug(&self, out: &mut String) {
        let o = &self.offer;
        let _ = write!(
            out,
            "game={}|offer=game={}|from={}|to=",
            self.game, self.game, o.from
        );
        for (i, flag) in o.to.iter().enumerate() {
            if i > 0 {
                out.push(SEP2);
            }
            let _ = write!(out, "{flag}");
        }
        let _ = write!(out, "|give={}|get={}", o.give, o.get);
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let from = f.int()?;
        let seats = f.remaining().saturating_sub(TRADE_AMOUNTS);
        if seats == 0 {
            return Err(DecodeError::ArityMismatch {
                expected: f.index() + TRADE_AMOUNTS + 1,
                found: f.index() + f.remaining(),
            });
        }
        let to = (0..seats).map(|_| f.bool()).collect::<Result<Vec<_>, _>>()?;
        let give = f.known_resources()?;
        let get = f.known_resources()?;
        f.build(TradeOffer::new(from, to, give, get).and_then(|offer| Self::new(game, offer)))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let offer_game = f.value(&["offer"])?;
        // The offer repeats the game as `offer=game=ga`.
        if offer_game.strip_prefix("game=") != Some(game.as_str()) {
            return Err(ParseError::malformed(
                "offer",
                format!("expected game={game}, got {offer_game:?}"),
            ));
        }
        let from = f.int(&["from"])?;
        let to = f
            .list(&["to"])?
            .iter()
            .map(|flag| field::parse_bool("to", flag))
            .collect::<Result<Vec<_>, _>>()?;
        let give = f.resource_set(&["give"])?;
        let get = f.resource_set(&["get"])?;
        f.finish()?;
        Ok(Self::new(game, TradeOffer::new(from, to, give, get)?)?)
    }
}

/// A trade with the bank or a port, and the server's reply to it.
///
/// Wire: `1040|ga,0,0,2,0,0,1,0,0,0,0,3`. The server's reply carries the
/// trading player's number, or a negative reason code when the trade was
/// refused. Client requests may leave the player number off.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BankTrade {
    game: String,
    give: ResourceSet,
    get: ResourceSet,
    player_number: i32,
}

impl BankTrade {
    /// Refusal code: it isn't the player's turn.
    pub const PN_REPLY_NOT_YOUR_TURN: i32 = -3;
    /// Refusal code: the trade can't be made right now.
    pub const PN_REPLY_CANNOT_MAKE_TRADE: i32 = -2;
    /// Player number of a client request that didn't name one.
    pub const PN_UNSET: i32 = -1;

    pub fn new(
        game: impl Into<String>,
        give: ResourceSet,
        get: ResourceSet,
        player_number: i32,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        check_trade_set("give", &give)?;
        check_trade_set("get", &get)?;
        Ok(Self {
            game,
            give,
            get,
            player_number,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn give(&self) -> ResourceSet {
        self.give
    }

    pub fn get(&self) -> ResourceSet {
        self.get
    }

    pub fn player_number(&self) -> i32 {
        self.player_number
    }
}

impl MessageBody for BankTrade {
    fn write_wire(&self, out: &mut String) {
        out.push_str(&self.game);
        field::write_sep2_each(out, &self.give.known_amounts());
        field::write_sep2_each(out, &self.get.known_amounts());
        let _ = write!(out, "{SEP2}{}", self.player_number);
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "game={}|give={}|get={}|pn={}",
            self.game, self.give, self.get, self.player_number
        );
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let give = f.known_resources()?;
        let get = f.known_resources()?;
        let player_number = if f.has_more() { f.int()? } else { Self::PN_UNSET };
        f.build(Self::new(game, give, get, player_number))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let give = f.resource_set(&["give"])?;
        let get = f.resource_set(&["get"])?;
        let player_number = match f.opt_value(&["pn"]) {
            Some(pn) => field::parse_int("pn", pn)?,
            None => Self::PN_UNSET,
        };
        f.finish()?;
        Ok(Self::new(game, give, get, player_number)?)
    }
}
