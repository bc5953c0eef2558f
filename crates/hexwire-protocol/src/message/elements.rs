//! Player and game element updates, resource counts, and player stats.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::{MessageBody, check_name};
use crate::error::{DecodeError, ParseError, ProtocolError, invalid};
use crate::field::{self, DebugFields, SEP, SEP2, WireFields};
use crate::types::{ElementAction, ResourceSet, resource};

game_message! {
    /// Number of resources a player holds, without their types.
    ResourceCount {
        player_number: ["playerNumber"],
        count: ["count"],
    }
}

fn parse_action_wire(index: usize, value: i32) -> Result<ElementAction, DecodeError> {
    ElementAction::from_value(value).ok_or_else(|| {
        DecodeError::malformed(index, format!("unknown element action {value}"))
    })
}

fn parse_action_debug(value: &str) -> Result<ElementAction, ParseError> {
    ElementAction::parse(value).ok_or_else(|| {
        ParseError::malformed("actionType", format!("unknown action {value:?}"))
    })
}

/// Writes `e1=1,e3=2`.
fn write_pairs(out: &mut String, pairs: &[(i32, i32)]) {
    for (i, (element_type, value)) in pairs.iter().enumerate() {
        if i > 0 {
            out.push(SEP2);
        }
        let _ = write!(out, "e{element_type}={value}");
    }
}

/// Reads `e1=1,e3=2` back into pairs.
fn parse_pairs(text: &str) -> Result<Vec<(i32, i32)>, ParseError> {
    text.split(SEP2)
        .map(|piece| {
            let (name, value) = piece
                .strip_prefix('e')
                .and_then(|p| p.split_once('='))
                .ok_or_else(|| {
                    ParseError::malformed("elements", format!("expected eN=V, got {piece:?}"))
                })?;
            Ok((field::parse_int("elements", name)?, field::parse_int("elements", value)?))
        })
        .collect()
}

/// Reads `type|value|type|value...` to the end of the line.
fn pairs_from_wire(f: &mut WireFields<'_>) -> Result<Vec<(i32, i32)>, DecodeError> {
    let first = f.index();
    let ints = f.ints()?;
    if ints.is_empty() || ints.len() % 2 != 0 {
        return Err(DecodeError::malformed(
            first,
            format!("expected type and value pairs, got {} values", ints.len()),
        ));
    }
    Ok(ints.chunks_exact(2).map(|p| (p[0], p[1])).collect())
}

fn check_pairs(pairs: &[(i32, i32)]) -> Result<(), ProtocolError> {
    if pairs.is_empty() {
        Err(invalid("no elements"))
    } else {
        Ok(())
    }
}

/// One element of a player's state changed.
///
/// Wire: `1024|ga,1,100,105,1`. A trailing `Y` marks the change as news
/// the client should announce, such as a resource gained from a roll.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerElement {
    game: String,
    player_number: i32,
    action: ElementAction,
    element_type: i32,
    amount: i32,
    news: bool,
}

impl PlayerElement {
    pub fn new(
        game: impl Into<String>,
        player_number: i32,
        action: ElementAction,
        element_type: i32,
        amount: i32,
    ) -> Result<Self, ProtocolError> {
        Self::with_news(game, player_number, action, element_type, amount, false)
    }

    pub fn with_news(
        game: impl Into<String>,
        player_number: i32,
        action: ElementAction,
        element_type: i32,
        amount: i32,
        news: bool,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        Ok(Self {
            game,
            player_number,
            action,
            element_type,
            amount,
            news,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn player_number(&self) -> i32 {
        self.player_number
    }

    pub fn action(&self) -> ElementAction {
        self.action
    }

    pub fn element_type(&self) -> i32 {
        self.element_type
    }

    pub fn amount(&self) -> i32 {
        self.amount
    }

    pub fn is_news(&self) -> bool {
        self.news
    }
}

const NEWS_MARKER: &str = "Y";

impl MessageBody for PlayerElement {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}{SEP2}{}{SEP2}{}",
            self.game,
            self.player_number,
            self.action.value(),
            self.element_type,
            self.amount
        );
        if self.news {
            let _ = write!(out, "{SEP2}{NEWS_MARKER}");
        }
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "game={}|playerNum={}|actionType={}|elementType={}|amount={}",
            self.game,
            self.player_number,
            self.action.debug_name(),
            self.element_type,
            self.amount
        );
        if self.news {
            let _ = write!(out, "|news={NEWS_MARKER}");
        }
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let player_number = f.int()?;
        let action = parse_action_wire(f.index(), f.int()?)?;
        let element_type = f.int()?;
        let amount = f.int()?;
        let news = if f.has_more() {
            let index = f.index();
            match f.raw()? {
                NEWS_MARKER => true,
                other => {
                    return Err(DecodeError::malformed(
                        index,
                        format!("expected news marker, got {other:?}"),
                    ));
                }
            }
        } else {
            false
        };
        f.build(Self::with_news(
            game,
            player_number,
            action,
            element_type,
            amount,
            news,
        ))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let player_number = f.int(&["playerNum"])?;
        let action = parse_action_debug(f.value(&["actionType"])?)?;
        let element_type = f.int(&["elementType"])?;
        let amount = f.int(&["amount", "value"])?;
        let news = match f.opt_value(&["news"]) {
            Some(NEWS_MARKER) => true,
            Some(other) => {
                return Err(ParseError::malformed("news", format!("expected Y, got {other:?}")));
            }
            None => false,
        };
        f.finish()?;
        Ok(Self::with_news(game, player_number, action, element_type, amount, news)?)
    }
}

/// Several elements of one player's state changed by the same action.
///
/// Wire: `1086|ga|2|101|1|1|3|2`, a list of type and amount pairs after
/// the player and action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerElements {
    game: String,
    player_number: i32,
    action: ElementAction,
    elements: Vec<(i32, i32)>,
}

impl PlayerElements {
    /// `elements` holds `(element_type, amount)` pairs.
    pub fn new(
        game: impl Into<String>,
        player_number: i32,
        action: ElementAction,
        elements: Vec<(i32, i32)>,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        check_pairs(&elements)?;
        Ok(Self {
            game,
            player_number,
            action,
            elements,
        })
    }

    /// One element per nonzero resource type in `resources`.
    pub fn from_resources(
        game: impl Into<String>,
        player_number: i32,
        action: ElementAction,
        resources: &ResourceSet,
    ) -> Result<Self, ProtocolError> {
        let mut elements: Vec<(i32, i32)> = resources.nonzero_known().collect();
        if resources.unknown() != 0 {
            elements.push((resource::UNKNOWN, resources.unknown()));
        }
        Self::new(game, player_number, action, elements)
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn player_number(&self) -> i32 {
        self.player_number
    }

    pub fn action(&self) -> ElementAction {
        self.action
    }

    pub fn elements(&self) -> &[(i32, i32)] {
        &self.elements
    }
}

impl MessageBody for PlayerElements {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP}{}{SEP}{}",
            self.game,
            self.player_number,
            self.action.value()
        );
        for (element_type, amount) in &self.elements {
            let _ = write!(out, "{SEP}{element_type}{SEP}{amount}");
        }
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "game={}|playerNum={}|actionType={}|",
            self.game,
            self.player_number,
            self.action.debug_name()
        );
        write_pairs(out, &self.elements);
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::with_separator(data, SEP);
        let game = f.name("game")?;
        let player_number = f.int()?;
        let action = parse_action_wire(f.index(), f.int()?)?;
        let elements = pairs_from_wire(&mut f)?;
        f.build(Self::new(game, player_number, action, elements))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let player_number = f.int(&["playerNum"])?;
        let action = parse_action_debug(f.value(&["actionType"])?)?;
        let pairs = f
            .raw_rest()
            .ok_or_else(|| ParseError::MissingField("elements".into()))?;
        let elements = parse_pairs(pairs)?;
        Ok(Self::new(game, player_number, action, elements)?)
    }
}

/// Game element types carried by [`GameElements`]; names in
/// [`GAME_ELEMENT_TYPES`](crate::types::GAME_ELEMENT_TYPES).
pub mod game_element {
    pub const ROUND_COUNT: i32 = 1;
    pub const DEV_CARD_COUNT: i32 = 2;
    pub const FIRST_PLAYER: i32 = 3;
    pub const CURRENT_PLAYER: i32 = 4;
    pub const LARGEST_ARMY_PLAYER: i32 = 5;
    pub const LONGEST_ROAD_PLAYER: i32 = 6;
}

/// New values for elements of the game's state.
///
/// Wire: `1096|ga|2|25|1|2`, type and value pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameElements {
    game: String,
    elements: Vec<(i32, i32)>,
}

impl GameElements {
    /// `elements` holds `(element_type, value)` pairs.
    pub fn new(
        game: impl Into<String>,
        elements: Vec<(i32, i32)>,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        check_pairs(&elements)?;
        Ok(Self { game, elements })
    }

    pub fn single(
        game: impl Into<String>,
        element_type: i32,
        value: i32,
    ) -> Result<Self, ProtocolError> {
        Self::new(game, vec![(element_type, value)])
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn elements(&self) -> &[(i32, i32)] {
        &self.elements
    }
}

impl MessageBody for GameElements {
    fn write_wire(&self, out: &mut String) {
        out.push_str(&self.game);
        for (element_type, value) in &self.elements {
            let _ = write!(out, "{SEP}{element_type}{SEP}{value}");
        }
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "game={}|", self.game);
        write_pairs(out, &self.elements);
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::with_separator(data, SEP);
        let game = f.name("game")?;
        let elements = pairs_from_wire(&mut f)?;
        f.build(Self::new(game, elements))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let pairs = f
            .raw_rest()
            .ok_or_else(|| ParseError::MissingField("elements".into()))?;
        Ok(Self::new(game, parse_pairs(pairs)?)?)
    }
}

/// Player statistics of one kind, such as resources gained from rolls.
///
/// Wire: `1085|ga|1|0|2|0|5|0`: the stats type, then its values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerStats {
    game: String,
    stat_type: i32,
    values: Vec<i32>,
}

impl PlayerStats {
    /// Resources gained from dice rolls, clay through wood plus gold.
    pub const STYPE_RES_ROLL: i32 = 1;
    /// Trade counts.
    pub const STYPE_TRADES: i32 = 2;

    pub fn new(
        game: impl Into<String>,
        stat_type: i32,
        values: Vec<i32>,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        if values.is_empty() {
            return Err(invalid("no stat values"));
        }
        Ok(Self {
            game,
            stat_type,
            values,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn stat_type(&self) -> i32 {
        self.stat_type
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }
}

impl MessageBody for PlayerStats {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(out, "{}{SEP}{}", self.game, self.stat_type);
        for v in &self.values {
            let _ = write!(out, "{SEP}{v}");
        }
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "game={}|p={}", self.game, self.stat_type);
        for v in &self.values {
            let _ = write!(out, "|p={v}");
        }
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::with_separator(data, SEP);
        let game = f.name("game")?;
        let stat_type = f.int()?;
        let values = f.ints()?;
        if values.is_empty() {
            return Err(DecodeError::ArityMismatch {
                expected: 3,
                found: 2,
            });
        }
        f.build(Self::new(game, stat_type, values))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let stat_type = f.int(&["p"])?;
        let mut values = Vec::new();
        while let Some(v) = f.opt_value(&["p"]) {
            values.push(field::parse_int("p", v)?);
        }
        f.finish()?;
        Ok(Self::new(game, stat_type, values)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    fn forms(msg: impl Into<Message>) -> (String, String) {
        let msg = msg.into();
        (msg.to_wire(), msg.to_debug())
    }

    #[test]
    fn test_player_element_forms() {
        assert_eq!(
            forms(PlayerElement::new("ga", 1, ElementAction::Set, 105, 1).unwrap()),
            (
                "1024|ga,1,100,105,1".into(),
                "SOCPlayerElement:game=ga|playerNum=1|actionType=SET|elementType=105|amount=1"
                    .into()
            )
        );
        let news = PlayerElement::with_news("ga", 2, ElementAction::Lose, 4, 1, true).unwrap();
        assert_eq!(
            forms(news.clone()),
            (
                "1024|ga,2,102,4,1,Y".into(),
                "SOCPlayerElement:game=ga|playerNum=2|actionType=LOSE|elementType=4|amount=1|news=Y"
                    .into()
            )
        );
        assert_eq!(PlayerElement::parse_wire("ga,2,102,4,1,Y").unwrap(), news);
        assert!(PlayerElement::parse_wire("ga,2,102,4,1,N").is_err());
        assert!(PlayerElement::parse_wire("ga,2,103,4,1").is_err());
    }

    #[test]
    fn test_player_element_old_value_name() {
        let msg = PlayerElement::parse_debug(
            "game=ga|playerNum=1|actionType=GAIN|elementType=2|value=3",
        )
        .unwrap();
        assert_eq!(msg.amount(), 3);
        assert_eq!(msg.action(), ElementAction::Gain);
    }

    #[test]
    fn test_player_elements_from_resources() {
        let msg = PlayerElements::from_resources(
            "ga",
            2,
            ElementAction::Gain,
            &ResourceSet::new(1, 0, 2, 3, 4, 0),
        )
        .unwrap();
        assert_eq!(
            forms(msg.clone()),
            (
                "1086|ga|2|101|1|1|3|2|4|3|5|4".into(),
                "SOCPlayerElements:game=ga|playerNum=2|actionType=GAIN|e1=1,e3=2,e4=3,e5=4".into()
            )
        );
        assert_eq!(
            PlayerElements::parse_debug("game=ga|playerNum=2|actionType=GAIN|e1=1,e3=2,e4=3,e5=4")
                .unwrap(),
            msg
        );
    }

    #[test]
    fn test_player_elements_wire_pairs() {
        let msg = PlayerElements::parse_wire("ga|2|100|18|69|15|0|10|13").unwrap();
        assert_eq!(msg.elements(), &[(18, 69), (15, 0), (10, 13)]);
        assert_eq!(
            Message::from(msg).to_debug(),
            "SOCPlayerElements:game=ga|playerNum=2|actionType=SET|e18=69,e15=0,e10=13"
        );
        assert!(PlayerElements::parse_wire("ga|2|100|18").is_err());
        assert!(PlayerElements::parse_wire("ga|2|100").is_err());
    }

    #[test]
    fn test_game_elements() {
        assert_eq!(
            forms(GameElements::single("ga", game_element::CURRENT_PLAYER, 1).unwrap()),
            ("1096|ga|4|1".into(), "SOCGameElements:game=ga|e4=1".into())
        );
        let msg = GameElements::new(
            "ga",
            vec![
                (game_element::DEV_CARD_COUNT, 25),
                (game_element::ROUND_COUNT, 2),
                (game_element::FIRST_PLAYER, 1),
                (game_element::LONGEST_ROAD_PLAYER, -1),
                (game_element::LARGEST_ARMY_PLAYER, -1),
            ],
        )
        .unwrap();
        assert_eq!(
            forms(msg.clone()),
            (
                "1096|ga|2|25|1|2|3|1|6|-1|5|-1".into(),
                "SOCGameElements:game=ga|e2=25,e1=2,e3=1,e6=-1,e5=-1".into()
            )
        );
        assert_eq!(
            GameElements::parse_debug("game=ga|e2=25,e1=2,e3=1,e6=-1,e5=-1").unwrap(),
            msg
        );
    }

    #[test]
    fn test_player_stats() {
        let msg =
            PlayerStats::new("ga", PlayerStats::STYPE_RES_ROLL, vec![0, 2, 0, 5, 0]).unwrap();
        assert_eq!(
            forms(msg.clone()),
            (
                "1085|ga|1|0|2|0|5|0".into(),
                "SOCPlayerStats:game=ga|p=1|p=0|p=2|p=0|p=5|p=0".into()
            )
        );
        assert_eq!(PlayerStats::parse_debug("game=ga|p=1|p=0|p=2|p=0|p=5|p=0").unwrap(), msg);
        assert!(PlayerStats::parse_wire("ga|1").is_err());
        assert!(matches!(
            PlayerStats::parse_wire("\t|1|0"),
            Err(DecodeError::MalformedField { index: 0, .. })
        ));
    }

    #[test]
    fn test_resource_count() {
        assert_eq!(
            forms(ResourceCount::new("ga", 3, 11).unwrap()),
            ("1063|ga,3,11".into(), "SOCResourceCount:game=ga|playerNumber=3|count=11".into())
        );
    }
}
