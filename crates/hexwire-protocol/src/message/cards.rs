//! Development cards, resource picks, and scenario inventory items.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::{MessageBody, check_name};
use crate::error::{DecodeError, ParseError, ProtocolError, invalid};
use crate::field::{self, DebugFields, SEP2, WireFields};
use crate::types::{DevCardActionKind, INVENTORY_ACTIONS, ResourceSet};

game_message! {
    /// Client asks to buy a development card.
    BuyDevCardRequest {}
}

game_message! {
    /// Number of development cards left to buy.
    DevCardCount {
        num_dev_cards: ["numDevCards"],
    }
}

game_message! {
    /// Client asks to play a development card.
    PlayDevCardRequest {
        dev_card: ["devCard"],
    }
}

game_message! {
    /// Resource type chosen for a monopoly.
    PickResourceType {
        res_type: ["resType", "resource"],
    }
}

/// A card drawn, played, or added to a player's hand.
///
/// Wire: `1046|ga,3,3,6`. At game end the server reveals a hand with
/// one message: `1046|ga,3,3,5,4` adds several old cards at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DevCardAction {
    game: String,
    player_number: i32,
    action: DevCardActionKind,
    card_types: Vec<i32>,
}

impl DevCardAction {
    pub fn new(
        game: impl Into<String>,
        player_number: i32,
        action: DevCardActionKind,
        card_type: i32,
    ) -> Result<Self, ProtocolError> {
        Self::with_cards(game, player_number, action, vec![card_type])
    }

    /// More than one card is only allowed with [`DevCardActionKind::AddOld`].
    pub fn with_cards(
        game: impl Into<String>,
        player_number: i32,
        action: DevCardActionKind,
        card_types: Vec<i32>,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        match card_types.len() {
            0 => return Err(invalid("no card types")),
            1 => {}
            _ if action != DevCardActionKind::AddOld => {
                return Err(invalid(format!(
                    "several cards with action {}",
                    action.debug_name()
                )));
            }
            _ => {}
        }
        Ok(Self {
            game,
            player_number,
            action,
            card_types,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn player_number(&self) -> i32 {
        self.player_number
    }

    pub fn action(&self) -> DevCardActionKind {
        self.action
    }

    /// The first (usually only) card type.
    pub fn card_type(&self) -> i32 {
        self.card_types.first().copied().unwrap_or_default()
    }

    pub fn card_types(&self) -> &[i32] {
        &self.card_types
    }
}

impl MessageBody for DevCardAction {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}",
            self.game,
            self.player_number,
            self.action.value()
        );
        field::write_sep2_each(out, &self.card_types);
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "game={}|playerNum={}|actionType={}|",
            self.game,
            self.player_number,
            self.action.debug_name()
        );
        if let [card_type] = self.card_types.as_slice() {
            let _ = write!(out, "cardType={card_type}");
        } else {
            out.push_str("cardTypes=");
            field::write_list(out, &self.card_types);
        }
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let player_number = f.int()?;
        let action_index = f.index();
        let action = f.int()?;
        let action = DevCardActionKind::from_value(action).ok_or_else(|| {
            DecodeError::malformed(action_index, format!("unknown dev card action {action}"))
        })?;
        if !f.has_more() {
            return Err(DecodeError::ArityMismatch {
                expected: f.index() + 1,
                found: f.index(),
            });
        }
        let card_types = f.ints()?;
        f.build(Self::with_cards(game, player_number, action, card_types))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let player_number = f.int(&["playerNum"])?;
        let action = f.value(&["actionType"])?;
        let action = DevCardActionKind::parse(action).ok_or_else(|| {
            ParseError::malformed("actionType", format!("unknown action {action:?}"))
        })?;
        let card_types = match f.opt_value(&["cardTypes"]) {
            Some(list) => field::split_list(list)
                .iter()
                .map(|ct| field::parse_int("cardTypes", ct))
                .collect::<Result<Vec<_>, _>>()?,
            None => vec![f.int(&["cardType"])?],
        };
        f.finish()?;
        Ok(Self::with_cards(game, player_number, action, card_types)?)
    }
}

/// Whether a player has played a development card this turn.
///
/// Wire: `1048|ga,2,false`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetPlayedDevCard {
    game: String,
    player_number: i32,
    played: bool,
}

impl SetPlayedDevCard {
    pub fn new(
        game: impl Into<String>,
        player_number: i32,
        played: bool,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        Ok(Self {
            game,
            player_number,
            played,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn player_number(&self) -> i32 {
        self.player_number
    }

    pub fn played(&self) -> bool {
        self.played
    }
}

impl MessageBody for SetPlayedDevCard {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}",
            self.game, self.player_number, self.played
        );
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "game={}|playerNumber={}|playedDevCard={}",
            self.game, self.player_number, self.played
        );
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let player_number = f.int()?;
        let played = f.bool()?;
        f.build(Self::new(game, player_number, played))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let player_number = f.int(&["playerNumber"])?;
        let played = f.bool(&["playedDevCard"])?;
        f.finish()?;
        Ok(Self::new(game, player_number, played)?)
    }
}

/// Resources picked for a year of plenty card or a gold hex.
///
/// Wire: `1052|ga,0,1,0,0,1`, the five known amounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PickResources {
    game: String,
    resources: ResourceSet,
}

impl PickResources {
    pub fn new(
        game: impl Into<String>,
        resources: ResourceSet,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        if resources.unknown() != 0 {
            return Err(invalid(format!("picked unknown resources: {resources}")));
        }
        if resources.known_amounts().iter().any(|a| *a < 0) {
            return Err(invalid(format!("negative pick in {resources}")));
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

impl MessageBody for PickResources {
    fn write_wire(&self, out: &mut String) {
        out.push_str(&self.game);
        field::write_sep2_each(out, &self.resources.known_amounts());
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(out, "game={}|resources={}", self.game, self.resources);
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let resources = f.known_resources()?;
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

/// Inventory item action codes; names in [`INVENTORY_ACTIONS`].
pub mod inventory_action {
    pub const BUY: i32 = 1;
    pub const ADD_PLAYABLE: i32 = 2;
    pub const ADD_OTHER: i32 = 3;
    pub const PLAY: i32 = 4;
    pub const CANNOT_PLAY: i32 = 5;
    pub const PLAYED: i32 = 6;
    pub const PLACING_EXTRA: i32 = 7;
}

const FLAG_KEPT: i32 = 0x01;
const FLAG_VP: i32 = 0x02;
const FLAG_CAN_CANCEL: i32 = 0x04;

/// A scenario inventory item changed hands or was played.
///
/// Wire: `1098|ga,3,4,3[,rc]`. Play and cannot-play actions carry a
/// reason code; other actions carry a bit field of item flags instead.
/// Either is left off when zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryItemAction {
    game: String,
    player_number: i32,
    action: i32,
    item_type: i32,
    code: i32,
}

fn carries_reason_code(action: i32) -> bool {
    matches!(
        action,
        inventory_action::PLAY | inventory_action::CANNOT_PLAY
    )
}

impl InventoryItemAction {
    /// A play or cannot-play action with its reason code.
    pub fn new(
        game: impl Into<String>,
        player_number: i32,
        action: i32,
        item_type: i32,
        reason_code: i32,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        if !carries_reason_code(action) && reason_code != 0 {
            return Err(invalid(format!(
                "action {} has no reason code",
                INVENTORY_ACTIONS.display(action)
            )));
        }
        Ok(Self {
            game,
            player_number,
            action,
            item_type,
            code: reason_code,
        })
    }

    /// Any other action, with the item's flags.
    pub fn with_flags(
        game: impl Into<String>,
        player_number: i32,
        action: i32,
        item_type: i32,
        kept: bool,
        is_vp: bool,
        can_cancel: bool,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        if carries_reason_code(action) {
            return Err(invalid(format!(
                "action {} takes a reason code, not flags",
                INVENTORY_ACTIONS.display(action)
            )));
        }
        let code = [(kept, FLAG_KEPT), (is_vp, FLAG_VP), (can_cancel, FLAG_CAN_CANCEL)]
            .into_iter()
            .filter(|(set, _)| *set)
            .fold(0, |acc, (_, flag)| acc | flag);
        Ok(Self {
            game,
            player_number,
            action,
            item_type,
            code,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn player_number(&self) -> i32 {
        self.player_number
    }

    pub fn action(&self) -> i32 {
        self.action
    }

    pub fn item_type(&self) -> i32 {
        self.item_type
    }

    /// Reason code of a play or cannot-play action, otherwise 0.
    pub fn reason_code(&self) -> i32 {
        if carries_reason_code(self.action) {
            self.code
        } else {
            0
        }
    }

    fn flag(&self, flag: i32) -> bool {
        !carries_reason_code(self.action) && self.code & flag != 0
    }

    pub fn is_kept(&self) -> bool {
        self.flag(FLAG_KEPT)
    }

    pub fn is_vp(&self) -> bool {
        self.flag(FLAG_VP)
    }

    pub fn can_cancel_play(&self) -> bool {
        self.flag(FLAG_CAN_CANCEL)
    }
}

impl MessageBody for InventoryItemAction {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}{SEP2}{}",
            self.game, self.player_number, self.action, self.item_type
        );
        if self.code != 0 {
            let _ = write!(out, "{SEP2}{}", self.code);
        }
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "game={}|playerNum={}|action={}|itemType={}",
            self.game,
            self.player_number,
            INVENTORY_ACTIONS.display(self.action),
            self.item_type
        );
        if carries_reason_code(self.action) {
            let _ = write!(out, "|rc={}", self.code);
        } else {
            let _ = write!(
                out,
                "|kept={}|isVP={}|canCancel={}",
                self.is_kept(),
                self.is_vp(),
                self.can_cancel_play()
            );
        }
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let player_number = f.int()?;
        let action = f.int()?;
        let item_type = f.int()?;
        let code = if f.has_more() { f.int()? } else { 0 };
        let built = if carries_reason_code(action) {
            Self::new(game, player_number, action, item_type, code)
        } else if code & !(FLAG_KEPT | FLAG_VP | FLAG_CAN_CANCEL) != 0 {
            Err(invalid(format!("unknown item flags {code:#x}")))
        } else {
            Self::with_flags(
                game,
                player_number,
                action,
                item_type,
                code & FLAG_KEPT != 0,
                code & FLAG_VP != 0,
                code & FLAG_CAN_CANCEL != 0,
            )
        };
        f.build(built)
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let player_number = f.int(&["playerNum"])?;
        let action_name = f.value(&["action"])?;
        let action = INVENTORY_ACTIONS.parse(action_name).ok_or_else(|| {
            ParseError::malformed("action", format!("unknown action {action_name:?}"))
        })?;
        let item_type = f.int(&["itemType"])?;
        let msg = if carries_reason_code(action) {
            let rc = f.int(&["rc"])?;
            Self::new(game, player_number, action, item_type, rc)?
        } else {
            let kept = f.bool(&["kept"])?;
            let is_vp = f.bool(&["isVP"])?;
            let can_cancel = f.bool(&["canCancel"])?;
            Self::with_flags(game, player_number, action, item_type, kept, is_vp, can_cancel)?
        };
        f.finish()?;
        Ok(msg)
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
    fn test_simple_card_messages() {
        assert_eq!(
            forms(BuyDevCardRequest::new("ga").unwrap()),
            ("1045|ga".into(), "SOCBuyDevCardRequest:game=ga".into())
        );
        assert_eq!(
            forms(DevCardCount::new("ga", 22).unwrap()),
            ("1047|ga,22".into(), "SOCDevCardCount:game=ga|numDevCards=22".into())
        );
        assert_eq!(
            forms(PlayDevCardRequest::new("ga", 9).unwrap()),
            ("1049|ga,9".into(), "SOCPlayDevCardRequest:game=ga|devCard=9".into())
        );
        assert_eq!(
            forms(SetPlayedDevCard::new("ga", 2, false).unwrap()),
            (
                "1048|ga,2,false".into(),
                "SOCSetPlayedDevCard:game=ga|playerNumber=2|playedDevCard=false".into()
            )
        );
    }

    #[test]
    fn test_dev_card_action_single_card() {
        let msg = DevCardAction::new("ga", 3, DevCardActionKind::AddOld, 6).unwrap();
        assert_eq!(
            forms(msg.clone()),
            (
                "1046|ga,3,3,6".into(),
                "SOCDevCardAction:game=ga|playerNum=3|actionType=ADD_OLD|cardType=6".into()
            )
        );
        assert_eq!(
            DevCardAction::parse_debug("game=ga|playerNum=3|actionType=ADD_OLD|cardType=6")
                .unwrap(),
            msg
        );
    }

    #[test]
    fn test_dev_card_action_card_list() {
        let msg =
            DevCardAction::with_cards("ga", 3, DevCardActionKind::AddOld, vec![5, 4]).unwrap();
        assert_eq!(
            forms(msg.clone()),
            (
                "1046|ga,3,3,5,4".into(),
                "SOCDevCardAction:game=ga|playerNum=3|actionType=ADD_OLD|cardTypes=[5, 4]".into()
            )
        );
        assert_eq!(DevCardAction::parse_wire("ga,3,3,5,4").unwrap(), msg);
        assert_eq!(
            DevCardAction::parse_debug("game=ga|playerNum=3|actionType=ADD_OLD|cardTypes=[5, 4]")
                .unwrap(),
            msg
        );
        assert!(DevCardAction::with_cards("ga", 3, DevCardActionKind::Play, vec![5, 4]).is_err());
    }

    #[test]
    fn test_dev_card_action_numeric_action_name() {
        let msg =
            DevCardAction::parse_debug("game=ga|playerNum=3|actionType=0|cardType=2").unwrap();
        assert_eq!(msg.action(), DevCardActionKind::Draw);
        assert_eq!(msg.card_type(), 2);
        assert!(DevCardAction::parse_wire("ga,3,9,2").is_err());
        assert!(DevCardAction::parse_wire("ga,3,0").is_err());
    }

    #[test]
    fn test_pick_resources() {
        let msg = PickResources::new("ga", ResourceSet::known(0, 1, 0, 0, 1)).unwrap();
        assert_eq!(
            forms(msg.clone()),
            (
                "1052|ga,0,1,0,0,1".into(),
                "SOCPickResources:game=ga|resources=clay=0|ore=1|sheep=0|wheat=0|wood=1|unknown=0"
                    .into()
            )
        );
        assert_eq!(PickResources::parse_wire("ga,0,1,0,0,1").unwrap(), msg);
        assert!(PickResources::new("ga", ResourceSet::new(0, 0, 0, 0, 0, 2)).is_err());
    }

    #[test]
    fn test_pick_resource_type_legacy_field_name() {
        assert_eq!(
            forms(PickResourceType::new("ga", 3).unwrap()),
            ("1053|ga,3".into(), "SOCPickResourceType:game=ga|resType=3".into())
        );
        let msg = PickResourceType::parse_debug("game=ga|resource=4").unwrap();
        assert_eq!(msg.res_type(), 4);
    }

    #[test]
    fn test_inventory_item_reason_code() {
        let play = InventoryItemAction::new("ga", 3, inventory_action::PLAY, 3, 0).unwrap();
        assert_eq!(
            forms(play),
            (
                "1098|ga,3,4,3".into(),
                "SOCInventoryItemAction:game=ga|playerNum=3|action=PLAY|itemType=3|rc=0".into()
            )
        );
        let cannot =
            InventoryItemAction::new("ga", 3, inventory_action::CANNOT_PLAY, 3, 1).unwrap();
        assert_eq!(
            forms(cannot.clone()),
            (
                "1098|ga,3,5,3,1".into(),
                "SOCInventoryItemAction:game=ga|playerNum=3|action=CANNOT_PLAY|itemType=3|rc=1"
                    .into()
            )
        );
        assert_eq!(InventoryItemAction::parse_wire("ga,3,5,3,1").unwrap(), cannot);
    }

    #[test]
    fn test_inventory_item_flags() {
        let msg = InventoryItemAction::with_flags(
            "ga",
            3,
            inventory_action::ADD_OTHER,
            5,
            true,
            false,
            true,
        )
        .unwrap();
        assert_eq!(
            forms(msg.clone()),
            (
                "1098|ga,3,3,5,5".into(),
                "SOCInventoryItemAction:game=ga|playerNum=3|action=ADD_OTHER|itemType=5\
                 |kept=true|isVP=false|canCancel=true"
                    .into()
            )
        );
        let parsed = InventoryItemAction::parse_wire("ga,3,3,5,5").unwrap();
        assert!(parsed.is_kept() && parsed.can_cancel_play() && !parsed.is_vp());
        assert_eq!(parsed, msg);

        let plain = InventoryItemAction::with_flags(
            "ga",
            3,
            inventory_action::ADD_PLAYABLE,
            2,
            false,
            false,
            false,
        )
        .unwrap();
        assert_eq!(forms(plain).0, "1098|ga,3,2,2");
    }

    #[test]
    fn test_wire_decode_rejects_what_constructors_reject() {
        assert!(matches!(
            DevCardAction::parse_wire("ga,3,1,5,4"),
            Err(DecodeError::MalformedField { index: 4, .. })
        ));
        assert!(matches!(
            PickResources::parse_wire("ga,0,-1,0,0,1"),
            Err(DecodeError::MalformedField { .. })
        ));
        assert!(matches!(
            InventoryItemAction::parse_wire("ga,3,3,5,9"),
            Err(DecodeError::MalformedField { index: 4, .. })
        ));
        assert!(matches!(
            SetPlayedDevCard::parse_wire("\t,3,1"),
            Err(DecodeError::MalformedField { index: 0, .. })
        ));
    }
}
