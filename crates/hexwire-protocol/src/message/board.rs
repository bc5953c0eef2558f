//! Pieces on the board, fog, special victory points, and special items.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::{MessageBody, check_name, check_token};
use crate::error::{DecodeError, ParseError, ProtocolError, invalid};
use crate::field::{self, DebugFields, SEP2, WireFields};
use crate::types::SPECIAL_ITEM_OPS;

game_message! {
    /// A piece was placed.
    PutPiece {
        player_number: ["playerNumber"],
        piece_type: ["pieceType"],
        coord: ["coord"] as Hex,
    }
}

game_message! {
    /// Debug placement of a piece, ignoring the rules.
    ///
    /// With piece type 0 and coordinate 1 or 0 it turns free placement
    /// mode on or off instead; see [`DebugFreePlace::set_mode`].
    DebugFreePlace {
        player_number: ["playerNumber"],
        piece_type: ["pieceType"],
        coord: ["coord"] as PrefixedHex,
    }
}

impl DebugFreePlace {
    /// Turns free placement mode on or off.
    pub fn set_mode(
        game: impl Into<String>,
        player_number: i32,
        on: bool,
    ) -> Result<Self, ProtocolError> {
        Self::new(game, player_number, 0, i32::from(on))
    }
}

game_message! {
    /// A ship moved.
    MovePiece {
        player_number: ["pn"],
        piece_type: ["pieceType"],
        from_coord: ["fromCoord"],
        to_coord: ["toCoord"],
    }
}

game_message! {
    /// A piece was removed from the board.
    RemovePiece {
        player_number: ["pn"],
        piece_type: ["pieceType"],
        coord: ["coord"],
    }
}

game_message! {
    /// A piece's scenario values changed, such as a village's cloth count.
    PieceValue {
        piece_type: ["pieceType"],
        coord: ["coord"],
        value1: ["pv1"],
        value2: ["pv2"],
    }
}

game_message! {
    /// A hex hidden by fog was revealed.
    RevealFogHex {
        hex_coord: ["hexCoord"],
        hex_type: ["hexType"],
        dice_num: ["diceNum"],
    }
}

game_message! {
    /// The last settlement a player placed, for the initial placement
    /// rules.
    LastSettlement {
        player_number: ["playerNumber"],
        coord: ["coord"] as Hex,
    }
}

game_message! {
    /// Client asks to build a piece.
    BuildRequest {
        piece_type: ["pieceType"],
    }
}

game_message! {
    /// Client cancels a build request.
    CancelBuildRequest {
        piece_type: ["pieceType"],
    }
}

game_message! {
    /// The player now holding the largest army, or -1.
    LargestArmy {
        player_number: ["playerNumber"],
    }
}

game_message! {
    /// The player now holding the longest road, or -1.
    LongestRoad {
        player_number: ["playerNumber"],
    }
}

/// Special victory points awarded, with the reason.
///
/// Wire: `1097|ga,3,2,settling a new island`; the description runs to
/// the end of the line and may contain commas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SvpTextMessage {
    game: String,
    player_number: i32,
    svp: i32,
    description: String,
}

impl SvpTextMessage {
    pub fn new(
        game: impl Into<String>,
        player_number: i32,
        svp: i32,
        description: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let (game, description) = (game.into(), description.into());
        check_name("game", &game)?;
        if description.is_empty() || !field::is_single_line_and_safe(&description, true) {
            return Err(invalid(format!("bad description {description:?}")));
        }
        Ok(Self {
            game,
            player_number,
            svp,
            description,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn player_number(&self) -> i32 {
        self.player_number
    }

    pub fn svp(&self) -> i32 {
        self.svp
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl MessageBody for SvpTextMessage {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}{SEP2}{}",
            self.game, self.player_number, self.svp, self.description
        );
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "game={}|pn={}|svp={}|desc={}",
            self.game, self.player_number, self.svp, self.description
        );
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let player_number = f.int()?;
        let svp = f.int()?;
        let description = f.rest()?;
        f.build(Self::new(game, player_number, svp, description))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let player_number = f.int(&["pn"])?;
        let svp = f.int(&["svp"])?;
        let description = f.rest(&["desc"])?;
        Ok(Self::new(game, player_number, svp, description)?)
    }
}

/// Special item operations; names in [`SPECIAL_ITEM_OPS`].
pub mod special_item_op {
    pub const SET: i32 = 1;
    pub const CLEAR: i32 = 2;
    pub const PICK: i32 = 3;
    pub const DECLINE: i32 = 4;
    pub const SET_PICK: i32 = 5;
    pub const CLEAR_PICK: i32 = 6;
}

/// Change to a scenario's special item, such as a wonder.
///
/// Wire: `1099|ga,1,_SC_WOND,2,0,3,-1,2,w2`: op, type key, game item
/// index, player item index, owner, coordinate, level, and string value
/// (the tab sentinel when absent).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetSpecialItem {
    game: String,
    op: i32,
    type_key: String,
    game_item_index: i32,
    player_item_index: i32,
    player_number: i32,
    coord: i32,
    level: i32,
    string_value: Option<String>,
}

impl SetSpecialItem {
    /// An operation with no coordinate, level, or string value.
    pub fn new(
        game: impl Into<String>,
        op: i32,
        type_key: impl Into<String>,
        game_item_index: i32,
        player_item_index: i32,
        player_number: i32,
    ) -> Result<Self, ProtocolError> {
        Self::with_item(
            game,
            op,
            type_key,
            game_item_index,
            player_item_index,
            player_number,
            -1,
            0,
            None,
        )
    }

    /// `player_item_index` must be set when `player_number` is.
    #[allow(clippy::too_many_arguments)]
    pub fn with_item(
        game: impl Into<String>,
        op: i32,
        type_key: impl Into<String>,
        game_item_index: i32,
        player_item_index: i32,
        player_number: i32,
        coord: i32,
        level: i32,
        string_value: Option<String>,
    ) -> Result<Self, ProtocolError> {
        let (game, type_key) = (game.into(), type_key.into());
        check_name("game", &game)?;
        check_name("type key", &type_key)?;
        if SPECIAL_ITEM_OPS.name(op).is_none() {
            return Err(invalid(format!("unknown special item op {op}")));
        }
        if player_number != -1 && player_item_index == -1 {
            return Err(invalid("player number set without a player item index"));
        }
        let string_value = string_value.filter(|s| !s.is_empty());
        if let Some(sv) = &string_value {
            check_token("string value", sv)?;
        }
        Ok(Self {
            game,
            op,
            type_key,
            game_item_index,
            player_item_index,
            player_number,
            coord,
            level,
            string_value,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn op(&self) -> i32 {
        self.op
    }

    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    pub fn game_item_index(&self) -> i32 {
        self.game_item_index
    }

    pub fn player_item_index(&self) -> i32 {
        self.player_item_index
    }

    pub fn player_number(&self) -> i32 {
        self.player_number
    }

    pub fn coord(&self) -> i32 {
        self.coord
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn string_value(&self) -> Option<&str> {
        self.string_value.as_deref()
    }
}

impl MessageBody for SetSpecialItem {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}{SEP2}{}{SEP2}{}{SEP2}{}{SEP2}{}{SEP2}{}{SEP2}{}{SEP2}{}{SEP2}{}",
            self.game,
            self.op,
            self.type_key,
            self.game_item_index,
            self.player_item_index,
            self.player_number,
            self.coord,
            self.level,
            field::encode_opt(self.string_value.as_deref())
        );
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "game={}|op={}|typeKey={}|gi={}|pi={}|pn={}|co=",
            self.game,
            SPECIAL_ITEM_OPS.display(self.op),
            self.type_key,
            self.game_item_index,
            self.player_item_index,
            self.player_number
        );
        // Only real coordinates are hex; -1 stays decimal.
        if self.coord >= 0 {
            let _ = write!(out, "{:x}", self.coord);
        } else {
            let _ = write!(out, "{}", self.coord);
        }
        let _ = write!(out, "|lv={}", self.level);
        match &self.string_value {
            Some(sv) => {
                let _ = write!(out, "|sv={sv}");
            }
            None => out.push_str("|sv null"),
        }
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let op = f.int()?;
        let type_key = f.name("type key")?;
        let game_item_index = f.int()?;
        let player_item_index = f.int()?;
        let player_number = f.int()?;
        let coord = f.int()?;
        let level = f.int()?;
        let string_value = field::decode_opt(f.raw()?);
        f.build(Self::with_item(
            game,
            op,
            type_key,
            game_item_index,
            player_item_index,
            player_number,
            coord,
            level,
            string_value,
        ))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let op_name = f.value(&["op"])?;
        let op = SPECIAL_ITEM_OPS.parse(op_name).ok_or_else(|| {
            ParseError::malformed("op", format!("unknown op {op_name:?}"))
        })?;
        let type_key = f.string(&["typeKey"])?;
        let game_item_index = f.int(&["gi"])?;
        let player_item_index = f.int(&["pi"])?;
        let player_number = f.int(&["pn"])?;
        let co = f.value(&["co"])?;
        let coord = if co.starts_with('-') {
            field::parse_int("co", co)?
        } else {
            field::parse_hex("co", co)?
        };
        let level = f.int(&["lv"])?;
        let string_value = match f.raw_rest() {
            Some("sv null") => None,
            Some(rest) => match rest.strip_prefix("sv=") {
                Some(sv) => Some(sv.to_string()),
                None => {
                    return Err(ParseError::malformed("sv", format!("unexpected {rest:?}")));
                }
            },
            None => return Err(ParseError::MissingField("sv".into())),
        };
        Ok(Self::with_item(
            game,
            op,
            type_key,
            game_item_index,
            player_item_index,
            player_number,
            coord,
            level,
            string_value,
        )?)
    }
}

// ---------------------------------------------------------------------------
// Potential settlements
// ---------------------------------------------------------------------------

const LIST_EMPTY: &str = "(empty)";
const LIST_NULL: &str = "(null)";
const LIST_FROM_ALL_AREAS: &str = "(fromAllLANodes)";

/// The land areas of a large board and the area players start in.
///
/// Areas are numbered from 1. A starting area of 0 means settlements may
/// go in any area.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LandAreas {
    starting_area: i32,
    areas: Vec<Vec<i32>>,
}

impl LandAreas {
    /// `areas[0]` holds the legal nodes of area 1, and so on.
    pub fn new(starting_area: i32, areas: Vec<Vec<i32>>) -> Result<Self, ProtocolError> {
        if areas.is_empty() {
            return Err(invalid("no land areas"));
        }
        let count = i32::try_from(areas.len()).map_err(|_| invalid("too many land areas"))?;
        if !(0..=count).contains(&starting_area) {
            return Err(invalid(format!(
                "starting area {starting_area} outside 0..={count}"
            )));
        }
        for (area, nodes) in (1..).zip(&areas) {
            if nodes.is_empty() {
                return Err(invalid(format!("land area {area} has no nodes")));
            }
            check_nodes(nodes)?;
        }
        Ok(Self {
            starting_area,
            areas,
        })
    }

    pub fn starting_area(&self) -> i32 {
        self.starting_area
    }

    pub fn areas(&self) -> &[Vec<i32>] {
        &self.areas
    }

    /// Legal nodes of area `number`, counting from 1.
    pub fn area(&self, number: i32) -> Option<&[i32]> {
        let i = usize::try_from(number).ok()?.checked_sub(1)?;
        self.areas.get(i).map(Vec::as_slice)
    }
}

fn check_nodes(nodes: &[i32]) -> Result<(), ProtocolError> {
    match nodes.iter().find(|n| **n <= 0) {
        Some(n) => Err(invalid(format!("node coordinate {n} is not positive"))),
        None => Ok(()),
    }
}

/// Each sea edge list is single edges and `start, -end` ranges, so an
/// entry is never 0 and a list never opens with a range end.
fn check_sea_edges(lists: &[Vec<i32>]) -> Result<(), ProtocolError> {
    if lists.is_empty() {
        return Err(invalid("sea edges given but no lists"));
    }
    for list in lists {
        if list.first().is_some_and(|e| *e < 0) {
            return Err(invalid(format!("sea edge list starts with range end {}", list[0])));
        }
        if let Some(e) = list.iter().find(|e| **e == 0 || **e == i32::MIN) {
            return Err(invalid(format!("bad sea edge {e}")));
        }
    }
    Ok(())
}

/// Where a player may place settlements.
///
/// Wire: `1057|ga,3,3076,3589,1546` on classic boards. Large boards add
/// land areas and legal sea edges after an `NA` marker:
/// `1057|ga,3,NA,2,PAN,1,LA1,2575,LA2,1546,SE,c07,-c0b,a03`. Sea edges
/// are hex, a negative edge closing a range opened by the one before it.
///
/// The node list may be left out on large boards when it is the starting
/// area's nodes (or every area's, with starting area 0). A player number
/// of -1 sends the same information to all players.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PotentialSettlements {
    game: String,
    player_number: i32,
    nodes: Option<Vec<i32>>,
    land_areas: Option<LandAreas>,
    legal_sea_edges: Option<Vec<Vec<i32>>>,
}

impl PotentialSettlements {
    /// The classic form: one player's potential settlement nodes.
    pub fn new(
        game: impl Into<String>,
        player_number: i32,
        nodes: Vec<i32>,
    ) -> Result<Self, ProtocolError> {
        Self::with_board_info(game, player_number, Some(nodes), None, None)
    }

    /// The large-board form. `nodes` may be `None` only with land areas.
    pub fn with_board_info(
        game: impl Into<String>,
        player_number: i32,
        nodes: Option<Vec<i32>>,
        land_areas: Option<LandAreas>,
        legal_sea_edges: Option<Vec<Vec<i32>>>,
    ) -> Result<Self, ProtocolError> {
        let game = game.into();
        check_name("game", &game)?;
        if player_number < -1 {
            return Err(invalid(format!("bad player number {player_number}")));
        }
        match &nodes {
            Some(nodes) => check_nodes(nodes)?,
            None if land_areas.is_none() => {
                return Err(invalid("node list left out without land areas"));
            }
            None => {}
        }
        if let Some(lists) = &legal_sea_edges {
            check_sea_edges(lists)?;
        }
        Ok(Self {
            game,
            player_number,
            nodes,
            land_areas,
            legal_sea_edges,
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    pub fn player_number(&self) -> i32 {
        self.player_number
    }

    /// The node list as sent, if it was.
    pub fn nodes(&self) -> Option<&[i32]> {
        self.nodes.as_deref()
    }

    pub fn land_areas(&self) -> Option<&LandAreas> {
        self.land_areas.as_ref()
    }

    pub fn legal_sea_edges(&self) -> Option<&[Vec<i32>]> {
        self.legal_sea_edges.as_deref()
    }

    /// The potential settlement nodes, filled in from the land areas
    /// when the list was left out.
    pub fn potential_nodes(&self) -> Vec<i32> {
        if let Some(nodes) = &self.nodes {
            return nodes.clone();
        }
        match &self.land_areas {
            Some(la) if la.starting_area == 0 => la.areas.concat(),
            Some(la) => la.area(la.starting_area).map(<[i32]>::to_vec).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    fn has_board_info(&self) -> bool {
        self.land_areas.is_some() || self.legal_sea_edges.is_some()
    }
}

fn write_hex_nodes(out: &mut String, nodes: &[i32]) {
    for n in nodes {
        let _ = write!(out, "{} ", field::hex(*n));
    }
}

fn parse_hex_nodes(name: &str, value: &str) -> Result<Vec<i32>, ParseError> {
    value
        .split_whitespace()
        .map(|n| field::parse_hex(name, n))
        .collect()
}

fn parse_sea_edge(index: usize, token: &str) -> Result<i32, DecodeError> {
    let malformed = || DecodeError::malformed(index, format!("expected hex edge, got {token:?}"));
    let (negative, digits) = match token.strip_prefix('-') {
        Some(d) => (true, d),
        None => (false, token),
    };
    if digits.starts_with(['+', '-']) {
        return Err(malformed());
    }
    let edge = i32::from_str_radix(digits, 16).map_err(|_| malformed())?;
    Ok(if negative { -edge } else { edge })
}

/// `{c07-c0b,a03}`: a range end follows its start after `-`.
fn parse_sea_edge_list(text: &str) -> Result<Vec<i32>, ParseError> {
    let mut edges = Vec::new();
    if text.is_empty() {
        return Ok(edges);
    }
    for item in text.split(SEP2) {
        let mut parts = item.split('-');
        let start = parts.next().unwrap_or_default();
        if start.is_empty() {
            return Err(ParseError::malformed("lse", format!("bad edge item {item:?}")));
        }
        edges.push(field::parse_hex("lse", start)?);
        for end in parts {
            edges.push(-field::parse_hex("lse", end)?);
        }
    }
    Ok(edges)
}

impl MessageBody for PotentialSettlements {
    fn write_wire(&self, out: &mut String) {
        let _ = write!(out, "{}{SEP2}{}", self.game, self.player_number);
        match &self.nodes {
            Some(nodes) if nodes.is_empty() && self.has_board_info() => {
                out.push_str(",0");
            }
            Some(nodes) => field::write_sep2_each(out, nodes),
            None => {}
        }
        if !self.has_board_info() {
            return;
        }
        let (count, start) = self
            .land_areas
            .as_ref()
            .map_or((0, 0), |la| (la.areas.len(), la.starting_area));
        let _ = write!(out, ",NA,{count},PAN,{start}");
        if let Some(la) = &self.land_areas {
            for (area, nodes) in (1..).zip(&la.areas) {
                let _ = write!(out, ",LA{area}");
                field::write_sep2_each(out, nodes);
            }
        }
        if let Some(lists) = &self.legal_sea_edges {
            for (i, list) in lists.iter().enumerate() {
                out.push_str(",SE");
                if list.is_empty() && i + 1 == lists.len() {
                    out.push_str(",0");
                }
                for e in list {
                    let _ = write!(out, ",{}", field::hex(*e));
                }
            }
        }
    }

    fn write_debug(&self, out: &mut String) {
        let _ = write!(
            out,
            "game={}|playerNum={}|list=",
            self.game, self.player_number
        );
        match &self.nodes {
            Some(nodes) if nodes.is_empty() => out.push_str(LIST_EMPTY),
            Some(nodes) => write_hex_nodes(out, nodes),
            None if self.land_areas.as_ref().is_some_and(|la| la.starting_area == 0) => {
                out.push_str(LIST_FROM_ALL_AREAS);
            }
            None => out.push_str(LIST_NULL),
        }
        if let Some(la) = &self.land_areas {
            let _ = write!(out, "|pan={}", la.starting_area);
            for (area, nodes) in (1..).zip(&la.areas) {
                let _ = write!(out, "|la{area}=");
                write_hex_nodes(out, nodes);
            }
        }
        if let Some(lists) = &self.legal_sea_edges {
            out.push_str("|lse={");
            for (i, list) in lists.iter().enumerate() {
                if i > 0 {
                    out.push(SEP2);
                }
                out.push('{');
                for (j, e) in list.iter().enumerate() {
                    if *e > 0 && j > 0 {
                        out.push(SEP2);
                    }
                    out.push_str(&field::hex(*e));
                }
                out.push('}');
            }
            out.push('}');
        }
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        let mut f = WireFields::new(data);
        let game = f.name("game")?;
        let player_number = f.int()?;
        let mut nodes = Vec::new();
        while f.has_more() && f.peek() != Some("NA") {
            nodes.push(f.int()?);
        }
        if !f.has_more() {
            return f.build(Self::new(game, player_number, nodes));
        }
        // Nothing before NA leaves the list out; a lone 0 sends it empty.
        let nodes = if nodes.is_empty() {
            None
        } else if nodes == [0] {
            Some(Vec::new())
        } else {
            Some(nodes)
        };

        f.raw()?;
        let count_index = f.index();
        let count = f.int()?;
        let pan_index = f.index();
        if f.raw()? != "PAN" {
            return Err(DecodeError::malformed(pan_index, "expected PAN"));
        }
        let start_index = f.index();
        let starting_area = f.int()?;

        let mut areas: Vec<Vec<i32>> = Vec::new();
        while let Some(token) = f.peek().filter(|t| t.starts_with("LA")) {
            let index = f.index();
            if token[2..].parse::<usize>().ok() != Some(areas.len() + 1) {
                return Err(DecodeError::malformed(
                    index,
                    format!("expected LA{}, got {token:?}", areas.len() + 1),
                ));
            }
            f.raw()?;
            let mut area = Vec::new();
            while let Some(t) = f.peek() {
                if t.starts_with("LA") || t == "SE" {
                    break;
                }
                area.push(f.int()?);
            }
            areas.push(area);
        }
        if usize::try_from(count).ok() != Some(areas.len()) {
            return Err(DecodeError::malformed(
                count_index,
                format!("{count} land areas announced, {} sent", areas.len()),
            ));
        }

        let mut lists: Vec<Vec<i32>> = Vec::new();
        while f.peek() == Some("SE") {
            f.raw()?;
            let mut list = Vec::new();
            while let Some(t) = f.peek().filter(|t| *t != "SE") {
                let index = f.index();
                f.raw()?;
                // A lone 0 stands for an empty last list.
                if t == "0" && list.is_empty() && !f.has_more() {
                    break;
                }
                list.push(parse_sea_edge(index, t)?);
            }
            lists.push(list);
        }

        let land_areas = if areas.is_empty() {
            if starting_area != 0 {
                return Err(DecodeError::malformed(start_index, "starting area without land areas"));
            }
            if lists.is_empty() {
                return Err(DecodeError::malformed(count_index, "no land areas or sea edges"));
            }
            None
        } else {
            match LandAreas::new(starting_area, areas) {
                Ok(la) => Some(la),
                Err(err) => return Err(DecodeError::rejected(start_index, &err)),
            }
        };
        let legal_sea_edges = (!lists.is_empty()).then_some(lists);
        f.build(Self::with_board_info(
            game,
            player_number,
            nodes,
            land_areas,
            legal_sea_edges,
        ))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let game = f.string(&["game"])?;
        let player_number = f.int(&["playerNum"])?;
        let nodes = match f.value(&["list"])? {
            LIST_NULL | LIST_FROM_ALL_AREAS => None,
            LIST_EMPTY => Some(Vec::new()),
            list => Some(parse_hex_nodes("list", list)?),
        };

        let land_areas = match f.opt_value(&["pan"]) {
            Some(pan) => {
                let starting_area = field::parse_int("pan", pan)?;
                let mut areas = Vec::new();
                loop {
                    let key = format!("la{}", areas.len() + 1);
                    match f.opt_value(&[key.as_str()]) {
                        Some(value) => areas.push(parse_hex_nodes(&key, value)?),
                        None => break,
                    }
                }
                Some(LandAreas::new(starting_area, areas)?)
            }
            None => None,
        };

        let legal_sea_edges = match f.opt_value(&["lse"]) {
            Some(value) => {
                let inner = value
                    .strip_prefix("{{")
                    .and_then(|v| v.strip_suffix("}}"))
                    .ok_or_else(|| {
                        ParseError::malformed("lse", format!("expected {{{{...}}}}, got {value:?}"))
                    })?;
                Some(
                    inner
                        .split("},{")
                        .map(parse_sea_edge_list)
                        .collect::<Result<Vec<_>, _>>()?,
                )
            }
            None => None,
        };
        f.finish()?;
        Ok(Self::with_board_info(
            game,
            player_number,
            nodes,
            land_areas,
            legal_sea_edges,
        )?)
    }
}
