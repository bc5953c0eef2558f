//! Field codec: primitive tokens of the wire and debug forms.
//!
//! A wire line looks like `1039|ga,2,3`: the numeric type id, [`SEP`], then
//! the message's fields joined by [`SEP2`]. Every message type reads its
//! fields through a [`WireFields`] cursor and writes them with plain
//! `String` pushes, so the separator rules live here and nowhere else.
//!
//! The debug form looks like `SOCAcceptOffer:game=ga|accepting=2|offering=3`.
//! [`DebugFields`] reads those `name=value` pieces back.

use std::fmt::{self, Write as _};

use crate::error::{DecodeError, ParseError, ProtocolError};

// ---------------------------------------------------------------------------
// Separators and sentinels
// ---------------------------------------------------------------------------

/// Separates the type id from the data, and all parameters of list-style
/// messages such as `1086|ga|2|101|1|1`.
pub const SEP: char = '|';

/// Separates fields within most messages' data.
pub const SEP2: char = ',';

/// Stands in for an empty or absent string field. An empty field can't be
/// written as zero characters between separators.
pub const EMPTYSTR: &str = "\t";

/// Game-name placeholder for messages that are not about any one game.
pub const GAME_NONE: &str = "\u{16}";

/// Separator before free-text fields of channel and game text messages.
pub const TEXT_SEP: char = '\0';

/// Separator before the text of a game server text message.
pub const UNLIKELY_CHAR1: char = '\u{1}';

/// Maps an empty string to [`EMPTYSTR`] for writing.
pub fn encode_str(s: &str) -> &str {
    if s.is_empty() { EMPTYSTR } else { s }
}

/// Maps [`EMPTYSTR`] back to the empty string.
pub fn decode_str(token: &str) -> &str {
    if token == EMPTYSTR { "" } else { token }
}

/// Maps `None` (or an empty string) to [`EMPTYSTR`] for writing.
pub fn encode_opt(s: Option<&str>) -> &str {
    encode_str(s.unwrap_or(""))
}

/// Maps [`EMPTYSTR`] to `None`.
pub fn decode_opt(token: &str) -> Option<String> {
    match decode_str(token) {
        "" => None,
        s => Some(s.to_string()),
    }
}

/// True if `s` can sit between separators of a wire line: one line, no
/// control characters, no [`SEP`], and no [`SEP2`] unless `allow_sep2`.
///
/// [`GAME_NONE`] is accepted as-is.
pub fn is_single_line_and_safe(s: &str, allow_sep2: bool) -> bool {
    if s == GAME_NONE {
        return true;
    }
    !s.chars().any(|c| {
        c == SEP || (c == SEP2 && !allow_sep2) || c.is_control()
    })
}

/// Lowercase hex of a board coordinate, as printed in debug forms.
/// Negative values keep their sign: `-305`.
pub fn hex(value: i32) -> String {
    if value < 0 {
        format!("-{:x}", value.unsigned_abs())
    } else {
        format!("{value:x}")
    }
}

/// Writes `[a, b, c]`.
pub fn write_list<T: fmt::Display>(out: &mut String, items: &[T]) {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{item}");
    }
    out.push(']');
}

/// Writes each item preceded by [`SEP2`].
pub fn write_sep2_each<T: fmt::Display>(out: &mut String, items: &[T]) {
    for item in items {
        let _ = write!(out, "{SEP2}{item}");
    }
}

// ---------------------------------------------------------------------------
// Wire cursor
// ---------------------------------------------------------------------------

/// Cursor over the separator-delimited fields of a wire line's data.
///
/// Tokens are taken in order. Each typed read reports its field index in
/// [`DecodeError::MalformedField`], running off the end reports
/// [`DecodeError::ArityMismatch`], and [`finish`](Self::finish) rejects
/// leftover tokens so a corrupted line can't be silently truncated.
///
/// Empty tokens are always malformed: the wire form writes [`EMPTYSTR`]
/// for empty strings, so `ga,,3` only comes from a damaged line.
#[derive(Debug, Clone)]
pub struct WireFields<'a> {
    rest: Option<&'a str>,
    sep: char,
    index: usize,
}

impl<'a> WireFields<'a> {
    /// Fields separated by [`SEP2`].
    pub fn new(data: &'a str) -> Self {
        Self::with_separator(data, SEP2)
    }

    /// Fields separated by `sep`, for list-style messages ([`SEP`]) and
    /// free-text messages ([`TEXT_SEP`]).
    pub fn with_separator(data: &'a str, sep: char) -> Self {
        Self {
            rest: if data.is_empty() { None } else { Some(data) },
            sep,
            index: 0,
        }
    }

    /// Index of the next field to be read.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn has_more(&self) -> bool {
        self.rest.is_some()
    }

    /// Number of tokens not yet read.
    pub fn remaining(&self) -> usize {
        self.rest.map_or(0, |r| r.split(self.sep).count())
    }

    /// The next token, without consuming it.
    pub fn peek(&self) -> Option<&'a str> {
        self.rest
            .map(|r| r.split_once(self.sep).map_or(r, |(tok, _)| tok))
    }

    /// The next token exactly as written.
    pub fn raw(&mut self) -> Result<&'a str, DecodeError> {
        let rest = self.rest.ok_or(DecodeError::ArityMismatch {
            expected: self.index + 1,
            found: self.index,
        })?;
        let (token, next) = match rest.split_once(self.sep) {
            Some((token, next)) => (token, Some(next)),
            None => (rest, None),
        };
        if token.is_empty() {
            return Err(DecodeError::malformed(self.index, "empty field"));
        }
        self.rest = next;
        self.index += 1;
        Ok(token)
    }

    /// The next token as a string, with [`EMPTYSTR`] read as `""`.
    pub fn string(&mut self) -> Result<String, DecodeError> {
        Ok(decode_str(self.raw()?).to_string())
    }

    /// A game, channel, or player name. Unlike [`string`](Self::string),
    /// the [`EMPTYSTR`] sentinel is malformed here: names are never empty.
    pub fn name(&mut self, what: &str) -> Result<String, DecodeError> {
        let index = self.index;
        let name = self.string()?;
        crate::message::check_name(what, &name)
            .map_err(|err| DecodeError::rejected(index, &err))?;
        Ok(name)
    }

    pub fn int(&mut self) -> Result<i32, DecodeError> {
        let index = self.index;
        let token = self.raw()?;
        token.parse().map_err(|_| {
            DecodeError::malformed(
                index,
                format!("expected integer, got {token:?}"),
            )
        })
    }

    pub fn float(&mut self) -> Result<f32, DecodeError> {
        let index = self.index;
        let token = self.raw()?;
        token.parse().map_err(|_| {
            DecodeError::malformed(index, format!("expected number, got {token:?}"))
        })
    }

    /// `true` or `false`.
    pub fn bool(&mut self) -> Result<bool, DecodeError> {
        let index = self.index;
        match self.raw()? {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(DecodeError::malformed(
                index,
                format!("expected true or false, got {other:?}"),
            )),
        }
    }

    /// Everything left on the line, separators included, for a trailing
    /// rest-of-line field such as game options `PL=2,RD=t`.
    pub fn rest(&mut self) -> Result<&'a str, DecodeError> {
        let rest = self.rest.take().ok_or(DecodeError::ArityMismatch {
            expected: self.index + 1,
            found: self.index,
        })?;
        if rest.is_empty() {
            return Err(DecodeError::malformed(self.index, "empty field"));
        }
        self.index += 1;
        Ok(rest)
    }

    /// Reads every remaining token as an integer.
    pub fn ints(&mut self) -> Result<Vec<i32>, DecodeError> {
        let mut values = Vec::with_capacity(self.remaining());
        while self.has_more() {
            values.push(self.int()?);
        }
        Ok(values)
    }

    /// Five known resource amounts, clay through wood.
    pub fn known_resources(
        &mut self,
    ) -> Result<crate::types::ResourceSet, DecodeError> {
        Ok(crate::types::ResourceSet::known(
            self.int()?,
            self.int()?,
            self.int()?,
            self.int()?,
            self.int()?,
        ))
    }

    /// Fails if any token was left unread.
    pub fn finish(self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            extra => Err(DecodeError::ArityMismatch {
                expected: self.index,
                found: self.index + extra,
            }),
        }
    }

    /// Finishes the line and hands back the message built from its
    /// fields.
    ///
    /// Every parser ends here with the result of the type's validating
    /// constructor, so a line decodes only if the same message could have
    /// been constructed directly. A rejection is reported against the
    /// last field read.
    ///
    /// ```
    /// use hexwire_protocol::field::WireFields;
    /// use hexwire_protocol::message::GameState;
    ///
    /// let mut f = WireFields::new("\t,20");
    /// let game = f.string().unwrap();
    /// let state = f.int().unwrap();
    /// assert!(f.build(GameState::new(game, state)).is_err());
    /// ```
    pub fn build<T>(
        self,
        built: Result<T, ProtocolError>,
    ) -> Result<T, DecodeError> {
        let last = self.index.saturating_sub(1);
        self.finish()?;
        built.map_err(|err| DecodeError::rejected(last, &err))
    }
}

// ---------------------------------------------------------------------------
// Debug form helpers
// ---------------------------------------------------------------------------

/// Removes the `name=` part of each `|`-separated piece and joins the
/// values with [`SEP2`].
///
/// Only the text up to the first `=` is removed, so values may themselves
/// contain `=`. Pieces without `=` are kept as they are.
///
/// ```
/// use hexwire_protocol::field::strip_attrib_names;
///
/// assert_eq!(strip_attrib_names("game=ga|pn=3"), "ga,3");
/// assert_eq!(strip_attrib_names("game=fancy=name|x"), "fancy=name,x");
/// ```
pub fn strip_attrib_names(s: &str) -> String {
    strip_attribs_to_list(s).join(",")
}

/// Like [`strip_attrib_names`] but returns the values as a list.
/// The empty string gives a one-element list holding `""`.
pub fn strip_attribs_to_list(s: &str) -> Vec<String> {
    s.split(SEP)
        .map(|piece| match piece.split_once('=') {
            Some((_, value)) => value.to_string(),
            None => piece.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct Piece<'a> {
    /// Byte offset of the piece within the body.
    start: usize,
    name: Option<&'a str>,
    value: &'a str,
    /// Byte offset of `value` within the body.
    value_start: usize,
}

/// Cursor over the `name=value|name=value` body of a debug-form line.
///
/// Named lookups accept a list of names so legacy field names (`param1`,
/// `resource`) parse alongside current ones. When no piece carries any of
/// the names, the next unused piece is taken instead, which covers fields
/// printed without a name and renamed fields from old captures.
///
/// A piece taken that way can't later be claimed by its own name: in
/// `game=ga|offering=3|bogus=2` the `accepting` lookup takes `offering=3`
/// by position, and the `offering` lookup then fails instead of quietly
/// reading `bogus=2`.
#[derive(Debug, Clone)]
pub struct DebugFields<'a> {
    body: &'a str,
    pieces: Vec<Piece<'a>>,
    used: Vec<bool>,
    /// Pieces taken by position rather than by name.
    positional: Vec<bool>,
}

impl<'a> DebugFields<'a> {
    pub fn new(body: &'a str) -> Self {
        let mut pieces = Vec::new();
        if !body.is_empty() {
            let mut start = 0;
            for raw in body.split(SEP) {
                let piece = match raw.split_once('=') {
                    Some((name, value)) => Piece {
                        start,
                        name: Some(name),
                        value,
                        value_start: start + name.len() + 1,
                    },
                    None => Piece {
                        start,
                        name: None,
                        value: raw,
                        value_start: start,
                    },
                };
                pieces.push(piece);
                start += raw.len() + SEP.len_utf8();
            }
        }
        let used = vec![false; pieces.len()];
        let positional = used.clone();
        Self {
            body,
            pieces,
            used,
            positional,
        }
    }

    fn find(&self, names: &[&str]) -> Option<usize> {
        self.pieces.iter().enumerate().position(|(i, p)| {
            !self.used[i] && p.name.is_some_and(|n| names.contains(&n))
        })
    }

    fn next_unused(&self) -> Option<usize> {
        self.used.iter().position(|u| !u)
    }

    fn locate(&mut self, names: &[&str]) -> Result<usize, ParseError> {
        if let Some(i) = self.find(names) {
            return Ok(i);
        }
        let stolen = self.pieces.iter().enumerate().any(|(i, p)| {
            self.positional[i] && p.name.is_some_and(|n| names.contains(&n))
        });
        if stolen {
            return Err(ParseError::malformed(
                primary(names),
                "piece was already read by position for an earlier field",
            ));
        }
        let i = self
            .next_unused()
            .ok_or_else(|| ParseError::MissingField(primary(names).to_string()))?;
        self.positional[i] = true;
        Ok(i)
    }

    /// The value of the first piece named in `names`, or of the next
    /// unused piece.
    pub fn value(&mut self, names: &[&str]) -> Result<&'a str, ParseError> {
        let i = self.locate(names)?;
        self.used[i] = true;
        Ok(self.pieces[i].value)
    }

    /// Like [`value`](Self::value) but only matches by name, for optional
    /// trailing fields.
    pub fn opt_value(&mut self, names: &[&str]) -> Option<&'a str> {
        let i = self.find(names)?;
        self.used[i] = true;
        Some(self.pieces[i].value)
    }

    /// True if an unused piece is named in `names`.
    pub fn has(&self, names: &[&str]) -> bool {
        self.find(names).is_some()
    }

    /// Whole text of the next unused piece, name included.
    pub fn next_raw(&mut self) -> Option<&'a str> {
        let i = self.next_unused()?;
        self.used[i] = true;
        let p = self.pieces[i];
        let end = self
            .pieces
            .get(i + 1)
            .map_or(self.body.len(), |next| next.start - SEP.len_utf8());
        Some(&self.body[p.start..end])
    }

    pub fn string(&mut self, names: &[&str]) -> Result<String, ParseError> {
        self.value(names).map(str::to_string)
    }

    pub fn int(&mut self, names: &[&str]) -> Result<i32, ParseError> {
        let value = self.value(names)?;
        parse_int(primary(names), value)
    }

    /// A hex coordinate, with or without a `0x` prefix.
    pub fn hex(&mut self, names: &[&str]) -> Result<i32, ParseError> {
        let value = self.value(names)?;
        parse_hex(primary(names), value)
    }

    pub fn float(&mut self, names: &[&str]) -> Result<f32, ParseError> {
        let value = self.value(names)?;
        value.parse().map_err(|_| {
            ParseError::malformed(
                primary(names),
                format!("expected number, got {value:?}"),
            )
        })
    }

    pub fn bool(&mut self, names: &[&str]) -> Result<bool, ParseError> {
        let value = self.value(names)?;
        parse_bool(primary(names), value)
    }

    /// A list printed either as `[a, b, c]` or as `a,b,c`.
    pub fn list(&mut self, names: &[&str]) -> Result<Vec<String>, ParseError> {
        let value = self.value(names)?;
        Ok(split_list(value))
    }

    /// The named piece's value and everything after it, `|` included,
    /// for trailing free text.
    pub fn rest(&mut self, names: &[&str]) -> Result<&'a str, ParseError> {
        let i = self.locate(names)?;
        for used in &mut self.used[i..] {
            *used = true;
        }
        Ok(&self.body[self.pieces[i].value_start..])
    }

    /// Everything from the next unused piece to the end, names included.
    pub fn raw_rest(&mut self) -> Option<&'a str> {
        let i = self.next_unused()?;
        for used in &mut self.used[i..] {
            *used = true;
        }
        Some(&self.body[self.pieces[i].start..])
    }

    /// A resource set printed as
    /// `name=clay=1|ore=0|sheep=0|wheat=0|wood=0|unknown=0`.
    pub fn resource_set(
        &mut self,
        names: &[&str],
    ) -> Result<crate::types::ResourceSet, ParseError> {
        const PARTS: [&str; 6] =
            ["clay", "ore", "sheep", "wheat", "wood", "unknown"];
        let field = primary(names);
        let anchor = self.locate(names)?;
        if anchor + PARTS.len() > self.pieces.len() {
            return Err(ParseError::MissingField(format!("{field}.unknown")));
        }

        let mut amounts = [0; 6];
        for (k, part) in PARTS.iter().enumerate() {
            let i = anchor + k;
            if self.used[i] {
                return Err(ParseError::MissingField(format!("{field}.{part}")));
            }
            let piece = self.pieces[i];
            // The first piece is `give=clay=1`: its value still has the
            // resource name in front.
            let (name, value) = if k == 0 {
                match piece.value.split_once('=') {
                    Some((n, v)) => (Some(n), v),
                    None => (None, piece.value),
                }
            } else {
                (piece.name, piece.value)
            };
            if name.is_some_and(|n| n != *part) {
                return Err(ParseError::malformed(
                    field,
                    format!("expected {part}, got {:?}", name.unwrap_or_default()),
                ));
            }
            amounts[k] = parse_int(part, value)?;
            self.used[i] = true;
        }
        let [clay, ore, sheep, wheat, wood, unknown] = amounts;
        Ok(crate::types::ResourceSet::new(clay, ore, sheep, wheat, wood, unknown))
    }

    /// Fails if any piece was left unread.
    pub fn finish(self) -> Result<(), ParseError> {
        let read = self.used.iter().filter(|u| **u).count();
        if read == self.pieces.len() {
            Ok(())
        } else {
            Err(ParseError::ArityMismatch {
                expected: read,
                found: self.pieces.len(),
            })
        }
    }
}

fn primary<'n>(names: &[&'n str]) -> &'n str {
    names.first().copied().unwrap_or("?")
}

pub(crate) fn parse_int(name: &str, value: &str) -> Result<i32, ParseError> {
    value.parse().map_err(|_| {
        ParseError::malformed(name, format!("expected integer, got {value:?}"))
    })
}

/// Reads what [`hex`] writes, with an optional `0x` after the sign.
/// The sign is ours to read: digits starting with `+` or `-` are
/// malformed, and so is anything outside `i32`.
pub(crate) fn parse_hex(name: &str, value: &str) -> Result<i32, ParseError> {
    let malformed =
        || ParseError::malformed(name, format!("expected hex, got {value:?}"));
    let (negative, digits) = match value.strip_prefix('-') {
        Some(d) => (true, d),
        None => (false, value),
    };
    let digits = digits.strip_prefix("0x").unwrap_or(digits);
    if digits.starts_with(['+', '-']) {
        return Err(malformed());
    }
    let magnitude = i64::from_str_radix(digits, 16).map_err(|_| malformed())?;
    let signed = if negative { -magnitude } else { magnitude };
    i32::try_from(signed).map_err(|_| malformed())
}

pub(crate) fn parse_bool(name: &str, value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::malformed(
            name,
            format!("expected true or false, got {value:?}"),
        )),
    }
}

/// Splits `[a, b, c]` or `a,b,c` into items. `[]` is the empty list.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    match value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        Some("") => Vec::new(),
        Some(inner) => inner.split(", ").map(str::to_string).collect(),
        None if value.is_empty() => Vec::new(),
        None => value.split(SEP2).map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_attrib_names() {
        let cases = [
            ("", ""),
            ("xyz", "xyz"),
            ("param=xyz", "xyz"),
            ("xyz|p=abc", "xyz,abc"),
            ("param=xyz|p=abc", "xyz,abc"),
            ("game=fancy=game==name|p1=abc|p2=xyz", "fancy=game==name,abc,xyz"),
            ("game=ga|pn1=usual_name|pn2===fancy=name", "ga,usual_name,==fancy=name"),
            (
                "game=ga_special=name|members=[player==0, droid 1, robot 2, debug]",
                "ga_special=name,[player==0, droid 1, robot 2, debug]",
            ),
        ];
        for (input, expected) in cases {
            assert_eq!(strip_attrib_names(input), expected, "input {input:?}");
        }
    }

    #[test]
    fn test_strip_attribs_to_list() {
        assert_eq!(strip_attribs_to_list("xyz"), vec!["xyz"]);
        assert_eq!(strip_attribs_to_list("param=xyz"), vec!["xyz"]);
        assert_eq!(strip_attribs_to_list("xyz|abc"), vec!["xyz", "abc"]);
        assert_eq!(strip_attribs_to_list("xyz|param=abc"), vec!["xyz", "abc"]);
        assert_eq!(
            strip_attribs_to_list("param=xyz|param=abc"),
            vec!["xyz", "abc"]
        );
        assert_eq!(strip_attribs_to_list(""), vec![""]);
    }

    #[test]
    fn test_empty_string_sentinel() {
        assert_eq!(encode_str(""), "\t");
        assert_eq!(encode_str("pw"), "pw");
        assert_eq!(decode_str("\t"), "");
        assert_eq!(decode_opt("\t"), None);
        assert_eq!(decode_opt("en_US"), Some("en_US".to_string()));
        assert_eq!(encode_opt(None), "\t");
    }

    #[test]
    fn test_wire_fields_reads_in_order() {
        let mut f = WireFields::new("ga,-2,true,0.13");
        assert_eq!(f.string().unwrap(), "ga");
        assert_eq!(f.int().unwrap(), -2);
        assert!(f.bool().unwrap());
        assert!((f.float().unwrap() - 0.13).abs() < f32::EPSILON);
        assert!(!f.has_more());
        f.finish().unwrap();
    }

    #[test]
    fn test_wire_fields_reports_field_index() {
        let mut f = WireFields::new("ga,x");
        f.string().unwrap();
        assert_eq!(
            f.int(),
            Err(DecodeError::MalformedField {
                index: 1,
                reason: "expected integer, got \"x\"".into()
            })
        );
    }

    #[test]
    fn test_wire_fields_rejects_empty_token() {
        let mut f = WireFields::new("ga,,3");
        f.string().unwrap();
        assert!(matches!(
            f.int(),
            Err(DecodeError::MalformedField { index: 1, .. })
        ));
    }

    #[test]
    fn test_wire_fields_arity() {
        let mut f = WireFields::new("ga");
        f.string().unwrap();
        assert_eq!(
            f.int(),
            Err(DecodeError::ArityMismatch {
                expected: 2,
                found: 1
            })
        );

        let mut f = WireFields::new("ga,1,2");
        f.string().unwrap();
        assert_eq!(
            f.finish(),
            Err(DecodeError::ArityMismatch {
                expected: 1,
                found: 3
            })
        );
    }

    #[test]
    fn test_wire_fields_name_rejects_empty_sentinel() {
        let mut f = WireFields::new("ga,\t");
        assert_eq!(f.name("game").unwrap(), "ga");
        assert!(matches!(
            f.name("nickname"),
            Err(DecodeError::MalformedField { index: 1, .. })
        ));
    }

    #[test]
    fn test_wire_fields_build_checks_arity_first() {
        let mut f = WireFields::new("ga,1");
        f.string().unwrap();
        let built: Result<(), ProtocolError> =
            Err(crate::error::invalid("never reached"));
        assert!(matches!(
            f.build(built),
            Err(DecodeError::ArityMismatch { expected: 1, found: 2 })
        ));

        let mut f = WireFields::new("ga,1");
        f.string().unwrap();
        f.int().unwrap();
        let built: Result<(), ProtocolError> =
            Err(crate::error::invalid("seat count 5"));
        assert_eq!(
            f.build(built),
            Err(DecodeError::MalformedField {
                index: 1,
                reason: "invalid message: seat count 5".into()
            })
        );
    }

    #[test]
    fn test_wire_fields_rest_keeps_commas() {
        let mut f = WireFields::new("ga,3,PL=2,RD=t");
        f.string().unwrap();
        f.int().unwrap();
        assert_eq!(f.rest().unwrap(), "PL=2,RD=t");
        f.finish().unwrap();
    }

    #[test]
    fn test_wire_fields_separator_switch() {
        let mut f = WireFields::with_separator("cha\0member name\0a,b", TEXT_SEP);
        assert_eq!(f.raw().unwrap(), "cha");
        assert_eq!(f.raw().unwrap(), "member name");
        assert_eq!(f.rest().unwrap(), "a,b");
    }

    #[test]
    fn test_debug_fields_named_and_positional() {
        let mut f = DebugFields::new("game=ga|param1=3|param2=2");
        assert_eq!(f.value(&["game"]).unwrap(), "ga");
        // Legacy names fall through to position.
        assert_eq!(f.int(&["rejoinPN"]).unwrap(), 3);
        assert_eq!(f.int(&["requestingPN"]).unwrap(), 2);
        f.finish().unwrap();
    }

    #[test]
    fn test_debug_fields_order_independent() {
        let mut f = DebugFields::new("offering=3|game=ga|accepting=2");
        assert_eq!(f.value(&["game"]).unwrap(), "ga");
        assert_eq!(f.int(&["accepting"]).unwrap(), 2);
        assert_eq!(f.int(&["offering"]).unwrap(), 3);
        f.finish().unwrap();
    }

    #[test]
    fn test_debug_fields_position_cannot_take_a_named_piece_twice() {
        let mut f = DebugFields::new("game=ga|offering=3|bogus=2");
        f.value(&["game"]).unwrap();
        // No `accepting` piece, so position takes `offering=3`.
        assert_eq!(f.int(&["accepting"]).unwrap(), 3);
        assert!(matches!(
            f.int(&["offering"]),
            Err(ParseError::MalformedField { name, .. }) if name == "offering"
        ));
    }

    #[test]
    fn test_debug_fields_rest_and_raw_rest() {
        let mut f = DebugFields::new("sv=11|status=a|b=c");
        assert_eq!(f.int(&["sv"]).unwrap(), 11);
        assert_eq!(f.rest(&["status"]).unwrap(), "a|b=c");
        f.finish().unwrap();

        let mut f = DebugFields::new("game=ga|e2=25,e1=2");
        f.value(&["game"]).unwrap();
        assert_eq!(f.raw_rest(), Some("e2=25,e1=2"));
    }

    #[test]
    fn test_debug_fields_resource_set() {
        let mut f = DebugFields::new(
            "game=ga|give=clay=0|ore=1|sheep=0|wheat=1|wood=0|unknown=0|get=clay=2|ore=0|sheep=0|wheat=0|wood=0|unknown=0",
        );
        f.value(&["game"]).unwrap();
        let give = f.resource_set(&["give"]).unwrap();
        let get = f.resource_set(&["get"]).unwrap();
        assert_eq!(give.ore(), 1);
        assert_eq!(give.wheat(), 1);
        assert_eq!(get.clay(), 2);
        f.finish().unwrap();
    }

    #[test]
    fn test_debug_fields_unused_piece_is_arity_error() {
        let mut f = DebugFields::new("game=ga|extra=1");
        f.value(&["game"]).unwrap();
        assert!(matches!(
            f.finish(),
            Err(ParseError::ArityMismatch { expected: 1, found: 2 })
        ));
    }

    #[test]
    fn test_hex_round_trip_and_prefix() {
        assert_eq!(hex(0x40a), "40a");
        assert_eq!(hex(-0x305), "-305");
        assert_eq!(parse_hex("coord", "0x405").unwrap(), 0x405);
        assert_eq!(parse_hex("coord", "-305").unwrap(), -0x305);
        assert_eq!(parse_hex("coord", "-0x305").unwrap(), -0x305);
        assert!(parse_hex("coord", "zz").is_err());
    }

    #[test]
    fn test_hex_rejects_doubled_signs() {
        for value in ["--5", "-+5", "+5", "--80000000", "0x-5", "-0x-5", "-", "0x"] {
            assert!(parse_hex("coord", value).is_err(), "value {value:?}");
        }
    }

    #[test]
    fn test_hex_covers_i32_range() {
        assert_eq!(hex(i32::MIN), "-80000000");
        assert_eq!(parse_hex("coord", "-80000000").unwrap(), i32::MIN);
        assert_eq!(parse_hex("coord", "7fffffff").unwrap(), i32::MAX);
        assert!(parse_hex("coord", "80000000").is_err());
        assert!(parse_hex("coord", "-80000001").is_err());
    }

    #[test]
    fn test_split_list_forms() {
        assert_eq!(
            split_list("[player0, droid 1, debug]"),
            vec!["player0", "droid 1", "debug"]
        );
        assert_eq!(split_list("player0,droid 1"), vec!["player0", "droid 1"]);
        assert!(split_list("[]").is_empty());
    }

    #[test]
    fn test_is_single_line_and_safe() {
        assert!(is_single_line_and_safe("game name", false));
        assert!(!is_single_line_and_safe("a,b", false));
        assert!(is_single_line_and_safe("a,b", true));
        assert!(!is_single_line_and_safe("a|b", true));
        assert!(!is_single_line_and_safe("a\nb", true));
        assert!(is_single_line_and_safe(GAME_NONE, false));
    }
}
