//! Status message sent in reply to join, login, and create requests.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::{MessageBody, check_text};
use crate::error::{DecodeError, ParseError, ProtocolError, invalid};
use crate::field::{self, DebugFields, SEP2};

/// Status values carried by [`StatusMessage`].
///
/// Which peer versions understand each value, and what to send instead
/// to older peers, lives in [`crate::compat::STATUS_VALUES`].
pub mod status_value {
    pub const OK: i32 = 0;
    pub const NOT_OK_GENERIC: i32 = 1;
    pub const NAME_NOT_FOUND: i32 = 2;
    pub const PW_WRONG: i32 = 3;
    pub const NAME_IN_USE: i32 = 4;
    pub const CANT_JOIN_GAME_VERSION: i32 = 5;
    pub const PROBLEM_WITH_DB: i32 = 6;
    pub const ACCT_CREATED_OK: i32 = 7;
    pub const ACCT_NOT_CREATED_ERR: i32 = 8;
    pub const NEWGAME_OPTION_UNKNOWN: i32 = 9;
    pub const NEWGAME_OPTION_VALUE_TOONEW: i32 = 10;
    pub const NEWGAME_ALREADY_EXISTS: i32 = 11;
    pub const NEWGAME_NAME_REJECTED: i32 = 12;
    pub const NEWGAME_NAME_TOO_LONG: i32 = 13;
    pub const NEWGAME_TOO_MANY_CREATED: i32 = 14;
    pub const NEWCHANNEL_TOO_MANY_CREATED: i32 = 15;
    pub const PW_REQUIRED: i32 = 16;
    pub const ACCT_NOT_CREATED_DENIED: i32 = 17;
    pub const ACCT_CREATED_OK_FIRST_ONE: i32 = 18;
    pub const NAME_NOT_ALLOWED: i32 = 19;
    pub const OK_SET_NICKNAME: i32 = 20;
    pub const OK_DEBUG_MODE_ON: i32 = 21;
}

/// A status value and a line of text for the user.
///
/// Wire: `1069|11,nonzero status text`, or just the text when the value
/// is [`status_value::OK`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusMessage {
    status_value: i32,
    text: String,
}

impl StatusMessage {
    /// An [`OK`](status_value::OK) status.
    pub fn new(text: impl Into<String>) -> Result<Self, ProtocolError> {
        Self::with_value(status_value::OK, text)
    }

    pub fn with_value(
        status_value: i32,
        text: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        if status_value < 0 {
            return Err(invalid(format!("negative status value {status_value}")));
        }
        let text = text.into();
        check_text("status text", &text, None)?;
        Ok(Self { status_value, text })
    }

    pub fn status_value(&self) -> i32 {
        self.status_value
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The same text with a different status value.
    pub fn with_status_value(&self, status_value: i32) -> Self {
        Self {
            status_value: status_value.max(0),
            text: self.text.clone(),
        }
    }
}

/// True if the text itself starts like `11,`, so an OK status must write
/// its `0,` explicitly to survive decoding.
fn looks_like_value_prefix(text: &str) -> bool {
    text.split_once(SEP2)
        .is_some_and(|(head, _)| !head.is_empty() && head.parse::<i32>().is_ok())
}

impl MessageBody for StatusMessage {
    fn write_wire(&self, out: &mut String) {
        if self.status_value != 0 || looks_like_value_prefix(&self.text) {
            let _ = write!(out, "{}{SEP2}", self.status_value);
        }
        out.push_str(field::encode_str(&self.text));
    }

    fn write_debug(&self, out: &mut String) {
        if self.status_value != 0 {
            let _ = write!(out, "sv={}|", self.status_value);
        }
        out.push_str("status=");
        out.push_str(&self.text);
    }

    fn parse_wire(data: &str) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::ArityMismatch {
                expected: 1,
                found: 0,
            });
        }
        let (status_value, text, text_index) = match data.split_once(SEP2) {
            Some(("", _)) => {
                return Err(DecodeError::malformed(0, "empty status value"));
            }
            // A non-numeric head is part of the text.
            Some((head, rest)) => match head.parse::<i32>() {
                Ok(sv) => (sv.max(0), rest, 1),
                Err(_) => (0, data, 0),
            },
            None => (0, data, 0),
        };
        Self::with_value(status_value, field::decode_str(text))
            .map_err(|err| DecodeError::rejected(text_index, &err))
    }

    fn parse_debug(body: &str) -> Result<Self, ParseError> {
        let mut f = DebugFields::new(body);
        let status_value = match f.opt_value(&["sv"]) {
            Some(v) => field::parse_int("sv", v)?,
            None => 0,
        };
        let text = f.rest(&["status"])?;
        Ok(Self::with_value(status_value, text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[test]
    fn test_ok_status_omits_value() {
        let msg = Message::from(StatusMessage::new("simple ok status").unwrap());
        assert_eq!(msg.to_wire(), "1069|simple ok status");
        assert_eq!(msg.to_debug(), "SOCStatusMessage:status=simple ok status");
    }

    #[test]
    fn test_nonzero_status_value() {
        let msg = StatusMessage::with_value(11, "nonzero status text").unwrap();
        let msg = Message::from(msg);
        assert_eq!(msg.to_wire(), "1069|11,nonzero status text");
        assert_eq!(
            msg.to_debug(),
            "SOCStatusMessage:sv=11|status=nonzero status text"
        );
    }

    #[test]
    fn test_text_with_commas_keeps_them() {
        let parsed = StatusMessage::parse_wire("hello, world").unwrap();
        assert_eq!(parsed.status_value(), 0);
        assert_eq!(parsed.text(), "hello, world");

        let parsed = StatusMessage::parse_wire("3,bad, password").unwrap();
        assert_eq!(parsed.status_value(), 3);
        assert_eq!(parsed.text(), "bad, password");
    }

    #[test]
    fn test_ok_text_that_looks_like_a_value() {
        let msg = StatusMessage::new("5,things").unwrap();
        let mut out = String::new();
        msg.write_wire(&mut out);
        assert_eq!(out, "0,5,things");
        assert_eq!(StatusMessage::parse_wire(&out).unwrap(), msg);
    }

    #[test]
    fn test_negative_value_reads_as_ok() {
        let parsed = StatusMessage::parse_wire("-4,odd").unwrap();
        assert_eq!(parsed.status_value(), 0);
        assert_eq!(parsed.text(), "odd");
        assert!(StatusMessage::parse_wire(",odd").is_err());
        assert!(StatusMessage::with_value(-1, "x").is_err());
    }

    #[test]
    fn test_debug_text_may_contain_bar() {
        let parsed = StatusMessage::parse_debug("sv=2|status=a|b=c").unwrap();
        assert_eq!(parsed.status_value(), 2);
        assert_eq!(parsed.text(), "a|b=c");
    }

    #[test]
    fn test_wire_text_is_checked_like_constructed_text() {
        assert_eq!(
            StatusMessage::parse_wire("3,two\rlines"),
            Err(DecodeError::MalformedField {
                index: 1,
                reason: "invalid message: status text spans more than one line".into(),
            })
        );
        assert!(matches!(
            StatusMessage::parse_wire("two\rlines"),
            Err(DecodeError::MalformedField { index: 0, .. })
        ));
    }
}
