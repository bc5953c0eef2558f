//! Error types for the protocol layer.
//!
//! Each concern gets its own enum: a bad wire line is a [`DecodeError`], a
//! bad debug line is a [`ParseError`], and a value an older peer cannot
//! understand is a [`NoFallbackAvailable`]. Constructors that reject
//! impossible field combinations return [`ProtocolError`], and adapting a
//! message for an older peer fails with a [`CompatError`].

/// Errors from decoding a canonical wire line.
///
/// All of these are fatal to the one line and nothing else: the caller
/// logs and drops the message, the connection stays up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The leading type id is not numeric or not in the registry.
    #[error("unknown message type id: {0:?}")]
    UnknownTypeId(String),

    /// A field failed to parse into its declared kind.
    ///
    /// `index` is the 0-based position of the field within the message
    /// data (after the type id).
    #[error("malformed field {index}: {reason}")]
    MalformedField { index: usize, reason: String },

    /// Too few or too many fields for the message type.
    #[error("wrong field count: expected {expected}, found {found}")]
    ArityMismatch { expected: usize, found: usize },
}

impl DecodeError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedField {
            index,
            reason: reason.into(),
        }
    }

    /// The fields read but a message constructor refused them.
    pub(crate) fn rejected(index: usize, err: &ProtocolError) -> Self {
        Self::malformed(index, err.to_string())
    }
}

/// Errors from parsing a debug-form line such as
/// `SOCGameState:game=ga|state=20`.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The line has no `:` between type name and fields.
    #[error("missing ':' after message type name")]
    MissingSeparator,

    /// The type name is neither a current name nor a legacy alias.
    #[error("unknown message type name: {0:?}")]
    UnknownLegacyName(String),

    /// A required field is absent.
    #[error("missing field {0:?}")]
    MissingField(String),

    /// A field is present but its value does not parse.
    #[error("malformed field {name:?}: {reason}")]
    MalformedField { name: String, reason: String },

    /// Leftover or missing positional pieces.
    #[error("wrong field count: expected {expected}, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// The fields parsed but describe a message that cannot exist.
    #[error(transparent)]
    Invalid(#[from] ProtocolError),
}

impl ParseError {
    pub(crate) fn malformed(name: &str, reason: impl Into<String>) -> Self {
        Self::MalformedField {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// A sender tried to encode a value for a peer version that has no
/// representable equivalent.
///
/// This means a fallback table is missing an entry for that value. It is
/// a local precondition violation rather than something the peer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no fallback for value {value} at peer version {peer_version}")]
pub struct NoFallbackAvailable {
    pub value: i32,
    pub peer_version: i32,
}

/// Errors from adapting a message for an older peer.
#[derive(Debug, thiserror::Error)]
pub enum CompatError {
    /// A value in the message has no equivalent at the peer's version.
    #[error(transparent)]
    NoFallback(#[from] NoFallbackAvailable),

    /// The message type is newer than the peer and has no older form.
    #[error("{message} needs version {min_version}, peer has {peer_version}")]
    PeerTooOld {
        message: crate::message::MessageType,
        min_version: i32,
        peer_version: i32,
    },

    /// The older form could not hold the message's content.
    #[error(transparent)]
    Conversion(#[from] ProtocolError),
}

/// Errors from constructing or structurally encoding messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Field values that violate the message type's invariants,
    /// e.g. a seat-lock list that is neither 4 nor 6 seats long.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// JSON serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// JSON deserialization failed.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A line handed to a byte codec is not UTF-8.
    #[error("line is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),

    /// A canonical wire line failed to decode.
    #[error(transparent)]
    Wire(#[from] DecodeError),

    /// A debug-form line failed to parse.
    #[error(transparent)]
    Debug(#[from] Box<ParseError>),
}

// `ParseError` embeds `ProtocolError` for constructor failures, so this
// direction goes through a `Box` to keep the types finite.
impl From<ParseError> for ProtocolError {
    fn from(err: ParseError) -> Self {
        Self::Debug(Box::new(err))
    }
}

// serde_json::Error has no PartialEq; JSON failures never compare equal.
impl PartialEq for ProtocolError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidMessage(a), Self::InvalidMessage(b)) => a == b,
            (Self::Wire(a), Self::Wire(b)) => a == b,
            (Self::Debug(a), Self::Debug(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ProtocolError {}

pub(crate) fn invalid(reason: impl Into<String>) -> ProtocolError {
    ProtocolError::InvalidMessage(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_messages_name_the_field() {
        let err = DecodeError::malformed(2, "expected integer, got \"x\"");
        assert_eq!(
            err.to_string(),
            "malformed field 2: expected integer, got \"x\""
        );
        let err = DecodeError::ArityMismatch {
            expected: 3,
            found: 2,
        };
        assert!(err.to_string().contains("expected 3"));
    }

    #[test]
    fn test_parse_error_wraps_invalid_message() {
        let err: ParseError = invalid("seat count 5").into();
        assert!(matches!(err, ParseError::Invalid(_)));
        assert_eq!(err.to_string(), "invalid message: seat count 5");
    }

    #[test]
    fn test_protocol_error_from_parse_error_compares_equal() {
        let a: ProtocolError = ParseError::MissingSeparator.into();
        let b: ProtocolError = ParseError::MissingSeparator.into();
        assert_eq!(a, b);
    }

    #[test]
    fn test_compat_error_wraps_no_fallback() {
        let err: CompatError = NoFallbackAvailable {
            value: 20,
            peer_version: 1199,
        }
        .into();
        assert!(matches!(err, CompatError::NoFallback(_)));
        let err = CompatError::PeerTooOld {
            message: crate::message::MessageType::ReportRobbery,
            min_version: 2450,
            peer_version: 2000,
        };
        assert_eq!(
            err.to_string(),
            "SOCReportRobbery(1102) needs version 2450, peer has 2000"
        );
    }

    #[test]
    fn test_no_fallback_display() {
        let err = NoFallbackAvailable {
            value: 20,
            peer_version: 1199,
        };
        assert_eq!(
            err.to_string(),
            "no fallback for value 20 at peer version 1199"
        );
    }
}
