//! Unified error type for the hexwire facade.

use hexwire_protocol::{CompatError, DecodeError, ParseError, ProtocolError};

/// Top-level error wrapping every protocol error plus I/O.
///
/// `#[from]` on each variant lets `?` convert protocol errors directly.
#[derive(Debug, thiserror::Error)]
pub enum HexwireError {
    /// A wire line failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A debug-form line failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A message could not be constructed or encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A message could not be adapted for the destination peer.
    #[error(transparent)]
    Compat(#[from] CompatError),

    /// Reading the input failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Replay stopped at the first bad line.
    #[error("replay halted at line {line}: {reason}")]
    ReplayHalted { line: usize, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexwire_protocol::NoFallbackAvailable;

    #[test]
    fn test_from_decode_error() {
        let err: HexwireError = DecodeError::UnknownTypeId("77".into()).into();
        assert!(matches!(err, HexwireError::Decode(_)));
        assert!(err.to_string().contains("77"));
    }

    #[test]
    fn test_from_parse_error() {
        let err: HexwireError = ParseError::MissingSeparator.into();
        assert!(matches!(err, HexwireError::Parse(_)));
    }

    #[test]
    fn test_from_compat_error() {
        let err: HexwireError = CompatError::from(NoFallbackAvailable {
            value: 20,
            peer_version: 1199,
        })
        .into();
        assert!(matches!(err, HexwireError::Compat(_)));
        assert_eq!(err.to_string(), "no fallback for value 20 at peer version 1199");
    }

    #[test]
    fn test_from_io_error() {
        let err: HexwireError = std::io::Error::other("disk gone").into();
        assert!(matches!(err, HexwireError::Io(_)));
    }

    #[test]
    fn test_replay_halted_display() {
        let err = HexwireError::ReplayHalted {
            line: 4,
            reason: "unknown message type id: \"9\"".into(),
        };
        assert!(err.to_string().starts_with("replay halted at line 4"));
    }
}
