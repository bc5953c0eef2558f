//! Outbound encoding for one connected peer.

use hexwire_protocol::{Message, compat, to_wire};
use tracing::debug;

use crate::HexwireError;

/// Encodes messages for a peer running a known protocol version.
///
/// Each message is first rewritten into the forms the peer understands
/// (older status values, per-seat lock messages, plain game text), then
/// rendered as wire lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerEncoder {
    peer_version: i32,
}

impl PeerEncoder {
    pub fn new(peer_version: i32) -> Self {
        Self { peer_version }
    }

    pub fn peer_version(&self) -> i32 {
        self.peer_version
    }

    /// The wire lines to send for `msg`, in order.
    pub fn encode(&self, msg: &Message) -> Result<Vec<String>, HexwireError> {
        let adapted = compat::adapt_for_peer(msg, self.peer_version).inspect_err(|err| {
            debug!(
                peer_version = self.peer_version,
                message_type = %msg.message_type(),
                %err,
                "cannot adapt message for peer"
            );
        })?;
        Ok(adapted.iter().map(to_wire).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexwire_protocol::message::{StatusMessage, status_value};

    #[test]
    fn test_current_peer_gets_message_unchanged() {
        let msg = Message::from(
            StatusMessage::with_value(status_value::PW_REQUIRED, "need pw").unwrap(),
        );
        let lines = PeerEncoder::new(2500).encode(&msg).unwrap();
        assert_eq!(lines, ["1069|16,need pw"]);
    }

    #[test]
    fn test_old_peer_gets_fallback_value() {
        let msg = Message::from(
            StatusMessage::with_value(status_value::PW_REQUIRED, "need pw").unwrap(),
        );
        let lines = PeerEncoder::new(1118).encode(&msg).unwrap();
        assert_eq!(lines, ["1069|3,need pw"]);
    }

    #[test]
    fn test_missing_fallback_is_an_error() {
        let msg = Message::from(
            StatusMessage::with_value(status_value::OK_SET_NICKNAME, "nick set").unwrap(),
        );
        let err = PeerEncoder::new(1199).encode(&msg).unwrap_err();
        assert!(matches!(err, HexwireError::Compat(_)));
    }
}
