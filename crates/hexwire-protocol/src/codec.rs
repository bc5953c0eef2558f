//! Encoding and decoding whole lines.
//!
//! [`from_wire`] and [`from_debug`] dispatch through the registry to the
//! per-type parsers. The [`Codec`] trait wraps one line form behind a
//! byte interface so a transport can be handed any of them.
//!
//! ## Line forms
//!
//! Every message has two text renderings. The wire form is what peers
//! exchange: the numeric type id, a `|`, then the fields joined by `,`.
//! A message with no fields is just its id.
//!
//! ```text
//! 1025|ga,20
//! 1065
//! ```
//!
//! The debug form names the type and every field, and is what logs and
//! test fixtures use:
//!
//! ```text
//! SOCGameState:game=ga|state=20
//! SOCAdminReset:
//! ```
//!
//! Debug parsing also accepts type names from older releases, so a
//! captured log keeps decoding after a message is renamed.
//!
//! ## Validation
//!
//! Decoding never builds a message its constructor would refuse. Each
//! parser reads raw fields and then hands them to the type's constructor;
//! a refusal becomes [`DecodeError::MalformedField`] pointing at the last
//! field read, or [`ParseError::Invalid`] for debug lines.
//!
//! ```rust
//! use hexwire_protocol::{DecodeError, from_wire};
//!
//! // An empty game name is the `\t` placeholder on the wire.
//! assert!(matches!(
//!     from_wire("1025|\t,20"),
//!     Err(DecodeError::MalformedField { index: 0, .. })
//! ));
//! ```
//!
//! [`JsonCodec`] has no per-field parser, so it re-encodes what serde
//! produced and decodes it again through the wire path. Anything that
//! does not come back identical is rejected.

use tracing::debug;

use crate::error::{DecodeError, ParseError};
use crate::message::Message;
use crate::registry;
use crate::ProtocolError;

/// Renders `id|data`.
pub fn to_wire(msg: &Message) -> String {
    msg.to_wire()
}

/// Renders `Name:field=value|...`.
pub fn to_debug(msg: &Message) -> String {
    msg.to_debug()
}

/// Decodes one canonical wire line.
///
/// A line without `|` is a message with no data. Anything after the first
/// `|` is handed to the type's parser unchanged.
pub fn from_wire(line: &str) -> Result<Message, DecodeError> {
    let (id, data) = line.split_once('|').unwrap_or((line, ""));
    let entry = id
        .parse::<u32>()
        .ok()
        .and_then(registry::lookup_by_id)
        .ok_or_else(|| DecodeError::UnknownTypeId(id.to_string()))?;
    entry.parse_wire(data).inspect_err(|err| {
        debug!(type_id = entry.id(), message_type = entry.name(), %err, "wire decode failed");
    })
}

/// Parses one debug-form line. Legacy type names are accepted.
pub fn from_debug(line: &str) -> Result<Message, ParseError> {
    let (name, body) = line.split_once(':').ok_or(ParseError::MissingSeparator)?;
    let entry = registry::lookup_by_name(name)
        .ok_or_else(|| ParseError::UnknownLegacyName(name.to_string()))?;
    entry.parse_debug(body).inspect_err(|err| {
        debug!(message_type = name, %err, "debug parse failed");
    })
}

/// Converts messages to and from bytes in one line form.
///
/// Implementations hold no state, so one value can be shared by every
/// connection task.
pub trait Codec: Send + Sync + 'static {
    fn encode(&self, msg: &Message) -> Result<Vec<u8>, ProtocolError>;

    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError>;
}

/// The canonical `id|data` form.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireCodec;

impl Codec for WireCodec {
    fn encode(&self, msg: &Message) -> Result<Vec<u8>, ProtocolError> {
        Ok(to_wire(msg).into_bytes())
    }

    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError> {
        Ok(from_wire(std::str::from_utf8(data)?)?)
    }
}

/// The human-readable debug form.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugCodec;

impl Codec for DebugCodec {
    fn encode(&self, msg: &Message) -> Result<Vec<u8>, ProtocolError> {
        Ok(to_debug(msg).into_bytes())
    }

    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError> {
        Ok(from_debug(std::str::from_utf8(data)?)?)
    }
}

/// JSON via `serde_json`, for tooling that wants structured messages.
///
/// ```rust
/// use hexwire_protocol::{Codec, JsonCodec, Message};
/// use hexwire_protocol::message::GameState;
///
/// let msg = Message::from(GameState::new("ga", 20).unwrap());
/// let bytes = JsonCodec.encode(&msg).unwrap();
/// assert_eq!(JsonCodec.decode(&bytes).unwrap(), msg);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode(&self, msg: &Message) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(msg).map_err(ProtocolError::Encode)
    }

    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError> {
        let msg: Message = serde_json::from_slice(data).map_err(ProtocolError::Decode)?;
        let checked = from_wire(&to_wire(&msg))?;
        if checked != msg {
            return Err(crate::error::invalid(format!(
                "{} does not survive a wire round trip",
                msg.message_type()
            )));
        }
        Ok(msg)
    }
}
