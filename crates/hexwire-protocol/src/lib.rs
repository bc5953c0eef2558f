//! Message protocol for hexwire game servers and clients.
//!
//! Every message has two text forms:
//!
//! - **Wire** (`1025|ga,20`): the numeric type id, `|`, then the
//!   type's fields. This is what travels between peers.
//! - **Debug** (`SOCGameState:game=ga|state=20`): the type name and
//!   named fields, used in logs and recorded game files. Names from
//!   older versions are still accepted when parsing.
//!
//! The crate is organized as:
//!
//! - [`message`]: one struct per message type plus the [`Message`] enum
//!   and its [`MessageType`] tag.
//! - [`registry`]: lookup from id or debug name to the type's parsers.
//! - [`compat`]: version fallback tables and [`compat::adapt_for_peer`],
//!   which rewrites a message so an older peer can read it.
//! - [`field`]: the separators and field readers shared by all types.
//! - [`types`]: resource sets and the small enums carried in messages.
//!
//! ```rust
//! use hexwire_protocol::{from_debug, from_wire, to_wire};
//!
//! let msg = from_wire("1039|ga,2,3").unwrap();
//! assert_eq!(msg.to_debug(), "SOCAcceptOffer:game=ga|accepting=2|offering=3");
//! assert_eq!(to_wire(&from_debug(&msg.to_debug()).unwrap()), "1039|ga,2,3");
//! ```

pub mod compat;
pub mod field;
pub mod message;
pub mod registry;
pub mod types;

mod codec;
mod error;

pub use codec::{Codec, DebugCodec, WireCodec, from_debug, from_wire, to_debug, to_wire};
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::{CompatError, DecodeError, NoFallbackAvailable, ParseError, ProtocolError};
pub use message::{Message, MessageType};
pub use types::ResourceSet;
