//! # hexwire
//!
//! Message protocol and version compatibility for hexwire game servers.
//!
//! The protocol itself lives in [`hexwire_protocol`], re-exported here as
//! [`protocol`]. On top of it this crate adds:
//!
//! - [`PeerEncoder`]: adapts outbound messages to a peer's version and
//!   renders them as wire lines.
//! - [`Replayer`]: decodes captured message logs and reports what it
//!   could not read.
//! - [`logging::init_tracing`]: a `tracing` subscriber with `RUST_LOG`
//!   support.
//!
//! ## Quick Start
//!
//! ```rust
//! use hexwire::prelude::*;
//!
//! let msg = from_wire("1069|16,password required").unwrap();
//! let lines = PeerEncoder::new(1118).encode(&msg).unwrap();
//! assert_eq!(lines, ["1069|3,password required"]);
//! ```

pub mod logging;

mod error;
mod peer;
mod replay;

pub use error::HexwireError;
pub use hexwire_protocol as protocol;
pub use peer::PeerEncoder;
pub use replay::{LineFailure, LineForm, ReplayConfig, ReplayReport, Replayer};

/// Convenience re-exports.
///
/// ```rust
/// use hexwire::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        HexwireError, LineForm, PeerEncoder, ReplayConfig, ReplayReport, Replayer,
    };
    pub use hexwire_protocol::message::*;
    pub use hexwire_protocol::types::{ResourceSet, SeatLockState};
    pub use hexwire_protocol::{
        Codec, CompatError, DebugCodec, DecodeError, Message, MessageType, NoFallbackAvailable,
        ParseError, ProtocolError, WireCodec, from_debug, from_wire, to_debug, to_wire,
    };
}
