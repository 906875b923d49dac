//! # tvctl-core
//!
//! Shared library for tvctl containing the wire format of the TV's
//! remote-control service.  It has no dependencies on sockets, files, or an
//! async runtime, so every type here can be tested with plain `#[test]`s.
//!
//! # Architecture overview
//!
//! The TV exposes two channels:
//!
//! - A **primary** WebSocket carrying JSON frames.  The client first
//!   *registers* (sending a signed manifest plus an optional pairing token),
//!   then sends *requests* addressed by `ssap://` URIs.  Each request carries a
//!   unique id and the TV answers asynchronously with a frame carrying the
//!   same id.
//!
//! - A **pointer** WebSocket whose address is handed out by the primary
//!   channel.  It carries newline-delimited `key:value` blocks for button
//!   presses, clicks, pointer movement and scrolling.
//!
//! This crate defines:
//!
//! - **`protocol`** – outbound/inbound JSON frames, the pairing manifest,
//!   command-id allocation and the pointer text codec.
//! - **`ssap`** – the URI lookup table used by the command façade.
//! - **`keys`** – the catalogue of remote-control key names.

pub mod keys;
pub mod protocol;
pub mod ssap;

pub use keys::{RemoteKey, UnknownKey};
pub use protocol::frame::{decode_frame, ProtocolError};
pub use protocol::ids::{CommandIdCounter, REGISTER_ID};
pub use protocol::messages::{
    CommandOutcome, FrameKind, InboundFrame, OutboundMessage, RegisterPayload, RegistrationOutcome,
};
pub use protocol::pointer::PointerEvent;
