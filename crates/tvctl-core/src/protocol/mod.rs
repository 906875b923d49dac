//! Protocol module containing frame types, the pairing manifest, id
//! allocation, and the pointer text codec.

pub mod frame;
pub mod ids;
pub mod manifest;
pub mod messages;
pub mod pointer;

pub use frame::{decode_frame, ProtocolError};
pub use ids::{CommandIdCounter, REGISTER_ID};
pub use manifest::HandshakeManifest;
pub use messages::*;
pub use pointer::PointerEvent;
