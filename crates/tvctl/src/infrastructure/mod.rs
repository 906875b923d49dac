//! Infrastructure layer for tvctl.
//!
//! Everything that touches sockets or the file system:
//!
//! - [`transport`]: WebSocket dialling with the TV-friendly TLS policy.
//! - [`session`]: the [`Session`] engine (pairing, correlation, dispatch).
//! - [`pointer`]: the secondary pointer-input socket.
//! - [`credentials`]: pairing-token persistence.

pub mod credentials;
pub mod pointer;
pub mod session;
pub mod transport;

pub use credentials::{
    default_credentials_path, CredentialError, FileTokenStore, MemoryTokenStore, TokenStore,
};
pub use pointer::PointerChannel;
pub use session::Session;
