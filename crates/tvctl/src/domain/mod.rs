//! Domain layer for tvctl.
//!
//! Pure types with no dependencies on I/O, sockets, or the async runtime:
//!
//! - [`SessionConfig`]: where and how to reach the TV.
//! - [`SessionState`]: the lifecycle of one session.

pub mod config;
pub mod state;

pub use config::SessionConfig;
pub use state::SessionState;
