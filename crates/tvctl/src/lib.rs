//! tvctl library crate.
//!
//! A remote-control client for webOS-style TVs.  It pairs with the TV over
//! an encrypted WebSocket, sends `ssap://` requests and correlates their
//! asynchronous replies, and injects key presses and pointer events over a
//! second socket the TV hands out on request.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Caller / CLI
//!         ↕
//! [tvctl]
//!   ├── domain/           Pure types: SessionConfig, SessionState
//!   ├── application/      Command façade and key-script interpreter
//!   └── infrastructure/
//!         ├── transport/   WebSocket connect (tokio-tungstenite, native-tls)
//!         ├── session/     Pairing, request/response correlation, dispatch
//!         ├── pointer/     Secondary pointer-input socket
//!         └── credentials/ Pairing-token persistence
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `tvctl-core`, and reaches the
//!   network only through the [`application::RemoteSession`] trait.
//! - `infrastructure` depends on all other layers plus `tokio` and
//!   `tungstenite`.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tvctl::domain::SessionConfig;
//! use tvctl::infrastructure::{FileTokenStore, Session};
//!
//! # async fn example() -> Result<(), tvctl::SessionError> {
//! let store = Arc::new(FileTokenStore::new("/tmp/tv-credentials.json"));
//! let session = Session::new(SessionConfig::new("192.168.1.20"), store);
//! session.connect().await?;
//! let volume = session.request("ssap://audio/getVolume", serde_json::json!({})).await?;
//! println!("{volume}");
//! session.disconnect().await;
//! # Ok(())
//! # }
//! ```

/// Domain layer: configuration and state types (no I/O).
pub mod domain;

/// Application layer: command façade and key scripts.
pub mod application;

/// Infrastructure layer: sockets, session engine, credential store.
pub mod infrastructure;

mod error;

pub use error::SessionError;
