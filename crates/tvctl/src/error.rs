//! Error type returned by every session operation.

use std::time::Duration;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::domain::SessionState;

/// Errors surfaced by [`Session`](crate::infrastructure::Session) and the
/// pointer channel.
///
/// Malformed inbound frames never appear here: they are logged and dropped
/// by the dispatcher.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The WebSocket could not be opened or failed while in use.
    #[error("transport error on {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<tungstenite::Error>,
    },

    /// The TLS connector could not be built.
    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    /// The primary socket closed underneath an operation.
    #[error("connection to TV closed")]
    ConnectionClosed,

    /// Connect and registration did not finish within the bound.
    #[error("connection timeout after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The TV answered the registration with `type:"error"`.
    #[error("registration failed: {0}")]
    RegistrationRejected(String),

    /// The TV answered a request with `type:"error"`.
    #[error("{0}")]
    CommandRejected(String),

    /// The pointer-socket lookup returned no `socketPath`.
    #[error("failed to get pointer socket path from TV")]
    PointerUnavailable,

    /// A request was attempted while the session was not ready.
    #[error("not connected to TV")]
    NotConnected,

    /// `connect()` was called outside the `Disconnected` state.
    #[error("cannot connect a session that is {state}")]
    InvalidState { state: SessionState },

    /// The session closed before the TV answered this request.
    #[error("request {id} abandoned: connection closed before a response arrived")]
    Abandoned { id: String },

    /// A reply did not have the shape its request promises.
    #[error("unexpected reply to {uri}: {source}")]
    UnexpectedPayload {
        uri: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// An outbound frame could not be serialized.
    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SessionError {
    pub(crate) fn transport(url: &str, source: tungstenite::Error) -> Self {
        Self::Transport {
            url: url.to_string(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_reports_milliseconds() {
        let err = SessionError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "connection timeout after 10000ms");
    }

    #[test]
    fn test_not_connected_message() {
        assert_eq!(SessionError::NotConnected.to_string(), "not connected to TV");
    }

    #[test]
    fn test_command_rejected_passes_device_text_through() {
        let err = SessionError::CommandRejected("401 insufficient permissions".to_string());
        assert_eq!(err.to_string(), "401 insufficient permissions");
    }

    #[test]
    fn test_invalid_state_names_the_state() {
        let err = SessionError::InvalidState {
            state: SessionState::Closed,
        };
        assert_eq!(err.to_string(), "cannot connect a session that is closed");
    }
}
