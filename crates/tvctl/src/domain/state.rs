//! Session lifecycle states.

use std::fmt;

/// Lifecycle of a [`Session`](crate::infrastructure::Session).
///
/// ```text
/// Disconnected ─connect()→ Connecting ─socket open→ AwaitingHandshake ─registered→ Ready
///                               │                          │                         │
///                               └──── failure/timeout ─────┴──→ Closed ←─ disconnect / socket close
/// ```
///
/// There is no way out of `Closed`; build a new session instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    AwaitingHandshake,
    Ready,
    Closed,
}

impl SessionState {
    /// Returns `true` if requests may be sent.
    pub fn is_ready(self) -> bool {
        self == Self::Ready
    }

    /// Returns `true` once the session can no longer be used.
    pub fn is_terminal(self) -> bool {
        self == Self::Closed
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::AwaitingHandshake => "awaiting handshake",
            Self::Ready => "ready",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_disconnected() {
        assert_eq!(SessionState::default(), SessionState::Disconnected);
    }

    #[test]
    fn test_only_ready_accepts_requests() {
        assert!(SessionState::Ready.is_ready());
        for state in [
            SessionState::Disconnected,
            SessionState::Connecting,
            SessionState::AwaitingHandshake,
            SessionState::Closed,
        ] {
            assert!(!state.is_ready(), "{state} must not accept requests");
        }
    }

    #[test]
    fn test_closed_is_terminal() {
        assert!(SessionState::Closed.is_terminal());
        assert!(!SessionState::Ready.is_terminal());
    }
}
