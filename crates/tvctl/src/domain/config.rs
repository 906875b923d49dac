//! Session configuration.
//!
//! [`SessionConfig`] holds every runtime setting of one session.  It is a
//! plain struct: the CLI fills it from arguments and environment variables,
//! tests fill it directly.  The credential file location is not part of it;
//! the token store is injected separately.

use std::time::Duration;

/// Default TCP port of the TV's remote-control service.
pub const DEFAULT_PORT: u16 = 3001;

/// Default bound on connect + pairing.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// All runtime configuration for a [`Session`](crate::infrastructure::Session).
///
/// # Example
///
/// ```rust
/// use tvctl::domain::SessionConfig;
///
/// let cfg = SessionConfig::new("192.168.1.20");
/// assert_eq!(cfg.url(), "wss://192.168.1.20:3001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Hostname, IPv4 literal, or IPv6 literal of the TV.
    pub host: String,

    /// TCP port of the remote-control service.
    pub port: u16,

    /// `true` uses `wss://`, `false` plain `ws://`.
    pub secure: bool,

    /// Validate the TV's TLS certificate.
    ///
    /// TVs present self-signed certificates, so this is off by default.
    pub verify_tls: bool,

    /// Upper bound on opening the socket and completing registration.
    pub connect_timeout: Duration,
}

impl SessionConfig {
    /// Returns a configuration for `host` with every other field defaulted.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            secure: true,
            verify_tls: false,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Returns the URL of the primary socket.
    ///
    /// IPv6 literals are wrapped in brackets.
    pub fn url(&self) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("{scheme}://[{}]:{}", self.host, self.port)
        } else {
            format!("{scheme}://{}:{}", self.host, self.port)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port_is_3001() {
        // Arrange / Act
        let cfg = SessionConfig::new("10.0.0.5");
        // Assert
        assert_eq!(cfg.port, 3001);
    }

    #[test]
    fn test_default_is_secure_without_certificate_validation() {
        let cfg = SessionConfig::new("10.0.0.5");
        assert!(cfg.secure);
        assert!(!cfg.verify_tls);
    }

    #[test]
    fn test_default_connect_timeout_is_10s() {
        let cfg = SessionConfig::new("10.0.0.5");
        assert_eq!(cfg.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_url_secure() {
        assert_eq!(SessionConfig::new("tv.local").url(), "wss://tv.local:3001");
    }

    #[test]
    fn test_url_plain_with_custom_port() {
        let cfg = SessionConfig {
            port: 3000,
            secure: false,
            ..SessionConfig::new("10.0.3.1")
        };
        assert_eq!(cfg.url(), "ws://10.0.3.1:3000");
    }

    #[test]
    fn test_url_brackets_ipv6_literal() {
        assert_eq!(
            SessionConfig::new("fe80::1").url(),
            "wss://[fe80::1]:3001"
        );
        // Already bracketed input is left alone.
        assert_eq!(SessionConfig::new("[::1]").url(), "wss://[::1]:3001");
    }
}
