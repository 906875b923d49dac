//! The secondary pointer socket.
//!
//! The TV hands out its URL in reply to a pointer-socket lookup on the
//! primary connection.  The channel is write-only from our side: each
//! [`PointerEvent`] goes out as one text frame and nothing is expected back.

use futures_util::SinkExt;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, trace};
use tvctl_core::PointerEvent;

use super::transport::{self, WsStream};
use crate::SessionError;

/// An open pointer socket.
pub struct PointerChannel {
    url: String,
    socket: WsStream,
}

impl PointerChannel {
    /// Dials the pointer socket at `url`.
    ///
    /// # Errors
    ///
    /// Same as [`transport::open`].
    pub async fn open(url: &str, verify_tls: bool) -> Result<Self, SessionError> {
        let socket = transport::open(url, verify_tls).await?;
        debug!(url, "pointer channel open");
        Ok(Self {
            url: url.to_string(),
            socket,
        })
    }

    /// Sends one event as a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transport`] if the frame cannot be written.
    pub async fn send(&mut self, event: &PointerEvent) -> Result<(), SessionError> {
        let text = event.encode();
        trace!(kind = event.type_name(), "pointer event");
        self.socket
            .send(WsMessage::Text(text))
            .await
            .map_err(|e| SessionError::transport(&self.url, e))
    }

    /// Sends a Close frame.  Errors are logged; the channel is unusable
    /// afterwards either way.
    pub async fn close(&mut self) {
        if let Err(e) = self.socket.close(None).await {
            debug!(url = %self.url, error = %e, "pointer channel close failed");
        }
    }

    /// URL the channel was opened on.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Debug for PointerChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerChannel")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}
