//! WebSocket dialling shared by the primary socket and the pointer channel.

use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async_tls_with_config, Connector, MaybeTlsStream, WebSocketStream,
};
use tracing::debug;

use crate::SessionError;

/// A client WebSocket over plain TCP or TLS.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens a WebSocket to `url`.
///
/// For `wss://` URLs with `verify_tls == false` the TLS connector accepts any
/// certificate and host name, which is what TVs with self-signed
/// certificates need.  Otherwise the platform's default validation applies.
///
/// # Errors
///
/// - [`SessionError::Tls`] if the connector cannot be built.
/// - [`SessionError::Transport`] if the TCP, TLS, or upgrade step fails.
pub async fn open(url: &str, verify_tls: bool) -> Result<WsStream, SessionError> {
    let connector = if url.starts_with("wss://") && !verify_tls {
        let tls = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
            .build()?;
        Some(Connector::NativeTls(tls))
    } else {
        None
    };

    let (socket, response) = connect_async_tls_with_config(url, None, false, connector)
        .await
        .map_err(|e| SessionError::transport(url, e))?;

    debug!(url, status = %response.status(), "WebSocket upgrade complete");
    Ok(socket)
}
