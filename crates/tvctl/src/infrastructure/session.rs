//! The session engine: pairing, request/response correlation, dispatch.
//!
//! # Tasks
//!
//! A connected [`Session`] owns two background tasks:
//!
//! - a **writer** draining an unbounded channel into the socket sink, so
//!   frames go out in the order callers queued them;
//! - a **reader** decoding every inbound frame and routing it either to the
//!   pending handshake or to the request waiting on that id.
//!
//! Dropping the writer's sender closes the sink, which puts a Close frame on
//! the wire.  When the reader sees the socket end it closes the session and
//! fails every request still waiting.
//!
//! # Locking
//!
//! All mutable engine state lives in one `std::sync::Mutex` that is never
//! held across an `.await`.  Request ids are allocated under that lock, so
//! id order equals send order.  The pointer channel sits behind its own
//! async mutex because opening it needs a round trip.  A channel is only kept
//! while the session is `Ready`; closing the session closes the channel too.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};
use tvctl_core::protocol::ids::is_command_id;
use tvctl_core::{
    decode_frame, ssap, CommandIdCounter, CommandOutcome, InboundFrame, OutboundMessage,
    PointerEvent, RegistrationOutcome, REGISTER_ID,
};

use super::credentials::TokenStore;
use super::pointer::PointerChannel;
use super::transport::{self, WsStream};
use crate::application::commands::socket_path;
use crate::application::RemoteSession;
use crate::domain::{SessionConfig, SessionState};
use crate::SessionError;

type ReplySender = oneshot::Sender<Result<Value, SessionError>>;
type SettleSender = oneshot::Sender<Result<(), SessionError>>;

/// Mutable engine state, guarded by [`Shared::inner`].
#[derive(Default)]
struct Inner {
    state: SessionState,
    client_key: Option<String>,
    /// Feeds the writer task.  `None` when no socket is attached.
    outbound: Option<mpsc::UnboundedSender<WsMessage>>,
    /// Settles `connect()`.  Taken exactly once.
    handshake: Option<SettleSender>,
    pending: HashMap<String, ReplySender>,
    reader: Option<JoinHandle<()>>,
}

/// State shared between the [`Session`] handle and its reader task.
struct Shared {
    inner: Mutex<Inner>,
    ids: CommandIdCounter,
    store: Arc<dyn TokenStore>,
    pointer: tokio::sync::Mutex<Option<PointerChannel>>,
}

/// One paired connection to a TV.
///
/// Cheap operations (`state()`, `client_key()`) never block on the network.
/// `connect()` is valid once; after the session closes, build a new one.
pub struct Session {
    config: SessionConfig,
    shared: Arc<Shared>,
}

impl Session {
    /// Creates a disconnected session and loads the stored pairing token.
    ///
    /// A token store that fails to load is logged and treated as empty, so
    /// the TV will show its pairing prompt again.
    pub fn new(config: SessionConfig, store: Arc<dyn TokenStore>) -> Self {
        let client_key = match store.load() {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "could not load stored pairing token; pairing from scratch");
                None
            }
        };

        Self {
            config,
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    client_key,
                    ..Inner::default()
                }),
                ids: CommandIdCounter::new(),
                store,
                pointer: tokio::sync::Mutex::new(None),
            }),
        }
    }

    /// Opens the primary socket and completes registration.
    ///
    /// Resolves once the TV answers the registration with `registered`.
    /// While the pairing prompt is on screen this can take as long as the
    /// user needs, up to [`SessionConfig::connect_timeout`].
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidState`] unless the session is `Disconnected`.
    /// - [`SessionError::Transport`] / [`SessionError::Tls`] if the socket
    ///   cannot be opened.
    /// - [`SessionError::RegistrationRejected`] if the TV refuses pairing.
    /// - [`SessionError::ConnectionClosed`] if the socket closes mid-handshake.
    /// - [`SessionError::Timeout`] if none of the above happens in time.
    ///
    /// On any error the session is `Closed` and its socket is shut.
    pub async fn connect(&self) -> Result<(), SessionError> {
        self.shared.begin_connect()?;

        let url = self.config.url();
        let bound = self.config.connect_timeout;
        info!(url = %url, "connecting to TV");

        let result = match tokio::time::timeout(bound, self.establish(&url)).await {
            Ok(result) => result,
            Err(_) => Err(SessionError::Timeout(bound)),
        };

        match result {
            Ok(()) => {
                info!(url = %url, "paired with TV");
                Ok(())
            }
            Err(e) => {
                warn!(url = %url, error = %e, "connect failed");
                self.shared.close(true);
                Err(e)
            }
        }
    }

    async fn establish(&self, url: &str) -> Result<(), SessionError> {
        let socket = transport::open(url, self.config.verify_tls).await?;
        let (sink, stream) = socket.split();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (settle_tx, settle_rx) = oneshot::channel();

        tokio::spawn(write_loop(sink, outbound_rx));
        let client_key = self.shared.attach(outbound_tx, settle_tx)?;

        let reader = tokio::spawn(read_loop(Arc::clone(&self.shared), stream));
        self.shared.set_reader(reader);

        let with_token = client_key.is_some();
        let register = OutboundMessage::register(client_key);
        debug!(id = register.id(), with_token, "sending registration");
        self.shared.send(&register)?;

        // A dropped settle sender means the session closed first.
        settle_rx.await.unwrap_or(Err(SessionError::ConnectionClosed))
    }

    /// Sends a request and waits for the matching response.
    ///
    /// Returns the response payload, or `Value::Null` when the TV sent none.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotConnected`] unless the session is `Ready`.  The
    ///   socket is not touched in that case.
    /// - [`SessionError::CommandRejected`] if the TV answers `type:"error"`.
    /// - [`SessionError::Abandoned`] if the session closes first.
    pub async fn request(&self, uri: &str, payload: Value) -> Result<Value, SessionError> {
        let (id, reply) = self.shared.start_request(uri, payload)?;
        debug!(id = %id, uri, "request sent");

        match reply.await {
            Ok(result) => result,
            Err(_) => Err(SessionError::Abandoned { id }),
        }
    }

    /// Closes the primary socket, then the pointer channel if open.
    ///
    /// Outstanding requests fail with [`SessionError::Abandoned`], including
    /// a pointer-socket lookup still waiting for the TV.  Safe to call
    /// repeatedly and on a session that never connected.
    pub async fn disconnect(&self) {
        self.shared.close(true);
        Arc::clone(&self.shared).release_pointer().await;
    }

    // ── Pointer channel ──────────────────────────────────────────────────────

    /// Asks the TV for the pointer socket URL.
    ///
    /// # Errors
    ///
    /// Any [`request`](Self::request) error, or
    /// [`SessionError::PointerUnavailable`] if the reply has no `socketPath`.
    pub async fn pointer_endpoint(&self) -> Result<String, SessionError> {
        let payload = self.request(ssap::GET_POINTER_SOCKET, json!({})).await?;
        socket_path(&payload)
    }

    /// Opens the pointer channel unless it is already open.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotConnected`] unless the session is `Ready`, or any
    /// lookup or dial error.
    pub async fn open_pointer(&self) -> Result<(), SessionError> {
        let mut slot = self.shared.pointer.lock().await;
        let channel = self.check_out_pointer(&mut slot).await?;
        self.check_in_pointer(&mut slot, channel).await;
        Ok(())
    }

    async fn open_pointer_channel(&self) -> Result<PointerChannel, SessionError> {
        let url = self.pointer_endpoint().await?;
        PointerChannel::open(&url, self.config.verify_tls).await
    }

    /// Takes the open channel out of `slot`, or opens a new one.
    async fn check_out_pointer(
        &self,
        slot: &mut Option<PointerChannel>,
    ) -> Result<PointerChannel, SessionError> {
        let channel = match slot.take() {
            Some(channel) => channel,
            None => self.open_pointer_channel().await?,
        };
        let ready = self.shared.lock().state.is_ready();
        if ready {
            Ok(channel)
        } else {
            close_pointer(channel).await;
            Err(SessionError::NotConnected)
        }
    }

    /// Keeps `channel` for reuse, or closes it if the session closed
    /// meanwhile.
    async fn check_in_pointer(&self, slot: &mut Option<PointerChannel>, channel: PointerChannel) {
        let ready = self.shared.lock().state.is_ready();
        if ready {
            *slot = Some(channel);
        } else {
            close_pointer(channel).await;
        }
    }

    /// Sends one event on the pointer channel, opening it first if needed.
    ///
    /// The async mutex is held across the lookup, so concurrent first calls
    /// still open exactly one channel.  A channel that fails a write is
    /// dropped; the next call opens a fresh one.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotConnected`] unless the session is `Ready`, any
    /// lookup or dial error, or [`SessionError::Transport`] if the write
    /// fails.
    pub async fn send_pointer(&self, event: PointerEvent) -> Result<(), SessionError> {
        let mut slot = self.shared.pointer.lock().await;
        let mut channel = self.check_out_pointer(&mut slot).await?;
        match channel.send(&event).await {
            Ok(()) => {
                self.check_in_pointer(&mut slot, channel).await;
                Ok(())
            }
            Err(e) => {
                close_pointer(channel).await;
                Err(e)
            }
        }
    }

    /// Presses a remote key by wire name, e.g. `HOME` or `VOLUMEUP`.
    pub async fn send_key(&self, name: &str) -> Result<(), SessionError> {
        self.send_pointer(PointerEvent::button(name)).await
    }

    /// Clicks at the current pointer position.
    pub async fn click(&self) -> Result<(), SessionError> {
        self.send_pointer(PointerEvent::Click).await
    }

    /// Moves the pointer by `(dx, dy)`; `drag` holds the button down.
    pub async fn move_pointer(&self, dx: i32, dy: i32, drag: bool) -> Result<(), SessionError> {
        self.send_pointer(PointerEvent::Move { dx, dy, drag }).await
    }

    /// Scrolls by `(dx, dy)`.
    pub async fn scroll(&self, dx: i32, dy: i32) -> Result<(), SessionError> {
        self.send_pointer(PointerEvent::Scroll { dx, dy }).await
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.shared.lock().state
    }

    /// The pairing token: the stored one, or the one the TV issued last.
    pub fn client_key(&self) -> Option<String> {
        self.shared.lock().client_key.clone()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shared.close(true);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("url", &self.config.url())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RemoteSession for Session {
    async fn request(&self, uri: &str, payload: Value) -> Result<Value, SessionError> {
        Session::request(self, uri, payload).await
    }

    async fn send_pointer(&self, event: PointerEvent) -> Result<(), SessionError> {
        Session::send_pointer(self, event).await
    }
}

// ── Shared engine state ──────────────────────────────────────────────────────

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_connect(&self) -> Result<(), SessionError> {
        let mut inner = self.lock();
        if inner.state != SessionState::Disconnected {
            return Err(SessionError::InvalidState { state: inner.state });
        }
        inner.state = SessionState::Connecting;
        Ok(())
    }

    /// Installs the writer channel and the handshake settle sender.
    /// Returns the token to register with.
    fn attach(
        &self,
        outbound: mpsc::UnboundedSender<WsMessage>,
        handshake: SettleSender,
    ) -> Result<Option<String>, SessionError> {
        let mut inner = self.lock();
        if inner.state != SessionState::Connecting {
            return Err(SessionError::ConnectionClosed);
        }
        inner.state = SessionState::AwaitingHandshake;
        inner.outbound = Some(outbound);
        inner.handshake = Some(handshake);
        Ok(inner.client_key.clone())
    }

    fn set_reader(&self, reader: JoinHandle<()>) {
        let mut inner = self.lock();
        if inner.state.is_terminal() {
            reader.abort();
        } else {
            inner.reader = Some(reader);
        }
    }

    fn send(&self, message: &OutboundMessage) -> Result<(), SessionError> {
        let text = message.to_json()?;
        let inner = self.lock();
        let outbound = inner.outbound.as_ref().ok_or(SessionError::ConnectionClosed)?;
        outbound
            .send(WsMessage::Text(text))
            .map_err(|_| SessionError::ConnectionClosed)
    }

    /// Allocates an id, registers the reply slot and queues the frame, all
    /// under one lock.
    fn start_request(
        &self,
        uri: &str,
        payload: Value,
    ) -> Result<(String, oneshot::Receiver<Result<Value, SessionError>>), SessionError> {
        let mut inner = self.lock();
        if !inner.state.is_ready() {
            return Err(SessionError::NotConnected);
        }
        let outbound = inner.outbound.clone().ok_or(SessionError::NotConnected)?;

        let id = self.ids.next_id();
        let text = OutboundMessage::request(id.clone(), uri, payload).to_json()?;
        outbound
            .send(WsMessage::Text(text))
            .map_err(|_| SessionError::ConnectionClosed)?;

        let (reply_tx, reply_rx) = oneshot::channel();
        inner.pending.insert(id.clone(), reply_tx);
        Ok((id, reply_rx))
    }

    /// Routes one inbound text frame.
    fn handle_text(&self, text: &str) {
        let frame = match decode_frame(text) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "discarding malformed frame");
                return;
            }
        };

        let Some(id) = frame.id.clone() else {
            debug!(kind = ?frame.kind(), "ignoring frame without id");
            return;
        };

        if id == REGISTER_ID {
            self.handle_registration(&frame);
            return;
        }

        let reply = self.lock().pending.remove(&id);
        match reply {
            Some(reply) => {
                let result = match frame.into_command_outcome() {
                    CommandOutcome::Success(payload) => Ok(payload),
                    CommandOutcome::Failed(message) => Err(SessionError::CommandRejected(message)),
                };
                debug!(id = %id, ok = result.is_ok(), "response received");
                // The caller may have stopped waiting.
                let _ = reply.send(result);
            }
            None if is_command_id(&id) => debug!(id = %id, "ignoring late or duplicate response"),
            None => debug!(id = %id, "ignoring frame with unknown id"),
        }
    }

    fn handle_registration(&self, frame: &InboundFrame) {
        if self.lock().handshake.is_none() {
            debug!(kind = ?frame.kind(), "ignoring registration frame after settlement");
            return;
        }

        match frame.registration_outcome() {
            RegistrationOutcome::Prompted => {
                info!("waiting for the pairing prompt to be accepted on the TV");
            }
            RegistrationOutcome::Failed { reason } => {
                if let Some(settle) = self.lock().handshake.take() {
                    let _ = settle.send(Err(SessionError::RegistrationRejected(reason)));
                }
            }
            RegistrationOutcome::Registered { client_key } => {
                if let Some(key) = &client_key {
                    if let Err(e) = self.store.save(key) {
                        warn!(error = %e, "could not persist pairing token");
                    }
                }

                let settle = {
                    let mut inner = self.lock();
                    let settle = inner.handshake.take();
                    if settle.is_some() {
                        inner.state = SessionState::Ready;
                        if client_key.is_some() {
                            inner.client_key = client_key;
                        }
                    }
                    settle
                };
                if let Some(settle) = settle {
                    let _ = settle.send(Ok(()));
                }
            }
        }
    }

    /// Called by the reader when the socket ends.
    fn transport_closed(&self) {
        self.close(false);
    }

    /// Closes the pointer channel.  When a pointer call holds it, the close
    /// waits in the background for that call to finish.
    async fn release_pointer(self: Arc<Self>) {
        let held = self.pointer.try_lock().ok().map(|mut slot| slot.take());
        match held {
            Some(Some(channel)) => close_pointer(channel).await,
            Some(None) => {}
            None => {
                tokio::spawn(async move {
                    let channel = self.pointer.lock().await.take();
                    if let Some(channel) = channel {
                        close_pointer(channel).await;
                    }
                });
            }
        }
    }

    /// Moves to `Closed`, closes the writer and fails everything waiting.
    fn close(&self, abort_reader: bool) {
        let (previous, pending, reader) = {
            let mut inner = self.lock();
            let previous = inner.state;
            inner.state = SessionState::Closed;
            inner.outbound = None;
            // Dropping the settle sender fails a pending connect().
            inner.handshake = None;
            (previous, std::mem::take(&mut inner.pending), inner.reader.take())
        };

        if abort_reader {
            if let Some(reader) = reader {
                reader.abort();
            }
        }

        for (id, reply) in pending {
            let _ = reply.send(Err(SessionError::Abandoned { id }));
        }

        if !previous.is_terminal() && previous != SessionState::Disconnected {
            info!(previous = %previous, "session closed");
        }
    }
}

// ── Socket tasks ─────────────────────────────────────────────────────────────

async fn close_pointer(mut channel: PointerChannel) {
    channel.close().await;
    debug!(url = channel.url(), "pointer channel closed");
}

async fn write_loop(
    mut sink: SplitSink<WsStream, WsMessage>,
    mut outbound: mpsc::UnboundedReceiver<WsMessage>,
) {
    while let Some(message) = outbound.recv().await {
        if let Err(e) = sink.send(message).await {
            warn!(error = %e, "failed to write frame");
            break;
        }
    }
    if let Err(e) = sink.close().await {
        debug!(error = %e, "close handshake failed");
    }
}

async fn read_loop(shared: Arc<Shared>, mut stream: SplitStream<WsStream>) {
    while let Some(message) = stream.next().await {
        match message {
            Ok(WsMessage::Text(text)) => shared.handle_text(&text),
            Ok(WsMessage::Binary(bytes)) => match std::str::from_utf8(&bytes) {
                Ok(text) => shared.handle_text(text),
                Err(_) => debug!(len = bytes.len(), "ignoring non-UTF-8 binary frame"),
            },
            Ok(WsMessage::Close(frame)) => {
                debug!(?frame, "TV closed the connection");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "primary socket read failed");
                break;
            }
        }
    }
    shared.transport_closed();
    shared.release_pointer().await;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
