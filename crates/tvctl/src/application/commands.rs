//! Typed command façade over a connected session.
//!
//! [`RemoteCommands`] maps each TV operation to its `ssap://` URI and
//! payload shape.  It reaches the network only through [`RemoteSession`], so
//! every mapping is testable against a mock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tvctl_core::{ssap, PointerEvent, RemoteKey};

use crate::SessionError;

/// The two primitives the façade needs from a session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteSession: Send + Sync {
    /// Sends a request and returns the response payload.
    async fn request(&self, uri: &str, payload: Value) -> Result<Value, SessionError>;

    /// Sends one event on the pointer channel.
    async fn send_pointer(&self, event: PointerEvent) -> Result<(), SessionError>;
}

/// One entry of the TV's external input list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDevice {
    /// Input identifier used by [`RemoteCommands::switch_input`], e.g. `HDMI_1`.
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub connected: bool,
}

/// Decoded reply of the input-list request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputList {
    #[serde(default)]
    pub devices: Vec<InputDevice>,
}

/// Extracts `socketPath` from a pointer-socket lookup reply.
pub(crate) fn socket_path(payload: &Value) -> Result<String, SessionError> {
    payload
        .get("socketPath")
        .and_then(Value::as_str)
        .filter(|path| !path.is_empty())
        .map(str::to_owned)
        .ok_or(SessionError::PointerUnavailable)
}

/// Command façade borrowing a session.
pub struct RemoteCommands<'a, S: RemoteSession + ?Sized> {
    session: &'a S,
}

impl<'a, S: RemoteSession + ?Sized> RemoteCommands<'a, S> {
    pub fn new(session: &'a S) -> Self {
        Self { session }
    }

    async fn call(&self, uri: &str) -> Result<Value, SessionError> {
        self.session.request(uri, json!({})).await
    }

    // ── System ───────────────────────────────────────────────────────────────

    pub async fn system_info(&self) -> Result<Value, SessionError> {
        self.call(ssap::GET_SYSTEM_INFO).await
    }

    pub async fn turn_off(&self) -> Result<Value, SessionError> {
        self.call(ssap::TURN_OFF).await
    }

    // ── Audio ────────────────────────────────────────────────────────────────

    pub async fn volume(&self) -> Result<Value, SessionError> {
        self.call(ssap::GET_VOLUME).await
    }

    pub async fn set_volume(&self, volume: u32) -> Result<Value, SessionError> {
        self.session
            .request(ssap::SET_VOLUME, json!({ "volume": volume }))
            .await
    }

    pub async fn volume_up(&self) -> Result<Value, SessionError> {
        self.call(ssap::VOLUME_UP).await
    }

    pub async fn volume_down(&self) -> Result<Value, SessionError> {
        self.call(ssap::VOLUME_DOWN).await
    }

    pub async fn mute_status(&self) -> Result<Value, SessionError> {
        self.call(ssap::GET_MUTE).await
    }

    pub async fn set_mute(&self, mute: bool) -> Result<Value, SessionError> {
        self.session
            .request(ssap::SET_MUTE, json!({ "mute": mute }))
            .await
    }

    // ── Inputs ───────────────────────────────────────────────────────────────

    /// The input list exactly as the TV returned it.
    pub async fn raw_input_list(&self) -> Result<Value, SessionError> {
        self.call(ssap::GET_INPUT_LIST).await
    }

    /// The input list decoded into [`InputList`].
    ///
    /// # Errors
    ///
    /// [`SessionError::UnexpectedPayload`] if the reply does not have the
    /// expected shape.
    pub async fn input_list(&self) -> Result<InputList, SessionError> {
        let payload = self.raw_input_list().await?;
        if payload.is_null() {
            return Ok(InputList::default());
        }
        serde_json::from_value(payload).map_err(|source| SessionError::UnexpectedPayload {
            uri: ssap::GET_INPUT_LIST,
            source,
        })
    }

    pub async fn switch_input(&self, input_id: &str) -> Result<Value, SessionError> {
        self.session
            .request(ssap::SWITCH_INPUT, json!({ "inputId": input_id }))
            .await
    }

    // ── Apps ─────────────────────────────────────────────────────────────────

    pub async fn apps(&self) -> Result<Value, SessionError> {
        self.call(ssap::GET_APPS).await
    }

    /// Launches `app_id`.  Entries of `params` (if it is an object) are
    /// merged into the payload and may override `id`.
    pub async fn launch_app(&self, app_id: &str, params: Value) -> Result<Value, SessionError> {
        let mut payload = Map::new();
        payload.insert("id".to_string(), Value::String(app_id.to_string()));
        if let Value::Object(extra) = params {
            payload.extend(extra);
        }
        self.session
            .request(ssap::LAUNCH_APP, Value::Object(payload))
            .await
    }

    pub async fn foreground_app(&self) -> Result<Value, SessionError> {
        self.call(ssap::GET_FOREGROUND_APP).await
    }

    pub async fn close_app(&self, app_id: &str) -> Result<Value, SessionError> {
        self.session
            .request(ssap::CLOSE_APP, json!({ "id": app_id }))
            .await
    }

    // ── Media ────────────────────────────────────────────────────────────────

    pub async fn play(&self) -> Result<Value, SessionError> {
        self.call(ssap::PLAY).await
    }

    pub async fn pause(&self) -> Result<Value, SessionError> {
        self.call(ssap::PAUSE).await
    }

    pub async fn stop(&self) -> Result<Value, SessionError> {
        self.call(ssap::STOP).await
    }

    pub async fn rewind(&self) -> Result<Value, SessionError> {
        self.call(ssap::REWIND).await
    }

    pub async fn fast_forward(&self) -> Result<Value, SessionError> {
        self.call(ssap::FAST_FORWARD).await
    }

    // ── Channels ─────────────────────────────────────────────────────────────

    pub async fn channel_up(&self) -> Result<Value, SessionError> {
        self.call(ssap::CHANNEL_UP).await
    }

    pub async fn channel_down(&self) -> Result<Value, SessionError> {
        self.call(ssap::CHANNEL_DOWN).await
    }

    pub async fn channel_list(&self) -> Result<Value, SessionError> {
        self.call(ssap::GET_CHANNEL_LIST).await
    }

    pub async fn current_channel(&self) -> Result<Value, SessionError> {
        self.call(ssap::GET_CURRENT_CHANNEL).await
    }

    // ── Text input and notifications ─────────────────────────────────────────

    /// Types `text` into the focused field.  `replace` overwrites its content.
    pub async fn insert_text(&self, text: &str, replace: bool) -> Result<Value, SessionError> {
        self.session
            .request(ssap::INSERT_TEXT, json!({ "text": text, "replace": replace }))
            .await
    }

    pub async fn delete_characters(&self, count: u32) -> Result<Value, SessionError> {
        self.session
            .request(ssap::DELETE_CHARACTERS, json!({ "count": count }))
            .await
    }

    pub async fn toast(&self, message: &str) -> Result<Value, SessionError> {
        self.session
            .request(ssap::CREATE_TOAST, json!({ "message": message }))
            .await
    }

    // ── Pointer ──────────────────────────────────────────────────────────────

    /// Asks the TV for the pointer socket URL without opening it.
    pub async fn pointer_socket(&self) -> Result<String, SessionError> {
        let payload = self.call(ssap::GET_POINTER_SOCKET).await?;
        socket_path(&payload)
    }

    pub async fn press_key(&self, key: RemoteKey) -> Result<(), SessionError> {
        self.press(key.wire_name()).await
    }

    /// Presses a key by wire name.  Unknown names are passed through as-is.
    pub async fn press(&self, name: &str) -> Result<(), SessionError> {
        self.session.send_pointer(PointerEvent::button(name)).await
    }

    pub async fn click(&self) -> Result<(), SessionError> {
        self.session.send_pointer(PointerEvent::Click).await
    }

    pub async fn move_pointer(&self, dx: i32, dy: i32, drag: bool) -> Result<(), SessionError> {
        self.session
            .send_pointer(PointerEvent::Move { dx, dy, drag })
            .await
    }

    pub async fn scroll(&self, dx: i32, dy: i32) -> Result<(), SessionError> {
        self.session
            .send_pointer(PointerEvent::Scroll { dx, dy })
            .await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
