//! JSON frame types for the primary WebSocket.
//!
//! # Message flow
//!
//! ```text
//! Client → TV:  OutboundMessage  →  JSON text frame
//! TV → Client:  JSON text frame  →  InboundFrame  →  RegistrationOutcome | CommandOutcome
//! ```
//!
//! Outbound frames are a closed set, so they are a serde enum tagged on the
//! `"type"` field.  Inbound frames are not: besides `registered` and `error`
//! the TV uses `response` and occasionally other type strings for
//! successful replies.  [`InboundFrame`] therefore keeps the raw type string
//! and [`InboundFrame::kind`] maps it to [`FrameKind`] in one place; the
//! session switches on that tag rather than comparing strings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ids::REGISTER_ID;
use super::manifest::HandshakeManifest;

// ── Client → TV ───────────────────────────────────────────────────────────────

/// Body of the registration frame: the manifest, plus the stored pairing
/// token when one exists.
///
/// ```json
/// {"forcePairing":false,"pairingType":"PROMPT","manifest":{...},"client-key":"abc123"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterPayload {
    #[serde(flatten)]
    pub manifest: HandshakeManifest,

    /// Token issued by the TV on a previous successful pairing.
    #[serde(
        rename = "client-key",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub client_key: Option<String>,
}

/// Every frame the client sends on the primary socket.
///
/// # Serde representation
///
/// ```json
/// {"type":"register","id":"register_0","payload":{...}}
/// {"type":"request","id":"command_1","uri":"ssap://audio/getVolume","payload":{}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    /// Pairing / registration attempt.  Always uses [`REGISTER_ID`].
    Register { id: String, payload: RegisterPayload },

    /// A command addressed by an `ssap://` URI.
    Request {
        id: String,
        uri: String,
        payload: Value,
    },
}

impl OutboundMessage {
    /// Builds the registration frame, attaching `client_key` when present.
    pub fn register(client_key: Option<String>) -> Self {
        Self::Register {
            id: REGISTER_ID.to_string(),
            payload: RegisterPayload {
                manifest: HandshakeManifest::standard(),
                client_key,
            },
        }
    }

    /// Builds a request frame.
    ///
    /// A `null` payload is sent as `{}`; the TV rejects requests without an
    /// object payload.
    pub fn request(id: impl Into<String>, uri: impl Into<String>, payload: Value) -> Self {
        let payload = match payload {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        Self::Request {
            id: id.into(),
            uri: uri.into(),
            payload,
        }
    }

    /// Returns the correlation id of this frame.
    pub fn id(&self) -> &str {
        match self {
            Self::Register { id, .. } | Self::Request { id, .. } => id,
        }
    }

    /// Serializes the frame to the JSON text sent on the wire.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ── TV → Client ───────────────────────────────────────────────────────────────

/// The `"type"` tag of an inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Registration accepted.
    Registered,
    /// The TV rejected a registration or a request.
    Error,
    /// Ordinary reply.
    Response,
    /// Any other or missing type string.  Treated as a successful reply.
    Other,
}

impl FrameKind {
    /// Maps a wire type string to its tag.
    pub fn from_wire(tag: Option<&str>) -> Self {
        match tag {
            Some("registered") => Self::Registered,
            Some("error") => Self::Error,
            Some("response") => Self::Response,
            _ => Self::Other,
        }
    }
}

/// A decoded inbound frame.
///
/// ```json
/// {"type":"registered","id":"register_0","payload":{"client-key":"abc123"}}
/// {"type":"response","id":"command_1","payload":{"volume":12}}
/// {"type":"error","id":"command_2","error":"401 insufficient permissions"}
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InboundFrame {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "type", default)]
    pub frame_type: Option<String>,

    #[serde(default)]
    pub payload: Option<Value>,

    #[serde(default)]
    pub error: Option<String>,
}

/// Result of a frame addressed to [`REGISTER_ID`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Pairing succeeded.  `client_key` is set when the TV issued a token.
    Registered { client_key: Option<String> },
    /// Pairing was refused.
    Failed { reason: String },
    /// Interim reply, typically while the pairing prompt is on screen.
    Prompted,
}

/// Result of a frame addressed to a request id.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Success(Value),
    Failed(String),
}

impl InboundFrame {
    /// Returns the tag of this frame.
    pub fn kind(&self) -> FrameKind {
        FrameKind::from_wire(self.frame_type.as_deref())
    }

    /// Returns `true` if this frame answers the registration.
    pub fn is_registration(&self) -> bool {
        self.id.as_deref() == Some(REGISTER_ID)
    }

    /// Interprets this frame as an answer to the registration frame.
    pub fn registration_outcome(&self) -> RegistrationOutcome {
        match self.kind() {
            FrameKind::Registered => RegistrationOutcome::Registered {
                client_key: self
                    .payload
                    .as_ref()
                    .and_then(|p| p.get("client-key"))
                    .and_then(Value::as_str)
                    .filter(|key| !key.is_empty())
                    .map(str::to_owned),
            },
            FrameKind::Error => RegistrationOutcome::Failed {
                reason: self.error_text("Registration failed"),
            },
            FrameKind::Response | FrameKind::Other => RegistrationOutcome::Prompted,
        }
    }

    /// Interprets this frame as the answer to a request.
    ///
    /// A missing payload on a successful reply becomes `Value::Null`.
    pub fn into_command_outcome(self) -> CommandOutcome {
        match self.kind() {
            FrameKind::Error => CommandOutcome::Failed(self.error_text("Command failed")),
            _ => CommandOutcome::Success(self.payload.unwrap_or(Value::Null)),
        }
    }

    fn error_text(&self, fallback: &str) -> String {
        match self.error.as_deref() {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => fallback.to_string(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(value: Value) -> InboundFrame {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_register_frame_shape_without_token() {
        // Arrange
        let msg = OutboundMessage::register(None);

        // Act
        let value = serde_json::to_value(&msg).unwrap();

        // Assert
        assert_eq!(value["type"], "register");
        assert_eq!(value["id"], "register_0");
        assert_eq!(value["payload"]["pairingType"], "PROMPT");
        assert!(value["payload"].get("client-key").is_none());
    }

    #[test]
    fn test_register_frame_carries_stored_token() {
        let msg = OutboundMessage::register(Some("abc123".to_string()));
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["payload"]["client-key"], "abc123");
        // The manifest is flattened next to the token, not nested under it.
        assert!(value["payload"]["manifest"].is_object());
    }

    #[test]
    fn test_request_frame_shape() {
        let msg = OutboundMessage::request("command_1", "ssap://audio/setVolume", json!({"volume": 7}));
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "request",
                "id": "command_1",
                "uri": "ssap://audio/setVolume",
                "payload": {"volume": 7}
            })
        );
    }

    #[test]
    fn test_request_null_payload_becomes_empty_object() {
        let msg = OutboundMessage::request("command_3", "ssap://system/turnOff", Value::Null);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["payload"], json!({}));
    }

    #[test]
    fn test_outbound_id_accessor() {
        assert_eq!(OutboundMessage::register(None).id(), REGISTER_ID);
        assert_eq!(
            OutboundMessage::request("command_9", "ssap://x", json!({})).id(),
            "command_9"
        );
    }

    #[test]
    fn test_frame_kind_from_wire() {
        assert_eq!(FrameKind::from_wire(Some("registered")), FrameKind::Registered);
        assert_eq!(FrameKind::from_wire(Some("error")), FrameKind::Error);
        assert_eq!(FrameKind::from_wire(Some("response")), FrameKind::Response);
        assert_eq!(FrameKind::from_wire(Some("?")), FrameKind::Other);
        assert_eq!(FrameKind::from_wire(None), FrameKind::Other);
    }

    #[test]
    fn test_registered_with_token() {
        let f = frame(json!({"type": "registered", "id": "register_0", "payload": {"client-key": "abc123"}}));
        assert!(f.is_registration());
        assert_eq!(
            f.registration_outcome(),
            RegistrationOutcome::Registered {
                client_key: Some("abc123".to_string())
            }
        );
    }

    #[test]
    fn test_registered_without_token() {
        let f = frame(json!({"type": "registered", "id": "register_0"}));
        assert_eq!(
            f.registration_outcome(),
            RegistrationOutcome::Registered { client_key: None }
        );
    }

    #[test]
    fn test_registration_error_uses_device_text_or_fallback() {
        let with_text = frame(json!({"type": "error", "id": "register_0", "error": "403 denied"}));
        let without_text = frame(json!({"type": "error", "id": "register_0", "error": ""}));
        assert_eq!(
            with_text.registration_outcome(),
            RegistrationOutcome::Failed {
                reason: "403 denied".to_string()
            }
        );
        assert_eq!(
            without_text.registration_outcome(),
            RegistrationOutcome::Failed {
                reason: "Registration failed".to_string()
            }
        );
    }

    #[test]
    fn test_prompt_response_is_interim() {
        let f = frame(json!({
            "type": "response",
            "id": "register_0",
            "payload": {"pairingType": "PROMPT", "returnValue": true}
        }));
        assert_eq!(f.registration_outcome(), RegistrationOutcome::Prompted);
    }

    #[test]
    fn test_command_success_with_unusual_type() {
        let f = frame(json!({"id": "command_1", "type": "?", "payload": {"volume": 12}}));
        assert_eq!(
            f.into_command_outcome(),
            CommandOutcome::Success(json!({"volume": 12}))
        );
    }

    #[test]
    fn test_command_success_without_payload_is_null() {
        let f = frame(json!({"id": "command_1", "type": "response"}));
        assert_eq!(f.into_command_outcome(), CommandOutcome::Success(Value::Null));
    }

    #[test]
    fn test_command_error_fallback_text() {
        let f = frame(json!({"id": "command_4", "type": "error"}));
        assert_eq!(
            f.into_command_outcome(),
            CommandOutcome::Failed("Command failed".to_string())
        );
    }
}
