//! Integration tests for the tvctl-core wire format.
//!
//! These tests go through the public API only and pin the exact JSON and
//! text the TV expects, so an accidental rename of a serde field shows up
//! here rather than as a silent pairing failure.

use serde_json::{json, Value};
use tvctl_core::{
    decode_frame, ssap, CommandIdCounter, CommandOutcome, OutboundMessage, PointerEvent,
    RegistrationOutcome, RemoteKey, REGISTER_ID,
};

#[test]
fn test_registration_exchange_end_to_end() {
    // Arrange: the first frame a fresh client sends
    let outbound = OutboundMessage::register(None).to_json().unwrap();
    let sent: Value = serde_json::from_str(&outbound).unwrap();

    // Assert: it is a register frame on the reserved id
    assert_eq!(sent["type"], "register");
    assert_eq!(sent["id"], REGISTER_ID);

    // Act: decode the TV's answer
    let reply = decode_frame(
        r#"{"type":"registered","id":"register_0","payload":{"client-key":"abc123"}}"#,
    )
    .unwrap();

    // Assert
    assert!(reply.is_registration());
    assert_eq!(
        reply.registration_outcome(),
        RegistrationOutcome::Registered {
            client_key: Some("abc123".to_string())
        }
    );
}

#[test]
fn test_first_request_after_registration_uses_command_1() {
    let ids = CommandIdCounter::new();
    let msg = OutboundMessage::request(ids.next_id(), ssap::GET_VOLUME, json!({}));
    let sent: Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();

    assert_eq!(
        sent,
        json!({"type": "request", "id": "command_1", "uri": "ssap://audio/getVolume", "payload": {}})
    );

    let reply = decode_frame(r#"{"id":"command_1","type":"?","payload":{"volume":12}}"#).unwrap();
    assert_eq!(reply.id.as_deref(), Some("command_1"));
    assert_eq!(
        reply.into_command_outcome(),
        CommandOutcome::Success(json!({"volume": 12}))
    );
}

#[test]
fn test_register_frame_round_trips_through_serde() {
    // Token and manifest survive a decode on the receiving side.
    let original = OutboundMessage::register(Some("token-1".to_string()));
    let json = original.to_json().unwrap();
    let decoded: OutboundMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn test_key_press_block_uses_wire_name() {
    let event = PointerEvent::button(RemoteKey::Num3.wire_name());
    assert_eq!(event.encode(), "type:button\nname:3\n\n");
}

#[test]
fn test_pointer_socket_uri_is_stable() {
    assert_eq!(
        ssap::GET_POINTER_SOCKET,
        "ssap://com.webos.service.networkinput/getPointerInputSocket"
    );
}
