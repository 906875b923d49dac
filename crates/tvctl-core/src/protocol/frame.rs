//! Decoding of inbound primary-socket frames.

use thiserror::Error;

use super::messages::InboundFrame;

/// Errors that can occur while decoding an inbound frame.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame is not a JSON object of the expected shape.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decodes one text frame from the TV.
///
/// # Errors
///
/// Returns [`ProtocolError::Malformed`] if `text` is not JSON, is JSON but not
/// an object, or has fields of the wrong type.  Callers log and drop such
/// frames; a single bad frame never ends the session.
pub fn decode_frame(text: &str) -> Result<InboundFrame, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_frame() {
        // Arrange
        let text = r#"{"type":"response","id":"command_1","payload":{"returnValue":true}}"#;

        // Act
        let frame = decode_frame(text).unwrap();

        // Assert
        assert_eq!(frame.id.as_deref(), Some("command_1"));
        assert_eq!(frame.frame_type.as_deref(), Some("response"));
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let frame = decode_frame(r#"{"id":"command_2","type":"response","extra":[1,2]}"#).unwrap();
        assert_eq!(frame.id.as_deref(), Some("command_2"));
    }

    #[test]
    fn test_decode_rejects_non_json() {
        assert!(matches!(
            decode_frame("not json at all"),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_object_json() {
        assert!(decode_frame("42").is_err());
        assert!(decode_frame(r#"["command_1"]"#).is_err());
    }

    #[test]
    fn test_decode_rejects_truncated_frame() {
        assert!(decode_frame(r#"{"id":"command_1","type":"resp"#).is_err());
    }

    #[test]
    fn test_decode_empty_object_has_no_id() {
        let frame = decode_frame("{}").unwrap();
        assert!(frame.id.is_none());
    }
}
