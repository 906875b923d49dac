//! Key scripts: short sequences of key presses, pauses and text.
//!
//! Each token on the command line is one step:
//!
//! | Token            | Step                                   |
//! |------------------|----------------------------------------|
//! | `NOOP_<text>`    | comment, only logged                   |
//! | `PAUSE_<ms>`     | wait, at most 60 s                     |
//! | `TEXT_<text>`    | type text into the focused field       |
//! | `DELETE_<n>`     | delete `n` characters                  |
//! | `<KEY>_<n>`      | press a known key `n` times (1..=100)  |
//! | anything else    | press that key once                    |
//!
//! Prefixes are case-insensitive.  Text may be wrapped in matching single or
//! double quotes, which are stripped.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};
use tvctl_core::RemoteKey;

use super::commands::{RemoteCommands, RemoteSession};
use crate::SessionError;

/// Longest accepted pause.
pub const MAX_PAUSE: Duration = Duration::from_secs(60);

/// Largest accepted repeat count.
pub const MAX_REPEAT: u32 = 100;

/// Delay the CLI leaves between consecutive inputs.
pub const DEFAULT_PACE: Duration = Duration::from_millis(150);

/// A token that parses as a step but cannot be run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("PAUSE value {ms}ms exceeds maximum of {}ms", MAX_PAUSE.as_millis())]
    PauseTooLong { ms: u64 },

    #[error("repeat count {count} exceeds maximum of {}", MAX_REPEAT)]
    RepeatTooLarge { count: u64 },

    #[error("repeat count must be at least 1")]
    RepeatTooSmall,

    #[error("TEXT_ requires text to type (e.g. TEXT_hello)")]
    EmptyText,
}

/// One parsed script token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Comment(String),
    Pause(Duration),
    Text(String),
    Delete(u32),
    /// `key` is the wire name sent on the pointer socket.
    Key { key: String, repeat: u32 },
}

impl fmt::Display for ScriptStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment(text) => write!(f, "# {text}"),
            Self::Pause(d) => write!(f, "pause {}ms", d.as_millis()),
            Self::Text(text) => write!(f, "type {text:?}"),
            Self::Delete(n) => write!(f, "delete {n} character(s)"),
            Self::Key { key, repeat: 1 } => write!(f, "key {key}"),
            Self::Key { key, repeat } => write!(f, "key {key} x{repeat}"),
        }
    }
}

/// Case-insensitive `strip_prefix`.
fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parses one script token.
///
/// # Errors
///
/// Returns a [`ScriptError`] for tokens whose shape is recognised but whose
/// value is out of range.
pub fn parse_step(arg: &str) -> Result<ScriptStep, ScriptError> {
    if let Some(rest) = strip_prefix_ci(arg, "NOOP_") {
        return Ok(ScriptStep::Comment(strip_quotes(rest).to_string()));
    }

    if let Some(rest) = strip_prefix_ci(arg, "PAUSE_").filter(|r| all_digits(r)) {
        let ms = rest.parse::<u64>().unwrap_or(u64::MAX);
        if ms > MAX_PAUSE.as_millis() as u64 {
            return Err(ScriptError::PauseTooLong { ms });
        }
        return Ok(ScriptStep::Pause(Duration::from_millis(ms)));
    }

    if let Some(rest) = strip_prefix_ci(arg, "TEXT_") {
        let text = strip_quotes(rest);
        if text.is_empty() {
            return Err(ScriptError::EmptyText);
        }
        return Ok(ScriptStep::Text(text.to_string()));
    }

    if let Some(rest) = strip_prefix_ci(arg, "DELETE_").filter(|r| all_digits(r)) {
        return Ok(ScriptStep::Delete(rest.parse().unwrap_or(u32::MAX)));
    }

    if let Some((name, count)) = arg.split_once('_') {
        let is_name = !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphabetic());
        if is_name && all_digits(count) {
            if let Ok(key) = name.parse::<RemoteKey>() {
                let count = count.parse::<u64>().unwrap_or(u64::MAX);
                if count > u64::from(MAX_REPEAT) {
                    return Err(ScriptError::RepeatTooLarge { count });
                }
                if count < 1 {
                    return Err(ScriptError::RepeatTooSmall);
                }
                return Ok(ScriptStep::Key {
                    key: key.wire_name().to_string(),
                    repeat: count as u32,
                });
            }
        }
    }

    let key = match arg.parse::<RemoteKey>() {
        Ok(key) => key.wire_name().to_string(),
        Err(_) => arg.to_uppercase(),
    };
    Ok(ScriptStep::Key { key, repeat: 1 })
}

async fn settle(pace: Duration) {
    if !pace.is_zero() {
        tokio::time::sleep(pace).await;
    }
}

/// Runs `args` as a key script.
///
/// Invalid tokens are logged and skipped.  Text, delete and each key press
/// are followed by `pace`.
///
/// # Errors
///
/// Stops at the first session error.
pub async fn run_script<S: RemoteSession + ?Sized>(
    commands: &RemoteCommands<'_, S>,
    args: &[String],
    pace: Duration,
) -> Result<(), SessionError> {
    for arg in args {
        let step = match parse_step(arg) {
            Ok(step) => step,
            Err(e) => {
                warn!(token = %arg, error = %e, "skipping script step");
                continue;
            }
        };
        info!("{step}");

        match step {
            ScriptStep::Comment(_) => {}
            ScriptStep::Pause(d) => settle(d).await,
            ScriptStep::Text(text) => {
                commands.insert_text(&text, false).await?;
                settle(pace).await;
            }
            ScriptStep::Delete(n) => {
                commands.delete_characters(n).await?;
                settle(pace).await;
            }
            ScriptStep::Key { key, repeat } => {
                for _ in 0..repeat {
                    commands.press(&key).await?;
                    settle(pace).await;
                }
            }
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::MockRemoteSession;
    use mockall::predicate::eq;
    use serde_json::json;
    use tokio_test::block_on;
    use tvctl_core::{ssap, PointerEvent};

    fn key(name: &str, repeat: u32) -> ScriptStep {
        ScriptStep::Key {
            key: name.to_string(),
            repeat,
        }
    }

    #[test]
    fn test_noop_strips_quotes() {
        assert_eq!(
            parse_step(r#"NOOP_"open settings""#),
            Ok(ScriptStep::Comment("open settings".into()))
        );
        assert_eq!(parse_step("noop_x"), Ok(ScriptStep::Comment("x".into())));
    }

    #[test]
    fn test_pause_bounds() {
        assert_eq!(
            parse_step("PAUSE_500"),
            Ok(ScriptStep::Pause(Duration::from_millis(500)))
        );
        assert_eq!(
            parse_step("pause_60000"),
            Ok(ScriptStep::Pause(Duration::from_secs(60)))
        );
        assert_eq!(
            parse_step("PAUSE_60001"),
            Err(ScriptError::PauseTooLong { ms: 60001 })
        );
    }

    #[test]
    fn test_text_rules() {
        assert_eq!(
            parse_step("TEXT_'hello world'"),
            Ok(ScriptStep::Text("hello world".into()))
        );
        assert_eq!(parse_step("text_abc"), Ok(ScriptStep::Text("abc".into())));
        assert_eq!(parse_step("TEXT_"), Err(ScriptError::EmptyText));
        assert_eq!(parse_step(r#"TEXT_"""#), Err(ScriptError::EmptyText));
    }

    #[test]
    fn test_delete() {
        assert_eq!(parse_step("DELETE_5"), Ok(ScriptStep::Delete(5)));
    }

    #[test]
    fn test_key_repeat() {
        assert_eq!(parse_step("down_9"), Ok(key("DOWN", 9)));
        assert_eq!(parse_step("LEFT_100"), Ok(key("LEFT", 100)));
        assert_eq!(
            parse_step("LEFT_101"),
            Err(ScriptError::RepeatTooLarge { count: 101 })
        );
        assert_eq!(parse_step("UP_0"), Err(ScriptError::RepeatTooSmall));
    }

    #[test]
    fn test_plain_keys_are_uppercased() {
        assert_eq!(parse_step("home"), Ok(key("HOME", 1)));
        assert_eq!(parse_step("NUM_5"), Ok(key("5", 1)));
        assert_eq!(parse_step("netflix"), Ok(key("NETFLIX", 1)));
        // Unknown name with a count is a single press of the whole token.
        assert_eq!(parse_step("FOO_3"), Ok(key("FOO_3", 1)));
    }

    #[test]
    fn test_run_script_executes_steps_in_order_and_skips_invalid() {
        // Arrange
        let mut session = MockRemoteSession::new();
        let mut seq = mockall::Sequence::new();
        session
            .expect_send_pointer()
            .with(eq(PointerEvent::button("DOWN")))
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        session
            .expect_request()
            .withf(|uri, payload| {
                uri == ssap::INSERT_TEXT && *payload == json!({"text": "hi", "replace": false})
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(json!({})));
        session
            .expect_request()
            .withf(|uri, payload| uri == ssap::DELETE_CHARACTERS && *payload == json!({"count": 2}))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(json!({})));
        session
            .expect_send_pointer()
            .with(eq(PointerEvent::button("ENTER")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        let commands = RemoteCommands::new(&session);
        let args: Vec<String> = [
            "NOOP_start",
            "DOWN_2",
            "PAUSE_99999",
            "TEXT_hi",
            "UP_500",
            "DELETE_2",
            "PAUSE_0",
            "enter",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        // Act
        let result = block_on(run_script(&commands, &args, Duration::ZERO));

        // Assert
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_script_stops_at_session_error() {
        let mut session = MockRemoteSession::new();
        session
            .expect_send_pointer()
            .times(1)
            .returning(|_| Err(SessionError::NotConnected));
        let commands = RemoteCommands::new(&session);
        let args = vec!["HOME".to_string(), "BACK".to_string()];

        let result = block_on(run_script(&commands, &args, Duration::ZERO));

        assert!(matches!(result, Err(SessionError::NotConnected)));
    }
}
