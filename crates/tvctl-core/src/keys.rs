//! Named keys of the TV remote.
//!
//! Keys are sent as `type:button` events on the pointer socket.  Each key
//! has a *label* (how users type it, e.g. `NUM_5`) and a *wire name* (what
//! the TV expects, e.g. `5`).  For everything except the digits the two are
//! the same.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Returned when a string names no known key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown remote key: {0}")]
pub struct UnknownKey(pub String);

macro_rules! remote_keys {
    ($($variant:ident => ($label:literal, $wire:literal)),+ $(,)?) => {
        /// A key on the TV remote.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum RemoteKey {
            $($variant),+
        }

        impl RemoteKey {
            /// Every key, in catalogue order.
            pub const ALL: &'static [RemoteKey] = &[$(RemoteKey::$variant),+];

            /// The name users type, e.g. `NUM_5`.
            pub fn label(self) -> &'static str {
                match self {
                    $(RemoteKey::$variant => $label),+
                }
            }

            /// The name sent on the pointer socket, e.g. `5`.
            pub fn wire_name(self) -> &'static str {
                match self {
                    $(RemoteKey::$variant => $wire),+
                }
            }
        }
    };
}

remote_keys! {
    // Navigation
    Up => ("UP", "UP"),
    Down => ("DOWN", "DOWN"),
    Left => ("LEFT", "LEFT"),
    Right => ("RIGHT", "RIGHT"),
    Enter => ("ENTER", "ENTER"),
    Back => ("BACK", "BACK"),
    Home => ("HOME", "HOME"),
    Exit => ("EXIT", "EXIT"),
    // Media
    Play => ("PLAY", "PLAY"),
    Pause => ("PAUSE", "PAUSE"),
    Stop => ("STOP", "STOP"),
    Rewind => ("REWIND", "REWIND"),
    FastForward => ("FASTFORWARD", "FASTFORWARD"),
    // Volume
    VolumeUp => ("VOLUMEUP", "VOLUMEUP"),
    VolumeDown => ("VOLUMEDOWN", "VOLUMEDOWN"),
    Mute => ("MUTE", "MUTE"),
    // Channels
    ChannelUp => ("CHANNELUP", "CHANNELUP"),
    ChannelDown => ("CHANNELDOWN", "CHANNELDOWN"),
    // Digits
    Num0 => ("NUM_0", "0"),
    Num1 => ("NUM_1", "1"),
    Num2 => ("NUM_2", "2"),
    Num3 => ("NUM_3", "3"),
    Num4 => ("NUM_4", "4"),
    Num5 => ("NUM_5", "5"),
    Num6 => ("NUM_6", "6"),
    Num7 => ("NUM_7", "7"),
    Num8 => ("NUM_8", "8"),
    Num9 => ("NUM_9", "9"),
    // Colours
    Red => ("RED", "RED"),
    Green => ("GREEN", "GREEN"),
    Yellow => ("YELLOW", "YELLOW"),
    Blue => ("BLUE", "BLUE"),
    // Other
    Menu => ("MENU", "MENU"),
    Info => ("INFO", "INFO"),
    QMenu => ("QMENU", "QMENU"),
    Power => ("POWER", "POWER"),
    Cc => ("CC", "CC"),
    Dash => ("DASH", "DASH"),
    Asterisk => ("ASTERISK", "ASTERISK"),
}

impl FromStr for RemoteKey {
    type Err = UnknownKey;

    /// Accepts either the label or the wire name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RemoteKey::ALL
            .iter()
            .copied()
            .find(|key| key.label().eq_ignore_ascii_case(s) || key.wire_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownKey(s.to_string()))
    }
}

impl fmt::Display for RemoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
