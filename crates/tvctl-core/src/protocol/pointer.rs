//! Text codec for the pointer input socket.
//!
//! The pointer socket does not speak JSON.  Each event is a block of
//! `key:value` lines terminated by an empty line:
//!
//! ```text
//! type:move
//! dx:10
//! dy:-4
//! down:0
//!
//! ```
//!
//! The TV sends no acknowledgement for these events.

use std::fmt;

/// One synthetic input event for the pointer socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerEvent {
    /// Press of a named remote key, e.g. `HOME` or `VOLUMEUP`.
    Button { name: String },
    /// Click at the current pointer position.
    Click,
    /// Relative pointer movement.  `drag` holds the button down while moving.
    Move { dx: i32, dy: i32, drag: bool },
    /// Scroll by the given deltas.
    Scroll { dx: i32, dy: i32 },
}

impl PointerEvent {
    /// Convenience constructor for [`PointerEvent::Button`].
    pub fn button(name: impl Into<String>) -> Self {
        Self::Button { name: name.into() }
    }

    /// Returns the value of the `type:` line.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Button { .. } => "button",
            Self::Click => "click",
            Self::Move { .. } => "move",
            Self::Scroll { .. } => "scroll",
        }
    }

    /// Encodes the event as the text block sent on the pointer socket.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PointerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "type:{}", self.type_name())?;
        match self {
            Self::Button { name } => writeln!(f, "name:{name}")?,
            Self::Click => {}
            Self::Move { dx, dy, drag } => {
                writeln!(f, "dx:{dx}")?;
                writeln!(f, "dy:{dy}")?;
                writeln!(f, "down:{}", u8::from(*drag))?;
            }
            Self::Scroll { dx, dy } => {
                writeln!(f, "dx:{dx}")?;
                writeln!(f, "dy:{dy}")?;
            }
        }
        // Blank line terminates the block.
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_encoding() {
        // Arrange
        let event = PointerEvent::button("HOME");

        // Act
        let text = event.encode();

        // Assert
        assert_eq!(text, "type:button\nname:HOME\n\n");
    }

    #[test]
    fn test_click_encoding() {
        assert_eq!(PointerEvent::Click.encode(), "type:click\n\n");
    }

    #[test]
    fn test_move_encoding_with_drag_flag() {
        let plain = PointerEvent::Move { dx: 10, dy: -4, drag: false };
        let drag = PointerEvent::Move { dx: 0, dy: 3, drag: true };
        assert_eq!(plain.encode(), "type:move\ndx:10\ndy:-4\ndown:0\n\n");
        assert_eq!(drag.encode(), "type:move\ndx:0\ndy:3\ndown:1\n\n");
    }

    #[test]
    fn test_scroll_encoding_has_no_down_line() {
        let text = PointerEvent::Scroll { dx: 0, dy: -120 }.encode();
        assert_eq!(text, "type:scroll\ndx:0\ndy:-120\n\n");
        assert!(!text.contains("down:"));
    }

    #[test]
    fn test_every_block_ends_with_blank_line() {
        let events = [
            PointerEvent::button("ENTER"),
            PointerEvent::Click,
            PointerEvent::Move { dx: 1, dy: 1, drag: false },
            PointerEvent::Scroll { dx: 1, dy: 1 },
        ];
        for event in events {
            assert!(event.encode().ends_with("\n\n"), "{event:?}");
        }
    }
}
