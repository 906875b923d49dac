//! Correlation ids for outbound frames.
//!
//! Two classes of frame are correlated by id:
//!
//! - The registration frame always uses [`REGISTER_ID`].
//! - Requests use `command_<N>` where N starts at 1 and increases by one per
//!   request for the lifetime of a session.
//!
//! The prefixes differ, so a command id can never collide with the
//! registration id.
//!
//! # Thread safety
//!
//! The counter uses `AtomicU64` internally, so `next_id()` can be called
//! through a shared reference from any task without producing the same id
//! twice.

use std::sync::atomic::{AtomicU64, Ordering};

/// The id reserved for the registration (pairing) exchange.
pub const REGISTER_ID: &str = "register_0";

/// Prefix of every request id.
const COMMAND_PREFIX: &str = "command_";

/// A thread-safe, strictly increasing allocator of request ids.
///
/// # Examples
///
/// ```rust
/// use tvctl_core::protocol::CommandIdCounter;
///
/// let ids = CommandIdCounter::new();
/// assert_eq!(ids.next_id(), "command_1");
/// assert_eq!(ids.next_id(), "command_2");
/// ```
#[derive(Debug)]
pub struct CommandIdCounter {
    /// Number of ids handed out so far.
    issued: AtomicU64,
}

impl CommandIdCounter {
    /// Creates a counter whose first id is `command_1`.
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
        }
    }

    /// Returns the next request id and advances the counter.
    ///
    /// `Ordering::Relaxed` is enough: the id only has to be unique, and the
    /// session allocates it under the same lock that orders the send.
    pub fn next_id(&self) -> String {
        let n = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{COMMAND_PREFIX}{n}")
    }
}

impl Default for CommandIdCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns `true` if `id` has the shape of a request id.
pub fn is_command_id(id: &str) -> bool {
    id.strip_prefix(COMMAND_PREFIX)
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_first_id_is_command_1() {
        // Arrange
        let ids = CommandIdCounter::new();

        // Act
        let first = ids.next_id();

        // Assert
        assert_eq!(first, "command_1");
    }

    #[test]
    fn test_ids_strictly_increase() {
        let ids = CommandIdCounter::new();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert_eq!((a.as_str(), b.as_str(), c.as_str()), ("command_1", "command_2", "command_3"));
    }

    #[test]
    fn test_command_ids_never_equal_register_id() {
        let ids = CommandIdCounter::new();
        for _ in 0..1000 {
            assert_ne!(ids.next_id(), REGISTER_ID);
        }
    }

    #[test]
    fn test_concurrent_allocation_yields_unique_ids() {
        // Arrange: 8 threads each allocate 500 ids from one shared counter
        let ids = Arc::new(CommandIdCounter::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || (0..500).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        // Act
        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                // Assert: no id is handed out twice
                assert!(seen.insert(id), "duplicate id allocated");
            }
        }
        assert_eq!(seen.len(), 4000);
    }

    #[test]
    fn test_is_command_id() {
        assert!(is_command_id("command_1"));
        assert!(is_command_id("command_42"));
        assert!(!is_command_id(REGISTER_ID));
        assert!(!is_command_id("command_"));
        assert!(!is_command_id("command_x"));
    }
}
