//! Identity and ordering types for the parley protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A service-assigned room identifier.
///
/// Room identity is the id; the room name is only a human-facing lookup
/// key and is not guaranteed to be unique.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(u32);

impl RoomId {
    /// Create a RoomId with the given value.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the numeric value of this RoomId.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoomId({})", self.0)
    }
}

/// The position of a message within a room's history.
///
/// Assigned by the service, strictly increasing per room. As a cursor,
/// zero means "nothing consumed yet" — the first real message has index 1.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct MessageIndex(u64);

impl MessageIndex {
    /// Create a MessageIndex with the given value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the numeric value of this MessageIndex.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Create an index representing "nothing consumed yet".
    pub fn zero() -> Self {
        Self(0)
    }

    /// Increment the index by one.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for MessageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for MessageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageIndex({})", self.0)
    }
}
