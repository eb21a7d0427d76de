//! Per-room cursor tracking for the parley client.
//!
//! A cursor records the index of the last message consumed for a room and
//! is the resumption point for the next pull. Cursors only move forward:
//! the synchronizer is the sole writer, and the service delivers messages
//! in increasing index order, so a mid-stream failure leaves the cursor at
//! the last message actually seen and the next pull resumes right after it.

use std::collections::HashMap;

use parley_chat_types::{MessageIndex, RoomId};
use thiserror::Error;

/// Errors from cursor bookkeeping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    /// The room was never registered with the tracker.
    #[error("unknown room: {0}")]
    UnknownRoom(RoomId),
}

/// Tracks the last consumed message index per room.
///
/// An entry is created once, when the room is joined or created, and lives
/// for the rest of the process.
#[derive(Debug, Clone, Default)]
pub struct CursorTracker {
    cursors: HashMap<RoomId, MessageIndex>,
}

impl CursorTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a room at index zero ("nothing consumed yet").
    ///
    /// Returns `false` without touching the entry if the room is already
    /// tracked, so re-joining a room can never rewind its cursor.
    pub fn register(&mut self, room: RoomId) -> bool {
        if self.cursors.contains_key(&room) {
            return false;
        }
        self.cursors.insert(room, MessageIndex::zero());
        true
    }

    /// Current cursor for a room.
    pub fn get(&self, room: RoomId) -> Result<MessageIndex, CursorError> {
        self.cursors
            .get(&room)
            .copied()
            .ok_or(CursorError::UnknownRoom(room))
    }

    /// Move a room's cursor to `index`.
    ///
    /// The stream delivers strictly increasing indices, so the single
    /// writer always moves forward; the tracker does not second-guess it.
    pub fn advance(&mut self, room: RoomId, index: MessageIndex) {
        self.cursors.insert(room, index);
    }

    /// Whether the room has been registered.
    pub fn is_tracked(&self, room: RoomId) -> bool {
        self.cursors.contains_key(&room)
    }
}
