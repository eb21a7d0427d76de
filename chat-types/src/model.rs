//! The chat data model shared between client and service.

use serde::{Deserialize, Serialize};

use crate::{MessageIndex, RoomId};

/// A chat participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name, chosen at startup and immutable for the session.
    pub name: String,
    /// Service-assigned id; 0 until the service assigns one.
    pub id: u32,
}

impl User {
    /// Create a user that has not yet been assigned an id by the service.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: 0,
        }
    }
}

/// A chat room known to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Service-assigned identity.
    pub id: RoomId,
    /// Human-facing name; duplicates are possible.
    pub name: String,
}

/// A message stored by the service.
///
/// Produced by the service; clients consume it read-only and only ever
/// move their own cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author of the message.
    pub user: User,
    /// Room the message belongs to.
    pub room_id: RoomId,
    /// Position in the room's history, assigned by the service.
    pub index: MessageIndex,
    /// The message body.
    pub text: String,
}
