//! Protocol messages for the parley chat service.
//!
//! Every exchange with the service is one of these messages, encoded as a
//! MessagePack frame. Unary calls carry one request and one response;
//! `GetMessages` is answered by a stream of [`Message::Chat`] frames closed
//! by [`Message::EndOfMessages`].

use serde::{Deserialize, Serialize};

use crate::{ChatMessage, MessageIndex, Room, RoomId, User, WireError};

/// All possible protocol messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// Request the full room list
    GetRooms,
    /// Response to GetRooms
    RoomList(RoomList),
    /// Create a room (service assigns the id)
    CreateRoom(CreateRoom),
    /// Join an existing room
    JoinRoom(JoinRoom),
    /// Leave a joined room
    LeaveRoom(LeaveRoom),
    /// Response to CreateRoom and JoinRoom
    RoomJoined(RoomJoined),
    /// Response to LeaveRoom
    RoomLeft(RoomLeft),
    /// Send a chat message (service assigns the index)
    SendMessage(SendMessage),
    /// Acknowledge a sent message
    SendAck(SendAck),
    /// Request the message stream for a room
    GetMessages(GetMessages),
    /// One streamed chat message
    Chat(ChatMessage),
    /// End of a message stream (caught up for now)
    EndOfMessages,
    /// Service-reported failure for the preceding request
    ServiceError(ServiceError),
}

impl Message {
    /// Serialize to MessagePack bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        rmp_serde::to_vec(self).map_err(WireError::Serialization)
    }

    /// Deserialize from MessagePack bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        rmp_serde::from_slice(bytes).map_err(WireError::Deserialization)
    }
}

/// Response to a room list request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomList {
    /// Every room the service currently knows.
    pub rooms: Vec<Room>,
}

/// Create a new room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoom {
    /// Requested room name.
    pub name: String,
    /// The requesting user.
    pub user: User,
}

/// Join an existing room by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoom {
    /// The room to join.
    pub room_id: RoomId,
    /// The joining user.
    pub user: User,
}

/// Leave a joined room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRoom {
    /// The room to leave.
    pub room_id: RoomId,
    /// The leaving user.
    pub user: User,
}

/// Confirmation that a room was created or joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomJoined {
    /// The room, with its service-assigned id.
    pub room: Room,
}

/// Confirmation that a room was left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomLeft {
    /// The room that was left.
    pub room_id: RoomId,
}

/// Send a chat message to a room.
///
/// The client supplies no index; the service assigns one on receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessage {
    /// The sending user.
    pub user: User,
    /// Target room.
    pub room_id: RoomId,
    /// The message body.
    pub text: String,
}

/// Acknowledgement that a message was accepted and stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendAck {
    /// The room the message was stored in.
    pub room_id: RoomId,
    /// The index the service assigned.
    pub index: MessageIndex,
}

/// Request all messages for a room with index >= `start_index`.
///
/// The service replies with [`Message::Chat`] frames in increasing index
/// order; it may hold the stream open while new messages arrive and sends
/// [`Message::EndOfMessages`] when it decides the client is caught up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetMessages {
    /// The room to stream.
    pub room_id: RoomId,
    /// First index of interest.
    pub start_index: MessageIndex,
}

/// A failure the service reports instead of a normal response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceError {
    /// Human-readable reason.
    pub reason: String,
}
