//! # chat-types
//!
//! Wire format types for the parley chat protocol.
//!
//! This crate provides the foundational types used across all parley crates:
//! - [`RoomId`], [`MessageIndex`] - Identity and ordering types
//! - [`User`], [`Room`], [`ChatMessage`] - The chat data model
//! - [`Message`] - Protocol messages (GetRooms, SendMessage, etc.)
//! - [`WireError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod messages;
mod model;

pub use error::WireError;
pub use ids::{MessageIndex, RoomId};
pub use messages::{
    CreateRoom, GetMessages, JoinRoom, LeaveRoom, Message, RoomJoined, RoomLeft, RoomList,
    SendAck, SendMessage, ServiceError,
};
pub use model::{ChatMessage, Room, User};
