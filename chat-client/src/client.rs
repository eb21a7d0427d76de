//! ChatClient - the main interface to the chat service.
//!
//! This module provides [`ChatClient`], which speaks the RPC contract over
//! a pluggable [`Transport`] and keeps the local session state: the room
//! directory and the per-room read cursors.
//!
//! # Architecture
//!
//! ```text
//! parley (scheduler) → ChatClient → Transport → Network
//!                          ↓
//!                chat-core (directory, cursors)
//! ```
//!
//! The synchronizer ([`ChatClient::pull`]) is the sole writer of cursors;
//! the send path never touches them. Both run concurrently on their own
//! calls, so neither blocks the other.

use thiserror::Error;
use tokio::sync::Mutex;

use parley_chat_core::{CursorError, CursorTracker, RoomDirectory};
use parley_chat_types::{
    ChatMessage, CreateRoom, GetMessages, JoinRoom, LeaveRoom, Message, MessageIndex, Room,
    RoomId, SendMessage, User, WireError,
};

use crate::transport::{Transport, TransportError};

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Frame encode/decode error.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    /// Cursor bookkeeping error.
    #[error("cursor error: {0}")]
    Cursor(#[from] CursorError),

    /// The service replied with something the contract does not allow here.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The service reported an error.
    #[error("service error: {0}")]
    Service(String),
}

/// How [`ChatClient::create_or_join`] resolved the requested room name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The room did not exist; the service created it.
    Created(Room),
    /// The room existed; the client joined it.
    Joined(Room),
}

impl JoinOutcome {
    /// The resolved room.
    pub fn room(&self) -> &Room {
        match self {
            Self::Created(room) | Self::Joined(room) => room,
        }
    }

    /// Whether the room was created by this call.
    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Receives the messages the synchronizer surfaces for display.
///
/// Implemented for any `FnMut(&ChatMessage)`, so a closure works as a sink.
pub trait MessageSink: Send {
    /// Handle one message, in delivery order.
    fn deliver(&mut self, message: &ChatMessage);
}

impl<F> MessageSink for F
where
    F: FnMut(&ChatMessage) + Send,
{
    fn deliver(&mut self, message: &ChatMessage) {
        self(message)
    }
}

/// The main chat client.
///
/// Owns the local user identity, the room directory and the per-room
/// cursors, and issues calls through the transport.
pub struct ChatClient<T: Transport> {
    user: User,
    transport: T,
    directory: Mutex<RoomDirectory>,
    cursors: Mutex<CursorTracker>,
}

impl<T: Transport> ChatClient<T> {
    /// Create a new ChatClient for the given user.
    pub fn new(user: User, transport: T) -> Self {
        Self {
            user,
            transport,
            directory: Mutex::new(RoomDirectory::new()),
            cursors: Mutex::new(CursorTracker::new()),
        }
    }

    /// The local user identity.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Issue one unary call: a single request frame, a single reply frame.
    async fn call(&self, request: &Message) -> Result<Message, ClientError> {
        let mut call = self.transport.open().await?;
        call.send(&request.to_bytes()?).await?;
        let reply = Message::from_bytes(&call.recv().await?)?;
        call.close().await.ok();

        match reply {
            Message::ServiceError(err) => Err(ClientError::Service(err.reason)),
            other => Ok(other),
        }
    }

    /// Refresh the room directory from the service.
    ///
    /// Returns the rooms as the service listed them; the local cache keeps
    /// previously seen rooms and updates the rest in place.
    pub async fn fetch_rooms(&self) -> Result<Vec<Room>, ClientError> {
        let reply = self.call(&Message::GetRooms).await?;
        let Message::RoomList(list) = reply else {
            return Err(ClientError::Protocol("expected RoomList response".into()));
        };

        let mut directory = self.directory.lock().await;
        directory.merge(list.rooms.iter().cloned());
        Ok(list.rooms)
    }

    /// Rooms currently cached, in the order first seen.
    pub async fn rooms(&self) -> Vec<Room> {
        let directory = self.directory.lock().await;
        directory.iter().cloned().collect()
    }

    /// Resolve a room name: join it if it exists, create it otherwise.
    ///
    /// Refreshes the directory first, so a room created by someone else
    /// since the last fetch is joined rather than duplicated. The lookup
    /// and the create are not atomic; if two clients race to create the
    /// same name, the service ends up with both and keeps them.
    ///
    /// Registers the room's cursor exactly once: re-resolving a name never
    /// rewinds the read position.
    pub async fn create_or_join(&self, name: &str) -> Result<JoinOutcome, ClientError> {
        self.fetch_rooms().await?;

        let existing = {
            let directory = self.directory.lock().await;
            directory.find_by_name(name).cloned()
        };

        let outcome = match existing {
            Some(room) => {
                tracing::info!(room = %room.id, name = %room.name, "joining existing room");
                let reply = self
                    .call(&Message::JoinRoom(JoinRoom {
                        room_id: room.id,
                        user: self.user.clone(),
                    }))
                    .await?;
                let Message::RoomJoined(joined) = reply else {
                    return Err(ClientError::Protocol("expected RoomJoined response".into()));
                };
                JoinOutcome::Joined(joined.room)
            }
            None => {
                tracing::info!(name, "creating room");
                let reply = self
                    .call(&Message::CreateRoom(CreateRoom {
                        name: name.to_string(),
                        user: self.user.clone(),
                    }))
                    .await?;
                let Message::RoomJoined(joined) = reply else {
                    return Err(ClientError::Protocol("expected RoomJoined response".into()));
                };
                JoinOutcome::Created(joined.room)
            }
        };

        {
            let mut directory = self.directory.lock().await;
            directory.insert(outcome.room().clone());
        }
        {
            let mut cursors = self.cursors.lock().await;
            cursors.register(outcome.room().id);
        }

        Ok(outcome)
    }

    /// Send a line of chat to a room.
    ///
    /// The service assigns the message index; the client only logs it.
    /// The read cursor is not involved: the echo comes back through the
    /// message stream and is filtered there.
    pub async fn send(&self, room_id: RoomId, text: &str) -> Result<(), ClientError> {
        let reply = self
            .call(&Message::SendMessage(SendMessage {
                user: self.user.clone(),
                room_id,
                text: text.to_string(),
            }))
            .await?;
        let Message::SendAck(ack) = reply else {
            return Err(ClientError::Protocol("expected SendAck response".into()));
        };

        tracing::debug!(room = %ack.room_id, index = %ack.index, "message accepted");
        Ok(())
    }

    /// Leave a room.
    pub async fn leave(&self, room_id: RoomId) -> Result<(), ClientError> {
        let reply = self
            .call(&Message::LeaveRoom(LeaveRoom {
                room_id,
                user: self.user.clone(),
            }))
            .await?;
        let Message::RoomLeft(_) = reply else {
            return Err(ClientError::Protocol("expected RoomLeft response".into()));
        };

        tracing::info!(room = %room_id, "left room");
        Ok(())
    }

    /// Pull every message newer than the room's cursor, once.
    ///
    /// Opens a message stream starting just after the cursor and consumes
    /// it until the service closes it. The cursor advances as each message
    /// arrives - not at the end - so a stream that dies halfway leaves the
    /// cursor on the last message actually seen and the next pull resumes
    /// there without re-delivering anything.
    ///
    /// Messages authored by the local user are counted into the cursor but
    /// suppressed from the sink. Returns how many messages were delivered.
    pub async fn pull(
        &self,
        room_id: RoomId,
        sink: &mut dyn MessageSink,
    ) -> Result<usize, ClientError> {
        let start = {
            let cursors = self.cursors.lock().await;
            cursors.get(room_id)?.next()
        };

        let mut call = self.transport.open().await?;
        call.send(
            &Message::GetMessages(GetMessages {
                room_id,
                start_index: start,
            })
            .to_bytes()?,
        )
        .await?;

        let mut delivered = 0;
        loop {
            let frame = call.recv().await?;
            match Message::from_bytes(&frame)? {
                Message::Chat(message) => {
                    {
                        let mut cursors = self.cursors.lock().await;
                        cursors.advance(room_id, message.index);
                    }
                    if message.user.name == self.user.name {
                        tracing::trace!(index = %message.index, "suppressed self echo");
                    } else {
                        sink.deliver(&message);
                        delivered += 1;
                    }
                }
                Message::EndOfMessages => {
                    call.close().await.ok();
                    return Ok(delivered);
                }
                Message::ServiceError(err) => return Err(ClientError::Service(err.reason)),
                _ => {
                    return Err(ClientError::Protocol(
                        "unexpected reply in message stream".into(),
                    ))
                }
            }
        }
    }

    /// The current read cursor for a room.
    pub async fn cursor(&self, room_id: RoomId) -> Result<MessageIndex, ClientError> {
        let cursors = self.cursors.lock().await;
        Ok(cursors.get(room_id)?)
    }

    /// Get a reference to the underlying transport (for testing).
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
