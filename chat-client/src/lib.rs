//! # chat-client
//!
//! Client library for the parley chat protocol.
//!
//! ## Features
//!
//! - **Transport Abstraction**: Pluggable call-oriented transport (TCP, mock)
//! - **Incremental Synchronization**: Streaming pull resumed from a per-room cursor
//! - **Self-Echo Filtering**: Messages authored locally are never surfaced twice
//!
//! ## Example
//!
//! ```ignore
//! use parley_chat_client::{ChatClient, TcpTransport};
//! use parley_chat_types::User;
//!
//! let transport = TcpTransport::new("127.0.0.1:50051");
//! let client = ChatClient::new(User::new("Tommy"), transport);
//!
//! let outcome = client.create_or_join("main").await?;
//! client.send(outcome.room().id, "hello").await?;
//! client.pull(outcome.room().id, &mut |m| println!("{}: {}", m.user.name, m.text)).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod transport;

pub use client::{ChatClient, ClientError, JoinOutcome, MessageSink};
pub use transport::{
    Call, MockTransport, TcpTransport, TcpTransportConfig, Transport, TransportError,
    MAX_FRAME_SIZE,
};
