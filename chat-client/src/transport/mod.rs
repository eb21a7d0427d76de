//! Transport abstraction for the parley client.
//!
//! This module provides a pluggable transport layer that abstracts the
//! underlying connection mechanism (TCP, mock for testing).
//!
//! # Design
//!
//! A [`Transport`] opens one [`Call`] per RPC: a fresh bidirectional byte
//! stream carrying length-delimited frames. Unary calls exchange one frame
//! each way; a server-streaming call keeps receiving frames until the
//! service signals the end. Giving every call its own stream lets the
//! background synchronizer hold a message stream open while the interactive
//! send path issues calls of its own, without the two interleaving frames.
//!
//! # Example
//!
//! ```ignore
//! let mut call = transport.open().await?;
//! call.send(&request_bytes).await?;
//! let response = call.recv().await?;
//! ```

mod mock;
mod tcp;

pub use mock::MockTransport;
pub use tcp::{TcpTransport, TcpTransportConfig};

use async_trait::async_trait;
use thiserror::Error;

/// Maximum frame size accepted on the wire (1 MiB).
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not reach the service.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The peer closed the stream.
    #[error("connection closed")]
    Closed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// Connection timeout.
    #[error("connection timeout")]
    Timeout,
}

/// A connection factory for calls against the chat service.
///
/// Implementations handle the underlying connection mechanism
/// (TCP, mock, etc).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open a new call stream to the service.
    async fn open(&self) -> Result<Box<dyn Call>, TransportError>;
}

/// One RPC exchange: request frames out, response frames in.
///
/// Dropping a call closes its stream, which is how an in-flight streaming
/// pull is cancelled promptly on shutdown.
#[async_trait]
pub trait Call: Send {
    /// Send one frame.
    async fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Receive the next frame.
    ///
    /// Suspends until a frame is available or the peer closes the stream.
    async fn recv(&mut self) -> Result<Vec<u8>, TransportError>;

    /// Close the call early.
    async fn close(&mut self) -> Result<(), TransportError>;
}
