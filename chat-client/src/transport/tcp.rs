//! TcpTransport - real transport over plain TCP.
//!
//! Dials the chat service and frames every message with a 4-byte
//! big-endian length prefix. Each call opens its own connection, matching
//! the one-exchange-per-stream wire contract.

use super::{Call, Transport, TransportError, MAX_FRAME_SIZE};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Configuration for [`TcpTransport`].
#[derive(Clone, Debug)]
pub struct TcpTransportConfig {
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,
}

impl Default for TcpTransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// TcpTransport opens one TCP connection per call to the chat service.
pub struct TcpTransport {
    addr: String,
    config: TcpTransportConfig,
}

impl TcpTransport {
    /// Create a transport for the service at `addr` (`host:port`).
    pub fn new(addr: &str) -> Self {
        Self::with_config(addr, TcpTransportConfig::default())
    }

    /// Create a transport with custom configuration.
    pub fn with_config(addr: &str, config: TcpTransportConfig) -> Self {
        Self {
            addr: addr.to_string(),
            config,
        }
    }

    /// The address this transport dials.
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn open(&self) -> Result<Box<dyn Call>, TransportError> {
        let stream = tokio::time::timeout(
            self.config.connect_timeout,
            TcpStream::connect(&self.addr),
        )
        .await
        .map_err(|_| TransportError::Timeout)?
        .map_err(|e| TransportError::ConnectionFailed(format!("connect to {}: {e}", self.addr)))?;

        Ok(Box::new(TcpCall { stream }))
    }
}

struct TcpCall {
    stream: TcpStream,
}

#[async_trait]
impl Call for TcpCall {
    async fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        if data.len() > MAX_FRAME_SIZE {
            return Err(TransportError::SendFailed(format!(
                "frame too large: {} > {}",
                data.len(),
                MAX_FRAME_SIZE
            )));
        }

        // Length-prefixed framing (4 bytes, big-endian)
        let len = (data.len() as u32).to_be_bytes();
        self.stream
            .write_all(&len)
            .await
            .map_err(|e| TransportError::SendFailed(format!("write length: {e}")))?;

        self.stream
            .write_all(data)
            .await
            .map_err(|e| TransportError::SendFailed(format!("write frame: {e}")))?;

        Ok(())
    }

    async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut len_buf = [0u8; 4];
        self.stream.read_exact(&mut len_buf).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                TransportError::Closed
            } else {
                TransportError::ReceiveFailed(format!("read length: {e}"))
            }
        })?;

        let len = u32::from_be_bytes(len_buf) as usize;

        // Guard against unbounded allocation from a bad length prefix
        if len > MAX_FRAME_SIZE {
            return Err(TransportError::ReceiveFailed(format!(
                "frame too large: {len} > {MAX_FRAME_SIZE}"
            )));
        }

        let mut data = vec![0u8; len];
        self.stream
            .read_exact(&mut data)
            .await
            .map_err(|e| TransportError::ReceiveFailed(format!("read frame: {e}")))?;

        Ok(data)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.stream.shutdown().await.ok();
        Ok(())
    }
}
