//! Mock transport for testing.
//!
//! Scripts responses call-by-call and captures every frame the client
//! sends for verification.

use super::{Call, Transport, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Mock transport for testing.
///
/// Each `open()` pops the next queued call script; `recv()` on the
/// resulting call replays the scripted frames in order.
#[derive(Debug, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    scripts: VecDeque<CallScript>,
    sent_frames: Vec<Vec<u8>>,
    calls_opened: usize,
    fail_next_open: Option<String>,
}

#[derive(Debug, Default)]
struct CallScript {
    responses: VecDeque<Vec<u8>>,
    /// Error reported once `responses` runs out; `None` means a clean
    /// peer close.
    trailing_error: Option<String>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next call: the frames successive `recv()`s will return.
    ///
    /// Once the frames run out, further `recv()`s report a closed stream.
    pub fn queue_call(&self, responses: Vec<Vec<u8>>) {
        let mut inner = self.inner.lock().unwrap();
        inner.scripts.push_back(CallScript {
            responses: responses.into(),
            trailing_error: None,
        });
    }

    /// Script a call whose stream fails with `error` after `responses`
    /// have been delivered.
    pub fn queue_call_failing_after(&self, responses: Vec<Vec<u8>>, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.scripts.push_back(CallScript {
            responses: responses.into(),
            trailing_error: Some(error.to_string()),
        });
    }

    /// Cause the next `open()` to fail with the given error.
    pub fn fail_next_open(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_open = Some(error.to_string());
    }

    /// Every frame sent so far, across all calls, in order.
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        let inner = self.inner.lock().unwrap();
        inner.sent_frames.clone()
    }

    /// The most recent frame sent.
    pub fn last_sent(&self) -> Option<Vec<u8>> {
        let inner = self.inner.lock().unwrap();
        inner.sent_frames.last().cloned()
    }

    /// Number of calls opened so far.
    pub fn calls_opened(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.calls_opened
    }
}

impl Clone for MockTransport {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn open(&self) -> Result<Box<dyn Call>, TransportError> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(error) = inner.fail_next_open.take() {
            return Err(TransportError::ConnectionFailed(error));
        }

        inner.calls_opened += 1;
        let script = inner.scripts.pop_front().unwrap_or_default();
        Ok(Box::new(MockCall {
            shared: Arc::clone(&self.inner),
            script,
        }))
    }
}

struct MockCall {
    shared: Arc<Mutex<MockTransportInner>>,
    script: CallScript,
}

#[async_trait]
impl Call for MockCall {
    async fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut inner = self.shared.lock().unwrap();
        inner.sent_frames.push(data.to_vec());
        Ok(())
    }

    async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
        match self.script.responses.pop_front() {
            Some(frame) => Ok(frame),
            None => match self.script.trailing_error.take() {
                Some(error) => Err(TransportError::ReceiveFailed(error)),
                None => Err(TransportError::Closed),
            },
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}
