//! Shared helpers for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::realtime::transport::{ChannelError, EventTransport, OutboundMessage};

/// Transport double that records everything sent through it.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutboundMessage>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventTransport for RecordingTransport {
    async fn send(&self, message: OutboundMessage) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}
