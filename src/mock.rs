//! Mock transport for exercising the driver without a physical device.

use std::collections::VecDeque;

use crate::transport::Transport;
use crate::Result;

/// Scripted [Transport] implementation.
///
/// Responses are served in FIFO order, one per [read_available](Transport::read_available)
/// call; every written byte is recorded for later inspection.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: VecDeque<Vec<u8>>,
    written: Vec<u8>,
}

impl MockTransport {
    /// Creates a new [MockTransport] with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response frame for a future read.
    pub fn push_response(&mut self, bytes: &[u8]) {
        self.responses.push_back(bytes.to_vec());
    }

    /// Gets all bytes written to the transport so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Clears the record of written bytes.
    pub fn clear_written(&mut self) {
        self.written.clear();
    }
}

impl Transport for MockTransport {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.written.extend_from_slice(bytes);

        Ok(())
    }

    fn read_available(&mut self) -> Result<Vec<u8>> {
        Ok(self.responses.pop_front().unwrap_or_default())
    }
}
