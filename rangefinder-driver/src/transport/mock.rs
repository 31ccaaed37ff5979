//! In-memory transport for unit tests

use super::Transport;
use crate::error::DriverError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
    physical: bool,
}

struct MockTransportInner {
    read_buffer: VecDeque<u8>,
    write_buffer: Vec<u8>,
}

impl MockTransport {
    pub(crate) fn new(physical: bool) -> Self {
        MockTransport {
            inner: Arc::new(Mutex::new(MockTransportInner {
                read_buffer: VecDeque::new(),
                write_buffer: Vec::new(),
            })),
            physical,
        }
    }

    /// Queue bytes as if sent by the device
    pub(crate) fn inject_read(&self, data: &[u8]) {
        let mut inner = self.inner.lock().unwrap();
        inner.read_buffer.extend(data);
    }

    pub(crate) fn get_written(&self) -> Vec<u8> {
        let inner = self.inner.lock().unwrap();
        inner.write_buffer.clone()
    }

    pub(crate) fn clear_written(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.write_buffer.clear();
    }
}

impl Transport for MockTransport {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, DriverError> {
        let mut inner = self.inner.lock().unwrap();
        let available = inner.read_buffer.len().min(buffer.len());
        for (item, byte) in buffer.iter_mut().zip(inner.read_buffer.drain(..available)) {
            *item = byte;
        }
        Ok(available)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, DriverError> {
        let mut inner = self.inner.lock().unwrap();
        inner.write_buffer.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    fn available(&mut self) -> Result<usize, DriverError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.read_buffer.len())
    }

    fn is_physical(&self) -> bool {
        self.physical
    }
}
