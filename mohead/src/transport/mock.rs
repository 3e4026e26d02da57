//! In-memory serial port for tests

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::Arc;

/// Scripted inbound bytes and captured outbound bytes
///
/// Clones share the same buffers, so a test can keep one handle while the
/// code under test owns another. Reads return `Ok(0)` once the script is
/// exhausted, which the decoder reports as end of stream.
#[derive(Clone, Default)]
pub struct MockPort {
    inner: Arc<Mutex<MockPortInner>>,
}

#[derive(Default)]
struct MockPortInner {
    read_buffer: VecDeque<u8>,
    write_buffer: Vec<u8>,
    fail_writes: bool,
}

impl MockPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes to be read
    pub fn inject_read(&self, data: &[u8]) {
        self.inner.lock().read_buffer.extend(data);
    }

    /// All bytes written so far
    pub fn written(&self) -> Vec<u8> {
        self.inner.lock().write_buffer.clone()
    }

    pub fn clear_written(&self) {
        self.inner.lock().write_buffer.clear();
    }

    /// Make every later write fail with `BrokenPipe`
    pub fn fail_writes(&self) {
        self.inner.lock().fail_writes = true;
    }
}

impl Read for MockPort {
    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock();
        let available = inner.read_buffer.len().min(buffer.len());
        for (slot, byte) in buffer.iter_mut().zip(inner.read_buffer.drain(..available)) {
            *slot = byte;
        }
        Ok(available)
    }
}

impl Write for MockPort {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock();
        if inner.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock port closed"));
        }
        inner.write_buffer.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
