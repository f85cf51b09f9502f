//! Output sinks.
//!
//! The logger renders a whole event into memory and hands it to the sink as
//! one block. It never locks anything itself: a sink shared by concurrent
//! prints must serialize its own writes, which every sink in this module
//! does.

use std::io;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use bytes::{Bytes, BytesMut};

/// Destination of rendered events.
pub trait Sink: Send + Sync {
    /// Writes one complete event block.
    fn write_block(&self, block: &[u8]) -> io::Result<()>;
}

impl Sink for io::Stderr {
    fn write_block(&self, block: &[u8]) -> io::Result<()> {
        let mut stderr = self.lock();
        stderr.write_all(block)?;
        stderr.flush()
    }
}

impl Sink for io::Stdout {
    fn write_block(&self, block: &[u8]) -> io::Result<()> {
        let mut stdout = self.lock();
        stdout.write_all(block)?;
        stdout.flush()
    }
}

impl<W: Write + Send> Sink for Mutex<W> {
    fn write_block(&self, block: &[u8]) -> io::Result<()> {
        let mut writer = self.lock().map_err(|e| io::Error::other(e.to_string()))?;
        writer.write_all(block)
    }
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    #[inline]
    fn write_block(&self, block: &[u8]) -> io::Result<()> {
        (**self).write_block(block)
    }
}

/// Shared in-memory sink.
///
/// Clones share the same buffer, so one clone can be given to the logger
/// while another reads what was printed.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    inner: Arc<Mutex<BytesMut>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything written so far.
    pub fn contents(&self) -> Bytes {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Bytes::copy_from_slice(&guard)
    }

    /// Returns everything written so far as text, replacing invalid UTF-8.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Sink for BufferSink {
    fn write_block(&self, block: &[u8]) -> io::Result<()> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(block);
        Ok(())
    }
}
