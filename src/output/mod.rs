//! Destinations for encoded records. The `Output` trait lets callers plug in
//! their own sink (a buffer in tests, a socket) next to the two built-in ones.

mod console;
mod retention;
mod rotating;

pub use console::{ConsoleOutput, Stream};
pub use rotating::{RotatingFile, RotationPolicy};

use crate::error::Error;
use std::sync::{Arc, Mutex};

/// `Send + Sync` bounds let one output serve concurrent loggers without an outer lock.
pub trait Output: Send + Sync {
    /// Writes one already-encoded record.
    ///
    /// # Errors
    /// I/O errors from the underlying sink.
    fn write(&self, buf: &[u8]) -> Result<(), Error>;

    /// # Errors
    /// I/O errors from the underlying sink.
    fn flush(&self) -> Result<(), Error>;
}

impl<O: Output + ?Sized> Output for Box<O> {
    fn write(&self, buf: &[u8]) -> Result<(), Error> {
        (**self).write(buf)
    }

    fn flush(&self) -> Result<(), Error> {
        (**self).flush()
    }
}

impl<O: Output + ?Sized> Output for Arc<O> {
    fn write(&self, buf: &[u8]) -> Result<(), Error> {
        (**self).write(buf)
    }

    fn flush(&self) -> Result<(), Error> {
        (**self).flush()
    }
}

/// In-memory output; clones share the buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutput {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemoryOutput {
    /// Empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    #[must_use]
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Written records, one per line, without line endings.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(ToString::to_string).collect()
    }
}

impl Output for MemoryOutput {
    fn write(&self, buf: &[u8]) -> Result<(), Error> {
        self.buf
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}
