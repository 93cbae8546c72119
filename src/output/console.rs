//! Unbuffered passthrough to a standard stream.

use super::Output;
use crate::error::Error;
use std::io::{self, Write};

/// Standard stream a [`ConsoleOutput`] writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stream {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
}

/// Each record goes out in a single `write_all` on the locked stream, so lines
/// from concurrent threads never interleave.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput {
    stream: Stream,
}

impl ConsoleOutput {
    /// Output to standard output, as development mode uses.
    #[must_use]
    pub const fn stdout() -> Self {
        Self {
            stream: Stream::Stdout,
        }
    }

    /// Output to standard error, as internal diagnostics use.
    #[must_use]
    pub const fn stderr() -> Self {
        Self {
            stream: Stream::Stderr,
        }
    }

    /// Stream this output writes to.
    #[must_use]
    pub const fn stream(&self) -> Stream {
        self.stream
    }
}

impl Output for ConsoleOutput {
    fn write(&self, buf: &[u8]) -> Result<(), Error> {
        match self.stream {
            Stream::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(buf)?;
                out.flush()?;
            }
            Stream::Stderr => io::stderr().lock().write_all(buf)?,
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        match self.stream {
            Stream::Stdout => io::stdout().flush()?,
            Stream::Stderr => io::stderr().flush()?,
        }
        Ok(())
    }
}
