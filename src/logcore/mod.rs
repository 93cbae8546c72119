//! A core pairs an encoder with an output behind a level gate. Wrapping cores
//! (the sampler) decorate another core without the logger knowing.

mod sampler;

pub use sampler::{Clock, ManualClock, Sampler, SystemClock};

use crate::encoder::Encoder;
use crate::error::Error;
use crate::field::Field;
use crate::level::{Level, LevelController};
use crate::output::Output;
use chrono::{DateTime, Local};
use std::panic::Location;

/// Everything about a record except its fields.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Severity.
    pub level: Level,
    /// When the record was created.
    pub time: DateTime<Local>,
    /// Message text.
    pub message: String,
    /// Call site, when caller capture is on.
    pub caller: Option<&'static Location<'static>>,
    /// Rendered backtrace, for records at or above the stack trace level.
    pub stack: Option<String>,
}

impl Entry {
    /// Entry stamped with the current local time, without caller or stack.
    #[must_use]
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            time: Local::now(),
            message: message.into(),
            caller: None,
            stack: None,
        }
    }
}

/// `Send + Sync` so one core can serve every thread holding a logger.
pub trait Core: Send + Sync {
    /// Cheap pre-check made before an entry is even built.
    fn enabled(&self, level: Level) -> bool;

    /// Final admission decision for a built entry. Sampling cores count here.
    fn check(&self, entry: &Entry) -> bool {
        self.enabled(entry.level)
    }

    /// Encodes and writes an admitted entry.
    ///
    /// # Errors
    /// Encoding or I/O errors from the output.
    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<(), Error>;

    /// Flushes buffered output.
    ///
    /// # Errors
    /// I/O errors from the output.
    fn sync(&self) -> Result<(), Error>;
}

/// Encoder, output, and the shared level threshold.
pub struct IoCore {
    encoder: Box<dyn Encoder>,
    output: Box<dyn Output>,
    level: LevelController,
}

impl IoCore {
    /// Core writing `encoder` output to `output` for records that pass `level`.
    #[must_use]
    pub fn new(
        encoder: impl Encoder + 'static,
        output: impl Output + 'static,
        level: LevelController,
    ) -> Self {
        Self::from_boxed(Box::new(encoder), Box::new(output), level)
    }

    /// Like [`IoCore::new`], for already boxed parts.
    #[must_use]
    pub fn from_boxed(
        encoder: Box<dyn Encoder>,
        output: Box<dyn Output>,
        level: LevelController,
    ) -> Self {
        Self {
            encoder,
            output,
            level,
        }
    }

    /// Threshold this core filters on.
    #[must_use]
    pub const fn level(&self) -> &LevelController {
        &self.level
    }
}

impl Core for IoCore {
    fn enabled(&self, level: Level) -> bool {
        self.level.enabled(level)
    }

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<(), Error> {
        let buf = self.encoder.encode(entry, fields)?;
        self.output.write(&buf)?;
        // Records that may precede a crash must not sit in a buffer
        if entry.level > Level::Error {
            self.output.flush()?;
        }
        Ok(())
    }

    fn sync(&self) -> Result<(), Error> {
        self.output.flush()
    }
}

/// Accepts everything, writes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopCore;

impl Core for NopCore {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn write(&self, _entry: &Entry, _fields: &[Field]) -> Result<(), Error> {
        Ok(())
    }

    fn sync(&self) -> Result<(), Error> {
        Ok(())
    }
}
