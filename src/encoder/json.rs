//! One JSON object per line.
//!
//! Keys are written in a fixed order (level, time, caller, message, stack trace,
//! then fields in call order) so the output is stable for line-oriented tools.

use super::{Encoder, EncoderConfig};
use crate::error::Error;
use crate::field::Field;
use crate::logcore::Entry;
use serde::Serialize;

/// Structured encoder for machine consumers.
#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    config: EncoderConfig,
}

impl JsonEncoder {
    /// Encoder writing the keys named in `config`.
    #[must_use]
    pub const fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Key set and level style in use.
    #[must_use]
    pub const fn config(&self) -> &EncoderConfig {
        &self.config
    }
}

struct ObjectWriter {
    buf: Vec<u8>,
    empty: bool,
}

impl ObjectWriter {
    fn new() -> Self {
        Self {
            buf: vec![b'{'],
            empty: true,
        }
    }

    fn entry<V: Serialize + ?Sized>(&mut self, key: &str, value: &V) -> Result<(), Error> {
        if !self.empty {
            self.buf.push(b',');
        }
        self.empty = false;
        serde_json::to_writer(&mut self.buf, key)
            .and_then(|()| {
                self.buf.push(b':');
                serde_json::to_writer(&mut self.buf, value)
            })
            .map_err(|e| Error::Format(format!("JSON serialization failed: {e}")))
    }

    fn finish(mut self, line_ending: &str) -> Vec<u8> {
        self.buf.push(b'}');
        self.buf.extend_from_slice(line_ending.as_bytes());
        self.buf
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, entry: &Entry, fields: &[Field]) -> Result<Vec<u8>, Error> {
        let cfg = &self.config;
        let mut obj = ObjectWriter::new();

        if let Some(level) = cfg.level(entry) {
            obj.entry(&cfg.level_key, &level)?;
        }
        if let Some(ts) = cfg.time(entry) {
            obj.entry(&cfg.time_key, &ts)?;
        }
        if let Some(caller) = cfg.caller(entry) {
            obj.entry(&cfg.caller_key, &caller)?;
        }
        if !cfg.message_key.is_empty() {
            obj.entry(&cfg.message_key, &entry.message)?;
        }
        if let Some(stack) = cfg.stack(entry) {
            obj.entry(&cfg.stacktrace_key, stack)?;
        }
        for field in fields {
            obj.entry(&field.key, &field.value)?;
        }

        Ok(obj.finish(&cfg.line_ending))
    }
}
