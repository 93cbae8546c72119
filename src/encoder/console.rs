//! Tab-separated lines for humans: time, level, caller, message, then the fields
//! as one JSON object. A stack trace, if any, follows on its own lines.

use super::{Encoder, EncoderConfig};
use crate::error::Error;
use crate::field::Field;
use crate::logcore::Entry;
use serde_json::{Map, Value};

/// Line-oriented encoder for terminals and plain-text files.
#[derive(Debug, Clone, Default)]
pub struct ConsoleEncoder {
    config: EncoderConfig,
}

impl ConsoleEncoder {
    /// Encoder rendering keys and levels as `config` describes.
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

impl Encoder for ConsoleEncoder {
    fn encode(&self, entry: &Entry, fields: &[Field]) -> Result<Vec<u8>, Error> {
        let mut columns: Vec<String> = Vec::with_capacity(5);
        columns.extend(self.config.time(entry));
        columns.extend(self.config.level(entry));
        columns.extend(self.config.caller(entry));
        if !self.config.message_key.is_empty() {
            columns.push(entry.message.clone());
        }

        if !fields.is_empty() {
            let context: Map<String, Value> = fields
                .iter()
                .map(|f| (f.key.to_string(), f.value.clone()))
                .collect();
            let rendered = serde_json::to_string(&context)
                .map_err(|e| Error::Format(format!("field serialization failed: {e}")))?;
            columns.push(rendered);
        }

        let mut line = columns.join("\t");
        if let Some(stack) = self.config.stack(entry) {
            line.push('\n');
            line.push_str(stack.trim_end());
        }
        line.push_str(&self.config.line_ending);
        Ok(line.into_bytes())
    }
}
