//! Turning an entry plus its fields into bytes.
//!
//! Both encoders read the same [`EncoderConfig`]: which keys to emit, how to
//! render the level. Time is always ISO-8601 and callers are always shortened.

mod console;
mod json;

pub use console::ConsoleEncoder;
pub use json::JsonEncoder;

use crate::error::Error;
use crate::field::Field;
use crate::fmt::{Color, colorize, iso8601, short_caller};
use crate::level::Level;
use crate::logcore::Entry;

/// `Send + Sync` so one encoder instance serves all threads.
pub trait Encoder: Send + Sync {
    /// Renders one complete line, including the line ending.
    ///
    /// # Errors
    /// Serialization failures of field values.
    fn encode(&self, entry: &Entry, fields: &[Field]) -> Result<Vec<u8>, Error>;
}

impl<E: Encoder + ?Sized> Encoder for Box<E> {
    fn encode(&self, entry: &Entry, fields: &[Field]) -> Result<Vec<u8>, Error> {
        (**self).encode(entry, fields)
    }
}

/// How the level element is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelStyle {
    /// `info`
    #[default]
    Lowercase,
    /// `INFO`
    Capital,
    /// `INFO` wrapped in the level's ANSI color.
    CapitalColor,
}

impl LevelStyle {
    /// Label for `level` in this style.
    #[must_use]
    pub fn render(self, level: Level) -> String {
        match self {
            Self::Lowercase => level.as_str().to_string(),
            Self::Capital => level.as_capital_str().to_string(),
            Self::CapitalColor => colorize(level.as_capital_str(), Color::for_level(level)),
        }
    }
}

/// Key names and level rendering. An empty key omits that element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Key of the ISO-8601 timestamp.
    pub time_key: String,
    /// Key of the severity label.
    pub level_key: String,
    /// Key of the short call site.
    pub caller_key: String,
    /// Key of the message.
    pub message_key: String,
    /// Key of the stack trace, present only on records that carry one.
    pub stacktrace_key: String,
    /// How level labels are rendered.
    pub level_style: LevelStyle,
    /// Appended after every record.
    pub line_ending: String,
}

impl EncoderConfig {
    /// Long, self-describing keys and plain lowercase levels.
    #[must_use]
    pub fn production() -> Self {
        Self {
            time_key: "ts".to_string(),
            level_key: "level".to_string(),
            caller_key: "caller".to_string(),
            message_key: "msg".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            level_style: LevelStyle::Lowercase,
            line_ending: "\n".to_string(),
        }
    }

    /// Single-letter keys and colorized capital levels.
    #[must_use]
    pub fn development() -> Self {
        Self {
            time_key: "T".to_string(),
            level_key: "L".to_string(),
            caller_key: "C".to_string(),
            message_key: "M".to_string(),
            stacktrace_key: "S".to_string(),
            level_style: LevelStyle::CapitalColor,
            line_ending: "\n".to_string(),
        }
    }

    /// Overrides the level rendering of a preset.
    #[must_use]
    pub const fn level_style(mut self, style: LevelStyle) -> Self {
        self.level_style = style;
        self
    }

    fn time(&self, entry: &Entry) -> Option<String> {
        (!self.time_key.is_empty()).then(|| iso8601(&entry.time))
    }

    fn level(&self, entry: &Entry) -> Option<String> {
        (!self.level_key.is_empty()).then(|| self.level_style.render(entry.level))
    }

    fn caller(&self, entry: &Entry) -> Option<String> {
        if self.caller_key.is_empty() {
            return None;
        }
        entry.caller.map(short_caller)
    }

    fn stack<'a>(&self, entry: &'a Entry) -> Option<&'a str> {
        if self.stacktrace_key.is_empty() {
            return None;
        }
        entry.stack.as_deref().filter(|s| !s.is_empty())
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::production()
    }
}
