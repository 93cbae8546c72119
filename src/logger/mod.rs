//! The handle applications log through.
//!
//! A `Logger` is a cheap, cloneable reference to one shared core. Clones and
//! children created with [`Logger::with`] write through the same core, so the
//! process keeps a single ordered sink.

mod pipeline;

pub use pipeline::{Encoding, Pipeline, SAMPLING_TICK, Writer};

use crate::field::Field;
use crate::internal;
use crate::level::Level;
use crate::logcore::{Core, Entry, NopCore};
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

struct Shared {
    core: Box<dyn Core>,
    add_caller: bool,
    stacktrace_level: Option<Level>,
    /// Write failures go to the internal channel unless this logger *is* that channel.
    report_errors: bool,
    nop: bool,
}

/// Cloneable handle to one shared logging core.
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
    fields: Arc<[Field]>,
}

impl Logger {
    /// Logger over `core` with caller capture on and stack traces for `Error` and above.
    #[must_use]
    pub fn new(core: impl Core + 'static) -> Self {
        Self::from_boxed(Box::new(core))
    }

    /// Like [`Logger::new`], for a core that is already boxed.
    #[must_use]
    pub fn from_boxed(core: Box<dyn Core>) -> Self {
        Self::from_parts(core, true, Some(Level::Error), true, false)
    }

    fn from_parts(
        core: Box<dyn Core>,
        add_caller: bool,
        stacktrace_level: Option<Level>,
        report_errors: bool,
        nop: bool,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                core,
                add_caller,
                stacktrace_level,
                report_errors,
                nop,
            }),
            fields: Arc::from(Vec::new()),
        }
    }

    /// Accepts every call and discards every record.
    #[must_use]
    pub fn nop() -> Self {
        Self::from_parts(Box::new(NopCore), false, None, false, true)
    }

    /// Disables caller capture.
    #[must_use]
    pub fn without_caller(self) -> Self {
        self.rebuild(|s| s.add_caller = false)
    }

    /// Stack traces for records at `level` and above, or never with `None`.
    #[must_use]
    pub fn stacktrace_at(self, level: Option<Level>) -> Self {
        self.rebuild(|s| s.stacktrace_level = level)
    }

    pub(crate) fn quiet(self) -> Self {
        self.rebuild(|s| s.report_errors = false)
    }

    /// Option setters run at construction time, before the handle is shared.
    fn rebuild(self, apply: impl FnOnce(&mut Shared)) -> Self {
        match Arc::try_unwrap(self.shared) {
            Ok(mut shared) => {
                apply(&mut shared);
                Self {
                    shared: Arc::new(shared),
                    fields: self.fields,
                }
            }
            Err(shared) => Self {
                shared,
                fields: self.fields,
            },
        }
    }

    /// Child logger that adds `fields` to every record. Shares this logger's core.
    #[must_use]
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Self {
        let merged: Vec<Field> = self.fields.iter().cloned().chain(fields).collect();
        Self {
            shared: Arc::clone(&self.shared),
            fields: Arc::from(merged),
        }
    }

    /// Whether a record at `level` would pass the level gate.
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        self.shared.core.enabled(level)
    }

    /// Core dispatch: level gate, admission check (sampling), then encode and write.
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, fields: &[Field]) {
        self.emit(level, msg, fields, Location::caller());
    }

    fn emit(&self, level: Level, msg: &str, fields: &[Field], caller: &'static Location<'static>) {
        let shared = &*self.shared;
        if !shared.core.enabled(level) {
            return;
        }

        let mut entry = Entry::new(level, msg);
        if !shared.core.check(&entry) {
            return;
        }
        if shared.add_caller {
            entry.caller = Some(caller);
        }
        if shared.stacktrace_level.is_some_and(|min| level >= min) {
            entry.stack = Some(Backtrace::force_capture().to_string());
        }

        let result = if self.fields.is_empty() {
            shared.core.write(&entry, fields)
        } else {
            let all: Vec<Field> = self.fields.iter().chain(fields).cloned().collect();
            shared.core.write(&entry, &all)
        };

        if let Err(e) = result
            && shared.report_errors
        {
            internal::error("LOGGER", &format!("Failed to write record: {e}"));
        }
    }

    /// Records at debug level, with the call site.
    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Debug, msg, fields, Location::caller());
    }

    /// Records at info level, with the call site.
    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Info, msg, fields, Location::caller());
    }

    /// Records at warn level, with the call site.
    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Warn, msg, fields, Location::caller());
    }

    /// Records at error level, with the call site and a stack trace.
    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Error, msg, fields, Location::caller());
    }

    /// Logged like `error`. Never panics.
    #[track_caller]
    pub fn dpanic(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::DPanic, msg, fields, Location::caller());
    }

    /// Logs, then panics with `msg`.
    ///
    /// # Panics
    /// Always.
    #[track_caller]
    pub fn panic(&self, msg: &str, fields: &[Field]) -> ! {
        self.emit(Level::Panic, msg, fields, Location::caller());
        panic!("{msg}");
    }

    /// Logs, flushes, then exits the process with status 1.
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[Field]) -> ! {
        self.emit(Level::Fatal, msg, fields, Location::caller());
        if let Err(e) = self.sync()
            && self.shared.report_errors
        {
            internal::error("LOGGER", &format!("Failed to flush before exit: {e}"));
        }
        std::process::exit(1);
    }

    /// Flushes the underlying output.
    ///
    /// # Errors
    /// I/O errors from the output.
    pub fn sync(&self) -> Result<(), crate::Error> {
        self.shared.core.sync()
    }

    /// Whether this is the discarding fallback logger.
    #[must_use]
    pub fn is_nop(&self) -> bool {
        self.shared.nop
    }

    /// True when both loggers write through the same core instance.
    #[must_use]
    pub fn same_handle(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Fields bound with [`Logger::with`].
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("nop", &self.shared.nop)
            .field("add_caller", &self.shared.add_caller)
            .field("stacktrace_level", &self.shared.stacktrace_level)
            .field("fields", &self.fields.len())
            .finish_non_exhaustive()
    }
}
