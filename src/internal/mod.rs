//! sharedlog's own diagnostics: config loading, level fallbacks, rotation, and
//! write failures that the public logger has to swallow.
//!
//! Output goes to stderr through the crate's own console pipeline. The threshold
//! comes from `SHAREDLOG_INTERNAL_LEVEL` (default `warn`) and is read once, on
//! first use.

use crate::encoder::{ConsoleEncoder, EncoderConfig, LevelStyle};
use crate::field::Field;
use crate::level::{Level, LevelController};
use crate::logcore::IoCore;
use crate::logger::Logger;
use crate::output::ConsoleOutput;
use std::sync::OnceLock;

/// Environment variable holding the internal threshold.
pub const LEVEL_ENV: &str = "SHAREDLOG_INTERNAL_LEVEL";

static INTERNAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Must not call back into this module: it runs inside the `OnceLock` initializer.
fn build_internal_logger() -> Logger {
    let level = std::env::var(LEVEL_ENV)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(Level::Warn);

    let config = EncoderConfig::production().level_style(LevelStyle::Capital);
    let core = IoCore::new(
        ConsoleEncoder::new(config),
        ConsoleOutput::stderr(),
        LevelController::new(level),
    );

    Logger::new(core)
        .without_caller()
        .stacktrace_at(None)
        .quiet()
}

fn logger() -> &'static Logger {
    INTERNAL_LOGGER.get_or_init(build_internal_logger)
}

fn log(level: Level, scope: &str, msg: &str) {
    let logger = logger();
    if logger.enabled(level) {
        logger.log(level, msg, &[Field::string("scope", scope)]);
    }
}

/// Library diagnostic at debug level, tagged with `scope`.
pub fn debug(scope: &str, msg: &str) {
    log(Level::Debug, scope, msg);
}

/// Library diagnostic at info level, tagged with `scope`.
pub fn info(scope: &str, msg: &str) {
    log(Level::Info, scope, msg);
}

/// Library diagnostic at warn level, tagged with `scope`.
pub fn warn(scope: &str, msg: &str) {
    log(Level::Warn, scope, msg);
}

/// Library diagnostic at error level, tagged with `scope`.
pub fn error(scope: &str, msg: &str) {
    log(Level::Error, scope, msg);
}
