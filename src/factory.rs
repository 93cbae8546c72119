//! One-time logger construction.
//!
//! A `LoggerFactory` runs load + build at most once. Concurrent callers block on
//! the `OnceLock` until the single initializer finishes and then all receive the
//! same handle; later calls are lock-free reads. If loading fails, a no-op logger
//! is cached instead and only the initializing caller sees the error.
//!
//! Most applications use the process-wide factory through [`get_logger`];
//! tests and embedders construct their own `LoggerFactory`.

use crate::config::Config;
use crate::error::Error;
use crate::field::Field;
use crate::internal;
use crate::level::LevelController;
use crate::logger::{Logger, Pipeline};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

static GLOBAL: OnceLock<LoggerFactory> = OnceLock::new();

/// The process-wide factory.
pub fn global() -> &'static LoggerFactory {
    GLOBAL.get_or_init(LoggerFactory::new)
}

/// Process-wide logger, built from `config_path` on the first call.
///
/// Once initialized, `config_path` is ignored.
///
/// # Errors
/// Only the first caller, and only when the config can't be loaded. The error
/// still carries the cached no-op logger.
pub fn get_logger(config_path: impl AsRef<Path>) -> Result<Logger, InitError> {
    global().get_logger(config_path)
}

/// Lifecycle of a factory's cached logger. `Ready` and `Degraded` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FactoryState {
    /// No caller has asked for a logger yet.
    Uninitialized = 0,
    /// One caller is loading and building; the rest wait.
    Initializing = 1,
    /// The configured logger is cached.
    Ready = 2,
    /// Loading failed; the cached logger discards everything.
    Degraded = 3,
}

impl FactoryState {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Initializing,
            2 => Self::Ready,
            3 => Self::Degraded,
            _ => Self::Uninitialized,
        }
    }
}

impl fmt::Display for FactoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::Degraded => "degraded",
        })
    }
}

/// Returned to the caller whose initialization attempt failed.
#[derive(Debug)]
pub struct InitError {
    logger: Logger,
    source: Error,
}

impl InitError {
    /// The no-op logger now cached by the factory.
    #[must_use]
    pub const fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Takes the no-op logger so the caller can keep logging.
    #[must_use]
    pub fn into_logger(self) -> Logger {
        self.logger
    }

    /// The load failure that caused the degraded state.
    #[must_use]
    pub const fn error(&self) -> &Error {
        &self.source
    }

    /// Splits into the cached no-op logger and the load error.
    #[must_use]
    pub fn into_parts(self) -> (Logger, Error) {
        (self.logger, self.source)
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "logger initialization failed: {}", self.source)
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Builds one logger from a config file and hands out clones of it.
pub struct LoggerFactory {
    level: LevelController,
    logger: OnceLock<Logger>,
    state: AtomicU8,
    builds: AtomicUsize,
}

impl Default for LoggerFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerFactory {
    /// Factory with its own threshold, initially `Info`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_level(LevelController::default())
    }

    /// Factory whose logger will filter through `level`.
    #[must_use]
    pub fn with_level(level: LevelController) -> Self {
        Self {
            level,
            logger: OnceLock::new(),
            state: AtomicU8::new(FactoryState::Uninitialized as u8),
            builds: AtomicUsize::new(0),
        }
    }

    /// Returns the cached logger, initializing it from `config_path` on the first call.
    ///
    /// # Errors
    /// Only the caller that performed initialization, and only when loading failed.
    pub fn get_logger(&self, config_path: impl AsRef<Path>) -> Result<Logger, InitError> {
        if let Some(logger) = self.logger.get() {
            return Ok(logger.clone());
        }

        let mut failure = None;
        let logger = self.logger.get_or_init(|| {
            self.set_state(FactoryState::Initializing);
            self.builds.fetch_add(1, Ordering::AcqRel);
            match self.initialize(config_path.as_ref()) {
                Ok(logger) => {
                    self.set_state(FactoryState::Ready);
                    logger
                }
                Err(e) => {
                    internal::error("FACTORY", &format!("Error initializing logger: {e}"));
                    self.set_state(FactoryState::Degraded);
                    failure = Some(e);
                    Logger::nop()
                }
            }
        });

        match failure {
            Some(source) => Err(InitError {
                logger: logger.clone(),
                source,
            }),
            None => Ok(logger.clone()),
        }
    }

    fn initialize(&self, config_path: &Path) -> Result<Logger, Error> {
        let config = Config::load(config_path)?;
        internal::debug("FACTORY", &format!("Config: {config}"));

        let logger = Pipeline::from_config(&config, self.level.clone()).into_logger();
        logger.info(
            "Logger initialized",
            &[
                Field::string("level", config.level.as_str()),
                Field::bool("development", config.development),
                Field::string("output_path", config.output_path.as_str()),
            ],
        );
        Ok(logger)
    }

    fn set_state(&self, state: FactoryState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Where initialization stands. Readable at any time without blocking.
    #[must_use]
    pub fn state(&self) -> FactoryState {
        FactoryState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// The cached logger, without triggering initialization.
    #[must_use]
    pub fn logger(&self) -> Option<&Logger> {
        self.logger.get()
    }

    /// Runtime threshold of the logger this factory builds.
    #[must_use]
    pub const fn level(&self) -> &LevelController {
        &self.level
    }

    /// How many times the load + build sequence has run. At most 1.
    #[must_use]
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Acquire)
    }
}

impl fmt::Debug for LoggerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerFactory")
            .field("state", &self.state())
            .field("level", &self.level)
            .field("builds", &self.build_count())
            .finish_non_exhaustive()
    }
}
