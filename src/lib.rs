//! `sharedlog` - process-wide structured logger built once from a config file.
//!
//! The config picks the encoder (JSON or console), the writer (stdout in
//! development, a size-rotated file otherwise), the level threshold, and
//! optional per-second sampling. The first call to [`get_logger`] loads the file
//! and builds the logger; every later call, from any thread, gets the same
//! handle. A config that can't be loaded leaves the process with a no-op
//! logger instead of a crash.
//!
//! # Example
//!
//! ```no_run
//! use sharedlog::field;
//!
//! let logger = sharedlog::get_logger("config/logging.yaml").unwrap_or_else(|e| {
//!     eprintln!("{e}");
//!     e.into_logger()
//! });
//!
//! logger.info("server started", &[field("port", 8080)]);
//! sharedlog::global().level().set_level("debug");
//! logger.debug("now visible", &[]);
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `sharedlog` binary for checking configs and emitting records

pub mod config;
pub mod encoder;
mod error;
pub mod factory;
mod field;
pub mod fmt;
pub mod internal;
pub mod level;
pub mod logcore;
pub mod logger;
pub mod output;

pub use config::{Config, RotationConfig, SamplingConfig};
pub use error::{Error, ParseError};
pub use factory::{FactoryState, InitError, LoggerFactory, get_logger, global};
pub use field::{Field, field};
pub use level::{Level, LevelController, ParseLevelError};
pub use logger::{Logger, Pipeline, Writer};
pub use output::{ConsoleOutput, MemoryOutput, Output, RotatingFile, RotationPolicy};
