//! Config to logger, one independently-defaulted stage at a time.
//!
//! A `Pipeline` is the fully-resolved composition (encoder, writer, level gate,
//! optional sampling) before it is sealed into a [`Logger`]. Building one never
//! fails: a stage that can't honor its config field falls back to a default.

use super::Logger;
use crate::config::{Config, SamplingConfig};
use crate::encoder::{ConsoleEncoder, Encoder, EncoderConfig, JsonEncoder};
use crate::internal;
use crate::level::LevelController;
use crate::logcore::{Core, IoCore, Sampler};
use crate::output::{ConsoleOutput, Output, RotatingFile, RotationPolicy};
use std::fmt;
use std::time::Duration;

/// Sampling window length.
pub const SAMPLING_TICK: Duration = Duration::from_secs(1);

/// Where encoded records go.
pub enum Writer {
    /// Unbuffered standard output, used in development.
    Stdout(ConsoleOutput),
    /// Size-rotated file at the configured output path.
    File(RotatingFile),
}

impl Writer {
    /// Rotation parameters, when writing to a file.
    #[must_use]
    pub const fn rotation(&self) -> Option<&RotationPolicy> {
        match self {
            Self::Stdout(_) => None,
            Self::File(file) => Some(file.policy()),
        }
    }

    /// Whether records go to standard output.
    #[must_use]
    pub const fn is_stdout(&self) -> bool {
        matches!(self, Self::Stdout(_))
    }

    fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Stdout(out) => Box::new(out),
            Self::File(file) => Box::new(file),
        }
    }
}

impl fmt::Display for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout(_) => f.write_str("stdout"),
            Self::File(file) => write!(f, "{}", file.policy().filename.display()),
        }
    }
}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout(out) => f.debug_tuple("Stdout").field(out).finish(),
            Self::File(file) => f.debug_tuple("File").field(file.policy()).finish(),
        }
    }
}

/// Output format chosen by the `encoding` config key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// One JSON object per record.
    Json,
    /// Tab-separated columns.
    Console,
}

/// Resolved but not yet sealed logger stages.
pub struct Pipeline {
    encoding: Encoding,
    encoder_config: EncoderConfig,
    writer: Writer,
    level: LevelController,
    sampling: Option<SamplingConfig>,
}

impl Pipeline {
    /// Resolves every stage from `config`. The level label is applied to `level`,
    /// which the resulting core keeps for runtime adjustment.
    #[must_use]
    pub fn from_config(config: &Config, level: LevelController) -> Self {
        let applied = level.set_level(&config.level);
        if applied.as_str() != config.level.trim().to_lowercase() {
            internal::debug(
                "PIPELINE",
                &format!("Level {:?} resolved to {applied}", config.level),
            );
        }

        let (encoding, encoder_config) = Self::select_encoder(config);
        let writer = Self::select_writer(config);
        internal::debug(
            "PIPELINE",
            &format!("Encoding: {encoding:?}, writer: {writer}"),
        );

        Self {
            encoding,
            encoder_config,
            writer,
            level,
            sampling: config.sampling,
        }
    }

    fn select_encoder(config: &Config) -> (Encoding, EncoderConfig) {
        let encoder_config = if config.development {
            EncoderConfig::development()
        } else {
            EncoderConfig::production()
        };
        let encoding = if config.is_json() {
            Encoding::Json
        } else {
            Encoding::Console
        };
        (encoding, encoder_config)
    }

    fn select_writer(config: &Config) -> Writer {
        if config.development {
            return Writer::Stdout(ConsoleOutput::stdout());
        }
        let rotation = config.rotation;
        let policy = RotationPolicy::new(config.resolved_output_path())
            .max_size(rotation.max_size)
            .max_backups(rotation.max_backups)
            .max_age(rotation.max_age)
            .compress(rotation.compress);
        Writer::File(RotatingFile::new(policy))
    }

    /// Encoder family selected by the config.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Key set and level style, from the `development` flag.
    #[must_use]
    pub const fn encoder_config(&self) -> &EncoderConfig {
        &self.encoder_config
    }

    /// Sink records will be written to.
    #[must_use]
    pub const fn writer(&self) -> &Writer {
        &self.writer
    }

    /// Threshold shared with the logger this pipeline seals into.
    #[must_use]
    pub const fn level(&self) -> &LevelController {
        &self.level
    }

    /// Sampling policy, if the config sets one.
    #[must_use]
    pub const fn sampling(&self) -> Option<SamplingConfig> {
        self.sampling
    }

    /// Replaces the writer, keeping every other stage.
    #[must_use]
    pub fn into_logger_with_output(self, output: impl Output + 'static) -> Logger {
        let Self {
            encoding,
            encoder_config,
            level,
            sampling,
            ..
        } = self;
        seal(encoding, encoder_config, level, sampling, Box::new(output))
    }

    /// Seals the stages into a logger: encoder and writer behind the level gate,
    /// wrapped in a sampler when configured, with caller capture and error stack traces.
    #[must_use]
    pub fn into_logger(self) -> Logger {
        let Self {
            encoding,
            encoder_config,
            writer,
            level,
            sampling,
        } = self;
        seal(encoding, encoder_config, level, sampling, writer.into_output())
    }
}

fn seal(
    encoding: Encoding,
    encoder_config: EncoderConfig,
    level: LevelController,
    sampling: Option<SamplingConfig>,
    output: Box<dyn Output>,
) -> Logger {
    let encoder: Box<dyn Encoder> = match encoding {
        Encoding::Json => Box::new(JsonEncoder::new(encoder_config)),
        Encoding::Console => Box::new(ConsoleEncoder::new(encoder_config)),
    };
    let core: Box<dyn Core> = Box::new(IoCore::from_boxed(encoder, output, level));

    let core: Box<dyn Core> = match sampling {
        Some(sampling) => Box::new(Sampler::new(
            core,
            SAMPLING_TICK,
            sampling.initial,
            sampling.thereafter,
        )),
        None => core,
    };

    Logger::from_boxed(core)
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("encoding", &self.encoding)
            .field("writer", &self.writer)
            .field("level", &self.level)
            .field("sampling", &self.sampling)
            .finish_non_exhaustive()
    }
}
