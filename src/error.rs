//! Unified error type for all sharedlog operations.

use std::fmt;
use std::path::PathBuf;

/// Error type for sharedlog operations.
#[derive(Debug)]
pub enum Error {
    /// The config file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file was read but its content does not decode into [`crate::Config`].
    Parse { path: PathBuf, source: ParseError },
    /// I/O error from an output while writing or rotating.
    Write(std::io::Error),
    /// Serialization or formatting error.
    Format(String),
}

/// Decoder-specific cause of [`Error::Parse`].
#[derive(Debug)]
pub enum ParseError {
    /// Invalid YAML document.
    Yaml(serde_yaml::Error),
    /// Invalid TOML document.
    Toml(toml::de::Error),
}

impl Error {
    /// Load failures (`Io`, `Parse`) are what put a factory into its degraded state.
    #[must_use]
    pub const fn is_load_failure(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Parse { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "error reading log config {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "error parsing log config {}: {source}", path.display())
            }
            Self::Write(e) => write!(f, "write error: {e}"),
            Self::Format(s) => write!(f, "format error: {s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } | Self::Write(source) => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Format(_) => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml(e) => write!(f, "yaml: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Yaml(e) => Some(e),
            Self::Toml(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Write(e)
    }
}

impl From<serde_yaml::Error> for ParseError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml(e)
    }
}

impl From<toml::de::Error> for ParseError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}
