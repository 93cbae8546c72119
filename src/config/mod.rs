//! Config file loading.
//!
//! YAML is the primary format; files ending in `.toml` are decoded with the TOML
//! parser instead. Every field carries its own default so a partial document
//! still yields a usable config.

mod structs;

pub use structs::{RotationConfig, SamplingConfig};

use crate::error::{Error, ParseError};
use crate::internal;
use crate::level::Level;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Encoding value that selects the JSON encoder. Any other value selects the console encoder.
pub const JSON_ENCODING: &str = "json";

/// Decoded logger configuration. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Severity label; unrecognized labels fall back to `info` when the pipeline is built.
    pub level: String,
    /// Console output with colored levels instead of rotating file output.
    pub development: bool,
    /// `json` or anything else for the line-oriented console format.
    pub encoding: String,
    /// Target of the rotating file output; ignored in development mode.
    pub output_path: String,
    /// Absent means every record that passes the level gate is written.
    pub sampling: Option<SamplingConfig>,
    /// File rotation limits; ignored in development mode.
    pub rotation: RotationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            development: false,
            encoding: "console".to_string(),
            output_path: "app.log".to_string(),
            sampling: None,
            rotation: RotationConfig::default(),
        }
    }
}

impl Config {
    /// Reads and decodes the file at `path`. No retry.
    ///
    /// # Errors
    /// `Error::Io` if the file can't be read, `Error::Parse` if its content doesn't decode.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        internal::debug("CONFIG", &format!("Loading {}", path.display()));

        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = if is_toml(path) {
            Self::from_toml_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };

        parsed.map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// # Errors
    /// Returns the decoder error when `content` isn't a valid config document.
    pub fn from_yaml_str(content: &str) -> Result<Self, ParseError> {
        // serde_yaml rejects an empty document; treat it as "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// # Errors
    /// Returns the decoder error when `content` isn't a valid config document.
    pub fn from_toml_str(content: &str) -> Result<Self, ParseError> {
        Ok(toml::from_str(content)?)
    }

    /// Parsed level, or `Info` when the label isn't recognized.
    #[must_use]
    pub fn parse_level(&self) -> Level {
        self.level.parse().unwrap_or(Level::Info)
    }

    /// Whether `encoding` selects the JSON encoder (case-insensitive).
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.encoding.eq_ignore_ascii_case(JSON_ENCODING)
    }

    /// Output path with a leading `~` expanded.
    #[must_use]
    pub fn resolved_output_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.output_path).as_ref())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Level: {}, Development: {}, OutputPath: {}",
            self.level, self.development, self.output_path
        )
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"))
}
