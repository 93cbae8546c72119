//! Nested config sections.

use serde::{Deserialize, Deserializer};

/// Rotation policy handed to the file output. Zero values mean "use the default":
/// 100 MiB for `max_size`, unlimited for `max_backups` and `max_age`. Negative
/// values are read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RotationConfig {
    /// Size in megabytes that triggers a rotation.
    #[serde(deserialize_with = "non_negative_u64")]
    pub max_size: u64,
    /// Rotated files to retain.
    #[serde(deserialize_with = "non_negative_usize")]
    pub max_backups: usize,
    /// Days to retain rotated files.
    #[serde(deserialize_with = "non_negative_u64")]
    pub max_age: u64,
    /// Gzip rotated files.
    pub compress: bool,
}

/// Per-second sampling. The first `initial` records with a given message pass,
/// then every `thereafter`-th one. Negative values are read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct SamplingConfig {
    /// Records per window that always pass.
    #[serde(deserialize_with = "non_negative_u64")]
    pub initial: u64,
    /// Pass every n-th record after `initial`. 0 drops them all.
    #[serde(deserialize_with = "non_negative_u64")]
    pub thereafter: u64,
}

fn non_negative_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = i64::deserialize(deserializer)?;
    Ok(u64::try_from(value).unwrap_or(0))
}

fn non_negative_usize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let value = non_negative_u64(deserializer)?;
    Ok(usize::try_from(value).unwrap_or(usize::MAX))
}
