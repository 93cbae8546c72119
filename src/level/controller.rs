//! Runtime-adjustable severity threshold shared between a factory and every core it builds.

use super::Level;
use crate::internal;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Clones share one threshold, so raising or lowering it through any clone
/// changes filtering for every logger built on it.
#[derive(Clone)]
pub struct LevelController {
    level: Arc<AtomicU8>,
}

impl Default for LevelController {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

impl LevelController {
    /// Controller starting at `level`, not shared with any other.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self {
            level: Arc::new(AtomicU8::new(level as u8)),
        }
    }

    /// Current threshold.
    #[must_use]
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Acquire))
    }

    /// Changes the threshold for every logger built on this controller.
    pub fn set(&self, level: Level) {
        self.level.store(level as u8, Ordering::Release);
    }

    /// Parses `label` and applies it. Unrecognized labels fall back to `Info`
    /// instead of failing. Returns the level actually applied.
    pub fn set_level(&self, label: &str) -> Level {
        let level = label.parse().unwrap_or_else(|e| {
            internal::debug("LEVEL", &format!("{e}, using info"));
            Level::Info
        });
        self.set(level);
        level
    }

    /// Whether a record at `level` passes the threshold.
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// True when both controllers share the same underlying threshold.
    #[must_use]
    pub fn shares_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.level, &other.level)
    }
}

impl fmt::Debug for LevelController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LevelController").field(&self.level()).finish()
    }
}

impl fmt::Display for LevelController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.level(), f)
    }
}
