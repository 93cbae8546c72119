//! 24-bit ANSI colors for level labels.

use crate::level::Level;
use std::fmt;

/// RGB color for terminal escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl Color {
    /// Color from its RGB components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `\x1b[38;2;R;G;Bm` foreground escape.
    #[must_use]
    pub fn fg_ansi(self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }

    /// Terminates any active SGR styling.
    pub const RESET: &'static str = "\x1b[0m";

    /// Warn labels.
    #[must_use]
    pub const fn yellow() -> Self {
        Self::new(241, 250, 140)
    }

    /// Info labels.
    #[must_use]
    pub const fn cyan() -> Self {
        Self::new(139, 233, 253)
    }

    /// Error labels and everything above.
    #[must_use]
    pub const fn red() -> Self {
        Self::new(255, 85, 85)
    }

    /// Debug labels.
    #[must_use]
    pub const fn purple() -> Self {
        Self::new(189, 147, 249)
    }

    /// Palette used for colorized level labels.
    #[must_use]
    pub const fn for_level(level: Level) -> Self {
        match level {
            Level::Debug => Self::purple(),
            Level::Info => Self::cyan(),
            Level::Warn => Self::yellow(),
            Level::Error | Level::DPanic | Level::Panic | Level::Fatal => Self::red(),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Wraps `text` in the color's escape and a reset.
#[must_use]
pub fn colorize(text: &str, color: Color) -> String {
    let fg = color.fg_ansi();
    let reset = Color::RESET;
    format!("{fg}{text}{reset}")
}
