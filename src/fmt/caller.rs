//! Call-site rendering.

use std::panic::Location;

/// Keeps only the parent directory and file name: `src/net/conn.rs:42` becomes `net/conn.rs:42`.
#[must_use]
pub fn short_caller(location: &Location<'_>) -> String {
    let file = location.file();
    let mut separators = file.rmatch_indices(['/', '\\']);
    let trimmed = match (separators.next(), separators.next()) {
        (Some(_), Some((idx, _))) => &file[idx + 1..],
        _ => file,
    };
    format!("{trimmed}:{}", location.line())
}

/// Full path and line, for callers that want an unambiguous location.
#[must_use]
pub fn full_caller(location: &Location<'_>) -> String {
    format!("{}:{}", location.file(), location.line())
}
