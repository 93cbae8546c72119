//! Rendering helpers shared by both encoders.

mod caller;
mod color;
mod time;

pub use caller::{full_caller, short_caller};
pub use color::{Color, colorize};
pub use time::iso8601;
