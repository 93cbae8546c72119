//! Key/value context attached to a record.

use serde_json::Value;
use std::borrow::Cow;

/// One structured field. Values are stored as JSON so both encoders render them the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Name the value is stored under.
    pub key: Cow<'static, str>,
    /// Value, rendered as JSON by both encoders.
    pub value: Value,
}

impl Field {
    /// Field from any value convertible to JSON.
    #[must_use]
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// String-valued field.
    #[must_use]
    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self::new(key, value.into())
    }

    /// Boolean field.
    #[must_use]
    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, value)
    }

    /// Integer field.
    #[must_use]
    pub fn int(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::new(key, value)
    }

    /// Renders the error with `Display`, under the conventional `error` key.
    #[must_use]
    pub fn error(err: &dyn std::error::Error) -> Self {
        Self::new("error", err.to_string())
    }
}

/// Shorthand for [`Field::new`].
#[must_use]
pub fn field(key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Field {
    Field::new(key, value)
}
