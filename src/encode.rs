//! Typed constructors for statement parameters.
//!
//! All encoders are total. Numbers, booleans and timestamps are stringified
//! before transmission because the pipeline protocol expects every non-null
//! scalar as a JSON string; the type tag carries the intended SQL type.
//!
//! ```
//! use turso_http::{encode, WireType};
//!
//! let id = encode::int("id", 1234);
//! assert_eq!(id.wire_value(), Some("1234"));
//! assert_eq!(id.wire_type(), WireType::Integer);
//! ```

use chrono::{DateTime, Utc};

use crate::{Param, WireType};

/// Text parameter, sent as-is.
pub fn text(name: impl Into<String>, value: impl Into<String>) -> Param {
    Param::new(name, value.into(), WireType::Text)
}

/// Integer parameter in decimal form.
pub fn int(name: impl Into<String>, value: i64) -> Param {
    Param::new(name, value.to_string(), WireType::Integer)
}

/// Encodes a float using its shortest round-tripping decimal form.
///
/// Non-finite values are passed through as `NaN`/`inf`; the engine decides
/// whether to accept them.
pub fn float(name: impl Into<String>, value: f64) -> Param {
    Param::new(name, value.to_string(), WireType::Float)
}

/// Booleans travel as `"1"`/`"0"` tagged `text`; there is no boolean wire type.
pub fn bool(name: impl Into<String>, value: bool) -> Param {
    let encoded = if value { "1" } else { "0" };
    Param::new(name, encoded.to_owned(), WireType::Text)
}

/// Milliseconds since the Unix epoch, tagged `integer`.
pub fn posix(name: impl Into<String>, value: DateTime<Utc>) -> Param {
    Param::new(name, value.timestamp_millis().to_string(), WireType::Integer)
}

/// Typed SQL `NULL`.
pub fn null(name: impl Into<String>) -> Param {
    Param::null(name)
}

/// Encodes `Some` with `encoder` and `None` as a typed null.
pub fn optional<V>(
    encoder: impl FnOnce(String, V) -> Param,
    name: impl Into<String>,
    value: Option<V>,
) -> Param {
    let name = name.into();
    match value {
        Some(value) => encoder(name, value),
        None => Param::null(name),
    }
}
