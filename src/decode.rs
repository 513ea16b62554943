//! Composable row decoders.
//!
//! A [`RowDecoder`] turns one result row into a typed value. Rows arrive
//! positionally on the wire and are re-keyed by column name before decoding,
//! so decoders address columns by name:
//!
//! ```
//! use turso_http::decode::{self, RowDecoder};
//!
//! #[derive(Debug, PartialEq)]
//! struct User {
//!     id: i64,
//!     name: String,
//!     nickname: Option<String>,
//! }
//!
//! let decoder: RowDecoder<User> = decode::map3(
//!     |id, name, nickname| User { id, name, nickname },
//!     decode::int("id"),
//!     decode::string("name"),
//!     decode::maybe(decode::string, "nickname"),
//! );
//!
//! let row = serde_json::json!({ "id": "7", "name": "Kit", "nickname": null });
//! let user = decoder.decode_json(&row).unwrap();
//! assert_eq!(user, User { id: 7, name: "Kit".into(), nickname: None });
//! ```
//!
//! Building decoders never touches a row; evaluation happens in
//! [`RowDecoder::decode`].

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

/// A result row keyed by column name.
pub type Row = serde_json::Map<String, JsonValue>;

/// Why a row could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("missing column '{0}'")]
    MissingColumn(String),
    #[error("column '{column}': {message}")]
    Field { column: String, message: String },
    #[error("{0}")]
    Failure(String),
}

type RowFn<T> = Arc<dyn Fn(&Row) -> Result<T, DecodeError> + Send + Sync>;
type CellFn<T> = Arc<dyn Fn(&JsonValue) -> Result<T, String> + Send + Sync>;

enum Kind<T> {
    /// Reads the whole row; not tied to one column.
    Row(RowFn<T>),
    /// Reads a single named column with a cell decoder.
    Field { name: String, decode: CellFn<T> },
}

/// Decoder from a name-keyed row to `T`.
pub struct RowDecoder<T> {
    kind: Kind<T>,
}

impl<T> Clone for RowDecoder<T> {
    fn clone(&self) -> Self {
        let kind = match &self.kind {
            Kind::Row(decode) => Kind::Row(Arc::clone(decode)),
            Kind::Field { name, decode } => Kind::Field {
                name: name.clone(),
                decode: Arc::clone(decode),
            },
        };
        Self { kind }
    }
}

impl<T> fmt::Debug for RowDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Row(_) => f.write_str("RowDecoder::Row"),
            Kind::Field { name, .. } => write!(f, "RowDecoder::Field({name:?})"),
        }
    }
}

impl<T: 'static> RowDecoder<T> {
    /// Builds a whole-row decoder from a function.
    pub fn from_fn<F>(decode: F) -> Self
    where
        F: Fn(&Row) -> Result<T, DecodeError> + Send + Sync + 'static,
    {
        Self {
            kind: Kind::Row(Arc::new(decode)),
        }
    }

    fn field<F>(name: &str, decode: F) -> Self
    where
        F: Fn(&JsonValue) -> Result<T, String> + Send + Sync + 'static,
    {
        Self {
            kind: Kind::Field {
                name: name.to_owned(),
                decode: Arc::new(decode),
            },
        }
    }

    /// Column this decoder is bound to, if it is a field decoder.
    pub fn column(&self) -> Option<&str> {
        match &self.kind {
            Kind::Row(_) => None,
            Kind::Field { name, .. } => Some(name),
        }
    }

    /// Runs the decoder against a row.
    pub fn decode(&self, row: &Row) -> Result<T, DecodeError> {
        match &self.kind {
            Kind::Row(decode) => decode(row),
            Kind::Field { name, decode } => {
                let value = row
                    .get(name)
                    .ok_or_else(|| DecodeError::MissingColumn(name.clone()))?;
                decode(value).map_err(|message| DecodeError::Field {
                    column: name.clone(),
                    message,
                })
            }
        }
    }

    /// Runs the decoder against a JSON object standing in for a row.
    pub fn decode_json(&self, value: &JsonValue) -> Result<T, DecodeError> {
        match value {
            JsonValue::Object(row) => self.decode(row),
            other => Err(DecodeError::Failure(format!(
                "expected a row object, got {other}"
            ))),
        }
    }

    /// Transforms the decoded value; a field decoder stays bound to its column.
    pub fn map<U, F>(self, f: F) -> RowDecoder<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        match self.kind {
            Kind::Row(decode) => RowDecoder::from_fn(move |row| decode(row).map(&f)),
            Kind::Field { name, decode } => {
                RowDecoder::field(&name, move |value| decode(value).map(&f))
            }
        }
    }

    /// Applies a fallible transform to the decoded value.
    ///
    /// On a field decoder the failure is reported against that column.
    pub fn try_map<U, F>(self, f: F) -> RowDecoder<U>
    where
        U: 'static,
        F: Fn(T) -> Result<U, String> + Send + Sync + 'static,
    {
        match self.kind {
            Kind::Row(decode) => RowDecoder::from_fn(move |row| {
                decode(row).and_then(|value| f(value).map_err(DecodeError::Failure))
            }),
            Kind::Field { name, decode } => {
                RowDecoder::field(&name, move |value| decode(value).and_then(&f))
            }
        }
    }

    /// Chains a decoder chosen from this decoder's result, run on the same row.
    pub fn and_then<U, F>(self, f: F) -> RowDecoder<U>
    where
        U: 'static,
        F: Fn(T) -> RowDecoder<U> + Send + Sync + 'static,
    {
        RowDecoder::from_fn(move |row| {
            let value = self.decode(row)?;
            f(value).decode(row)
        })
    }
}

/// Text column; numbers are not coerced.
pub fn string(name: &str) -> RowDecoder<String> {
    RowDecoder::field(name, |value| match value {
        JsonValue::String(text) => Ok(text.clone()),
        other => Err(format!("expected a string, got {other}")),
    })
}

/// Integer column; accepts a JSON integer or a numeric string.
pub fn int(name: &str) -> RowDecoder<i64> {
    RowDecoder::field(name, lenient_int)
}

/// Float column; accepts a JSON number or a finite numeric string.
pub fn float(name: &str) -> RowDecoder<f64> {
    RowDecoder::field(name, lenient_float)
}

/// Boolean column.
///
/// Only `1`, `0`, `"1"`, `"0"`, `"TRUE"` and `"FALSE"` are accepted.
pub fn bool(name: &str) -> RowDecoder<bool> {
    RowDecoder::field(name, |value| match value {
        JsonValue::Number(number) => match number.as_i64() {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            _ => Err(format!("expected 1 or 0, got {number}")),
        },
        JsonValue::String(text) => match text.as_str() {
            "1" | "TRUE" => Ok(true),
            "0" | "FALSE" => Ok(false),
            _ => Err(format!("expected \"1\", \"0\", \"TRUE\" or \"FALSE\", got {text:?}")),
        },
        other => Err(format!("expected a boolean encoding, got {other}")),
    })
}

/// Timestamp column stored as milliseconds since the Unix epoch.
pub fn posix(name: &str) -> RowDecoder<DateTime<Utc>> {
    RowDecoder::field(name, |value| {
        let millis = lenient_int(value)?;
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| format!("timestamp {millis} is out of range"))
    })
}

/// Raw cell value, untouched.
pub fn json(name: &str) -> RowDecoder<JsonValue> {
    RowDecoder::field(name, |value| Ok(value.clone()))
}

/// Column decoded by a caller-supplied cell function.
pub fn field<T, F>(name: &str, decode: F) -> RowDecoder<T>
where
    T: 'static,
    F: Fn(&JsonValue) -> Result<T, String> + Send + Sync + 'static,
{
    RowDecoder::field(name, decode)
}

/// Makes a column nullable: a JSON `null` decodes to `None`, anything else
/// must satisfy the inner decoder. A missing column still fails.
///
/// ```
/// use turso_http::decode;
///
/// let age = decode::maybe(decode::int, "age");
/// assert_eq!(age.decode_json(&serde_json::json!({ "age": null })), Ok(None));
/// assert_eq!(age.decode_json(&serde_json::json!({ "age": "41" })), Ok(Some(41)));
/// ```
pub fn maybe<T, B>(builder: B, name: &str) -> RowDecoder<Option<T>>
where
    T: 'static,
    B: FnOnce(&str) -> RowDecoder<T>,
{
    match builder(name).kind {
        Kind::Field { name, decode } => RowDecoder::field(&name, move |value| {
            if value.is_null() {
                Ok(None)
            } else {
                decode(value).map(Some)
            }
        }),
        Kind::Row(decode) => {
            let column = name.to_owned();
            RowDecoder::from_fn(move |row| match row.get(&column) {
                None => Err(DecodeError::MissingColumn(column.clone())),
                Some(JsonValue::Null) => Ok(None),
                Some(_) => decode(row).map(Some),
            })
        }
    }
}

/// Ignores the row and yields `value`.
pub fn succeed<T>(value: T) -> RowDecoder<T>
where
    T: Clone + Send + Sync + 'static,
{
    RowDecoder::from_fn(move |_| Ok(value.clone()))
}

/// Always fails with `message`.
pub fn fail<T: 'static>(message: impl Into<String>) -> RowDecoder<T> {
    let message = message.into();
    RowDecoder::from_fn(move |_| Err(DecodeError::Failure(message.clone())))
}

/// Function form of [`RowDecoder::and_then`].
pub fn and_then<T, U, F>(f: F, decoder: RowDecoder<T>) -> RowDecoder<U>
where
    T: 'static,
    U: 'static,
    F: Fn(T) -> RowDecoder<U> + Send + Sync + 'static,
{
    decoder.and_then(f)
}

/// Function form of [`RowDecoder::map`].
pub fn map<A, R, F>(f: F, a: RowDecoder<A>) -> RowDecoder<R>
where
    A: 'static,
    R: 'static,
    F: Fn(A) -> R + Send + Sync + 'static,
{
    a.map(f)
}

macro_rules! map_n {
    ($(#[$meta:meta])* $name:ident => $($arg:ident: $ty:ident),+) => {
        $(#[$meta])*
        pub fn $name<$($ty,)+ R, F>(f: F, $($arg: RowDecoder<$ty>),+) -> RowDecoder<R>
        where
            $($ty: 'static,)+
            R: 'static,
            F: Fn($($ty),+) -> R + Send + Sync + 'static,
        {
            RowDecoder::from_fn(move |row| {
                $(let $arg = $arg.decode(row)?;)+
                Ok(f($($arg),+))
            })
        }
    };
}

map_n!(
    /// Combines two decoders evaluated left to right on the same row.
    map2 => a: A, b: B
);
map_n!(map3 => a: A, b: B, c: C);
map_n!(map4 => a: A, b: B, c: C, d: D);
map_n!(map5 => a: A, b: B, c: C, d: D, e: E);
map_n!(map6 => a: A, b: B, c: C, d: D, e: E, g: G);
map_n!(map7 => a: A, b: B, c: C, d: D, e: E, g: G, h: H);
map_n!(map8 => a: A, b: B, c: C, d: D, e: E, g: G, h: H, i: I);

fn lenient_int(value: &JsonValue) -> Result<i64, String> {
    match value {
        JsonValue::Number(number) => number
            .as_i64()
            .ok_or_else(|| format!("expected an integer, got {number}")),
        JsonValue::String(text) => text
            .parse::<i64>()
            .map_err(|err| format!("invalid integer {text:?}: {err}")),
        other => Err(format!("expected an integer, got {other}")),
    }
}

fn lenient_float(value: &JsonValue) -> Result<f64, String> {
    match value {
        JsonValue::Number(number) => number
            .as_f64()
            .ok_or_else(|| format!("expected a float, got {number}")),
        JsonValue::String(text) => match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            Ok(_) => Err(format!("non-finite float {text:?}")),
            Err(err) => Err(format!("invalid float {text:?}: {err}")),
        },
        other => Err(format!("expected a float, got {other}")),
    }
}
