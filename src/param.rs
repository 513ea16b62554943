use crate::wire;

/// SQL type tag sent alongside every encoded parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireType {
    Text,
    Integer,
    Float,
    Null,
}

/// One named statement parameter in its wire representation.
///
/// Every non-null value is held as a string; the [`WireType`] tells the engine
/// how to reinterpret it. Build these with the functions in [`crate::encode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    name: String,
    value: Option<String>,
    wire_type: WireType,
}

impl Param {
    pub(crate) fn new(name: impl Into<String>, value: String, wire_type: WireType) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            wire_type,
        }
    }

    pub(crate) fn null(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            wire_type: WireType::Null,
        }
    }

    /// Parameter name as given by the caller (placeholder prefix included, if any).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stringified wire value; `None` only for [`WireType::Null`].
    pub fn wire_value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    pub(crate) fn to_wire(&self) -> wire::Value {
        match (&self.value, self.wire_type) {
            (None, _) | (_, WireType::Null) => wire::Value::Null {},
            (Some(value), WireType::Integer) => wire::Value::Integer {
                value: value.clone(),
            },
            (Some(value), WireType::Float) => wire::Value::Float {
                value: value.clone(),
            },
            (Some(value), WireType::Text) => wire::Value::Text {
                value: value.clone(),
            },
        }
    }
}
