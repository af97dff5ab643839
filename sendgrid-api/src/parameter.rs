// sendgrid-api/src/parameter.rs
use serde::{Serialize, Serializer};

/// Optional request field that distinguishes "leave unchanged" from "clear".
///
/// Fields of this type are declared with
/// `#[serde(skip_serializing_if = "Parameter::is_unset")]`:
/// `Unset` is omitted from the payload, `Null` is sent as JSON `null` and
/// `Value` is sent as the wrapped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter<T> {
    Unset,
    Null,
    Value(T),
}

impl<T> Parameter<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Parameter::Unset)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Parameter::Null)
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Parameter::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Parameter<U> {
        match self {
            Parameter::Unset => Parameter::Unset,
            Parameter::Null => Parameter::Null,
            Parameter::Value(v) => Parameter::Value(f(v)),
        }
    }
}

impl<T> Default for Parameter<T> {
    fn default() -> Self {
        Parameter::Unset
    }
}

impl<T> From<T> for Parameter<T> {
    fn from(value: T) -> Self {
        Parameter::Value(value)
    }
}

impl<T> From<Option<T>> for Parameter<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Parameter::Value(v),
            None => Parameter::Null,
        }
    }
}

impl From<&str> for Parameter<String> {
    fn from(value: &str) -> Self {
        Parameter::Value(value.to_string())
    }
}

impl<T: Serialize> Serialize for Parameter<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Parameter::Value(v) => v.serialize(serializer),
            // Unset only reaches here when the field lacks skip_serializing_if
            Parameter::Unset | Parameter::Null => serializer.serialize_none(),
        }
    }
}
