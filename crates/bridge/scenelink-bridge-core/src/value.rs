//! Value: what crosses the bridge in both directions.
//! Integers travel as i64 and floats as f64; typed accessors narrow them.

use serde::{Deserialize, Serialize};

use crate::AccessorPath;

/// Element kind of a fixed-size numeric/boolean array.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
}

/// Declared decode kind attached to every read and every call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueKind {
    Void,
    Bool,
    Int,
    Float,
    Text,
    NullableText,
    Array { item: ScalarKind, len: usize },
    Enum,
    EnumSet,
    Object,
    NullableObject,
}

impl ValueKind {
    /// Whether `value` satisfies this declared kind.
    ///
    /// Floats accept integers (the remote side may drop a trailing `.0`),
    /// nullable kinds accept `None`, and `Void` accepts anything since the
    /// result is discarded.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueKind::Void, _) => true,
            (ValueKind::Bool, Value::Bool(_)) => true,
            (ValueKind::Int, Value::Int(_)) => true,
            (ValueKind::Float, Value::Float(_) | Value::Int(_)) => true,
            (ValueKind::Text, Value::Text(_)) => true,
            (ValueKind::NullableText, Value::Text(_) | Value::None) => true,
            (ValueKind::Array { item, len }, v) => match (item, v) {
                (ScalarKind::Bool, Value::BoolArray(a)) => a.len() == *len,
                (ScalarKind::Int, Value::IntArray(a)) => a.len() == *len,
                (ScalarKind::Float, Value::FloatArray(a)) => a.len() == *len,
                (ScalarKind::Float, Value::IntArray(a)) => a.len() == *len,
                _ => false,
            },
            (ValueKind::Enum, Value::Enum(_)) => true,
            (ValueKind::EnumSet, Value::EnumSet(_)) => true,
            (ValueKind::Object, Value::Object(_)) => true,
            (ValueKind::NullableObject, Value::Object(_) | Value::None) => true,
            _ => false,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            ValueKind::Void | ValueKind::NullableText | ValueKind::NullableObject
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Value {
    /// Absent value / void result
    None,

    Bool(bool),

    Int(i64),

    Float(f64),

    Text(String),

    BoolArray(Vec<bool>),

    IntArray(Vec<i64>),

    FloatArray(Vec<f64>),

    /// Single enum token, e.g. "VERTICES"
    Enum(String),

    /// Enum flag set; tokens are kept sorted and unique
    EnumSet(Vec<String>),

    /// Reference to another remote object
    Object(AccessorPath),
}

impl Value {
    /// Return the kind of this concrete value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::None => ValueKind::Void,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::BoolArray(a) => ValueKind::Array {
                item: ScalarKind::Bool,
                len: a.len(),
            },
            Value::IntArray(a) => ValueKind::Array {
                item: ScalarKind::Int,
                len: a.len(),
            },
            Value::FloatArray(a) => ValueKind::Array {
                item: ScalarKind::Float,
                len: a.len(),
            },
            Value::Enum(_) => ValueKind::Enum,
            Value::EnumSet(_) => ValueKind::EnumSet,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Build an enum-set value, normalizing token order.
    pub fn enum_set<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        tokens.sort();
        tokens.dedup();
        Value::EnumSet(tokens)
    }

    /// Convenience constructors
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn object(path: AccessorPath) -> Self {
        Value::Object(path)
    }
}
