//! Conversions between bridge `Value`s and the Rust types generated accessors
//! expose. No range or domain checks happen here: a value that decodes is
//! returned as-is.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::{ScalarKind, Value, ValueKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("expected {expected:?}, got {actual:?}")]
    KindMismatch {
        expected: ValueKind,
        actual: ValueKind,
    },
    #[error("integer {value} does not fit in {target}")]
    IntOutOfRange { value: i64, target: &'static str },
    #[error("expected {expected} array items, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("unknown token '{token}' for enum {enum_name}")]
    UnknownToken {
        enum_name: &'static str,
        token: String,
    },
}

fn mismatch(expected: ValueKind, value: &Value) -> DecodeError {
    DecodeError::KindMismatch {
        expected,
        actual: value.kind(),
    }
}

/// Typed decode from a bridge value.
pub trait FromValue: Sized {
    const KIND: ValueKind;
    fn from_value(value: Value) -> Result<Self, DecodeError>;
}

/// Typed encode into a bridge value.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl FromValue for Value {
    const KIND: ValueKind = ValueKind::Void;
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        Ok(value)
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for bool {
    const KIND: ValueKind = ValueKind::Bool;
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for i32 {
    const KIND: ValueKind = ValueKind::Int;
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Int(i) => i32::try_from(i).map_err(|_| DecodeError::IntOutOfRange {
                value: i,
                target: "i32",
            }),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl FromValue for f32 {
    const KIND: ValueKind = ValueKind::Float;
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Float(f) => Ok(f as f32),
            Value::Int(i) => Ok(i as f32),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl FromValue for String {
    const KIND: ValueKind = ValueKind::Text;
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl FromValue for Option<String> {
    const KIND: ValueKind = ValueKind::NullableText;
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Text(s) => Ok(Some(s)),
            Value::None => Ok(None),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl IntoValue for Option<String> {
    fn into_value(self) -> Value {
        match self {
            Some(s) => Value::Text(s),
            None => Value::None,
        }
    }
}

/// Element types allowed in fixed-size arrays.
pub trait ArrayItem: Sized + Copy {
    const SCALAR: ScalarKind;
    fn pack(items: Vec<Self>) -> Value;
    fn unpack(value: Value, len: usize) -> Result<Vec<Self>, DecodeError>;
}

fn array_mismatch(item: ScalarKind, len: usize, value: &Value) -> DecodeError {
    mismatch(ValueKind::Array { item, len }, value)
}

impl ArrayItem for bool {
    const SCALAR: ScalarKind = ScalarKind::Bool;
    fn pack(items: Vec<Self>) -> Value {
        Value::BoolArray(items)
    }
    fn unpack(value: Value, len: usize) -> Result<Vec<Self>, DecodeError> {
        match value {
            Value::BoolArray(a) => Ok(a),
            other => Err(array_mismatch(Self::SCALAR, len, &other)),
        }
    }
}

impl ArrayItem for i32 {
    const SCALAR: ScalarKind = ScalarKind::Int;
    fn pack(items: Vec<Self>) -> Value {
        Value::IntArray(items.into_iter().map(i64::from).collect())
    }
    fn unpack(value: Value, len: usize) -> Result<Vec<Self>, DecodeError> {
        match value {
            Value::IntArray(a) => a
                .into_iter()
                .map(|i| {
                    i32::try_from(i).map_err(|_| DecodeError::IntOutOfRange {
                        value: i,
                        target: "i32",
                    })
                })
                .collect(),
            other => Err(array_mismatch(Self::SCALAR, len, &other)),
        }
    }
}

impl ArrayItem for f32 {
    const SCALAR: ScalarKind = ScalarKind::Float;
    fn pack(items: Vec<Self>) -> Value {
        Value::FloatArray(items.into_iter().map(f64::from).collect())
    }
    fn unpack(value: Value, len: usize) -> Result<Vec<Self>, DecodeError> {
        match value {
            Value::FloatArray(a) => Ok(a.into_iter().map(|f| f as f32).collect()),
            Value::IntArray(a) => Ok(a.into_iter().map(|i| i as f32).collect()),
            other => Err(array_mismatch(Self::SCALAR, len, &other)),
        }
    }
}

impl<T: ArrayItem, const N: usize> FromValue for [T; N] {
    const KIND: ValueKind = ValueKind::Array {
        item: T::SCALAR,
        len: N,
    };
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        let items = T::unpack(value, N)?;
        let actual = items.len();
        items
            .try_into()
            .map_err(|_| DecodeError::LengthMismatch {
                expected: N,
                actual,
            })
    }
}

impl<T: ArrayItem, const N: usize> IntoValue for [T; N] {
    fn into_value(self) -> Value {
        T::pack(self.to_vec())
    }
}

/// A generated remote enum: a closed set of string tokens.
pub trait RemoteEnum: Sized + Copy + Ord + 'static {
    /// Remote enum name, used in diagnostics.
    const NAME: &'static str;
    /// Every variant, in declaration order.
    const ALL: &'static [Self];
    fn token(&self) -> &'static str;
    fn from_token(token: &str) -> Option<Self>;
}

pub fn decode_enum<E: RemoteEnum>(value: Value) -> Result<E, DecodeError> {
    match value {
        Value::Enum(token) => token_to_enum(token),
        other => Err(mismatch(ValueKind::Enum, &other)),
    }
}

fn token_to_enum<E: RemoteEnum>(token: String) -> Result<E, DecodeError> {
    E::from_token(&token).ok_or(DecodeError::UnknownToken {
        enum_name: E::NAME,
        token,
    })
}

pub fn encode_enum<E: RemoteEnum>(value: E) -> Value {
    Value::Enum(value.token().to_string())
}

/// Set of flags from one remote enum.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumSet<E: RemoteEnum>(BTreeSet<E>);

impl<E: RemoteEnum> Default for EnumSet<E> {
    fn default() -> Self {
        Self(BTreeSet::new())
    }
}

impl<E: RemoteEnum> EnumSet<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, flag: E) -> bool {
        self.0.insert(flag)
    }

    pub fn remove(&mut self, flag: &E) -> bool {
        self.0.remove(flag)
    }

    pub fn contains(&self, flag: &E) -> bool {
        self.0.contains(flag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.0.iter()
    }

    pub fn into_value(self) -> Value {
        Value::enum_set(self.0.iter().map(|e| e.token()))
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::EnumSet(tokens) => tokens
                .into_iter()
                .map(token_to_enum)
                .collect::<Result<BTreeSet<E>, _>>()
                .map(Self),
            other => Err(mismatch(ValueKind::EnumSet, &other)),
        }
    }
}

impl<E: RemoteEnum> FromIterator<E> for EnumSet<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<E: RemoteEnum> IntoIterator for EnumSet<E> {
    type Item = E;
    type IntoIter = std::collections::btree_set::IntoIter<E>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum Axis {
        X,
        Y,
    }

    impl RemoteEnum for Axis {
        const NAME: &'static str = "Axis";
        const ALL: &'static [Self] = &[Axis::X, Axis::Y];
        fn token(&self) -> &'static str {
            match self {
                Axis::X => "X",
                Axis::Y => "Y",
            }
        }
        fn from_token(token: &str) -> Option<Self> {
            match token {
                "X" => Some(Axis::X),
                "Y" => Some(Axis::Y),
                _ => None,
            }
        }
    }

    #[test]
    fn scalars_decode() {
        assert!(bool::from_value(Value::Bool(true)).unwrap());
        assert_eq!(i32::from_value(Value::Int(-4)).unwrap(), -4);
        assert_eq!(f32::from_value(Value::Int(2)).unwrap(), 2.0);
        assert_eq!(
            Option::<String>::from_value(Value::None).unwrap(),
            None::<String>
        );
        assert!(matches!(
            i32::from_value(Value::Int(i64::MAX)),
            Err(DecodeError::IntOutOfRange { .. })
        ));
        assert!(matches!(
            bool::from_value(Value::Int(1)),
            Err(DecodeError::KindMismatch { .. })
        ));
    }

    #[test]
    fn arrays_check_length() {
        let v = Value::FloatArray(vec![1.0, 2.0, 3.0]);
        let arr: [f32; 3] = FromValue::from_value(v.clone()).unwrap();
        assert_eq!(arr, [1.0, 2.0, 3.0]);
        let short: Result<[f32; 4], _> = FromValue::from_value(v);
        assert_eq!(
            short,
            Err(DecodeError::LengthMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!([1i32, 2].into_value(), Value::IntArray(vec![1, 2]));
    }

    #[test]
    fn enums_and_sets() {
        assert_eq!(decode_enum::<Axis>(Value::Enum("Y".into())), Ok(Axis::Y));
        assert!(matches!(
            decode_enum::<Axis>(Value::Enum("Z".into())),
            Err(DecodeError::UnknownToken { enum_name: "Axis", .. })
        ));
        assert_eq!(encode_enum(Axis::X), Value::Enum("X".into()));

        let set: EnumSet<Axis> = [Axis::Y, Axis::X].into_iter().collect();
        let value = set.clone().into_value();
        assert_eq!(value, Value::EnumSet(vec!["X".into(), "Y".into()]));
        assert_eq!(EnumSet::<Axis>::from_value(value).unwrap(), set);
    }
}
