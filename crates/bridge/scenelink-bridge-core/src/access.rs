//! Typed forwarding helpers used by generated accessors.
//!
//! Every function here issues at most one bridge request, on the child path
//! `handle.path().attr(name)`, and performs no validation beyond decoding the
//! answer into the requested Rust type. Collection factories issue none.

use log::trace;

use crate::{
    decode::{decode_enum, encode_enum},
    AccessorPath, ArrayItem, BridgeError, CallOptions, Collection, DecodeError, EnumSet,
    FromValue, IntoValue, ObjectHandle, RemoteEnum, RemoteStruct, SpecializedCollection, Value,
    ValueKind,
};

fn decoded<T>(path: &AccessorPath, result: Result<T, DecodeError>) -> Result<T, BridgeError> {
    result.map_err(|source| BridgeError::Decode {
        path: path.clone(),
        source,
    })
}

/// Raw read: one `get` on the child path with an explicit kind.
pub fn get_value(
    handle: &ObjectHandle,
    name: &str,
    kind: ValueKind,
) -> Result<Value, BridgeError> {
    let path = handle.child(name);
    trace!("get {path} as {kind:?}");
    handle.bridge().get(&path, kind)
}

/// Raw write: one `set` on the child path.
pub fn set_value(handle: &ObjectHandle, name: &str, value: Value) -> Result<(), BridgeError> {
    let path = handle.child(name);
    trace!("set {path} = {value:?}");
    handle.bridge().set(&path, value)
}

/// Raw call: one `call` on the child path.
pub fn call_raw(
    handle: &ObjectHandle,
    name: &str,
    options: CallOptions,
    returns: ValueKind,
) -> Result<Value, BridgeError> {
    let path = handle.child(name);
    trace!("call {path}({} args) -> {returns:?}", options.len());
    handle.bridge().call(&path, options, returns)
}

pub fn get<T: FromValue>(handle: &ObjectHandle, name: &str) -> Result<T, BridgeError> {
    let value = get_value(handle, name, T::KIND)?;
    decoded(&handle.child(name), T::from_value(value))
}

pub fn set<V: IntoValue>(handle: &ObjectHandle, name: &str, value: V) -> Result<(), BridgeError> {
    set_value(handle, name, value.into_value())
}

/// Touch an attribute without decoding it (`Void` kind).
pub fn get_void(handle: &ObjectHandle, name: &str) -> Result<(), BridgeError> {
    get_value(handle, name, ValueKind::Void).map(|_| ())
}

pub fn get_bool(handle: &ObjectHandle, name: &str) -> Result<bool, BridgeError> {
    get(handle, name)
}

pub fn set_bool(handle: &ObjectHandle, name: &str, value: bool) -> Result<(), BridgeError> {
    set(handle, name, value)
}

pub fn get_int(handle: &ObjectHandle, name: &str) -> Result<i32, BridgeError> {
    get(handle, name)
}

pub fn set_int(handle: &ObjectHandle, name: &str, value: i32) -> Result<(), BridgeError> {
    set(handle, name, value)
}

pub fn get_float(handle: &ObjectHandle, name: &str) -> Result<f32, BridgeError> {
    get(handle, name)
}

pub fn set_float(handle: &ObjectHandle, name: &str, value: f32) -> Result<(), BridgeError> {
    set(handle, name, value)
}

pub fn get_string(handle: &ObjectHandle, name: &str) -> Result<String, BridgeError> {
    get(handle, name)
}

pub fn set_string(handle: &ObjectHandle, name: &str, value: &str) -> Result<(), BridgeError> {
    set(handle, name, value)
}

pub fn get_string_opt(handle: &ObjectHandle, name: &str) -> Result<Option<String>, BridgeError> {
    get(handle, name)
}

pub fn set_string_opt(
    handle: &ObjectHandle,
    name: &str,
    value: Option<&str>,
) -> Result<(), BridgeError> {
    set(handle, name, value.map(str::to_string))
}

pub fn get_array<T: ArrayItem, const N: usize>(
    handle: &ObjectHandle,
    name: &str,
) -> Result<[T; N], BridgeError> {
    get(handle, name)
}

pub fn set_array<T: ArrayItem, const N: usize>(
    handle: &ObjectHandle,
    name: &str,
    value: [T; N],
) -> Result<(), BridgeError> {
    set(handle, name, value)
}

pub fn get_enum<E: RemoteEnum>(handle: &ObjectHandle, name: &str) -> Result<E, BridgeError> {
    let value = get_value(handle, name, ValueKind::Enum)?;
    decoded(&handle.child(name), decode_enum(value))
}

pub fn set_enum<E: RemoteEnum>(
    handle: &ObjectHandle,
    name: &str,
    value: E,
) -> Result<(), BridgeError> {
    set_value(handle, name, encode_enum(value))
}

pub fn get_enum_set<E: RemoteEnum>(
    handle: &ObjectHandle,
    name: &str,
) -> Result<EnumSet<E>, BridgeError> {
    let value = get_value(handle, name, ValueKind::EnumSet)?;
    decoded(&handle.child(name), EnumSet::from_value(value))
}

pub fn set_enum_set<E: RemoteEnum>(
    handle: &ObjectHandle,
    name: &str,
    value: &EnumSet<E>,
) -> Result<(), BridgeError> {
    set_value(handle, name, value.clone().into_value())
}

fn expect_object(path: &AccessorPath, value: Value) -> Result<Option<()>, BridgeError> {
    match value {
        Value::Object(_) => Ok(Some(())),
        Value::None => Ok(None),
        other => Err(BridgeError::Decode {
            path: path.clone(),
            source: DecodeError::KindMismatch {
                expected: ValueKind::Object,
                actual: other.kind(),
            },
        }),
    }
}

fn require_object(path: &AccessorPath, value: Value) -> Result<(), BridgeError> {
    match expect_object(path, value)? {
        Some(()) => Ok(()),
        None => Err(BridgeError::Decode {
            path: path.clone(),
            source: DecodeError::KindMismatch {
                expected: ValueKind::Object,
                actual: ValueKind::Void,
            },
        }),
    }
}

/// Nested object property. The instance is bound at the child path.
pub fn get_class<C: RemoteStruct>(handle: &ObjectHandle, name: &str) -> Result<C, BridgeError> {
    let path = handle.child(name);
    let value = get_value(handle, name, ValueKind::Object)?;
    require_object(&path, value)?;
    Ok(C::from_handle(handle.at(path)))
}

/// Nullable pointer property: `None` when the remote slot is empty.
pub fn get_class_opt<C: RemoteStruct>(
    handle: &ObjectHandle,
    name: &str,
) -> Result<Option<C>, BridgeError> {
    let path = handle.child(name);
    let value = get_value(handle, name, ValueKind::NullableObject)?;
    Ok(expect_object(&path, value)?.map(|()| C::from_handle(handle.at(path))))
}

pub fn set_class<C: RemoteStruct>(
    handle: &ObjectHandle,
    name: &str,
    value: &C,
) -> Result<(), BridgeError> {
    set_value(handle, name, Value::Object(value.path().clone()))
}

pub fn set_class_opt<C: RemoteStruct>(
    handle: &ObjectHandle,
    name: &str,
    value: Option<&C>,
) -> Result<(), BridgeError> {
    let value = value.map_or(Value::None, |c| Value::Object(c.path().clone()));
    set_value(handle, name, value)
}

/// Object reference as passed in call options.
pub fn encode_class<C: RemoteStruct>(value: C) -> Value {
    Value::Object(value.path().clone())
}

/// Plain indexable collection at the child path.
pub fn collection<T: RemoteStruct>(handle: &ObjectHandle, name: &str) -> Collection<T> {
    Collection::new(handle.at(handle.child(name)))
}

/// Collection with extra remote operations (`new`, `remove`, ...) bound at the
/// same base path.
pub fn specialized_collection<O: RemoteStruct, T: RemoteStruct>(
    handle: &ObjectHandle,
    name: &str,
) -> SpecializedCollection<O, T> {
    SpecializedCollection::new(handle.at(handle.child(name)))
}

pub fn call_void(
    handle: &ObjectHandle,
    name: &str,
    options: CallOptions,
) -> Result<(), BridgeError> {
    call_raw(handle, name, options, ValueKind::Void).map(|_| ())
}

/// Scalar or fixed-size array result.
pub fn call_value<T: FromValue>(
    handle: &ObjectHandle,
    name: &str,
    options: CallOptions,
) -> Result<T, BridgeError> {
    let value = call_raw(handle, name, options, T::KIND)?;
    decoded(&handle.child(name), T::from_value(value))
}

pub fn call_array<T: ArrayItem, const N: usize>(
    handle: &ObjectHandle,
    name: &str,
    options: CallOptions,
) -> Result<[T; N], BridgeError> {
    call_value(handle, name, options)
}

pub fn call_enum<E: RemoteEnum>(
    handle: &ObjectHandle,
    name: &str,
    options: CallOptions,
) -> Result<E, BridgeError> {
    let value = call_raw(handle, name, options, ValueKind::Enum)?;
    decoded(&handle.child(name), decode_enum(value))
}

/// Call returning a remote object. The returned view is bound at the call's
/// own path.
pub fn call_class<C: RemoteStruct>(
    handle: &ObjectHandle,
    name: &str,
    options: CallOptions,
) -> Result<C, BridgeError> {
    let path = handle.child(name);
    let value = call_raw(handle, name, options, ValueKind::Object)?;
    require_object(&path, value)?;
    Ok(C::from_handle(handle.at(path)))
}
