//! scenelink-bridge-core: accessor paths, values and the bridge contract
//! behind the generated typed bindings (engine-agnostic).
//!
//! Generated types are views: a bridge handle plus an [`AccessorPath`]. Every
//! property read, write and method call is forwarded as a single request
//! through [`Bridge`]; nothing is cached or validated locally.

pub mod access;
pub mod bridge;
pub mod collection;
pub mod decode;
pub mod json;
pub mod mock;
pub mod object;
pub mod options;
pub mod path;
pub mod request;
pub mod value;

pub use bridge::{Bridge, BridgeError};
pub use collection::{Collection, CollectionIter, SpecializedCollection};
pub use decode::{
    decode_enum, encode_enum, ArrayItem, DecodeError, EnumSet, FromValue, IntoValue, RemoteEnum,
};
pub use mock::MockBridge;
pub use object::{bind, ObjectHandle, RemoteStruct, SharedBridge};
pub use options::CallOptions;
pub use path::{AccessorPath, PathError, Segment};
pub use request::{Request, RequestLog};
pub use value::{ScalarKind, Value, ValueKind};
