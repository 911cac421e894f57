//! The interop bridge contract.
//!
//! A bridge forwards one request per call to the interpreter running inside the
//! host application and returns its answer. Paths are opaque to the bridge
//! beyond their rendered form. Serializing concurrent callers, connection
//! handling and error translation all live behind this trait.

use thiserror::Error;

use crate::{AccessorPath, CallOptions, DecodeError, PathError, Value, ValueKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    #[error("no remote object at '{path}'")]
    InvalidPath { path: AccessorPath },
    #[error("type mismatch at '{path}': expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        path: AccessorPath,
        expected: ValueKind,
        actual: ValueKind,
    },
    #[error("cannot decode '{path}': {source}")]
    Decode {
        path: AccessorPath,
        #[source]
        source: DecodeError,
    },
    #[error("remote error at '{path}': {message}")]
    Remote { path: AccessorPath, message: String },
    #[error("bridge disconnected")]
    Disconnected,
    #[error(transparent)]
    Path(#[from] PathError),
}

impl BridgeError {
    pub fn remote(path: &AccessorPath, message: impl Into<String>) -> Self {
        BridgeError::Remote {
            path: path.clone(),
            message: message.into(),
        }
    }

    /// The path the failure refers to, when there is one.
    pub fn path(&self) -> Option<&AccessorPath> {
        match self {
            BridgeError::InvalidPath { path }
            | BridgeError::TypeMismatch { path, .. }
            | BridgeError::Decode { path, .. }
            | BridgeError::Remote { path, .. } => Some(path),
            BridgeError::Disconnected | BridgeError::Path(_) => None,
        }
    }
}

/// Request/response channel to the host interpreter.
pub trait Bridge: Send + Sync {
    /// Read the attribute at `path`, decoded as `kind`.
    fn get(&self, path: &AccessorPath, kind: ValueKind) -> Result<Value, BridgeError>;

    /// Write `value` to the attribute at `path`.
    fn set(&self, path: &AccessorPath, value: Value) -> Result<(), BridgeError>;

    /// Invoke the remote function at `path` with named `options`; the result is
    /// decoded as `returns`.
    fn call(
        &self,
        path: &AccessorPath,
        options: CallOptions,
        returns: ValueKind,
    ) -> Result<Value, BridgeError>;

    /// Number of elements in the remote collection at `path`.
    fn collection_len(&self, path: &AccessorPath) -> Result<usize, BridgeError>;
}
