//! Bridge requests as plain data, recorded by the mock bridge and handy for
//! asserting routing.
//!
//! Request serializes to JSON as:
//!   { "op": "get", "path": "obj.modifiers[0].width", "kind": { "kind": "float" } }
//!
//! RequestLog is a simple Vec<Request> with helpers.

use crate::{AccessorPath, CallOptions, Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Get {
        path: AccessorPath,
        kind: ValueKind,
    },
    Set {
        path: AccessorPath,
        value: Value,
    },
    Call {
        path: AccessorPath,
        options: CallOptions,
        returns: ValueKind,
    },
    Len {
        path: AccessorPath,
    },
}

impl Request {
    pub fn path(&self) -> &AccessorPath {
        match self {
            Request::Get { path, .. }
            | Request::Set { path, .. }
            | Request::Call { path, .. }
            | Request::Len { path } => path,
        }
    }

    pub fn op(&self) -> &'static str {
        match self {
            Request::Get { .. } => "get",
            Request::Set { .. } => "set",
            Request::Call { .. } => "call",
            Request::Len { .. } => "len",
        }
    }
}

/// Ordered record of requests, in the order the bridge received them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestLog(pub Vec<Request>);

impl RequestLog {
    pub fn new() -> Self {
        RequestLog(Vec::new())
    }

    pub fn push(&mut self, request: Request) {
        self.0.push(request);
    }

    pub fn into_vec(self) -> Vec<Request> {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Request> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Request> {
        self.0.last()
    }

    /// Rendered paths, one per request.
    pub fn paths(&self) -> Vec<String> {
        self.0.iter().map(|r| r.path().to_string()).collect()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Get { path, kind } => write!(f, "get {path} as {kind:?}"),
            Request::Set { path, value } => {
                let val = serde_json::to_string(value).map_err(|_| fmt::Error)?;
                write!(f, "set {path} = {val}")
            }
            Request::Call {
                path,
                options,
                returns,
            } => {
                let opts = serde_json::to_string(options).map_err(|_| fmt::Error)?;
                write!(f, "call {path}({opts}) -> {returns:?}")
            }
            Request::Len { path } => write!(f, "len {path}"),
        }
    }
}
