//! In-memory echoing bridge.
//!
//! Stores whatever is written and answers reads from that store, recording
//! every request in order. It enforces declared kinds but no ranges or enum
//! membership, matching the contract of the real interpreter as seen from
//! this layer.

use std::sync::{Arc, Mutex, MutexGuard};

use hashbrown::HashMap;
use log::{debug, warn};

use crate::{
    json::{parse_scene, JsonError},
    AccessorPath, Bridge, BridgeError, CallOptions, Request, RequestLog, SharedBridge, Value,
    ValueKind,
};

type CallHandler = Arc<dyn Fn(&CallOptions) -> Result<Value, BridgeError> + Send + Sync>;

#[derive(Default)]
struct MockState {
    values: HashMap<AccessorPath, Value>,
    lengths: HashMap<AccessorPath, usize>,
    handlers: HashMap<AccessorPath, CallHandler>,
    log: RequestLog,
}

#[derive(Default)]
pub struct MockBridge {
    state: Mutex<MockState>,
}

impl MockBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mock preloaded from a scene document (see [`crate::json::parse_scene`]).
    pub fn from_scene_json(text: &str) -> Result<Self, JsonError> {
        let scene = parse_scene(text)?;
        let bridge = Self::new();
        {
            let mut state = bridge.lock();
            state.values.extend(scene.values);
            state.lengths.extend(scene.lengths);
        }
        Ok(bridge)
    }

    /// Wrap into the shared handle generated types expect.
    pub fn shared(self) -> Arc<MockBridge> {
        Arc::new(self)
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the requests recorded so far.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seed a value without recording a request.
    pub fn preset(&self, path: AccessorPath, value: Value) {
        self.lock().values.insert(path, value);
    }

    /// Last value stored at `path`, without recording a request.
    pub fn peek(&self, path: &AccessorPath) -> Option<Value> {
        self.lock().values.get(path).cloned()
    }

    pub fn set_len(&self, path: AccessorPath, len: usize) {
        self.lock().lengths.insert(path, len);
    }

    /// Answer calls on `path` with `handler`.
    pub fn on_call<F>(&self, path: AccessorPath, handler: F)
    where
        F: Fn(&CallOptions) -> Result<Value, BridgeError> + Send + Sync + 'static,
    {
        self.lock().handlers.insert(path, Arc::new(handler));
    }

    pub fn requests(&self) -> RequestLog {
        self.lock().log.clone()
    }

    /// Return and clear the recorded requests.
    pub fn take_requests(&self) -> RequestLog {
        std::mem::take(&mut self.lock().log)
    }
}

impl Bridge for MockBridge {
    fn get(&self, path: &AccessorPath, kind: ValueKind) -> Result<Value, BridgeError> {
        let mut state = self.lock();
        state.log.push(Request::Get {
            path: path.clone(),
            kind,
        });
        match state.values.get(path) {
            Some(value) if kind.accepts(value) => Ok(value.clone()),
            Some(value) => {
                warn!("mock get {path}: stored {:?}, requested {kind:?}", value.kind());
                Err(BridgeError::TypeMismatch {
                    path: path.clone(),
                    expected: kind,
                    actual: value.kind(),
                })
            }
            None => match kind {
                ValueKind::Object => Ok(Value::Object(path.clone())),
                ValueKind::NullableObject | ValueKind::NullableText => Ok(Value::None),
                _ => Err(BridgeError::InvalidPath { path: path.clone() }),
            },
        }
    }

    fn set(&self, path: &AccessorPath, value: Value) -> Result<(), BridgeError> {
        let mut state = self.lock();
        state.log.push(Request::Set {
            path: path.clone(),
            value: value.clone(),
        });
        state.values.insert(path.clone(), value);
        Ok(())
    }

    fn call(
        &self,
        path: &AccessorPath,
        options: CallOptions,
        returns: ValueKind,
    ) -> Result<Value, BridgeError> {
        let handler = {
            let mut state = self.lock();
            state.log.push(Request::Call {
                path: path.clone(),
                options: options.clone(),
                returns,
            });
            state.handlers.get(path).cloned()
        };
        // lock released: handlers may re-enter the mock
        if let Some(handler) = handler {
            debug!("mock call {path}: dispatching to handler");
            return handler(&options);
        }
        match returns {
            ValueKind::Void => Ok(Value::None),
            ValueKind::Object => Ok(Value::Object(path.clone())),
            _ => Err(BridgeError::remote(path, "no handler registered")),
        }
    }

    fn collection_len(&self, path: &AccessorPath) -> Result<usize, BridgeError> {
        let mut state = self.lock();
        state.log.push(Request::Len { path: path.clone() });
        state
            .lengths
            .get(path)
            .copied()
            .ok_or_else(|| BridgeError::InvalidPath { path: path.clone() })
    }
}

/// Shared mock plus the type-erased handle bindings are built from.
pub fn shared_mock(mock: MockBridge) -> (Arc<MockBridge>, SharedBridge) {
    let mock = mock.shared();
    let bridge: SharedBridge = mock.clone();
    (mock, bridge)
}
