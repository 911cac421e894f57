//! Handles binding a bridge to a position in the remote object graph.

use std::fmt;
use std::sync::Arc;

use crate::{AccessorPath, Bridge};

/// Shared bridge reference carried by every handle.
pub type SharedBridge = Arc<dyn Bridge>;

/// A bridge plus the accessor path of one remote object. Holds no remote
/// state; cloning is cheap and two handles with equal paths are
/// interchangeable.
#[derive(Clone)]
pub struct ObjectHandle {
    bridge: SharedBridge,
    path: AccessorPath,
}

impl ObjectHandle {
    pub fn new(bridge: SharedBridge, path: AccessorPath) -> Self {
        Self { bridge, path }
    }

    pub fn bridge(&self) -> &SharedBridge {
        &self.bridge
    }

    pub fn path(&self) -> &AccessorPath {
        &self.path
    }

    /// Path of the named attribute below this object.
    pub fn child(&self, name: &str) -> AccessorPath {
        self.path.attr(name)
    }

    /// Handle on the same bridge at another path.
    pub fn at(&self, path: AccessorPath) -> ObjectHandle {
        ObjectHandle {
            bridge: Arc::clone(&self.bridge),
            path,
        }
    }

    /// Debug rendering shared by generated types: `TypeName(path)`.
    pub fn fmt_typed(&self, f: &mut fmt::Formatter<'_>, type_name: &str) -> fmt::Result {
        write!(f, "{type_name}({})", self.path)
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_typed(f, "ObjectHandle")
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.path, f)
    }
}

/// Implemented by every generated remote type.
pub trait RemoteStruct: Sized {
    /// Remote schema type name, e.g. "BevelModifier".
    const TYPE_NAME: &'static str;

    fn from_handle(handle: ObjectHandle) -> Self;

    fn handle(&self) -> &ObjectHandle;

    fn path(&self) -> &AccessorPath {
        self.handle().path()
    }

    fn bridge(&self) -> &SharedBridge {
        self.handle().bridge()
    }

    /// Reinterpret the same remote object as another type, e.g. a generic
    /// modifier as the bevel modifier it is known to be. Nothing is checked.
    fn cast<T: RemoteStruct>(&self) -> T {
        T::from_handle(self.handle().clone())
    }
}

/// Bind a typed view at `path`. Nothing is sent to the bridge.
pub fn bind<T: RemoteStruct>(bridge: &SharedBridge, path: AccessorPath) -> T {
    T::from_handle(ObjectHandle::new(Arc::clone(bridge), path))
}
