//! Collection adapters over remote ordered/keyed sets sharing a path prefix.
//!
//! Element paths are `<base>[<index>]` for positional access and
//! `<base>["<key>"]` for keyed access. Only `len`/`iter` talk to the bridge.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use log::trace;

use crate::{AccessorPath, BridgeError, ObjectHandle, RemoteStruct};

pub struct Collection<T> {
    handle: ObjectHandle,
    _element: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            _element: PhantomData,
        }
    }
}

impl<T: RemoteStruct> Collection<T> {
    pub fn new(handle: ObjectHandle) -> Self {
        Self {
            handle,
            _element: PhantomData,
        }
    }

    pub fn handle(&self) -> &ObjectHandle {
        &self.handle
    }

    pub fn path(&self) -> &AccessorPath {
        self.handle.path()
    }

    /// One bridge round-trip.
    pub fn len(&self) -> Result<usize, BridgeError> {
        trace!("len {}", self.path());
        self.handle.bridge().collection_len(self.path())
    }

    pub fn is_empty(&self) -> Result<bool, BridgeError> {
        Ok(self.len()? == 0)
    }

    /// Element at `index`. Bounds are not checked locally.
    pub fn get(&self, index: usize) -> T {
        T::from_handle(self.handle.at(self.path().index(index)))
    }

    /// Element addressed by name.
    pub fn by_key(&self, key: &str) -> T {
        T::from_handle(self.handle.at(self.path().key(key)))
    }

    /// Fetches the length once, then yields elements `0..len`.
    pub fn iter(&self) -> Result<CollectionIter<T>, BridgeError> {
        let len = self.len()?;
        Ok(CollectionIter {
            collection: self.clone(),
            next: 0,
            len,
        })
    }

    pub fn to_vec(&self) -> Result<Vec<T>, BridgeError> {
        Ok(self.iter()?.collect())
    }
}

impl<T: RemoteStruct> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Collection<{}>({})", T::TYPE_NAME, self.path())
    }
}

impl<T> fmt::Display for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.handle.path(), f)
    }
}

pub struct CollectionIter<T> {
    collection: Collection<T>,
    next: usize,
    len: usize,
}

impl<T: RemoteStruct> Iterator for CollectionIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.next >= self.len {
            return None;
        }
        let item = self.collection.get(self.next);
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl<T: RemoteStruct> ExactSizeIterator for CollectionIter<T> {}

/// A collection whose remote type also defines collection-level operations.
/// The operations type `O` is bound at the collection's base path and is
/// reachable through `Deref`.
pub struct SpecializedCollection<O, T> {
    ops: O,
    items: Collection<T>,
}

impl<O: Clone, T> Clone for SpecializedCollection<O, T> {
    fn clone(&self) -> Self {
        Self {
            ops: self.ops.clone(),
            items: self.items.clone(),
        }
    }
}

impl<O: RemoteStruct, T: RemoteStruct> SpecializedCollection<O, T> {
    pub fn new(handle: ObjectHandle) -> Self {
        Self {
            ops: O::from_handle(handle.clone()),
            items: Collection::new(handle),
        }
    }

    pub fn ops(&self) -> &O {
        &self.ops
    }

    pub fn items(&self) -> &Collection<T> {
        &self.items
    }

    pub fn path(&self) -> &AccessorPath {
        self.items.path()
    }

    pub fn len(&self) -> Result<usize, BridgeError> {
        self.items.len()
    }

    pub fn is_empty(&self) -> Result<bool, BridgeError> {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> T {
        self.items.get(index)
    }

    pub fn by_key(&self, key: &str) -> T {
        self.items.by_key(key)
    }

    pub fn iter(&self) -> Result<CollectionIter<T>, BridgeError> {
        self.items.iter()
    }

    pub fn to_vec(&self) -> Result<Vec<T>, BridgeError> {
        self.items.to_vec()
    }
}

impl<O, T> Deref for SpecializedCollection<O, T> {
    type Target = O;

    fn deref(&self) -> &O {
        &self.ops
    }
}

impl<O: RemoteStruct, T: RemoteStruct> fmt::Debug for SpecializedCollection<O, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}<{}>({})",
            O::TYPE_NAME,
            T::TYPE_NAME,
            self.items.path()
        )
    }
}

impl<O, T> fmt::Display for SpecializedCollection<O, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.items, f)
    }
}
