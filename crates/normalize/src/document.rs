//! The canonical document handle.
//!
//! A [`Document`] is a view over a [`SharedMap`]: an ordered `serde_json` map
//! behind `Arc<RwLock<..>>`. Wrapping a mapping never copies it, and every
//! clone of a document, as well as the `SharedMap` it was built from, observes
//! the same entries.
//!
//! ```rust
//! use normalize::{shared_map, Document};
//! use serde_json::{json, Map};
//!
//! let source = shared_map(Map::new());
//! let doc = Document::from_shared(source.clone());
//!
//! source.write().unwrap().insert("seq".into(), json!(7));
//! assert_eq!(doc.get("seq"), Some(json!(7)));
//! ```
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Ordered key/value storage shared between a caller and its documents.
pub type SharedMap = Arc<RwLock<Map<String, Value>>>;

/// Moves `map` into a fresh [`SharedMap`].
pub fn shared_map(map: Map<String, Value>) -> SharedMap {
    Arc::new(RwLock::new(map))
}

/// Canonical ordered-key document.
///
/// Cloning is cheap and produces another view of the same entries; use
/// [`Document::snapshot`] for an owned copy.
#[derive(Clone)]
pub struct Document {
    inner: SharedMap,
}

impl Document {
    /// Wraps an existing shared map without copying it.
    pub fn from_shared(map: SharedMap) -> Self {
        Self { inner: map }
    }

    /// Takes ownership of `map`.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self::from_shared(shared_map(map))
    }

    /// The shared storage backing this document.
    pub fn shared(&self) -> &SharedMap {
        &self.inner
    }

    pub fn into_shared(self) -> SharedMap {
        self.inner
    }

    /// Read access to the entries. A poisoned lock is recovered, since entries
    /// are plain values with no invariants a panicking writer could break.
    pub fn read(&self) -> RwLockReadGuard<'_, Map<String, Value>> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write access to the entries; visible through every alias.
    pub fn write(&self) -> RwLockWriteGuard<'_, Map<String, Value>> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Inserts an entry, returning the previous value for `key`.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.write().insert(key.into(), value.into())
    }

    /// Removes an entry while keeping the order of the remaining keys.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.write().shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Keys in document order.
    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Owned copy of the current entries.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.read().clone()
    }

    /// Current entries as a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.snapshot())
    }

    /// True when both documents are views of the same storage.
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        *self.read() == *other.read()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Document").field(&*self.read()).finish()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.read().serialize(serializer)
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Document::from_map(map)
    }
}
