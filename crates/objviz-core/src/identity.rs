//! Identity-keyed map for live objects.

use std::collections::HashMap;

use crate::object::{ObjRef, ObjectId};

/// Map from object identity to `V`.
///
/// Each entry keeps a clone of its key's [`ObjRef`], so the address an entry is
/// keyed by cannot be freed and handed to a different object while the map is
/// alive.
pub struct IdentityMap<V> {
    entries: HashMap<ObjectId, (ObjRef, V)>,
}

impl<V: Clone> Clone for IdentityMap<V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<V> Default for IdentityMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> IdentityMap<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, obj: &ObjRef) -> Option<&V> {
        self.entries.get(&ObjectId::of(obj)).map(|(_, value)| value)
    }

    #[inline]
    pub fn contains(&self, obj: &ObjRef) -> bool {
        self.entries.contains_key(&ObjectId::of(obj))
    }

    /// Insert `value` for `obj`, returning the previous value if any.
    pub fn insert(&mut self, obj: &ObjRef, value: V) -> Option<V> {
        self.entries
            .insert(ObjectId::of(obj), (obj.clone(), value))
            .map(|(_, old)| old)
    }

    /// Return the value for `obj`, computing it from the current length on first sight.
    pub fn get_or_insert_with(&mut self, obj: &ObjRef, f: impl FnOnce(usize) -> V) -> &V {
        let len = self.entries.len();
        let (_, value) = self
            .entries
            .entry(ObjectId::of(obj))
            .or_insert_with(|| (obj.clone(), f(len)));
        value
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
