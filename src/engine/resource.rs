//! Singleton resource storage.
//!
//! Resources are shared values independent of any entity: the map, the
//! camera, the RNG, the input-action queue, the render buffer. At most one
//! instance of each type is live at a time; systems access resources by
//! declared type rather than reaching for ambient globals.
//!
//! Insertion has replace semantics (the previous instance, if any, is
//! returned to the caller). Removal is explicit; everything left over drops
//! with the world at teardown.

use std::any::{Any, TypeId, type_name};

use ahash::AHashMap;

struct ResourceEntry {
    name: &'static str,
    value: Box<dyn Any>,
}

/// Type-keyed store holding at most one value per resource type.
#[derive(Default)]
pub struct Resources {
    map: AHashMap<TypeId, ResourceEntry>,
}

impl Resources {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value`, replacing and returning any existing instance of
    /// type `T`.
    pub fn insert<T: 'static>(&mut self, value: T) -> Option<T> {
        self.map
            .insert(
                TypeId::of::<T>(),
                ResourceEntry { name: type_name::<T>(), value: Box::new(value) },
            )
            .and_then(|previous| previous.value.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Returns a reference to the `T` instance, if present.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value.downcast_ref::<T>())
    }

    /// Returns a mutable reference to the `T` instance, if present.
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|entry| entry.value.downcast_mut::<T>())
    }

    /// Removes and returns the `T` instance, if present.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|entry| entry.value.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Returns `true` if a `T` instance is present.
    pub fn contains<T: 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    /// Untyped presence check, used by the scheduler when resolving a
    /// system's declared resources.
    pub fn contains_type_id(&self, type_id: TypeId) -> bool {
        self.map.contains_key(&type_id)
    }

    /// Number of live resources.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Names of all live resources, for diagnostics.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.map.values().map(|entry| entry.name)
    }
}
