//! Sparse-indexed dense component storage and type-erased access.
//!
//! One [`ComponentStorage<T>`] exists per registered component type. Values
//! are kept in a dense array for cache-friendly iteration, with a parallel
//! entity array and a sparse `index → dense slot` map for O(1) lookup.
//! Removal is O(1) via swap-pop; dense order is not stable and carries no
//! meaning.
//!
//! ## Type erasure
//!
//! The world owns its storages behind `Box<dyn ErasedStorage>` so it can
//! hold a heterogeneous set of component types. [`ErasedStorage`] exposes
//! the untyped operations structural code needs (insert a boxed value, drop
//! an entity's instance, presence checks) plus `as_any` downcasting hooks
//! for the typed fast paths. Typed access succeeds only when the requested
//! type matches the storage's real element type; mismatches surface as
//! structured errors, never panics.
//!
//! ## Invariants
//! - `dense`, `entities`, and `sparse` always describe the same set: for
//!   every dense slot `i`, `sparse[entities[i].index()] == i`.
//! - At most one value per entity; insert overwrites in place.
//! - Lookups validate the stored handle's generation, so stale handles read
//!   as absent rather than aliasing a recycled slot.

use std::any::{Any, TypeId, type_name};

use ahash::AHashMap;

use crate::engine::entity::Entity;
use crate::engine::error::{ECSError, ECSResult};
use crate::engine::types::EntityIndex;

/// Dense storage for all instances of one component type.
pub struct ComponentStorage<T> {
    dense: Vec<T>,
    entities: Vec<Entity>,
    sparse: AHashMap<EntityIndex, usize>,
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self {
            dense: Vec::new(),
            entities: Vec::new(),
            sparse: AHashMap::new(),
        }
    }
}

impl<T> ComponentStorage<T> {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` for `entity`, returning the previous value if the
    /// entity already had one.
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        if let Some(&slot) = self.sparse.get(&entity.index()) {
            // Same slot index; a differing generation would mean a stale
            // instance survived a despawn, which cleanup rules out.
            debug_assert_eq!(self.entities[slot], entity);
            self.entities[slot] = entity;
            return Some(std::mem::replace(&mut self.dense[slot], value));
        }

        let slot = self.dense.len();
        self.dense.push(value);
        self.entities.push(entity);
        self.sparse.insert(entity.index(), slot);
        None
    }

    /// Removes and returns `entity`'s value. No-op returning `None` if the
    /// entity has no value here or the handle is stale.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.slot_of(entity)?;
        self.sparse.remove(&entity.index());
        let value = self.dense.swap_remove(slot);
        self.entities.swap_remove(slot);
        if slot < self.dense.len() {
            // Swap-pop moved the former tail into `slot`; repair its index.
            self.sparse.insert(self.entities[slot].index(), slot);
        }
        Some(value)
    }

    /// Returns a reference to `entity`'s value, if present.
    #[inline]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slot_of(entity).map(|slot| &self.dense[slot])
    }

    /// Returns a mutable reference to `entity`'s value, if present.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let slot = self.slot_of(entity)?;
        Some(&mut self.dense[slot])
    }

    /// Returns `true` if `entity` has a value in this storage.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.slot_of(entity).is_some()
    }

    /// Iterates over `(entity, value)` pairs.
    ///
    /// One finite pass reflecting storage state at call time; dense order,
    /// which is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    /// Iterates over `(entity, &mut value)` pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }

    /// The entities currently stored, in dense order.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of stored values.
    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns `true` if the storage holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    #[inline]
    fn slot_of(&self, entity: Entity) -> Option<usize> {
        let slot = *self.sparse.get(&entity.index())?;
        (self.entities[slot] == entity).then_some(slot)
    }
}

/// Dynamically-typed interface over a [`ComponentStorage<T>`].
///
/// Lets the world and the command flush operate on storages without knowing
/// the element type at compile time.
pub trait ErasedStorage {
    /// `TypeId` of the element type.
    fn element_type_id(&self) -> TypeId;

    /// Human-readable element type name.
    fn element_type_name(&self) -> &'static str;

    /// Number of stored values.
    fn len(&self) -> usize;

    /// Returns `true` if `entity` has a value in this storage.
    fn contains(&self, entity: Entity) -> bool;

    /// The entities currently stored, in dense order.
    fn entities(&self) -> &[Entity];

    /// Inserts a boxed value for `entity`.
    ///
    /// `value_name` is the dynamic type name of the boxed value, carried
    /// for diagnostics. Fails with [`ECSError::ComponentTypeMismatch`] if
    /// the box does not hold this storage's element type.
    fn insert_boxed(
        &mut self,
        entity: Entity,
        value: Box<dyn Any>,
        value_name: &'static str,
    ) -> ECSResult<()>;

    /// Drops `entity`'s value if present; returns whether one was dropped.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Upcast for typed downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> ErasedStorage for ComponentStorage<T> {
    fn element_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn element_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn entities(&self) -> &[Entity] {
        self.entities()
    }

    fn insert_boxed(
        &mut self,
        entity: Entity,
        value: Box<dyn Any>,
        value_name: &'static str,
    ) -> ECSResult<()> {
        match value.downcast::<T>() {
            Ok(value) => {
                self.insert(entity, *value);
                Ok(())
            }
            Err(_) => Err(ECSError::ComponentTypeMismatch {
                expected: type_name::<T>(),
                actual: value_name,
            }),
        }
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
