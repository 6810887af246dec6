//! Entity handles and the generational entity registry.
//!
//! An [`Entity`] is a packed `(index, generation)` handle. The registry
//! recycles slot indices after despawn and increments the slot's generation
//! on reuse, so handles held across a despawn are detected as stale instead
//! of silently aliasing whichever entity inherits the slot.
//!
//! The registry also tracks each live entity's component [`Signature`]; the
//! signature is the single source of truth for which storages hold data for
//! the entity, and every structural mutation updates it in the same step.
//!
//! ## Invariants
//! * A handle is valid iff `generations[index] == handle.generation` and
//!   the slot is marked alive.
//! * Freed slots are reused lowest-index-first, keeping iteration order
//!   stable across spawn/despawn churn.
//! * `signatures[index]` is [`Signature::EMPTY`] for every dead slot.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use crate::engine::error::{ECSError, ECSResult};
use crate::engine::types::{
    EntityID, EntityIndex, Generation, ComponentID, Signature, INDEX_BITS, INDEX_CAP, INDEX_MASK,
};

/// Opaque handle naming a game object.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Entity(pub EntityID);

#[inline]
const fn make_id(index: EntityIndex, generation: Generation) -> EntityID {
    ((generation as EntityID) << INDEX_BITS) | (index as EntityID)
}

#[inline]
fn make_entity(index: EntityIndex, generation: Generation) -> Entity {
    debug_assert!((index as EntityID) <= INDEX_MASK);
    Entity(make_id(index, generation))
}

impl Entity {
    /// Returns the slot index named by this handle.
    #[inline]
    pub fn index(self) -> EntityIndex {
        (self.0 & INDEX_MASK) as EntityIndex
    }

    /// Returns the generation this handle was issued with.
    #[inline]
    pub fn generation(self) -> Generation {
        (self.0 >> INDEX_BITS) as Generation
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

/// Allocates, recycles, and validates entity slots.
///
/// Owns per-slot generations, liveness flags, and component signatures.
/// Component values live in the per-type storages; the registry only knows
/// *which* types an entity has.
#[derive(Default)]
pub struct Entities {
    generations: Vec<Generation>,
    alive: Vec<bool>,
    signatures: Vec<Signature>,
    free: BinaryHeap<Reverse<EntityIndex>>,
    live_count: usize,
}

impl Entities {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with room for `capacity` entities preallocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            generations: Vec::with_capacity(capacity),
            alive: Vec::with_capacity(capacity),
            signatures: Vec::with_capacity(capacity),
            free: BinaryHeap::with_capacity(capacity),
            live_count: 0,
        }
    }

    /// Allocates a fresh entity.
    ///
    /// Reuses the lowest-index free slot if any exists, otherwise extends
    /// the registry. The returned handle carries the slot's current
    /// generation. No component storage is touched.
    pub fn spawn(&mut self) -> Entity {
        let index = match self.free.pop() {
            Some(Reverse(index)) => index,
            None => {
                let index = self.generations.len() as EntityIndex;
                assert!(index <= INDEX_CAP, "entity index space exhausted");
                self.generations.push(0);
                self.alive.push(false);
                self.signatures.push(Signature::EMPTY);
                index
            }
        };

        let slot = index as usize;
        self.alive[slot] = true;
        self.signatures[slot] = Signature::EMPTY;
        self.live_count += 1;
        make_entity(index, self.generations[slot])
    }

    /// Removes an entity, invalidating its handle.
    ///
    /// Returns the signature the entity held at despawn time so the caller
    /// can drop the matching component instances; the registry itself never
    /// touches storages. The slot's generation is incremented and the slot
    /// returned to the free list.
    pub fn despawn(&mut self, entity: Entity) -> ECSResult<Signature> {
        let slot = self.checked_slot(entity)?;
        let signature = self.signatures[slot];
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.alive[slot] = false;
        self.signatures[slot] = Signature::EMPTY;
        self.free.push(Reverse(entity.index()));
        self.live_count -= 1;
        Ok(signature)
    }

    /// Returns `true` if `entity` is a live, current handle. O(1).
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        let slot = entity.index() as usize;
        slot < self.generations.len()
            && self.alive[slot]
            && self.generations[slot] == entity.generation()
    }

    /// Returns the set of component types currently attached to `entity`.
    pub fn signature_of(&self, entity: Entity) -> ECSResult<Signature> {
        let slot = self.checked_slot(entity)?;
        Ok(self.signatures[slot])
    }

    /// Records that `entity` gained component `component_id`.
    pub fn set_component(&mut self, entity: Entity, component_id: ComponentID) -> ECSResult<()> {
        let slot = self.checked_slot(entity)?;
        self.signatures[slot].set(component_id);
        Ok(())
    }

    /// Records that `entity` lost component `component_id`.
    pub fn clear_component(&mut self, entity: Entity, component_id: ComponentID) -> ECSResult<()> {
        let slot = self.checked_slot(entity)?;
        self.signatures[slot].clear(component_id);
        Ok(())
    }

    /// Number of live entities.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.live_count
    }

    /// Iterates over all live entities in ascending index order.
    pub fn iter_live(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive.iter().enumerate().filter_map(|(slot, &alive)| {
            alive.then(|| make_entity(slot as EntityIndex, self.generations[slot]))
        })
    }

    #[inline]
    fn checked_slot(&self, entity: Entity) -> ECSResult<usize> {
        if self.is_alive(entity) {
            Ok(entity.index() as usize)
        } else {
            Err(ECSError::InvalidEntity { entity })
        }
    }
}
