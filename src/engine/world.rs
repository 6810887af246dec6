//! World state and orchestration.
//!
//! The [`World`] is the aggregate owning everything a running session
//! needs: the entity registry, one sparse-set storage per registered
//! component type, the component registry, the resource store, and the
//! deferred command buffer.
//!
//! ## Ownership model
//!
//! The world is an explicit value owned by the game loop and borrowed
//! mutably by the scheduler for the duration of a tick. Exactly one system
//! reads or writes it at a time, so data races are eliminated by
//! construction rather than by locking. The one ordering discipline this
//! buys is that structural mutation is never applied during iteration:
//! systems record spawns, despawns, and component changes into the command
//! buffer, and the scheduler flushes it at stage barriers.
//!
//! Direct structural calls (`despawn`, `insert`, `remove`,
//! `apply_deferred`) from inside a running system are detected in debug
//! builds and rejected with [`ECSError::IteratorInvalidation`]; in release
//! builds they are documented as forbidden. `spawn` is exempt: a freshly
//! allocated entity has no components and cannot appear in any already
//! evaluated query snapshot.
//!
//! ## Invariants
//! * For every live entity, its registry signature has bit `c` set iff the
//!   storage for `c` holds a value for it. Every structural path updates
//!   both sides or fails without partial effect.
//! * Dead slots have empty signatures and no storage entries.

use std::any::Any;

use log::{error, trace};

use crate::engine::commands::{Bundle, BundleEntry, Command, CommandBuffer};
use crate::engine::component::ComponentRegistry;
use crate::engine::entity::{Entities, Entity};
use crate::engine::error::{ECSError, ECSResult};
use crate::engine::query::{Query, QueryBuilder, QueryIter};
use crate::engine::resource::Resources;
use crate::engine::storage::{ComponentStorage, ErasedStorage};
use crate::engine::types::{ComponentID, Signature};

/// Construction-time knobs for a [`World`].
#[derive(Clone, Copy, Debug)]
pub struct WorldConfig {
    /// Entity slots to preallocate.
    pub entity_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { entity_capacity: 1024 }
    }
}

/// The aggregate ECS state for one game session.
pub struct World {
    entities: Entities,
    registry: ComponentRegistry,
    storages: Vec<Option<Box<dyn ErasedStorage>>>,
    resources: Resources,
    deferred: CommandBuffer,
    system_scope: bool,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world with default configuration.
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates an empty world with the given configuration.
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            entities: Entities::with_capacity(config.entity_capacity),
            registry: ComponentRegistry::new(),
            storages: Vec::new(),
            resources: Resources::new(),
            deferred: CommandBuffer::new(),
            system_scope: false,
        }
    }

    // ── component registration ──────────────────────────────────────────

    /// Registers component type `T`, creating its storage.
    ///
    /// Idempotent. Fails once the registry is frozen or full.
    pub fn register_component<T: 'static>(&mut self) -> ECSResult<ComponentID> {
        let component_id = self.registry.register::<T>()?;
        let slot = component_id as usize;
        if slot >= self.storages.len() {
            self.storages.resize_with(slot + 1, || None);
        }
        if self.storages[slot].is_none() {
            self.storages[slot] = Some(Box::new(ComponentStorage::<T>::new()));
        }
        Ok(component_id)
    }

    /// Freezes component registration, locking IDs for the session.
    pub fn freeze_components(&mut self) {
        self.registry.freeze();
    }

    /// Returns the ID registered for `T`.
    pub fn component_id_of<T: 'static>(&self) -> ECSResult<ComponentID> {
        self.registry.require_id_of::<T>()
    }

    /// The component registry, for diagnostics.
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    // ── entity lifecycle ────────────────────────────────────────────────

    /// Allocates a fresh, component-less entity.
    ///
    /// Reuses the lowest free slot index; the handle carries the slot's
    /// current generation.
    pub fn spawn(&mut self) -> Entity {
        self.entities.spawn()
    }

    /// Allocates an entity carrying all components of `bundle`.
    pub fn spawn_with(&mut self, bundle: Bundle) -> ECSResult<Entity> {
        self.structural_guard()?;
        let entity = self.entities.spawn();
        self.apply_bundle(entity, bundle)?;
        Ok(entity)
    }

    /// Removes `entity` and drops all of its component instances.
    ///
    /// Fails with [`ECSError::InvalidEntity`] on a stale or unknown
    /// handle; the caller should treat the entity as already gone.
    pub fn despawn(&mut self, entity: Entity) -> ECSResult<()> {
        self.structural_guard()?;
        self.despawn_now(entity)
    }

    /// O(1) liveness check.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// The set of component types currently attached to `entity`.
    pub fn signature_of(&self, entity: Entity) -> ECSResult<Signature> {
        self.entities.signature_of(entity)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.live_count()
    }

    // ── component access ────────────────────────────────────────────────

    /// Attaches `value` to `entity`, returning the previous value if the
    /// component was already present.
    pub fn insert<T: 'static>(&mut self, entity: Entity, value: T) -> ECSResult<Option<T>> {
        self.structural_guard()?;
        let component_id = self.registry.require_id_of::<T>()?;
        if !self.entities.is_alive(entity) {
            return Err(ECSError::InvalidEntity { entity });
        }
        let previous = self.typed_storage_mut::<T>(component_id)?.insert(entity, value);
        self.entities.set_component(entity, component_id)?;
        Ok(previous)
    }

    /// Detaches component `T` from `entity`, returning the value if it was
    /// present. Removing an absent component is a no-op.
    pub fn remove<T: 'static>(&mut self, entity: Entity) -> ECSResult<Option<T>> {
        self.structural_guard()?;
        let component_id = self.registry.require_id_of::<T>()?;
        if !self.entities.is_alive(entity) {
            return Err(ECSError::InvalidEntity { entity });
        }
        let removed = self.typed_storage_mut::<T>(component_id)?.remove(entity);
        self.entities.clear_component(entity, component_id)?;
        Ok(removed)
    }

    /// Reads `entity`'s `T` component, if present.
    pub fn get<T: 'static>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    /// Mutably borrows `entity`'s `T` component, if present.
    ///
    /// Value mutation is always safe during a tick; only *structural*
    /// changes must go through the command buffer.
    pub fn get_mut<T: 'static>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(entity)
    }

    /// The typed storage for `T`, if `T` is registered.
    pub fn storage<T: 'static>(&self) -> Option<&ComponentStorage<T>> {
        let component_id = self.registry.id_of::<T>()?;
        self.storages
            .get(component_id as usize)?
            .as_ref()?
            .as_any()
            .downcast_ref::<ComponentStorage<T>>()
    }

    /// The typed mutable storage for `T`, if `T` is registered.
    pub fn storage_mut<T: 'static>(&mut self) -> Option<&mut ComponentStorage<T>> {
        let component_id = self.registry.id_of::<T>()?;
        self.storages
            .get_mut(component_id as usize)?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
    }

    // ── queries ─────────────────────────────────────────────────────────

    /// Begins building a query against this world's registered components.
    pub fn query_builder(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(&self.registry)
    }

    /// Evaluates `query`, yielding matching entities in ascending index
    /// order.
    ///
    /// The result is a snapshot of the matched set as of this call.
    pub fn query(&self, query: &Query) -> QueryIter {
        QueryIter::new(self.matched_entities(query))
    }

    /// Runs `f` over every `(entity, &mut T)` matched by `query`.
    ///
    /// The closure also receives the command buffer so iteration bodies
    /// can request structural changes without mutating storage mid-pass.
    pub fn for_each<T: 'static, F>(&mut self, query: &Query, mut f: F) -> ECSResult<()>
    where
        F: FnMut(Entity, &mut T, &mut CommandBuffer),
    {
        let matched = self.matched_entities(query);
        let component_id = self.registry.require_id_of::<T>()?;
        let Self { storages, deferred, .. } = self;
        let storage = Self::downcast_slot::<T>(storages, component_id)?;
        for entity in matched {
            if let Some(value) = storage.get_mut(entity) {
                f(entity, value, deferred);
            }
        }
        Ok(())
    }

    /// Runs `f` over every `(entity, &mut A, &mut B)` matched by `query`.
    ///
    /// `A` and `B` must be distinct component types.
    pub fn for_each2<A: 'static, B: 'static, F>(&mut self, query: &Query, mut f: F) -> ECSResult<()>
    where
        F: FnMut(Entity, &mut A, &mut B, &mut CommandBuffer),
    {
        let matched = self.matched_entities(query);
        let id_a = self.registry.require_id_of::<A>()?;
        let id_b = self.registry.require_id_of::<B>()?;
        if id_a == id_b {
            return Err(ECSError::MalformedQuery { component: self.registry.name_of(id_a) });
        }

        let Self { storages, deferred, .. } = self;
        let (slot_a, slot_b) = Self::split_slot_pair(storages, id_a, id_b);
        let storage_a = Self::downcast_taken::<A>(slot_a)?;
        let storage_b = Self::downcast_taken::<B>(slot_b)?;
        for entity in matched {
            if let (Some(a), Some(b)) = (storage_a.get_mut(entity), storage_b.get_mut(entity)) {
                f(entity, a, b, deferred);
            }
        }
        Ok(())
    }

    // ── resources ───────────────────────────────────────────────────────

    /// Inserts a resource, replacing and returning any prior instance.
    pub fn insert_resource<T: 'static>(&mut self, value: T) -> Option<T> {
        self.resources.insert(value)
    }

    /// Reads the `T` resource, if present.
    pub fn resource<T: 'static>(&self) -> Option<&T> {
        self.resources.get::<T>()
    }

    /// Mutably borrows the `T` resource, if present.
    pub fn resource_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.resources.get_mut::<T>()
    }

    /// Reads the `T` resource, failing with
    /// [`ECSError::MissingResource`] if absent.
    pub fn require_resource<T: 'static>(&self) -> ECSResult<&T> {
        self.resources
            .get::<T>()
            .ok_or(ECSError::MissingResource { name: std::any::type_name::<T>() })
    }

    /// Mutably borrows the `T` resource, failing with
    /// [`ECSError::MissingResource`] if absent.
    pub fn require_resource_mut<T: 'static>(&mut self) -> ECSResult<&mut T> {
        self.resources
            .get_mut::<T>()
            .ok_or(ECSError::MissingResource { name: std::any::type_name::<T>() })
    }

    /// Removes and returns the `T` resource, if present.
    pub fn remove_resource<T: 'static>(&mut self) -> Option<T> {
        self.resources.remove::<T>()
    }

    /// The resource store, for untyped presence checks.
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    // ── deferred commands ───────────────────────────────────────────────

    /// Queues a structural command for the next flush.
    pub fn defer(&mut self, command: Command) {
        self.deferred.push(command);
    }

    /// The pending command buffer.
    pub fn commands(&mut self) -> &mut CommandBuffer {
        &mut self.deferred
    }

    /// Applies all queued commands in FIFO order, then clears the buffer.
    ///
    /// A despawn takes effect immediately within the flush; later commands
    /// in the same flush that target the despawned entity are trace-logged
    /// no-ops. Commands naming unregistered component IDs abort the flush
    /// with an error; that is a setup bug, not a runtime condition.
    pub fn apply_deferred(&mut self) -> ECSResult<()> {
        self.structural_guard()?;
        let commands = self.deferred.take();
        for command in commands {
            match command {
                Command::Spawn { bundle } => {
                    let entity = self.entities.spawn();
                    self.apply_bundle(entity, bundle)?;
                }
                Command::Despawn { entity } => {
                    if self.entities.is_alive(entity) {
                        self.despawn_now(entity)?;
                    } else {
                        trace!("flush: despawn of dead entity {entity} skipped");
                    }
                }
                Command::Add { entity, component_id, value_name, value } => {
                    if self.entities.is_alive(entity) {
                        self.insert_boxed(entity, component_id, value, value_name)?;
                    } else {
                        trace!("flush: add to dead entity {entity} skipped");
                    }
                }
                Command::Remove { entity, component_id } => {
                    if self.entities.is_alive(entity) {
                        self.erased_storage_mut(component_id)?.remove_entity(entity);
                        self.entities.clear_component(entity, component_id)?;
                    } else {
                        trace!("flush: remove on dead entity {entity} skipped");
                    }
                }
            }
        }
        Ok(())
    }

    // ── scheduler hooks ─────────────────────────────────────────────────

    /// Marks the world as executing a system; structural calls are
    /// rejected until [`end_system_scope`](Self::end_system_scope).
    pub(crate) fn begin_system_scope(&mut self) {
        self.system_scope = true;
    }

    /// Clears the in-system marker set by
    /// [`begin_system_scope`](Self::begin_system_scope).
    pub(crate) fn end_system_scope(&mut self) {
        self.system_scope = false;
    }

    // ── internals ───────────────────────────────────────────────────────

    fn matched_entities(&self, query: &Query) -> Vec<Entity> {
        let matches = |entity: Entity| {
            self.entities
                .signature_of(entity)
                .map(|signature| query.matches(&signature))
                .unwrap_or(false)
        };

        // Scan the smallest required storage; with no requirements, walk
        // the registry itself.
        let seed = query
            .required_ids()
            .iter()
            .filter_map(|&component_id| {
                self.storages.get(component_id as usize).and_then(Option::as_ref)
            })
            .min_by_key(|storage| storage.len());

        match seed {
            Some(storage) => storage
                .entities()
                .iter()
                .copied()
                .filter(|&entity| matches(entity))
                .collect(),
            None if query.required_ids().is_empty() => {
                self.entities.iter_live().filter(|&entity| matches(entity)).collect()
            }
            // A required component with no storage cannot match anything.
            None => Vec::new(),
        }
    }

    fn despawn_now(&mut self, entity: Entity) -> ECSResult<()> {
        let signature = self.entities.despawn(entity)?;
        for component_id in signature.iter_ids() {
            if let Some(storage) =
                self.storages.get_mut(component_id as usize).and_then(Option::as_mut)
            {
                storage.remove_entity(entity);
            }
        }
        Ok(())
    }

    fn apply_bundle(&mut self, entity: Entity, bundle: Bundle) -> ECSResult<()> {
        for BundleEntry { component_id, value_name, value } in bundle.into_entries() {
            self.insert_boxed(entity, component_id, value, value_name)?;
        }
        Ok(())
    }

    fn insert_boxed(
        &mut self,
        entity: Entity,
        component_id: ComponentID,
        value: Box<dyn Any>,
        value_name: &'static str,
    ) -> ECSResult<()> {
        self.erased_storage_mut(component_id)?.insert_boxed(entity, value, value_name)?;
        self.entities.set_component(entity, component_id)
    }

    fn erased_storage_mut(
        &mut self,
        component_id: ComponentID,
    ) -> ECSResult<&mut Box<dyn ErasedStorage>> {
        let name = self.registry.name_of(component_id);
        match self.storages.get_mut(component_id as usize).and_then(Option::as_mut) {
            Some(storage) => Ok(storage),
            None => {
                error!("flush references unregistered component id {component_id}");
                Err(ECSError::UnregisteredComponent { name })
            }
        }
    }

    fn typed_storage_mut<T: 'static>(
        &mut self,
        component_id: ComponentID,
    ) -> ECSResult<&mut ComponentStorage<T>> {
        Self::downcast_slot::<T>(&mut self.storages, component_id)
    }

    fn downcast_slot<'a, T: 'static>(
        storages: &'a mut [Option<Box<dyn ErasedStorage>>],
        component_id: ComponentID,
    ) -> ECSResult<&'a mut ComponentStorage<T>> {
        let slot = storages
            .get_mut(component_id as usize)
            .and_then(Option::as_mut)
            .ok_or(ECSError::UnregisteredComponent { name: std::any::type_name::<T>() })?;
        Self::downcast_taken::<T>(slot)
    }

    fn downcast_taken<'a, T: 'static>(
        slot: &'a mut Box<dyn ErasedStorage>,
    ) -> ECSResult<&'a mut ComponentStorage<T>> {
        let actual = slot.element_type_name();
        slot.as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
            .ok_or(ECSError::ComponentTypeMismatch {
                expected: std::any::type_name::<T>(),
                actual,
            })
    }

    /// Returns disjoint mutable references to two distinct storage slots.
    ///
    /// Relies on slice splitting to satisfy aliasing rules; panics if the
    /// IDs are equal (callers check first).
    fn split_slot_pair(
        storages: &mut [Option<Box<dyn ErasedStorage>>],
        id_a: ComponentID,
        id_b: ComponentID,
    ) -> (&mut Box<dyn ErasedStorage>, &mut Box<dyn ErasedStorage>) {
        assert!(id_a != id_b, "storage pair requires distinct components");
        let (low, high) = if id_a < id_b { (id_a, id_b) } else { (id_b, id_a) };
        let (head, tail) = storages.split_at_mut(high as usize);
        let low_slot = head[low as usize].as_mut().expect("registered storage");
        let high_slot = tail[0].as_mut().expect("registered storage");
        if id_a < id_b { (low_slot, high_slot) } else { (high_slot, low_slot) }
    }

    fn structural_guard(&self) -> ECSResult<()> {
        if cfg!(debug_assertions) && self.system_scope {
            return Err(ECSError::IteratorInvalidation);
        }
        Ok(())
    }
}
