//! Deferred structural commands.
//!
//! ## Purpose
//! Commands are an explicit, ordered representation of structural world
//! mutations: entity creation, destruction, and component addition or
//! removal. Rather than mutating storage directly while systems iterate,
//! systems record `Command` values into a [`CommandBuffer`]; the world
//! applies them later at a synchronization point (the stage barrier).
//!
//! ## Design
//! - Commands are plain data describing *what* change should occur.
//! - The buffer is append-only within a tick and consumed exactly once.
//! - Application order is FIFO enqueue order; a despawn takes effect
//!   immediately within the flush, so later commands targeting the same
//!   entity in the same flush degrade to no-ops.
//!
//! ## Invariants
//! - Commands must be executed in the order they were recorded.
//! - Component IDs must refer to registered component types at flush time.

use std::any::{Any, type_name};

use crate::engine::entity::Entity;
use crate::engine::types::{ComponentID, Signature};

/// One type-erased component value destined for an entity.
pub struct BundleEntry {
    /// Component type the value belongs to.
    pub component_id: ComponentID,
    /// Dynamic type name of the boxed value, for diagnostics.
    pub value_name: &'static str,
    /// The component value.
    pub value: Box<dyn Any>,
}

/// A type-erased group of component values used to spawn an entity.
///
/// The bundle tracks a presence [`Signature`] alongside the values; a
/// component type appears at most once, later inserts overwrite earlier
/// ones.
#[derive(Default)]
pub struct Bundle {
    signature: Signature,
    entries: Vec<BundleEntry>,
}

impl Bundle {
    /// Creates an empty bundle.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a component value, replacing any prior value of the same
    /// component type.
    pub fn insert<T: 'static>(&mut self, component_id: ComponentID, value: T) {
        if self.signature.has(component_id) {
            self.entries.retain(|entry| entry.component_id != component_id);
        }
        self.signature.set(component_id);
        self.entries.push(BundleEntry {
            component_id,
            value_name: type_name::<T>(),
            value: Box::new(value),
        });
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<T: 'static>(mut self, component_id: ComponentID, value: T) -> Self {
        self.insert(component_id, value);
        self
    }

    /// Signature of the components present in this bundle.
    #[inline]
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Returns `true` if the bundle holds no components.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the bundle, yielding its entries in insertion order.
    pub(crate) fn into_entries(self) -> Vec<BundleEntry> {
        self.entries
    }
}

/// A deferred structural mutation.
pub enum Command {
    /// Spawn a new entity carrying the bundle's components.
    Spawn {
        /// Initial components for the new entity.
        bundle: Bundle,
    },

    /// Despawn an existing entity, dropping all of its components.
    Despawn {
        /// Entity to remove from the world.
        entity: Entity,
    },

    /// Add a component to an existing entity (overwrite if present).
    Add {
        /// Target entity.
        entity: Entity,
        /// Component type to add.
        component_id: ComponentID,
        /// Dynamic type name of the boxed value, for diagnostics.
        value_name: &'static str,
        /// The component value; must match the storage registered for
        /// `component_id`.
        value: Box<dyn Any>,
    },

    /// Remove a component from an existing entity; no-op if absent.
    Remove {
        /// Target entity.
        entity: Entity,
        /// Component type to remove.
        component_id: ComponentID,
    },
}

/// Append-only queue of deferred commands for the current tick.
#[derive(Default)]
pub struct CommandBuffer {
    queue: Vec<Command>,
}

impl CommandBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues an arbitrary command.
    #[inline]
    pub fn push(&mut self, command: Command) {
        self.queue.push(command);
    }

    /// Enqueues a spawn of a new entity with `bundle`'s components.
    pub fn spawn(&mut self, bundle: Bundle) {
        self.push(Command::Spawn { bundle });
    }

    /// Enqueues a despawn of `entity`.
    pub fn despawn(&mut self, entity: Entity) {
        self.push(Command::Despawn { entity });
    }

    /// Enqueues adding `value` to `entity` as component `component_id`.
    pub fn add<T: 'static>(&mut self, entity: Entity, component_id: ComponentID, value: T) {
        self.push(Command::Add {
            entity,
            component_id,
            value_name: type_name::<T>(),
            value: Box::new(value),
        });
    }

    /// Enqueues removing component `component_id` from `entity`.
    pub fn remove(&mut self, entity: Entity, component_id: ComponentID) {
        self.push(Command::Remove { entity, component_id });
    }

    /// Number of pending commands.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if no commands are pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Takes all pending commands in enqueue order, leaving the buffer
    /// empty.
    pub(crate) fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.queue)
    }
}
