//! Component type registration.
//!
//! Assigns a compact, stable [`ComponentID`] to each Rust component type
//! used by a world, and keeps per-type metadata ([`ComponentDesc`]) for
//! diagnostics and validation.
//!
//! ## Design
//! - Components are registered once per world and assigned sequential IDs
//!   in `[0, COMPONENT_CAP)`.
//! - The registry is owned by the `World`, not process-wide: two worlds may
//!   assign different IDs to the same type, and IDs are only meaningful
//!   against the world that issued them.
//! - The registry can be frozen after world setup, making component
//!   identity stable for the rest of the session; late registrations fail
//!   fast instead of shifting storage layout mid-game.
//!
//! ## Invariants
//! - Every entry in `by_type` has a matching descriptor in `by_id`.
//! - IDs are always in bounds of `COMPONENT_CAP`.

use std::any::{TypeId, type_name};
use std::fmt;
use std::mem::{align_of, size_of};

use ahash::AHashMap;

use crate::engine::error::{ECSError, ECSResult};
use crate::engine::types::{ComponentID, COMPONENT_CAP};

/// Per-world mapping between Rust component types and compact IDs.
pub struct ComponentRegistry {
    next_id: ComponentID,
    by_type: AHashMap<TypeId, ComponentID>,
    by_id: Vec<Option<ComponentDesc>>,
    frozen: bool,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            by_type: AHashMap::new(),
            by_id: Vec::new(),
            frozen: false,
        }
    }

    /// Registers component type `T` and returns its assigned ID.
    ///
    /// Idempotent: re-registering an already-known type returns the
    /// existing ID. Fails with [`ECSError::RegistryFrozen`] after
    /// [`freeze`](Self::freeze), or [`ECSError::RegistryFull`] once
    /// `COMPONENT_CAP` types exist.
    pub fn register<T: 'static>(&mut self) -> ECSResult<ComponentID> {
        let type_id = TypeId::of::<T>();
        if let Some(&existing) = self.by_type.get(&type_id) {
            return Ok(existing);
        }
        if self.frozen {
            return Err(ECSError::RegistryFrozen { name: type_name::<T>() });
        }
        if (self.next_id as usize) >= COMPONENT_CAP {
            return Err(ECSError::RegistryFull { capacity: COMPONENT_CAP });
        }

        let component_id = self.next_id;
        self.next_id += 1;
        self.by_type.insert(type_id, component_id);
        self.by_id.push(Some(ComponentDesc::of::<T>().with_id(component_id)));
        Ok(component_id)
    }

    /// Freezes the registry, rejecting further registrations.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Returns `true` once the registry has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Returns the ID assigned to `T`, if registered.
    pub fn id_of<T: 'static>(&self) -> Option<ComponentID> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    /// Returns the ID assigned to `T`, failing if it was never registered.
    pub fn require_id_of<T: 'static>(&self) -> ECSResult<ComponentID> {
        self.id_of::<T>()
            .ok_or(ECSError::UnregisteredComponent { name: type_name::<T>() })
    }

    /// Returns the descriptor for `component_id`, if registered.
    pub fn desc(&self, component_id: ComponentID) -> Option<&ComponentDesc> {
        self.by_id.get(component_id as usize).and_then(|d| d.as_ref())
    }

    /// Human-readable name for `component_id`, for logs and errors.
    pub fn name_of(&self, component_id: ComponentID) -> &'static str {
        self.desc(component_id).map_or("<unregistered>", |d| d.name)
    }

    /// Number of registered component types.
    pub fn len(&self) -> usize {
        self.next_id as usize
    }

    /// Returns `true` if no component type has been registered.
    pub fn is_empty(&self) -> bool {
        self.next_id == 0
    }
}

/// Describes a registered component type.
///
/// `ComponentDesc` is `Copy` and safe to clone freely for reporting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentDesc {
    /// Runtime identifier assigned by the registry.
    pub component_id: ComponentID,
    /// Rust type name for diagnostics.
    pub name: &'static str,
    /// Runtime `TypeId` of the component.
    pub type_id: TypeId,
    /// Size of the component type in bytes.
    pub size: usize,
    /// Alignment of the component type in bytes.
    pub align: usize,
}

impl ComponentDesc {
    /// Constructs a descriptor for type `T`.
    ///
    /// The returned descriptor uses `component_id = 0`; finalize with
    /// [`with_id`](Self::with_id).
    #[inline]
    pub fn of<T: 'static>() -> Self {
        Self {
            component_id: 0,
            name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            size: size_of::<T>(),
            align: align_of::<T>(),
        }
    }

    /// Returns `true` if this descriptor refers to type `T`.
    #[inline]
    pub fn matches_type<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Returns a copy with `component_id` set.
    #[inline]
    pub fn with_id(mut self, component_id: ComponentID) -> Self {
        self.component_id = component_id;
        self
    }
}

impl fmt::Display for ComponentDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ComponentDesc {{ id: {}, name: {}, size: {}, align: {} }}",
            self.component_id, self.name, self.size, self.align
        )
    }
}
