//! Error types for the ECS runtime.
//!
//! This module declares the crate-wide error taxonomy. Each variant models a
//! single failure mode and carries enough context to make failures
//! actionable while remaining small and cheap to pass around.
//!
//! ## Severity classes
//!
//! * **Recoverable, tick-local** — [`ECSError::InvalidEntity`] and
//!   [`ECSError::MissingResource`]: the caller treats the entity as already
//!   gone, or the scheduler skips the affected system for the tick. Neither
//!   aborts the frame.
//! * **Programmer error, fail fast at startup** —
//!   [`ECSError::MalformedQuery`], [`ECSError::UnregisteredComponent`],
//!   [`ECSError::RegistryFrozen`], and [`ECSError::RegistryFull`]: these
//!   surface during world setup or system registration, before the game
//!   loop begins.
//! * **Forbidden at runtime** — [`ECSError::IteratorInvalidation`]:
//!   structural mutation attempted inside a running system instead of going
//!   through the command buffer. Caught in debug builds.
//!
//! No error path may leave the signature ↔ storage-presence invariant
//! violated; structural operations either apply fully or fail without
//! partial effect.

use thiserror::Error;

use crate::engine::entity::Entity;

/// Convenience alias for fallible ECS operations.
pub type ECSResult<T> = Result<T, ECSError>;

/// Crate-wide error type for the ECS runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ECSError {
    /// An entity handle was stale or never existed.
    ///
    /// The slot's live generation no longer matches the handle, typically
    /// because the entity was despawned and the slot recycled. Callers
    /// should treat the entity as already gone.
    #[error("stale or unknown entity handle {entity}")]
    InvalidEntity {
        /// The offending handle.
        entity: Entity,
    },

    /// A query declared the same component as both required and excluded.
    ///
    /// Surfaces from [`QueryBuilder::build`](crate::engine::query::QueryBuilder::build),
    /// so it is caught when systems are constructed, not per tick.
    #[error("malformed query: component `{component}` is both required and excluded")]
    MalformedQuery {
        /// Name of the overlapping component type.
        component: &'static str,
    },

    /// A system declared a resource that is absent from the resource store.
    ///
    /// Tick-local: the scheduler skips the system and logs a warning rather
    /// than aborting the frame.
    #[error("missing resource `{name}`")]
    MissingResource {
        /// Name of the absent resource type.
        name: &'static str,
    },

    /// Structural mutation was attempted while system iteration is active.
    ///
    /// Spawning, despawning, or adding/removing components directly from
    /// inside a running system invalidates iteration order; such changes
    /// must go through the command buffer. Detected in debug builds only.
    #[error("structural mutation during system execution; use the command buffer")]
    IteratorInvalidation,

    /// A component type was used before being registered with the world.
    #[error("component `{name}` is not registered")]
    UnregisteredComponent {
        /// Rust type name of the component.
        name: &'static str,
    },

    /// The component registry reached its configured capacity.
    #[error("component registry full ({capacity} types)")]
    RegistryFull {
        /// The capacity that was exhausted.
        capacity: usize,
    },

    /// A component registration arrived after the registry was frozen.
    #[error("component registry frozen; cannot register `{name}`")]
    RegistryFrozen {
        /// Rust type name of the late component.
        name: &'static str,
    },

    /// A type-erased storage operation received a value of the wrong type.
    ///
    /// Indicates a command carried a boxed value whose dynamic type does
    /// not match the storage registered for its component ID.
    #[error("component type mismatch: expected `{expected}`, got `{actual}`")]
    ComponentTypeMismatch {
        /// Element type the storage was registered with.
        expected: &'static str,
        /// Dynamic type of the provided value.
        actual: &'static str,
    },
}
