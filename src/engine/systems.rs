//! System abstractions.
//!
//! A **system** is a unit of per-tick logic operating on the world.
//! Systems:
//! - declare the resources they need up front, so the scheduler can
//!   resolve (or skip) them before the body runs,
//! - receive exclusive access to the [`World`] for the duration of their
//!   run,
//! - request structural changes through the command buffer rather than
//!   applying them mid-iteration.
//!
//! Queries are built once, at system construction time, so a malformed
//! query surfaces before the game loop starts; evaluation happens fresh on
//! every invocation against the current world state.
//!
//! [`FnSystem`] defines a system from a closure without a dedicated type;
//! this is the preferred mechanism for most gameplay logic.

use std::any::TypeId;

use crate::engine::error::ECSResult;
use crate::engine::world::World;

/// A resource dependency declared by a system.
///
/// Carries the `TypeId` for resolution and the type name for log messages
/// when the resource is absent.
#[derive(Clone, Copy, Debug)]
pub struct ResourceRequest {
    /// Runtime type key of the requested resource.
    pub type_id: TypeId,
    /// Human-readable resource type name.
    pub name: &'static str,
}

impl ResourceRequest {
    /// Declares a dependency on resource type `T`.
    pub fn of<T: 'static>() -> Self {
        Self { type_id: TypeId::of::<T>(), name: std::any::type_name::<T>() }
    }
}

/// A unit of executable per-tick logic.
pub trait System {
    /// Human-readable name, used in scheduler logs.
    fn name(&self) -> &'static str;

    /// Resources this system requires. If any is absent at tick time the
    /// scheduler skips the system for that tick.
    fn resources(&self) -> &[ResourceRequest] {
        &[]
    }

    /// Executes the system logic against the world.
    fn run(&mut self, world: &mut World) -> ECSResult<()>;
}

/// A [`System`] backed by a function or closure.
///
/// Stores a name, the declared resource dependencies, and the executable
/// function itself.
///
/// ```ignore
/// let movement = FnSystem::new("movement", move |world: &mut World| {
///     world.for_each::<Position, _>(&moving, |_, pos, _| pos.x += 1)?;
///     Ok(())
/// })
/// .resource::<GameMap>();
/// ```
pub struct FnSystem<F>
where
    F: FnMut(&mut World) -> ECSResult<()>,
{
    name: &'static str,
    resources: Vec<ResourceRequest>,
    f: F,
}

impl<F> FnSystem<F>
where
    F: FnMut(&mut World) -> ECSResult<()>,
{
    /// Creates a function-backed system with no resource dependencies.
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, resources: Vec::new(), f }
    }

    /// Declares that this system requires resource type `T`.
    pub fn resource<T: 'static>(mut self) -> Self {
        self.resources.push(ResourceRequest::of::<T>());
        self
    }
}

impl<F> System for FnSystem<F>
where
    F: FnMut(&mut World) -> ECSResult<()>,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn resources(&self) -> &[ResourceRequest] {
        &self.resources
    }

    fn run(&mut self, world: &mut World) -> ECSResult<()> {
        (self.f)(world)
    }
}
