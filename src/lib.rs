//! # Rogue ECS
//!
//! Entity-Component-System runtime driving the game logic of a
//! terminal-based roguelike.
//!
//! ## Design Goals
//! - Sparse-set component storage for cache-friendly iteration
//! - Deterministic, single-threaded system scheduling with stage barriers
//! - Structural changes deferred through a command buffer
//! - Shared singleton state (map, camera, RNG, input stack) injected as
//!   typed resources, never ambient globals
//!
//! The crate owns no terminal: input arrives as already-decoded actions in
//! a queue resource, and rendering leaves as draw commands in a buffer
//! resource. The surrounding game loop drives ticks and handles I/O.
//!
//! ```no_run
//! use rogue_ecs::prelude::*;
//!
//! #[derive(Clone, Copy)]
//! struct Position { x: i32, y: i32 }
//!
//! let mut world = World::new();
//! world.register_component::<Position>().unwrap();
//! world.freeze_components();
//!
//! let walkers = world.query_builder().with::<Position>().unwrap().build().unwrap();
//! let mut scheduler = Scheduler::new();
//! scheduler.add_system(FnSystem::new("drift", move |world: &mut World| {
//!     world.for_each::<Position, _>(&walkers, |_, pos, _| pos.x += 1)
//! }));
//!
//! let player = world.spawn();
//! world.insert(player, Position { x: 0, y: 0 }).unwrap();
//! scheduler.run_tick(&mut world).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (Public API)
// ─────────────────────────────────────────────────────────────────────────────

// Core ECS types

pub use engine::world::{World, WorldConfig};

pub use engine::entity::{Entities, Entity};

pub use engine::types::{
    ComponentID, EntityID, EntityIndex, Generation, Signature, Tick, COMPONENT_CAP,
    build_signature,
};

pub use engine::component::{ComponentDesc, ComponentRegistry};

pub use engine::storage::{ComponentStorage, ErasedStorage};

pub use engine::query::{Query, QueryBuilder, QueryIter};

pub use engine::resource::Resources;

pub use engine::commands::{Bundle, Command, CommandBuffer};

pub use engine::systems::{FnSystem, ResourceRequest, System};

pub use engine::scheduler::{Scheduler, TickPhase, DEFAULT_STAGE, stage};

pub use engine::error::{ECSError, ECSResult};

// Standard resource types

pub use engine::camera::Camera;
pub use engine::events::Events;
pub use engine::input::{HandlerStack, InputQueue, Transition};
pub use engine::random::WorldRng;
pub use engine::render::{DrawCommand, Glyph, RenderBuffer};

// ─────────────────────────────────────────────────────────────────────────────
// Prelude (Optional but recommended)
// ─────────────────────────────────────────────────────────────────────────────

/// Commonly used ECS types.
///
/// Import with:
/// ```rust
/// use rogue_ecs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Bundle, Command, CommandBuffer, ECSError, ECSResult, Entity, FnSystem, Query, Scheduler,
        System, World, stage,
    };
}
