//! System scheduling and tick execution.
//!
//! The scheduler orders systems into **stages** and runs one full tick at a
//! time. Within a stage, systems run in registration order; stages execute
//! in ascending key order. After each stage the deferred command buffer is
//! flushed, so:
//!
//! * all systems within a stage observe the same world snapshot, and
//! * each stage observes the structural changes requested by the previous
//!   stage.
//!
//! Execution is single-threaded and cooperative: one system runs to
//! completion before the next starts, and the caller regains control only
//! after the final flush. A tick is the atomic unit of external
//! observation; it cannot be cancelled mid-flight.
//!
//! ## Failure policy
//!
//! A system whose declared resource is missing is skipped for that tick
//! and logged; one absent optional resource must not crash the frame.
//! System-local errors (stale entity handles and the like) are likewise
//! logged and do not abort the tick. The exception is
//! [`ECSError::IteratorInvalidation`], which is a programmer error and
//! propagates immediately.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::engine::error::{ECSError, ECSResult};
use crate::engine::systems::System;
use crate::engine::types::Tick;
use crate::engine::world::World;

/// Stage keys for the standard roguelike tick, ordered by execution.
///
/// The gaps leave room for game-specific stages in between; any `i32` is a
/// valid stage key.
pub mod stage {
    /// Drain decoded input actions into intents.
    pub const INPUT: i32 = 100;
    /// Monster and NPC decision making.
    pub const AI: i32 = 200;
    /// Apply intents: movement, attacks, item use.
    pub const ACTION: i32 = 300;
    /// Resolve consequences: damage, death, status effects.
    pub const RESOLUTION: i32 = 400;
    /// Drop expired intents and one-tick markers.
    pub const CLEANUP: i32 = 500;
    /// Emit draw commands into the render buffer.
    pub const RENDER: i32 = 600;
}

/// Stage used by [`Scheduler::add_system`] when no stage is named.
pub const DEFAULT_STAGE: i32 = stage::ACTION;

/// Where the scheduler currently is within a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickPhase {
    /// No tick in flight.
    Idle,
    /// Resolving the declared resources of a system.
    Resolving {
        /// Stage key of the system being resolved.
        stage: i32,
        /// Position of the system within its stage.
        slot: usize,
    },
    /// Executing a system body.
    Running {
        /// Stage key of the running system.
        stage: i32,
        /// Position of the system within its stage.
        slot: usize,
    },
    /// Applying the deferred command buffer at a stage barrier.
    Flushing {
        /// Stage key whose barrier is being flushed.
        stage: i32,
    },
}

/// Orders registered systems and drives tick execution.
pub struct Scheduler {
    stages: BTreeMap<i32, Vec<Box<dyn System>>>,
    phase: TickPhase,
    ticks: Tick,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Creates a scheduler with no systems.
    pub fn new() -> Self {
        Self { stages: BTreeMap::new(), phase: TickPhase::Idle, ticks: 0 }
    }

    /// Registers a system in the default stage.
    ///
    /// Systems in the same stage run in registration order.
    pub fn add_system(&mut self, system: impl System + 'static) {
        self.add_system_in_stage(DEFAULT_STAGE, system);
    }

    /// Registers a system in an explicit stage.
    pub fn add_system_in_stage(&mut self, stage: i32, system: impl System + 'static) {
        self.stages.entry(stage).or_default().push(Box::new(system));
    }

    /// Total number of registered systems.
    pub fn system_count(&self) -> usize {
        self.stages.values().map(Vec::len).sum()
    }

    /// Current position within the tick state machine.
    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> Tick {
        self.ticks
    }

    /// Runs one full tick: every stage in key order, every system in
    /// registration order, with a command flush after each stage.
    pub fn run_tick(&mut self, world: &mut World) -> ECSResult<()> {
        let Self { stages, phase, ticks } = self;

        for (&stage_key, systems) in stages.iter_mut() {
            for (slot, system) in systems.iter_mut().enumerate() {
                *phase = TickPhase::Resolving { stage: stage_key, slot };
                let missing = system
                    .resources()
                    .iter()
                    .find(|request| !world.resources().contains_type_id(request.type_id));
                if let Some(request) = missing {
                    warn!(
                        "skipping system `{}`: {}",
                        system.name(),
                        ECSError::MissingResource { name: request.name },
                    );
                    continue;
                }

                *phase = TickPhase::Running { stage: stage_key, slot };
                world.begin_system_scope();
                let result = system.run(world);
                world.end_system_scope();
                match result {
                    Ok(()) => {}
                    Err(error @ ECSError::IteratorInvalidation) => {
                        *phase = TickPhase::Idle;
                        return Err(error);
                    }
                    Err(error) => {
                        // Tick-local failures: log and keep the frame alive.
                        warn!("system `{}` failed: {error}", system.name());
                    }
                }
            }

            *phase = TickPhase::Flushing { stage: stage_key };
            world.apply_deferred()?;
        }

        *phase = TickPhase::Idle;
        *ticks += 1;
        debug!("tick {} complete: {} entities live", *ticks, world.entity_count());
        Ok(())
    }
}
