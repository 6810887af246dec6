#![allow(dead_code)]

use rogue_ecs::{Bundle, ECSResult, World};

pub const ENTITIES_SMALL: usize = 1_000;
pub const ENTITIES_MED: usize = 10_000;
pub const ENTITIES_LARGE: usize = 100_000;

#[derive(Clone, Copy)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy)]
pub struct Velocity {
    pub dx: i32,
    pub dy: i32,
}

#[derive(Clone, Copy)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

pub fn register_components(world: &mut World) -> ECSResult<()> {
    world.register_component::<Position>()?;
    world.register_component::<Velocity>()?;
    world.register_component::<Health>()?;
    world.freeze_components();
    Ok(())
}

pub fn setup_world(entity_count: usize) -> ECSResult<World> {
    let mut world = World::new();
    register_components(&mut world)?;

    let position_id = world.component_id_of::<Position>()?;
    let velocity_id = world.component_id_of::<Velocity>()?;
    let health_id = world.component_id_of::<Health>()?;

    for i in 0..entity_count {
        let bundle = Bundle::new()
            .with(position_id, Position { x: i as i32 % 80, y: i as i32 % 25 })
            .with(velocity_id, Velocity { dx: 1, dy: 0 })
            .with(health_id, Health { current: 10, max: 10 });
        world.commands().spawn(bundle);
    }
    world.apply_deferred()?;
    Ok(world)
}
