use rogue_ecs::{Bundle, Command, ECSResult, Entity, World};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Position {
    x: i32,
    y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Loot(u32);

fn world_with_components() -> ECSResult<World> {
    let mut world = World::new();
    world.register_component::<Position>()?;
    world.register_component::<Loot>()?;
    world.freeze_components();
    Ok(world)
}

#[test]
fn commands_apply_in_fifo_order() -> ECSResult<()> {
    let mut world = world_with_components()?;
    let loot_id = world.component_id_of::<Loot>()?;

    let e = world.spawn();
    world.commands().add(e, loot_id, Loot(1));
    world.commands().add(e, loot_id, Loot(2));
    world.commands().add(e, loot_id, Loot(3));
    world.apply_deferred()?;

    // Later adds overwrite earlier ones, so FIFO leaves the last value.
    assert_eq!(world.get::<Loot>(e), Some(&Loot(3)));
    Ok(())
}

#[test]
fn despawn_then_add_in_same_flush_leaves_entity_without_component() -> ECSResult<()> {
    let mut world = world_with_components()?;
    let loot_id = world.component_id_of::<Loot>()?;

    let e = world.spawn();
    world.insert(e, Position { x: 0, y: 0 })?;

    world.commands().despawn(e);
    world.commands().add(e, loot_id, Loot(7));
    world.apply_deferred()?;

    assert!(!world.is_alive(e));
    assert_eq!(world.get::<Loot>(e), None);
    let storage = world.storage::<Loot>().unwrap();
    assert_eq!(storage.len(), 0, "the dead-entity add must not leak into storage");
    Ok(())
}

#[test]
fn add_then_despawn_in_same_flush_still_dies_clean() -> ECSResult<()> {
    let mut world = world_with_components()?;
    let loot_id = world.component_id_of::<Loot>()?;

    let e = world.spawn();
    world.commands().add(e, loot_id, Loot(7));
    world.commands().despawn(e);
    world.apply_deferred()?;

    assert!(!world.is_alive(e));
    assert_eq!(world.storage::<Loot>().unwrap().len(), 0);
    Ok(())
}

#[test]
fn deferred_spawn_creates_entity_with_bundle() -> ECSResult<()> {
    let mut world = world_with_components()?;
    let position_id = world.component_id_of::<Position>()?;
    let loot_id = world.component_id_of::<Loot>()?;

    let bundle = Bundle::new()
        .with(position_id, Position { x: 5, y: 5 })
        .with(loot_id, Loot(42));
    world.commands().spawn(bundle);

    assert_eq!(world.entity_count(), 0, "spawn is deferred until flush");
    world.apply_deferred()?;
    assert_eq!(world.entity_count(), 1);

    let query = world.query_builder().with::<Position>()?.build()?;
    let spawned: Vec<Entity> = world.query(&query).collect();
    assert_eq!(spawned.len(), 1);
    assert_eq!(world.get::<Position>(spawned[0]), Some(&Position { x: 5, y: 5 }));
    assert_eq!(world.get::<Loot>(spawned[0]), Some(&Loot(42)));
    Ok(())
}

#[test]
fn remove_command_on_dead_entity_is_silent() -> ECSResult<()> {
    let mut world = world_with_components()?;
    let loot_id = world.component_id_of::<Loot>()?;

    let e = world.spawn();
    world.insert(e, Loot(3))?;
    world.despawn(e)?;

    world.commands().remove(e, loot_id);
    world.apply_deferred()?;
    Ok(())
}

#[test]
fn flush_consumes_the_buffer_exactly_once() -> ECSResult<()> {
    let mut world = world_with_components()?;
    let position_id = world.component_id_of::<Position>()?;

    world.commands().spawn(Bundle::new().with(position_id, Position { x: 1, y: 1 }));
    world.apply_deferred()?;
    assert_eq!(world.entity_count(), 1);

    // Replaying the flush must not re-apply consumed commands.
    world.apply_deferred()?;
    assert_eq!(world.entity_count(), 1);
    assert!(world.commands().is_empty());
    Ok(())
}

#[test]
fn bundle_keeps_one_value_per_component_type() -> ECSResult<()> {
    let mut world = world_with_components()?;
    let loot_id = world.component_id_of::<Loot>()?;

    let bundle = Bundle::new().with(loot_id, Loot(1)).with(loot_id, Loot(9));
    assert_eq!(bundle.signature().count(), 1);
    world.commands().spawn(bundle);
    world.apply_deferred()?;

    let storage = world.storage::<Loot>().unwrap();
    assert_eq!(storage.len(), 1);
    let (_, value) = storage.iter().next().unwrap();
    assert_eq!(value, &Loot(9));
    Ok(())
}

#[test]
fn raw_command_values_go_through_push() -> ECSResult<()> {
    let mut world = world_with_components()?;

    let e = world.spawn();
    world.defer(Command::Despawn { entity: e });
    world.apply_deferred()?;
    assert!(!world.is_alive(e));
    Ok(())
}
