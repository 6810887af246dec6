use rogue_ecs::{ECSError, ECSResult, World};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Position {
    x: i32,
    y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Health(i32);

fn world_with_components() -> ECSResult<World> {
    let mut world = World::new();
    world.register_component::<Position>()?;
    world.register_component::<Health>()?;
    world.freeze_components();
    Ok(world)
}

#[test]
fn despawned_entity_is_invalid_everywhere() -> ECSResult<()> {
    let mut world = world_with_components()?;

    let e = world.spawn();
    world.insert(e, Position { x: 1, y: 2 })?;
    assert!(world.is_alive(e));

    world.despawn(e)?;
    assert!(!world.is_alive(e));
    assert_eq!(world.despawn(e), Err(ECSError::InvalidEntity { entity: e }));
    assert_eq!(world.signature_of(e), Err(ECSError::InvalidEntity { entity: e }));
    assert_eq!(
        world.insert(e, Position { x: 0, y: 0 }),
        Err(ECSError::InvalidEntity { entity: e })
    );
    assert_eq!(world.get::<Position>(e), None);
    Ok(())
}

#[test]
fn slot_recycling_bumps_generation() {
    let mut world = World::new();

    let entities: Vec<_> = (0..4).map(|_| world.spawn()).collect();
    let victim = entities[1];
    world.despawn(victim).unwrap();

    let recycled = world.spawn();
    assert_eq!(recycled.index(), victim.index(), "lowest free slot must be reused");
    assert_eq!(recycled.generation(), victim.generation() + 1);
    assert_ne!(recycled, victim);
    assert!(world.is_alive(recycled));
    assert!(!world.is_alive(victim), "old handle must stay dead after reuse");
}

#[test]
fn lowest_free_index_is_reused_first() {
    let mut world = World::new();

    let entities: Vec<_> = (0..6).map(|_| world.spawn()).collect();
    world.despawn(entities[4]).unwrap();
    world.despawn(entities[0]).unwrap();
    world.despawn(entities[2]).unwrap();

    assert_eq!(world.spawn().index(), 0);
    assert_eq!(world.spawn().index(), 2);
    assert_eq!(world.spawn().index(), 4);
    assert_eq!(world.spawn().index(), 6, "exhausted free list extends storage");
}

#[test]
fn signature_tracks_storage_presence_exactly() -> ECSResult<()> {
    let mut world = world_with_components()?;
    let position_id = world.component_id_of::<Position>()?;
    let health_id = world.component_id_of::<Health>()?;

    let e = world.spawn();
    assert!(world.signature_of(e)?.is_empty());

    world.insert(e, Position { x: 0, y: 0 })?;
    world.insert(e, Health(10))?;
    let signature = world.signature_of(e)?;
    assert!(signature.has(position_id) && signature.has(health_id));
    assert!(world.get::<Position>(e).is_some());
    assert!(world.get::<Health>(e).is_some());

    world.remove::<Health>(e)?;
    let signature = world.signature_of(e)?;
    assert!(signature.has(position_id));
    assert!(!signature.has(health_id));
    assert!(world.get::<Health>(e).is_none());

    // Removing an absent component is a no-op, not an error.
    assert_eq!(world.remove::<Health>(e)?, None);
    Ok(())
}

#[test]
fn insert_overwrites_in_place() -> ECSResult<()> {
    let mut world = world_with_components()?;

    let e = world.spawn();
    assert_eq!(world.insert(e, Health(10))?, None);
    assert_eq!(world.insert(e, Health(25))?, Some(Health(10)));
    assert_eq!(world.get::<Health>(e), Some(&Health(25)));

    let storage = world.storage::<Health>().unwrap();
    assert_eq!(storage.len(), 1, "overwrite must not duplicate the entry");
    Ok(())
}

#[test]
fn despawn_drops_component_instances() -> ECSResult<()> {
    let mut world = world_with_components()?;

    let doomed = world.spawn();
    let survivor = world.spawn();
    world.insert(doomed, Position { x: 1, y: 1 })?;
    world.insert(survivor, Position { x: 2, y: 2 })?;

    world.despawn(doomed)?;
    let storage = world.storage::<Position>().unwrap();
    assert_eq!(storage.len(), 1);
    assert_eq!(world.get::<Position>(survivor), Some(&Position { x: 2, y: 2 }));

    // The recycled slot must not inherit the dead entity's components.
    let recycled = world.spawn();
    assert_eq!(recycled.index(), doomed.index());
    assert_eq!(world.get::<Position>(recycled), None);
    assert!(world.signature_of(recycled)?.is_empty());
    Ok(())
}

#[test]
fn stale_handle_cannot_read_recycled_slot() -> ECSResult<()> {
    let mut world = world_with_components()?;

    let old = world.spawn();
    world.insert(old, Health(5))?;
    world.despawn(old)?;

    let new = world.spawn();
    world.insert(new, Health(99))?;

    assert_eq!(old.index(), new.index());
    assert_eq!(world.get::<Health>(old), None, "stale read must not alias the new entity");
    assert_eq!(world.get::<Health>(new), Some(&Health(99)));
    Ok(())
}

#[test]
fn registration_after_freeze_fails() {
    let mut world = World::new();
    world.register_component::<Position>().unwrap();
    world.freeze_components();

    // Re-registering a known type stays fine.
    assert!(world.register_component::<Position>().is_ok());

    let err = world.register_component::<Health>().unwrap_err();
    assert!(matches!(err, ECSError::RegistryFrozen { .. }));
}

#[test]
fn unregistered_component_is_an_error() {
    let mut world = World::new();
    let e = world.spawn();
    let err = world.insert(e, Health(1)).unwrap_err();
    assert!(matches!(err, ECSError::UnregisteredComponent { .. }));
    assert_eq!(world.get::<Health>(e), None);
}
