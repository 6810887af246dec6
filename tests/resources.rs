use rogue_ecs::{
    Camera, DrawCommand, Events, Glyph, HandlerStack, InputQueue, RenderBuffer, Transition, World,
    WorldRng,
};

#[derive(Debug, PartialEq)]
struct TurnCount(u64);

#[derive(Debug, PartialEq)]
struct DungeonDepth(u32);

#[test]
fn insert_replaces_and_returns_previous_instance() {
    let mut world = World::new();
    assert_eq!(world.insert_resource(TurnCount(1)), None);
    assert_eq!(world.insert_resource(TurnCount(2)), Some(TurnCount(1)));
    assert_eq!(world.resource::<TurnCount>(), Some(&TurnCount(2)));
}

#[test]
fn resources_are_keyed_by_type() {
    let mut world = World::new();
    world.insert_resource(TurnCount(7));
    world.insert_resource(DungeonDepth(3));

    assert_eq!(world.resource::<TurnCount>(), Some(&TurnCount(7)));
    assert_eq!(world.resource::<DungeonDepth>(), Some(&DungeonDepth(3)));

    world.resource_mut::<TurnCount>().unwrap().0 += 1;
    assert_eq!(world.resource::<TurnCount>(), Some(&TurnCount(8)));
}

#[test]
fn remove_takes_the_value_out() {
    let mut world = World::new();
    world.insert_resource(DungeonDepth(5));
    assert_eq!(world.remove_resource::<DungeonDepth>(), Some(DungeonDepth(5)));
    assert_eq!(world.resource::<DungeonDepth>(), None);
    assert_eq!(world.remove_resource::<DungeonDepth>(), None);
}

#[test]
fn missing_resource_reads_as_none_and_errors_on_require() {
    let world = World::new();
    assert_eq!(world.resource::<TurnCount>(), None);
    let err = world.require_resource::<TurnCount>().unwrap_err();
    assert!(matches!(err, rogue_ecs::ECSError::MissingResource { name } if name.contains("TurnCount")));
}

#[test]
fn rng_is_deterministic_per_seed() {
    let mut a = WorldRng::seeded(1234);
    let mut b = WorldRng::seeded(1234);
    let mut c = WorldRng::seeded(5678);

    let run_a: Vec<u64> = (0..32).map(|_| a.next_u64()).collect();
    let run_b: Vec<u64> = (0..32).map(|_| b.next_u64()).collect();
    let run_c: Vec<u64> = (0..32).map(|_| c.next_u64()).collect();

    assert_eq!(run_a, run_b);
    assert_ne!(run_a, run_c);
}

#[test]
fn rng_bounds_hold() {
    let mut rng = WorldRng::seeded(42);
    for _ in 0..1000 {
        assert!(rng.below(6) < 6);
        let roll = rng.range_i32(1, 20);
        assert!((1..=20).contains(&roll));
    }
    assert!(!rng.coin(0.0));
    assert!(rng.coin(1.0));
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum InputMode {
    Walk,
    Inventory,
    Targeting,
}

#[test]
fn handler_stack_keeps_its_base() {
    let mut stack = HandlerStack::new(InputMode::Walk);
    assert_eq!(*stack.current(), InputMode::Walk);
    assert_eq!(stack.pop(), None, "base handler cannot be popped");

    stack.apply(Transition::Push(InputMode::Inventory));
    stack.apply(Transition::Push(InputMode::Targeting));
    assert_eq!(*stack.current(), InputMode::Targeting);
    assert_eq!(stack.depth(), 3);

    stack.apply(Transition::Pop);
    assert_eq!(*stack.current(), InputMode::Inventory);
    stack.apply(Transition::Stay);
    assert_eq!(*stack.current(), InputMode::Inventory);

    stack.apply(Transition::Pop);
    stack.apply(Transition::Pop);
    assert_eq!(*stack.current(), InputMode::Walk);
    assert_eq!(stack.depth(), 1);
}

#[test]
fn input_queue_preserves_arrival_order() {
    #[derive(Debug, PartialEq)]
    enum Action {
        Move(i32, i32),
        Wait,
    }

    let mut queue = InputQueue::new();
    queue.push(Action::Move(1, 0));
    queue.push(Action::Wait);
    queue.push(Action::Move(0, -1));

    assert_eq!(queue.len(), 3);
    let drained: Vec<Action> = queue.drain().collect();
    assert_eq!(drained, vec![Action::Move(1, 0), Action::Wait, Action::Move(0, -1)]);
    assert!(queue.is_empty());
}

#[test]
fn events_drain_in_send_order() {
    let mut events: Events<String> = Events::new();
    events.send("the goblin hits you".into());
    events.send("you die".into());

    assert_eq!(events.len(), 2);
    let drained: Vec<String> = events.drain().collect();
    assert_eq!(drained, vec!["the goblin hits you", "you die"]);
    assert!(events.is_empty());
}

#[test]
fn render_buffer_drains_in_paint_order() {
    let mut buffer = RenderBuffer::new();
    buffer.push(DrawCommand { x: 3, y: 1, glyph: Glyph::new('@', "white"), layer: 1 });
    buffer.push(DrawCommand { x: 0, y: 0, glyph: Glyph::new('#', "gray"), layer: 0 });
    buffer.push(DrawCommand { x: 1, y: 1, glyph: Glyph::new('.', "gray"), layer: 0 });
    buffer.push(DrawCommand { x: 0, y: 1, glyph: Glyph::new('.', "gray"), layer: 0 });

    let frame = buffer.drain_sorted();
    let order: Vec<(u8, i32, i32)> = frame.iter().map(|c| (c.layer, c.y, c.x)).collect();
    assert_eq!(order, vec![(0, 0, 0), (0, 1, 0), (0, 1, 1), (1, 1, 3)]);
    assert!(buffer.is_empty());
}

#[test]
fn camera_follows_with_edge_clamping() {
    let mut camera = Camera::new(10, 8, 40, 30);

    camera.follow(20, 15);
    assert_eq!((camera.x, camera.y), (15, 11));
    assert!(camera.is_visible(20, 15));
    assert_eq!(camera.world_to_screen(20, 15), (5, 4));
    assert_eq!(camera.screen_to_world(5, 4), (20, 15));

    camera.follow(0, 0);
    assert_eq!((camera.x, camera.y), (0, 0), "clamped at the map origin");

    camera.follow(40, 30);
    assert_eq!((camera.x, camera.y), (30, 22), "clamped at the far edge");
    assert_eq!(camera.visible_bounds(), (30, 22, 40, 30));
}

#[test]
fn camera_on_map_smaller_than_viewport_stays_at_origin() {
    let mut camera = Camera::new(20, 20, 10, 10);
    camera.follow(5, 5);
    assert_eq!((camera.x, camera.y), (0, 0));
    assert_eq!(camera.visible_bounds(), (0, 0, 10, 10));
}
