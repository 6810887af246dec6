use std::hint::black_box;

use criterion::*;
use rogue_ecs::{Bundle, World};

mod common;
use common::Position;

fn spawn_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("spawn");

    group.bench_function("spawn_10k_entities", |b| {
        b.iter(|| {
            let mut world = World::new();
            common::register_components(&mut world).expect("component registration failed");
            let position_id = world.component_id_of::<Position>().expect("registered");

            for i in 0..common::ENTITIES_MED {
                let bundle =
                    Bundle::new().with(position_id, Position { x: i as i32, y: 0 });
                world.commands().spawn(bundle);
            }
            world.apply_deferred().expect("flush failed in benchmark");

            black_box(world);
        });
    });

    group.bench_function("spawn_despawn_churn_10k", |b| {
        b.iter_batched(
            || common::setup_world(common::ENTITIES_MED).expect("world setup failed"),
            |mut world| {
                let query = world
                    .query_builder()
                    .with::<Position>()
                    .expect("registered")
                    .build()
                    .expect("valid query");
                let doomed: Vec<_> = world.query(&query).collect();
                for entity in doomed {
                    world.despawn(entity).expect("despawn failed");
                }
                for _ in 0..common::ENTITIES_MED {
                    black_box(world.spawn());
                }
                black_box(world);
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, spawn_benchmark);
criterion_main!(benches);
