use criterion::{black_box, criterion_group, criterion_main, Criterion};
use physics_sandbox::{
    math::vec2::Vec2,
    objects::RigidBody,
    world::{PhysicsWorld, SpawnRequest},
};

const HEIGHT: f64 = 800.0;

fn ground_world() -> PhysicsWorld {
    let mut world = PhysicsWorld::new(60, Vec2::new(0.0, 100.0), HEIGHT);
    world.add_body(RigidBody::half_space(Vec2::new(0.0, 700.0), 0.0));
    world.add_body(RigidBody::half_space(Vec2::new(0.0, 0.0), 90.0));
    world
}

// --- Helper for piling projectiles onto the ground ---
fn run_projectile_pile_bench(world: &mut PhysicsWorld, num_projectiles: usize) {
    for i in 0..num_projectiles {
        let column = (i % 20) as f64;
        let row = (i / 20) as f64;
        let position = Vec2::new(50.0 + column * 62.0, 640.0 - row * 62.0);
        let request = if i % 3 == 0 {
            SpawnRequest::block(position, 2.0, 0.5, Vec2::ZERO)
        } else {
            SpawnRequest::circle(position, 1.0, 0.5, Vec2::new(10.0, 0.0))
        };
        world.spawn(request);
    }

    // Simulate for a fixed number of steps
    let steps = 30;
    for _ in 0..steps {
        world.step();
    }
    black_box(world.dynamic_count());
}

// --- Helper for a burst of launches hitting each other mid-air ---
fn run_launch_burst_bench(world: &mut PhysicsWorld, num_projectiles: usize) {
    for i in 0..num_projectiles {
        let angle = 20.0 + (i % 40) as f64 * 3.0;
        let velocity = Vec2::new(350.0, 0.0).rotate_degrees(-angle);
        world.spawn(SpawnRequest::circle(Vec2::new(200.0, 650.0), 1.0, 0.1, velocity));
        world.step();
    }
}

fn bench_projectile_pile(c: &mut Criterion) {
    let mut group = c.benchmark_group("projectile_pile");

    for num_projectiles in [10, 100, 300].iter() {
        group.bench_with_input(criterion::BenchmarkId::from_parameter(num_projectiles), num_projectiles, |b, &n| {
            b.iter(|| {
                let mut world = ground_world();
                run_projectile_pile_bench(&mut world, black_box(n));
            });
        });
    }
    group.finish();
}

fn bench_launch_burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("launch_burst");

    for num_projectiles in [10, 100].iter() {
        group.bench_with_input(criterion::BenchmarkId::from_parameter(num_projectiles), num_projectiles, |b, &n| {
            b.iter(|| {
                let mut world = ground_world();
                run_launch_burst_bench(&mut world, black_box(n));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_projectile_pile, bench_launch_burst);
criterion_main!(benches);
