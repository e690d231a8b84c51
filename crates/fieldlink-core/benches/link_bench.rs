use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fieldlink_core::{Location, Registry, RegistryConfig, TeamId};

const RED: TeamId = TeamId::new(1);

/// Red beacons on an n x n grid with a small jitter so few triples are collinear.
fn grid(n: i32) -> (Registry, Vec<Location>) {
    let mut registry = Registry::new();
    let mut placed = Vec::new();
    for x in 0..n {
        for z in 0..n {
            let at = Location::new(x * 100 + (z % 3) * 7, z * 100 + (x % 5) * 3);
            placed.push(registry.register_beacon(at, 64, Some(RED)).unwrap());
        }
    }
    (registry, placed)
}

/// Links each beacon to its right and lower neighbours and the lower-right
/// diagonal, closing two triangles per grid cell.
fn link_mesh(registry: &mut Registry, placed: &[Location], n: usize) {
    for x in 0..n - 1 {
        for z in 0..n - 1 {
            let here = placed[x * n + z];
            registry.add_outbound_link(here, placed[(x + 1) * n + z]).unwrap();
            registry.add_outbound_link(here, placed[x * n + z + 1]).unwrap();
            registry.add_outbound_link(here, placed[(x + 1) * n + z + 1]).unwrap();
        }
    }
}

fn bench_link_mesh(c: &mut Criterion) {
    // 10x10 keeps the enemy scan cheap enough to iterate quickly
    let (registry, placed) = grid(10);

    c.bench_function("link_mesh_10x10", |b| {
        b.iter(|| {
            let mut registry = registry.clone();
            link_mesh(&mut registry, &placed, 10);
            black_box(registry.score(RED))
        })
    });
}

fn bench_release_cascade(c: &mut Criterion) {
    let (mut registry, placed) = grid(10);
    link_mesh(&mut registry, &placed, 10);
    let centre = placed[5 * 10 + 5];

    c.bench_function("release_cascade", |b| {
        b.iter(|| {
            let mut registry = registry.clone();
            black_box(registry.release_beacon(centre).unwrap())
        })
    });
}

fn bench_snapshot_replay(c: &mut Criterion) {
    let (mut registry, placed) = grid(10);
    link_mesh(&mut registry, &placed, 10);
    let snapshot = registry.snapshot();

    c.bench_function("snapshot_replay", |b| {
        b.iter(|| {
            black_box(Registry::from_snapshot(black_box(&snapshot), RegistryConfig::default()).unwrap())
        })
    });
}

criterion_group!(benches, bench_link_mesh, bench_release_cascade, bench_snapshot_replay);
criterion_main!(benches);
