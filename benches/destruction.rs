use criterion::{Criterion, black_box, criterion_group, criterion_main};

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;

use voxblast::core::config::WorldLimits;
use voxblast::destruction::diff::SectionDiffMap;
use voxblast::destruction::{Blast, MaterialDamage, carve};
use voxblast::math::coords::{LocalIndex, SectionPos, VoxelPos};
use voxblast::world::MemoryGrid;
use voxblast::world::section::VoxelState;

fn solid_world(extent: i32) -> MemoryGrid {
    let mut grid = MemoryGrid::new(WorldLimits::new(-64, 320));
    grid.fill(
        VoxelPos::new(-extent, 0, -extent),
        VoxelPos::new(extent, 70, extent),
        VoxelState::solid(1),
    );
    grid
}

fn bench_carve_size_10(c: &mut Criterion) {
    let grid = solid_world(48);
    let damage = MaterialDamage::uniform(0.5);
    let blast = Blast::new(Vec3::new(0.5, 70.5, 0.5), 10);

    c.bench_function("carve_size_10", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            carve(black_box(&grid), black_box(&blast), &damage, &mut rng)
        });
    });
}

fn bench_carve_size_30(c: &mut Criterion) {
    let grid = solid_world(96);
    let damage = MaterialDamage::uniform(0.5);
    let blast = Blast::new(Vec3::new(0.5, 70.5, 0.5), 30);

    c.bench_function("carve_size_30", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            carve(black_box(&grid), black_box(&blast), &damage, &mut rng)
        });
    });
}

fn bench_carve_open_air(c: &mut Criterion) {
    // Mostly-empty world: measures the empty-section fast path.
    let grid = solid_world(16);
    let damage = MaterialDamage::uniform(0.5);
    let blast = Blast::new(Vec3::new(0.5, 200.5, 0.5), 30);

    c.bench_function("carve_open_air_size_30", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            carve(black_box(&grid), black_box(&blast), &damage, &mut rng)
        });
    });
}

fn bench_accumulator_mark(c: &mut Criterion) {
    c.bench_function("accumulator_mark_full_section", |b| {
        b.iter(|| {
            let mut diffs = SectionDiffMap::new();
            let section = SectionPos::new(0, 4, 0);
            for local in LocalIndex::all() {
                diffs.mark(section, black_box(local));
            }
            diffs
        });
    });
}

criterion_group!(
    benches,
    bench_carve_size_10,
    bench_carve_size_30,
    bench_carve_open_air,
    bench_accumulator_mark
);
criterion_main!(benches);
