//! Benchmarks for CPU stepping and classification.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dustlight::{LightVolume, ParticleStore, Shear, Vec3, VolumeIntegrator, DEFAULT_PARALLEL_THRESHOLD};

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    for count in [10_000u32, 100_000, 700_000] {
        let store = ParticleStore::initialize(count, Vec3::splat(100.0), 1).unwrap();

        group.bench_with_input(BenchmarkId::new("sequential", count), &store, |b, store| {
            let mut store = store.clone();
            let mut integrator = VolumeIntegrator::new(0.1, usize::MAX).unwrap();
            b.iter(|| black_box(integrator.step(&mut store, 0.016, 0.5)))
        });

        group.bench_with_input(BenchmarkId::new("parallel", count), &store, |b, store| {
            let mut store = store.clone();
            let mut integrator = VolumeIntegrator::new(0.1, 1).unwrap();
            b.iter(|| black_box(integrator.step(&mut store, 0.016, 0.5)))
        });
    }

    group.finish();
}

fn bench_respawn_heavy(c: &mut Criterion) {
    // A tiny room and fast drift: most particles respawn every frame.
    let store = ParticleStore::initialize(100_000, Vec3::splat(1.0), 2).unwrap();
    c.bench_function("step_respawn_heavy", |b| {
        let mut store = store.clone();
        let mut integrator = VolumeIntegrator::new(0.1, DEFAULT_PARALLEL_THRESHOLD).unwrap();
        b.iter(|| black_box(integrator.step(&mut store, 0.1, 50.0)))
    });
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let store = ParticleStore::initialize(100_000, Vec3::splat(100.0), 3).unwrap();
    let positions = store.position_vectors();

    let flat = LightVolume::axis_aligned(Vec3::ZERO, Vec3::new(50.0, 15.0, 15.0)).unwrap();
    group.bench_function("axis_aligned", |b| {
        b.iter(|| black_box(flat.count_inside(black_box(positions))))
    });

    let shear = Shear {
        xy: 0.4,
        zx: -0.2,
        ..Shear::IDENTITY
    };
    let sheared = LightVolume::new(Vec3::ZERO, Vec3::new(50.0, 15.0, 15.0), shear.matrix()).unwrap();
    group.bench_function("sheared", |b| {
        b.iter(|| black_box(sheared.count_inside(black_box(positions))))
    });

    group.bench_function("classify_all", |b| {
        b.iter(|| black_box(sheared.classify_all(black_box(positions))))
    });

    group.finish();
}

criterion_group!(benches, bench_step, bench_respawn_heavy, bench_classify);
criterion_main!(benches);
