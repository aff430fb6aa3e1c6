use std::hint::black_box;

use bevy_symbios_terrain::filter::{GaussianFilter, HeightGridFilter, Roi};
use bevy_symbios_terrain::grid::HeightGrid;
use bevy_symbios_terrain::terrain::{
    DiamondSquareConfig, TerrainBuilder, TerrainConfig, TerrainKind,
};
use bevy_symbios_terrain::fractal::FractalConfig;
use criterion::{Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn bench_diamond_square(c: &mut Criterion) {
    let config = TerrainConfig {
        grid_size: 128,
        kind: TerrainKind::DiamondSquare(DiamondSquareConfig::default()),
        ..TerrainConfig::default()
    };
    c.bench_function("diamond_square_128", |b| {
        b.iter(|| TerrainBuilder::new(black_box(config.clone())).generate())
    });
}

fn bench_fractal(c: &mut Criterion) {
    let config = TerrainConfig {
        grid_size: 128,
        kind: TerrainKind::Fractal(FractalConfig::default()),
        ..TerrainConfig::default()
    };
    c.bench_function("fractal_128", |b| {
        b.iter(|| TerrainBuilder::new(black_box(config.clone())).generate())
    });
}

fn bench_gaussian_filter(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let mut grid = HeightGrid::new(129);
    for z in 0..129 {
        for x in 0..129 {
            grid.set_elevation(x, z, rng.random_range(-1.0..1.0));
        }
    }
    let filter = GaussianFilter::new(5, 1.5);
    c.bench_function("gaussian_filter_129x129_k5", |b| {
        b.iter(|| filter.smooth(black_box(&grid), Roi::FULL))
    });
}

criterion_group!(
    benches,
    bench_diamond_square,
    bench_fractal,
    bench_gaussian_filter
);
criterion_main!(benches);
