//! Recursive diamond-square height-field synthesis.
//!
//! Classical diamond-square alternates a "square" pass (corners → center)
//! and a "diamond" pass (edge midpoints) over an iteration count derived
//! from grid resolution.  This implementation instead recurses directly on
//! sub-squares and folds both passes into one call: compute the center from
//! the four seed corners, build four diamonds around it, perturb their
//! midpoints, then recurse into the four child quadrants with the amplitude
//! halved.  Termination is not a depth counter — the recursion bottoms out
//! when repeated halving produces a candidate center with non-integer
//! lattice coordinates, i.e. the sub-square has been subdivided past the
//! grid's resolution.
//!
//! Sibling sub-squares recompute their shared edge midpoints redundantly;
//! those writes are idempotent because each midpoint is derived from the
//! same two corner values.  Only the clipped, non-wrapping 4-seed variant is
//! implemented; wrap-around seeding produces discontinuities at child
//! boundaries and is deliberately left out.
//!
//! One uniform draw in `[-scale, +scale]` perturbs each diamond midpoint.
//! The corner sort and the diamond/child ordering below fix the draw order,
//! so a seeded [`Rng`] makes the whole synthesis reproducible.

use bevy::math::Vec3;
use rand::Rng;

use crate::grid::HeightGrid;

/// Fractal subdivision over a square grid of side `2^k + 1`.
pub struct DiamondSquareSynthesizer;

impl DiamondSquareSynthesizer {
    /// Populate `grid` from its four corner points.
    ///
    /// Corners are seeded at zero elevation on the grid's own lattice, then
    /// the interior is filled by recursive subdivision.  `amplitude` is the
    /// top-level perturbation scale and must be non-negative (the uniform
    /// draw spans `[-scale, +scale]`; [`crate::terrain::TerrainBuilder`]
    /// rejects negative values before calling in).  It halves at each
    /// recursion level, giving the characteristic self-similar roughness
    /// decay.  The random source is injectable so tests can seed it.
    pub fn synthesize<R: Rng>(grid: &mut HeightGrid, amplitude: f32, rng: &mut R) {
        let max = (grid.side() - 1) as f32;
        let seeds = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, max),
            Vec3::new(max, 0.0, 0.0),
            Vec3::new(max, 0.0, max),
        ];
        for seed in seeds {
            grid.set(seed.x as usize, seed.z as usize, seed);
        }
        subdivide(grid, seeds, amplitude, rng);
    }
}

/// Mean of the four seed points, component-wise.
fn average(points: &[Vec3]) -> Vec3 {
    points.iter().copied().sum::<Vec3>() / points.len() as f32
}

fn subdivide<R: Rng>(grid: &mut HeightGrid, seeds: [Vec3; 4], scale: f32, rng: &mut R) {
    let center = average(&seeds);

    // Base case: the candidate center no longer resolves to a lattice cell.
    if center.x.fract() != 0.0 || center.z.fract() != 0.0 {
        return;
    }

    grid.set(center.x as usize, center.z as usize, center);

    // Canonical corner order: ascending L1 distance from the origin gives
    // nearest, two middle, farthest.  The diamond assignment below depends
    // on this order being identical regardless of how the seeds arrived.
    let mut sorted = seeds;
    sorted.sort_by(|a, b| (a.x.abs() + a.z.abs()).total_cmp(&(b.x.abs() + b.z.abs())));

    // Each diamond pairs two adjacent corners; its midpoint excludes the
    // center from the mean and takes one uniform elevation perturbation.
    let pairs = [(0usize, 1usize), (0, 2), (3, 1), (3, 2)];
    let mut midpoints = [Vec3::ZERO; 4];
    for (diamond, &(a, b)) in pairs.iter().enumerate() {
        let mut mid = (sorted[a] + sorted[b]) / 2.0;
        mid.y += rng.random_range(-scale..=scale);
        grid.set(mid.x as usize, mid.z as usize, mid);
        midpoints[diamond] = mid;
    }

    // Child quadrants: one original corner, two adjacent diamond midpoints,
    // the shared center.  Order fixes the RNG draw sequence.
    let half = scale / 2.0;
    subdivide(grid, [sorted[0], midpoints[0], midpoints[1], center], half, rng);
    subdivide(grid, [sorted[1], midpoints[0], midpoints[2], center], half, rng);
    subdivide(grid, [sorted[3], midpoints[2], midpoints[3], center], half, rng);
    subdivide(grid, [sorted[2], midpoints[1], midpoints[3], center], half, rng);
}
