//! Fractal-noise height sampling — the non-recursive terrain variant.
//!
//! Instead of subdividing the grid, this sampler displaces every lattice
//! point by an FBM (fractional Brownian motion) noise sample taken at the
//! point's normalized UV position, scaled by the configured gain.  With
//! amplitude damping enabled the gain is divided by the noise frequency,
//! which keeps the rate of change of adjacent harmonic amplitudes constant
//! as the frequency is raised.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::grid::HeightGrid;

/// Configures a [`FractalSampler`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FractalConfig {
    pub seed: u32,
    /// Spatial frequency of the noise — higher values pack more relief into
    /// the same grid.
    pub frequency: f64,
    /// Octaves for the FBM layer.
    pub octaves: usize,
}

impl Default for FractalConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            frequency: 4.0,
            octaves: 6,
        }
    }
}

/// Samples an FBM noise field over a [`HeightGrid`].
pub struct FractalSampler {
    noise: Fbm<Perlin>,
    frequency: f64,
}

impl FractalSampler {
    /// Build the FBM source from a configuration.
    pub fn new(config: &FractalConfig) -> Self {
        let noise: Fbm<Perlin> = Fbm::new(config.seed).set_octaves(config.octaves);
        Self {
            noise,
            frequency: config.frequency,
        }
    }

    /// Displace every grid elevation by a noise sample scaled by `gain`.
    ///
    /// Lattice X/Z coordinates are preserved.  `amplitude_damp` divides the
    /// gain by the noise frequency so higher-frequency configurations do not
    /// also get taller.
    pub fn displace(&self, grid: &mut HeightGrid, gain: f32, amplitude_damp: bool) {
        let side = grid.side();
        let n = (side - 1).max(1) as f64;
        let g = if amplitude_damp {
            gain / self.frequency as f32
        } else {
            gain
        };

        for z in 0..side {
            for x in 0..side {
                let u = x as f64 / n * self.frequency;
                let v = z as f64 / n * self.frequency;
                let sample = self.noise.get([u, v]) as f32;
                grid.set_elevation(x, z, sample * g);
            }
        }
    }
}
