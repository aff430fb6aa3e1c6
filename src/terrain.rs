//! Terrain orchestration: synthesize → (optionally) smooth → assemble.
//!
//! [`TerrainBuilder`] owns a [`TerrainConfig`] and turns it into
//! [`MeshBuffers`] on demand.  Regeneration is pull-based: every parameter
//! setter mutates the config and immediately reruns [`TerrainBuilder::generate`],
//! returning the fresh buffers — there are no engine callbacks driving
//! recomputation.  The Gaussian kernel is cached across generations and only
//! rebuilt when its size or sigma changes.

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    diamond::DiamondSquareSynthesizer,
    filter::{GaussianFilter, HeightGridFilter, Roi},
    fractal::{FractalConfig, FractalSampler},
    grid::HeightGrid,
    mesh::{MeshBuffers, VertexLayout, assemble},
};

/// Error returned when a terrain configuration violates a contract
/// precondition.
#[derive(Debug)]
pub enum TerrainError {
    /// `grid_size` was zero, which yields no cells to tessellate.
    ZeroGridSize,
    /// `grid_size` must be a power of two so diamond-square subdivision
    /// terminates exactly on integer lattice coordinates.
    GridSizeNotPowerOfTwo { size: usize },
    /// The filter was enabled with a non-positive sigma.
    NonPositiveSigma { sigma: f32 },
    /// The diamond-square perturbation amplitude was negative, which has no
    /// meaning for a `[-scale, +scale]` uniform draw.
    NegativeAmplitude { amplitude: f32 },
    /// The fractal noise frequency was non-positive.
    NonPositiveFrequency { frequency: f64 },
}

impl std::fmt::Display for TerrainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerrainError::ZeroGridSize => write!(f, "grid size must be non-zero"),
            TerrainError::GridSizeNotPowerOfTwo { size } => {
                write!(f, "grid size {size} is not a power of two")
            }
            TerrainError::NonPositiveSigma { sigma } => {
                write!(f, "filter sigma must be positive (got {sigma})")
            }
            TerrainError::NegativeAmplitude { amplitude } => {
                write!(f, "perturbation amplitude must be non-negative (got {amplitude})")
            }
            TerrainError::NonPositiveFrequency { frequency } => {
                write!(f, "noise frequency must be positive (got {frequency})")
            }
        }
    }
}

impl std::error::Error for TerrainError {}

/// Configures the diamond-square variant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiamondSquareConfig {
    /// Seed for the perturbation RNG; identical seeds reproduce identical
    /// height fields.
    pub seed: u64,
    /// Top-level perturbation scale, halved at each recursion level.
    pub amplitude: f32,
}

impl Default for DiamondSquareConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            amplitude: 0.25,
        }
    }
}

/// Which synthesis strategy populates the height grid.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Displace the grid by FBM noise samples; vertices are remapped onto a
    /// centered unit square.
    Fractal(FractalConfig),
    /// Recursive diamond-square subdivision; vertices keep raw lattice
    /// coordinates.
    DiamondSquare(DiamondSquareConfig),
}

/// Full terrain generation configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Number of cells per side (`N`); the lattice has `N + 1` points per
    /// side.  Must be a non-zero power of two.
    pub grid_size: usize,
    pub kind: TerrainKind,
    /// Elevation multiplier for the fractal variant, clamped to `[0, 2]`.
    pub gain: f32,
    /// Divide the fractal gain by the noise frequency.
    pub amplitude_damp: bool,
    /// Apply the Gaussian smoothing pass after synthesis.
    pub filter: bool,
    /// Gaussian kernel side length.  Even lengths make the filter a no-op.
    pub kernel_length: usize,
    /// Gaussian kernel sigma.  Must be positive while the filter is enabled.
    pub sigma: f32,
    /// Smoothing region of interest; [`Roi::FULL`] means the whole grid
    /// minus the kernel margin.
    pub roi: Roi,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            grid_size: 64,
            kind: TerrainKind::DiamondSquare(DiamondSquareConfig::default()),
            gain: 1.0,
            amplitude_damp: false,
            filter: false,
            kernel_length: 3,
            sigma: 1.0,
            roi: Roi::FULL,
        }
    }
}

/// Pull-based terrain generator with a cached smoothing kernel.
pub struct TerrainBuilder {
    config: TerrainConfig,
    filter: Option<GaussianFilter>,
}

impl TerrainBuilder {
    /// Create a builder around a configuration.  Validation happens in
    /// [`generate`](TerrainBuilder::generate).
    pub fn new(config: TerrainConfig) -> Self {
        Self {
            config,
            filter: None,
        }
    }

    /// The current configuration.
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Run one full generation pass: validate, synthesize the height grid,
    /// smooth it if enabled, and assemble mesh buffers.
    ///
    /// The pass is synchronous and single-threaded; the grid is owned
    /// exclusively for its duration.
    pub fn generate(&mut self) -> Result<MeshBuffers, TerrainError> {
        self.validate()?;

        let side = self.config.grid_size + 1;
        let mut grid = HeightGrid::new(side);

        let layout = match &self.config.kind {
            TerrainKind::Fractal(fractal) => {
                let sampler = FractalSampler::new(fractal);
                sampler.displace(&mut grid, self.config.gain, self.config.amplitude_damp);
                VertexLayout::CenteredUnit
            }
            TerrainKind::DiamondSquare(ds) => {
                let mut rng = StdRng::seed_from_u64(ds.seed);
                DiamondSquareSynthesizer::synthesize(&mut grid, ds.amplitude, &mut rng);
                VertexLayout::Lattice
            }
        };

        if self.config.filter {
            let filter = self.filter.get_or_insert_with(|| {
                GaussianFilter::new(self.config.kernel_length, self.config.sigma)
            });
            grid = filter.smooth(&grid, self.config.roi);
        }

        Ok(assemble(&grid, layout))
    }

    /// Set the fractal elevation gain (clamped to `[0, 2]`) and regenerate.
    pub fn set_gain(&mut self, gain: f32) -> Result<MeshBuffers, TerrainError> {
        self.config.gain = gain.clamp(0.0, 2.0);
        self.generate()
    }

    /// Toggle amplitude damping and regenerate.
    pub fn set_amplitude_damping(&mut self, damp: bool) -> Result<MeshBuffers, TerrainError> {
        self.config.amplitude_damp = damp;
        self.generate()
    }

    /// Enable or disable the smoothing pass and regenerate.
    pub fn set_filter_enabled(&mut self, enabled: bool) -> Result<MeshBuffers, TerrainError> {
        self.config.filter = enabled;
        self.generate()
    }

    /// Reconfigure the smoothing kernel and regenerate.
    ///
    /// Drops the cached kernel so the next pass rebuilds it.
    pub fn set_kernel(
        &mut self,
        kernel_length: usize,
        sigma: f32,
    ) -> Result<MeshBuffers, TerrainError> {
        self.config.kernel_length = kernel_length;
        self.config.sigma = sigma;
        self.filter = None;
        self.generate()
    }

    /// Restrict smoothing to a region of interest and regenerate.
    pub fn set_roi(&mut self, roi: Roi) -> Result<MeshBuffers, TerrainError> {
        self.config.roi = roi;
        self.generate()
    }

    fn validate(&self) -> Result<(), TerrainError> {
        if self.config.grid_size == 0 {
            return Err(TerrainError::ZeroGridSize);
        }
        if !self.config.grid_size.is_power_of_two() {
            return Err(TerrainError::GridSizeNotPowerOfTwo {
                size: self.config.grid_size,
            });
        }
        if self.config.filter && self.config.sigma <= 0.0 {
            return Err(TerrainError::NonPositiveSigma {
                sigma: self.config.sigma,
            });
        }
        match &self.config.kind {
            TerrainKind::DiamondSquare(ds) if ds.amplitude < 0.0 => {
                return Err(TerrainError::NegativeAmplitude {
                    amplitude: ds.amplitude,
                });
            }
            TerrainKind::Fractal(fractal) if fractal.frequency <= 0.0 => {
                return Err(TerrainError::NonPositiveFrequency {
                    frequency: fractal.frequency,
                });
            }
            _ => {}
        }
        Ok(())
    }
}
