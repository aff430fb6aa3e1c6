//! Normalized 2D Gaussian convolution kernels.
//!
//! A kernel is built once per (size, sigma) configuration and cached by the
//! filter that owns it.  Weights follow the isotropic Gaussian
//!
//! ```text
//! w[x][y] = 1 / (2π·σ²) · exp(-((x-c)² + (y-c)²) / (2σ²)),   c = (size-1)/2
//! ```
//!
//! then the whole table is renormalized so the weights sum to exactly 1.0
//! (the analytic prefactor alone undershoots because the tails are truncated
//! at the kernel border).
//!
//! There is no error path here: an even `size` is representable and the
//! filter treats it as a no-op, so the generator does not reject it.

use std::f32::consts::PI;

/// An odd-sided square table of non-negative weights summing to 1.0.
#[derive(Clone, Debug)]
pub struct GaussianKernel {
    weights: Vec<f32>,
    side: usize,
}

impl GaussianKernel {
    /// Build a `side × side` Gaussian kernel with standard deviation `sigma`.
    ///
    /// Pure and deterministic.  Callers are expected to pass an odd `side`
    /// and a positive `sigma`; the filter defines the even-side behavior
    /// (no work performed).
    pub fn new(side: usize, sigma: f32) -> Self {
        let mut weights = vec![0.0f32; side * side];

        let a = 1.0 / (2.0 * PI * sigma * sigma);
        let b = 2.0 * sigma * sigma;
        let c = (side as f32 - 1.0) / 2.0;

        let mut sum = 0.0f32;
        for y in 0..side {
            for x in 0..side {
                let dx = x as f32 - c;
                let dy = y as f32 - c;
                let w = a * (-(dx * dx + dy * dy) / b).exp();
                weights[y * side + x] = w;
                sum += w;
            }
        }

        for w in &mut weights {
            *w /= sum;
        }

        Self { weights, side }
    }

    /// Side length of the kernel table.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Weight at kernel cell `(x, y)`.
    #[inline]
    pub fn weight(&self, x: usize, y: usize) -> f32 {
        self.weights[y * self.side + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Weights must sum to 1.0 for any odd size and positive sigma.
    #[test]
    fn weights_sum_to_one() {
        for side in [1, 3, 5, 7, 9] {
            for sigma in [0.5f32, 1.0, 2.0, 10.0] {
                let kernel = GaussianKernel::new(side, sigma);
                let sum: f32 = (0..side)
                    .flat_map(|y| (0..side).map(move |x| (x, y)))
                    .map(|(x, y)| kernel.weight(x, y))
                    .sum();
                assert!(
                    (sum - 1.0).abs() < 1e-5,
                    "kernel {side}×{side} σ={sigma} sums to {sum}"
                );
            }
        }
    }

    /// The table is radially symmetric about its center.
    #[test]
    fn radially_symmetric() {
        let side = 7;
        let kernel = GaussianKernel::new(side, 1.3);
        for y in 0..side {
            for x in 0..side {
                let mirrored = kernel.weight(side - 1 - x, side - 1 - y);
                assert!(
                    (kernel.weight(x, y) - mirrored).abs() < 1e-7,
                    "asymmetry at ({x}, {y})"
                );
            }
        }
    }

    /// A 1×1 kernel degenerates to a single weight of 1.0.
    #[test]
    fn single_cell_kernel_is_identity() {
        let kernel = GaussianKernel::new(1, 1.0);
        assert!((kernel.weight(0, 0) - 1.0).abs() < 1e-6);
    }

    /// Larger sigma flattens the distribution: the center weight shrinks.
    #[test]
    fn larger_sigma_flattens() {
        let tight = GaussianKernel::new(5, 0.5);
        let loose = GaussianKernel::new(5, 3.0);
        assert!(tight.weight(2, 2) > loose.weight(2, 2));
    }
}
