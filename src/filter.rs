//! Kernel-based spatial smoothing over a [`HeightGrid`].
//!
//! The filter runs a direct (non-separable) 2D convolution of the elevation
//! component only; lattice X/Z coordinates pass through untouched.  Work is
//! confined to a rectangular region: by default the whole grid minus a
//! one-kernel-radius margin, optionally shrunk further by a caller-supplied
//! [`Roi`].  Points outside the processed region are copied verbatim, so the
//! output grid always has the same size as the input.
//!
//! Correctness over speed: each processed point costs O(side²) kernel taps.
//! There are no error paths — an even-sided kernel means no work, and
//! out-of-range ROIs are silently clamped to the safe bounds.

use serde::{Deserialize, Serialize};

use crate::{grid::HeightGrid, kernel::GaussianKernel};

/// Inclusive rectangular region of interest for smoothing.
///
/// The all-zero value ([`Roi::FULL`]) selects the default safe bounds (the
/// whole grid clipped by one kernel radius).  A non-degenerate ROI can only
/// shrink the processed region, never grow it past the margin that keeps
/// every kernel tap inside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    /// Inclusive (min, max) bounds along the X axis.
    pub x: (usize, usize),
    /// Inclusive (min, max) bounds along the Z axis.
    pub y: (usize, usize),
}

impl Roi {
    /// Degenerate ROI meaning "whole grid, clipped to the kernel margin."
    pub const FULL: Roi = Roi {
        x: (0, 0),
        y: (0, 0),
    };

    /// True when all four bounds are zero and the default bounds apply.
    pub fn is_degenerate(&self) -> bool {
        *self == Roi::FULL
    }
}

impl Default for Roi {
    fn default() -> Self {
        Roi::FULL
    }
}

/// Capability: smooth a height grid, optionally ROI-bounded.
pub trait HeightGridFilter {
    /// Produce a smoothed copy of `grid`.  Must not resize the grid.
    fn smooth(&self, grid: &HeightGrid, roi: Roi) -> HeightGrid;
}

/// Gaussian smoothing filter with a cached kernel.
///
/// The kernel is built once at construction and reused across every
/// [`smooth`](HeightGridFilter::smooth) call, so reconfiguring size or sigma
/// means constructing a new filter.
#[derive(Clone, Debug)]
pub struct GaussianFilter {
    kernel: GaussianKernel,
}

impl GaussianFilter {
    /// Build a filter around a `kernel_length × kernel_length` Gaussian
    /// kernel with standard deviation `sigma`.
    pub fn new(kernel_length: usize, sigma: f32) -> Self {
        Self {
            kernel: GaussianKernel::new(kernel_length, sigma),
        }
    }

    /// The cached kernel.
    pub fn kernel(&self) -> &GaussianKernel {
        &self.kernel
    }
}

impl HeightGridFilter for GaussianFilter {
    fn smooth(&self, grid: &HeightGrid, roi: Roi) -> HeightGrid {
        let side = self.kernel.side();
        let mut out = grid.clone();

        // Even kernels have no center cell; defined as a no-op.
        if side % 2 == 0 {
            return out;
        }

        let l = grid.side() as i64;
        let k = side as i64;
        let offset = (k - 1) / 2;

        // Default safe bounds keep every kernel tap inside the grid; the
        // upper bound is additionally clamped to the last lattice index so a
        // 1×1 kernel cannot step past the final row/column.
        let mut min_x = offset;
        let mut min_y = offset;
        let mut max_x = (l - offset - k / 2).min(l - 1);
        let mut max_y = max_x;

        if !roi.is_degenerate() {
            // Saturating conversion: bounds past i64::MAX are already far
            // outside any addressable grid and just collapse the range.
            let clamp = |bound: usize| i64::try_from(bound).unwrap_or(i64::MAX);
            min_x = min_x.max(clamp(roi.x.0));
            min_y = min_y.max(clamp(roi.y.0));
            max_x = max_x.min(clamp(roi.x.1));
            max_y = max_y.min(clamp(roi.y.1));
        }

        // Oversized kernels or fully-out-of-range ROIs collapse the bounds;
        // nothing to do.
        if min_x > max_x || min_y > max_y {
            return out;
        }

        for v in min_y..=max_y {
            for u in min_x..=max_x {
                let mut value = 0.0f32;
                for y in 0..side {
                    for x in 0..side {
                        let sx = (u + x as i64 - offset) as usize;
                        let sz = (v + y as i64 - offset) as usize;
                        value += self.kernel.weight(x, y) * grid.elevation(sx, sz);
                    }
                }
                out.set_elevation(u as usize, v as usize, value);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn bumpy_grid(side: usize, seed: u64) -> HeightGrid {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = HeightGrid::new(side);
        for z in 0..side {
            for x in 0..side {
                grid.set_elevation(x, z, rng.random_range(-1.0..1.0));
            }
        }
        grid
    }

    /// An even-sided kernel performs no work at all.
    #[test]
    fn even_kernel_is_a_no_op() {
        let grid = bumpy_grid(9, 1);
        let filter = GaussianFilter::new(4, 1.0);
        assert_eq!(filter.smooth(&grid, Roi::FULL), grid);
    }

    /// A point-mass kernel (center weight 1, rest 0) leaves the grid intact.
    ///
    /// A tiny sigma makes every off-center Gaussian weight underflow to zero,
    /// so after normalization the kernel is exactly a point mass.
    #[test]
    fn point_mass_kernel_is_identity() {
        let grid = bumpy_grid(9, 2);
        let filter = GaussianFilter::new(3, 1e-3);
        assert!((filter.kernel().weight(1, 1) - 1.0).abs() < 1e-6);
        assert_eq!(filter.smooth(&grid, Roi::FULL), grid);
    }

    /// Smoothing never touches lattice X/Z, only elevation.
    #[test]
    fn lattice_coordinates_survive_smoothing() {
        let grid = bumpy_grid(9, 3);
        let filter = GaussianFilter::new(3, 1.0);
        let smoothed = filter.smooth(&grid, Roi::FULL);
        for z in 0..9 {
            for x in 0..9 {
                let p = smoothed.get(x, z);
                assert_eq!(p.x, x as f32);
                assert_eq!(p.z, z as f32);
            }
        }
    }

    /// The margin points are copied verbatim; interior points change.
    #[test]
    fn margin_copied_verbatim() {
        let grid = bumpy_grid(9, 4);
        let filter = GaussianFilter::new(3, 1.0);
        let smoothed = filter.smooth(&grid, Roi::FULL);
        // Border row/column lie outside the default safe bounds [1, 7].
        for i in 0..9 {
            assert_eq!(smoothed.get(i, 0), grid.get(i, 0));
            assert_eq!(smoothed.get(0, i), grid.get(0, i));
            assert_eq!(smoothed.get(i, 8), grid.get(i, 8));
            assert_eq!(smoothed.get(8, i), grid.get(8, i));
        }
        assert_ne!(smoothed, grid);
    }

    /// An ROI fully outside the safe bounds modifies nothing.
    #[test]
    fn roi_outside_safe_bounds_modifies_nothing() {
        let grid = bumpy_grid(9, 5);
        let filter = GaussianFilter::new(3, 1.0);
        let roi = Roi {
            x: (8, 8),
            y: (8, 8),
        };
        assert_eq!(filter.smooth(&grid, roi), grid);
    }

    /// A partially-overlapping ROI is clamped: only the intersection with the
    /// safe bounds is modified.
    #[test]
    fn roi_partially_overlapping_is_clamped() {
        let grid = bumpy_grid(9, 6);
        let filter = GaussianFilter::new(3, 1.0);
        let roi = Roi {
            x: (0, 3),
            y: (2, 5),
        };
        let smoothed = filter.smooth(&grid, roi);
        // Intersection with safe bounds [1, 7] is x ∈ [1, 3], y ∈ [2, 5].
        let mut touched = 0;
        for z in 0..9usize {
            for x in 0..9usize {
                let inside = (1..=3).contains(&x) && (2..=5).contains(&z);
                if !inside {
                    assert_eq!(smoothed.get(x, z), grid.get(x, z), "({x}, {z})");
                } else if smoothed.get(x, z) != grid.get(x, z) {
                    touched += 1;
                }
            }
        }
        assert!(touched > 0, "clamped ROI should still smooth something");
    }

    /// Astronomically large ROI bounds are silently clamped — no arithmetic
    /// overflow, no out-of-range reads, nothing modified.
    #[test]
    fn huge_roi_bounds_are_clamped() {
        let grid = bumpy_grid(9, 8);
        let filter = GaussianFilter::new(3, 1.0);
        let roi = Roi {
            x: (usize::MAX, usize::MAX),
            y: (usize::MAX, usize::MAX),
        };
        assert!(!roi.is_degenerate());
        assert_eq!(filter.smooth(&grid, roi), grid);
    }

    /// A kernel wider than the grid collapses the bounds instead of reading
    /// out of range.
    #[test]
    fn oversized_kernel_is_a_no_op() {
        let grid = bumpy_grid(3, 7);
        let filter = GaussianFilter::new(7, 1.0);
        assert_eq!(filter.smooth(&grid, Roi::FULL), grid);
    }
}
