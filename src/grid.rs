//! Flat height-grid storage shared by the synthesizer, filter and mesher.
//!
//! A [`HeightGrid`] is a square lattice of side `N + 1` (N a power of two,
//! required for diamond-square subdivision to bottom out exactly on integer
//! coordinates).  Each point stores its own lattice position in X/Z and its
//! elevation in Y, matching what the subdivision step reads back when it
//! averages corner points.  Storage is a single row-major `Vec<Vec3>` indexed
//! `row * side + col`; the grid is owned exclusively by one generation pass
//! and mutated in place by both the synthesizer and the filter.

use bevy::math::Vec3;

/// A square lattice of terrain points, row-major, indexed by `(x, z)`.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightGrid {
    points: Vec<Vec3>,
    side: usize,
}

impl HeightGrid {
    /// Create a zero-elevation grid with lattice coordinates pre-filled.
    ///
    /// Every point starts as `(x, 0, z)` so that averaging untouched points
    /// still yields meaningful lattice positions.
    pub fn new(side: usize) -> Self {
        let mut points = Vec::with_capacity(side * side);
        for z in 0..side {
            for x in 0..side {
                points.push(Vec3::new(x as f32, 0.0, z as f32));
            }
        }
        Self { points, side }
    }

    /// Side length of the grid (`N + 1`).
    pub fn side(&self) -> usize {
        self.side
    }

    /// Point at lattice position `(x, z)`.
    #[inline]
    pub fn get(&self, x: usize, z: usize) -> Vec3 {
        self.points[z * self.side + x]
    }

    /// Overwrite the point at lattice position `(x, z)`.
    #[inline]
    pub fn set(&mut self, x: usize, z: usize, point: Vec3) {
        self.points[z * self.side + x] = point;
    }

    /// Elevation (Y component) at lattice position `(x, z)`.
    #[inline]
    pub fn elevation(&self, x: usize, z: usize) -> f32 {
        self.get(x, z).y
    }

    /// Replace only the elevation at `(x, z)`, preserving lattice X/Z.
    #[inline]
    pub fn set_elevation(&mut self, x: usize, z: usize, y: f32) {
        self.points[z * self.side + x].y = y;
    }

    /// Row-major view of all points.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_coordinates_prefilled() {
        let grid = HeightGrid::new(5);
        for z in 0..5 {
            for x in 0..5 {
                let p = grid.get(x, z);
                assert_eq!(p, Vec3::new(x as f32, 0.0, z as f32));
            }
        }
    }

    #[test]
    fn set_elevation_preserves_lattice_position() {
        let mut grid = HeightGrid::new(3);
        grid.set_elevation(2, 1, 7.5);
        assert_eq!(grid.get(2, 1), Vec3::new(2.0, 7.5, 1.0));
    }
}
