//! `bevy_symbios_terrain` — procedural terrain mesh synthesis for Bevy.
//!
//! # Architecture
//! A [`TerrainBuilder`] turns a [`TerrainConfig`] into [`MeshBuffers`] in one
//! pull-based pass: a height grid is synthesized (recursive diamond-square
//! subdivision or FBM fractal sampling), optionally smoothed by a cached
//! Gaussian [`GaussianFilter`] restricted to a [`Roi`], then tessellated in
//! raster order.  Call [`buffers_to_mesh`] to upload the buffers into a Bevy
//! [`Mesh`](bevy::mesh::Mesh), or spawn a [`PendingTerrain`] task for
//! non-blocking generation.
//!
//! Grids are square with side `2^k + 1`; the power-of-two cell count is what
//! lets diamond-square subdivision terminate exactly on integer lattice
//! coordinates instead of counting depth.

pub mod async_gen;
pub mod diamond;
pub mod filter;
pub mod fractal;
pub mod grid;
pub mod kernel;
pub mod mesh;
pub mod terrain;

pub use async_gen::{PendingTerrain, TerrainReady};
pub use filter::{GaussianFilter, HeightGridFilter, Roi};
pub use grid::HeightGrid;
pub use kernel::GaussianKernel;
pub use mesh::{MeshBuffers, VertexLayout, buffers_to_mesh};
pub use terrain::{
    DiamondSquareConfig, TerrainBuilder, TerrainConfig, TerrainError, TerrainKind,
};

use bevy::prelude::*;

/// Bevy plugin — registers the async-generation polling system.
pub struct SymbiosTerrainPlugin;

impl Plugin for SymbiosTerrainPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, async_gen::poll_terrain_tasks);
    }
}
