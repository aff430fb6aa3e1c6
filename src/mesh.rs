//! Mesh-buffer assembly from a finished [`HeightGrid`].
//!
//! Walks the grid in raster order and emits parallel vertex buffers plus a
//! two-triangle-per-cell index list.  Normals are a single placeholder
//! direction and colors are placeholder white: the rendering collaborator
//! recomputes true normals from the triangulated mesh and assigns real
//! vertex colors.  [`buffers_to_mesh`] is that collaborator seam for Bevy —
//! it uploads the buffers into a [`Mesh`] and recomputes smooth normals.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, Mesh, PrimitiveTopology};

use crate::grid::HeightGrid;

/// How grid positions map into mesh space.
///
/// The two terrain variants differ in exactly this one respect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexLayout {
    /// Remap onto a centered unit square: `(col/N − ½, y, row/N − ½)`.
    /// Used by the fractal-sampled variant.
    CenteredUnit,
    /// Keep the grid's own lattice-space coordinates.  Used by the
    /// diamond-square variant.
    Lattice,
}

/// Parallel vertex buffers plus triangle indices, indexed `row * side + col`.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    /// Placeholder constant backward (−Z) direction per vertex.
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    /// Placeholder white; real colors come from the rendering collaborator.
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}

/// Tessellate a height grid of side `N + 1` into [`MeshBuffers`].
///
/// Every cell emits two triangles `(v, v+N+1, v+1)` and
/// `(v+1, v+N+1, v+N+2)` — this winding avoids back-face culling for the
/// chosen handedness — for a total of `6·N²` indices.
pub fn assemble(grid: &HeightGrid, layout: VertexLayout) -> MeshBuffers {
    let side = grid.side();
    let n = side - 1;
    let quantisation = 1.0 / n as f32;

    let vertex_count = side * side;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);
    let mut colors = Vec::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity(n * n * 6);

    for row in 0..side {
        for col in 0..side {
            let point = grid.get(col, row);

            positions.push(match layout {
                VertexLayout::CenteredUnit => [
                    col as f32 * quantisation - 0.5,
                    point.y,
                    row as f32 * quantisation - 0.5,
                ],
                VertexLayout::Lattice => [point.x, point.y, point.z],
            });
            uvs.push([col as f32 * quantisation, row as f32 * quantisation]);
            normals.push([0.0, 0.0, -1.0]);
            colors.push([1.0, 1.0, 1.0, 1.0]);

            if row < n && col < n {
                let v = (row * side + col) as u32;
                let w = n as u32;
                indices.extend_from_slice(&[v, v + w + 1, v + 1]);
                indices.extend_from_slice(&[v + 1, v + w + 1, v + w + 2]);
            }
        }
    }

    MeshBuffers {
        positions,
        normals,
        uvs,
        colors,
        indices,
    }
}

/// Upload [`MeshBuffers`] into a Bevy [`Mesh`].
///
/// Takes `buffers` by value to move each buffer directly into the mesh
/// attribute storage.  Smooth per-vertex normals are recomputed from the
/// triangulated geometry, replacing the assembler's placeholder direction.
pub fn buffers_to_mesh(buffers: MeshBuffers) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, buffers.positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, buffers.normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, buffers.uvs);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, buffers.colors);
    mesh.insert_indices(Indices::U32(buffers.indices));
    mesh.compute_smooth_normals();
    mesh
}
