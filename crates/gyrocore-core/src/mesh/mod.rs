//! Indexed mesh generation from a binary field
//!
//! Marching cubes with edge-vertex deduplication, optional
//! largest-component extraction, Taubin smoothing, and area-weighted
//! normal estimation.

mod component;
mod marching_cubes;
mod normals;
mod smooth;
mod tables;

pub(crate) use marching_cubes::Triangulation;
pub use marching_cubes::triangulate;
pub use tables::{EDGE_TABLE, TRI_TABLE};

pub(crate) use component::apply as extract_largest_component;
pub(crate) use normals::estimate_normals;
pub(crate) use smooth::taubin_smooth;

/// The generated mesh: structure-of-arrays buffers matching the
/// external `MeshData` contract (§6).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Flat xyz triples, one per unique vertex, world-space.
    pub positions: Vec<f32>,
    /// Per-vertex unit normals (or zero for degenerate vertices),
    /// identical length to `positions`.
    pub normals: Vec<f32>,
    /// Triangle index triples, counter-clockwise from the void side.
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
