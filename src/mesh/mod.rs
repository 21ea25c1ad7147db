//! Triangle meshes over packed buffers, and the shapes they start from.
//!
//! A [`TriangleMesh`] owns one [`VertexBuffer`](crate::buffer::VertexBuffer)
//! and one [`TriangleBuffer`](crate::buffer::TriangleBuffer), plus the
//! [`Geometry`](crate::geometry::Geometry) that interprets its positions.
//! Triangles are split into two colour bands at the switch index: band 0
//! draws with vertex colour slot 0, band 1 with slot 1.

mod edge;
mod flat;
mod icosahedron;
mod stats;
mod triangle_mesh;

use thiserror::Error;

use crate::buffer::BufferError;

pub use edge::EdgeKey;
pub use flat::{flat_polygon, FlatShape};
pub use icosahedron::{icosahedron, subdivided_icosahedron, ICOSAHEDRON_TRIANGLES, ICOSAHEDRON_VERTICES};
pub use stats::MeshStats;
pub use triangle_mesh::{RenderBuffers, StructureIssue, TriangleMesh};

/// Errors raised while building or querying a mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("Buffer access failed: {0}")]
    Buffer(#[from] BufferError),

    #[error("Switch index {switch} exceeds triangle count {triangles}")]
    SwitchOutOfRange { switch: usize, triangles: usize },

    #[error("Triangle {triangle} references vertex {vertex} but the mesh has {vertex_count} vertices")]
    InvalidVertexReference {
        triangle: usize,
        vertex: u32,
        vertex_count: usize,
    },
}

/// Triangle count of an icosahedron after `levels` subdivisions.
pub fn expected_triangle_count(levels: u32) -> usize {
    ICOSAHEDRON_TRIANGLES * 4usize.pow(levels)
}

/// Vertex count of an icosahedron after `levels` subdivisions.
pub fn expected_vertex_count(levels: u32) -> usize {
    10 * 4usize.pow(levels) + 2
}
