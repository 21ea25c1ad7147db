//! The regular icosahedron that planets are subdivided from.

use std::sync::Arc;

use glam::Vec3;
use rand_chacha::ChaCha8Rng;

use crate::geometry::SphericalGeometry;

use super::{MeshError, TriangleMesh};

pub const ICOSAHEDRON_VERTICES: usize = 12;
pub const ICOSAHEDRON_TRIANGLES: usize = 20;

const X: f32 = 0.525_731_1;
const Z: f32 = 0.850_650_8;

const VERTICES: [[f32; 3]; ICOSAHEDRON_VERTICES] = [
    [-X, 0.0, Z],
    [X, 0.0, Z],
    [-X, 0.0, -Z],
    [X, 0.0, -Z],
    [0.0, Z, X],
    [0.0, Z, -X],
    [0.0, -Z, X],
    [0.0, -Z, -X],
    [Z, X, 0.0],
    [-Z, X, 0.0],
    [Z, -X, 0.0],
    [-Z, -X, 0.0],
];

// Listed inward-facing; reversed on insertion.
const FACES: [[u32; 3]; ICOSAHEDRON_TRIANGLES] = [
    [0, 4, 1],
    [0, 9, 4],
    [9, 5, 4],
    [4, 5, 8],
    [4, 8, 1],
    [8, 10, 1],
    [8, 3, 10],
    [5, 3, 8],
    [5, 2, 3],
    [2, 7, 3],
    [7, 10, 3],
    [7, 6, 10],
    [7, 11, 6],
    [11, 0, 6],
    [0, 1, 6],
    [6, 1, 10],
    [9, 0, 11],
    [9, 11, 2],
    [9, 2, 5],
    [7, 2, 11],
];

/// Icosahedron of the given radius with outward-facing triangles.
pub fn icosahedron(radius: f32) -> TriangleMesh {
    let mut mesh = TriangleMesh::new(Arc::new(SphericalGeometry));

    for v in VERTICES {
        mesh.add_vertex(Vec3::from_array(v).normalize() * radius);
    }
    for [a, b, c] in FACES {
        mesh.add_triangle(c, b, a);
    }

    mesh
}

/// Icosahedron subdivided `levels` times, perturbed as in
/// [`TriangleMesh::subdivide`].
pub fn subdivided_icosahedron(
    radius: f32,
    levels: u32,
    flat_levels: u32,
    variation: Vec3,
    rng: &mut ChaCha8Rng,
) -> Result<TriangleMesh, MeshError> {
    let mut mesh = icosahedron(radius);
    mesh.subdivide(levels, flat_levels, variation, rng)?;
    log::info!(
        "Built icosahedron: {} subdivisions, {} vertices, {} triangles",
        levels,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}
