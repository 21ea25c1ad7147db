//! Regular polygons used as the base of flat terrain patches.

use std::f32::consts::PI;
use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::FlatGeometry;

use super::TriangleMesh;

/// Outline of a flat terrain patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlatShape {
    Triangle,
    Square,
    Hexagon,
}

impl FlatShape {
    pub fn rim_vertices(self) -> usize {
        match self {
            FlatShape::Triangle => 3,
            FlatShape::Square => 4,
            FlatShape::Hexagon => 6,
        }
    }
}

/// Unit-radius polygon in the plane `z`.
///
/// The triangle is a single face; the square and hexagon are fans around a
/// centre vertex at index 0.
pub fn flat_polygon(shape: FlatShape, z: f32) -> TriangleMesh {
    let mut mesh = TriangleMesh::new(Arc::new(FlatGeometry));
    let n = shape.rim_vertices();
    let rim = |i: usize| {
        let a = i as f32 * 2.0 * PI / n as f32;
        Vec3::new(a.cos(), a.sin(), z)
    };

    match shape {
        FlatShape::Triangle => {
            for i in 0..n {
                mesh.add_vertex(rim(i));
            }
            mesh.add_triangle(0, 1, 2);
        }
        FlatShape::Square | FlatShape::Hexagon => {
            mesh.add_vertex(Vec3::new(0.0, 0.0, z));
            for i in 0..n {
                mesh.add_vertex(rim(i));
            }
            for i in 0..n as u32 {
                mesh.add_triangle(0, 1 + i, 1 + (i + 1) % n as u32);
            }
        }
    }

    mesh
}
