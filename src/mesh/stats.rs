//! Summary counts for a built mesh.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Vertex and triangle counts, with the triangles split by colour band.
///
/// For terrain, band 0 is land and band 1 is sea.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshStats {
    pub vertices: usize,
    pub triangles: usize,
    pub colour0_triangles: usize,
    pub colour1_triangles: usize,
}

impl MeshStats {
    /// Sums the counts of several meshes.
    pub fn total<'a>(stats: impl IntoIterator<Item = &'a MeshStats>) -> MeshStats {
        stats.into_iter().fold(MeshStats::default(), |acc, s| MeshStats {
            vertices: acc.vertices + s.vertices,
            triangles: acc.triangles + s.triangles,
            colour0_triangles: acc.colour0_triangles + s.colour0_triangles,
            colour1_triangles: acc.colour1_triangles + s.colour1_triangles,
        })
    }
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vertices, {} triangles ({} land, {} sea)",
            self.vertices, self.triangles, self.colour0_triangles, self.colour1_triangles
        )
    }
}
