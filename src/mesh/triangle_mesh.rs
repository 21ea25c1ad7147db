//! The triangle mesh and its subdivision builder.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec3;
use rand_chacha::ChaCha8Rng;

use crate::buffer::{PackedVertex, TriangleBuffer, VertexBuffer};
use crate::geometry::Geometry;

use super::edge::EdgeKey;
use super::stats::MeshStats;
use super::MeshError;

/// A triangle whose corner points past the end of the vertex store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureIssue {
    pub triangle: usize,
    pub corner: usize,
    pub vertex: u32,
}

/// Read-only view of a finished mesh for upload to a renderer.
///
/// `triangles[..colour0_triangles]` draw with vertex colour slot 0, the rest
/// with slot 1.
#[derive(Debug, Clone, Copy)]
pub struct RenderBuffers<'a> {
    /// Interleaved vertex records, `vertex_stride` bytes each.
    pub vertices: &'a [u8],
    /// Triangle corners as native-endian `u32` indices, three per triangle.
    pub triangles: &'a [u8],
    pub vertex_stride: usize,
    pub colour0_triangles: usize,
    pub colour1_triangles: usize,
}

/// A triangle mesh over packed vertex and triangle stores.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    vertices: VertexBuffer,
    triangles: TriangleBuffer,
    switch_colour: usize,
    emissive: f32,
    geometry: Arc<dyn Geometry>,
}

impl TriangleMesh {
    /// Empty mesh with the default buffer capacities.
    pub fn new(geometry: Arc<dyn Geometry>) -> Self {
        Self::with_capacity(
            geometry,
            VertexBuffer::DEFAULT_CAPACITY,
            TriangleBuffer::DEFAULT_CAPACITY,
        )
    }

    pub fn with_capacity(geometry: Arc<dyn Geometry>, vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: VertexBuffer::with_capacity(vertices),
            triangles: TriangleBuffer::with_capacity(triangles),
            switch_colour: 0,
            emissive: 0.0,
            geometry,
        }
    }

    pub fn geometry(&self) -> &dyn Geometry {
        self.geometry.as_ref()
    }

    pub fn vertices(&self) -> &VertexBuffer {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut VertexBuffer {
        &mut self.vertices
    }

    pub fn triangles(&self) -> &TriangleBuffer {
        &self.triangles
    }

    /// Adds a vertex with zero normal, black colours and no emission.
    pub fn add_vertex(&mut self, position: Vec3) -> u32 {
        self.vertices.add(PackedVertex::at(position))
    }

    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.add_indices(v0, v1, v2);
    }

    /// Replaces the triangle list, e.g. after reordering into colour bands.
    pub(crate) fn replace_triangles(&mut self, triangles: TriangleBuffer) {
        self.triangles = triangles;
        self.switch_colour = self.switch_colour.min(self.triangles.len());
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn switch_colour(&self) -> usize {
        self.switch_colour
    }

    /// Sets the index of the first triangle drawn with colour slot 1.
    pub fn set_switch_colour(&mut self, switch: usize) -> Result<(), MeshError> {
        if switch > self.triangle_count() {
            return Err(MeshError::SwitchOutOfRange {
                switch,
                triangles: self.triangle_count(),
            });
        }
        self.switch_colour = switch;
        Ok(())
    }

    pub fn colour0_triangle_count(&self) -> usize {
        self.switch_colour
    }

    pub fn colour1_triangle_count(&self) -> usize {
        self.triangle_count() - self.switch_colour
    }

    /// Vertex colour slot used by triangle `t`.
    pub fn colour_for_triangle(&self, t: usize) -> usize {
        if t >= self.switch_colour {
            1
        } else {
            0
        }
    }

    pub fn emissive(&self) -> f32 {
        self.emissive
    }

    pub fn set_emissive(&mut self, emissive: f32) {
        self.emissive = emissive;
    }

    pub fn vertex_height(&self, i: usize) -> Result<f32, MeshError> {
        Ok(self.geometry.height(self.vertices.position(i)?))
    }

    pub fn set_vertex_height(&mut self, i: usize, h: f32) -> Result<(), MeshError> {
        let p = self.vertices.position(i)?;
        let moved = self.geometry.set_height(p, h);
        self.vertices.set_position(i, moved);
        Ok(())
    }

    fn triangle_heights(&self, t: usize) -> Result<[f32; 3], MeshError> {
        let [a, b, c] = self.triangles.get(t)?.indices();
        Ok([
            self.vertex_height(a)?,
            self.vertex_height(b)?,
            self.vertex_height(c)?,
        ])
    }

    pub fn triangle_height_min(&self, t: usize) -> Result<f32, MeshError> {
        let [a, b, c] = self.triangle_heights(t)?;
        Ok(a.min(b).min(c))
    }

    pub fn triangle_height_max(&self, t: usize) -> Result<f32, MeshError> {
        let [a, b, c] = self.triangle_heights(t)?;
        Ok(a.max(b).max(c))
    }

    pub fn triangle_height_average(&self, t: usize) -> Result<f32, MeshError> {
        let [a, b, c] = self.triangle_heights(t)?;
        Ok((a + b + c) / 3.0)
    }

    /// Unit normal of triangle `t`, following its winding.
    pub fn triangle_normal(&self, t: usize) -> Result<Vec3, MeshError> {
        let [a, b, c] = self.triangles.get(t)?.indices();
        let v0 = self.vertices.position(a)?;
        let v1 = self.vertices.position(b)?;
        let v2 = self.vertices.position(c)?;
        Ok((v1 - v0).cross(v2 - v0).normalize_or_zero())
    }

    /// Sets every vertex normal to the mean of its incident triangle normals.
    ///
    /// Vertices used by no triangle get a zero normal.
    pub fn compute_vertex_normals(&mut self) -> Result<(), MeshError> {
        let mut sums = vec![Vec3::ZERO; self.vertex_count()];
        let mut counts = vec![0u32; self.vertex_count()];

        for t in 0..self.triangle_count() {
            let normal = self.triangle_normal(t)?;
            for v in self.triangles.get(t)?.indices() {
                sums[v] += normal;
                counts[v] += 1;
            }
        }

        for (i, (sum, count)) in sums.into_iter().zip(counts).enumerate() {
            let normal = if count == 0 { Vec3::ZERO } else { sum / count as f32 };
            self.vertices.set_normal(i, normal);
        }

        log::debug!("Computed normals for {} vertices", self.vertex_count());
        Ok(())
    }

    /// Applies `levels` rounds of 1-to-4 subdivision.
    ///
    /// Level `s` perturbs with zero variation while `s < flat_levels`, and
    /// with `variation / 2^s` afterwards.
    pub fn subdivide(
        &mut self,
        levels: u32,
        flat_levels: u32,
        variation: Vec3,
        rng: &mut ChaCha8Rng,
    ) -> Result<(), MeshError> {
        for s in 0..levels {
            let level_variation = if s < flat_levels {
                Vec3::ZERO
            } else {
                variation / (1u64 << s) as f32
            };
            self.subdivide_once(level_variation, rng)?;
            log::debug!(
                "Subdivision level {}/{}: {} vertices, {} triangles",
                s + 1,
                levels,
                self.vertex_count(),
                self.triangle_count()
            );
        }
        Ok(())
    }

    fn subdivide_once(&mut self, variation: Vec3, rng: &mut ChaCha8Rng) -> Result<(), MeshError> {
        if variation != Vec3::ZERO {
            for i in 0..self.vertex_count() {
                let p = self.vertices.position(i)?;
                let moved = self.geometry.perturb(p, variation, rng);
                self.vertices.set_position(i, moved);
            }
        }

        let capacity = 4 * self.triangle_count();
        let parents = std::mem::replace(&mut self.triangles, TriangleBuffer::with_capacity(capacity));
        let mut midpoints: HashMap<EdgeKey, u32> = HashMap::with_capacity(parents.len() * 3 / 2);

        for triangle in parents.iter() {
            let [i0, i1, i2] = triangle.vertices;
            let e01 = self.edge_midpoint(&mut midpoints, i0, i1, variation, rng)?;
            let e12 = self.edge_midpoint(&mut midpoints, i1, i2, variation, rng)?;
            let e20 = self.edge_midpoint(&mut midpoints, i2, i0, variation, rng)?;

            self.add_triangle(i0, e01, e20);
            self.add_triangle(e01, i1, e12);
            self.add_triangle(e20, e12, i2);
            self.add_triangle(e01, e12, e20);
        }

        self.switch_colour = self.switch_colour.min(self.triangle_count());
        Ok(())
    }

    fn edge_midpoint(
        &mut self,
        midpoints: &mut HashMap<EdgeKey, u32>,
        a: u32,
        b: u32,
        variation: Vec3,
        rng: &mut ChaCha8Rng,
    ) -> Result<u32, MeshError> {
        let key = EdgeKey::new(a, b);
        if let Some(&index) = midpoints.get(&key) {
            return Ok(index);
        }

        let pa = self.vertices.position(a as usize)?;
        let pb = self.vertices.position(b as usize)?;
        let mut mid = self.geometry.midpoint(pa, pb);
        if variation != Vec3::ZERO {
            mid = self.geometry.perturb(mid, variation, rng);
        }

        let index = self.add_vertex(mid);
        midpoints.insert(key, index);
        Ok(index)
    }

    /// Lists every triangle corner that references a missing vertex.
    ///
    /// Nothing is repaired.
    pub fn check_structure(&self) -> Vec<StructureIssue> {
        let vertex_count = self.vertex_count();
        let mut issues = Vec::new();

        for (triangle, t) in self.triangles.iter().enumerate() {
            for (corner, &vertex) in t.vertices.iter().enumerate() {
                if vertex as usize >= vertex_count {
                    log::warn!(
                        "Triangle {} corner {} references vertex {} (only {} vertices)",
                        triangle,
                        corner,
                        vertex,
                        vertex_count
                    );
                    issues.push(StructureIssue {
                        triangle,
                        corner,
                        vertex,
                    });
                }
            }
        }

        issues
    }

    /// Fails with the first structural problem found, if any.
    pub fn validate(&self) -> Result<(), MeshError> {
        match self.check_structure().first() {
            Some(issue) => Err(MeshError::InvalidVertexReference {
                triangle: issue.triangle,
                vertex: issue.vertex,
                vertex_count: self.vertex_count(),
            }),
            None => Ok(()),
        }
    }

    pub fn stats(&self) -> MeshStats {
        MeshStats {
            vertices: self.vertex_count(),
            triangles: self.triangle_count(),
            colour0_triangles: self.colour0_triangle_count(),
            colour1_triangles: self.colour1_triangle_count(),
        }
    }

    pub fn render_buffers(&self) -> RenderBuffers<'_> {
        RenderBuffers {
            vertices: self.vertices.as_bytes(),
            triangles: self.triangles.as_bytes(),
            vertex_stride: VertexBuffer::ELEMENT_SIZE,
            colour0_triangles: self.colour0_triangle_count(),
            colour1_triangles: self.colour1_triangle_count(),
        }
    }
}
