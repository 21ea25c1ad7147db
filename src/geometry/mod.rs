//! Coordinate-system strategies for mesh construction.
//!
//! A [`Geometry`] tells the mesh builder what "height", "midpoint" and the
//! local frame mean for its vertices. Planets use [`SphericalGeometry`];
//! flat terrain patches use [`FlatGeometry`].

mod flat;
mod spherical;

use std::fmt;

use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub use flat::FlatGeometry;
pub use spherical::SphericalGeometry;

/// Which family a geometry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Spherical,
    Flat,
}

/// Interprets vertex positions for height, interpolation and local frames.
///
/// Implementations are stateless, so one instance is shared between a mesh
/// and all of its clones.
pub trait Geometry: Send + Sync + fmt::Debug {
    fn kind(&self) -> GeometryKind;

    /// Height of `p` above the reference surface.
    fn height(&self, p: Vec3) -> f32;

    /// `p` moved so that its height becomes `h`.
    fn set_height(&self, p: Vec3, h: f32) -> Vec3;

    /// Point between `a` and `b` used when splitting an edge.
    fn midpoint(&self, a: Vec3, b: Vec3) -> Vec3;

    /// Latitude in `[-1, 1]`, used by the snowline.
    fn normalised_latitude(&self, p: Vec3) -> f32;

    fn up(&self, p: Vec3) -> Vec3;
    fn north(&self, p: Vec3) -> Vec3;
    fn east(&self, p: Vec3) -> Vec3;

    /// Height difference treated as "level" by flat-detection code.
    fn epsilon(&self) -> f32;

    /// Displaces `p` by a random vector drawn uniformly from the box
    /// `[-variation, variation]`, with x, y and z taken along east, north
    /// and up respectively.
    fn perturb(&self, p: Vec3, variation: Vec3, rng: &mut ChaCha8Rng) -> Vec3 {
        let r = random_in_box(variation, rng);
        p + r.x * self.east(p) + r.y * self.north(p) + r.z * self.up(p)
    }
}

/// Uniform sample from the axis-aligned box `[-half_extent, half_extent]`.
pub fn random_in_box(half_extent: Vec3, rng: &mut ChaCha8Rng) -> Vec3 {
    let mut component = |v: f32| (rng.random::<f32>() * 2.0 - 1.0) * v;
    Vec3::new(
        component(half_extent.x),
        component(half_extent.y),
        component(half_extent.z),
    )
}
