//! Geometry of a flat patch lying in the xy plane.

use glam::Vec3;

use super::{Geometry, GeometryKind};

/// Height is the z coordinate; the local frame is the world axes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGeometry;

impl Geometry for FlatGeometry {
    fn kind(&self) -> GeometryKind {
        GeometryKind::Flat
    }

    fn height(&self, p: Vec3) -> f32 {
        p.z
    }

    fn set_height(&self, p: Vec3, h: f32) -> Vec3 {
        Vec3::new(p.x, p.y, h)
    }

    fn midpoint(&self, a: Vec3, b: Vec3) -> Vec3 {
        0.5 * (a + b)
    }

    fn normalised_latitude(&self, _p: Vec3) -> f32 {
        0.0
    }

    fn up(&self, _p: Vec3) -> Vec3 {
        Vec3::Z
    }

    fn north(&self, _p: Vec3) -> Vec3 {
        Vec3::Y
    }

    fn east(&self, _p: Vec3) -> Vec3 {
        Vec3::X
    }

    fn epsilon(&self) -> f32 {
        0.0
    }
}
