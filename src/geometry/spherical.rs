//! Geometry of a sphere centred on the origin with unit reference radius.

use glam::Vec3;

use super::{Geometry, GeometryKind};

/// Height is distance from the origin minus one; latitude is the z
/// coordinate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SphericalGeometry;

impl Geometry for SphericalGeometry {
    fn kind(&self) -> GeometryKind {
        GeometryKind::Spherical
    }

    fn height(&self, p: Vec3) -> f32 {
        p.length() - 1.0
    }

    fn set_height(&self, p: Vec3, h: f32) -> Vec3 {
        let m = p.length();
        if m == 0.0 {
            return p;
        }
        p * ((1.0 + h) / m)
    }

    fn midpoint(&self, a: Vec3, b: Vec3) -> Vec3 {
        let mid = 0.5 * (a + b);
        let m = mid.length();
        if m == 0.0 {
            return mid;
        }
        let target = 0.5 * (a.length() + b.length());
        mid * (target / m)
    }

    fn normalised_latitude(&self, p: Vec3) -> f32 {
        p.z
    }

    fn up(&self, p: Vec3) -> Vec3 {
        p.normalize_or_zero()
    }

    fn north(&self, p: Vec3) -> Vec3 {
        if on_polar_axis(p) {
            return Vec3::ZERO;
        }
        self.up(p).cross(self.east(p)).normalize_or_zero()
    }

    fn east(&self, p: Vec3) -> Vec3 {
        if on_polar_axis(p) {
            return Vec3::ZERO;
        }
        Vec3::Z.cross(self.up(p)).normalize_or_zero()
    }

    fn epsilon(&self) -> f32 {
        1e-6
    }
}

// The local frame is undefined at the poles.
fn on_polar_axis(p: Vec3) -> bool {
    p.x == 0.0 && p.y == 0.0
}
