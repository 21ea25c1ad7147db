//! Cloud layer: a translucent shell above the terrain.
//!
//! The shell is an unperturbed copy of the terrain's base shape, raised by
//! the configured height, with cloud cover written into the alpha of vertex
//! colour slot 0.

mod config;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::colour::ByteRgba;
use crate::mesh::{flat_polygon, subdivided_icosahedron, MeshError, MeshStats, TriangleMesh};
use crate::noise::{fold_seed, sample_fractal_noise_batch, FractalNoiseConfig};
use crate::terrain::{TerrainConfig, TerrainError};

pub use config::CloudConfig;

/// Cloud cover in `[0, 1]` for a noise sample in `[-1, 1]`.
///
/// The sample is mapped to `[0, 1]` and then ramped linearly from
/// `threshold_min` (clear) to `threshold_max` (opaque).
pub fn cloud_cover(noise: f32, config: &CloudConfig) -> f32 {
    let v = 0.5 + 0.5 * noise;
    ((v - config.threshold_min) / (config.threshold_max - config.threshold_min)).clamp(0.0, 1.0)
}

/// A coloured cloud shell.
#[derive(Debug, Clone)]
pub struct CloudMesh {
    pub mesh: TriangleMesh,
}

impl CloudMesh {
    /// Builds and colours the cloud shell matching `terrain`'s shape.
    pub fn build(terrain: &TerrainConfig, config: &CloudConfig) -> Result<Self, TerrainError> {
        terrain.validate()?;
        config.validate()?;

        let subdivisions = config.effective_subdivisions(terrain.subdivisions);
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mut mesh = match terrain.object_type.flat_shape() {
            None => subdivided_icosahedron(
                1.0 + config.elevation(),
                subdivisions,
                subdivisions,
                glam::Vec3::ZERO,
                &mut rng,
            )?,
            Some(shape) => {
                let mut mesh = flat_polygon(shape, config.elevation());
                mesh.subdivide(subdivisions, subdivisions, glam::Vec3::ZERO, &mut rng)?;
                mesh
            }
        };

        mesh.compute_vertex_normals()?;
        apply_cloud_colours(&mut mesh, config)?;

        log::info!("Cloud layer complete: {}", mesh.stats());
        Ok(Self { mesh })
    }

    pub fn stats(&self) -> MeshStats {
        self.mesh.stats()
    }

    pub fn into_mesh(self) -> TriangleMesh {
        self.mesh
    }
}

/// Writes cloud cover into every vertex and puts all triangles in band 0.
///
/// Slot 0 gets the cloud colour with cover as alpha; slot 1 is set to red
/// and never drawn.
pub fn apply_cloud_colours(mesh: &mut TriangleMesh, config: &CloudConfig) -> Result<(), MeshError> {
    let base = config.colour.to_bytes();
    let noise = FractalNoiseConfig::multiscale(config.noise_terms, config.noise_decay, fold_seed(config.seed));
    let positions: Vec<glam::Vec3> = mesh
        .vertices()
        .positions()
        .map(|p| p * config.noise_frequency)
        .collect();

    let samples = sample_fractal_noise_batch(&positions, &noise);

    let vertices = mesh.vertices_mut();
    for (i, sample) in samples.into_iter().enumerate() {
        let alpha = (cloud_cover(sample, config) * 255.0).round() as u8;
        vertices.set_colour(i, 0, base.with_alpha(alpha))?;
        vertices.set_colour(i, 1, ByteRgba::RED)?;
    }

    let count = mesh.triangle_count();
    mesh.set_switch_colour(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{expected_triangle_count, expected_vertex_count};
    use crate::terrain::ObjectType;

    #[test]
    fn test_cloud_cover_ramp() {
        let config = CloudConfig::default();

        assert_eq!(cloud_cover(-1.0, &config), 0.0);
        assert_eq!(cloud_cover(0.0, &config), 0.0);
        assert!((cloud_cover(0.1, &config) - 0.5).abs() < 1e-5);
        assert_eq!(cloud_cover(0.3, &config), 1.0);
        assert_eq!(cloud_cover(1.0, &config), 1.0);
    }

    #[test]
    fn test_planet_cloud_shell() {
        let terrain = TerrainConfig { subdivisions: 2, ..TerrainConfig::default() };
        let cloud = CloudMesh::build(&terrain, &CloudConfig::with_seed(4)).unwrap();
        let mesh = &cloud.mesh;

        assert_eq!(mesh.vertex_count(), expected_vertex_count(2));
        assert_eq!(mesh.triangle_count(), expected_triangle_count(2));
        assert_eq!(mesh.switch_colour(), mesh.triangle_count());
        for p in mesh.vertices().positions() {
            assert!((p.length() - 1.1).abs() < 1e-5);
        }
        for i in 0..mesh.vertex_count() {
            let c = mesh.vertices().colour(i, 0).unwrap();
            assert_eq!((c.r, c.g, c.b), (255, 255, 255));
            assert_eq!(mesh.vertices().colour(i, 1).unwrap(), ByteRgba::RED);
        }
    }

    #[test]
    fn test_flat_cloud_uses_own_subdivisions() {
        let terrain = TerrainConfig {
            object_type: ObjectType::FlatTriangle,
            subdivisions: 6,
            ..TerrainConfig::default()
        };
        let config = CloudConfig {
            subdivisions: Some(2),
            height: 25.0,
            ..CloudConfig::with_seed(4)
        };
        let cloud = CloudMesh::build(&terrain, &config).unwrap();

        assert_eq!(cloud.mesh.triangle_count(), 16);
        assert!(cloud.mesh.vertices().positions().all(|p| (p.z - 0.25).abs() < 1e-6));
    }

    #[test]
    fn test_cover_varies_across_shell() {
        let terrain = TerrainConfig { subdivisions: 4, ..TerrainConfig::default() };
        let cloud = CloudMesh::build(&terrain, &CloudConfig::with_seed(9)).unwrap();

        let alphas: Vec<u8> = cloud.mesh.vertices().iter().map(|v| v.colour[0][3]).collect();
        assert!(alphas.iter().any(|&a| a == 0), "expected some clear sky");
        assert!(alphas.iter().any(|&a| a > 0), "expected some cloud");
        assert!(alphas.iter().any(|&a| a == 255), "expected some opaque cloud");
    }

    #[test]
    fn test_seed_high_bits_change_cover() {
        let terrain = TerrainConfig { subdivisions: 3, ..TerrainConfig::default() };
        let low = CloudMesh::build(&terrain, &CloudConfig::with_seed(9)).unwrap();
        let high = CloudMesh::build(&terrain, &CloudConfig::with_seed(9 | (1 << 40))).unwrap();

        assert_ne!(low.mesh.vertices().as_slice(), high.mesh.vertices().as_slice());
    }
}
