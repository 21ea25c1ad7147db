//! Terrain mesh: a triangle mesh plus the state the terrain passes share.

use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::mesh::{flat_polygon, subdivided_icosahedron, MeshError, MeshStats, TriangleMesh};
use crate::pipeline::{Pipeline, PipelineError};

use super::config::{ConfigError, TerrainConfig};

/// Errors that can occur while building terrain.
#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("Invalid terrain configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Mesh construction failed: {0}")]
    Mesh(#[from] MeshError),

    #[error("Terrain pipeline failed: {0}")]
    Pipeline(#[from] PipelineError),
}

/// A planet or flat terrain patch.
///
/// After the sea-level pass, triangles below the switch index are land and
/// the rest are sea.
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    pub mesh: TriangleMesh,
    /// Highest vertex height seen by the sea-level pass.
    pub max_height: f32,
    /// Vertices that carry a river.
    pub river_vertices: HashSet<u32>,
}

impl TerrainMesh {
    /// Wraps an existing mesh with no terrain state.
    pub fn new(mesh: TriangleMesh) -> Self {
        Self {
            mesh,
            max_height: 0.0,
            river_vertices: HashSet::new(),
        }
    }

    /// Builds the base shape and subdivides it, without running any terrain
    /// pass.
    ///
    /// Planets start from an icosahedron of radius `1 + base_level`; flat
    /// terrain starts from a polygon at `z = base_level`.
    pub fn base(config: &TerrainConfig) -> Result<Self, TerrainError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mesh = match config.object_type.flat_shape() {
            None => subdivided_icosahedron(
                1.0 + config.base_level(),
                config.subdivisions,
                config.subdivisions_unperturbed,
                config.variation,
                &mut rng,
            )?,
            Some(shape) => {
                let mut mesh = flat_polygon(shape, config.base_level());
                mesh.subdivide(
                    config.subdivisions,
                    config.subdivisions_unperturbed,
                    config.variation,
                    &mut rng,
                )?;
                mesh
            }
        };

        Ok(Self::new(mesh))
    }

    /// Builds the base shape and runs the standard terrain pipeline on it.
    pub fn build(config: &TerrainConfig) -> Result<Self, TerrainError> {
        let mut terrain = Self::base(config)?;
        Pipeline::standard(config.clone()).run(&mut terrain)?;
        log::info!("Terrain complete: {}", terrain.stats());
        Ok(terrain)
    }

    pub fn is_river(&self, vertex: u32) -> bool {
        self.river_vertices.contains(&vertex)
    }

    pub fn land_triangle_count(&self) -> usize {
        self.mesh.colour0_triangle_count()
    }

    pub fn sea_triangle_count(&self) -> usize {
        self.mesh.colour1_triangle_count()
    }

    pub fn stats(&self) -> MeshStats {
        self.mesh.stats()
    }

    pub fn into_mesh(self) -> TriangleMesh {
        self.mesh
    }
}
