//! Height passes: noise displacement, sea level and the land power law.

use glam::Vec3;

use crate::buffer::TriangleBuffer;
use crate::mesh::MeshError;
use crate::noise::{sample_fractal_noise_batch, FractalNoiseConfig};

use super::config::TerrainConfig;
use super::terrain_mesh::TerrainMesh;

/// Adds `noise_amplitude * noise(noise_frequency * position)` to every
/// vertex height.
///
/// Does nothing when either the term count or the amplitude is zero.
pub fn apply_noise(terrain: &mut TerrainMesh, config: &TerrainConfig) -> Result<(), MeshError> {
    if config.noise_terms == 0 || config.noise_amplitude == 0.0 {
        return Ok(());
    }

    let noise = FractalNoiseConfig::multiscale(
        config.noise_terms,
        config.noise_amplitude_decay,
        config.noise_seed(),
    );
    let positions: Vec<Vec3> = terrain
        .mesh
        .vertices()
        .positions()
        .map(|p| p * config.noise_frequency)
        .collect();

    // Sampling is read-only and runs in parallel; heights are written back
    // on this thread.
    let offsets = sample_fractal_noise_batch(&positions, &noise);

    for (i, offset) in offsets.into_iter().enumerate() {
        let h = terrain.mesh.vertex_height(i)?;
        terrain.mesh.set_vertex_height(i, h + config.noise_amplitude * offset)?;
    }

    log::debug!("Applied {} noise terms to {} vertices", config.noise_terms, positions.len());
    Ok(())
}

/// Clamps heights at or below zero to sea level and partitions the
/// triangles into land and sea bands.
///
/// A triangle is sea only if all three of its vertices are. Land triangles
/// come first, the switch index is set to the land count, and `max_height`
/// records the highest land vertex. A triangle referencing a missing vertex
/// is an error.
pub fn apply_sea_level(terrain: &mut TerrainMesh) -> Result<(), MeshError> {
    let mesh = &mut terrain.mesh;
    mesh.validate()?;
    let mut is_sea = vec![false; mesh.vertex_count()];

    for (i, sea) in is_sea.iter_mut().enumerate() {
        let h = mesh.vertex_height(i)?;
        if h <= 0.0 {
            mesh.set_vertex_height(i, 0.0)?;
            *sea = true;
        } else if h > terrain.max_height {
            terrain.max_height = h;
        }
    }

    let count = mesh.triangle_count();
    let mut land = TriangleBuffer::with_capacity(count);
    let mut sea = TriangleBuffer::with_capacity(count);

    for t in mesh.triangles().iter() {
        let all_sea = t.indices().iter().all(|&v| is_sea[v]);
        if all_sea {
            sea.add(*t);
        } else {
            land.add(*t);
        }
    }

    let land_count = land.len();
    land.add_all(&sea);
    mesh.replace_triangles(land);
    mesh.set_switch_colour(land_count)?;

    log::debug!("Sea level: {} sea triangles, {} land triangles", sea.len(), land_count);
    Ok(())
}

/// Reshapes land heights above the geometry's epsilon as
/// `max_height * (h / max_height)^power_law`.
pub fn apply_power_law(terrain: &mut TerrainMesh, config: &TerrainConfig) -> Result<(), MeshError> {
    let max = terrain.max_height;
    let epsilon = terrain.mesh.geometry().epsilon();

    for i in 0..terrain.mesh.vertex_count() {
        let h = terrain.mesh.vertex_height(i)?;
        if h > epsilon {
            terrain
                .mesh
                .set_vertex_height(i, max * (h / max).powf(config.power_law))?;
        }
    }

    Ok(())
}
