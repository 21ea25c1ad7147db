//! Terrain colouring: ocean, rivers, shoreline, vegetation and snow.

use crate::colour::{ByteRgba, FloatRgba};
use crate::mesh::MeshError;

use super::config::TerrainConfig;
use super::terrain_mesh::TerrainMesh;

/// Normalised height below which land is painted as shoreline.
pub const BEACHLINE: f32 = 0.01;
/// Normalised height at which the low-to-high blend reaches the high colour.
pub const TREELINE: f32 = 0.25;

/// Land colour (slot 0) for a vertex at `normalised_height` that is not
/// under snow.
fn land_colour(config: &TerrainConfig, normalised_height: f32, is_river: bool) -> FloatRgba {
    let colours = &config.colours;
    if is_river {
        colours.river
    } else if normalised_height < BEACHLINE {
        colours.shoreline
    } else if normalised_height < TREELINE {
        colours.low.lerp(colours.high, normalised_height / TREELINE)
    } else {
        colours.high
    }
}

/// Snowline in normalised height at a vertex.
///
/// Interpolates between the equator and pole values by latitude, rises on
/// steep ground, drops along rivers, then has the power law applied when
/// positive.
pub fn snowline(config: &TerrainConfig, latitude: f32, slope: f32, is_river: bool) -> f32 {
    let s = &config.snowline;
    let glacier = if is_river { s.glacier_effect } else { 0.0 };
    let line = s.equator + latitude.abs() * (s.pole - s.equator) + s.slope_effect * slope - glacier;

    if line > 0.0 {
        line.powf(s.power_law)
    } else {
        line
    }
}

/// Paints both colour slots of every vertex.
///
/// Vertices of sea-band triangles get the ocean colour in slot 1. Slot 0 is
/// chosen per vertex from snow, river, shoreline, the low/high blend, or
/// high ground. Requires vertex normals.
pub fn apply_colours(terrain: &mut TerrainMesh, config: &TerrainConfig) -> Result<(), MeshError> {
    let ocean = config.colours.ocean.to_bytes();
    let sea_emissive = config.emissive > 0.0;
    let switch = terrain.mesh.switch_colour();

    let sea_corners: Vec<usize> = terrain
        .mesh
        .triangles()
        .iter()
        .skip(switch)
        .flat_map(|t| t.indices())
        .collect();
    for v in sea_corners {
        let vertices = terrain.mesh.vertices_mut();
        vertices.set_colour(v, 1, ocean)?;
        if sea_emissive {
            vertices.set_emissive(v, 1, true)?;
        }
    }

    let max_height = terrain.max_height;
    for i in 0..terrain.mesh.vertex_count() {
        let is_river = terrain.is_river(i as u32);
        let position = terrain.mesh.vertices().position(i)?;
        let normal = terrain.mesh.vertices().normal(i)?;
        let geometry = terrain.mesh.geometry();

        let slope = 1.0 - geometry.up(position).dot(normal);
        let latitude = geometry.normalised_latitude(position);
        let normalised_height = if max_height > 0.0 {
            terrain.mesh.vertex_height(i)? / max_height
        } else {
            0.0
        };

        let under_snow = normalised_height > snowline(config, latitude, slope, is_river);
        let colour: ByteRgba = if under_snow {
            config.colours.snow.to_bytes()
        } else {
            land_colour(config, normalised_height, is_river).to_bytes()
        };

        let vertices = terrain.mesh.vertices_mut();
        vertices.set_colour(i, 0, colour)?;
        if is_river && !under_snow {
            vertices.set_emissive(i, 0, true)?;
        }
    }

    terrain.mesh.set_emissive(config.emissive);
    log::debug!("Coloured {} vertices", terrain.mesh.vertex_count());
    Ok(())
}

/// Paints slot 0 high and slot 1 low on every vertex used by a triangle.
pub fn apply_debug_colours(terrain: &mut TerrainMesh, config: &TerrainConfig) -> Result<(), MeshError> {
    let high = config.colours.high.to_bytes();
    let low = config.colours.low.to_bytes();

    let corners: Vec<usize> = terrain
        .mesh
        .triangles()
        .iter()
        .flat_map(|t| t.indices())
        .collect();
    for v in corners {
        let vertices = terrain.mesh.vertices_mut();
        vertices.set_colour(v, 0, high)?;
        vertices.set_colour(v, 1, low)?;
    }

    terrain.mesh.set_emissive(config.emissive);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FlatGeometry;
    use crate::mesh::TriangleMesh;
    use crate::terrain::heightmap::apply_sea_level;
    use glam::Vec3;
    use std::sync::Arc;

    /// Flat fan of triangles around a centre, with given rim heights.
    fn fan(heights: &[f32]) -> TerrainMesh {
        let mut mesh = TriangleMesh::new(Arc::new(FlatGeometry));
        let n = heights.len() as u32 - 1;
        mesh.add_vertex(Vec3::new(0.0, 0.0, heights[0]));
        for (i, &h) in heights.iter().enumerate().skip(1) {
            let a = (i - 1) as f32 * std::f32::consts::TAU / n as f32;
            mesh.add_vertex(Vec3::new(a.cos() * 100.0, a.sin() * 100.0, h));
        }
        for i in 0..n {
            mesh.add_triangle(0, 1 + i, 1 + (i + 1) % n);
        }
        let mut terrain = TerrainMesh::new(mesh);
        apply_sea_level(&mut terrain).unwrap();
        terrain.mesh.compute_vertex_normals().unwrap();
        terrain
    }

    #[test]
    fn test_snowline_terms() {
        let config = TerrainConfig::default();

        assert!((snowline(&config, 0.0, 0.0, false) - 0.8).abs() < 1e-6);
        assert!((snowline(&config, 1.0, 0.0, false) + 0.1).abs() < 1e-6);
        assert!((snowline(&config, 0.0, 0.1, true) - 0.8).abs() < 1e-6);

        let squared = TerrainConfig {
            snowline: crate::terrain::SnowlineConfig { power_law: 2.0, ..Default::default() },
            ..TerrainConfig::default()
        };
        assert!((snowline(&squared, 0.0, 0.0, false) - 0.64).abs() < 1e-6);
        assert!((snowline(&squared, 1.0, 0.0, false) + 0.1).abs() < 1e-6, "negative lines keep sign");
    }

    #[test]
    fn test_land_colour_bands() {
        let config = TerrainConfig::default();
        let c = &config.colours;

        assert_eq!(land_colour(&config, 0.005, false), c.shoreline);
        assert_eq!(land_colour(&config, 0.5, false), c.high);
        assert_eq!(land_colour(&config, 0.5, true), c.river);
        let mid = land_colour(&config, 0.125, false);
        assert!((mid.r - 0.5).abs() < 1e-6 && (mid.g - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_sea_vertices_get_ocean_in_slot_one() {
        let mut terrain = fan(&[-1.0, -1.0, -1.0, -1.0, 0.5]);
        let config = TerrainConfig { emissive: 0.5, ..TerrainConfig::default() };

        apply_colours(&mut terrain, &config).unwrap();

        let v = terrain.mesh.vertices();
        let ocean = config.colours.ocean.to_bytes();
        assert_eq!(v.colour(0, 1).unwrap(), ocean);
        assert!(v.emissive(0, 1).unwrap());
        assert_eq!(v.colour(4, 1).unwrap(), ByteRgba::BLACK, "land-only vertex keeps slot 1");
        assert_eq!(v.colour(0, 0).unwrap(), config.colours.shoreline.to_bytes());
        assert_eq!(terrain.mesh.emissive(), 0.5);
    }

    #[test]
    fn test_peak_is_snow_and_river_is_emissive() {
        let mut terrain = fan(&[0.5, 0.5, 0.5, 0.5, 1.0]);
        terrain.river_vertices.insert(1);
        let config = TerrainConfig::default();

        apply_colours(&mut terrain, &config).unwrap();

        let v = terrain.mesh.vertices();
        assert_eq!(v.colour(4, 0).unwrap(), config.colours.snow.to_bytes());
        assert_eq!(v.colour(1, 0).unwrap(), config.colours.river.to_bytes());
        assert!(v.emissive(1, 0).unwrap());
        assert_eq!(v.colour(2, 0).unwrap(), config.colours.high.to_bytes());
    }

    #[test]
    fn test_debug_colours() {
        let mut terrain = fan(&[0.1, 0.2, 0.3, 0.4]);
        let config = TerrainConfig::default();

        apply_debug_colours(&mut terrain, &config).unwrap();

        for i in 0..terrain.mesh.vertex_count() {
            assert_eq!(terrain.mesh.vertices().colour(i, 0).unwrap(), config.colours.high.to_bytes());
            assert_eq!(terrain.mesh.vertices().colour(i, 1).unwrap(), config.colours.low.to_bytes());
        }
    }
}
