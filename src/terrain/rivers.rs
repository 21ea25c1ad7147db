//! River generation: downhill flow with lake filling.
//!
//! Each river starts at a random land vertex and repeatedly moves its
//! "current" vertex set to the lowest neighbour. Flat ground widens the set;
//! a basin is flooded by raising every vertex already visited up to the
//! lowest rim vertex, which becomes the outflow.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::mesh::{MeshError, TriangleMesh};

use super::config::TerrainConfig;
use super::terrain_mesh::TerrainMesh;

/// Height usable as an ordered map key.
#[derive(Debug, Clone, Copy)]
struct HeightKey(f32);

impl PartialEq for HeightKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeightKey {}

impl PartialOrd for HeightKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeightKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Vertices grouped by height, lowest first.
type HeightMap = BTreeMap<HeightKey, Vec<u32>>;

/// Neighbour lists built from land triangles only, so rivers never cross
/// open sea.
fn land_neighbours(mesh: &TriangleMesh) -> Vec<Vec<u32>> {
    let mut neighbours: Vec<BTreeSet<u32>> = vec![BTreeSet::new(); mesh.vertex_count()];

    for t in mesh.triangles().iter().take(mesh.colour0_triangle_count()) {
        let [a, b, c] = t.vertices;
        for (v, others) in [(a, [b, c]), (b, [a, c]), (c, [a, b])] {
            if let Some(set) = neighbours.get_mut(v as usize) {
                set.extend(others);
            }
        }
    }

    neighbours.into_iter().map(|s| s.into_iter().collect()).collect()
}

/// Vertices used by any sea-band triangle.
fn sea_vertices(mesh: &TriangleMesh) -> Vec<bool> {
    let mut is_sea = vec![false; mesh.vertex_count()];

    for t in mesh.triangles().iter().skip(mesh.colour0_triangle_count()) {
        for v in t.indices() {
            if let Some(flag) = is_sea.get_mut(v) {
                *flag = true;
            }
        }
    }

    is_sea
}

struct RiverContext<'a> {
    is_sea: &'a [bool],
    neighbours: &'a [Vec<u32>],
    max_lake_size: usize,
    epsilon: f32,
}

/// Traces `config.rivers` rivers across the land band.
pub fn generate_rivers(terrain: &mut TerrainMesh, config: &TerrainConfig) -> Result<(), MeshError> {
    if config.rivers == 0 || terrain.mesh.vertex_count() == 0 {
        return Ok(());
    }

    let mut rng = ChaCha8Rng::seed_from_u64(config.rivers_seed);
    let neighbours = land_neighbours(&terrain.mesh);
    let is_sea = sea_vertices(&terrain.mesh);
    let ctx = RiverContext {
        is_sea: &is_sea,
        neighbours: &neighbours,
        max_lake_size: (terrain.mesh.vertex_count() as f32 * config.lake_becomes_sea) as usize,
        epsilon: terrain.mesh.geometry().epsilon(),
    };

    for r in 0..config.rivers {
        trace_river(r, terrain, &ctx, &mut rng)?;
    }

    log::info!(
        "Generated {} rivers covering {} vertices",
        config.rivers,
        terrain.river_vertices.len()
    );
    Ok(())
}

fn trace_river(
    r: u32,
    terrain: &mut TerrainMesh,
    ctx: &RiverContext<'_>,
    rng: &mut ChaCha8Rng,
) -> Result<(), MeshError> {
    let source = rng.random_range(0..terrain.mesh.vertex_count()) as u32;
    if ctx.is_sea[source as usize] {
        return Ok(());
    }

    let mut visited: BTreeSet<u32> = BTreeSet::new();
    let mut visited_by_height = HeightMap::new();
    let mut current: BTreeSet<u32> = BTreeSet::from([source]);
    let mut current_height = terrain.mesh.vertex_height(source as usize)?;

    loop {
        let mut reached_sea = false;
        let mut rim: BTreeSet<u32> = BTreeSet::new();

        for &v in &current {
            visited.insert(v);
            visited_by_height.entry(HeightKey(current_height)).or_default().push(v);
            reached_sea |= ctx.is_sea[v as usize];

            for &n in &ctx.neighbours[v as usize] {
                if !current.contains(&n) {
                    rim.insert(n);
                }
            }
        }

        if reached_sea {
            break;
        }
        if current.len() >= ctx.max_lake_size {
            log::debug!("River {} became an inland sea", r);
            break;
        }
        if current.iter().any(|v| terrain.river_vertices.contains(v)) {
            break;
        }

        let mut candidates = HeightMap::new();
        for n in rim {
            candidates
                .entry(HeightKey(terrain.mesh.vertex_height(n as usize)?))
                .or_default()
                .push(n);
        }

        let Some((&HeightKey(lowest), lowest_vertices)) = candidates.iter().next() else {
            log::warn!("River {} has no flow candidates", r);
            break;
        };
        let outflow = lowest_vertices[0];

        if lowest < current_height - ctx.epsilon {
            // Downhill.
            current.clear();
            current.insert(outflow);
            current_height = lowest;
        } else if lowest < current_height + ctx.epsilon {
            // Spread across flat ground.
            for vertices in candidates.range(..HeightKey(current_height + ctx.epsilon)).map(|(_, v)| v) {
                current.extend(vertices);
            }
        } else {
            // Fill the basin up to the outflow.
            current_height = lowest + ctx.epsilon;
            current.insert(outflow);

            let above = visited_by_height.split_off(&HeightKey(current_height));
            let flooded = std::mem::replace(&mut visited_by_height, above);
            current.extend(flooded.into_values().flatten());

            for &v in &current {
                terrain.mesh.set_vertex_height(v as usize, current_height)?;
            }
        }
    }

    terrain.river_vertices.extend(visited);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FlatGeometry;
    use crate::terrain::heightmap::apply_sea_level;
    use glam::Vec3;
    use std::sync::Arc;

    /// A strip of land vertices 0..n along x ending in a sea vertex, joined
    /// by triangles to a parallel strip of high ground.
    fn valley(heights: &[f32]) -> TerrainMesh {
        let n = heights.len() as u32;
        let mut mesh = TriangleMesh::new(Arc::new(FlatGeometry));
        for (i, &h) in heights.iter().enumerate() {
            mesh.add_vertex(Vec3::new(i as f32, 0.0, h));
        }
        for i in 0..n {
            mesh.add_vertex(Vec3::new(i as f32, 1.0, 5.0));
        }
        for i in 0..n - 1 {
            mesh.add_triangle(i, i + 1, n + i + 1);
            mesh.add_triangle(i, n + i + 1, n + i);
        }
        // Extra sea triangle around the mouth.
        let mouth = n - 1;
        let a = mesh.add_vertex(Vec3::new(n as f32, 0.0, -1.0));
        let b = mesh.add_vertex(Vec3::new(n as f32, -1.0, -1.0));
        mesh.add_triangle(mouth, a, b);

        let mut terrain = TerrainMesh::new(mesh);
        apply_sea_level(&mut terrain).unwrap();
        terrain
    }

    /// A generator whose first river source is `vertex`.
    fn rng_drawing_source(vertex: usize, vertex_count: usize) -> ChaCha8Rng {
        (0u64..)
            .map(ChaCha8Rng::seed_from_u64)
            .find(|rng| rng.clone().random_range(0..vertex_count) == vertex)
            .unwrap()
    }

    #[test]
    fn test_height_key_orders_totally() {
        let mut keys = vec![HeightKey(0.5), HeightKey(-1.0), HeightKey(0.25)];
        keys.sort();
        assert_eq!(keys.iter().map(|k| k.0).collect::<Vec<_>>(), vec![-1.0, 0.25, 0.5]);
    }

    #[test]
    fn test_neighbours_ignore_sea_band() {
        let terrain = valley(&[3.0, 2.0, 1.0, -1.0]);
        let neighbours = land_neighbours(&terrain.mesh);
        let is_sea = sea_vertices(&terrain.mesh);

        assert!(neighbours[1].contains(&0) && neighbours[1].contains(&2));
        assert!(neighbours[8].is_empty(), "sea-only vertex has no land neighbours");
        assert!(is_sea[3] && is_sea[8] && is_sea[9]);
        assert!(!is_sea[0]);
    }

    #[test]
    fn test_river_flows_downhill_to_sea() {
        let mut terrain = valley(&[3.0, 2.0, 1.0, -1.0]);
        let ctx_neighbours = land_neighbours(&terrain.mesh);
        let is_sea = sea_vertices(&terrain.mesh);
        let ctx = RiverContext {
            is_sea: &is_sea,
            neighbours: &ctx_neighbours,
            max_lake_size: 100,
            epsilon: 0.0,
        };

        let mut rng = rng_drawing_source(0, terrain.mesh.vertex_count());

        trace_river(0, &mut terrain, &ctx, &mut rng).unwrap();

        for v in [0, 1, 2, 3] {
            assert!(terrain.is_river(v), "vertex {} should carry the river", v);
        }
        assert!(!terrain.is_river(4), "high ground stays dry");
    }

    #[test]
    fn test_basin_is_filled_to_outflow() {
        // Vertex 1 is a pit below both neighbours.
        let mut terrain = valley(&[3.0, 0.5, 1.0, -1.0]);
        let neighbours = land_neighbours(&terrain.mesh);
        let is_sea = sea_vertices(&terrain.mesh);
        let ctx = RiverContext {
            is_sea: &is_sea,
            neighbours: &neighbours,
            max_lake_size: 100,
            epsilon: 0.0,
        };
        let mut rng = rng_drawing_source(1, terrain.mesh.vertex_count());

        trace_river(0, &mut terrain, &ctx, &mut rng).unwrap();

        // The pit is raised to the level of its lowest rim vertex.
        assert!((terrain.mesh.vertex_height(1).unwrap() - 1.0).abs() < 1e-6);
        assert!(terrain.is_river(2) && terrain.is_river(3));
    }

    #[test]
    fn test_rivers_are_seeded() {
        let config = TerrainConfig {
            subdivisions: 4,
            noise_terms: 4,
            rivers: 8,
            ..TerrainConfig::with_seed(3)
        };
        let a = TerrainMesh::build(&config).unwrap();
        let b = TerrainMesh::build(&config).unwrap();

        assert_eq!(a.river_vertices, b.river_vertices);
    }

    #[test]
    fn test_zero_rivers_is_noop() {
        let mut terrain = valley(&[3.0, 2.0, 1.0, -1.0]);
        generate_rivers(&mut terrain, &TerrainConfig::default()).unwrap();
        assert!(terrain.river_vertices.is_empty());
    }
}
