//! End-to-end generation: base mesh, terrain passes, clouds and export.

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tempfile::tempdir;

use terramesh::buffer::{PackedVertex, TriangleBuffer, VertexBuffer};
use terramesh::cloud::{CloudConfig, CloudMesh};
use terramesh::export::{export_pov, export_raw, MeshManifest, PovExportOptions, PovMesh};
use terramesh::mesh::{expected_triangle_count, expected_vertex_count, subdivided_icosahedron};
use terramesh::terrain::{ObjectType, TerrainConfig, TerrainMesh};

fn small_planet(seed: u64) -> TerrainConfig {
    TerrainConfig {
        subdivisions: 4,
        noise_terms: 5,
        rivers: 6,
        ..TerrainConfig::with_seed(seed)
    }
}

#[test]
fn test_icosahedron_counts_per_level() {
    for levels in 0..=4 {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mesh = subdivided_icosahedron(1.0, levels, levels, Vec3::ZERO, &mut rng).unwrap();

        assert_eq!(mesh.vertex_count(), expected_vertex_count(levels));
        assert_eq!(mesh.triangle_count(), expected_triangle_count(levels));
        assert!(mesh.check_structure().is_empty());
    }
}

#[test]
fn test_render_buffers_match_stores() {
    let terrain = TerrainMesh::build(&small_planet(7)).unwrap();
    let buffers = terrain.mesh.render_buffers();

    assert_eq!(buffers.vertex_stride, std::mem::size_of::<PackedVertex>());
    assert_eq!(buffers.vertices.len(), terrain.mesh.vertex_count() * VertexBuffer::ELEMENT_SIZE);
    assert_eq!(buffers.triangles.len(), terrain.mesh.triangle_count() * TriangleBuffer::ELEMENT_SIZE);
    assert_eq!(
        buffers.colour0_triangles + buffers.colour1_triangles,
        terrain.mesh.triangle_count()
    );

    let first: &PackedVertex = bytemuck::from_bytes(&buffers.vertices[..buffers.vertex_stride]);
    assert_eq!(first.position(), terrain.mesh.vertices().position(0).unwrap());
}

#[test]
fn test_planet_generation_is_reproducible() {
    let a = TerrainMesh::build(&small_planet(42)).unwrap();
    let b = TerrainMesh::build(&small_planet(42)).unwrap();
    let c = TerrainMesh::build(&small_planet(43)).unwrap();

    assert_eq!(a.mesh.render_buffers().vertices, b.mesh.render_buffers().vertices);
    assert_eq!(a.mesh.switch_colour(), b.mesh.switch_colour());
    assert_ne!(a.mesh.render_buffers().vertices, c.mesh.render_buffers().vertices);
}

#[test]
fn test_planet_land_and_sea_bands() {
    let terrain = TerrainMesh::build(&small_planet(5)).unwrap();
    let mesh = &terrain.mesh;

    // Every sea-band triangle lies at sea level.
    for t in mesh.switch_colour()..mesh.triangle_count() {
        assert!(mesh.triangle_height_max(t).unwrap().abs() < 1e-5);
    }
    for h in (0..mesh.vertex_count()).map(|i| mesh.vertex_height(i).unwrap()) {
        assert!(h > -1e-5 && h <= terrain.max_height + 1e-5);
    }
    assert!(terrain.max_height > 0.0);
}

#[test]
fn test_flat_terrain_generation() {
    for object_type in [ObjectType::FlatHexagon, ObjectType::FlatSquare, ObjectType::FlatTriangle] {
        let config = TerrainConfig {
            object_type,
            subdivisions: 3,
            noise_terms: 4,
            rivers: 2,
            ..TerrainConfig::with_seed(9)
        };
        let terrain = TerrainMesh::build(&config).unwrap();

        terrain.mesh.validate().unwrap();
        for p in terrain.mesh.vertices().positions() {
            assert!(p.z >= 0.0);
        }
    }
}

#[test]
fn test_clouds_sit_above_planet() {
    let config = small_planet(3);
    let clouds = CloudMesh::build(&config, &CloudConfig::with_seed(4)).unwrap();

    assert_eq!(clouds.mesh.vertex_count(), expected_vertex_count(4));
    assert_eq!(clouds.mesh.colour1_triangle_count(), 0);
    for p in clouds.mesh.vertices().positions() {
        assert!((p.length() - 1.1).abs() < 1e-4);
    }
}

#[test]
fn test_export_pov_scene() {
    let config = small_planet(11);
    let terrain = TerrainMesh::build(&config).unwrap();
    let clouds = CloudMesh::build(&config, &CloudConfig::with_seed(12)).unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("planet.pov");

    let mut file = std::fs::File::create(&path).unwrap();
    let options = PovExportOptions {
        sea_object: true,
        atmosphere: true,
        ..Default::default()
    };
    export_pov(
        &[PovMesh::terrain(&terrain.mesh), PovMesh::cloud(&clouds.mesh)],
        &mut file,
        &options,
    )
    .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("sphere {<0.0,0.0,0.0>,1.0 pigment"));
    assert_eq!(text.matches("mesh2 {").count(), 2);
    assert!(text.contains(&format!("vertex_vectors {{{},", terrain.mesh.vertex_count())));
    assert!(text.contains(&format!("face_indices {{{},", terrain.mesh.triangle_count())));
    assert!(text.contains("double_illuminate"));
}

#[test]
fn test_export_raw_round_trip() {
    let terrain = TerrainMesh::build(&small_planet(13)).unwrap();
    let dir = tempdir().unwrap();

    let paths = export_raw(&terrain.mesh, dir.path(), "planet").unwrap();
    let manifest = MeshManifest::from_json_file(&paths.manifest).unwrap();

    assert_eq!(manifest.vertices, terrain.mesh.vertex_count());
    assert_eq!(manifest.triangles, terrain.mesh.triangle_count());
    assert_eq!(manifest.switch_colour, terrain.mesh.switch_colour());

    let vertex_bytes = std::fs::read(&paths.vertices).unwrap();
    assert_eq!(vertex_bytes.as_slice(), terrain.mesh.render_buffers().vertices);
}
