//! Raw packed-buffer export for engine imports.
//!
//! The vertex and triangle stores are written byte for byte, native-endian,
//! alongside a JSON manifest describing their layout.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::buffer::{TriangleBuffer, VertexBuffer};
use crate::geometry::GeometryKind;
use crate::mesh::TriangleMesh;

use super::ExportError;

/// Layout of an exported mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshManifest {
    pub geometry: GeometryKind,
    pub vertices: usize,
    pub triangles: usize,
    /// Bytes per vertex record.
    pub vertex_stride: usize,
    /// Bytes per triangle record (three `u32` indices).
    pub triangle_stride: usize,
    /// Triangles before this index use colour slot 0, the rest slot 1.
    pub switch_colour: usize,
    pub emissive: f32,
    pub vertices_file: String,
    pub triangles_file: String,
}

impl MeshManifest {
    /// Describes `mesh` as it would be written under `base_name`.
    pub fn for_mesh(mesh: &TriangleMesh, base_name: &str) -> Self {
        Self {
            geometry: mesh.geometry().kind(),
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
            vertex_stride: VertexBuffer::ELEMENT_SIZE,
            triangle_stride: TriangleBuffer::ELEMENT_SIZE,
            switch_colour: mesh.switch_colour(),
            emissive: mesh.emissive(),
            vertices_file: format!("{}_vertices.bin", base_name),
            triangles_file: format!("{}_triangles.bin", base_name),
        }
    }

    /// Reads a manifest written by [`export_raw`].
    pub fn from_json_file(path: &Path) -> Result<Self, ExportError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Files written by [`export_raw`].
#[derive(Debug, Clone)]
pub struct RawExportPaths {
    pub vertices: PathBuf,
    pub triangles: PathBuf,
    pub manifest: PathBuf,
}

/// Exports a mesh as raw buffers plus manifest.
///
/// Files are named using the pattern `{base_name}_vertices.bin`,
/// `{base_name}_triangles.bin` and `{base_name}_mesh.json`.
pub fn export_raw(mesh: &TriangleMesh, output_dir: &Path, base_name: &str) -> Result<RawExportPaths, ExportError> {
    mesh.validate()?;
    std::fs::create_dir_all(output_dir)?;

    let manifest = MeshManifest::for_mesh(mesh, base_name);
    let paths = RawExportPaths {
        vertices: output_dir.join(&manifest.vertices_file),
        triangles: output_dir.join(&manifest.triangles_file),
        manifest: output_dir.join(format!("{}_mesh.json", base_name)),
    };

    let buffers = mesh.render_buffers();
    write_bytes(&paths.vertices, buffers.vertices)?;
    write_bytes(&paths.triangles, buffers.triangles)?;

    let mut writer = BufWriter::new(File::create(&paths.manifest)?);
    serde_json::to_writer_pretty(&mut writer, &manifest)?;
    writer.flush()?;

    log::info!(
        "Exported {} vertices and {} triangles to {}",
        manifest.vertices,
        manifest.triangles,
        output_dir.display()
    );
    Ok(paths)
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}

/// Returns the expected sizes of the vertex and triangle files.
pub fn expected_file_sizes(vertices: usize, triangles: usize) -> (u64, u64) {
    (
        (vertices * VertexBuffer::ELEMENT_SIZE) as u64,
        (triangles * TriangleBuffer::ELEMENT_SIZE) as u64,
    )
}
