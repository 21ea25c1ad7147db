//! POV-Ray `mesh2` scene export.
//!
//! Each mesh becomes one `mesh2` object. Vertex colours are written as a
//! texture list holding slot 0 for every vertex followed by slot 1, and
//! band-1 triangles index into the second half. POV-Ray is y-up, so the y
//! and z components of every position are swapped.

use std::io::Write;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::colour::{ByteRgba, FloatRgba};
use crate::geometry::GeometryKind;
use crate::mesh::{MeshError, TriangleMesh};
use crate::terrain::TerrainColours;

use super::ExportError;

/// Options for POV-Ray export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PovExportOptions {
    /// Write only the band-0 triangles and the slot-0 textures.
    pub exclude_alternate_colour: bool,
    /// Add a sea sphere (planets) or plane (flat terrain) at height zero.
    pub sea_object: bool,
    /// Add two scattering shells above the surface.
    pub atmosphere: bool,
    /// Pigment of the sea object.
    pub ocean: FloatRgba,
}

impl Default for PovExportOptions {
    fn default() -> Self {
        Self {
            exclude_alternate_colour: false,
            sea_object: false,
            atmosphere: false,
            ocean: TerrainColours::default().ocean,
        }
    }
}

/// A mesh to write, and whether it is a cloud layer.
///
/// Cloud layers are lit from both sides and cast no shadow.
#[derive(Debug, Clone, Copy)]
pub struct PovMesh<'a> {
    pub mesh: &'a TriangleMesh,
    pub cloud: bool,
}

impl<'a> PovMesh<'a> {
    pub fn terrain(mesh: &'a TriangleMesh) -> Self {
        Self { mesh, cloud: false }
    }

    pub fn cloud(mesh: &'a TriangleMesh) -> Self {
        Self { mesh, cloud: true }
    }
}

/// Writes a POV-Ray scene containing every mesh in `meshes`.
///
/// The sea object and atmosphere follow the geometry and emissive level of
/// the first mesh. Every mesh is validated before anything is written.
pub fn export_pov<W: Write>(
    meshes: &[PovMesh<'_>],
    writer: &mut W,
    options: &PovExportOptions,
) -> Result<(), ExportError> {
    let Some(first) = meshes.first() else {
        return Ok(());
    };
    for item in meshes {
        item.mesh.validate()?;
    }

    write_header(first.mesh, writer, options)?;
    for item in meshes {
        write_mesh(item, writer, options)?;
    }
    writer.flush()?;

    log::info!("Exported {} meshes as POV-Ray mesh2", meshes.len());
    Ok(())
}

fn write_header<W: Write>(
    terrain: &TriangleMesh,
    w: &mut W,
    options: &PovExportOptions,
) -> Result<(), ExportError> {
    let emissive = terrain.emissive();
    let (sea, shells) = match terrain.geometry().kind() {
        GeometryKind::Spherical => (
            "sphere {<0.0,0.0,0.0>,1.0",
            ["sphere {<0.0,0.0,0.0>,1.025", "sphere {<0.0,0.0,0.0>,1.05"],
        ),
        GeometryKind::Flat => (
            "plane {<0.0,1.0,0.0>,0.0",
            ["plane {<0.0,1.0,0.0>,0.05", "plane {<0.0,1.0,0.0>,0.1"],
        ),
    };

    if options.sea_object {
        writeln!(
            w,
            "{} pigment{{rgb {}}} finish {{ambient {} diffuse {}}}}}",
            sea,
            format_rgb(options.ocean),
            emissive,
            1.0 - emissive
        )?;
    }

    if options.atmosphere {
        for (shell, scatter) in shells.iter().zip(["<1.0,1.0,1.0>", "<0.0,0.0,1.0>"]) {
            writeln!(
                w,
                "{} hollow texture {{pigment {{color rgbf 1}}}} interior{{media{{scattering{{1,color rgb {} extinction 1}}}}}}}}",
                shell, scatter
            )?;
        }
    }

    Ok(())
}

fn write_mesh<W: Write>(item: &PovMesh<'_>, w: &mut W, options: &PovExportOptions) -> Result<(), ExportError> {
    let mesh = item.mesh;
    let vertices = mesh.vertices();
    let vertex_count = vertices.len();
    let emissive = mesh.emissive();
    let (slots, triangle_count) = if options.exclude_alternate_colour {
        (1, mesh.colour0_triangle_count())
    } else {
        (2, mesh.triangle_count())
    };

    writeln!(w, "mesh2 {{")?;

    writeln!(w, "vertex_vectors {{{},", vertex_count)?;
    for (i, v) in vertices.iter().enumerate() {
        if i != 0 {
            write!(w, ",")?;
        }
        writeln!(w, "{}", format_xyz(v.position()))?;
    }
    writeln!(w, "}}")?;

    writeln!(w, "texture_list {{{}", vertex_count * slots)?;
    for slot in 0..slots {
        for v in vertices.iter() {
            let colour: ByteRgba = v.colour(slot).map_err(MeshError::from)?;
            write!(w, "texture{{pigment{{")?;
            if colour.a == u8::MAX {
                write!(w, "rgb {}}}", format_rgb(colour.into()))?;
            } else {
                write!(w, "rgbf {}}}", format_rgbf(colour.into()))?;
            }
            if emissive != 0.0 && v.emissive(slot).map_err(MeshError::from)? {
                write!(w, " finish{{ambient {} diffuse {}}}", emissive, 1.0 - emissive)?;
            }
            writeln!(w, "}}")?;
        }
    }
    writeln!(w, "}}")?;

    let switch = mesh.switch_colour();
    writeln!(w, "face_indices {{{},", triangle_count)?;
    for (t, triangle) in mesh.triangles().iter().take(triangle_count).enumerate() {
        if t != 0 {
            write!(w, ",")?;
        }
        let offset = if t >= switch { vertex_count as u32 } else { 0 };
        let [a, b, c] = triangle.vertices;
        write!(w, "<{},{},{}>", a, b, c)?;
        for corner in [a, b, c] {
            writeln!(w, ",{}", corner + offset)?;
        }
        writeln!(w)?;
    }
    writeln!(w, "}}")?;

    if item.cloud {
        writeln!(w, "double_illuminate")?;
        writeln!(w, "no_shadow")?;
    }
    writeln!(w, "}}")?;

    Ok(())
}

fn format_rgb(c: FloatRgba) -> String {
    format!("<{},{},{}>", c.r, c.g, c.b)
}

/// Colour with filter, where filter is the complement of alpha.
fn format_rgbf(c: FloatRgba) -> String {
    format!("<{},{},{},{}>", c.r, c.g, c.b, 1.0 - c.a)
}

fn format_xyz(p: Vec3) -> String {
    format!("<{},{},{}>", p.x, p.z, p.y)
}
