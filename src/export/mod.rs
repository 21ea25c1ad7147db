//! Export module for saving finished meshes.
//!
//! Supports POV-Ray `mesh2` scenes for offline rendering and raw packed
//! buffers with a JSON manifest for engine imports.

mod pov;
mod raw;

use thiserror::Error;

use crate::mesh::MeshError;

pub use pov::{export_pov, PovExportOptions, PovMesh};
pub use raw::{export_raw, expected_file_sizes, MeshManifest, RawExportPaths};

/// Errors that can occur during export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Manifest serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mesh is not exportable: {0}")]
    Mesh(#[from] MeshError),
}
