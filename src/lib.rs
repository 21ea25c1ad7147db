//! Fractal planet and terrain mesh generator.
//!
//! This crate builds subdivided icosahedron planets and flat terrain
//! patches over packed, GPU-ready vertex and triangle buffers, then shapes
//! them with fractal noise, sea level, rivers, snow and cloud passes.

pub mod buffer;
pub mod cloud;
pub mod colour;
pub mod export;
pub mod geometry;
pub mod mesh;
pub mod noise;
pub mod pipeline;
pub mod terrain;

pub use buffer::{BufferError, PackedTriangle, PackedVertex, TriangleBuffer, VertexBuffer};
pub use cloud::{CloudConfig, CloudMesh};
pub use colour::{ByteRgba, FloatRgba};
pub use geometry::{FlatGeometry, Geometry, GeometryKind, SphericalGeometry};
pub use mesh::{MeshError, MeshStats, RenderBuffers, TriangleMesh};
pub use noise::FractalNoiseConfig;
pub use pipeline::{GenerationStage, Pipeline, PipelineError};
pub use terrain::{ObjectType, TerrainConfig, TerrainError, TerrainMesh};
