//! Terrain generation on planets and flat patches.
//!
//! A [`TerrainMesh`] is built from a subdivided base shape, then shaped and
//! coloured by a sequence of passes: noise displacement, sea level, the land
//! power law, rivers, vertex normals and colouring. The passes are run by the
//! [`Pipeline`](crate::pipeline::Pipeline); each is also callable directly.

mod colours;
mod config;
mod heightmap;
mod rivers;
mod terrain_mesh;

pub use colours::{apply_colours, apply_debug_colours, snowline, BEACHLINE, TREELINE};
pub use config::{ConfigError, ObjectType, SnowlineConfig, TerrainColours, TerrainConfig, MAX_SUBDIVISIONS};
pub use heightmap::{apply_noise, apply_power_law, apply_sea_level};
pub use rivers::generate_rivers;
pub use terrain_mesh::{TerrainError, TerrainMesh};
