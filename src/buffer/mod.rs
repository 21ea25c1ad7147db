//! Packed buffer stores.
//!
//! Vertices and triangles are kept in contiguous blocks of fixed-size
//! `#[repr(C)]` records so the committed region can be handed to a graphics
//! API as raw bytes without any repacking. Stores grow by 70% of their slot
//! count when full.

mod error;
mod packed;
mod triangle;
mod vertex;

pub use error::BufferError;
pub use packed::{PackedArray, CAPACITY_PCT_INCREASE};
pub use triangle::{PackedTriangle, TriangleBuffer};
pub use vertex::{PackedVertex, VertexBuffer};
