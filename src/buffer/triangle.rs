//! Packed triangle index store.

use bytemuck::{Pod, Zeroable};

use super::error::BufferError;
use super::packed::PackedArray;

/// Three vertex indices, laid out as consecutive `u32`s.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct PackedTriangle {
    pub vertices: [u32; 3],
}

impl PackedTriangle {
    pub const fn new(v0: u32, v1: u32, v2: u32) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Vertex index at `corner` (0, 1 or 2).
    pub fn vertex(&self, corner: usize) -> Result<u32, BufferError> {
        self.vertices
            .get(corner)
            .copied()
            .ok_or(BufferError::CornerOutOfRange(corner))
    }

    /// The three vertex indices as `usize`.
    pub fn indices(&self) -> [usize; 3] {
        self.vertices.map(|v| v as usize)
    }
}

/// Growable store of triangles, exposed to renderers as a flat index block.
#[derive(Debug, Clone)]
pub struct TriangleBuffer {
    inner: PackedArray<PackedTriangle>,
}

impl Default for TriangleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TriangleBuffer {
    /// Triangle slots allocated by [`TriangleBuffer::new`].
    pub const DEFAULT_CAPACITY: usize = 30_000;
    /// Bytes per triangle.
    pub const ELEMENT_SIZE: usize = PackedArray::<PackedTriangle>::ELEMENT_SIZE;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: PackedArray::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Appends a triangle.
    pub fn add(&mut self, triangle: PackedTriangle) {
        self.inner.push(triangle);
    }

    /// Appends a triangle from its three vertex indices.
    pub fn add_indices(&mut self, v0: u32, v1: u32, v2: u32) {
        self.add(PackedTriangle::new(v0, v1, v2));
    }

    /// Writes a triangle at `index`, extending the length if needed.
    pub fn set(&mut self, index: usize, triangle: PackedTriangle) {
        self.inner.set(index, triangle);
    }

    /// Writes one corner of the triangle at `index`, extending the length if
    /// needed. The store is not touched when `corner` is invalid.
    pub fn set_vertex(&mut self, index: usize, corner: usize, value: u32) -> Result<(), BufferError> {
        if corner > 2 {
            return Err(BufferError::CornerOutOfRange(corner));
        }
        self.inner.slot_mut(index).vertices[corner] = value;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<PackedTriangle, BufferError> {
        self.inner.get(index)
    }

    /// Vertex index at one corner of the triangle at `index`.
    pub fn get_vertex(&self, index: usize, corner: usize) -> Result<u32, BufferError> {
        self.inner.get_ref(index)?.vertex(corner)
    }

    /// Appends every committed triangle of `source`.
    pub fn add_all(&mut self, source: &TriangleBuffer) {
        self.inner.add_all(&source.inner);
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn as_slice(&self) -> &[PackedTriangle] {
        self.inner.as_slice()
    }

    /// Index block for render handoff: `3 * len()` native-endian `u32`s.
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PackedTriangle> {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_growth_from_ten() {
        let mut buffer = TriangleBuffer::with_capacity(10);
        assert_eq!(buffer.capacity(), 10);

        for i in 0..11 {
            buffer.add_indices(i, i + 1, i + 2);
        }

        assert_eq!(buffer.capacity(), 17);
        assert_eq!(buffer.len(), 11);
    }

    #[test]
    fn test_set_and_overwrite() {
        let mut buffer = TriangleBuffer::new();
        buffer.set(0, PackedTriangle::new(1, 2, 3));
        assert_eq!(buffer.get(0).unwrap(), PackedTriangle::new(1, 2, 3));

        buffer.set(0, PackedTriangle::new(4, 5, 6));
        assert_eq!(buffer.get(0).unwrap(), PackedTriangle::new(4, 5, 6));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_add_and_get_vertices() {
        let mut buffer = TriangleBuffer::new();
        assert_eq!(buffer.len(), 0);
        buffer.add(PackedTriangle::new(1, 2, 3));
        buffer.add(PackedTriangle::new(4, 5, 6));

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.get_vertex(0, 0).unwrap(), 1);
        assert_eq!(buffer.get_vertex(0, 2).unwrap(), 3);
        assert_eq!(buffer.get_vertex(1, 1).unwrap(), 5);
    }

    #[test]
    fn test_out_of_range_access() {
        let mut buffer = TriangleBuffer::new();
        buffer.add_indices(0, 1, 2);

        assert_eq!(
            buffer.get(1),
            Err(BufferError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(buffer.get_vertex(0, 3), Err(BufferError::CornerOutOfRange(3)));
        assert_eq!(buffer.set_vertex(0, 3, 9), Err(BufferError::CornerOutOfRange(3)));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_set_vertex_extends_length() {
        let mut buffer = TriangleBuffer::with_capacity(1);
        buffer.set_vertex(2, 1, 42).unwrap();

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.get(2).unwrap(), PackedTriangle::new(0, 42, 0));
    }

    #[test]
    fn test_clear() {
        let mut buffer = TriangleBuffer::new();
        buffer.add_indices(1, 2, 3);
        assert_eq!(buffer.as_bytes().len(), 12);

        buffer.clear();

        assert_eq!(buffer.len(), 0);
        assert!(buffer.as_bytes().is_empty());
        assert_eq!(buffer.capacity(), TriangleBuffer::DEFAULT_CAPACITY);
    }

    #[test]
    fn test_add_all() {
        let mut source = TriangleBuffer::new();
        let mut buffer = TriangleBuffer::new();
        buffer.add_indices(1, 2, 3);
        buffer.add_indices(4, 5, 6);
        source.add_indices(7, 8, 9);
        source.add_indices(10, 11, 12);

        buffer.add_all(&source);

        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.as_bytes().len(), 4 * TriangleBuffer::ELEMENT_SIZE);
        let flat: Vec<u32> = buffer.iter().flat_map(|t| t.vertices).collect();
        assert_eq!(flat, (1..=12).collect::<Vec<_>>());
        assert_eq!(source.len(), 2);
        assert_eq!(source.get(1).unwrap(), PackedTriangle::new(10, 11, 12));
    }

    #[test]
    fn test_element_size() {
        assert_eq!(TriangleBuffer::ELEMENT_SIZE, 12);
    }
}
