//! Packed vertex store with interleaved attributes.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::colour::ByteRgba;
use super::error::BufferError;
use super::packed::PackedArray;

const EMISSIVE_SET: u8 = 0xff;

/// One interleaved vertex record (40 bytes).
///
/// | offset | field    | layout                    |
/// |--------|----------|---------------------------|
/// | 0      | position | 3 × f32                   |
/// | 12     | normal   | 3 × f32                   |
/// | 24     | colour   | 2 slots × RGBA u8         |
/// | 32     | emissive | 2 slots × 4 bytes, byte 0 |
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PackedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub colour: [[u8; 4]; 2],
    pub emissive: [[u8; 4]; 2],
}

impl PackedVertex {
    /// A vertex at `position` with zero normal, black colours and no emission.
    pub fn at(position: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: [0.0; 3],
            colour: [ByteRgba::BLACK.to_array(); 2],
            emissive: [[0; 4]; 2],
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    pub fn colour(&self, slot: usize) -> Result<ByteRgba, BufferError> {
        self.colour
            .get(slot)
            .map(|c| ByteRgba::from_array(*c))
            .ok_or(BufferError::SlotOutOfRange(slot))
    }

    pub fn set_colour(&mut self, slot: usize, colour: ByteRgba) -> Result<(), BufferError> {
        let c = self
            .colour
            .get_mut(slot)
            .ok_or(BufferError::SlotOutOfRange(slot))?;
        *c = colour.to_array();
        Ok(())
    }

    pub fn emissive(&self, slot: usize) -> Result<bool, BufferError> {
        self.emissive
            .get(slot)
            .map(|e| e[0] != 0)
            .ok_or(BufferError::SlotOutOfRange(slot))
    }

    pub fn set_emissive(&mut self, slot: usize, emissive: bool) -> Result<(), BufferError> {
        let e = self
            .emissive
            .get_mut(slot)
            .ok_or(BufferError::SlotOutOfRange(slot))?;
        *e = [if emissive { EMISSIVE_SET } else { 0 }, 0, 0, 0];
        Ok(())
    }
}

/// Growable store of vertices, exposed to renderers as one interleaved block.
///
/// Position and normal setters extend the store like [`VertexBuffer::set`];
/// every other accessor is range-checked against the committed length.
#[derive(Debug, Clone)]
pub struct VertexBuffer {
    inner: PackedArray<PackedVertex>,
}

impl Default for VertexBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexBuffer {
    /// Vertex slots allocated by [`VertexBuffer::new`].
    pub const DEFAULT_CAPACITY: usize = 50_000;
    /// Bytes per vertex record.
    pub const ELEMENT_SIZE: usize = PackedArray::<PackedVertex>::ELEMENT_SIZE;

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

    /// Appends a vertex and returns its index.
    pub fn add(&mut self, vertex: PackedVertex) -> u32 {
        let index = self.len() as u32;
        self.inner.push(vertex);
        index
    }

    /// Appends a fresh vertex at `position` and returns its index.
    pub fn add_position(&mut self, position: Vec3) -> u32 {
        self.add(PackedVertex::at(position))
    }

    /// Writes a whole record at `index`, extending the length if needed.
    pub fn set(&mut self, index: usize, vertex: PackedVertex) {
        self.inner.set(index, vertex);
    }

    pub fn get(&self, index: usize) -> Result<PackedVertex, BufferError> {
        self.inner.get(index)
    }

    /// Direct mutable access to the record at `index`.
    pub fn record_mut(&mut self, index: usize) -> Result<&mut PackedVertex, BufferError> {
        self.inner.get_mut(index)
    }

    pub fn position(&self, index: usize) -> Result<Vec3, BufferError> {
        Ok(self.inner.get_ref(index)?.position())
    }

    pub fn set_position(&mut self, index: usize, position: Vec3) {
        self.inner.slot_mut(index).position = position.to_array();
    }

    pub fn normal(&self, index: usize) -> Result<Vec3, BufferError> {
        Ok(self.inner.get_ref(index)?.normal())
    }

    pub fn set_normal(&mut self, index: usize, normal: Vec3) {
        self.inner.slot_mut(index).normal = normal.to_array();
    }

    pub fn colour(&self, index: usize, slot: usize) -> Result<ByteRgba, BufferError> {
        self.inner.get_ref(index)?.colour(slot)
    }

    pub fn set_colour(&mut self, index: usize, slot: usize, colour: ByteRgba) -> Result<(), BufferError> {
        self.inner.get_mut(index)?.set_colour(slot, colour)
    }

    pub fn emissive(&self, index: usize, slot: usize) -> Result<bool, BufferError> {
        self.inner.get_ref(index)?.emissive(slot)
    }

    pub fn set_emissive(&mut self, index: usize, slot: usize, emissive: bool) -> Result<(), BufferError> {
        self.inner.get_mut(index)?.set_emissive(slot, emissive)
    }

    /// Appends every committed vertex of `source`.
    pub fn add_all(&mut self, source: &VertexBuffer) {
        self.inner.add_all(&source.inner);
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn as_slice(&self) -> &[PackedVertex] {
        self.inner.as_slice()
    }

    /// Interleaved vertex block for render handoff.
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PackedVertex> {
        self.inner.iter()
    }

    /// Iterates the committed positions.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.iter().map(PackedVertex::position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vertex(seed: f32) -> PackedVertex {
        let mut v = PackedVertex::at(Vec3::new(seed, seed + 1.0, seed + 2.0));
        v.normal = [0.0, 0.0, 1.0];
        v.set_colour(0, ByteRgba::new(1, 2, 3, 4)).unwrap();
        v.set_colour(1, ByteRgba::new(5, 6, 7, 8)).unwrap();
        v.set_emissive(1, true).unwrap();
        v
    }

    #[test]
    fn test_record_layout() {
        assert_eq!(VertexBuffer::ELEMENT_SIZE, 40);
        assert_eq!(std::mem::align_of::<PackedVertex>(), 4);

        let mut buffer = VertexBuffer::with_capacity(1);
        buffer.add(sample_vertex(1.0));
        let bytes = buffer.as_bytes();

        assert_eq!(bytes.len(), 40);
        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
        assert_eq!(&bytes[20..24], &1.0f32.to_ne_bytes());
        assert_eq!(&bytes[24..32], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(&bytes[32..40], &[0, 0, 0, 0, 0xff, 0, 0, 0]);
    }

    #[test]
    fn test_add_returns_index_and_grows() {
        let mut buffer = VertexBuffer::with_capacity(2);
        for i in 0..50 {
            assert_eq!(buffer.add(sample_vertex(i as f32)), i);
        }

        assert_eq!(buffer.len(), 50);
        assert!(buffer.capacity() >= 50);
        for i in 0..50 {
            assert_eq!(buffer.get(i).unwrap(), sample_vertex(i as f32));
        }
    }

    #[test]
    fn test_field_accessors() {
        let mut buffer = VertexBuffer::new();
        let i = buffer.add_position(Vec3::X) as usize;

        assert_eq!(buffer.colour(i, 0).unwrap(), ByteRgba::BLACK);
        assert!(!buffer.emissive(i, 0).unwrap());

        buffer.set_normal(i, Vec3::Y);
        buffer.set_colour(i, 1, ByteRgba::RED).unwrap();
        buffer.set_emissive(i, 0, true).unwrap();

        assert_eq!(buffer.normal(i).unwrap(), Vec3::Y);
        assert_eq!(buffer.colour(i, 1).unwrap(), ByteRgba::RED);
        assert!(buffer.emissive(i, 0).unwrap());

        buffer.set_emissive(i, 0, false).unwrap();
        assert!(!buffer.emissive(i, 0).unwrap());
    }

    #[test]
    fn test_slot_and_index_errors() {
        let mut buffer = VertexBuffer::new();
        buffer.add_position(Vec3::ZERO);

        assert_eq!(buffer.colour(0, 2), Err(BufferError::SlotOutOfRange(2)));
        assert_eq!(buffer.set_emissive(0, 2, true), Err(BufferError::SlotOutOfRange(2)));
        assert_eq!(
            buffer.position(1),
            Err(BufferError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert!(buffer.set_colour(3, 0, ByteRgba::WHITE).is_err());
    }

    #[test]
    fn test_set_position_extends() {
        let mut buffer = VertexBuffer::with_capacity(1);
        buffer.set_position(4, Vec3::splat(2.0));

        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.position(4).unwrap(), Vec3::splat(2.0));
        assert_eq!(buffer.position(2).unwrap(), Vec3::ZERO);
    }

    #[test]
    fn test_add_all_and_clear() {
        let mut a = VertexBuffer::with_capacity(1);
        let mut b = VertexBuffer::with_capacity(4);
        a.add(sample_vertex(0.0));
        b.add(sample_vertex(10.0));
        b.add(sample_vertex(20.0));

        a.add_all(&b);

        assert_eq!(a.len(), 3);
        assert_eq!(a.get(2).unwrap(), sample_vertex(20.0));
        assert_eq!(b.len(), 2);

        let capacity = a.capacity();
        a.clear();
        assert!(a.is_empty());
        assert_eq!(a.capacity(), capacity);
    }
}
