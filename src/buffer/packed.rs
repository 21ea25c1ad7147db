//! Growable array of fixed-size records stored in one contiguous block.

use std::fmt;

use bytemuck::Pod;

use super::error::BufferError;

/// Percentage of the current slot count added on each reallocation.
pub const CAPACITY_PCT_INCREASE: usize = 70;

/// A homogeneous array of `Pod` records backed by a single allocation.
///
/// The store distinguishes its logical length (the committed records) from
/// its capacity (the slots allocated). Reads are range-checked against the
/// length; writes through [`PackedArray::set`] extend the length as needed.
/// Growing allocates a fresh block and copies only the committed region.
#[derive(Clone)]
pub struct PackedArray<T: Pod> {
    block: Box<[T]>,
    len: usize,
}

impl<T: Pod> PackedArray<T> {
    /// Size in bytes of one record.
    pub const ELEMENT_SIZE: usize = std::mem::size_of::<T>();

    /// Creates an empty store with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            block: zeroed_block(capacity),
            len: 0,
        }
    }

    /// Number of committed records.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no records are committed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of record slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.block.len()
    }

    /// Capacity after one growth step from `capacity`.
    ///
    /// Adds `floor(capacity * 70 / 100)` slots, and always at least one so an
    /// empty allocation can still grow.
    pub fn grown_capacity(capacity: usize) -> usize {
        let increase = capacity * CAPACITY_PCT_INCREASE / 100;
        capacity + increase.max(1)
    }

    fn grow(&mut self) {
        let new_capacity = Self::grown_capacity(self.capacity());
        let mut block = zeroed_block(new_capacity);
        block[..self.len].copy_from_slice(&self.block[..self.len]);

        log::debug!(
            "Resizing packed buffer capacity to {} records ({} bytes)",
            new_capacity,
            new_capacity * Self::ELEMENT_SIZE
        );

        self.block = block;
    }

    fn reserve_slot(&mut self, index: usize) {
        while index >= self.capacity() {
            self.grow();
        }
    }

    /// Makes `index` addressable, extending the length over it if needed.
    ///
    /// Slots between the old length and `index` are zeroed.
    pub(crate) fn extend_to(&mut self, index: usize) {
        self.reserve_slot(index);
        if index >= self.len {
            self.block[self.len..index].fill(T::zeroed());
            self.len = index + 1;
        }
    }

    /// Appends a record, growing the block if it is full.
    pub fn push(&mut self, record: T) {
        if self.len == self.capacity() {
            self.grow();
        }
        self.block[self.len] = record;
        self.len += 1;
    }

    /// Writes a record at `index`, extending the length to `index + 1` if the
    /// index lies beyond it.
    pub fn set(&mut self, index: usize, record: T) {
        self.extend_to(index);
        self.block[index] = record;
    }

    /// Returns a copy of the record at `index`.
    pub fn get(&self, index: usize) -> Result<T, BufferError> {
        self.get_ref(index).copied()
    }

    /// Returns a reference to the record at `index`.
    pub fn get_ref(&self, index: usize) -> Result<&T, BufferError> {
        self.as_slice().get(index).ok_or(BufferError::IndexOutOfRange {
            index,
            len: self.len,
        })
    }

    /// Returns a mutable reference into the backing block at `index`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, BufferError> {
        let len = self.len;
        self.block[..len]
            .get_mut(index)
            .ok_or(BufferError::IndexOutOfRange { index, len })
    }

    /// Mutable reference to a slot, extending the length over it first.
    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut T {
        self.extend_to(index);
        &mut self.block[index]
    }

    /// Appends the committed records of `other`. `other` is left untouched.
    pub fn add_all(&mut self, other: &Self) {
        let needed = self.len + other.len;
        while self.capacity() < needed {
            self.grow();
        }
        self.block[self.len..needed].copy_from_slice(other.as_slice());
        self.len = needed;
    }

    /// Discards every record. Capacity is retained.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Read-only view of the committed records.
    pub fn as_slice(&self) -> &[T] {
        &self.block[..self.len]
    }

    /// Read-only byte view of the committed records.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.as_slice())
    }

    /// Iterates the committed records.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<T: Pod> fmt::Debug for PackedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackedArray")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("element_size", &Self::ELEMENT_SIZE)
            .finish()
    }
}

fn zeroed_block<T: Pod>(capacity: usize) -> Box<[T]> {
    vec![T::zeroed(); capacity].into_boxed_slice()
}
