//! Undirected edge keys for midpoint sharing during subdivision.

/// An undirected edge between two vertex indices.
///
/// The smaller index is always stored first, so the two triangles sharing an
/// edge produce the same key regardless of winding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(u32, u32);

impl EdgeKey {
    pub fn new(a: u32, b: u32) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn vertices(&self) -> (u32, u32) {
        (self.0, self.1)
    }
}
