//! Errors raised by the packed buffer stores.

use thiserror::Error;

/// Bounds violations on a packed store. There is no clamping: every
/// out-of-range access is reported to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Index {index} out of range (length is {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Illegal access to triangle corner {0} (must be 0..=2)")]
    CornerOutOfRange(usize),
    #[error("Illegal access to vertex slot {0} (must be 0 or 1)")]
    SlotOutOfRange(usize),
}
