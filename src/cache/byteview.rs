//! Byte View Module
//!
//! Immutable view over cached value bytes.

use std::fmt;

use bytes::Bytes;

use super::lru::ByteLen;

// == Byte View ==
/// An immutable snapshot of value bytes.
///
/// Clones share the same buffer; nothing hands out a mutable reference to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteView {
    b: Bytes,
}

impl ByteView {
    /// Copies `data` into a new view.
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self {
            b: Bytes::copy_from_slice(data),
        }
    }

    /// Takes ownership of an already-owned buffer without copying.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self { b: Bytes::from(data) }
    }

    /// Returns the view's length in bytes.
    pub fn len(&self) -> usize {
        self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Borrows the underlying bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.b
    }

    /// Returns a cheap handle on the bytes, suitable for response bodies.
    pub fn to_bytes(&self) -> Bytes {
        self.b.clone()
    }
}

impl ByteLen for ByteView {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.b))
    }
}
