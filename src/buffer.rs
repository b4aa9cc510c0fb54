//! Byte buffer
//!
//! Append-only staging area for encoded packets. The only in-place mutation
//! is `patch_u32`, used to backfill a size field once the payload is known.

use std::ops::Range;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{PacketError, Result};

/// Growable, append-only byte sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    inner: BytesMut,
}

impl ByteBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: BytesMut::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Append `bytes` and return the offset they were written at
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let offset = self.inner.len();
        self.inner.put_slice(bytes);
        offset
    }

    /// Append `n` zero bytes to be patched later; returns their offset
    pub fn reserve_header(&mut self, n: usize) -> usize {
        let offset = self.inner.len();
        self.inner.put_bytes(0, n);
        offset
    }

    /// Overwrite 4 bytes at `offset` with `value` (little-endian)
    pub fn patch_u32(&mut self, offset: usize, value: u32) -> Result<()> {
        let buffer_len = self.inner.len();
        let target = offset
            .checked_add(4)
            .filter(|end| *end <= buffer_len)
            .map(|end| &mut self.inner[offset..end])
            .ok_or(PacketError::InvalidPatchOffset { offset, buffer_len })?;
        target.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Bounds-checked byte read
    pub fn get(&self, index: usize) -> Option<u8> {
        self.inner.get(index).copied()
    }

    /// Bounds-checked range read
    pub fn slice(&self, range: Range<usize>) -> Option<&[u8]> {
        self.inner.get(range)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.inner
    }

    /// Drop all content, keeping the allocation for reuse
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Give up the buffer as immutable encoded bytes
    pub fn freeze(self) -> Bytes {
        self.inner.freeze()
    }

    /// Mutable tail for stream reads: grows by `n` zero bytes and returns them
    pub(crate) fn extend_zeroed(&mut self, n: usize) -> &mut [u8] {
        let start = self.reserve_header(n);
        &mut self.inner[start..]
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self {
            inner: BytesMut::from(bytes),
        }
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from(bytes.as_slice())
    }
}
