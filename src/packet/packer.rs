//! Packet Packer
//!
//! Builds one packet into a [`ByteBuffer`]. The size field is reserved up
//! front and patched in [`Packer::finish`] once the payload is complete.

use crate::buffer::ByteBuffer;
use crate::error::Result;
use crate::type_id::TypeId;

use super::{invalid_size, Scalar, MAX_PACKET_SIZE, MIN_PACKET_SIZE, SIZE_FIELD_LEN};

/// Incremental writer for a single packet
///
/// Nested packets are opened with [`Packer::child`]; the child borrows this
/// packer, so it has to be finished before the parent can write again.
/// A packer that is dropped without `finish()` leaves a bare-TypeId size in
/// its header and the buffer must be discarded.
#[must_use = "a packer must be finished to patch its size field"]
#[derive(Debug)]
pub struct Packer<'a> {
    /// Destination buffer (shared with parents and children)
    buffer: &'a mut ByteBuffer,
    /// Offset of this packet's size field
    start: usize,
    type_id: TypeId,
}

impl<'a> Packer<'a> {
    /// Start a packet: writes a placeholder size and the type id
    pub fn new(buffer: &'a mut ByteBuffer, type_id: TypeId) -> Self {
        let start = buffer.append(&MIN_PACKET_SIZE.to_le_bytes());
        buffer.append(type_id.as_bytes());
        Self {
            buffer,
            start,
            type_id,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Offset of this packet's size field in the buffer
    pub fn start(&self) -> usize {
        self.start
    }

    /// Bytes written for this packet so far, header included
    pub fn len(&self) -> usize {
        self.buffer.len() - self.start
    }

    /// Whether nothing beyond the header has been written
    pub fn is_empty(&self) -> bool {
        self.len() == super::HEADER_SIZE
    }

    /// Append a fixed-width scalar; returns the offset written at
    pub fn write<T: Scalar>(&mut self, value: T) -> usize {
        value.write_le(&mut *self.buffer)
    }

    /// Append text as UTF-16LE code units, no length prefix, no terminator
    pub fn write_str(&mut self, text: &str) -> usize {
        let offset = self.buffer.len();
        for unit in text.encode_utf16() {
            self.buffer.append(&unit.to_le_bytes());
        }
        offset
    }

    /// Append raw UTF-16 code units
    pub fn write_utf16(&mut self, units: &[u16]) -> usize {
        let offset = self.buffer.len();
        for unit in units {
            self.buffer.append(&unit.to_le_bytes());
        }
        offset
    }

    /// Append raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> usize {
        self.buffer.append(bytes)
    }

    /// Open a nested packet in the same buffer
    pub fn child(&mut self, type_id: TypeId) -> Packer<'_> {
        Packer::new(&mut *self.buffer, type_id)
    }

    /// Patch the size field and return the packet's total encoded length.
    ///
    /// Fails if the packet grew past `MAX_PACKET_SIZE`; the buffer then holds
    /// an unusable frame and must be discarded.
    pub fn finish(self) -> Result<usize> {
        let size = self.buffer.len() - self.start - SIZE_FIELD_LEN;
        if size > MAX_PACKET_SIZE as usize {
            tracing::debug!(type_id = %self.type_id, size, "packet too large to finish");
            return Err(invalid_size(size as i64));
        }
        self.buffer.patch_u32(self.start, size as u32)?;
        Ok(size + SIZE_FIELD_LEN)
    }
}
