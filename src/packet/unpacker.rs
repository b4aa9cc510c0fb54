//! Packet Unpacker
//!
//! Validates and decodes one packet occupying a region of a byte slice.
//! All header checks run in the constructor; payload reads are bounds-checked
//! against the packet's own end, never just the buffer's.
//!
//! The read cursor is a plain offset owned by the unpacker. After a packet is
//! done, [`Unpacker::end`] is where its next sibling starts.

use crate::error::{PacketError, Result};
use crate::type_id::{TypeId, TYPE_ID_SIZE};

use super::{verify_size, Scalar, HEADER_SIZE, SIZE_FIELD_LEN};

/// Bounds-checked reader over one packet
#[derive(Debug, Clone)]
pub struct Unpacker<'a> {
    /// Whole buffer the packet lives in
    buf: &'a [u8],
    /// Offset of the size field
    start: usize,
    /// Declared size (TypeId + payload)
    size: i32,
    type_id: TypeId,
    /// Offset one past the last payload byte
    end: usize,
    /// Current read offset
    pos: usize,
}

impl<'a> Unpacker<'a> {
    /// Open the packet whose size field is at `cursor`
    pub fn new(buf: &'a [u8], cursor: usize) -> Result<Self> {
        Self::open(buf, cursor, None)
    }

    /// Open a child packet at `cursor`, which must end within this packet
    pub fn nested(&self, cursor: usize) -> Result<Unpacker<'a>> {
        Self::open(self.buf, cursor, Some(self.end))
    }

    fn open(buf: &'a [u8], start: usize, parent_end: Option<usize>) -> Result<Self> {
        // 1. size field present
        let size_bytes: [u8; SIZE_FIELD_LEN] = start
            .checked_add(SIZE_FIELD_LEN)
            .and_then(|field_end| buf.get(start..field_end))
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(PacketError::BufferTooSmallForHeader {
                start,
                buffer_len: buf.len(),
            })?;

        // 2. size within bounds
        let size = i32::from_le_bytes(size_bytes);
        verify_size(size)?;

        // 3. whole packet inside the buffer
        let body = start + SIZE_FIELD_LEN;
        let end = body + size as usize;
        if end > buf.len() {
            let type_id = buf.get(body..).and_then(TypeId::from_slice).unwrap_or_default();
            tracing::trace!(%type_id, end, buffer_len = buf.len(), "packet overruns buffer");
            return Err(PacketError::BufferTooSmallForPacket {
                type_id,
                end,
                buffer_len: buf.len(),
            });
        }

        // 4. containment
        let type_id = TypeId::from_slice(&buf[body..end]).ok_or(
            PacketError::BufferTooSmallForPacket {
                type_id: TypeId::NIL,
                end,
                buffer_len: buf.len(),
            },
        )?;
        if let Some(parent_end) = parent_end {
            if end > parent_end {
                tracing::trace!(%type_id, end, parent_end, "child packet protrudes parent");
                return Err(PacketError::PacketProtrudesParent {
                    type_id,
                    end,
                    parent_end,
                });
            }
        }

        Ok(Self {
            buf,
            start,
            size,
            type_id,
            end,
            pos: body + TYPE_ID_SIZE,
        })
    }

    // =========================================================================
    // Header state
    // =========================================================================

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Declared size: TypeId plus payload
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Payload size, excluding the TypeId
    pub fn data_size(&self) -> usize {
        self.size as usize - TYPE_ID_SIZE
    }

    /// Offset of the size field
    pub fn start(&self) -> usize {
        self.start
    }

    /// Offset just past this packet; the cursor for the next sibling
    pub fn end(&self) -> usize {
        self.end
    }

    /// Offset of the first payload byte
    pub fn payload_start(&self) -> usize {
        self.start + HEADER_SIZE
    }

    /// Current read offset
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left before the end of the packet
    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    pub fn is_end_of_packet(&self) -> bool {
        self.pos == self.end
    }

    /// The whole payload, independent of the read position
    pub fn payload(&self) -> &'a [u8] {
        &self.buf[self.payload_start()..self.end]
    }

    /// Strict shape check
    pub fn expect_type(&self, expected: TypeId) -> Result<()> {
        if self.type_id == expected {
            Ok(())
        } else {
            Err(PacketError::TypeIdMismatch {
                expected,
                actual: self.type_id,
            })
        }
    }

    // =========================================================================
    // Payload reads
    // =========================================================================

    /// Consume `n` bytes of payload
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let value_end = self
            .pos
            .checked_add(n)
            .filter(|value_end| *value_end <= self.end)
            .ok_or(PacketError::ValueExceedsPacketBounds {
                type_id: self.type_id,
                value_end: self.pos.saturating_add(n),
                end: self.end,
            })?;
        let bytes = &self.buf[self.pos..value_end];
        self.pos = value_end;
        Ok(bytes)
    }

    /// Read one fixed-width scalar
    pub fn read<T: Scalar>(&mut self) -> Result<T> {
        let value_end = self.pos.saturating_add(T::SIZE);
        let bytes = self.take(T::SIZE)?;
        T::read_le(bytes).ok_or(PacketError::ValueExceedsPacketBounds {
            type_id: self.type_id,
            value_end,
            end: self.end,
        })
    }

    /// Read `units` UTF-16 code units as a string
    pub fn read_string(&mut self, units: usize) -> Result<String> {
        let offset = self.pos;
        let byte_len = units.checked_mul(2).ok_or(PacketError::ValueExceedsPacketBounds {
            type_id: self.type_id,
            value_end: usize::MAX,
            end: self.end,
        })?;
        let bytes = self.take(byte_len)?;
        let code_units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&code_units).map_err(|_| PacketError::InvalidText {
            type_id: self.type_id,
            offset,
        })
    }

    /// Read the rest of the payload as a string.
    ///
    /// A value packet carries no string length; it is implied by the size.
    pub fn read_remaining_string(&mut self) -> Result<String> {
        let remaining = self.remaining();
        if remaining % 2 != 0 {
            return Err(PacketError::ValueExceedsPacketBounds {
                type_id: self.type_id,
                value_end: self.end + 1,
                end: self.end,
            });
        }
        self.read_string(remaining / 2)
    }

    /// Read the rest of the payload as raw bytes
    pub fn read_remaining_bytes(&mut self) -> &'a [u8] {
        let bytes = &self.buf[self.pos..self.end];
        self.pos = self.end;
        bytes
    }

    /// Skip whatever is left of the payload
    pub fn skip(&mut self) {
        self.pos = self.end;
    }

    // =========================================================================
    // Child packets
    // =========================================================================

    /// Iterate the child packets from the current position to the end
    pub fn children(&self) -> Children<'a> {
        Children {
            buf: self.buf,
            cursor: self.pos,
            parent_end: self.end,
            done: false,
        }
    }

    /// First child with the given type, scanning every sibling before it
    pub fn find_child(&self, type_id: TypeId) -> Result<Option<Unpacker<'a>>> {
        for child in self.children() {
            let child = child?;
            if child.type_id == type_id {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }
}

/// Iterator over sibling packets inside a parent payload.
///
/// Stops after the first framing error, since nothing past it can be trusted.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    buf: &'a [u8],
    cursor: usize,
    parent_end: usize,
    done: bool,
}

impl<'a> Children<'a> {
    /// Offset the next child would be read from
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = Result<Unpacker<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor >= self.parent_end {
            return None;
        }
        match Unpacker::open(self.buf, self.cursor, Some(self.parent_end)) {
            Ok(child) => {
                self.cursor = child.end;
                Some(Ok(child))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Children<'_> {}
