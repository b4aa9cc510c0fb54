//! Packet type identifiers
//!
//! A `TypeId` is a 16-byte opaque key naming a packet's logical shape.
//! The byte layout matches a Windows `GUID` in memory: `Data1` (u32),
//! `Data2` (u16) and `Data3` (u16) little-endian, followed by the eight
//! `Data4` bytes verbatim. That keeps frames byte-compatible with peers that
//! copy a `GUID` struct straight into the buffer.

use std::fmt;
use std::str::FromStr;

use uuid::fmt::{Braced, Hyphenated};
use uuid::Uuid;

use crate::error::{PacketError, Result};

/// Size of a type id on the wire
pub const TYPE_ID_SIZE: usize = 16;

/// 128-bit packet type identifier, stored in wire order
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TypeId([u8; TYPE_ID_SIZE]);

impl TypeId {
    /// The all-zero id
    pub const NIL: TypeId = TypeId(Uuid::nil().to_bytes_le());

    /// Build from raw wire bytes
    pub const fn from_bytes(bytes: [u8; TYPE_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Build from the four GUID groups, e.g. `2AD87975-EACB-4E94-A919-B3ACCB9A60D5`
    /// is `from_fields(0x2AD87975, 0xEACB, 0x4E94, [0xA9, 0x19, 0xB3, ...])`.
    pub const fn from_fields(d1: u32, d2: u16, d3: u16, d4: [u8; 8]) -> Self {
        Self::from_uuid(Uuid::from_fields(d1, d2, d3, &d4))
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.to_bytes_le())
    }

    /// The id as a `Uuid` with the same textual form
    pub const fn to_uuid(&self) -> Uuid {
        Uuid::from_bytes_le(self.0)
    }

    /// Raw wire bytes
    pub const fn as_bytes(&self) -> &[u8; TYPE_ID_SIZE] {
        &self.0
    }

    /// Read an id from the first 16 bytes of `bytes`
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; TYPE_ID_SIZE] = bytes.get(..TYPE_ID_SIZE)?.try_into().ok()?;
        Some(Self(raw))
    }

    /// The four GUID groups
    pub fn fields(&self) -> (u32, u16, u16, [u8; 8]) {
        let uuid = self.to_uuid();
        let (d1, d2, d3, d4) = uuid.as_fields();
        (d1, d2, d3, *d4)
    }

    pub fn is_nil(&self) -> bool {
        self.to_uuid().is_nil()
    }
}

impl From<Uuid> for TypeId {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl From<TypeId> for Uuid {
    fn from(id: TypeId) -> Self {
        id.to_uuid()
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.to_uuid().braced())
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self)
    }
}

impl FromStr for TypeId {
    type Err = PacketError;

    /// Parse `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX`, optionally wrapped in braces
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let uuid = if trimmed.starts_with('{') {
            Braced::from_str(trimmed).map(Braced::into_uuid)
        } else {
            Hyphenated::from_str(trimmed).map(Hyphenated::into_uuid)
        };
        uuid.map(Self::from_uuid)
            .map_err(|e| PacketError::InvalidTypeId(format!("{:?}: {}", s, e)))
    }
}
