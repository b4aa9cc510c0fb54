//! Packet Module
//!
//! Self-describing binary packets: each one is length-prefixed, tagged with a
//! 128-bit [`TypeId`](crate::TypeId), and may nest complete child packets in
//! its payload.
//!
//! ## Packet Format
//! ```text
//! ┌───────────┬────────────────┬──────────────────────────────┐
//! │ Size (4)  │  TypeId (16)   │     Payload (Size - 16)      │
//! └───────────┴────────────────┴──────────────────────────────┘
//! ```
//!
//! - `Size` is a little-endian `i32` counting everything after itself
//!   (TypeId + payload), bounded by [`MIN_PACKET_SIZE`]..=[`MAX_PACKET_SIZE`].
//! - A value packet's payload is one raw scalar or one UTF-16LE string with
//!   no length prefix and no terminator.
//! - A composite packet's payload is zero or more complete child packets in
//!   any order. Children are found by TypeId, never by position.

mod packer;
mod registry;
mod scalar;
mod shapes;
mod unpacker;

pub use packer::Packer;
pub use registry::Registry;
pub use scalar::{PackAs, PacketValue, Scalar};
pub use shapes::{Composite, PacketType, ValuePacket};
pub use unpacker::{Children, Unpacker};

use crate::error::{PacketError, Result};
use crate::type_id::TYPE_ID_SIZE;

/// Bytes taken by the size field
pub const SIZE_FIELD_LEN: usize = 4;

/// Header size: size field (4) + TypeId (16)
pub const HEADER_SIZE: usize = SIZE_FIELD_LEN + TYPE_ID_SIZE;

/// Smallest legal `size` value: a packet holds at least its TypeId
pub const MIN_PACKET_SIZE: i32 = TYPE_ID_SIZE as i32;

/// Largest legal `size` value, checked before anything is allocated
pub const MAX_PACKET_SIZE: i32 = 4096;

/// Check a declared packet size without decoding anything else
pub fn is_size_valid(size: i32) -> bool {
    (MIN_PACKET_SIZE..=MAX_PACKET_SIZE).contains(&size)
}

/// Reject a declared packet size outside the legal range.
///
/// Transports call this on the first four bytes of a frame so an oversized
/// frame is refused before it is buffered.
pub fn verify_size(size: i32) -> Result<()> {
    if is_size_valid(size) {
        Ok(())
    } else {
        tracing::debug!(size, "rejecting packet size");
        Err(invalid_size(size as i64))
    }
}

pub(crate) fn invalid_size(size: i64) -> PacketError {
    PacketError::InvalidPacketSize {
        size,
        min: MIN_PACKET_SIZE,
        max: MAX_PACKET_SIZE,
    }
}
