//! Fixed-width scalars and packet payload values
//!
//! Scalars are encoded little-endian with no padding. Strings are UTF-16LE
//! code units and take the whole remaining payload of their packet.

use crate::buffer::ByteBuffer;
use crate::error::Result;
use crate::type_id::{TypeId, TYPE_ID_SIZE};

use super::{Packer, Unpacker};

/// A fixed-width value with a defined little-endian encoding
pub trait Scalar: Sized + Copy {
    /// Encoded width in bytes
    const SIZE: usize;

    /// Append the encoding and return the offset written at
    fn write_le(&self, buffer: &mut ByteBuffer) -> usize;

    /// Decode from exactly `SIZE` bytes
    fn read_le(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn write_le(&self, buffer: &mut ByteBuffer) -> usize {
                    buffer.append(&self.to_le_bytes())
                }

                fn read_le(bytes: &[u8]) -> Option<Self> {
                    Some(<$ty>::from_le_bytes(bytes.try_into().ok()?))
                }
            }
        )*
    };
}

impl_scalar!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// One byte, nonzero reads as `true`
impl Scalar for bool {
    const SIZE: usize = 1;

    fn write_le(&self, buffer: &mut ByteBuffer) -> usize {
        buffer.append(&[u8::from(*self)])
    }

    fn read_le(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [b] => Some(*b != 0),
            _ => None,
        }
    }
}

impl Scalar for TypeId {
    const SIZE: usize = TYPE_ID_SIZE;

    fn write_le(&self, buffer: &mut ByteBuffer) -> usize {
        buffer.append(self.as_bytes())
    }

    fn read_le(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != TYPE_ID_SIZE {
            return None;
        }
        TypeId::from_slice(bytes)
    }
}

// =============================================================================
// Payload values
// =============================================================================

/// Something that can be written as the payload of a value packet holding `V`.
///
/// Lets `&str` be written where the decoded value is a `String`.
pub trait PackAs<V> {
    fn pack_into(&self, packer: &mut Packer<'_>) -> usize;
}

/// The decoded payload of a value packet
pub trait PacketValue: Sized + PackAs<Self> {
    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self>;
}

impl<T: Scalar> PackAs<T> for T {
    fn pack_into(&self, packer: &mut Packer<'_>) -> usize {
        packer.write(*self)
    }
}

impl<T: Scalar> PacketValue for T {
    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        unpacker.read()
    }
}

impl PackAs<String> for str {
    fn pack_into(&self, packer: &mut Packer<'_>) -> usize {
        packer.write_str(self)
    }
}

impl PackAs<String> for String {
    fn pack_into(&self, packer: &mut Packer<'_>) -> usize {
        packer.write_str(self)
    }
}

impl PacketValue for String {
    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        unpacker.read_remaining_string()
    }
}

impl PackAs<Vec<u8>> for [u8] {
    fn pack_into(&self, packer: &mut Packer<'_>) -> usize {
        packer.write_bytes(self)
    }
}

impl PackAs<Vec<u8>> for Vec<u8> {
    fn pack_into(&self, packer: &mut Packer<'_>) -> usize {
        packer.write_bytes(self)
    }
}

impl PacketValue for Vec<u8> {
    fn unpack(unpacker: &mut Unpacker<'_>) -> Result<Self> {
        Ok(unpacker.read_remaining_bytes().to_vec())
    }
}
