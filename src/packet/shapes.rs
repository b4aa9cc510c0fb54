//! Packet shapes
//!
//! Two kinds of packets are built on top of [`Packer`]/[`Unpacker`]:
//!
//! - **Value packets** hold exactly one scalar or string.
//! - **Composite packets** hold child packets in any order, like a tiny
//!   binary JSON object keyed by TypeId. Their fields are found by scanning
//!   the children for a matching TypeId.

use bytes::Bytes;

use crate::buffer::ByteBuffer;
use crate::error::{PacketError, Result};
use crate::type_id::TypeId;

use super::{PackAs, Packer, PacketValue, Unpacker};

/// A packet shape with a fixed TypeId
pub trait PacketType {
    const TYPE_ID: TypeId;

    /// Whether the unpacker is positioned on a packet of this type
    fn is_readable(unpacker: &Unpacker<'_>) -> bool {
        unpacker.type_id() == Self::TYPE_ID
    }
}

/// A packet whose payload is exactly one value
pub trait ValuePacket: PacketType {
    type Value: PacketValue;

    /// Write this value packet as a child of `parent`
    fn write<V>(parent: &mut Packer<'_>, value: &V) -> Result<usize>
    where
        V: PackAs<Self::Value> + ?Sized,
    {
        let mut packer = parent.child(Self::TYPE_ID);
        value.pack_into(&mut packer);
        packer.finish()
    }

    /// Write this value packet at the end of `buffer`
    fn encode<V>(buffer: &mut ByteBuffer, value: &V) -> Result<usize>
    where
        V: PackAs<Self::Value> + ?Sized,
    {
        let mut packer = Packer::new(buffer, Self::TYPE_ID);
        value.pack_into(&mut packer);
        packer.finish()
    }

    /// Decode a standalone packet of this type
    fn read(unpacker: &mut Unpacker<'_>) -> Result<Self::Value> {
        unpacker.expect_type(Self::TYPE_ID)?;
        Self::Value::unpack(unpacker)
    }

    /// Find and decode the first matching child of `parent`, or fail with
    /// `MissingRequiredArgument`
    fn value(parent: &Unpacker<'_>) -> Result<Self::Value> {
        Self::value_opt(parent)?.ok_or(PacketError::MissingRequiredArgument {
            type_id: Self::TYPE_ID,
            parent: parent.type_id(),
        })
    }

    /// Find and decode the first matching child of `parent`, if any
    fn value_opt(parent: &Unpacker<'_>) -> Result<Option<Self::Value>> {
        match parent.find_child(Self::TYPE_ID)? {
            Some(mut child) => Self::Value::unpack(&mut child).map(Some),
            None => Ok(None),
        }
    }

    /// Decode every matching child of `parent`, in encounter order
    fn array(parent: &Unpacker<'_>) -> Result<Vec<Self::Value>> {
        let mut values = Vec::new();
        for child in parent.children() {
            let mut child = child?;
            if child.type_id() == Self::TYPE_ID {
                values.push(Self::Value::unpack(&mut child)?);
            }
        }
        Ok(values)
    }
}

/// A command or response made of value-packet arguments
pub trait Composite: PacketType + Sized {
    /// Write each argument as a child packet
    fn encode_args(&self, packer: &mut Packer<'_>) -> Result<()>;

    /// Populate fields by type-directed lookup; the TypeId is not checked
    fn decode_args(unpacker: &Unpacker<'_>) -> Result<Self>;

    /// Append the whole packet to `buffer`; returns its encoded length
    fn encode(&self, buffer: &mut ByteBuffer) -> Result<usize> {
        let mut packer = Packer::new(buffer, Self::TYPE_ID);
        self.encode_args(&mut packer)?;
        packer.finish()
    }

    /// Encode into a fresh, immutable frame
    fn to_bytes(&self) -> Result<Bytes> {
        let mut buffer = ByteBuffer::new();
        self.encode(&mut buffer)?;
        Ok(buffer.freeze())
    }

    /// Decode after checking the TypeId
    fn decode(unpacker: &Unpacker<'_>) -> Result<Self> {
        unpacker.expect_type(Self::TYPE_ID)?;
        Self::decode_args(unpacker)
    }

    /// Decode a frame holding exactly this packet at offset 0
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let unpacker = Unpacker::new(bytes, 0)?;
        Self::decode(&unpacker)
    }
}

/// Declare a value packet type.
///
/// ```
/// use typepack::{value_packet, TypeId};
///
/// value_packet! {
///     /// Port number argument
///     pub struct PortArg(u16) = TypeId::from_fields(0x1, 0x2, 0x3, [0; 8]);
/// }
/// ```
#[macro_export]
macro_rules! value_packet {
    ($(#[$meta:meta])* $vis:vis struct $name:ident($value:ty) = $id:expr;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        $vis struct $name;

        impl $crate::packet::PacketType for $name {
            const TYPE_ID: $crate::TypeId = $id;
        }

        impl $crate::packet::ValuePacket for $name {
            type Value = $value;
        }
    };
}
