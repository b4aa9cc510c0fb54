//! Argument packets
//!
//! Value packets carried inside commands and responses.

use crate::type_id::TypeId;
use crate::value_packet;

/// Success
pub const STATUS_OK: i32 = 0;

/// The text store has reached its capacity (`E_OUTOFMEMORY`)
pub const STATUS_STORE_FULL: i32 = 0x8007_000E_u32 as i32;

value_packet! {
    /// A single text value
    pub struct TextArg(String) = TypeId::from_fields(
        0x2AD8_7975,
        0xEACB,
        0x4E94,
        [0xA9, 0x19, 0xB3, 0xAC, 0xCB, 0x9A, 0x60, 0xD5],
    );
}

value_packet! {
    /// HRESULT-style status code
    pub struct ResultCodeArg(i32) = TypeId::from_fields(
        0x7496_B65F,
        0x51BF,
        0x44E8,
        [0xA7, 0x41, 0xD4, 0xD5, 0x76, 0x30, 0x10, 0x18],
    );
}
