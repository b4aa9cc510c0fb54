//! Error types for typepack
//!
//! Provides a unified error type for packing, unpacking and the demo service.

use thiserror::Error;

use crate::type_id::TypeId;

/// Result type alias using PacketError
pub type Result<T> = std::result::Result<T, PacketError>;

/// Unified error type for typepack operations
#[derive(Debug, Error)]
pub enum PacketError {
    // -------------------------------------------------------------------------
    // Framing Errors (header validation)
    // -------------------------------------------------------------------------
    #[error("buffer too small to read packet size: start {start}, buffer size {buffer_len}")]
    BufferTooSmallForHeader { start: usize, buffer_len: usize },

    #[error("invalid packet size {size} (allowed {min}..={max})")]
    InvalidPacketSize { size: i64, min: i32, max: i32 },

    #[error("buffer too small for packet {type_id}: packet end {end}, buffer size {buffer_len}")]
    BufferTooSmallForPacket {
        type_id: TypeId,
        end: usize,
        buffer_len: usize,
    },

    #[error("packet {type_id} protrudes its parent: packet end {end}, parent end {parent_end}")]
    PacketProtrudesParent {
        type_id: TypeId,
        end: usize,
        parent_end: usize,
    },

    // -------------------------------------------------------------------------
    // Payload Errors
    // -------------------------------------------------------------------------
    #[error("value exceeds bounds of packet {type_id}: value end {value_end}, packet end {end}")]
    ValueExceedsPacketBounds {
        type_id: TypeId,
        value_end: usize,
        end: usize,
    },

    #[error("invalid UTF-16 text in packet {type_id} at offset {offset}")]
    InvalidText { type_id: TypeId, offset: usize },

    #[error("packet type mismatch: expected {expected}, received {actual}")]
    TypeIdMismatch { expected: TypeId, actual: TypeId },

    #[error("missing required argument {type_id} in packet {parent}")]
    MissingRequiredArgument { type_id: TypeId, parent: TypeId },

    #[error("unknown packet type {0}")]
    UnknownPacketType(TypeId),

    // -------------------------------------------------------------------------
    // Buffer / Identifier Errors
    // -------------------------------------------------------------------------
    #[error("patch offset {offset} out of range for buffer of {buffer_len} bytes")]
    InvalidPatchOffset { offset: usize, buffer_len: usize },

    #[error("invalid type id text: {0}")]
    InvalidTypeId(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PacketError {
    /// Whether this error means the byte stream can no longer be trusted.
    ///
    /// The transport drops the connection on any of these rather than trying
    /// to resynchronise mid-stream.
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            PacketError::BufferTooSmallForHeader { .. }
                | PacketError::InvalidPacketSize { .. }
                | PacketError::BufferTooSmallForPacket { .. }
                | PacketError::PacketProtrudesParent { .. }
                | PacketError::ValueExceedsPacketBounds { .. }
                | PacketError::InvalidText { .. }
                | PacketError::TypeIdMismatch { .. }
                | PacketError::MissingRequiredArgument { .. }
                | PacketError::UnknownPacketType(_)
        )
    }
}
