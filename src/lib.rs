//! # typepack
//!
//! Self-describing binary packets for request/response exchange over a
//! reliable byte stream:
//! - Length-prefixed frames tagged with a 128-bit TypeId
//! - Nested, unordered child packets looked up by TypeId
//! - Bounds-checked decoding with structured errors
//! - A small TCP text service built on top as a working consumer
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              TCP Server / Client  (network)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ read_packet / write_packet
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │          Commands & Responses  (protocol, Registry)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Packer    │          │  Unpacker   │
//!   │  (encode)   │          │ (validate)  │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          ▼                        ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ ByteBuffer  │          │   &[u8]     │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod buffer;
pub mod type_id;
pub mod packet;
pub mod protocol;
pub mod store;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PacketError, Result};
pub use config::Config;
pub use buffer::ByteBuffer;
pub use type_id::TypeId;
pub use packet::{
    verify_size, Composite, Packer, PacketType, Unpacker, ValuePacket, MAX_PACKET_SIZE,
    MIN_PACKET_SIZE,
};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of typepack
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
