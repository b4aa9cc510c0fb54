//! Command definitions
//!
//! Requests sent from clients to the text service.

use std::sync::OnceLock;

use crate::buffer::ByteBuffer;
use crate::error::Result;
use crate::packet::{Composite, Packer, PacketType, Registry, Unpacker, ValuePacket};
use crate::type_id::TypeId;

use super::TextArg;

/// Append one text to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTextCmd {
    pub text: String,
}

impl PacketType for AddTextCmd {
    const TYPE_ID: TypeId = TypeId::from_fields(
        0x96FA_BA44,
        0xDB79,
        0x40CC,
        [0x8F, 0xE2, 0x57, 0x49, 0xD3, 0x7B, 0xC2, 0x7A],
    );
}

impl Composite for AddTextCmd {
    fn encode_args(&self, packer: &mut Packer<'_>) -> Result<()> {
        TextArg::write(packer, self.text.as_str())?;
        Ok(())
    }

    fn decode_args(unpacker: &Unpacker<'_>) -> Result<Self> {
        Ok(Self {
            text: TextArg::value(unpacker)?,
        })
    }
}

/// Fetch every stored text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GetAllTextsCmd;

impl PacketType for GetAllTextsCmd {
    const TYPE_ID: TypeId = TypeId::from_fields(
        0x135F_3A96,
        0xB2D9,
        0x44B4,
        [0x8D, 0xDF, 0x15, 0x8E, 0xE6, 0xB2, 0xE9, 0x93],
    );
}

impl Composite for GetAllTextsCmd {
    fn encode_args(&self, _packer: &mut Packer<'_>) -> Result<()> {
        Ok(())
    }

    fn decode_args(_unpacker: &Unpacker<'_>) -> Result<Self> {
        Ok(Self)
    }
}

/// Any request the service understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    AddText(AddTextCmd),
    GetAllTexts(GetAllTextsCmd),
}

impl Request {
    /// Shorthand for an `AddText` request
    pub fn add_text(text: impl Into<String>) -> Self {
        Request::AddText(AddTextCmd { text: text.into() })
    }

    /// TypeId of the command packet
    pub fn type_id(&self) -> TypeId {
        match self {
            Request::AddText(_) => AddTextCmd::TYPE_ID,
            Request::GetAllTexts(_) => GetAllTextsCmd::TYPE_ID,
        }
    }

    /// Append the command packet to `buffer`
    pub fn encode(&self, buffer: &mut ByteBuffer) -> Result<usize> {
        match self {
            Request::AddText(cmd) => cmd.encode(buffer),
            Request::GetAllTexts(cmd) => cmd.encode(buffer),
        }
    }

    /// Decode a command packet by dispatching on its TypeId
    pub fn decode(unpacker: &Unpacker<'_>) -> Result<Self> {
        registry().decode(unpacker)
    }

    /// Decode a frame holding one command at offset 0
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        registry().decode_bytes(bytes)
    }
}

fn registry() -> &'static Registry<Request> {
    static REGISTRY: OnceLock<Registry<Request>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        Registry::new()
            .with(Request::AddText)
            .with(Request::GetAllTexts)
    })
}
