//! Response definitions
//!
//! Replies from the text service.

use std::sync::OnceLock;

use crate::buffer::ByteBuffer;
use crate::error::Result;
use crate::packet::{
    Composite, Packer, PacketType, Registry, Unpacker, ValuePacket, HEADER_SIZE, MAX_PACKET_SIZE,
};
use crate::type_id::TypeId;

use super::{ResultCodeArg, TextArg, STATUS_OK};

/// Result of an `AddTextCmd`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddTextRes {
    pub code: i32,
}

impl AddTextRes {
    pub fn ok() -> Self {
        Self { code: STATUS_OK }
    }

    pub fn is_ok(&self) -> bool {
        self.code >= 0
    }
}

impl PacketType for AddTextRes {
    const TYPE_ID: TypeId = TypeId::from_fields(
        0xF821_62F6,
        0x1FB5,
        0x4E19,
        [0x8A, 0x42, 0xF3, 0x96, 0xEC, 0x88, 0x50, 0x3F],
    );
}

impl Composite for AddTextRes {
    fn encode_args(&self, packer: &mut Packer<'_>) -> Result<()> {
        ResultCodeArg::write(packer, &self.code)?;
        Ok(())
    }

    fn decode_args(unpacker: &Unpacker<'_>) -> Result<Self> {
        Ok(Self {
            code: ResultCodeArg::value(unpacker)?,
        })
    }
}

/// Every stored text, each wrapped in its own `TextArg`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetAllTextsRes {
    pub texts: Vec<String>,
}

impl GetAllTextsRes {
    /// Build a response from the longest prefix of `texts` whose encoding
    /// stays within `MAX_PACKET_SIZE`
    pub fn fitting<I>(texts: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        // The outer TypeId counts against the size field; each child adds a
        // full header plus two bytes per UTF-16 unit.
        let mut budget = MAX_PACKET_SIZE as usize - crate::type_id::TYPE_ID_SIZE;
        let mut kept = Vec::new();
        for text in texts {
            let cost = HEADER_SIZE + text.encode_utf16().count() * 2;
            if cost > budget {
                break;
            }
            budget -= cost;
            kept.push(text);
        }
        Self { texts: kept }
    }
}

impl PacketType for GetAllTextsRes {
    const TYPE_ID: TypeId = TypeId::from_fields(
        0x65C3_EC0A,
        0x93F8,
        0x47FC,
        [0x82, 0xE8, 0x16, 0x0F, 0x72, 0xAB, 0xF2, 0x39],
    );
}

impl Composite for GetAllTextsRes {
    fn encode_args(&self, packer: &mut Packer<'_>) -> Result<()> {
        for text in &self.texts {
            TextArg::write(packer, text.as_str())?;
        }
        Ok(())
    }

    fn decode_args(unpacker: &Unpacker<'_>) -> Result<Self> {
        Ok(Self {
            texts: TextArg::array(unpacker)?,
        })
    }
}

/// Any response the service sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    AddText(AddTextRes),
    GetAllTexts(GetAllTextsRes),
}

impl Response {
    pub fn type_id(&self) -> TypeId {
        match self {
            Response::AddText(_) => AddTextRes::TYPE_ID,
            Response::GetAllTexts(_) => GetAllTextsRes::TYPE_ID,
        }
    }

    /// Append the response packet to `buffer`
    pub fn encode(&self, buffer: &mut ByteBuffer) -> Result<usize> {
        match self {
            Response::AddText(res) => res.encode(buffer),
            Response::GetAllTexts(res) => res.encode(buffer),
        }
    }

    /// Decode a response packet by dispatching on its TypeId
    pub fn decode(unpacker: &Unpacker<'_>) -> Result<Self> {
        registry().decode(unpacker)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        registry().decode_bytes(bytes)
    }
}

fn registry() -> &'static Registry<Response> {
    static REGISTRY: OnceLock<Registry<Response>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        Registry::new()
            .with(Response::AddText)
            .with(Response::GetAllTexts)
    })
}
