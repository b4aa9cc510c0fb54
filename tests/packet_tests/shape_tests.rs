//! Tests for value and composite packet shapes
//!
//! These tests verify:
//! - Order-independent composite decoding
//! - Multi-valued (array) arguments
//! - Required and optional argument lookup
//! - Registry dispatch by TypeId

use typepack::packet::{Packer, Registry};
use typepack::protocol::{AddTextCmd, GetAllTextsRes, TextArg};
use typepack::{
    value_packet, ByteBuffer, Composite, PacketError, PacketType, Result, TypeId, Unpacker,
    ValuePacket,
};

// =============================================================================
// Test Packets
// =============================================================================

value_packet! {
    /// Host name
    pub struct HostArg(String) = TypeId::from_fields(0xC0DE_0001, 0x0001, 0x0001, [0xA1; 8]);
}

value_packet! {
    /// Port number
    pub struct PortArg(u16) = TypeId::from_fields(0xC0DE_0002, 0x0002, 0x0002, [0xA2; 8]);
}

value_packet! {
    /// Secure flag
    pub struct TlsArg(bool) = TypeId::from_fields(0xC0DE_0003, 0x0003, 0x0003, [0xA3; 8]);
}

value_packet! {
    /// Tag, may repeat
    pub struct TagArg(String) = TypeId::from_fields(0xC0DE_0004, 0x0004, 0x0004, [0xA4; 8]);
}

#[derive(Debug, Clone, PartialEq)]
struct Endpoint {
    host: String,
    port: u16,
    tls: Option<bool>,
    tags: Vec<String>,
}

impl PacketType for Endpoint {
    const TYPE_ID: TypeId = TypeId::from_fields(0xC0DE_0010, 0x0010, 0x0010, [0xB0; 8]);
}

impl Composite for Endpoint {
    fn encode_args(&self, packer: &mut Packer<'_>) -> Result<()> {
        HostArg::write(packer, self.host.as_str())?;
        PortArg::write(packer, &self.port)?;
        if let Some(tls) = self.tls {
            TlsArg::write(packer, &tls)?;
        }
        for tag in &self.tags {
            TagArg::write(packer, tag.as_str())?;
        }
        Ok(())
    }

    fn decode_args(unpacker: &Unpacker<'_>) -> Result<Self> {
        Ok(Self {
            host: HostArg::value(unpacker)?,
            port: PortArg::value(unpacker)?,
            tls: TlsArg::value_opt(unpacker)?,
            tags: TagArg::array(unpacker)?,
        })
    }
}

fn endpoint() -> Endpoint {
    Endpoint {
        host: "example.org".into(),
        port: 8443,
        tls: Some(true),
        tags: vec!["a".into(), "b".into(), "c".into()],
    }
}

// =============================================================================
// Composite Decoding
// =============================================================================

#[test]
fn test_composite_roundtrip() {
    let ep = endpoint();
    let bytes = ep.to_bytes().unwrap();
    assert_eq!(Endpoint::from_bytes(&bytes).unwrap(), ep);
}

#[test]
fn test_children_in_any_order() {
    let mut buf = ByteBuffer::new();
    {
        let mut p = Packer::new(&mut buf, Endpoint::TYPE_ID);
        TagArg::write(&mut p, "a").unwrap();
        PortArg::write(&mut p, &8443u16).unwrap();
        TagArg::write(&mut p, "b").unwrap();
        TlsArg::write(&mut p, &true).unwrap();
        HostArg::write(&mut p, "example.org").unwrap();
        TagArg::write(&mut p, "c").unwrap();
        p.finish().unwrap();
    }
    assert_eq!(Endpoint::from_bytes(buf.as_slice()).unwrap(), endpoint());
}

#[test]
fn test_unknown_children_are_skipped() {
    let mut buf = ByteBuffer::new();
    {
        let mut p = Packer::new(&mut buf, Endpoint::TYPE_ID);
        let mut extra = p.child(TypeId::from_fields(0xFFFF, 0, 0, [0; 8]));
        extra.write_bytes(&[1, 2, 3, 4, 5]);
        extra.finish().unwrap();
        HostArg::write(&mut p, "h").unwrap();
        PortArg::write(&mut p, &1u16).unwrap();
        p.finish().unwrap();
    }
    let ep = Endpoint::from_bytes(buf.as_slice()).unwrap();
    assert_eq!(ep.host, "h");
    assert_eq!(ep.tls, None);
    assert!(ep.tags.is_empty());
}

#[test]
fn test_first_duplicate_wins_for_single_value() {
    let mut buf = ByteBuffer::new();
    {
        let mut p = Packer::new(&mut buf, Endpoint::TYPE_ID);
        PortArg::write(&mut p, &1u16).unwrap();
        PortArg::write(&mut p, &2u16).unwrap();
        HostArg::write(&mut p, "h").unwrap();
        p.finish().unwrap();
    }
    assert_eq!(Endpoint::from_bytes(buf.as_slice()).unwrap().port, 1);
}

#[test]
fn test_missing_required_argument() {
    let mut buf = ByteBuffer::new();
    {
        let mut p = Packer::new(&mut buf, Endpoint::TYPE_ID);
        HostArg::write(&mut p, "only-host").unwrap();
        p.finish().unwrap();
    }
    let err = Endpoint::from_bytes(buf.as_slice()).unwrap_err();
    assert!(matches!(
        err,
        PacketError::MissingRequiredArgument { type_id, parent }
            if type_id == PortArg::TYPE_ID && parent == Endpoint::TYPE_ID
    ));
}

#[test]
fn test_wrong_value_width_rejected() {
    let mut buf = ByteBuffer::new();
    {
        let mut p = Packer::new(&mut buf, Endpoint::TYPE_ID);
        HostArg::write(&mut p, "h").unwrap();
        let mut port = p.child(PortArg::TYPE_ID);
        port.write(1u8);
        port.finish().unwrap();
        p.finish().unwrap();
    }
    let err = Endpoint::from_bytes(buf.as_slice()).unwrap_err();
    assert!(matches!(err, PacketError::ValueExceedsPacketBounds { .. }));
}

// =============================================================================
// Arrays
// =============================================================================

#[test]
fn test_array_of_text_in_order() {
    let res = GetAllTextsRes {
        texts: vec!["a".into(), "b".into(), "c".into()],
    };
    let bytes = res.to_bytes().unwrap();

    let up = Unpacker::new(&bytes, 0).unwrap();
    assert_eq!(TextArg::array(&up).unwrap(), vec!["a", "b", "c"]);
    assert_eq!(GetAllTextsRes::from_bytes(&bytes).unwrap(), res);
}

#[test]
fn test_empty_array() {
    let bytes = GetAllTextsRes::default().to_bytes().unwrap();
    assert_eq!(bytes.len(), 20);
    assert!(GetAllTextsRes::from_bytes(&bytes).unwrap().texts.is_empty());
}

// =============================================================================
// Value Packets
// =============================================================================

#[test]
fn test_value_packet_width() {
    let mut buf = ByteBuffer::new();
    assert_eq!(PortArg::encode(&mut buf, &80u16).unwrap(), 22);
    assert_eq!(TlsArg::encode(&mut buf, &false).unwrap(), 21);
    assert_eq!(HostArg::encode(&mut buf, "ab").unwrap(), 24);

    let mut up = Unpacker::new(buf.as_slice(), 22).unwrap();
    assert!(TlsArg::is_readable(&up));
    assert!(!TlsArg::read(&mut up).unwrap());
}

#[test]
fn test_value_read_checks_type() {
    let mut buf = ByteBuffer::new();
    PortArg::encode(&mut buf, &80u16).unwrap();
    let mut up = Unpacker::new(buf.as_slice(), 0).unwrap();
    assert!(matches!(
        HostArg::read(&mut up),
        Err(PacketError::TypeIdMismatch { .. })
    ));
}

// =============================================================================
// Registry
// =============================================================================

#[derive(Debug, PartialEq)]
enum Message {
    Endpoint(Endpoint),
    Add(AddTextCmd),
}

#[test]
fn test_registry_dispatch() {
    let registry = Registry::new()
        .with(Message::Endpoint)
        .with(Message::Add);
    assert_eq!(registry.len(), 2);

    let bytes = endpoint().to_bytes().unwrap();
    assert_eq!(
        registry.decode_bytes(&bytes).unwrap(),
        Message::Endpoint(endpoint())
    );

    let bytes = AddTextCmd { text: "x".into() }.to_bytes().unwrap();
    assert_eq!(
        registry.decode_bytes(&bytes).unwrap(),
        Message::Add(AddTextCmd { text: "x".into() })
    );
}

#[test]
fn test_registry_rejects_unregistered() {
    let registry: Registry<Message> = Registry::new().with(Message::Add);
    let bytes = endpoint().to_bytes().unwrap();
    assert!(matches!(
        registry.decode_bytes(&bytes),
        Err(PacketError::UnknownPacketType(id)) if id == Endpoint::TYPE_ID
    ));
    assert!(!registry.contains(Endpoint::TYPE_ID));
}

#[test]
fn test_registry_later_registration_replaces() {
    let mut registry: Registry<u8> = Registry::new();
    registry.register(|_: AddTextCmd| 1);
    registry.register(|_: AddTextCmd| 2);
    assert_eq!(registry.len(), 1);

    let bytes = AddTextCmd { text: "x".into() }.to_bytes().unwrap();
    assert_eq!(registry.decode_bytes(&bytes).unwrap(), 2);
}
