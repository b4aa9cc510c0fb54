//! Tests for Unpacker
//!
//! These tests verify:
//! - Header validation order and error kinds
//! - Rejection of truncated frames
//! - Parent containment of nested packets
//! - Sequential walking of siblings via `end()`

use typepack::packet::{is_size_valid, Packer};
use typepack::protocol::{AddTextCmd, TextArg};
use typepack::{
    verify_size, ByteBuffer, Composite, PacketError, PacketType, TypeId, Unpacker, ValuePacket,
    MAX_PACKET_SIZE, MIN_PACKET_SIZE,
};

// =============================================================================
// Helper Functions
// =============================================================================

const OUTER: TypeId = TypeId::from_fields(0x0100, 0, 0, [1; 8]);
const INNER: TypeId = TypeId::from_fields(0x0200, 0, 0, [2; 8]);

fn hello_frame() -> Vec<u8> {
    AddTextCmd { text: "hello".into() }.to_bytes().unwrap().to_vec()
}

fn set_size(bytes: &mut [u8], offset: usize, size: i32) {
    bytes[offset..offset + 4].copy_from_slice(&size.to_le_bytes());
}

// =============================================================================
// Size Validation
// =============================================================================

#[test]
fn test_verify_size_boundaries() {
    assert!(verify_size(15).is_err());
    assert!(verify_size(16).is_ok());
    assert!(verify_size(4096).is_ok());
    assert!(verify_size(4097).is_err());
    assert!(verify_size(0).is_err());
    assert!(verify_size(-1).is_err());
    assert!(verify_size(i32::MIN).is_err());

    assert!(is_size_valid(MIN_PACKET_SIZE));
    assert!(is_size_valid(MAX_PACKET_SIZE));
}

#[test]
fn test_invalid_size_in_header() {
    for size in [-5, 0, 15, 4097, i32::MAX] {
        let mut bytes = hello_frame();
        set_size(&mut bytes, 0, size);
        let err = Unpacker::new(&bytes, 0).unwrap_err();
        assert!(
            matches!(err, PacketError::InvalidPacketSize { .. }),
            "size {} gave {:?}",
            size,
            err
        );
    }
}

#[test]
fn test_bare_type_id_packet() {
    let mut buf = ByteBuffer::new();
    Packer::new(&mut buf, OUTER).finish().unwrap();

    let up = Unpacker::new(buf.as_slice(), 0).unwrap();
    assert_eq!(up.size(), 16);
    assert_eq!(up.data_size(), 0);
    assert!(up.is_end_of_packet());
    assert_eq!(up.children().count(), 0);
}

// =============================================================================
// Truncation
// =============================================================================

#[test]
fn test_header_too_short() {
    let bytes = hello_frame();
    for len in 0..4 {
        let err = Unpacker::new(&bytes[..len], 0).unwrap_err();
        assert!(matches!(err, PacketError::BufferTooSmallForHeader { .. }));
    }
}

#[test]
fn test_every_truncation_rejected() {
    let bytes = hello_frame();
    assert_eq!(bytes.len(), 50);

    for len in 4..bytes.len() {
        let err = Unpacker::new(&bytes[..len], 0).unwrap_err();
        assert!(
            matches!(
                err,
                PacketError::BufferTooSmallForPacket { end: 50, buffer_len, .. } if buffer_len == len
            ),
            "len {} gave {:?}",
            len,
            err
        );
        assert!(AddTextCmd::from_bytes(&bytes[..len]).is_err());
    }

    assert_eq!(AddTextCmd::from_bytes(&bytes).unwrap().text, "hello");
}

#[test]
fn test_truncation_reports_type_id_when_present() {
    let bytes = hello_frame();
    let err = Unpacker::new(&bytes[..30], 0).unwrap_err();
    assert!(matches!(
        err,
        PacketError::BufferTooSmallForPacket { type_id, .. } if type_id == AddTextCmd::TYPE_ID
    ));
}

#[test]
fn test_value_read_past_end_rejected() {
    let mut buf = ByteBuffer::new();
    let mut p = Packer::new(&mut buf, OUTER);
    p.write(1u16);
    p.finish().unwrap();
    // trailing bytes in the buffer must not be readable through the packet
    buf.append(&[0xFF; 8]);

    let mut up = Unpacker::new(buf.as_slice(), 0).unwrap();
    assert!(matches!(
        up.read::<u32>(),
        Err(PacketError::ValueExceedsPacketBounds { value_end: 24, end: 22, .. })
    ));
    // failed read does not move the cursor
    assert_eq!(up.read::<u16>().unwrap(), 1);
}

// =============================================================================
// Containment
// =============================================================================

#[test]
fn test_child_one_byte_past_parent() {
    let mut buf = ByteBuffer::new();
    {
        let mut outer = Packer::new(&mut buf, OUTER);
        let mut inner = outer.child(INNER);
        inner.write(9u32);
        inner.finish().unwrap();
        outer.finish().unwrap();
    }
    buf.append(&[0]);
    let mut bytes = buf.as_slice().to_vec();
    assert_eq!(bytes.len(), 45);

    // grow the child by one byte: it still fits the buffer but not the parent
    set_size(&mut bytes, 20, 21);

    let outer = Unpacker::new(&bytes, 0).unwrap();
    assert_eq!(outer.end(), 44);

    let err = outer.nested(outer.payload_start()).unwrap_err();
    assert!(matches!(
        err,
        PacketError::PacketProtrudesParent { type_id, end: 45, parent_end: 44 } if type_id == INNER
    ));

    let mut children = outer.children();
    assert!(children.next().unwrap().is_err());
    assert!(children.next().is_none());
    assert!(outer.find_child(INNER).is_err());
}

#[test]
fn test_child_exactly_filling_parent() {
    let mut buf = ByteBuffer::new();
    {
        let mut outer = Packer::new(&mut buf, OUTER);
        TextArg::write(&mut outer, "abc").unwrap();
        outer.finish().unwrap();
    }
    let outer = Unpacker::new(buf.as_slice(), 0).unwrap();
    let child = outer.nested(outer.payload_start()).unwrap();
    assert_eq!(child.end(), outer.end());
}

// =============================================================================
// Sibling Walking
// =============================================================================

#[test]
fn test_walk_root_packets_with_end() {
    let mut buf = ByteBuffer::new();
    TextArg::encode(&mut buf, "first").unwrap();
    TextArg::encode(&mut buf, "").unwrap();
    TextArg::encode(&mut buf, "third").unwrap();

    let bytes = buf.as_slice();
    let mut cursor = 0;
    let mut texts = Vec::new();
    while cursor < bytes.len() {
        let mut up = Unpacker::new(bytes, cursor).unwrap();
        texts.push(TextArg::read(&mut up).unwrap());
        cursor = up.end();
    }
    assert_eq!(texts, vec!["first", "", "third"]);
    assert_eq!(cursor, bytes.len());
}

#[test]
fn test_children_cursor_tracks_next_sibling() {
    let mut buf = ByteBuffer::new();
    {
        let mut outer = Packer::new(&mut buf, OUTER);
        for _ in 0..3 {
            let mut c = outer.child(INNER);
            c.write(0u8);
            c.finish().unwrap();
        }
        outer.finish().unwrap();
    }
    let outer = Unpacker::new(buf.as_slice(), 0).unwrap();
    let mut children = outer.children();
    assert_eq!(children.cursor(), 20);
    children.next().unwrap().unwrap();
    assert_eq!(children.cursor(), 41);
    children.next().unwrap().unwrap();
    children.next().unwrap().unwrap();
    assert_eq!(children.cursor(), outer.end());
    assert!(children.next().is_none());
}

#[test]
fn test_garbage_child_size_rejected() {
    let mut buf = ByteBuffer::new();
    {
        let mut outer = Packer::new(&mut buf, OUTER);
        outer.write_bytes(&[0xFF; 24]);
        outer.finish().unwrap();
    }
    let outer = Unpacker::new(buf.as_slice(), 0).unwrap();
    let err = outer.children().next().unwrap().unwrap_err();
    assert!(matches!(err, PacketError::InvalidPacketSize { size: -1, .. }));
}
