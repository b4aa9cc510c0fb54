//! Stream framing
//!
//! Moves whole packets over a blocking byte stream. A frame is exactly one
//! root packet, so the reader takes the size field first, validates it, and
//! only then reads the body.
//!
//! ```text
//! read:  [Size (4)] -> verify_size -> [TypeId + Payload (Size)] -> Unpacker @ 0
//! write: encode into ByteBuffer -> write_all -> flush
//! ```

use std::io::{Read, Write};

use crate::buffer::ByteBuffer;
use crate::error::Result;
use crate::packet::{verify_size, SIZE_FIELD_LEN};

use super::{Request, Response};

// =============================================================================
// Raw packets
// =============================================================================

/// Read one framed packet into `buffer`, replacing its contents
///
/// Blocks until the whole frame has arrived. An oversized or undersized
/// size field is rejected before the body is read.
pub fn read_packet<R: Read>(reader: &mut R, buffer: &mut ByteBuffer) -> Result<()> {
    buffer.clear();

    let mut header = [0u8; SIZE_FIELD_LEN];
    reader.read_exact(&mut header)?;

    let size = i32::from_le_bytes(header);
    verify_size(size)?;

    buffer.append(&header);
    reader.read_exact(buffer.extend_zeroed(size as usize))?;
    Ok(())
}

/// Write one encoded packet and flush
pub fn write_packet<W: Write>(writer: &mut W, bytes: &[u8]) -> Result<()> {
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Typed messages
// =============================================================================

/// Read and decode the next request
pub fn read_request<R: Read>(reader: &mut R, buffer: &mut ByteBuffer) -> Result<Request> {
    read_packet(reader, buffer)?;
    Request::from_bytes(buffer.as_slice())
}

/// Encode and send a request, using `buffer` as scratch space
pub fn write_request<W: Write>(
    writer: &mut W,
    request: &Request,
    buffer: &mut ByteBuffer,
) -> Result<()> {
    buffer.clear();
    request.encode(buffer)?;
    write_packet(writer, buffer.as_slice())
}

/// Read and decode the next response
pub fn read_response<R: Read>(reader: &mut R, buffer: &mut ByteBuffer) -> Result<Response> {
    read_packet(reader, buffer)?;
    Response::from_bytes(buffer.as_slice())
}

/// Encode and send a response, using `buffer` as scratch space
pub fn write_response<W: Write>(
    writer: &mut W,
    response: &Response,
    buffer: &mut ByteBuffer,
) -> Result<()> {
    buffer.clear();
    response.encode(buffer)?;
    write_packet(writer, buffer.as_slice())
}
