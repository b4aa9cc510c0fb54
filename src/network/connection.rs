//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::buffer::ByteBuffer;
use crate::error::{PacketError, Result};
use crate::packet::MAX_PACKET_SIZE;
use crate::protocol::{
    read_request, write_response, AddTextRes, GetAllTextsRes, Request, Response, STATUS_OK,
    STATUS_STORE_FULL,
};
use crate::store::TextStore;

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Shared text store
    store: Arc<TextStore>,

    /// Scratch buffers reused across requests
    recv_buf: ByteBuffer,
    send_buf: ByteBuffer,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, store: Arc<TextStore>) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            store,
            recv_buf: ByteBuffer::with_capacity(MAX_PACKET_SIZE as usize),
            send_buf: ByteBuffer::with_capacity(MAX_PACKET_SIZE as usize),
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 leaves a timeout unset)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Serve requests until the client disconnects or the stream breaks.
    ///
    /// Any framing or decode error ends the session: once a frame is bad the
    /// byte alignment of everything after it is unknown.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            let request = match read_request(&mut self.reader, &mut self.recv_buf) {
                Ok(request) => request,
                Err(PacketError::Io(ref e)) if is_disconnect(e.kind()) => {
                    tracing::debug!("Client {} disconnected ({:?})", self.peer_addr, e.kind());
                    return Ok(());
                }
                Err(e) if e.is_framing() => {
                    tracing::warn!("Dropping {} after malformed packet: {}", self.peer_addr, e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            tracing::trace!("Received request from {}: {:?}", self.peer_addr, request);

            let response = self.execute(request);

            if let Err(e) = write_response(&mut self.writer, &response, &mut self.send_buf) {
                if let PacketError::Io(ref io_err) = e {
                    if is_disconnect(io_err.kind()) {
                        tracing::debug!(
                            "Client {} disconnected before response could be sent: {}",
                            self.peer_addr,
                            e
                        );
                        return Ok(());
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    /// Execute a request against the store
    fn execute(&self, request: Request) -> Response {
        match request {
            Request::AddText(cmd) => {
                let code = if self.store.add(cmd.text) {
                    STATUS_OK
                } else {
                    tracing::debug!("Text store full, rejecting add from {}", self.peer_addr);
                    STATUS_STORE_FULL
                };
                Response::AddText(AddTextRes { code })
            }
            Request::GetAllTexts(_) => {
                let stored = self.store.len();
                let res = GetAllTextsRes::fitting(self.store.all());
                if res.texts.len() < stored {
                    tracing::debug!(
                        "Returning {} of {} texts to {} (packet size limit)",
                        res.texts.len(),
                        stored,
                        self.peer_addr
                    );
                }
                Response::GetAllTexts(res)
            }
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::WouldBlock
            | ErrorKind::TimedOut
    )
}
