//! Client Session
//!
//! Blocking request/response client for the text service.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::buffer::ByteBuffer;
use crate::error::{PacketError, Result};
use crate::packet::{PacketType, MAX_PACKET_SIZE};
use crate::protocol::{
    read_response, write_request, AddTextRes, GetAllTextsCmd, GetAllTextsRes, Request, Response,
};

/// One connected session
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    send_buf: ByteBuffer,
    recv_buf: ByteBuffer,
}

impl Client {
    /// Connect to a server
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .map_err(|e| PacketError::Network(format!("connect failed: {}", e)))?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            send_buf: ByteBuffer::with_capacity(MAX_PACKET_SIZE as usize),
            recv_buf: ByteBuffer::with_capacity(MAX_PACKET_SIZE as usize),
        })
    }

    /// Send one request and wait for its response
    pub fn request(&mut self, request: &Request) -> Result<Response> {
        write_request(&mut self.writer, request, &mut self.send_buf)?;
        read_response(&mut self.reader, &mut self.recv_buf)
    }

    /// Store a text; returns the server's result code
    pub fn add_text(&mut self, text: &str) -> Result<i32> {
        match self.request(&Request::add_text(text))? {
            Response::AddText(res) => Ok(res.code),
            other => Err(PacketError::TypeIdMismatch {
                expected: AddTextRes::TYPE_ID,
                actual: other.type_id(),
            }),
        }
    }

    /// Fetch every stored text
    pub fn get_all_texts(&mut self) -> Result<Vec<String>> {
        match self.request(&Request::GetAllTexts(GetAllTextsCmd))? {
            Response::GetAllTexts(res) => Ok(res.texts),
            other => Err(PacketError::TypeIdMismatch {
                expected: GetAllTextsRes::TYPE_ID,
                actual: other.type_id(),
            }),
        }
    }
}
