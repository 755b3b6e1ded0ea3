//! packets/literal.rs
//! Literal data packet: the payload carrier and the main streaming case.
//!
//! Layout:
//!
//! ```text
//! [ format (1) ][ name_len (1) ][ filename (name_len) ][ date (4, big-endian) ][ data (..) ]
//! ```

use std::any::Any;

use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, Bytes, BytesMut};
use num_enum::TryFromPrimitive;

use crate::config::PacketConfig;
use crate::packet_list::PacketList;
use crate::packets::raw::StoredBody;
use crate::packets::types::{Body, BodyError, PacketBody, PacketTag};
use crate::streaming::BodyStream;

/// Data format octet.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum LiteralFormat {
    Binary = b'b',
    Text   = b't',
    Utf8   = b'u',
    Mime   = b'm',
}

impl Default for LiteralFormat {
    fn default() -> Self {
        LiteralFormat::Binary
    }
}

/// Fixed fields before the filename: format + name length.
const PREFIX_LEN: usize = 2;
const DATE_LEN: usize = 4;

#[derive(Debug, Default)]
pub struct LiteralDataPacket {
    format: LiteralFormat,
    filename: Vec<u8>,
    date: u32,
    data: StoredBody,
}

impl LiteralDataPacket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: impl Into<Bytes>) -> Self {
        let mut p = Self::new();
        p.data.set_bytes(data.into());
        p
    }

    pub fn with_stream(stream: BodyStream) -> Self {
        let mut p = Self::new();
        p.data.set_stream(stream);
        p
    }

    pub fn format(&self) -> LiteralFormat {
        self.format
    }

    pub fn set_format(&mut self, format: LiteralFormat) {
        self.format = format;
    }

    pub fn filename(&self) -> &[u8] {
        &self.filename
    }

    /// Filenames are limited to 255 bytes by the length octet.
    pub fn set_filename(&mut self, name: impl Into<Vec<u8>>) -> Result<(), BodyError> {
        let name = name.into();
        if name.len() > u8::MAX as usize {
            return Err(BodyError::Invalid(format!("filename too long: {} bytes", name.len())));
        }
        self.filename = name;
        Ok(())
    }

    pub fn date(&self) -> u32 {
        self.date
    }

    pub fn set_date(&mut self, date: u32) {
        self.date = date;
    }

    pub fn data(&self) -> &Bytes {
        self.data.bytes()
    }

    pub fn set_data(&mut self, data: impl Into<Bytes>) {
        self.data.set_bytes(data.into());
    }

    pub fn set_stream(&mut self, stream: BodyStream) {
        self.data.set_stream(stream);
    }

    fn encode_prefix(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(PREFIX_LEN + self.filename.len() + DATE_LEN);
        out.put_u8(self.format as u8);
        out.put_u8(self.filename.len() as u8);
        out.put_slice(&self.filename);
        out.put_u32(self.date);
        out.freeze()
    }
}

impl PacketBody for LiteralDataPacket {
    fn tag(&self) -> u8 {
        PacketTag::LiteralData as u8
    }

    fn read(&mut self, body: Bytes, _children: &mut PacketList, _config: &PacketConfig, _depth: usize) -> Result<(), BodyError> {
        if body.len() < PREFIX_LEN {
            return Err(BodyError::TooShort { need: PREFIX_LEN, have: body.len() });
        }
        let format = LiteralFormat::try_from(body[0])
            .map_err(|_| BodyError::Invalid(format!("unknown literal format 0x{:02x}", body[0])))?;

        let name_len = body[1] as usize;
        let header_len = PREFIX_LEN + name_len + DATE_LEN;
        if body.len() < header_len {
            return Err(BodyError::TooShort { need: header_len, have: body.len() });
        }

        self.format = format;
        self.filename = body[PREFIX_LEN..PREFIX_LEN + name_len].to_vec();
        self.date = BigEndian::read_u32(&body[PREFIX_LEN + name_len..header_len]);
        self.data.set_bytes(body.slice(header_len..));
        Ok(())
    }

    fn write(&self, _children: &PacketList, _config: &PacketConfig) -> Result<Body, BodyError> {
        let prefix = self.encode_prefix();
        match self.data.take()? {
            Body::Stream(stream) => Ok(Body::Stream(stream.prepend(prefix))),
            Body::Bytes(data) => {
                let mut out = BytesMut::with_capacity(prefix.len() + data.len());
                out.put_slice(&prefix);
                out.put_slice(&data);
                Ok(Body::Bytes(out.freeze()))
            }
        }
    }

    fn has_pending_stream(&self) -> bool {
        self.data.has_pending_stream()
    }

    fn as_any(&self) -> &dyn Any { self }
    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}
