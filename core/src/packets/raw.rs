//! packets/raw.rs
//! Variants that keep their body bytes as-is.

use std::any::Any;
use std::cell::Cell;
use std::fmt;

use bytes::Bytes;

use crate::config::PacketConfig;
use crate::packet_list::PacketList;
use crate::packets::types::{Body, BodyError, PacketBody, PacketTag};
use crate::streaming::BodyStream;

/// Body storage shared by the byte-keeping variants: either materialized
/// bytes or an incremental source waiting for its one encode.
#[derive(Default)]
pub struct StoredBody {
    bytes: Bytes,
    pending: Cell<Option<BodyStream>>,
    streamed: Cell<bool>,
}

impl fmt::Debug for StoredBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredBody")
            .field("len", &self.bytes.len())
            .field("pending_stream", &self.has_pending_stream())
            .finish()
    }
}

impl StoredBody {
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn set_bytes(&mut self, bytes: Bytes) {
        self.bytes = bytes;
        self.pending.set(None);
        self.streamed.set(false);
    }

    pub fn set_stream(&mut self, stream: BodyStream) {
        self.bytes = Bytes::new();
        self.pending.set(Some(stream));
        self.streamed.set(false);
    }

    pub fn has_pending_stream(&self) -> bool {
        // Cell has no borrow; take and put back.
        let stream = self.pending.take();
        let pending = stream.is_some();
        self.pending.set(stream);
        pending
    }

    /// Hand out the body: the pending stream once, otherwise the bytes.
    pub fn take(&self) -> Result<Body, BodyError> {
        if let Some(stream) = self.pending.take() {
            self.streamed.set(true);
            return Ok(Body::Stream(stream));
        }
        if self.streamed.get() {
            return Err(BodyError::StreamConsumed);
        }
        Ok(Body::Bytes(self.bytes.clone()))
    }
}

/// Registered tag whose body semantics live outside this crate.
#[derive(Debug)]
pub struct RawPacket {
    tag: PacketTag,
    body: StoredBody,
}

impl RawPacket {
    pub fn new(tag: PacketTag) -> Self {
        Self { tag, body: StoredBody::default() }
    }

    pub fn with_body(tag: PacketTag, body: impl Into<Bytes>) -> Self {
        let mut p = Self::new(tag);
        p.body.set_bytes(body.into());
        p
    }

    /// Incremental body; framed with partial lengths if the tag allows it.
    pub fn with_stream(tag: PacketTag, stream: BodyStream) -> Self {
        let mut p = Self::new(tag);
        p.body.set_stream(stream);
        p
    }

    pub fn packet_tag(&self) -> PacketTag {
        self.tag
    }

    pub fn body(&self) -> &Bytes {
        self.body.bytes()
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body.set_bytes(body.into());
    }

    pub fn set_stream(&mut self, stream: BodyStream) {
        self.body.set_stream(stream);
    }
}

impl PacketBody for RawPacket {
    fn tag(&self) -> u8 {
        self.tag as u8
    }

    fn read(&mut self, body: Bytes, _children: &mut PacketList, _config: &PacketConfig, _depth: usize) -> Result<(), BodyError> {
        self.body.set_bytes(body);
        Ok(())
    }

    fn write(&self, _children: &PacketList, _config: &PacketConfig) -> Result<Body, BodyError> {
        self.body.take()
    }

    fn has_pending_stream(&self) -> bool {
        self.body.has_pending_stream()
    }

    fn as_any(&self) -> &dyn Any { self }
    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}

/// Signature packet. Body bytes are opaque here; the variant owns the
/// embedded-packet slot used for nested signatures.
#[derive(Debug, Default)]
pub struct SignaturePacket {
    body: StoredBody,
}

impl SignaturePacket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(body: impl Into<Bytes>) -> Self {
        let mut p = Self::new();
        p.body.set_bytes(body.into());
        p
    }

    pub fn body(&self) -> &Bytes {
        self.body.bytes()
    }
}

impl PacketBody for SignaturePacket {
    fn tag(&self) -> u8 {
        PacketTag::Signature as u8
    }

    fn read(&mut self, body: Bytes, _children: &mut PacketList, _config: &PacketConfig, _depth: usize) -> Result<(), BodyError> {
        self.body.set_bytes(body);
        Ok(())
    }

    fn write(&self, _children: &PacketList, _config: &PacketConfig) -> Result<Body, BodyError> {
        self.body.take()
    }

    fn supports_embedded(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any { self }
    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}

/// Pass-through for tags with no registered variant (permissive reads).
#[derive(Debug)]
pub struct OpaquePacket {
    tag: u8,
    body: Bytes,
}

impl OpaquePacket {
    pub fn new(tag: u8, body: impl Into<Bytes>) -> Self {
        Self { tag, body: body.into() }
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

impl PacketBody for OpaquePacket {
    fn tag(&self) -> u8 {
        self.tag
    }

    fn read(&mut self, body: Bytes, _children: &mut PacketList, _config: &PacketConfig, _depth: usize) -> Result<(), BodyError> {
        self.body = body;
        Ok(())
    }

    fn write(&self, _children: &PacketList, _config: &PacketConfig) -> Result<Body, BodyError> {
        Ok(Body::Bytes(self.body.clone()))
    }

    fn supports_streaming(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any { self }
    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}
