//! packet_list/decode.rs
//!
//! Byte stream → packet list.
//!
//! Design notes:
//! - Single pass, strictly sequential; one header at a time.
//! - Decoded packets are staged and only appended once the whole input has
//!   been read. The first error aborts; the list is left untouched.
//! - Unknown tags follow `PacketConfig::unknown_tag_policy`.
//! - Nested lists (compressed data) carry their depth; past
//!   `PacketConfig::max_nesting_depth` the read fails with `NestingTooDeep`.

use std::io::Read;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::config::{PacketConfig, UnknownTagPolicy};
use crate::headers::read_packet;
use crate::packet_list::types::{Packet, PacketList};
use crate::packets::{create_packet_from_raw, OpaquePacket};
use crate::types::PacketError;

/// Variant for a decoded tag, applying the unknown-tag policy.
fn packet_for_tag(tag: u8, offset: usize, config: &PacketConfig) -> Result<Packet, PacketError> {
    match create_packet_from_raw(tag) {
        Ok(body) => Ok(Packet::new(body)),
        Err(PacketError::UnknownTag { .. }) if config.unknown_tag_policy == UnknownTagPolicy::Passthrough => {
            warn!(tag, offset, "unknown packet tag, keeping opaque body");
            Ok(Packet::from(OpaquePacket::new(tag, Bytes::new())))
        }
        Err(PacketError::UnknownTag { tag, .. }) => Err(PacketError::UnknownTag { tag, offset: Some(offset) }),
        Err(e) => Err(e),
    }
}

/// Decode every packet in `input`; the packets sit at nesting `depth`.
pub(crate) fn decode_packets(input: &Bytes, config: &PacketConfig, depth: usize) -> Result<Vec<Packet>, PacketError> {
    if depth > config.max_nesting_depth {
        return Err(PacketError::NestingTooDeep { depth, max: config.max_nesting_depth });
    }

    let mut packets = Vec::new();
    let mut offset = 0usize;

    while offset < input.len() {
        let parsed = read_packet(input, offset)?;
        let mut packet = packet_for_tag(parsed.tag, offset, config)?;

        let body_len = parsed.body.len();
        packet
            .read_body(parsed.body, config, depth)
            .map_err(|source| PacketError::MalformedBody { tag: parsed.tag, offset, source })?;

        debug!(
            tag = parsed.tag,
            offset,
            depth,
            body_len,
            partial_chunks = parsed.partial_chunks,
            children = packet.packets().len(),
            "packet read"
        );
        packets.push(packet);
        offset = parsed.offset;
    }

    Ok(packets)
}

impl PacketList {
    /// Decode `bytes` with the default (strict) config and append the packets.
    pub fn read(&mut self, bytes: &[u8]) -> Result<(), PacketError> {
        self.read_with(bytes, &PacketConfig::default())
    }

    pub fn read_with(&mut self, bytes: &[u8], config: &PacketConfig) -> Result<(), PacketError> {
        self.read_bytes(Bytes::copy_from_slice(bytes), config)
    }

    /// Zero-copy variant: fixed-length bodies share `bytes`.
    pub fn read_bytes(&mut self, bytes: Bytes, config: &PacketConfig) -> Result<(), PacketError> {
        config.validate()?;
        self.read_nested(bytes, config, 0)
    }

    /// Decode a packet list carried inside another packet's body.
    pub(crate) fn read_nested(&mut self, bytes: Bytes, config: &PacketConfig, depth: usize) -> Result<(), PacketError> {
        let packets = decode_packets(&bytes, config, depth)?;
        self.packets.extend(packets);
        Ok(())
    }

    /// Read `reader` to the end, then decode.
    pub fn read_from<R: Read>(&mut self, mut reader: R, config: &PacketConfig) -> Result<(), PacketError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.read_bytes(Bytes::from(buf), config)
    }

    /// New list decoded from `bytes` with the default config.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PacketError> {
        let mut list = PacketList::new();
        list.read(bytes)?;
        Ok(list)
    }
}
