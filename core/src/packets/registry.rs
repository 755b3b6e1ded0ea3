//! packets/registry.rs
//! Tag → variant registry and factory functions.
//!
//! The mapping is closed: every `PacketTag` resolves to exactly one variant.
//! The registry never decodes; it only picks who decodes.

use crate::packets::compressed::CompressedDataPacket;
use crate::packets::literal::LiteralDataPacket;
use crate::packets::raw::{RawPacket, SignaturePacket};
use crate::packets::types::{PacketBody, PacketTag};
use crate::types::PacketError;

pub struct VariantInfo {
    pub name: &'static str,
    pub supports_streaming: bool,
    pub supports_embedded: bool,
}

/// Resolve a raw tag to a registered tag.
pub fn resolve(raw: u8) -> Result<PacketTag, PacketError> {
    PacketTag::try_from(raw).map_err(|_| PacketError::UnknownTag { tag: raw, offset: None })
}

/// Static description of the variant registered for `tag`.
pub fn variant_info(tag: PacketTag) -> VariantInfo {
    let name = match tag {
        PacketTag::Signature => "signature",
        PacketTag::LiteralData => "literal",
        PacketTag::CompressedData => "compressed",
        _ => "raw",
    };
    VariantInfo {
        name,
        supports_streaming: tag.supports_streaming(),
        supports_embedded: tag == PacketTag::Signature,
    }
}

/// Whether a raw tag may use partial-length framing.
pub fn supports_streaming(raw: u8) -> bool {
    PacketTag::try_from(raw).map(PacketTag::supports_streaming).unwrap_or(false)
}

/// Default-constructed variant for `tag`.
pub fn create_packet(tag: PacketTag) -> Box<dyn PacketBody> {
    match tag {
        PacketTag::Signature => Box::new(SignaturePacket::new()),
        PacketTag::LiteralData => Box::new(LiteralDataPacket::new()),
        PacketTag::CompressedData => Box::new(CompressedDataPacket::new()),
        other => Box::new(RawPacket::new(other)),
    }
}

/// Default-constructed variant for a raw wire tag.
///
/// Fails with `UnknownTag` (no offset); whether that is fatal is the
/// caller's policy.
pub fn create_packet_from_raw(raw: u8) -> Result<Box<dyn PacketBody>, PacketError> {
    resolve(raw).map(create_packet)
}
