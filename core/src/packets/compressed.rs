//! packets/compressed.rs
//! Compressed data packet: an algorithm octet followed by a compressed,
//! complete packet list. The inner list lives in the packet's child container.
//!
//! Supported algorithms: uncompressed, ZIP (raw deflate), ZLIB. BZip2 is
//! recognized and rejected.

use std::any::Any;
use std::io::{Read, Write};

use bytes::Bytes;
use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::{DeflateEncoder, ZlibEncoder};
use flate2::Compression;
use num_enum::TryFromPrimitive;

use crate::config::PacketConfig;
use crate::constants::{compression_ids, DEFAULT_DEFLATE_LEVEL};
use crate::packet_list::PacketList;
use crate::packets::types::{Body, BodyError, PacketBody, PacketTag};

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum CompressionAlgorithm {
    Uncompressed = compression_ids::UNCOMPRESSED,
    Zip          = compression_ids::ZIP,
    Zlib         = compression_ids::ZLIB,
    Bzip2        = compression_ids::BZIP2,
}

impl CompressionAlgorithm {
    fn name(self) -> &'static str {
        match self {
            CompressionAlgorithm::Uncompressed => "uncompressed",
            CompressionAlgorithm::Zip => "zip",
            CompressionAlgorithm::Zlib => "zlib",
            CompressionAlgorithm::Bzip2 => "bzip2",
        }
    }
}

#[derive(Debug)]
pub struct CompressedDataPacket {
    algorithm: CompressionAlgorithm,
    level: u32,
}

impl Default for CompressedDataPacket {
    fn default() -> Self {
        Self { algorithm: CompressionAlgorithm::Zip, level: DEFAULT_DEFLATE_LEVEL }
    }
}

impl CompressedDataPacket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_algorithm(algorithm: CompressionAlgorithm) -> Self {
        Self { algorithm, ..Self::default() }
    }

    pub fn algorithm(&self) -> CompressionAlgorithm {
        self.algorithm
    }

    /// Deflate level 0..=9; out-of-range values use the default.
    pub fn set_level(&mut self, level: u32) {
        self.level = if level <= 9 { level } else { DEFAULT_DEFLATE_LEVEL };
    }

    /// Inflate at most `limit` bytes; more output is a codec failure.
    fn decompress(&self, data: &[u8], limit: usize) -> Result<Vec<u8>, BodyError> {
        let codec = self.algorithm.name();
        let codec_err = |e: std::io::Error| BodyError::Codec { codec, msg: e.to_string() };
        // One byte past the limit tells "exactly at limit" from "over".
        let cap = (limit as u64).saturating_add(1);

        let mut out = Vec::new();
        match self.algorithm {
            CompressionAlgorithm::Uncompressed => out.extend_from_slice(data),
            CompressionAlgorithm::Zip => {
                DeflateDecoder::new(data).take(cap).read_to_end(&mut out).map_err(codec_err)?;
            }
            CompressionAlgorithm::Zlib => {
                ZlibDecoder::new(data).take(cap).read_to_end(&mut out).map_err(codec_err)?;
            }
            CompressionAlgorithm::Bzip2 => {
                return Err(BodyError::Unsupported("bzip2 compressed data".into()));
            }
        }
        if out.len() > limit {
            return Err(BodyError::Codec {
                codec,
                msg: format!("decompressed size exceeds limit of {} bytes", limit),
            });
        }
        Ok(out)
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, BodyError> {
        let codec = self.algorithm.name();
        let codec_err = |e: std::io::Error| BodyError::Codec { codec, msg: e.to_string() };
        let level = Compression::new(self.level);

        match self.algorithm {
            CompressionAlgorithm::Uncompressed => Ok(data.to_vec()),
            CompressionAlgorithm::Zip => {
                let mut enc = DeflateEncoder::new(Vec::new(), level);
                enc.write_all(data).map_err(codec_err)?;
                enc.finish().map_err(codec_err)
            }
            CompressionAlgorithm::Zlib => {
                let mut enc = ZlibEncoder::new(Vec::new(), level);
                enc.write_all(data).map_err(codec_err)?;
                enc.finish().map_err(codec_err)
            }
            CompressionAlgorithm::Bzip2 => Err(BodyError::Unsupported("bzip2 compressed data".into())),
        }
    }
}

impl PacketBody for CompressedDataPacket {
    fn tag(&self) -> u8 {
        PacketTag::CompressedData as u8
    }

    fn read(&mut self, body: Bytes, children: &mut PacketList, config: &PacketConfig, depth: usize) -> Result<(), BodyError> {
        if body.is_empty() {
            return Err(BodyError::TooShort { need: 1, have: 0 });
        }
        self.algorithm = CompressionAlgorithm::try_from(body[0])
            .map_err(|_| BodyError::Invalid(format!("unknown compression algorithm {}", body[0])))?;

        let inner = self.decompress(&body[1..], config.max_decompressed_len)?;
        let mut packets = PacketList::new();
        packets.read_nested(Bytes::from(inner), config, depth + 1)?;
        children.concat(packets);
        Ok(())
    }

    fn write(&self, children: &PacketList, config: &PacketConfig) -> Result<Body, BodyError> {
        let inner = children.write_with(config)?;
        let compressed = self.compress(&inner)?;

        let mut out = Vec::with_capacity(1 + compressed.len());
        out.push(self.algorithm as u8);
        out.extend_from_slice(&compressed);
        Ok(Body::Bytes(Bytes::from(out)))
    }

    fn supports_children(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any { self }
    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}
