//! headers/types.rs
//! Header frame types and the header-level error.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// High bits of a tag octet.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TagOctet: u8 {
        /// Always one on a valid packet header.
        const PACKET     = 0b1000_0000;
        /// New-format header.
        const NEW_FORMAT = 0b0100_0000;
    }
}

/// Header style, as decoded from the tag octet or as requested for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeaderFormat {
    /// Old-format headers; the encoder only uses them for tags below 16.
    Old,
    #[default]
    New,
}

/// Length announced by a header or continuation length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLength {
    /// The complete body length.
    Fixed(u32),
    /// A partial chunk of exactly this many bytes; more lengths follow.
    Partial(u32),
    /// Old-format length type 3: the body runs to the end of input.
    Indeterminate,
}

/// One decoded header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFrame {
    pub tag: u8,
    pub format: HeaderFormat,
    pub length: BodyLength,
    /// Offset of the first body byte.
    pub offset: usize,
}

/// A header plus its complete (de-chunked) body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPacket {
    pub tag: u8,
    pub format: HeaderFormat,
    pub body: Bytes,
    /// Offset of the tag octet.
    pub header_offset: usize,
    /// Offset just past this packet.
    pub offset: usize,
    /// Number of partial chunks preceding the final length (0 if not chunked).
    pub partial_chunks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// No tag octet at `offset`.
    MissingTag { offset: usize },
    /// Tag octet without the always-one bit.
    InvalidTagOctet { offset: usize, octet: u8 },
    /// Length octets run past the available bytes.
    IncompleteLength { offset: usize, need: usize, have: usize },
    /// Octet is not a partial-length marker.
    InvalidPartialMarker { octet: u8 },
    /// Partial exponent outside `0..=30`.
    InvalidPartialExponent { exponent: u8 },
    /// Partial chunk size that is not a power of two.
    NonPowerOfTwoChunk { len: u64 },
    /// Declared body longer than the remaining input.
    TruncatedBody { offset: usize, need: usize, have: usize },
    /// Tag does not fit the requested header format.
    TagOutOfRange { tag: u8, max: u8 },
    /// Length does not fit in the widest length encoding.
    LengthTooLarge { len: u64 },
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use HeaderError::*;
        match self {
            MissingTag { offset } =>
                write!(f, "missing tag octet at offset {}", offset),
            InvalidTagOctet { offset, octet } =>
                write!(f, "invalid tag octet 0x{:02x} at offset {}", octet, offset),
            IncompleteLength { offset, need, have } =>
                write!(f, "incomplete length at offset {}: need {} octets, have {}", offset, need, have),
            InvalidPartialMarker { octet } =>
                write!(f, "not a partial length marker: 0x{:02x}", octet),
            InvalidPartialExponent { exponent } =>
                write!(f, "partial length exponent out of range: {}", exponent),
            NonPowerOfTwoChunk { len } =>
                write!(f, "partial chunk size is not a power of two: {}", len),
            TruncatedBody { offset, need, have } =>
                write!(f, "truncated body at offset {}: need {} bytes, have {}", offset, need, have),
            TagOutOfRange { tag, max } =>
                write!(f, "tag {} out of range (max {})", tag, max),
            LengthTooLarge { len } =>
                write!(f, "length too large: {}", len),
        }
    }
}

impl std::error::Error for HeaderError {}
