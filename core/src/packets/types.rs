//! packets/types.rs
//! Packet tags, the per-variant body capability, and body-level errors.

use std::any::Any;
use std::fmt;

use bytes::Bytes;
use num_enum::TryFromPrimitive;

use crate::config::PacketConfig;
use crate::packet_list::PacketList;
use crate::streaming::BodyStream;
use crate::types::PacketError;

/// Registered packet tags (closed set).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum PacketTag {
    PublicKeyEncryptedSessionKey       = 1,
    Signature                          = 2,
    SymEncryptedSessionKey             = 3,
    OnePassSignature                   = 4,
    SecretKey                          = 5,
    PublicKey                          = 6,
    SecretSubkey                       = 7,
    CompressedData                     = 8,
    SymmetricallyEncryptedData         = 9,
    Marker                             = 10,
    LiteralData                        = 11,
    Trust                              = 12,
    UserId                             = 13,
    PublicSubkey                       = 14,
    UserAttribute                      = 17,
    SymEncryptedIntegrityProtectedData = 18,
    ModificationDetectionCode          = 19,
    SymEncryptedAeadProtectedData      = 20,
}

impl PacketTag {
    /// Tags whose bodies may be written with partial-length framing.
    #[inline]
    pub const fn supports_streaming(self) -> bool {
        matches!(
            self,
            PacketTag::LiteralData
                | PacketTag::CompressedData
                | PacketTag::SymmetricallyEncryptedData
                | PacketTag::SymEncryptedIntegrityProtectedData
                | PacketTag::SymEncryptedAeadProtectedData
        )
    }
}

impl From<PacketTag> for u8 {
    fn from(tag: PacketTag) -> u8 {
        tag as u8
    }
}

/// Body produced by a variant for encoding.
pub enum Body {
    /// Fully materialized body.
    Bytes(Bytes),
    /// Incremental body; total length unknown until the source ends.
    Stream(BodyStream),
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Body::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

#[derive(Debug)]
pub enum BodyError {
    /// Body shorter than the variant's fixed fields.
    TooShort { need: usize, have: usize },
    /// Field value the variant does not accept.
    Invalid(String),
    /// Algorithm or feature the variant recognizes but cannot process.
    Unsupported(String),
    /// Compression codec failure.
    Codec { codec: &'static str, msg: String },
    /// Failure in a nested packet list (compressed data).
    Nested(Box<PacketError>),
    /// Incremental body already handed to a previous encode.
    StreamConsumed,
    /// Producer reported a failure.
    Producer(String),
    /// Producer went away without finishing the body.
    Aborted,
    /// Consumer went away; the body will not be written.
    Cancelled,
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BodyError::*;
        match self {
            TooShort { need, have } =>
                write!(f, "body too short: need {} bytes, have {}", need, have),
            Invalid(msg) =>
                write!(f, "invalid body: {}", msg),
            Unsupported(msg) =>
                write!(f, "unsupported: {}", msg),
            Codec { codec, msg } =>
                write!(f, "codec {} failed: {}", codec, msg),
            Nested(e) =>
                write!(f, "nested packet list: {}", e),
            StreamConsumed =>
                write!(f, "incremental body already consumed"),
            Producer(msg) =>
                write!(f, "body producer failed: {}", msg),
            Aborted =>
                write!(f, "body producer ended without finishing"),
            Cancelled =>
                write!(f, "body consumer cancelled"),
        }
    }
}

impl std::error::Error for BodyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BodyError::Nested(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<PacketError> for BodyError {
    fn from(e: PacketError) -> Self {
        BodyError::Nested(Box::new(e))
    }
}

/// Capability every packet variant implements.
///
/// The container owns framing; a variant only sees its own body bytes and
/// the packet's child list.
pub trait PacketBody: Send + fmt::Debug {
    /// Wire tag of this variant.
    fn tag(&self) -> u8;

    /// Decode the de-framed body. Variants that carry nested packets push
    /// them into `children`, decoded at `depth + 1`.
    fn read(&mut self, body: Bytes, children: &mut PacketList, config: &PacketConfig, depth: usize) -> Result<(), BodyError>;

    /// Produce the body for encoding. An incremental body is handed out once.
    fn write(&self, children: &PacketList, config: &PacketConfig) -> Result<Body, BodyError>;

    /// Whether an incremental body may use partial-length framing.
    fn supports_streaming(&self) -> bool {
        PacketTag::try_from(self.tag()).map(PacketTag::supports_streaming).unwrap_or(false)
    }

    /// Whether `write` encodes the child list into the body.
    fn supports_children(&self) -> bool {
        false
    }

    /// Whether the variant owns an embedded packet slot.
    fn supports_embedded(&self) -> bool {
        false
    }

    /// Whether the body is an incremental source not yet consumed.
    fn has_pending_stream(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
