use std::io;

use thiserror::Error;

use crate::headers::HeaderError;
use crate::packets::BodyError;

/// Unified packet error covering framing, body decode, registry, snapshot and I/O.
/// - `From<T>` impls enable `?` across the layers.
/// - A header truncation surfaces as `TruncatedInput`; every other header
///   fault is `MalformedHeader`.
#[derive(Debug, Error)]
pub enum PacketError {
    /// A header declares more body bytes than remain in the input.
    #[error("truncated input at offset {offset}: need {need} bytes, have {have}")]
    TruncatedInput { offset: usize, need: usize, have: usize },

    /// Invalid tag octet, length octets or partial marker.
    #[error("malformed header: {0}")]
    MalformedHeader(HeaderError),

    /// A packet variant rejected its own body.
    #[error("malformed body for tag {tag} at offset {offset}: {source}")]
    MalformedBody {
        tag: u8,
        offset: usize,
        #[source]
        source: BodyError,
    },

    /// No registered variant for this tag.
    #[error("unknown packet tag {tag} (offset {offset:?})")]
    UnknownTag { tag: u8, offset: Option<usize> },

    /// Nested packet lists deeper than `PacketConfig::max_nesting_depth`.
    #[error("packet nesting depth {depth} exceeds limit {max}")]
    NestingTooDeep { depth: usize, max: usize },

    /// Snapshot shape does not match what the registry can rebuild.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Embedded packet offered to a variant without an embedded slot.
    #[error("packet with tag {tag} has no embedded packet slot")]
    EmbeddedNotSupported { tag: u8 },

    /// Producing a packet body failed during encode.
    #[error("body source failed for tag {tag}: {source}")]
    BodySource {
        tag: u8,
        #[source]
        source: BodyError,
    },

    #[error("config error: {0}")]
    Config(String),

    /// Writer pipeline failure (thread spawn, early exit).
    #[error("pipeline error: {0}")]
    Pipeline(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<HeaderError> for PacketError {
    fn from(e: HeaderError) -> Self {
        match e {
            HeaderError::TruncatedBody { offset, need, have } =>
                PacketError::TruncatedInput { offset, need, have },
            other => PacketError::MalformedHeader(other),
        }
    }
}
