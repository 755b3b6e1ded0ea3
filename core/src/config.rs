//! config.rs
//! Reader/writer policy knobs.
//!
//! Design notes:
//! - Defaults are strict: unknown tags and inconsistent snapshots fail fast.
//! - Partial chunk bounds are validated once, before any write starts.
//! - Serializable so hosts can ship the same policy across a process boundary.

use serde::{Deserialize, Serialize};

pub use crate::headers::HeaderFormat;

use crate::constants::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_MAX_DECOMPRESSED_LEN, DEFAULT_MAX_NESTING_DEPTH, MAX_NESTING_DEPTH_LIMIT,
    MAX_PARTIAL_EXPONENT, MIN_PARTIAL_CHUNK,
};
use crate::types::PacketError;

/// What `read` does with a tag that has no registered variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnknownTagPolicy {
    /// Abort with `PacketError::UnknownTag`.
    #[default]
    Reject,
    /// Keep the bytes in an `OpaquePacket` and continue.
    Passthrough,
}

/// What snapshot reconstruction does with an embedded packet on a variant
/// that has no embedded slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnapshotPolicy {
    #[default]
    Strict,
    /// Drop the field and log a warning.
    Permissive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacketConfig {
    pub unknown_tag_policy: UnknownTagPolicy,
    pub snapshot_policy: SnapshotPolicy,
    pub header_format: HeaderFormat,
    /// Floor at which the streaming writer cuts a partial chunk.
    pub min_partial_chunk: usize,
    /// Cap on the partial chunk exponent.
    pub max_partial_exponent: u8,
    /// Bounded capacity of the framed output channel in `spawn_writer`.
    pub channel_capacity: usize,
    /// Deepest nested packet list `read` and snapshot restore will descend
    /// into (top-level packets are depth 0).
    pub max_nesting_depth: usize,
    /// Cap on the decompressed body of one compressed data packet.
    pub max_decompressed_len: usize,
}

impl Default for PacketConfig {
    fn default() -> Self {
        Self {
            unknown_tag_policy: UnknownTagPolicy::Reject,
            snapshot_policy: SnapshotPolicy::Strict,
            header_format: HeaderFormat::New,
            min_partial_chunk: MIN_PARTIAL_CHUNK,
            max_partial_exponent: MAX_PARTIAL_EXPONENT,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            max_decompressed_len: DEFAULT_MAX_DECOMPRESSED_LEN,
        }
    }
}

impl PacketConfig {
    /// Strict reader, permissive about nothing. Same as `default()`.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Wraps unknown tags and drops unsupported snapshot fields.
    pub fn permissive() -> Self {
        Self {
            unknown_tag_policy: UnknownTagPolicy::Passthrough,
            snapshot_policy: SnapshotPolicy::Permissive,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), PacketError> {
        if self.min_partial_chunk < MIN_PARTIAL_CHUNK || !self.min_partial_chunk.is_power_of_two() {
            return Err(PacketError::Config(format!(
                "min_partial_chunk must be a power of two >= {}, got {}",
                MIN_PARTIAL_CHUNK, self.min_partial_chunk
            )));
        }
        if self.max_partial_exponent > MAX_PARTIAL_EXPONENT {
            return Err(PacketError::Config(format!(
                "max_partial_exponent must be <= {}, got {}",
                MAX_PARTIAL_EXPONENT, self.max_partial_exponent
            )));
        }
        if (1usize << self.max_partial_exponent) < self.min_partial_chunk {
            return Err(PacketError::Config(format!(
                "2^{} is below min_partial_chunk {}",
                self.max_partial_exponent, self.min_partial_chunk
            )));
        }
        if self.channel_capacity == 0 {
            return Err(PacketError::Config("channel_capacity must be > 0".into()));
        }
        if self.max_nesting_depth == 0 || self.max_nesting_depth > MAX_NESTING_DEPTH_LIMIT {
            return Err(PacketError::Config(format!(
                "max_nesting_depth must be in 1..={}, got {}",
                MAX_NESTING_DEPTH_LIMIT, self.max_nesting_depth
            )));
        }
        if self.max_decompressed_len == 0 {
            return Err(PacketError::Config("max_decompressed_len must be > 0".into()));
        }
        Ok(())
    }
}
