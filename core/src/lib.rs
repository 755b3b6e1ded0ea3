//! packet-core
//!
//! OpenPGP packet framing: tag and length headers, a typed packet
//! container, partial-length streaming, structured snapshots.
//! No cryptography, no armor.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod config;
pub mod types;

// Wire format
pub mod headers;
pub mod packets;
pub mod packet_list;

// Streaming, snapshots, counters
pub mod streaming;
pub mod snapshot;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::{HeaderFormat, PacketConfig, SnapshotPolicy, UnknownTagPolicy};
    pub use crate::packet_list::{Packet, PacketList, PacketListView};
    pub use crate::packets::{
        Body, BodyError, CompressedDataPacket, CompressionAlgorithm, LiteralDataPacket, LiteralFormat,
        OpaquePacket, PacketBody, PacketTag, RawPacket, SignaturePacket,
    };
    pub use crate::snapshot::{PacketListSnapshot, PacketSnapshot};
    pub use crate::streaming::{body_channel, spawn_writer, BodySender, BodyStream, FramedOutput};
    pub use crate::telemetry::FramingCounters;
    pub use crate::types::PacketError;
}
