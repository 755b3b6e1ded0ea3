//! packets/mod.rs
//! Packet variants and the tag registry.
//!
//! Notes:
//! - Each variant decodes and encodes only its own body; framing is the
//!   container's job.
//! - Algorithm semantics (signature math, encryption) stay outside; those
//!   tags are carried by `RawPacket`.

pub mod types;
pub mod registry;
pub mod raw;
pub mod literal;
pub mod compressed;

pub use types::*;
pub use registry::{create_packet, create_packet_from_raw, resolve, variant_info, VariantInfo};
pub use raw::{OpaquePacket, RawPacket, SignaturePacket, StoredBody};
pub use literal::{LiteralDataPacket, LiteralFormat};
pub use compressed::{CompressedDataPacket, CompressionAlgorithm};
