//! Ordered packet container.
//!
//! Responsibilities:
//! - Decode a byte stream into packets (`decode`)
//! - Encode packets back, including partial-length streaming (`encode`)
//! - Structural queries by tag (`query`)
//!
//! Non-responsibilities:
//! - Body semantics (see `packets`)
//! - Transport

pub mod types;
pub mod decode;
pub mod encode;
pub mod query;

pub use types::{Packet, PacketList, PacketListView};
