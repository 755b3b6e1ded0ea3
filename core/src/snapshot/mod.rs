//! Structured snapshots of packet trees, for crossing a boundary that strips
//! type identity (worker threads, processes, FFI).

pub mod types;
pub mod reconstruct;

pub use types::{PacketListSnapshot, PacketSnapshot};
