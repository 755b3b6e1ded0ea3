//! snapshot/types.rs
//! Plain-data mirror of a packet tree.
//!
//! Design notes:
//! - No behavior attached: tag, body bytes, children, embedded packet.
//! - `packets: None` and an empty child list mean the same thing.
//! - Binary form uses bincode (standard config); JSON is available for
//!   debugging and for hosts that speak JSON.

use bincode::config::standard;
use serde::{Deserialize, Serialize};

use crate::types::PacketError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PacketListSnapshot {
    pub packets: Vec<PacketSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketSnapshot {
    pub tag: u8,
    /// Body as the variant encodes it (no header).
    pub body: Vec<u8>,
    #[serde(default)]
    pub packets: Option<PacketListSnapshot>,
    #[serde(default)]
    pub embedded: Option<Box<PacketSnapshot>>,
}

impl PacketSnapshot {
    pub fn new(tag: u8, body: impl Into<Vec<u8>>) -> Self {
        Self { tag, body: body.into(), packets: None, embedded: None }
    }

    /// Nesting depth below this packet (0 for a leaf).
    pub fn depth(&self) -> usize {
        let children = self
            .packets
            .as_ref()
            .map(|l| l.packets.iter().map(|p| 1 + p.depth()).max().unwrap_or(0))
            .unwrap_or(0);
        let embedded = self.embedded.as_ref().map(|e| 1 + e.depth()).unwrap_or(0);
        children.max(embedded)
    }
}

impl PacketListSnapshot {
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, PacketError> {
        bincode::serde::encode_to_vec(self, standard())
            .map_err(|e| PacketError::InvalidSnapshot(format!("encode failed: {}", e)))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PacketError> {
        let (snapshot, read): (Self, usize) = bincode::serde::decode_from_slice(bytes, standard())
            .map_err(|e| PacketError::InvalidSnapshot(format!("decode failed: {}", e)))?;
        if read != bytes.len() {
            return Err(PacketError::InvalidSnapshot(format!(
                "{} trailing bytes after snapshot",
                bytes.len() - read
            )));
        }
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, PacketError> {
        serde_json::to_string(self).map_err(|e| PacketError::InvalidSnapshot(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, PacketError> {
        serde_json::from_str(json).map_err(|e| PacketError::InvalidSnapshot(e.to_string()))
    }
}
