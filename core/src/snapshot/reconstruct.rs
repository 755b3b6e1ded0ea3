//! snapshot/reconstruct.rs
//! Packet tree ⇄ snapshot.
//!
//! Rebuilding goes through the registry so every packet comes back as its
//! typed variant, then restores children and the embedded packet
//! recursively. Children and embedded packets sit one level deeper than
//! their parent; past `PacketConfig::max_nesting_depth` the restore fails.

use bytes::Bytes;
use tracing::warn;

use crate::config::{PacketConfig, SnapshotPolicy, UnknownTagPolicy};
use crate::packet_list::{Packet, PacketList};
use crate::packets::{create_packet_from_raw, Body, OpaquePacket};
use crate::snapshot::types::{PacketListSnapshot, PacketSnapshot};
use crate::types::PacketError;

fn snapshot_packet(packet: &Packet, config: &PacketConfig) -> Result<PacketSnapshot, PacketError> {
    let tag = packet.tag();
    let body = match packet
        .write_body(config)
        .map_err(|source| PacketError::BodySource { tag, source })?
    {
        Body::Bytes(b) => b.to_vec(),
        Body::Stream(_) => {
            return Err(PacketError::InvalidSnapshot(format!("tag {} has an incremental body", tag)));
        }
    };

    let packets = if packet.packets().is_empty() {
        None
    } else {
        Some(snapshot_list(packet.packets(), config)?)
    };
    let embedded = match packet.embedded() {
        Some(e) => Some(Box::new(snapshot_packet(e, config)?)),
        None => None,
    };

    Ok(PacketSnapshot { tag, body, packets, embedded })
}

fn snapshot_list(list: &PacketList, config: &PacketConfig) -> Result<PacketListSnapshot, PacketError> {
    let packets = list
        .iter()
        .map(|p| snapshot_packet(p, config))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PacketListSnapshot { packets })
}

fn restore_packet(snapshot: &PacketSnapshot, config: &PacketConfig, depth: usize) -> Result<Packet, PacketError> {
    let tag = snapshot.tag;
    let mut packet = match create_packet_from_raw(tag) {
        Ok(body) => Packet::new(body),
        Err(_) if config.unknown_tag_policy == UnknownTagPolicy::Passthrough => {
            warn!(tag, "unknown tag in snapshot, restoring as opaque");
            Packet::from(OpaquePacket::new(tag, Bytes::new()))
        }
        Err(_) => return Err(PacketError::InvalidSnapshot(format!("unknown tag {}", tag))),
    };

    packet
        .read_body(Bytes::copy_from_slice(&snapshot.body), config, depth)
        .map_err(|e| PacketError::InvalidSnapshot(format!("tag {} body rejected: {}", tag, e)))?;

    // Absent children keep whatever the variant decoded from its own body
    // (empty for everything but compressed data).
    if let Some(children) = &snapshot.packets {
        packet.replace_packets(restore_list(children, config, depth + 1)?);
    }

    if let Some(embedded) = &snapshot.embedded {
        if packet.supports_embedded() {
            check_depth(depth + 1, config)?;
            packet.set_embedded(restore_packet(embedded, config, depth + 1)?)?;
        } else {
            match config.snapshot_policy {
                SnapshotPolicy::Strict => {
                    return Err(PacketError::InvalidSnapshot(format!(
                        "tag {} has no embedded packet slot",
                        tag
                    )));
                }
                SnapshotPolicy::Permissive => {
                    warn!(tag, embedded_tag = embedded.tag, "dropping embedded packet from snapshot");
                }
            }
        }
    }

    Ok(packet)
}

fn check_depth(depth: usize, config: &PacketConfig) -> Result<(), PacketError> {
    if depth > config.max_nesting_depth {
        return Err(PacketError::InvalidSnapshot(format!(
            "nesting depth {} exceeds limit {}",
            depth, config.max_nesting_depth
        )));
    }
    Ok(())
}

fn restore_list(snapshot: &PacketListSnapshot, config: &PacketConfig, depth: usize) -> Result<PacketList, PacketError> {
    check_depth(depth, config)?;
    snapshot.packets.iter().map(|s| restore_packet(s, config, depth)).collect()
}

impl PacketList {
    /// Plain-data copy of this tree.
    ///
    /// Fails with `InvalidSnapshot` if any packet still holds an unconsumed
    /// incremental body; nothing is consumed in that case.
    pub fn to_snapshot(&self) -> Result<PacketListSnapshot, PacketError> {
        if self.iter().any(Packet::has_pending_stream) {
            return Err(PacketError::InvalidSnapshot("packet list holds an incremental body".into()));
        }
        snapshot_list(self, &PacketConfig::default())
    }

    /// Rebuild a typed tree with the default (strict) config.
    pub fn from_snapshot(snapshot: &PacketListSnapshot) -> Result<PacketList, PacketError> {
        Self::from_snapshot_with(snapshot, &PacketConfig::default())
    }

    pub fn from_snapshot_with(snapshot: &PacketListSnapshot, config: &PacketConfig) -> Result<PacketList, PacketError> {
        config.validate()?;
        restore_list(snapshot, config, 0)
    }
}
