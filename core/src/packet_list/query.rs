//! packet_list/query.rs
//! Structural queries by tag. All of them preserve list order.

use crate::packet_list::types::{Packet, PacketList, PacketListView};
use crate::packets::PacketTag;

#[inline]
fn matches_any(packet: &Packet, tags: &[PacketTag]) -> bool {
    tags.iter().any(|t| packet.is(*t))
}

impl PacketList {
    /// Packets whose tag is one of `tags`, borrowed, in list order.
    pub fn filter_by_tag(&self, tags: &[PacketTag]) -> PacketListView<'_> {
        PacketListView {
            packets: self.packets.iter().filter(|p| matches_any(p, tags)).collect(),
        }
    }

    /// Owned variant of `filter_by_tag`; packets with other tags are dropped.
    pub fn into_filtered(self, tags: &[PacketTag]) -> PacketList {
        self.packets.into_iter().filter(|p| matches_any(p, tags)).collect()
    }

    /// First top-level packet with `tag`.
    pub fn find_packet(&self, tag: PacketTag) -> Option<&Packet> {
        self.packets.iter().find(|p| p.is(tag))
    }

    /// Positions of every packet whose tag is one of `tags`.
    pub fn index_of_tag(&self, tags: &[PacketTag]) -> Vec<usize> {
        self.packets
            .iter()
            .enumerate()
            .filter(|(_, p)| matches_any(p, tags))
            .map(|(i, _)| i)
            .collect()
    }
}

impl<'a> PacketListView<'a> {
    pub fn filter_by_tag(&self, tags: &[PacketTag]) -> PacketListView<'a> {
        PacketListView {
            packets: self.packets.iter().copied().filter(|p| matches_any(p, tags)).collect(),
        }
    }

    pub fn find_packet(&self, tag: PacketTag) -> Option<&'a Packet> {
        self.packets.iter().copied().find(|p| p.is(tag))
    }

    pub fn index_of_tag(&self, tags: &[PacketTag]) -> Vec<usize> {
        self.packets
            .iter()
            .enumerate()
            .filter(|(_, p)| matches_any(p, tags))
            .map(|(i, _)| i)
            .collect()
    }
}
