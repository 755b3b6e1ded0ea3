//! packet_list/types.rs
//! Packet and packet list types.
//!
//! Ownership notes:
//! - A `Packet` exclusively owns its child list and its embedded packet.
//! - A `PacketList` exposes append and read access only; there is no way to
//!   replace an element by position.

use std::ops::Index;

use crate::config::PacketConfig;
use crate::packets::{create_packet, Body, BodyError, PacketBody, PacketTag};
use crate::types::PacketError;

#[derive(Debug)]
pub struct Packet {
    body: Box<dyn PacketBody>,
    packets: PacketList,
    embedded: Option<Box<Packet>>,
}

impl Packet {
    /// Wrap a variant with an empty child list.
    pub fn new(body: Box<dyn PacketBody>) -> Self {
        Self { body, packets: PacketList::new(), embedded: None }
    }

    /// Default variant for `tag`, as the registry builds it.
    pub fn from_tag(tag: PacketTag) -> Self {
        Self::new(create_packet(tag))
    }

    pub fn tag(&self) -> u8 {
        self.body.tag()
    }

    /// Registered tag, `None` for opaque pass-through packets.
    pub fn packet_tag(&self) -> Option<PacketTag> {
        PacketTag::try_from(self.body.tag()).ok()
    }

    pub fn is(&self, tag: PacketTag) -> bool {
        self.tag() == tag as u8
    }

    pub fn body(&self) -> &dyn PacketBody {
        self.body.as_ref()
    }

    pub fn body_mut(&mut self) -> &mut dyn PacketBody {
        self.body.as_mut()
    }

    pub fn downcast_ref<T: PacketBody + 'static>(&self) -> Option<&T> {
        self.body.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: PacketBody + 'static>(&mut self) -> Option<&mut T> {
        self.body.as_any_mut().downcast_mut::<T>()
    }

    pub fn supports_streaming(&self) -> bool {
        self.body.supports_streaming()
    }

    pub fn supports_embedded(&self) -> bool {
        self.body.supports_embedded()
    }

    /// Whether the child list is part of this packet's encoded body.
    pub fn supports_children(&self) -> bool {
        self.body.supports_children()
    }

    /// Child packets.
    pub fn packets(&self) -> &PacketList {
        &self.packets
    }

    /// Append-only access to the child list.
    pub fn packets_mut(&mut self) -> &mut PacketList {
        &mut self.packets
    }

    pub fn embedded(&self) -> Option<&Packet> {
        self.embedded.as_deref()
    }

    /// Attach the embedded packet, replacing any previous one.
    pub fn set_embedded(&mut self, packet: Packet) -> Result<(), PacketError> {
        if !self.body.supports_embedded() {
            return Err(PacketError::EmbeddedNotSupported { tag: self.tag() });
        }
        self.embedded = Some(Box::new(packet));
        Ok(())
    }

    pub fn take_embedded(&mut self) -> Option<Packet> {
        self.embedded.take().map(|b| *b)
    }

    /// Whether this packet, its children or its embedded packet still hold an
    /// unconsumed incremental body.
    pub fn has_pending_stream(&self) -> bool {
        self.body.has_pending_stream()
            || self.packets.iter().any(Packet::has_pending_stream)
            || self.embedded.as_deref().is_some_and(Packet::has_pending_stream)
    }

    pub(crate) fn read_body(&mut self, body: bytes::Bytes, config: &PacketConfig, depth: usize) -> Result<(), BodyError> {
        self.body.read(body, &mut self.packets, config, depth)
    }

    pub(crate) fn write_body(&self, config: &PacketConfig) -> Result<Body, BodyError> {
        self.body.write(&self.packets, config)
    }

    pub(crate) fn replace_packets(&mut self, packets: PacketList) {
        self.packets = packets;
    }
}

impl<T: PacketBody + 'static> From<T> for Packet {
    fn from(body: T) -> Self {
        Packet::new(Box::new(body))
    }
}

/// Ordered packet container. Insertion order is wire order.
#[derive(Debug, Default)]
pub struct PacketList {
    pub(crate) packets: Vec<Packet>,
}

impl PacketList {
    pub fn new() -> Self {
        Self { packets: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    /// Append one packet. The only way to add a single element.
    pub fn push(&mut self, packet: impl Into<Packet>) {
        self.packets.push(packet.into());
    }

    /// Move every packet of `other` to the end of this list.
    pub fn concat(&mut self, other: PacketList) -> &mut Self {
        self.packets.extend(other.packets);
        self
    }

    pub fn get(&self, index: usize) -> Option<&Packet> {
        self.packets.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Packet> {
        self.packets.iter()
    }
}

impl Index<usize> for PacketList {
    type Output = Packet;

    fn index(&self, index: usize) -> &Packet {
        &self.packets[index]
    }
}

impl<'a> IntoIterator for &'a PacketList {
    type Item = &'a Packet;
    type IntoIter = std::slice::Iter<'a, Packet>;

    fn into_iter(self) -> Self::IntoIter {
        self.packets.iter()
    }
}

impl IntoIterator for PacketList {
    type Item = Packet;
    type IntoIter = std::vec::IntoIter<Packet>;

    fn into_iter(self) -> Self::IntoIter {
        self.packets.into_iter()
    }
}

impl FromIterator<Packet> for PacketList {
    fn from_iter<I: IntoIterator<Item = Packet>>(iter: I) -> Self {
        Self { packets: iter.into_iter().collect() }
    }
}

impl Extend<Packet> for PacketList {
    fn extend<I: IntoIterator<Item = Packet>>(&mut self, iter: I) {
        self.packets.extend(iter);
    }
}

/// Borrowed, ordered selection of packets from a list.
#[derive(Debug, Clone, Default)]
pub struct PacketListView<'a> {
    pub(crate) packets: Vec<&'a Packet>,
}

impl<'a> PacketListView<'a> {
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a Packet> {
        self.packets.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Packet> + '_ {
        self.packets.iter().copied()
    }
}
