//! packet_list/encode.rs
//!
//! Packet list → byte stream.
//!
//! Design notes:
//! - Packets are written in list order; none are skipped or reordered.
//! - Materialized bodies get one simple header.
//! - Incremental bodies on streaming-capable variants go through the chunk
//!   writer; on any other variant they are drained, counted, then written
//!   behind one simple header.
//! - A failing body source aborts the whole encode.
//! - Embedded packets have no wire encoding, and only compressed data carries
//!   children in its body. A packet holding either otherwise fails with
//!   `BodySource`/`Unsupported` before its body is touched.

use std::io::Write;

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::config::PacketConfig;
use crate::headers::{encode_header, encode_tag};
use crate::packet_list::types::{Packet, PacketList};
use crate::packets::{Body, BodyError};
use crate::streaming::{BodyStream, ChunkWriter};
use crate::telemetry::FramingCounters;
use crate::types::PacketError;

fn write_simple<W: Write>(
    sink: &mut W,
    tag: u8,
    body: &Bytes,
    config: &PacketConfig,
    counters: &mut FramingCounters,
) -> Result<(), PacketError> {
    let header = encode_header(tag, body.len(), config.header_format)?;
    sink.write_all(&header)?;
    sink.write_all(body)?;
    counters.add_packet(header.len(), body.len());
    debug!(tag, body_len = body.len(), "packet written");
    Ok(())
}

fn write_streamed<W: Write>(
    sink: &mut W,
    tag: u8,
    stream: BodyStream,
    config: &PacketConfig,
    counters: &mut FramingCounters,
) -> Result<(), PacketError> {
    let tag_octet = encode_tag(tag)?;
    sink.write_all(&[tag_octet])?;
    counters.add_streamed_packet(1);

    let mut writer = ChunkWriter::with_limits(&mut *sink, config.min_partial_chunk, config.max_partial_exponent);
    for fragment in stream {
        let fragment = fragment.map_err(|source| PacketError::BodySource { tag, source })?;
        writer.push(&fragment)?;
    }
    let streamed = writer.finish()?;
    debug!(
        tag,
        body_len = streamed.bytes_body,
        partial_chunks = streamed.partial_chunks,
        "streamed packet written"
    );
    counters.merge(&streamed);
    Ok(())
}

fn write_packet<W: Write>(
    sink: &mut W,
    packet: &Packet,
    config: &PacketConfig,
    counters: &mut FramingCounters,
) -> Result<(), PacketError> {
    let tag = packet.tag();
    if packet.embedded().is_some() {
        return Err(PacketError::BodySource {
            tag,
            source: BodyError::Unsupported("embedded packet has no wire encoding".into()),
        });
    }
    if !packet.packets().is_empty() && !packet.supports_children() {
        return Err(PacketError::BodySource {
            tag,
            source: BodyError::Unsupported("child packets have no wire encoding on this variant".into()),
        });
    }

    let body = packet
        .write_body(config)
        .map_err(|source| PacketError::BodySource { tag, source })?;

    match body {
        Body::Bytes(bytes) => write_simple(sink, tag, &bytes, config, counters),
        Body::Stream(stream) if packet.supports_streaming() => write_streamed(sink, tag, stream, config, counters),
        Body::Stream(stream) => {
            let mut drained = BytesMut::new();
            for fragment in stream {
                let fragment = fragment.map_err(|source| PacketError::BodySource { tag, source })?;
                drained.extend_from_slice(&fragment);
            }
            write_simple(sink, tag, &drained.freeze(), config, counters)
        }
    }
}

impl PacketList {
    /// Encode with the default config.
    pub fn write(&self) -> Result<Vec<u8>, PacketError> {
        self.write_with(&PacketConfig::default())
    }

    pub fn write_with(&self, config: &PacketConfig) -> Result<Vec<u8>, PacketError> {
        let mut out = Vec::new();
        self.write_to(&mut out, config)?;
        Ok(out)
    }

    /// Encode into `sink`.
    ///
    /// # Returns
    /// - `Ok(FramingCounters)` for the packets written.
    /// - `Err(PacketError)` on the first failing packet. Bytes already handed
    ///   to `sink` are not a valid packet stream.
    pub fn write_to<W: Write>(&self, sink: &mut W, config: &PacketConfig) -> Result<FramingCounters, PacketError> {
        config.validate()?;

        let mut counters = FramingCounters::default();
        for packet in &self.packets {
            write_packet(sink, packet, config, &mut counters)?;
        }
        sink.flush()?;
        Ok(counters)
    }
}
