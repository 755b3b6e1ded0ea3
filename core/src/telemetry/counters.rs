//! telemetry/counters.rs
//! Framing counters collected while encoding a packet list.
//!
//! Summary: counts packets, partial chunks and final frames, and splits
//! written bytes into body bytes and framing overhead.
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Deterministic counters collected during `write_to`.
#[derive(Default, Clone, Debug, Encode, Decode, Serialize, Deserialize, PartialEq, Eq)]
pub struct FramingCounters {
    pub packets_written: u64,
    /// Packets framed with partial lengths.
    pub packets_streamed: u64,
    pub partial_chunks: u64,
    pub final_frames: u64,
    pub bytes_body: u64,
    /// Tag octets, length octets and partial markers.
    pub bytes_overhead: u64,
}

impl FramingCounters {
    /// Record one packet written with a single simple header.
    pub fn add_packet(&mut self, header_len: usize, body_len: usize) {
        self.packets_written += 1;
        self.bytes_overhead += header_len as u64;
        self.bytes_body += body_len as u64;
    }

    /// Record the tag octet that opens a partial-length packet.
    pub fn add_streamed_packet(&mut self, tag_len: usize) {
        self.packets_written += 1;
        self.packets_streamed += 1;
        self.bytes_overhead += tag_len as u64;
    }

    /// Record one partial marker and its chunk.
    pub fn add_partial_chunk(&mut self, marker_len: usize, chunk_len: usize) {
        self.partial_chunks += 1;
        self.bytes_overhead += marker_len as u64;
        self.bytes_body += chunk_len as u64;
    }

    /// Record the final frame closing a partial-length sequence.
    pub fn add_final_frame(&mut self, header_len: usize, len: usize) {
        self.final_frames += 1;
        self.bytes_overhead += header_len as u64;
        self.bytes_body += len as u64;
    }

    /// Total bytes written to the sink.
    pub fn total_bytes(&self) -> u64 {
        self.bytes_body + self.bytes_overhead
    }

    pub fn merge(&mut self, other: &FramingCounters) {
        self.packets_written  += other.packets_written;
        self.packets_streamed += other.packets_streamed;
        self.partial_chunks   += other.partial_chunks;
        self.final_frames     += other.final_frames;
        self.bytes_body       += other.bytes_body;
        self.bytes_overhead   += other.bytes_overhead;
    }
}

impl AddAssign for FramingCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
