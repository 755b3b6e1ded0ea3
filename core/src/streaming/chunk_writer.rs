//! streaming/chunk_writer.rs
//! Re-frames an incremental body into partial-length chunks.
//!
//! Layout emitted after the tag octet:
//!
//! ```text
//! [ 224 + e0 ][ 2^e0 bytes ] [ 224 + e1 ][ 2^e1 bytes ] ... [ simple length n ][ n bytes ]
//! ```
//!
//! Design notes:
//! - Fragments are appended to one accumulation buffer.
//! - Whenever the buffer reaches the floor, the largest power of two that fits
//!   (capped at `2^max_exponent`) is cut from the front and written.
//! - `finish` writes the remainder as the final simple-length frame, even when
//!   it is empty.
//! - Dropping the writer without `finish` writes nothing more; the sequence
//!   stays unterminated and must not be treated as a valid packet.

use std::io::Write;

use bytes::BytesMut;
use tracing::trace;

use crate::constants::{MAX_PARTIAL_EXPONENT, MIN_PARTIAL_CHUNK};
use crate::headers::{encode_final_marker, encode_partial_marker};
use crate::telemetry::FramingCounters;
use crate::types::PacketError;

/// Largest `e` with `2^e <= len`, capped at `max_exponent`.
#[inline]
pub fn chunk_exponent(len: usize, max_exponent: u8) -> u8 {
    debug_assert!(len > 0);
    let floor_log2 = (usize::BITS - 1 - len.leading_zeros()) as u8;
    floor_log2.min(max_exponent)
}

pub struct ChunkWriter<W: Write> {
    sink: W,
    buffer: BytesMut,
    min_chunk: usize,
    max_exponent: u8,
    counters: FramingCounters,
}

impl<W: Write> ChunkWriter<W> {
    /// Writer with the format defaults (512 byte floor, exponent cap 30).
    pub fn new(sink: W) -> Self {
        Self::with_limits(sink, MIN_PARTIAL_CHUNK, MAX_PARTIAL_EXPONENT)
    }

    /// Caller guarantees the limits were validated (`PacketConfig::validate`).
    pub fn with_limits(sink: W, min_chunk: usize, max_exponent: u8) -> Self {
        Self {
            sink,
            buffer: BytesMut::new(),
            min_chunk: min_chunk.max(1),
            max_exponent: max_exponent.min(MAX_PARTIAL_EXPONENT),
            counters: FramingCounters::default(),
        }
    }

    /// Bytes accumulated but not yet written.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Append one fragment, writing every chunk the buffer can now fill.
    pub fn push(&mut self, fragment: &[u8]) -> Result<(), PacketError> {
        self.buffer.extend_from_slice(fragment);
        while self.buffer.len() >= self.min_chunk {
            self.emit_chunk()?;
        }
        Ok(())
    }

    fn emit_chunk(&mut self) -> Result<(), PacketError> {
        let exponent = chunk_exponent(self.buffer.len(), self.max_exponent);
        let chunk_len = 1usize << exponent;
        let marker = encode_partial_marker(exponent)?;

        let chunk = self.buffer.split_to(chunk_len);
        self.sink.write_all(&[marker])?;
        self.sink.write_all(&chunk)?;

        self.counters.add_partial_chunk(1, chunk_len);
        trace!(exponent, chunk_len, buffered = self.buffer.len(), "partial chunk written");
        Ok(())
    }

    /// Write the final frame and return the framing counters for this body.
    pub fn finish(mut self) -> Result<FramingCounters, PacketError> {
        let remainder = self.buffer.split();
        let header = encode_final_marker(remainder.len())?;
        self.sink.write_all(&header)?;
        self.sink.write_all(&remainder)?;
        self.sink.flush()?;

        self.counters.add_final_frame(header.len(), remainder.len());
        trace!(final_len = remainder.len(), "final frame written");
        Ok(self.counters)
    }
}
