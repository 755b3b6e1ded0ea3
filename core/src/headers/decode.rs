//! headers/decode.rs
//!
//! Header decoding utilities.
//!
//! Design notes:
//! - Every read is bounds-checked against the caller's window; nothing reads
//!   past `offset + remaining`.
//! - Missing length octets are a header fault. Missing body bytes are a
//!   truncation fault.
//! - Partial bodies are reassembled into one buffer; fixed bodies are
//!   zero-copy slices of the input.

use byteorder::{BigEndian, ByteOrder};
use bytes::{Bytes, BytesMut};

use crate::constants::length_octets::{FIVE_OCTET, PARTIAL_END, PARTIAL_START, TWO_OCTET_START};
use crate::constants::{old_length_types, MAX_NEW_FORMAT_TAG, MAX_PARTIAL_EXPONENT};
use crate::headers::types::{BodyLength, HeaderError, HeaderFormat, HeaderFrame, ParsedPacket, TagOctet};

/// Clamp the caller's window to the buffer.
#[inline]
fn window_end(bytes: &[u8], offset: usize, remaining: usize) -> usize {
    offset.saturating_add(remaining).min(bytes.len())
}

#[inline]
fn read_length_octets(bytes: &[u8], pos: usize, end: usize, n: usize) -> Result<u32, HeaderError> {
    let have = end.saturating_sub(pos);
    if have < n {
        return Err(HeaderError::IncompleteLength { offset: pos, need: n, have });
    }
    let v = match n {
        1 => bytes[pos] as u32,
        2 => BigEndian::read_u16(&bytes[pos..pos + 2]) as u32,
        _ => BigEndian::read_u32(&bytes[pos..pos + 4]),
    };
    Ok(v)
}

/// Decode a partial-length marker octet into its chunk size.
#[inline]
pub fn decode_partial_marker(octet: u8) -> Result<u32, HeaderError> {
    if !(PARTIAL_START..=PARTIAL_END).contains(&octet) {
        return Err(HeaderError::InvalidPartialMarker { octet });
    }
    let exponent = octet & 0x1F;
    if exponent > MAX_PARTIAL_EXPONENT {
        return Err(HeaderError::InvalidPartialExponent { exponent });
    }
    let len = 1u32 << exponent;
    if !len.is_power_of_two() {
        return Err(HeaderError::NonPowerOfTwoChunk { len: len as u64 });
    }
    Ok(len)
}

/// Decode one new-format length (simple or partial) at `offset`.
///
/// # Returns
/// - `Ok((BodyLength, next_offset))` where `next_offset` points past the length octets.
/// - `Err(HeaderError::IncompleteLength)` if the octets are not all inside the window.
pub fn decode_length(bytes: &[u8], offset: usize, remaining: usize) -> Result<(BodyLength, usize), HeaderError> {
    let end = window_end(bytes, offset, remaining);
    if offset >= end {
        return Err(HeaderError::IncompleteLength { offset, need: 1, have: 0 });
    }

    let o1 = bytes[offset];
    match o1 {
        o if o < TWO_OCTET_START => Ok((BodyLength::Fixed(o as u32), offset + 1)),
        o if o < PARTIAL_START => {
            let o2 = read_length_octets(bytes, offset + 1, end, 1)?;
            let len = (((o - TWO_OCTET_START) as u32) << 8) + o2 + TWO_OCTET_START as u32;
            Ok((BodyLength::Fixed(len), offset + 2))
        }
        FIVE_OCTET => {
            let len = read_length_octets(bytes, offset + 1, end, 4)?;
            Ok((BodyLength::Fixed(len), offset + 5))
        }
        o => Ok((BodyLength::Partial(decode_partial_marker(o)?), offset + 1)),
    }
}

/// Decode the packet header at `offset`, looking at no more than `remaining` bytes.
pub fn decode_header(bytes: &[u8], offset: usize, remaining: usize) -> Result<HeaderFrame, HeaderError> {
    let end = window_end(bytes, offset, remaining);
    if offset >= end {
        return Err(HeaderError::MissingTag { offset });
    }

    let octet = bytes[offset];
    let flags = TagOctet::from_bits_retain(octet);
    if !flags.contains(TagOctet::PACKET) {
        return Err(HeaderError::InvalidTagOctet { offset, octet });
    }

    let pos = offset + 1;
    if flags.contains(TagOctet::NEW_FORMAT) {
        let (length, next) = decode_length(bytes, pos, end - pos)?;
        return Ok(HeaderFrame {
            tag: octet & MAX_NEW_FORMAT_TAG,
            format: HeaderFormat::New,
            length,
            offset: next,
        });
    }

    // --- old format ---
    let tag = (octet & 0x3C) >> 2;
    let (length, next) = match octet & 0x03 {
        old_length_types::ONE_OCTET => (BodyLength::Fixed(read_length_octets(bytes, pos, end, 1)?), pos + 1),
        old_length_types::TWO_OCTET => (BodyLength::Fixed(read_length_octets(bytes, pos, end, 2)?), pos + 2),
        old_length_types::FOUR_OCTET => (BodyLength::Fixed(read_length_octets(bytes, pos, end, 4)?), pos + 4),
        _ => (BodyLength::Indeterminate, pos),
    };

    Ok(HeaderFrame { tag, format: HeaderFormat::Old, length, offset: next })
}

#[inline]
fn take_body(input: &Bytes, pos: usize, len: usize) -> Result<Bytes, HeaderError> {
    let have = input.len().saturating_sub(pos);
    if have < len {
        return Err(HeaderError::TruncatedBody { offset: pos, need: len, have });
    }
    Ok(input.slice(pos..pos + len))
}

/// Decode one complete packet (header + body) starting at `offset`.
///
/// Partial-length bodies are followed chunk by chunk until the terminating
/// simple length; the returned body is their concatenation.
pub fn read_packet(input: &Bytes, offset: usize) -> Result<ParsedPacket, HeaderError> {
    let frame = decode_header(input, offset, input.len().saturating_sub(offset))?;
    let mut pos = frame.offset;
    let mut partial_chunks = 0usize;

    let body = match frame.length {
        BodyLength::Fixed(len) => {
            let body = take_body(input, pos, len as usize)?;
            pos += len as usize;
            body
        }
        BodyLength::Indeterminate => {
            let body = input.slice(pos..);
            pos = input.len();
            body
        }
        BodyLength::Partial(first) => {
            let mut body = BytesMut::new();
            let mut len = first as usize;
            loop {
                body.extend_from_slice(&take_body(input, pos, len)?);
                pos += len;
                partial_chunks += 1;

                let (next, after) = decode_length(input, pos, input.len() - pos)?;
                pos = after;
                match next {
                    BodyLength::Partial(n) => len = n as usize,
                    BodyLength::Fixed(n) => {
                        body.extend_from_slice(&take_body(input, pos, n as usize)?);
                        pos += n as usize;
                        break;
                    }
                    BodyLength::Indeterminate => unreachable!("new-format lengths are never indeterminate"),
                }
            }
            body.freeze()
        }
    };

    Ok(ParsedPacket {
        tag: frame.tag,
        format: frame.format,
        body,
        header_offset: offset,
        offset: pos,
        partial_chunks,
    })
}
