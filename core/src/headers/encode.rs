//! headers/encode.rs
//!
//! Header encoding utilities.
//!
//! Design notes:
//! - Pure functions, no I/O. Callers write the returned octets to their sink.
//! - New-format lengths pick the shortest of the 1/2/5 octet encodings.
//! - Old-format headers are only produced for tags that fit in four bits.

use byteorder::{BigEndian, ByteOrder};

use crate::constants::length_octets::{
    FIVE_OCTET, ONE_OCTET_MAX, PARTIAL_START, TWO_OCTET_MAX, TWO_OCTET_START,
};
use crate::constants::old_length_types;
use crate::constants::{MAX_NEW_FORMAT_TAG, MAX_OLD_FORMAT_TAG, MAX_PARTIAL_EXPONENT};
use crate::headers::types::{HeaderError, HeaderFormat, TagOctet};

/// Encode a new-format tag octet (`0xC0 | tag`).
#[inline]
pub fn encode_tag(tag: u8) -> Result<u8, HeaderError> {
    if tag > MAX_NEW_FORMAT_TAG {
        return Err(HeaderError::TagOutOfRange { tag, max: MAX_NEW_FORMAT_TAG });
    }
    Ok((TagOctet::PACKET | TagOctet::NEW_FORMAT).bits() | tag)
}

/// Encode a new-format simple length.
///
/// Layout:
///
/// ```text
/// len < 192            [ len ]
/// len < 8384           [ ((len - 192) >> 8) + 192 ][ (len - 192) & 0xFF ]
/// otherwise            [ 0xFF ][ len (4, big-endian) ]
/// ```
pub fn encode_simple_length(len: usize) -> Result<Vec<u8>, HeaderError> {
    if len <= ONE_OCTET_MAX {
        return Ok(vec![len as u8]);
    }
    if len <= TWO_OCTET_MAX {
        let v = len - TWO_OCTET_START as usize;
        return Ok(vec![((v >> 8) as u8) + TWO_OCTET_START, (v & 0xFF) as u8]);
    }
    let len32 = u32::try_from(len).map_err(|_| HeaderError::LengthTooLarge { len: len as u64 })?;

    let mut out = vec![FIVE_OCTET, 0, 0, 0, 0];
    BigEndian::write_u32(&mut out[1..5], len32);
    Ok(out)
}

/// Encode a partial-length marker announcing a `2^exponent` byte chunk.
#[inline]
pub fn encode_partial_marker(exponent: u8) -> Result<u8, HeaderError> {
    if exponent > MAX_PARTIAL_EXPONENT {
        return Err(HeaderError::InvalidPartialExponent { exponent });
    }
    Ok(PARTIAL_START + exponent)
}

/// Encode the length that terminates a partial-length sequence.
/// A zero-length final frame is valid.
#[inline]
pub fn encode_final_marker(len: usize) -> Result<Vec<u8>, HeaderError> {
    encode_simple_length(len)
}

/// Encode a complete new-format header: tag octet + simple length.
pub fn encode_simple_header(tag: u8, len: usize) -> Result<Vec<u8>, HeaderError> {
    let tag_octet = encode_tag(tag)?;
    let length = encode_simple_length(len)?;

    let mut out = Vec::with_capacity(1 + length.len());
    out.push(tag_octet);
    out.extend_from_slice(&length);
    Ok(out)
}

/// Encode an old-format header with the smallest fitting length type.
///
/// Layout:
///
/// ```text
/// [ 0x80 | tag << 2 | length_type ][ len (1, 2 or 4, big-endian) ]
/// ```
pub fn encode_old_header(tag: u8, len: usize) -> Result<Vec<u8>, HeaderError> {
    if tag > MAX_OLD_FORMAT_TAG {
        return Err(HeaderError::TagOutOfRange { tag, max: MAX_OLD_FORMAT_TAG });
    }
    let base = TagOctet::PACKET.bits() | (tag << 2);

    if len < 0x100 {
        return Ok(vec![base | old_length_types::ONE_OCTET, len as u8]);
    }
    if len < 0x1_0000 {
        let mut out = vec![base | old_length_types::TWO_OCTET, 0, 0];
        BigEndian::write_u16(&mut out[1..3], len as u16);
        return Ok(out);
    }
    let len32 = u32::try_from(len).map_err(|_| HeaderError::LengthTooLarge { len: len as u64 })?;

    let mut out = vec![base | old_length_types::FOUR_OCTET, 0, 0, 0, 0];
    BigEndian::write_u32(&mut out[1..5], len32);
    Ok(out)
}

/// Encode a header in the requested format. Old format falls back to the new
/// format for tags that do not fit in four bits.
pub fn encode_header(tag: u8, len: usize, format: HeaderFormat) -> Result<Vec<u8>, HeaderError> {
    match format {
        HeaderFormat::Old if tag <= MAX_OLD_FORMAT_TAG => encode_old_header(tag, len),
        _ => encode_simple_header(tag, len),
    }
}
