//! Wire constants for the packet container format.

/// Smallest chunk the streaming writer may declare with a partial marker.
/// The format requires the first partial chunk to be at least 512 bytes.
pub const MIN_PARTIAL_CHUNK: usize = 512;

/// Largest partial-length exponent an encoder may declare (`2^30` bytes).
pub const MAX_PARTIAL_EXPONENT: u8 = 30;

/// Default bounded capacity for body channels and the writer pipeline.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Default limit on nested packet lists (compressed data inside compressed
/// data, or nested snapshot entries).
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;
/// Upper bound accepted for `max_nesting_depth`; deeper trees are refused.
pub const MAX_NESTING_DEPTH_LIMIT: usize = 256;

/// Default cap on the decompressed size of one compressed data packet.
pub const DEFAULT_MAX_DECOMPRESSED_LEN: usize = 64 * 1024 * 1024;

/// Largest tag representable in a new-format tag octet.
pub const MAX_NEW_FORMAT_TAG: u8 = 0x3F;
/// Largest tag representable in an old-format tag octet.
pub const MAX_OLD_FORMAT_TAG: u8 = 0x0F;

/// New-format length octet boundaries.
pub mod length_octets {
    /// First octet below this value is a one-octet length.
    pub const TWO_OCTET_START: u8 = 192;
    /// First octet from here up to `PARTIAL_END` is a partial marker.
    pub const PARTIAL_START: u8 = 224;
    /// Last partial marker octet (`224 + 30`).
    pub const PARTIAL_END: u8 = 254;
    /// Five-octet length prefix.
    pub const FIVE_OCTET: u8 = 255;

    /// Largest length encodable in one octet.
    pub const ONE_OCTET_MAX: usize = 191;
    /// Largest length encodable in two octets.
    pub const TWO_OCTET_MAX: usize = 8383;
}

/// Old-format length types (low two bits of the tag octet).
pub mod old_length_types {
    pub const ONE_OCTET: u8     = 0;
    pub const TWO_OCTET: u8     = 1;
    pub const FOUR_OCTET: u8    = 2;
    pub const INDETERMINATE: u8 = 3;
}

/// Compression algorithm identifiers used inside compressed data packets.
pub mod compression_ids {
    pub const UNCOMPRESSED: u8 = 0;
    pub const ZIP: u8          = 1;
    pub const ZLIB: u8         = 2;
    pub const BZIP2: u8        = 3;
}

/// Default deflate level for compressed data packets.
pub const DEFAULT_DEFLATE_LEVEL: u32 = 6;
