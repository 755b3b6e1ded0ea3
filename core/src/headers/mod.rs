//! headers/mod.rs
//! Length/header codec for the packet container format.
//!
//! Wire notes:
//! - Every packet starts with one tag octet. Bit 7 is always set, bit 6 picks
//!   the new format.
//! - Old format: tag in bits 5..2, length type in bits 1..0 (1/2/4 octets or
//!   indeterminate).
//! - New format: tag in bits 5..0, followed by a 1/2/5 octet simple length or a
//!   partial-length marker (`2^e`, e in 0..=30) chained to more chunks and one
//!   terminating simple length.
//! - All multi-octet lengths are big-endian.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
