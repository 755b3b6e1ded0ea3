//! telemetry/mod.rs
//! Framing counters returned by the encode path.

pub mod counters;

pub use counters::*;
