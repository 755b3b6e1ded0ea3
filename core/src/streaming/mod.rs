//! Streaming encode support.
//!
//! - `body`: incremental body sources (bounded channel or iterator)
//! - `chunk_writer`: partial-length re-framing of an incremental body
//! - `pipeline`: threaded encode with cancellable framed output

pub mod body;
pub mod chunk_writer;
pub mod pipeline;

pub use body::{body_channel, BodySender, BodyStream};
pub use chunk_writer::{chunk_exponent, ChunkWriter};
pub use pipeline::{spawn_writer, FramedOutput};
