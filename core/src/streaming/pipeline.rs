//! streaming/pipeline.rs
//! Encode a packet list on its own thread and hand framed bytes over a
//! bounded channel.
//!
//! Design notes:
//! - The writer thread owns the list; body producers feed it through their
//!   own channels and only the writer blocks on them.
//! - The output channel is bounded; a slow consumer stalls the writer, which
//!   in turn stalls body producers.
//! - Dropping `FramedOutput` cancels: the writer's next send fails, it stops,
//!   and the list (with every buffered fragment and body receiver) is dropped.
//!   Producers then see `BodyError::Cancelled`. No final frame is written.
//! - Output is only valid once `Done` was received. A failed write discards
//!   whatever is still buffered and reports the error last.

use std::io::{self, BufWriter, Write};
use std::thread;

use bytes::Bytes;
use crossbeam::channel::{bounded, Receiver, Sender};
use tracing::debug;

use crate::config::PacketConfig;
use crate::packet_list::PacketList;
use crate::telemetry::FramingCounters;
use crate::types::PacketError;

/// Size of the writer-side buffer in front of the output channel.
const SINK_BUFFER_LEN: usize = 16 * 1024;

enum Framed {
    Data(Bytes),
    Done(FramingCounters),
    Failed(PacketError),
}

/// `Write` adapter over the output channel.
struct ChannelSink {
    tx: Sender<Framed>,
}

impl Write for ChannelSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.tx
            .send(Framed::Data(Bytes::copy_from_slice(data)))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "framed output receiver dropped"))?;
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Consumer half of a threaded encode.
pub struct FramedOutput {
    rx: Receiver<Framed>,
    counters: Option<FramingCounters>,
    finished: bool,
}

impl FramedOutput {
    /// Counters of the completed write; `None` until `Done` was received.
    pub fn counters(&self) -> Option<&FramingCounters> {
        self.counters.as_ref()
    }

    /// Whether the writer reported successful completion.
    pub fn is_complete(&self) -> bool {
        self.counters.is_some()
    }

    /// Drain everything; succeeds only if the write completed.
    pub fn collect_bytes(mut self) -> Result<(Vec<u8>, FramingCounters), PacketError> {
        let mut out = Vec::new();
        for chunk in self.by_ref() {
            out.extend_from_slice(&chunk?);
        }
        match self.counters.take() {
            Some(counters) => Ok((out, counters)),
            None => Err(PacketError::Pipeline("writer did not complete".into())),
        }
    }

    /// Stop the encode. Equivalent to dropping the output.
    pub fn cancel(self) {
        debug!("framed output cancelled");
    }
}

impl Iterator for FramedOutput {
    type Item = Result<Bytes, PacketError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.rx.recv() {
            Ok(Framed::Data(b)) => Some(Ok(b)),
            Ok(Framed::Done(counters)) => {
                self.counters = Some(counters);
                self.finished = true;
                None
            }
            Ok(Framed::Failed(e)) => {
                self.finished = true;
                Some(Err(e))
            }
            Err(_) => {
                self.finished = true;
                Some(Err(PacketError::Pipeline("writer exited without completing".into())))
            }
        }
    }
}

/// Encode `list` on a dedicated thread.
pub fn spawn_writer(list: PacketList, config: PacketConfig) -> Result<FramedOutput, PacketError> {
    config.validate()?;
    let (tx, rx) = bounded::<Framed>(config.channel_capacity);

    thread::Builder::new()
        .name("packet-writer".into())
        .spawn(move || {
            let mut sink = BufWriter::with_capacity(SINK_BUFFER_LEN, ChannelSink { tx: tx.clone() });
            let result = list.write_to(&mut sink, &config).and_then(|counters| {
                sink.flush()?;
                Ok(counters)
            });

            match result {
                Ok(counters) => {
                    debug!(packets = counters.packets_written, bytes = counters.total_bytes(), "writer finished");
                    let _ = tx.send(Framed::Done(counters));
                }
                Err(e) => {
                    // Buffered bytes of a failed write are never delivered.
                    let _ = sink.into_parts();
                    debug!(error = %e, "writer failed");
                    let _ = tx.send(Framed::Failed(e));
                }
            }
        })
        .map_err(|e| PacketError::Pipeline(format!("failed to spawn writer thread: {}", e)))?;

    Ok(FramedOutput { rx, counters: None, finished: false })
}
