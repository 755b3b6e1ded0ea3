//! streaming/body.rs
//! Incremental body sources.
//!
//! Design notes:
//! - A body source is an iterator of `Result<Bytes, BodyError>` fragments.
//! - The channel form is bounded; a full channel blocks the producer, which is
//!   the only backpressure the codec applies.
//! - Completion is explicit (`BodySender::finish`). A sender dropped without
//!   finishing yields `BodyError::Aborted`, so a crashed producer can never
//!   look like a short but complete body.

use std::fmt;

use bytes::Bytes;
use crossbeam::channel::{bounded, Receiver, RecvError, Sender};

use crate::packets::BodyError;

enum Fragment {
    Data(Bytes),
    End,
    Failed(BodyError),
}

enum Source {
    Channel(Receiver<Fragment>),
    Iter(Box<dyn Iterator<Item = Result<Bytes, BodyError>> + Send>),
}

/// Single-consumer incremental body.
pub struct BodyStream {
    source: Source,
    done: bool,
}

impl fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.source {
            Source::Channel(_) => "channel",
            Source::Iter(_) => "iter",
        };
        f.debug_struct("BodyStream").field("source", &kind).field("done", &self.done).finish()
    }
}

impl BodyStream {
    /// Wrap any fallible fragment iterator.
    pub fn from_results<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Result<Bytes, BodyError>>,
        I::IntoIter: Send + 'static,
    {
        Self { source: Source::Iter(Box::new(iter.into_iter())), done: false }
    }

    /// Wrap infallible fragments.
    pub fn from_fragments<I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
        I::IntoIter: Send + 'static,
    {
        Self::from_results(fragments.into_iter().map(Ok))
    }

    /// Split a materialized buffer into fixed-size fragments.
    pub fn from_bytes_chunked(data: Bytes, fragment_len: usize) -> Self {
        let step = fragment_len.max(1);
        let mut pos = 0usize;
        Self::from_fragments(std::iter::from_fn(move || {
            if pos >= data.len() {
                return None;
            }
            let end = (pos + step).min(data.len());
            let fragment = data.slice(pos..end);
            pos = end;
            Some(fragment)
        }))
    }

    /// Emit `prefix` before the rest of this stream.
    pub fn prepend(self, prefix: Bytes) -> Self {
        Self::from_results(std::iter::once(Ok(prefix)).chain(self))
    }

    /// Drain the whole stream into one buffer.
    pub fn drain(self) -> Result<Bytes, BodyError> {
        let mut out = bytes::BytesMut::new();
        for fragment in self {
            out.extend_from_slice(&fragment?);
        }
        Ok(out.freeze())
    }
}

impl Iterator for BodyStream {
    type Item = Result<Bytes, BodyError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match &mut self.source {
            Source::Iter(it) => it.next(),
            Source::Channel(rx) => match rx.recv() {
                Ok(Fragment::Data(b)) => Some(Ok(b)),
                Ok(Fragment::End) => None,
                Ok(Fragment::Failed(e)) => Some(Err(e)),
                Err(RecvError) => Some(Err(BodyError::Aborted)),
            },
        };
        match &item {
            None | Some(Err(_)) => self.done = true,
            Some(Ok(_)) => {}
        }
        item
    }
}

/// Producer half of a body channel.
#[derive(Debug)]
pub struct BodySender {
    tx: Sender<Fragment>,
}

impl BodySender {
    /// Send one fragment; blocks while the channel is full.
    ///
    /// Returns `BodyError::Cancelled` once the consumer is gone.
    pub fn send(&self, fragment: impl Into<Bytes>) -> Result<(), BodyError> {
        self.tx.send(Fragment::Data(fragment.into())).map_err(|_| BodyError::Cancelled)
    }

    /// Mark the body complete.
    pub fn finish(self) -> Result<(), BodyError> {
        self.tx.send(Fragment::End).map_err(|_| BodyError::Cancelled)
    }

    /// Abort the body with an error surfaced to the encoder.
    pub fn fail(self, msg: impl Into<String>) -> Result<(), BodyError> {
        self.tx.send(Fragment::Failed(BodyError::Producer(msg.into()))).map_err(|_| BodyError::Cancelled)
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Data(b) => write!(f, "Data({})", b.len()),
            Fragment::End => f.write_str("End"),
            Fragment::Failed(e) => write!(f, "Failed({})", e),
        }
    }
}

/// Bounded producer/consumer pair for an incremental body.
pub fn body_channel(capacity: usize) -> (BodySender, BodyStream) {
    let (tx, rx) = bounded(capacity.max(1));
    (
        BodySender { tx },
        BodyStream { source: Source::Channel(rx), done: false },
    )
}
