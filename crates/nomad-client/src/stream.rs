//! Decoding of the framed file and log streams served by client agents
//!
//! The body is a plain concatenation of JSON objects with no delimiter, so
//! frames are cut wherever the JSON parser finishes a value.

use bytes::{Buf, Bytes, BytesMut};
use futures::{StreamExt, TryStreamExt, stream::BoxStream};
use nomad_api_model::StreamFrame;

use crate::error::{NomadError, Result};

/// Incremental decoder over a growing byte buffer
///
/// While a frame is incomplete the buffer is only re-parsed once a `}` byte
/// arrives, as no frame can end without one. A large frame delivered in many
/// small chunks is therefore parsed a handful of times, not once per chunk.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: BytesMut,
    // set after a parse ran out of input; bytes before it hold no `}`
    scanned: Option<usize>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes received from the wire
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Next complete frame, or None if the buffer holds only part of one
    pub fn next_frame(&mut self) -> Result<Option<StreamFrame>> {
        if let Some(scanned) = self.scanned {
            if !self.buffer[scanned..].contains(&b'}') {
                self.scanned = Some(self.buffer.len());
                return Ok(None);
            }
        }

        let (next, consumed) = {
            let mut frames =
                serde_json::Deserializer::from_slice(&self.buffer).into_iter::<StreamFrame>();
            let next = frames.next();
            (next, frames.byte_offset())
        };

        match next {
            Some(Ok(frame)) => {
                self.buffer.advance(consumed);
                self.scanned = None;
                Ok(Some(frame))
            }
            Some(Err(e)) if e.is_eof() => {
                self.scanned = Some(self.buffer.len());
                Ok(None)
            }
            Some(Err(e)) => Err(NomadError::parsing(
                format!("malformed stream frame: {}", e),
                String::from_utf8_lossy(&self.buffer),
            )),
            None => {
                self.buffer.clear();
                self.scanned = None;
                Ok(None)
            }
        }
    }

    /// True when nothing but whitespace is buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.iter().all(u8::is_ascii_whitespace)
    }
}

/// Frames read from a streaming HTTP body
pub struct FramedStream {
    body: BoxStream<'static, Result<Bytes>>,
    decoder: FrameDecoder,
    finished: bool,
}

impl FramedStream {
    pub fn new<S>(body: S) -> Self
    where
        S: futures::Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self {
            body: body.boxed(),
            decoder: FrameDecoder::new(),
            finished: false,
        }
    }

    pub(crate) fn from_response(response: reqwest::Response) -> Self {
        Self::new(response.bytes_stream().map_err(NomadError::from))
    }

    /// Next frame; `Ok(None)` once the body ends cleanly
    pub async fn next_frame(&mut self) -> Result<Option<StreamFrame>> {
        if self.finished {
            return Ok(None);
        }
        loop {
            match self.decoder.next_frame() {
                Ok(Some(frame)) => return Ok(Some(frame)),
                Ok(None) => {}
                Err(e) => {
                    self.finished = true;
                    return Err(e);
                }
            }

            match self.body.next().await {
                Some(Ok(chunk)) => self.decoder.push(&chunk),
                Some(Err(e)) => {
                    self.finished = true;
                    return Err(e);
                }
                None => {
                    self.finished = true;
                    if self.decoder.is_empty() {
                        return Ok(None);
                    }
                    return Err(NomadError::parsing(
                        "stream ended in the middle of a frame",
                        String::from_utf8_lossy(&self.decoder.buffer),
                    ));
                }
            }
        }
    }

    /// All frames, heartbeats included
    pub fn into_frames(self) -> BoxStream<'static, Result<StreamFrame>> {
        futures::stream::unfold(self, |mut frames| async move {
            match frames.next_frame().await {
                Ok(Some(frame)) => Some((Ok(frame), frames)),
                Ok(None) => None,
                Err(e) => Some((Err(e), frames)),
            }
        })
        .boxed()
    }

    /// File contents only: heartbeats and event-only frames are skipped
    pub fn into_data_stream(self) -> BoxStream<'static, Result<Bytes>> {
        self.into_frames()
            .try_filter_map(|frame| async move {
                Ok(frame.has_data().then(|| Bytes::from(frame.data)))
            })
            .boxed()
    }
}
