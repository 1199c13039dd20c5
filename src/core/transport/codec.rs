//! Newline framing for the JSON-RPC channel.
//!
//! Wraps [`LinesCodec`] with a maximum line length. Lines that cannot be
//! framed (too long, or not UTF-8) come out as [`Frame::Rejected`] instead
//! of a stream error, so the connection answers them and keeps reading
//! from the next newline.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, LinesCodec, LinesCodecError};
use tracing::{debug, warn};

use super::{TransportError, TransportResult};

/// Longest accepted inbound line: 1 MiB.
pub const MAX_LINE_BYTES: usize = 1_048_576;

/// One inbound line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A complete, non-blank line without its terminator.
    Message(String),

    /// A line that was dropped, with the reason.
    Rejected(String),
}

/// Line codec for inbound messages.
#[derive(Debug)]
pub struct FrameCodec {
    lines: LinesCodec,
    max_length: usize,
}

impl FrameCodec {
    /// Codec with the default [`MAX_LINE_BYTES`] limit.
    pub fn new() -> Self {
        Self::with_max_length(MAX_LINE_BYTES)
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            lines: LinesCodec::new_with_max_length(max_length),
            max_length,
        }
    }

    fn reject(&self, err: LinesCodecError) -> Frame {
        let reason = match err {
            LinesCodecError::MaxLineLengthExceeded => {
                format!("message exceeds {} bytes", self.max_length)
            }
            // Decoding never reads, so the only I/O error is bad UTF-8.
            LinesCodecError::Io(e) => format!("message is not valid UTF-8: {e}"),
        };
        warn!("Rejecting inbound line: {}", reason);
        Frame::Rejected(reason)
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = TransportError;

    fn decode(&mut self, src: &mut BytesMut) -> TransportResult<Option<Frame>> {
        loop {
            match self.lines.decode(src) {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => {
                    debug!("<- {} bytes", line.len());
                    return Ok(Some(Frame::Message(line)));
                }
                Ok(None) => return Ok(None),
                Err(e) => return Ok(Some(self.reject(e))),
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> TransportResult<Option<Frame>> {
        loop {
            match self.lines.decode_eof(src) {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => {
                    debug!("<- {} bytes", line.len());
                    return Ok(Some(Frame::Message(line)));
                }
                Ok(None) => return Ok(None),
                Err(e) => return Ok(Some(self.reject(e))),
            }
        }
    }
}
