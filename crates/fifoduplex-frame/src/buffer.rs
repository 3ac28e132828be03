use bytes::{Bytes, BytesMut};

use crate::codec::{decode_frame, DEFAULT_MAX_PAYLOAD};
use crate::error::Result;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Reassembles whole frames from raw byte runs.
///
/// The channel's read path returns whatever bytes the pipe currently holds —
/// zero, one, or several frames, or a fragment of one. Feed those runs in
/// with [`push`](Self::push) and drain decoded payloads with
/// [`next_frame`](Self::next_frame); frame boundaries are recovered
/// independently of how the transport fragmented the stream.
pub struct FrameBuffer {
    buf: BytesMut,
    max_payload: usize,
}

impl FrameBuffer {
    /// Create a frame buffer with the default payload cap.
    pub fn new() -> Self {
        Self::with_max_payload(DEFAULT_MAX_PAYLOAD)
    }

    /// Create a frame buffer with an explicit payload cap.
    pub fn with_max_payload(max_payload: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            max_payload,
        }
    }

    /// Append raw bytes received from the transport.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Decode the next whole payload, if one is buffered.
    ///
    /// Returns `Ok(None)` when the buffered bytes do not yet form a complete
    /// frame. Call repeatedly to drain every frame a single push delivered.
    pub fn next_frame(&mut self) -> Result<Option<Bytes>> {
        decode_frame(&mut self.buf, self.max_payload)
    }

    /// Number of undecoded bytes currently buffered.
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// True when no undecoded bytes are buffered.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
