use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Length prefix: 4 bytes, little-endian.
pub const LEN_PREFIX_SIZE: usize = 4;

/// Default maximum payload size: 16 MiB.
///
/// The wire format carries no magic number, so a desynchronized stream can
/// present an arbitrary 32-bit value as a length. The cap bounds how much a
/// reader will commit to buffering for one frame.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────────────┐
/// │ Length (4B)  │ Payload          │
/// │ u32 LE       │ (Length bytes)   │
/// └──────────────┴──────────────────┘
/// ```
///
/// The prefix is little-endian on every architecture.
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > u32::MAX as usize {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: u32::MAX as usize,
        });
    }
    dst.reserve(LEN_PREFIX_SIZE + payload.len());
    dst.put_u32_le(payload.len() as u32);
    dst.put_slice(payload);
    Ok(())
}

/// Decode one frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer and returns the
/// payload.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Bytes>> {
    if src.len() < LEN_PREFIX_SIZE {
        return Ok(None); // Need more data
    }

    let payload_len = u32::from_le_bytes(src[0..4].try_into().unwrap()) as usize;

    if payload_len > max_payload {
        return Err(FrameError::PayloadTooLarge {
            size: payload_len,
            max: max_payload,
        });
    }

    let total = LEN_PREFIX_SIZE + payload_len;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    src.advance(LEN_PREFIX_SIZE);
    Ok(Some(src.split_to(payload_len).freeze()))
}
