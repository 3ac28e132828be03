//! Length-prefixed message framing for FIFO-based duplex IPC.
//!
//! Every message on the wire is framed with a 4-byte little-endian payload
//! length followed by the raw payload bytes. No magic number, no checksum,
//! no terminator.
//!
//! The channel layer hands out raw byte runs — a single read can surface
//! zero, one, or several frames, or a fragment of one. [`FrameBuffer`]
//! reassembles whole payloads independently of read boundaries.

pub mod buffer;
pub mod codec;
pub mod error;

pub use buffer::FrameBuffer;
pub use codec::{decode_frame, encode_frame, DEFAULT_MAX_PAYLOAD, LEN_PREFIX_SIZE};
pub use error::{FrameError, Result};
