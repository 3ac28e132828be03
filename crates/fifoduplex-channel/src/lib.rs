//! Duplex IPC channel over paired named pipes (FIFOs).
//!
//! Two cooperating processes rendezvous on a shared logical name. Each name
//! maps to a pair of FIFO special files, `<base>/<namespace>.<name>.server`
//! and `...client`. The process that *creates* a role's file becomes its
//! reader; the process that later finds the file present *opens* it as its
//! writer. One created file plus one opened file per side yields a full
//! duplex byte stream.
//!
//! All endpoints run non-blocking: reads return whatever the pipe currently
//! holds, writes report backpressure as a neutral [`WriteOutcome::WouldBlock`]
//! rather than an error. Messages are length-prefix framed on the write path;
//! the read path returns raw bytes, reassembled into whole payloads by
//! `fifoduplex_frame::FrameBuffer` on the caller's side.

pub mod config;
pub mod error;
pub mod path;
pub mod registry;

#[cfg(unix)]
pub mod channel;

pub use config::ChannelConfig;
pub use error::{ChannelError, Result};
pub use path::{pipe_path, Role};
pub use registry::{ChannelId, ChannelRegistry};

#[cfg(unix)]
pub use channel::{DuplexFifo, WriteOutcome};
