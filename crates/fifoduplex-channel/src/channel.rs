use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{FileTypeExt, OpenOptionsExt};
use std::path::Path;

use bytes::{Bytes, BytesMut};
use fifoduplex_frame::{encode_frame, LEN_PREFIX_SIZE};
use tracing::{debug, info};

use crate::config::ChannelConfig;
use crate::error::{ChannelError, Result};
use crate::path::Role;
use crate::registry::ChannelId;

/// Outcome of a non-erroring write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The whole frame was handed to the OS pipe buffer.
    Flushed,
    /// The pipe buffer had no space; nothing fatal happened. Retry later.
    WouldBlock,
}

/// A duplex channel over a pair of named-pipe (FIFO) files.
///
/// Holds at most one read endpoint and one write endpoint, populated by the
/// four setup operations. The create/open asymmetry is the rendezvous
/// protocol: creating a role's file makes this channel its reader, while
/// opening a file the peer created makes this channel its writer. Side A
/// calls [`create_server_endpoint`](Self::create_server_endpoint) +
/// [`open_client_endpoint`](Self::open_client_endpoint); side B does the
/// inverse, polling the open side until A's create has landed.
///
/// Endpoints persist until [`close`](Self::close) (or drop) releases both.
pub struct DuplexFifo {
    name: String,
    id: ChannelId,
    config: ChannelConfig,
    read_endpoint: Option<File>,
    write_endpoint: Option<File>,
}

impl DuplexFifo {
    /// Create a channel with default configuration.
    ///
    /// Does not touch the filesystem; endpoints start absent.
    pub fn new(name: impl Into<String>, id: ChannelId) -> Self {
        Self::with_config(name, id, ChannelConfig::default())
    }

    /// Create a channel with explicit configuration.
    pub fn with_config(name: impl Into<String>, id: ChannelId, config: ChannelConfig) -> Self {
        Self {
            name: name.into(),
            id,
            config,
            read_endpoint: None,
            write_endpoint: None,
        }
    }

    /// Ensure the server-role FIFO exists, then open it for reading.
    ///
    /// Creates the file with the configured mode if absent. The creating
    /// side always becomes the file's reader.
    pub fn create_server_endpoint(&mut self) -> Result<()> {
        self.create_read_endpoint(Role::Server)
    }

    /// Ensure the client-role FIFO exists, then open it for reading.
    pub fn create_client_endpoint(&mut self) -> Result<()> {
        self.create_read_endpoint(Role::Client)
    }

    /// Open the already-existing server-role FIFO for writing.
    ///
    /// Fails with [`ChannelError::NotFound`] if the peer has not created the
    /// file yet, and with [`ChannelError::Open`] (`ENXIO`) while the file
    /// exists but its reader has not attached. Both cases are the polling
    /// half of the rendezvous; callers retry.
    pub fn open_server_endpoint(&mut self) -> Result<()> {
        self.open_write_endpoint(Role::Server)
    }

    /// Open the already-existing client-role FIFO for writing.
    pub fn open_client_endpoint(&mut self) -> Result<()> {
        self.open_write_endpoint(Role::Client)
    }

    fn create_read_endpoint(&mut self, role: Role) -> Result<()> {
        let path = self.config.pipe_path(&self.name, role);

        if path.exists() {
            let metadata =
                std::fs::symlink_metadata(&path).map_err(|e| ChannelError::Create {
                    path: path.clone(),
                    source: e,
                })?;
            if !metadata.file_type().is_fifo() {
                return Err(ChannelError::NotAFifo { path });
            }
        } else {
            mkfifo(&path, self.config.mode).map_err(|e| ChannelError::Create {
                path: path.clone(),
                source: e,
            })?;
            debug!(channel = %self.id, ?path, "created fifo");
        }

        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&path)
            .map_err(|e| ChannelError::Open {
                path: path.clone(),
                source: e,
            })?;

        info!(channel = %self.id, name = %self.name, %role, ?path, "reading from fifo");
        self.read_endpoint = Some(file);
        Ok(())
    }

    fn open_write_endpoint(&mut self, role: Role) -> Result<()> {
        let path = self.config.pipe_path(&self.name, role);

        if !path.exists() {
            return Err(ChannelError::NotFound { path });
        }

        let file = OpenOptions::new()
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&path)
            .map_err(|e| ChannelError::Open {
                path: path.clone(),
                source: e,
            })?;

        info!(channel = %self.id, name = %self.name, %role, ?path, "writing to fifo");
        self.write_endpoint = Some(file);
        Ok(())
    }

    /// Frame a payload and write it to the write endpoint.
    ///
    /// Partial writes accumulate until the whole frame is in the pipe
    /// buffer. A full pipe (or a zero-byte write) yields
    /// [`WriteOutcome::WouldBlock`]; payloads at most `PIPE_BUF` + 4 bytes
    /// are written atomically by the kernel, larger frames can be left torn
    /// mid-frame by backpressure.
    pub fn write(&mut self, payload: &[u8]) -> Result<WriteOutcome> {
        let endpoint = self
            .write_endpoint
            .as_mut()
            .ok_or(ChannelError::NotWritable)?;

        let mut frame = BytesMut::with_capacity(LEN_PREFIX_SIZE + payload.len());
        encode_frame(payload, &mut frame)?;

        write_frame_bytes(endpoint, &frame)
    }

    /// Drain whatever the read endpoint currently holds.
    ///
    /// Returns raw accumulated bytes: possibly empty, possibly a fragment of
    /// a frame, possibly several whole frames back-to-back. Frame boundaries
    /// are recovered by feeding the returned bytes to a
    /// `fifoduplex_frame::FrameBuffer`, which must live across calls.
    pub fn read(&mut self) -> Result<Bytes> {
        let chunk_size = self.config.read_chunk_size;
        let endpoint = self
            .read_endpoint
            .as_mut()
            .ok_or(ChannelError::NotReadable)?;

        drain_available(endpoint, chunk_size)
    }

    /// Release both endpoints. Idempotent; also runs on drop.
    pub fn close(&mut self) {
        if let Some(endpoint) = self.read_endpoint.take() {
            debug!(channel = %self.id, name = %self.name, "closing read endpoint");
            drop(endpoint);
        }
        if let Some(endpoint) = self.write_endpoint.take() {
            debug!(channel = %self.id, name = %self.name, "closing write endpoint");
            drop(endpoint);
        }
    }

    /// The logical name shared with the peer.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The diagnostic channel id.
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// True once a read endpoint is open.
    pub fn is_readable(&self) -> bool {
        self.read_endpoint.is_some()
    }

    /// True once a write endpoint is open.
    pub fn is_writable(&self) -> bool {
        self.write_endpoint.is_some()
    }
}

impl Drop for DuplexFifo {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for DuplexFifo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuplexFifo")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("readable", &self.read_endpoint.is_some())
            .field("writable", &self.write_endpoint.is_some())
            .finish()
    }
}

/// Write an encoded frame to a non-blocking sink, accumulating partial
/// progress until done or blocked.
fn write_frame_bytes(dst: &mut impl Write, frame: &[u8]) -> Result<WriteOutcome> {
    let mut written = 0usize;
    while written < frame.len() {
        match dst.write(&frame[written..]) {
            Ok(0) => return Ok(WriteOutcome::WouldBlock),
            Ok(n) => written += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => return Ok(WriteOutcome::WouldBlock),
            Err(err) => return Err(ChannelError::Io(err)),
        }
    }
    Ok(WriteOutcome::Flushed)
}

/// Read chunks from a non-blocking source until it runs dry.
///
/// A zero-byte read means no writer is attached (yet, or anymore); like
/// would-block it ends the drain rather than spinning.
fn drain_available(src: &mut impl Read, chunk_size: usize) -> Result<Bytes> {
    let mut accumulated = BytesMut::new();
    let mut chunk = vec![0u8; chunk_size];
    loop {
        match src.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => accumulated.extend_from_slice(&chunk[..n]),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => break,
            Err(err) => return Err(ChannelError::Io(err)),
        }
    }
    Ok(accumulated.freeze())
}

fn mkfifo(path: &Path, mode: u32) -> std::io::Result<()> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| std::io::Error::new(ErrorKind::InvalidInput, "path contains NUL byte"))?;
    // SAFETY: `c_path` is a valid NUL-terminated path for the duration of
    // the call; mkfifo does not retain the pointer.
    let rc = unsafe { libc::mkfifo(c_path.as_ptr(), mode as libc::mode_t) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}
