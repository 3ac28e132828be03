use std::path::PathBuf;

/// Errors that can occur in channel setup and I/O operations.
///
/// Backpressure is never an error: a saturated write reports
/// `WriteOutcome::WouldBlock` and a dry read returns an empty byte run, so
/// every variant here is a real failure the caller must act on.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Failed to create the FIFO special file.
    #[error("failed to create fifo at {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to open an existing FIFO endpoint.
    ///
    /// Includes `ENXIO` when a writer opens a FIFO whose reader has not
    /// attached yet — the retryable rendezvous case.
    #[error("failed to open fifo at {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An `open_*` operation requires the FIFO to already exist.
    #[error("fifo not found at {path}")]
    NotFound { path: PathBuf },

    /// The path exists but is not a FIFO special file.
    #[error("existing path is not a fifo: {path}")]
    NotAFifo { path: PathBuf },

    /// The channel has no read endpoint.
    #[error("channel has no read endpoint")]
    NotReadable,

    /// The channel has no write endpoint.
    #[error("channel has no write endpoint")]
    NotWritable,

    /// Frame encoding failed on the write path.
    #[error("frame encoding error: {0}")]
    Frame(#[from] fifoduplex_frame::FrameError),

    /// Any other OS-level read/write failure. The channel stays open; the
    /// caller decides whether to tear down or retry.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChannelError>;
