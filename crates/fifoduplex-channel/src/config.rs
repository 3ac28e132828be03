use std::path::PathBuf;

use crate::path::{pipe_path, Role};

/// Where and how a channel materializes its FIFO pair.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Directory holding the FIFO files. Default: `/tmp`.
    pub base_dir: PathBuf,
    /// Namespace prefix shared by both files. Default: `com.ipc`.
    pub namespace: String,
    /// Permission mode for created FIFO files (subject to the process
    /// umask). Default: `0o664`.
    pub mode: u32,
    /// Upper bound per underlying read call on the read path.
    pub read_chunk_size: usize,
}

impl ChannelConfig {
    /// Default FIFO permission mode.
    pub const DEFAULT_MODE: u32 = 0o664;
    /// Default per-call read chunk size.
    pub const DEFAULT_READ_CHUNK_SIZE: usize = 4096;

    /// Canonical path of one role's FIFO under this configuration.
    pub fn pipe_path(&self, name: &str, role: Role) -> PathBuf {
        pipe_path(&self.base_dir, &self.namespace, name, role)
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("/tmp"),
            namespace: String::from("com.ipc"),
            mode: Self::DEFAULT_MODE,
            read_chunk_size: Self::DEFAULT_READ_CHUNK_SIZE,
        }
    }
}
