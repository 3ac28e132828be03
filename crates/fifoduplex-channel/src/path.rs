use std::path::{Path, PathBuf};

/// Which half of the duplex pair a FIFO file carries.
///
/// Roles name the *file*, not the process: whoever creates a role's file
/// reads from it, and the peer writes to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Server,
    Client,
}

impl Role {
    /// Filename suffix for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Server => "server",
            Role::Client => "client",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical FIFO path: `<base-dir>/<namespace>.<name>.<role>`.
pub fn pipe_path(base_dir: &Path, namespace: &str, name: &str, role: Role) -> PathBuf {
    base_dir.join(format!("{namespace}.{name}.{role}", role = role.as_str()))
}
