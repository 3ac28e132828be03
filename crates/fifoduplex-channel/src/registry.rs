use std::sync::atomic::{AtomicU64, Ordering};

/// Process-local channel identifier, used only for diagnostics.
///
/// Never transmitted on the wire and carries no meaning to the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(u64);

impl ChannelId {
    /// Wrap a raw identifier (useful in tests and for embedders that manage
    /// their own numbering).
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Hands out monotonically increasing [`ChannelId`]s.
///
/// The embedding process owns the registry and decides its lifetime —
/// typically constructed once at startup and shared by reference. Keeping
/// the counter here, instead of in a hidden static, gives it a defined
/// init/reset point.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    next: AtomicU64,
}

impl ChannelRegistry {
    /// Create a registry whose first assigned id is 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next id, incrementing the counter by one.
    pub fn assign(&self) -> ChannelId {
        ChannelId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
