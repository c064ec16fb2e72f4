//! Coordinated-launch identifier type.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT: AtomicU64 = AtomicU64::new(1);

/// Identifier of one coordinated launch.
///
/// Allocated from a process-wide counter, so two launches in the same
/// process never collide. Rendered as `launch-` followed by eight hex
/// digits, which is also the accepted parse format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LaunchId(u64);

impl LaunchId {
    /// Allocate the next launch ID.
    pub fn new() -> Self {
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Wrap a raw counter value without allocating.
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }
}

impl Default for LaunchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LaunchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "launch-{:08x}", self.0)
    }
}

impl FromStr for LaunchId {
    type Err = crate::error::LaunchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("launch-")
            .and_then(|hex| u64::from_str_radix(hex, 16).ok())
            .map(LaunchId)
            .ok_or_else(|| crate::error::LaunchError::UnknownLaunch(s.into()))
    }
}
