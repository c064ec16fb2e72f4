//! Capability contract between the orchestrator and the debug host.
//!
//! The editor host owns the actual debug sessions; this crate only drives
//! them. Both the real stdio bridge and the test doubles implement the
//! same two traits, so the orchestrator never knows which one it holds.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog::ConfigMap;
use crate::error::Result;

/// Which back-end a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// The python session running the target program.
    Interpreted,
    /// The C++ session attached to the target's process.
    Native,
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interpreted => write!(f, "interpreted"),
            Self::Native => write!(f, "native"),
        }
    }
}

/// Options for starting a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartOptions {
    /// Run without debugging.
    pub no_debug: bool,
}

/// A session lifecycle notification from the host.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A debug session started.
    Started {
        /// Which back-end started.
        kind: SessionKind,
        /// The session's configuration name.
        name: String,
    },
    /// A debug session terminated.
    Terminated {
        /// Which back-end terminated.
        kind: SessionKind,
        /// The session's configuration name.
        name: String,
    },
    /// A custom event emitted by a back-end.
    Custom {
        /// The event name.
        event: String,
        /// The event payload.
        body: Value,
    },
}

/// An opaque reference to a running debug session.
#[async_trait]
pub trait SessionHandle: Send + Sync {
    /// Which back-end this session belongs to.
    fn kind(&self) -> SessionKind;

    /// The session's configuration name.
    fn name(&self) -> &str;

    /// Send a named custom request to the session and await its response.
    async fn send_custom_request(&self, command: &str) -> Result<Value>;

    /// Stop the session.
    async fn stop(&self) -> Result<()>;
}

/// The host that starts debug sessions on our behalf.
#[async_trait]
pub trait DebugHost: Send + Sync {
    /// Ask the host to start a debug session in `workspace` with the given
    /// configuration.
    ///
    /// `Ok(None)` means the host acknowledged the request but produced no
    /// session (the editor reports the underlying cause itself); callers
    /// treat it the same as an error.
    async fn start_session(
        &self,
        kind: SessionKind,
        workspace: &Path,
        config: &ConfigMap,
        options: StartOptions,
    ) -> Result<Option<Arc<dyn SessionHandle>>>;

    /// Emit a protocol event back toward the host.
    async fn send_event(&self, event: SessionEvent) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_kind_display() {
        assert_eq!(SessionKind::Interpreted.to_string(), "interpreted");
        assert_eq!(SessionKind::Native.to_string(), "native");
    }

    #[test]
    fn test_start_options_default() {
        let options = StartOptions::default();
        assert!(!options.no_debug);
    }
}
