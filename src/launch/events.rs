//! Passive observer of session lifecycle notifications.
//!
//! The sink only produces diagnostics. It has no control-flow effect on
//! the launch pipeline: a session terminating mid-sequence surfaces at
//! the next pipeline step's failure, not here.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::host::SessionEvent;

/// Diagnostics sink for session lifecycle notifications.
#[derive(Debug, Default)]
pub struct SessionEventSink;

impl SessionEventSink {
    /// Create a new sink.
    pub fn new() -> Self {
        Self
    }

    /// Record one notification.
    pub fn observe(&self, event: &SessionEvent) {
        match event {
            SessionEvent::Started { kind, name } => {
                info!(%kind, name, "debug session started");
            }
            SessionEvent::Terminated { kind, name } => {
                info!(%kind, name, "debug session terminated");
            }
            SessionEvent::Custom { event, body } => {
                debug!(event, %body, "custom debug event");
            }
        }
    }

    /// Drain a channel of host notifications on a background task.
    ///
    /// The task ends when the sending side is dropped.
    pub fn attach(self, mut events: mpsc::Receiver<SessionEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                self.observe(&event);
            }
        })
    }
}
