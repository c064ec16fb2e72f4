//! Coordinated dual-session launching.
//!
//! This module owns the pairing of the two debug sessions for one launch
//! request: the capability contract toward the host, the launch phase
//! machine, the registry of in-flight launches, the passive event sink,
//! and the orchestrator that drives the whole sequence.

mod events;
mod host;
mod id;
mod orchestrator;
mod state;
mod store;

pub use events::SessionEventSink;
pub use host::{DebugHost, SessionEvent, SessionHandle, SessionKind, StartOptions};
pub use id::LaunchId;
pub use orchestrator::{CoordinatedLaunch, DualSessionOrchestrator, ATTACH_SETTLE_DELAY};
pub use state::LaunchPhase;
pub use store::{LaunchRecord, LaunchRegistry};
