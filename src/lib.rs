//! # pycpp-debug
//!
//! Coordinated dual-debugger launcher for mixed Python/C++ debugging.
//!
//! One user action produces one coherent mixed-language debug session:
//! the python process is launched stopped at entry, its OS process id is
//! discovered through a debugger introspection request, the C++ debugger
//! is attached to that pid, and execution resumes. The debugger back-ends
//! and the editor host stay external; this crate only resolves the
//! configuration pair and drives the launch sequence through a capability
//! trait.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use pycpp_debug::bridge::StdioBridge;
//! use pycpp_debug::launch::{DualSessionOrchestrator, LaunchRegistry, SessionEventSink};
//! use pycpp_debug::resolve::ResolveContext;
//! use pycpp_debug::{commands, LaunchCatalog};
//!
//! #[tokio::main]
//! async fn main() -> pycpp_debug::Result<()> {
//!     pycpp_debug::logging::try_init().ok();
//!
//!     let (host, events) = StdioBridge::over_stdio();
//!     SessionEventSink::new().attach(events);
//!
//!     let registry = Arc::new(LaunchRegistry::new());
//!     let orchestrator = DualSessionOrchestrator::new(host, registry);
//!
//!     let catalog = LaunchCatalog::empty();
//!     let mut ctx = ResolveContext::new(std::env::current_dir().ok());
//!     let launch = commands::debug_editor_contents(&orchestrator, &catalog, &mut ctx).await?;
//!
//!     println!("paired launch {}", launch.id);
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod error;
pub mod launch;
pub mod logging;
pub mod resolve;

// Re-export commonly used types
pub use catalog::{ConfigMap, LaunchCatalog};
pub use error::{LaunchError, Result};
pub use launch::{
    CoordinatedLaunch, DebugHost, DualSessionOrchestrator, LaunchId, LaunchPhase, LaunchRegistry,
    SessionEvent, SessionEventSink, SessionHandle, SessionKind, StartOptions,
};
pub use resolve::{
    CompositeLaunchRequest, ConfigSide, CppConfigMode, PythonConfigMode, ResolveContext,
    ResolvedPair,
};
