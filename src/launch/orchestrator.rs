//! The dual-session launch pipeline.
//!
//! One coordinated launch is a single linear chain of awaited calls:
//! resolve the configuration pair, start the python session paused at
//! entry, ask it for its process id, inject the pid into the C++ attach
//! configuration, start the C++ session, then (after a settle delay)
//! resume the target unless the user wanted it paused. Failure handling
//! is local to each step; the only rollback is stopping the python
//! session when the C++ session fails to start after a pid was obtained.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::host::{DebugHost, SessionHandle, SessionKind, StartOptions};
use super::id::LaunchId;
use super::state::LaunchPhase;
use super::store::LaunchRegistry;
use crate::catalog::{ConfigMap, LaunchCatalog};
use crate::error::{LaunchError, Result};
use crate::resolve::{self, CompositeLaunchRequest, ResolveContext};

/// How long to wait after starting the C++ session before resuming the
/// target. Attach completion is assumed, not confirmed, to fit inside
/// this window.
pub const ATTACH_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Introspection request answered by the python debugger with its system
/// info, including the debuggee's process descriptor.
const PROCESS_INFO_REQUEST: &str = "pydevdSystemInfo";

/// Custom request resuming a python session paused at entry.
const RESUME_REQUEST: &str = "continue";

/// A successfully paired launch.
///
/// Returned as soon as both sessions are underway; the resume step keeps
/// running on `resume_task` and flips the registry record to its terminal
/// phase when done.
pub struct CoordinatedLaunch {
    /// Identifier of this launch in the registry.
    pub id: LaunchId,
    /// The running python session.
    pub interpreted: Arc<dyn SessionHandle>,
    /// The attached C++ session.
    pub native: Arc<dyn SessionHandle>,
    /// The in-flight delay-then-resume step.
    pub resume_task: JoinHandle<()>,
}

impl std::fmt::Debug for CoordinatedLaunch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatedLaunch")
            .field("id", &self.id)
            .field("interpreted", &self.interpreted.name())
            .field("native", &self.native.name())
            .finish()
    }
}

/// Coordinates one python session and one C++ session per launch request.
///
/// Independent launches may be in flight concurrently; they share nothing
/// but the registry bookkeeping.
pub struct DualSessionOrchestrator {
    host: Arc<dyn DebugHost>,
    registry: Arc<LaunchRegistry>,
}

impl DualSessionOrchestrator {
    /// Create an orchestrator driving sessions through `host`.
    pub fn new(host: Arc<dyn DebugHost>, registry: Arc<LaunchRegistry>) -> Self {
        Self { host, registry }
    }

    /// The registry tracking this orchestrator's launches.
    pub fn registry(&self) -> &Arc<LaunchRegistry> {
        &self.registry
    }

    /// Run one coordinated launch.
    ///
    /// Returns once both sessions are underway; the caller that answers
    /// the inbound protocol request should reply at that point. Any error
    /// leaves the registry record in `Aborted`.
    pub async fn launch(
        &self,
        request: &CompositeLaunchRequest,
        catalog: &LaunchCatalog,
        ctx: &mut ResolveContext,
    ) -> Result<CoordinatedLaunch> {
        let id = self.registry.create()?;

        match self.run(id, request, catalog, ctx).await {
            Ok(launch) => Ok(launch),
            Err(err) => {
                error!(%id, %err, "coordinated launch aborted");
                self.registry.update(&id, |r| {
                    let _ = r.phase.transition_to(LaunchPhase::Aborted);
                })?;
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        id: LaunchId,
        request: &CompositeLaunchRequest,
        catalog: &LaunchCatalog,
        ctx: &mut ResolveContext,
    ) -> Result<CoordinatedLaunch> {
        let mut phase = LaunchPhase::Idle;

        let pair = resolve::resolve(request, catalog, ctx)?;
        self.advance(id, &mut phase, LaunchPhase::ConfigResolved)?;

        let workspace = ctx
            .workspace()
            .ok_or(LaunchError::EnvironmentMissing)?
            .to_path_buf();

        // The C++ debugger can only attach to a process that is already
        // paused, so the python session always starts stopped at entry.
        // The user's own preference decides the resume step later.
        let mut interpreted_conf = pair.interpreted;
        let original_stop_on_entry = interpreted_conf
            .get("stopOnEntry")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        interpreted_conf.insert("stopOnEntry".into(), json!(true));

        let options = StartOptions {
            no_debug: request.no_debug,
        };

        self.advance(id, &mut phase, LaunchPhase::InterpretedStarting)?;
        let interpreted = match self
            .host
            .start_session(SessionKind::Interpreted, &workspace, &interpreted_conf, options)
            .await
        {
            Ok(Some(handle)) => handle,
            Ok(None) => return Err(LaunchError::InterpretedStartFailure),
            Err(err) => {
                warn!(%err, "python session start failed");
                return Err(LaunchError::InterpretedStartFailure);
            }
        };

        self.advance(id, &mut phase, LaunchPhase::InterpretedRunning)?;
        self.registry.update(&id, |r| {
            r.interpreted = Some(interpreted.clone());
        })?;

        // Ask the python debugger for the debuggee's pid. If it cannot
        // answer we abort, but the python session stays up: the user may
        // still want the single-language session.
        let pid = match interpreted.send_custom_request(PROCESS_INFO_REQUEST).await {
            Ok(response) => response
                .get("process")
                .and_then(|process| process.get("pid"))
                .and_then(Value::as_u64)
                // pydevd reports an unknown pid as 0.
                .filter(|pid| *pid != 0)
                .ok_or(LaunchError::IntrospectionFailure)?,
            Err(err) => {
                warn!(%err, "process-info request failed");
                return Err(LaunchError::IntrospectionFailure);
            }
        };
        self.advance(id, &mut phase, LaunchPhase::PidDiscovered)?;
        info!(%id, pid, "python process id discovered");

        let mut native_conf = pair.native;
        inject_pid(&mut native_conf, pid);

        self.advance(id, &mut phase, LaunchPhase::NativeStarting)?;
        let native = match self
            .host
            .start_session(SessionKind::Native, &workspace, &native_conf, options)
            .await
        {
            Ok(Some(handle)) => handle,
            Ok(None) => {
                self.rollback_interpreted(&interpreted).await;
                return Err(LaunchError::NativeStartFailure(
                    "the host produced no session".into(),
                ));
            }
            Err(err) => {
                self.rollback_interpreted(&interpreted).await;
                return Err(LaunchError::NativeStartFailure(err.to_string()));
            }
        };

        self.advance(id, &mut phase, LaunchPhase::Paired)?;
        info!(%id, "both sessions underway");

        // The inbound launch request is answered now; ongoing debugging
        // proceeds outside this request/response cycle.
        if let Err(err) = self
            .host
            .send_event(super::host::SessionEvent::Custom {
                event: "coordinatedLaunchPaired".into(),
                body: json!({ "launchId": id.to_string() }),
            })
            .await
        {
            warn!(%err, "pairing notification failed");
        }

        let resume_task = self.schedule_resume(
            id,
            interpreted.clone(),
            original_stop_on_entry,
            request.optimized_launch,
        );

        Ok(CoordinatedLaunch {
            id,
            interpreted,
            native,
            resume_task,
        })
    }

    /// Delay, then resume the python session unless the user asked for a
    /// stop on entry. The delay collapses to zero for optimized launches,
    /// where the caller asserts attach synchronization is already
    /// guaranteed.
    fn schedule_resume(
        &self,
        id: LaunchId,
        interpreted: Arc<dyn SessionHandle>,
        original_stop_on_entry: bool,
        optimized: bool,
    ) -> JoinHandle<()> {
        let registry = self.registry.clone();
        let delay = if optimized {
            Duration::ZERO
        } else {
            ATTACH_SETTLE_DELAY
        };

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // The stop on entry was forced to let the C++ debugger attach;
            // undo it unless the user wanted it.
            if !original_stop_on_entry {
                if let Err(err) = interpreted.send_custom_request(RESUME_REQUEST).await {
                    warn!(%id, %err, "resume request failed");
                }
            }

            if let Err(err) = registry.update(&id, |r| {
                let _ = r.phase.transition_to(LaunchPhase::Resumed);
            }) {
                warn!(%id, %err, "failed to record resumed phase");
            }
        })
    }

    async fn rollback_interpreted(&self, interpreted: &Arc<dyn SessionHandle>) {
        info!("stopping python session after C++ attach failure");
        if let Err(err) = interpreted.stop().await {
            warn!(%err, "python session stop failed during rollback");
        }
    }

    fn advance(&self, id: LaunchId, phase: &mut LaunchPhase, target: LaunchPhase) -> Result<()> {
        phase.transition_to(target)?;
        self.registry.update(&id, |r| r.phase = target)
    }
}

/// Write the discovered pid into the fields the attach backends read.
fn inject_pid(conf: &mut ConfigMap, pid: u64) {
    conf.insert("processId".into(), json!(pid));
    if conf.get("type").and_then(Value::as_str) == Some("lldb") {
        conf.insert("pid".into(), json!(pid));
    }
}
