//! User-facing commands.
//!
//! Three entry points exist outside the raw launch-request path: run the
//! current editor file without debugging, debug it with the full
//! coordinated launch, and a restart helper that stops the currently
//! active python session so the host can relaunch the pair.

use tracing::info;

use crate::catalog::LaunchCatalog;
use crate::error::{LaunchError, Result};
use crate::launch::{CoordinatedLaunch, DualSessionOrchestrator, LaunchRegistry};
use crate::resolve::{CompositeLaunchRequest, CppConfigMode, PythonConfigMode, ResolveContext};

/// The built-in composite request backing the editor-contents commands.
///
/// Both sides use the synthesized defaults, so no catalog entries are
/// required to debug the file at hand.
pub fn editor_contents_request(no_debug: bool) -> CompositeLaunchRequest {
    CompositeLaunchRequest {
        kind: Some("pythoncpp".into()),
        request: Some("launch".into()),
        name: Some("PythonCpp Debug".into()),
        python_config_mode: Some(PythonConfigMode::Default),
        cpp_config_mode: Some(CppConfigMode::Default),
        no_debug,
        ..Default::default()
    }
}

/// Build the composite request for a named catalog entry.
///
/// A `no_debug` wish from the caller is merged with the entry's own
/// `noDebug` setting; it never downgrades an entry that asked for a
/// no-debug run itself.
pub fn catalog_request(
    catalog: &LaunchCatalog,
    name: &str,
    no_debug: bool,
) -> Result<CompositeLaunchRequest> {
    let conf = catalog.find(name).cloned().ok_or_else(|| {
        LaunchError::ConfigurationMissing(format!(
            "no configuration named '{name}' in the launch catalog"
        ))
    })?;

    let mut request = CompositeLaunchRequest::from_value(&serde_json::Value::Object(conf))?;
    request.no_debug = request.no_debug || no_debug;
    Ok(request)
}

/// Debug the current editor file with a full coordinated launch.
pub async fn debug_editor_contents(
    orchestrator: &DualSessionOrchestrator,
    catalog: &LaunchCatalog,
    ctx: &mut ResolveContext,
) -> Result<CoordinatedLaunch> {
    orchestrator
        .launch(&editor_contents_request(false), catalog, ctx)
        .await
}

/// Run the current editor file without debugging.
pub async fn run_editor_contents(
    orchestrator: &DualSessionOrchestrator,
    catalog: &LaunchCatalog,
    ctx: &mut ResolveContext,
) -> Result<CoordinatedLaunch> {
    orchestrator
        .launch(&editor_contents_request(true), catalog, ctx)
        .await
}

/// Stop the currently active python session, if there is one.
///
/// Returns `true` when a session was stopped. The host drives the actual
/// relaunch; this helper only clears the way for it.
pub async fn restart_interpreted(registry: &LaunchRegistry) -> Result<bool> {
    let Some((id, interpreted)) = registry.active_interpreted()? else {
        return Ok(false);
    };

    info!(%id, "stopping active python session for restart");
    interpreted.stop().await?;
    registry.remove(&id)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::{LaunchPhase, SessionHandle, SessionKind};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_editor_contents_request_shape() {
        let request = editor_contents_request(false);
        assert_eq!(request.kind.as_deref(), Some("pythoncpp"));
        assert_eq!(request.request.as_deref(), Some("launch"));
        assert_eq!(request.python_config_mode, Some(PythonConfigMode::Default));
        assert_eq!(request.cpp_config_mode, Some(CppConfigMode::Default));
        assert!(!request.no_debug);
        assert!(!request.is_unconfigured());
    }

    #[test]
    fn test_editor_contents_request_no_debug() {
        assert!(editor_contents_request(true).no_debug);
    }

    fn composite_catalog() -> LaunchCatalog {
        LaunchCatalog::from_json(
            r#"{
            "configurations": [
                {
                    "name": "debug me",
                    "type": "pythoncpp",
                    "request": "launch"
                },
                {
                    "name": "run me",
                    "type": "pythoncpp",
                    "request": "launch",
                    "noDebug": true
                }
            ]
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_catalog_request_unknown_name() {
        let result = catalog_request(&composite_catalog(), "nope", false);
        assert!(matches!(
            result,
            Err(LaunchError::ConfigurationMissing(_))
        ));
    }

    #[test]
    fn test_catalog_request_merges_no_debug() {
        let catalog = composite_catalog();

        assert!(!catalog_request(&catalog, "debug me", false).unwrap().no_debug);
        assert!(catalog_request(&catalog, "debug me", true).unwrap().no_debug);

        // An entry asking for a no-debug run keeps it under plain launch.
        assert!(catalog_request(&catalog, "run me", false).unwrap().no_debug);
        assert!(catalog_request(&catalog, "run me", true).unwrap().no_debug);
    }

    struct StopSpy(Arc<AtomicBool>);

    #[async_trait]
    impl SessionHandle for StopSpy {
        fn kind(&self) -> SessionKind {
            SessionKind::Interpreted
        }

        fn name(&self) -> &str {
            "spy"
        }

        async fn send_custom_request(&self, _command: &str) -> Result<Value> {
            Ok(Value::Null)
        }

        async fn stop(&self) -> Result<()> {
            self.0.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_restart_with_no_active_session() {
        let registry = LaunchRegistry::new();
        assert!(!restart_interpreted(&registry).await.unwrap());
    }

    #[tokio::test]
    async fn test_restart_stops_active_session() {
        let registry = LaunchRegistry::new();
        let stopped = Arc::new(AtomicBool::new(false));

        let id = registry.create().unwrap();
        registry
            .update(&id, |r| {
                r.phase = LaunchPhase::Paired;
                r.interpreted = Some(Arc::new(StopSpy(stopped.clone())));
            })
            .unwrap();

        assert!(restart_interpreted(&registry).await.unwrap());
        assert!(stopped.load(Ordering::SeqCst));
        assert_eq!(registry.count(), 0);
    }
}
