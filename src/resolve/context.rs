//! Resolution context threaded through a coordinated launch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::interpreter::InterpreterSource;

/// Context for configuration resolution.
///
/// Carries the workspace folder the sessions run in, the companion
/// interpreter source (if any), and the discovered-interpreter cache.
/// The cache is an explicit per-context value with no invalidation,
/// not a process-wide singleton: two contexts never share answers.
#[derive(Clone, Default)]
pub struct ResolveContext {
    workspace: Option<PathBuf>,
    interpreter_source: Option<Arc<dyn InterpreterSource>>,
    interpreter_cache: Option<String>,
}

impl ResolveContext {
    /// Create a context for the given workspace folder.
    pub fn new(workspace: Option<PathBuf>) -> Self {
        Self {
            workspace,
            interpreter_source: None,
            interpreter_cache: None,
        }
    }

    /// Attach a companion interpreter source.
    pub fn with_interpreter_source(mut self, source: Arc<dyn InterpreterSource>) -> Self {
        self.interpreter_source = Some(source);
        self
    }

    /// The workspace folder the sessions run in.
    pub fn workspace(&self) -> Option<&Path> {
        self.workspace.as_deref()
    }

    /// The companion interpreter source, if one is attached.
    pub fn interpreter_source(&self) -> Option<&Arc<dyn InterpreterSource>> {
        self.interpreter_source.as_ref()
    }

    /// The cached discovered-interpreter path, if any.
    pub fn interpreter_cache(&self) -> Option<&str> {
        self.interpreter_cache.as_deref()
    }

    /// Remember a discovered interpreter path for later lookups.
    pub fn set_interpreter_cache(&mut self, path: String) {
        self.interpreter_cache = Some(path);
    }
}

impl std::fmt::Debug for ResolveContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolveContext")
            .field("workspace", &self.workspace)
            .field("interpreter_cache", &self.interpreter_cache)
            .field(
                "interpreter_source",
                &self.interpreter_source.as_ref().map(|_| "<source>"),
            )
            .finish()
    }
}
