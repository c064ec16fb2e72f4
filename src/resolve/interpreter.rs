//! Best-effort discovery of the python interpreter path.
//!
//! The native attach configurations need a `program` pointing at the
//! interpreter executable that will host the debugged code. When a
//! companion python extension is available we ask it; otherwise we fall
//! back to the bare executable name and let the OS path search sort it
//! out. Every failure on this path is a deliberate soft-fail.

use tracing::debug;

use super::context::ResolveContext;

/// Fallback executable name used when no companion source answers.
#[cfg(windows)]
pub const DEFAULT_INTERPRETER: &str = "python";
#[cfg(not(windows))]
pub const DEFAULT_INTERPRETER: &str = "python3";

/// A companion component that knows where the python interpreter lives.
///
/// Two call shapes exist depending on the companion's capabilities: newer
/// companions expose the active environment's interpreter, older ones only
/// a flat configured path. Implementations answer whichever they support
/// and return `None` for the other.
pub trait InterpreterSource: Send + Sync {
    /// The active environment's interpreter, if the companion exposes one.
    fn active_interpreter(&self) -> Option<String> {
        None
    }

    /// The companion's flat configured interpreter path, if any.
    fn configured_path(&self) -> Option<String> {
        None
    }
}

/// A companion source backed by the process environment.
///
/// Honors `PYCPP_PYTHON` as the configured path and `VIRTUAL_ENV` as the
/// active environment.
#[derive(Debug, Default)]
pub struct EnvInterpreter;

impl InterpreterSource for EnvInterpreter {
    fn active_interpreter(&self) -> Option<String> {
        let venv = std::env::var("VIRTUAL_ENV").ok()?;
        if venv.is_empty() {
            return None;
        }
        let bin = if cfg!(windows) {
            format!("{venv}\\Scripts\\python.exe")
        } else {
            format!("{venv}/bin/python")
        };
        Some(bin)
    }

    fn configured_path(&self) -> Option<String> {
        std::env::var("PYCPP_PYTHON").ok().filter(|p| !p.is_empty())
    }
}

/// Discover the interpreter path, caching the answer in the context.
///
/// Lookup order: context cache, companion active-environment shape,
/// companion configured-path shape, [`DEFAULT_INTERPRETER`]. The cache has
/// no invalidation; it lives as long as the context.
pub fn discover(ctx: &mut ResolveContext) -> String {
    if let Some(cached) = ctx.interpreter_cache() {
        return cached.to_string();
    }

    let discovered = ctx
        .interpreter_source()
        .and_then(|source| {
            source
                .active_interpreter()
                .or_else(|| source.configured_path())
        })
        .filter(|path| !path.is_empty())
        .unwrap_or_else(|| {
            debug!("no companion interpreter source answered, using default");
            DEFAULT_INTERPRETER.to_string()
        });

    ctx.set_interpreter_cache(discovered.clone());
    discovered
}
