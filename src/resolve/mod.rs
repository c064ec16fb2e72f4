//! Configuration resolution.
//!
//! Turns a user-supplied composite request (named references, inline
//! fragments, or default presets) into two concrete configurations: one
//! for the python debugger and one for the C++ debugger. Resolution fails
//! fast on the first unmet precondition and never yields a partial pair.

mod context;
mod defaults;
mod interpreter;
pub mod normalize;
mod request;

pub use context::ResolveContext;
pub use interpreter::{discover as discover_interpreter, EnvInterpreter, InterpreterSource};
pub use request::{CompositeLaunchRequest, ConfigSide, CppConfigMode, PythonConfigMode};

use serde_json::{json, Value};
use tracing::debug;

use crate::catalog::{ConfigMap, LaunchCatalog};
use crate::error::{LaunchError, Result};

/// The output of resolution: one concrete configuration per side.
///
/// Both maps are further amended by the orchestrator (process id,
/// stop-on-entry override) before use, and discarded once both sessions
/// are started or the launch aborts.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPair {
    /// Configuration for the python debugger.
    pub interpreted: ConfigMap,
    /// Configuration for the C++ debugger.
    pub native: ConfigMap,
}

/// Resolve a composite request against the launch catalog.
///
/// Preconditions checked before any per-side work: the request must carry
/// at least one protocol field, and a workspace folder must be open. Both
/// sides resolve or the whole call fails with an error naming the side
/// and field at fault.
pub fn resolve(
    request: &CompositeLaunchRequest,
    catalog: &LaunchCatalog,
    ctx: &mut ResolveContext,
) -> Result<ResolvedPair> {
    if request.is_unconfigured() {
        return Err(LaunchError::ConfigurationMissing(
            "no configuration provided; add a configuration of type 'pythoncpp' \
             to your launch file"
                .into(),
        ));
    }

    if ctx.workspace().is_none() {
        return Err(LaunchError::EnvironmentMissing);
    }

    let interpreted = resolve_interpreted(request, catalog)?;
    let native = resolve_native(request, catalog, ctx)?;

    debug!(
        interpreted = interpreted.get("name").and_then(|v| v.as_str()),
        native = native.get("name").and_then(|v| v.as_str()),
        "configuration pair resolved"
    );

    Ok(ResolvedPair {
        interpreted,
        native,
    })
}

fn resolve_interpreted(
    request: &CompositeLaunchRequest,
    catalog: &LaunchCatalog,
) -> Result<ConfigMap> {
    match request.python_config_mode {
        Some(PythonConfigMode::Embedded) => embedded_fragment(
            request.embedded_python_config.as_ref(),
            ConfigSide::Interpreted,
            "embeddedPythonConfig",
        ),
        Some(PythonConfigMode::Default) => Ok(defaults::python_current_file()),
        Some(PythonConfigMode::Manual) | Some(PythonConfigMode::Custom) | None => {
            let name = request.python_launch_name.as_deref().ok_or_else(|| {
                LaunchError::ConfigurationIncomplete {
                    side: ConfigSide::Interpreted,
                    guidance: "set 'pythonLaunchName' to a configuration name, \
                               or choose the 'default' mode"
                        .into(),
                }
            })?;
            lookup(catalog, name)
        }
    }
}

fn resolve_native(
    request: &CompositeLaunchRequest,
    catalog: &LaunchCatalog,
    ctx: &mut ResolveContext,
) -> Result<ConfigMap> {
    let mut conf = match request.cpp_config_mode {
        Some(CppConfigMode::Embedded) => embedded_fragment(
            request.embedded_cpp_config.as_ref(),
            ConfigSide::Native,
            "embeddedCppConfig",
        )?,
        Some(CppConfigMode::Default) => {
            let program = interpreter::discover(ctx);
            defaults::cpp_attach_platform_default(&program)
        }
        Some(CppConfigMode::DefaultWinAttach) => defaults::cpp_attach_windows(),
        Some(CppConfigMode::DefaultGdbAttach) => {
            let program = interpreter::discover(ctx);
            defaults::cpp_attach_gdb(&program)
        }
        Some(CppConfigMode::Manual) | Some(CppConfigMode::Custom) | None => {
            let name = request.cpp_attach_name.as_deref().ok_or_else(|| {
                LaunchError::ConfigurationIncomplete {
                    side: ConfigSide::Native,
                    guidance: "set 'cppAttachName' to a configuration name, \
                               or choose the 'default' mode"
                        .into(),
                }
            })?;
            lookup(catalog, name)?
        }
    };

    let backend = conf
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    // cppdbg needs a program to resolve symbols for; fill it in when the
    // user left it out.
    let has_program = conf
        .get("program")
        .and_then(Value::as_str)
        .map(|p| !p.is_empty())
        .unwrap_or(false);
    if backend == "cppdbg" && !has_program {
        conf.insert("program".into(), json!(interpreter::discover(ctx)));
    }

    // The orchestrator owns the real process id; a placeholder keeps the
    // back-end from prompting for one.
    conf.insert("processId".into(), json!(""));
    if backend == "lldb" {
        conf.insert("pid".into(), json!(""));
    }

    Ok(conf)
}

fn lookup(catalog: &LaunchCatalog, name: &str) -> Result<ConfigMap> {
    catalog.find(name).cloned().ok_or_else(|| {
        LaunchError::ConfigurationMissing(format!(
            "no configuration named '{name}' in the launch catalog"
        ))
    })
}

fn embedded_fragment(
    fragment: Option<&Value>,
    side: ConfigSide,
    field: &str,
) -> Result<ConfigMap> {
    let fragment = fragment.ok_or_else(|| LaunchError::ConfigurationIncomplete {
        side,
        guidance: format!("the 'embedded' mode requires '{field}' to be set"),
    })?;

    match fragment {
        Value::Object(map) => Ok(map.clone()),
        Value::String(text) => {
            let parsed: Value = serde_json::from_str(&normalize::normalize(text))?;
            match parsed {
                Value::Object(map) => Ok(map),
                _ => Err(LaunchError::ConfigurationIncomplete {
                    side,
                    guidance: format!("'{field}' must be a configuration object"),
                }),
            }
        }
        _ => Err(LaunchError::ConfigurationIncomplete {
            side,
            guidance: format!("'{field}' must be a configuration object or JSON text"),
        }),
    }
}
