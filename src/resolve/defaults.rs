//! Built-in default configurations synthesized by the resolver.

use serde_json::{json, Value};

use crate::catalog::ConfigMap;

fn object(value: Value) -> ConfigMap {
    match value {
        Value::Object(map) => map,
        _ => ConfigMap::new(),
    }
}

/// The standard "run current file" python launch configuration.
pub fn python_current_file() -> ConfigMap {
    object(json!({
        "name": "Python: Current File",
        "type": "python",
        "request": "launch",
        "program": "${file}",
        "console": "integratedTerminal"
    }))
}

/// The Windows attach configuration (`cppvsdbg` backend).
pub fn cpp_attach_windows() -> ConfigMap {
    object(json!({
        "name": "(Windows) Attach",
        "type": "cppvsdbg",
        "request": "attach",
        "processId": ""
    }))
}

/// The `cppdbg` attach configuration with the gdb backend flavor.
///
/// `program` must point at the interpreter executable hosting the
/// debugged code.
pub fn cpp_attach_gdb(program: &str) -> ConfigMap {
    object(json!({
        "name": "(gdb) Attach",
        "type": "cppdbg",
        "request": "attach",
        "MIMode": "gdb",
        "program": program,
        "processId": ""
    }))
}

/// The host platform's default attach configuration.
pub fn cpp_attach_platform_default(program: &str) -> ConfigMap {
    if cfg!(windows) {
        cpp_attach_windows()
    } else {
        cpp_attach_gdb(program)
    }
}
