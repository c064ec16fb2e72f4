//! The composite request that initiates a coordinated launch.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{LaunchError, Result};

/// Which side of the coordinated launch a configuration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSide {
    /// The python session running the target program.
    Interpreted,
    /// The C++ session attaching to the target's process.
    Native,
}

impl std::fmt::Display for ConfigSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interpreted => write!(f, "python"),
            Self::Native => write!(f, "cpp"),
        }
    }
}

/// Resolution mode for the python side of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PythonConfigMode {
    /// Synthesize the built-in "run current file" configuration.
    #[serde(rename = "default")]
    Default,
    /// Look up `pythonLaunchName` in the catalog.
    #[serde(rename = "manual")]
    Manual,
    /// Same lookup path as `manual`; kept as a distinct spelling for
    /// user-authored requests.
    #[serde(rename = "custom")]
    Custom,
    /// Use `embeddedPythonConfig` verbatim.
    #[serde(rename = "embedded")]
    Embedded,
}

/// Resolution mode for the C++ side of the request.
///
/// The default modes come in platform-flavored spellings so a request can
/// pin a specific attach backend instead of taking the host OS default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CppConfigMode {
    /// Synthesize the host platform's default attach configuration.
    #[serde(rename = "default")]
    Default,
    /// Synthesize the Windows (`cppvsdbg`) attach configuration.
    #[serde(rename = "default (win) Attach")]
    DefaultWinAttach,
    /// Synthesize the `cppdbg` attach configuration with the gdb backend.
    #[serde(rename = "default (gdb) Attach")]
    DefaultGdbAttach,
    /// Look up `cppAttachName` in the catalog.
    #[serde(rename = "manual")]
    Manual,
    /// Same lookup path as `manual`.
    #[serde(rename = "custom")]
    Custom,
    /// Use `embeddedCppConfig` verbatim.
    #[serde(rename = "embedded")]
    Embedded,
}

/// The single request initiating a coordinated dual-debugger launch.
///
/// This is the composite configuration object arriving from the host's
/// debug-launch protocol: the protocol's own `type` / `request` / `name`
/// fields plus the pythonCpp-specific fields. Embedded fragments may be
/// JSON objects, or JSON text when the authoring layer had to serialize
/// them (see [`crate::resolve::normalize`]).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompositeLaunchRequest {
    /// Protocol `type` field (`"pythoncpp"`).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Protocol `request` field (`"launch"`).
    pub request: Option<String>,
    /// Protocol `name` field.
    pub name: Option<String>,

    /// How to resolve the python side. Unset behaves like `manual`.
    pub python_config_mode: Option<PythonConfigMode>,
    /// Catalog name for the python side (`manual`/`custom` modes).
    pub python_launch_name: Option<String>,
    /// Inline python configuration (`embedded` mode).
    pub embedded_python_config: Option<Value>,

    /// How to resolve the C++ side. Unset behaves like `manual`.
    pub cpp_config_mode: Option<CppConfigMode>,
    /// Catalog name for the C++ side (`manual`/`custom` modes).
    pub cpp_attach_name: Option<String>,
    /// Inline C++ configuration (`embedded` mode).
    pub embedded_cpp_config: Option<Value>,

    /// Collapse the post-attach settle delay to zero. The caller asserts
    /// attach synchronization is already guaranteed.
    pub optimized_launch: bool,
    /// Run without debugging.
    pub no_debug: bool,
}

impl CompositeLaunchRequest {
    /// Parse a composite request from a raw protocol value.
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(LaunchError::Json)
    }

    /// Whether the request carries no configuration at all.
    ///
    /// A request missing `type`, `request`, and `name` together signals
    /// that no launch configuration was provided; the launch must abort
    /// with guidance before any resolution is attempted.
    pub fn is_unconfigured(&self) -> bool {
        self.kind.is_none() && self.request.is_none() && self.name.is_none()
    }
}
