//! Error types for pycpp-debug.

use thiserror::Error;

/// Main error type for coordinated-launch operations.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// No usable launch configuration: either nothing was provided at all,
    /// or a named reference points at nothing in the catalog.
    #[error("launch configuration missing: {0}")]
    ConfigurationMissing(String),

    /// A mode-dependent field is unset on one side of the request.
    #[error("incomplete {side} configuration: {guidance}")]
    ConfigurationIncomplete {
        side: crate::resolve::ConfigSide,
        guidance: String,
    },

    /// No workspace folder is open.
    #[error("working folder not found, open a folder and try again")]
    EnvironmentMissing,

    /// The python debug session failed to start or produced no session.
    #[error("the python debug session failed to start")]
    InterpretedStartFailure,

    /// The python session started but did not report a usable process id.
    #[error(
        "the python debugger couldn't send its process id, \
         please open an issue on the pycpp-debug tracker about this"
    )]
    IntrospectionFailure,

    /// The C++ debugger failed to attach after a pid was obtained.
    #[error("the C++ debug session failed to attach: {0}")]
    NativeStartFailure(String),

    /// Invalid launch phase transition attempted.
    #[error("invalid launch phase transition from {from:?} to {to:?}")]
    InvalidPhaseTransition {
        from: crate::launch::LaunchPhase,
        to: crate::launch::LaunchPhase,
    },

    /// Launch id not present in the registry.
    #[error("unknown launch: {0}")]
    UnknownLaunch(String),

    /// Host bridge protocol error.
    #[error("host bridge error: {0}")]
    Bridge(String),

    /// The host bridge connection went away.
    #[error("host bridge closed")]
    BridgeClosed,

    /// Internal lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration fragment was not valid JSON.
    #[error("configuration fragment is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience Result type for coordinated-launch operations.
pub type Result<T> = std::result::Result<T, LaunchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ConfigSide;

    #[test]
    fn test_configuration_missing_display() {
        let err = LaunchError::ConfigurationMissing("no configuration named 'A'".into());
        assert!(err.to_string().contains("missing"));
        assert!(err.to_string().contains("'A'"));
    }

    #[test]
    fn test_configuration_incomplete_names_side() {
        let err = LaunchError::ConfigurationIncomplete {
            side: ConfigSide::Interpreted,
            guidance: "set 'pythonLaunchName' or pick the 'default' mode".into(),
        };
        assert!(err.to_string().contains("python"));
        assert!(err.to_string().contains("pythonLaunchName"));

        let err = LaunchError::ConfigurationIncomplete {
            side: ConfigSide::Native,
            guidance: "set 'cppAttachName' or pick the 'default' mode".into(),
        };
        assert!(err.to_string().contains("cpp"));
    }

    #[test]
    fn test_environment_missing_display() {
        let err = LaunchError::EnvironmentMissing;
        assert!(err.to_string().contains("folder"));
    }

    #[test]
    fn test_introspection_failure_is_actionable() {
        let err = LaunchError::IntrospectionFailure;
        assert!(err.to_string().contains("open an issue"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LaunchError = io_err.into();
        assert!(matches!(err, LaunchError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: LaunchError = json_err.into();
        assert!(matches!(err, LaunchError::Json(_)));
    }
}
