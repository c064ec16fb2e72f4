//! Coordinated-launch phase machine.

/// Lifecycle phase of one coordinated launch.
///
/// The happy path is a straight line from `Idle` to `Resumed`; any
/// non-terminal phase may fall into `Aborted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchPhase {
    /// Nothing has happened yet.
    #[default]
    Idle,
    /// Both configurations resolved.
    ConfigResolved,
    /// The python session start was requested.
    InterpretedStarting,
    /// The python session is running, paused at entry.
    InterpretedRunning,
    /// The python process id was discovered.
    PidDiscovered,
    /// The C++ session start was requested.
    NativeStarting,
    /// Both sessions are underway.
    Paired,
    /// Terminal success: the target was resumed (or left paused on
    /// purpose).
    Resumed,
    /// Terminal failure.
    Aborted,
}

impl LaunchPhase {
    /// Check if transition to the target phase is valid.
    ///
    /// Valid transitions are the successive steps of the pipeline, plus
    /// `Aborted` from any non-terminal phase.
    pub fn can_transition_to(&self, target: LaunchPhase) -> bool {
        use LaunchPhase::*;
        if target == Aborted {
            return !self.is_terminal();
        }
        matches!(
            (*self, target),
            (Idle, ConfigResolved)
                | (ConfigResolved, InterpretedStarting)
                | (InterpretedStarting, InterpretedRunning)
                | (InterpretedRunning, PidDiscovered)
                | (PidDiscovered, NativeStarting)
                | (NativeStarting, Paired)
                | (Paired, Resumed)
        )
    }

    /// Attempt to transition to a new phase.
    pub fn transition_to(&mut self, target: LaunchPhase) -> crate::Result<()> {
        if self.can_transition_to(target) {
            *self = target;
            Ok(())
        } else {
            Err(crate::error::LaunchError::InvalidPhaseTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Check if this is a terminal phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LaunchPhase::Resumed | LaunchPhase::Aborted)
    }

    /// Check if both sessions are underway in this phase.
    pub fn is_paired(&self) -> bool {
        matches!(self, LaunchPhase::Paired | LaunchPhase::Resumed)
    }
}

impl std::fmt::Display for LaunchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::ConfigResolved => "config-resolved",
            Self::InterpretedStarting => "interpreted-starting",
            Self::InterpretedRunning => "interpreted-running",
            Self::PidDiscovered => "pid-discovered",
            Self::NativeStarting => "native-starting",
            Self::Paired => "paired",
            Self::Resumed => "resumed",
            Self::Aborted => "aborted",
        };
        write!(f, "{}", label)
    }
}
