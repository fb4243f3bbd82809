//! Error types raised by the automation engine.

/// A precondition for running (or continuing) a mode does not hold.
///
/// This is the only error kind the engine itself raises. It carries a
/// human-readable message for the driving application to display; the
/// enclosing task is aborted and never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModeError {
    #[error("{0}")]
    Precondition(String),
}

impl ModeError {
    pub fn precondition(message: impl Into<String>) -> Self {
        ModeError::Precondition(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            ModeError::Precondition(message) => message,
        }
    }
}

/// Why a scheduler run stopped without completing.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// The task (or an assertion it ran) reported a failed precondition.
    #[error(transparent)]
    Mode(#[from] ModeError),
    /// A collaborator (emulator backend) failed to advance or accept input.
    #[error("emulator backend failed: {0:#}")]
    Backend(anyhow::Error),
}
