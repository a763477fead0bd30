//! CLI-specific error types and exit code mapping

use golden_core::error::{GoldenError, ScenarioError};
use golden_state::StateError;
use golden_workload::EmitterError;

/// CLI-specific error type.
///
/// `exit_code()` maps each variant to the process exit status.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Domain error from one of the golden crates.
    #[error("{0}")]
    Core(#[from] GoldenError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                 |
    /// |------|-------------------------|
    /// | 0    | Success                 |
    /// | 1    | General / command error |
    /// | 2    | Configuration error     |
    /// | 10   | IO error                |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(GoldenError::Config(_)) => 2,
            Self::Io(_) | Self::Core(GoldenError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<ScenarioError> for CliError {
    fn from(e: ScenarioError) -> Self {
        Self::Core(e.into())
    }
}

impl From<StateError> for CliError {
    fn from(e: StateError) -> Self {
        Self::Core(e.into())
    }
}

impl From<EmitterError> for CliError {
    fn from(e: EmitterError) -> Self {
        Self::Core(e.into())
    }
}
