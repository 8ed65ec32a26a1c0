//! Custom error types for `ogrkit` operations.
//!
//! The command builder itself never fails; errors come from the collaborators
//! around it. Running the external tool produces [`ExecutionError`]s, and
//! option or configuration parsing produces [`ConfigError`]s. Both carry
//! enough context (including the logging-safe command line) to diagnose the
//! failure without re-running anything.

use thiserror::Error;

/// Main error type for `ogrkit` operations.
///
/// This is the root error type that encompasses all domain-specific errors.
/// It uses `#[error(transparent)]` to delegate display formatting to the
/// underlying error variants.
#[derive(Debug, Error)]
pub enum OgrError {
    /// Launching or running the external tool failed
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic errors from dependencies
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors raised while running the external tool.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The process could not be started at all
    #[error("Failed to launch '{program}': {source}\n  command: {command}")]
    Spawn {
        /// The executable that was launched
        program: String,
        /// The logging-safe command line
        command: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The process ran but reported failure
    #[error("Command exited with {}: {stderr}\n  command: {command}", describe_status(*status))]
    NonZeroExit {
        /// Exit code, `None` if killed by a signal
        status: Option<i32>,
        /// The logging-safe command line
        command: String,
        /// Captured standard error
        stderr: String,
    },
}

/// Configuration errors.
///
/// These errors occur when options or configuration are invalid.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid option value
    #[error("Invalid option '{option}': {message}")]
    InvalidOption {
        /// The offending option text
        option: String,
        /// Why it's invalid
        message: String,
    },
}

/// Type alias for Results using `OgrError`.
pub type Result<T> = std::result::Result<T, OgrError>;

fn describe_status(status: Option<i32>) -> String {
    status.map_or_else(
        || "no exit code (terminated by signal)".to_string(),
        |code| format!("status {code}"),
    )
}

impl OgrError {
    /// Get a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Execution(e) => e.user_message(),
            Self::Config(e) => format!("Configuration error: {e}"),
            Self::Other(e) => format!("Error: {e}"),
        }
    }

    /// Get recovery suggestions if available.
    #[must_use]
    pub fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Execution(e) => e.recovery_suggestion(),
            Self::Config(ConfigError::InvalidOption { .. }) => {
                Some("Options are written as KEY=VALUE, e.g. SPATIAL_INDEX=YES.".to_string())
            },
            _ => None,
        }
    }

    /// Check if this error is potentially recoverable.
    ///
    /// Recoverable errors might be fixed by retrying with different
    /// parameters or after the user takes some action.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Execution(ExecutionError::Spawn { .. })
        )
    }
}

impl ExecutionError {
    fn user_message(&self) -> String {
        match self {
            Self::Spawn {
                program, command, ..
            } => {
                format!("Could not run '{program}'.\n\nCommand:\n  {command}")
            },
            Self::NonZeroExit {
                status,
                command,
                stderr,
            } => {
                let mut message = format!(
                    "ogr2ogr failed with {}.\n\nCommand:\n  {command}",
                    describe_status(*status)
                );
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    message.push_str("\n\nOutput:\n");
                    message.push_str(
                        &stderr
                            .lines()
                            .map(|l| format!("  {l}"))
                            .collect::<Vec<_>>()
                            .join("\n"),
                    );
                }
                message
            },
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound => Some(
                "Install GDAL or point OGR2OGR_PATH / --ogr2ogr-path at the ogr2ogr binary."
                    .to_string(),
            ),
            Self::Spawn { .. } => {
                Some("Check that the ogr2ogr binary is executable.".to_string())
            },
            Self::NonZeroExit { .. } => Some(
                "Check the input and output data sources, SRS codes and option names.".to_string(),
            ),
        }
    }
}
