//! Running assembled command lines with `std::process`.

use std::process::{Command, Stdio};

use log::{info, warn};
use ogrkit_core_common::{CommandLine, ProcessOutput, ProcessRunner};

use crate::error::{ExecutionError, Result};

/// Runs commands as child processes and waits for them to finish.
///
/// Standard output and error are captured. A process that cannot be started
/// yields [`ExecutionError::Spawn`]; one that exits unsuccessfully yields
/// [`ExecutionError::NonZeroExit`] with its stderr. Both carry the
/// logging-safe rendering of the command, never the executed one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    type Output = Result<ProcessOutput>;

    fn run(&self, command: &CommandLine) -> Self::Output {
        let output = Command::new(command.program())
            .args(command.arguments())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ExecutionError::Spawn {
                program: command.program().to_string_lossy().into_owned(),
                command: command.to_string(),
                source,
            })?;

        let result = ProcessOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            warn!("Command failed ({:?}): {command}", result.status);
            return Err(ExecutionError::NonZeroExit {
                status: result.status,
                command: command.to_string(),
                stderr: result.stderr,
            }
            .into());
        }

        info!("Command finished: {command}");
        Ok(result)
    }
}
