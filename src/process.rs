//! process
//!
//! External command invocation.
//!
//! # Design
//!
//! Every subprocess (git mutations, `npm version`, `npm install`) flows
//! through [`run`]: the command line is shown under a progress spinner,
//! output is captured, and a non-zero exit status is a typed failure that
//! carries the command line and its stderr. There are no retries; a
//! failed command fails the enclosing operation.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

use crate::ui::progress::with_progress_sync;

/// Errors from external command invocation.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The command could not be spawned at all.
    #[error("failed to run {command}: {source}")]
    Spawn {
        /// The rendered command line
        command: String,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// The command ran and exited with a non-zero status.
    #[error("{command} exited with {status}: {stderr}")]
    NonZeroExit {
        /// The rendered command line
        command: String,
        /// Exit status description
        status: String,
        /// Captured standard error, trimmed
        stderr: String,
    },
}

/// Captured output of a successful command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Standard output, UTF-8 lossy, trimmed of trailing whitespace
    pub stdout: String,
}

fn render(program: &str, args: &[&str]) -> String {
    format!("\"{} {}\"", program, args.join(" "))
}

/// Run `program` with `args` in `cwd`, failing on a non-zero exit.
pub fn run(program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput, ProcessError> {
    let command_line = render(program, args);

    with_progress_sync(
        &format!("Running {command_line}"),
        &format!("Failed to run {command_line}"),
        |progress| {
            let output = Command::new(program)
                .args(args)
                .current_dir(cwd)
                .output()
                .map_err(|source| ProcessError::Spawn {
                    command: command_line.clone(),
                    source,
                })?;

            if !output.status.success() {
                return Err(ProcessError::NonZeroExit {
                    command: command_line.clone(),
                    status: output.status.to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }

            progress.succeed(format!("Ran {command_line}"));
            Ok(CommandOutput {
                stdout: String::from_utf8_lossy(&output.stdout)
                    .trim_end()
                    .to_string(),
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_of_successful_command() {
        let output = run("git", &["--version"], Path::new(".")).unwrap();
        assert!(output.stdout.starts_with("git version"));
    }

    #[test]
    fn non_zero_exit_is_an_error() {
        let error = run("git", &["not-a-real-subcommand"], Path::new(".")).unwrap_err();
        match error {
            ProcessError::NonZeroExit { command, .. } => {
                assert!(command.contains("not-a-real-subcommand"));
            }
            other => panic!("expected NonZeroExit, got {other:?}"),
        }
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let error = run("shipwright-does-not-exist", &[], Path::new(".")).unwrap_err();
        assert!(matches!(error, ProcessError::Spawn { .. }));
    }
}
