//! Real process execution

use provisioner::{CommandOutput, CommandRunner, Error, Result, command_line};
use std::process::{Command, Stdio};

/// Runs programs with `std::process::Command`, capturing both streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        log::debug!("exec: {}", command_line(program, args));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::command(command_line(program, args), None, e.to_string()))?;

        log::trace!(
            "{} exited with {:?}",
            program,
            output.status.code()
        );
        Ok(CommandOutput::from(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provisioner::ErrorCategory;

    #[test]
    fn test_missing_program_is_command_error() {
        let err = SystemRunner
            .execute("provision-no-such-program-xyz", &["--version"])
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Command);
        assert!(err.to_string().contains("provision-no-such-program-xyz --version"));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_exit_code_and_output() {
        let output = SystemRunner
            .execute("sh", &["-c", "echo out; echo err >&2; exit 3"])
            .unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout_str().trim(), "out");
        assert_eq!(output.stderr_str().trim(), "err");
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_checked_maps_failure() {
        let err = SystemRunner.execute_checked("false", &[]).unwrap_err();
        assert!(matches!(
            err,
            Error::ExternalCommand { code: Some(1), .. }
        ));
    }
}
