//! pip backend.
//!
//! The command prefix is configurable so `["python", "-m", "pip"]` works as
//! well as a bare `pip`.

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::types::InstalledPackage;
use provisioner::{CommandOutput, CommandRunner, command_line};

/// Backend that drives the `pip` CLI.
#[derive(Debug, Clone)]
pub struct PipBackend {
    command: Vec<String>,
}

impl PipBackend {
    /// Backend invoking `pip` from PATH.
    pub fn new() -> Self {
        Self {
            command: vec!["pip".to_string()],
        }
    }

    /// Backend invoking a custom command prefix.
    pub fn with_command(command: Vec<String>) -> Result<Self> {
        if command.first().is_none_or(|p| p.trim().is_empty()) {
            return Err(Error::Other("package manager command is empty".to_string()));
        }
        Ok(Self { command })
    }

    /// The command prefix.
    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// Run pip with `args` appended to the command prefix.
    fn run(&self, runner: &dyn CommandRunner, args: &[&str]) -> Result<(String, CommandOutput)> {
        let Some((program, prefix)) = self.command.split_first() else {
            return Err(Error::Other("package manager command is empty".to_string()));
        };
        let mut full: Vec<&str> = prefix.iter().map(String::as_str).collect();
        full.extend_from_slice(args);

        let line = command_line(program, &full);
        log::debug!("Running {}", line);

        // The runner only errors when the process could not be started.
        let output = runner
            .execute(program, &full)
            .map_err(|_| Error::ManagerNotFound {
                command: program.clone(),
            })?;
        Ok((line, output))
    }

    /// Run pip and check for success.
    fn run_checked(
        &self,
        runner: &dyn CommandRunner,
        args: &[&str],
        package_name: Option<&str>,
    ) -> Result<CommandOutput> {
        let (line, output) = self.run(runner, args)?;
        if !output.success() {
            return Err(Error::from_manager_output(
                &line,
                output.code,
                &output.stderr_str(),
                package_name,
            ));
        }
        Ok(output)
    }
}

impl Default for PipBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for PipBackend {
    fn name(&self) -> &str {
        "pip"
    }

    fn list_installed(&self, runner: &dyn CommandRunner) -> Result<Vec<InstalledPackage>> {
        let output = self.run_checked(runner, &["list", "--format=json"], None)?;
        parse_package_list(&output.stdout_str())
    }

    fn uninstall(&self, runner: &dyn CommandRunner, name: &str) -> Result<()> {
        self.run_checked(runner, &["uninstall", "-y", name], Some(name))?;
        Ok(())
    }
}

/// Parse `pip list --format=json` output.
///
/// Empty output means an empty environment.
fn parse_package_list(stdout: &str) -> Result<Vec<InstalledPackage>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(trimmed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use provisioner::MockRunner;

    const LISTING: &str = r#"[{"name": "pip", "version": "24.0"}, {"name": "requests", "version": "2.32.3"}, {"name": "six", "version": "1.16.0"}]"#;

    #[test]
    fn test_parse_package_list() {
        let packages = parse_package_list(LISTING).unwrap();
        let names: Vec<_> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["pip", "requests", "six"]);
        assert_eq!(packages[1].version, "2.32.3");
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_package_list("").unwrap().is_empty());
        assert!(parse_package_list("[]\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse_package_list("not json").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Parse);
    }

    #[test]
    fn test_list_installed_runs_pip() {
        let runner = MockRunner::new();
        runner.respond("pip list --format=json", CommandOutput::ok(LISTING));

        let packages = PipBackend::new().list_installed(&runner).unwrap();
        assert_eq!(packages.len(), 3);
        assert_eq!(runner.calls(), vec!["pip list --format=json"]);
    }

    #[test]
    fn test_custom_command_prefix() {
        let runner = MockRunner::new();
        let backend = PipBackend::with_command(vec![
            "python".to_string(),
            "-m".to_string(),
            "pip".to_string(),
        ])
        .unwrap();

        backend.uninstall(&runner, "six").unwrap();
        assert_eq!(runner.calls(), vec!["python -m pip uninstall -y six"]);
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(PipBackend::with_command(Vec::new()).is_err());
        assert!(PipBackend::with_command(vec![" ".to_string()]).is_err());
    }

    #[test]
    fn test_uninstall_failure() {
        let runner = MockRunner::new();
        runner.respond(
            "pip uninstall -y six",
            CommandOutput::failed(1, "ERROR: Permission denied: '/usr/lib/six.py'"),
        );

        let err = PipBackend::new().uninstall(&runner, "six").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Permission);
    }

    #[test]
    fn test_missing_pip() {
        let runner = MockRunner::new();
        runner.missing_program("pip");

        let err = PipBackend::new().list_installed(&runner).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ManagerNotFound);
    }
}
