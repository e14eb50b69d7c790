//! Step context and capability traits
//!
//! Steps never touch process-global state directly. The environment
//! variable store and the external command runner are injected through
//! [`StepContext`], so a plan can run against in-memory fakes in tests.

use crate::error::{Error, Result};
use crate::types::{CommandOutput, RunOptions, RunSummary, StepOutcome};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Store for PATH-like environment variables
///
/// Implementations decide the scope (user registry, profile file,
/// in-memory map). Reads of unset variables return `Ok(None)`.
pub trait EnvironmentStore {
    /// Read a variable
    fn get(&self, name: &str) -> Result<Option<String>>;

    /// Write a variable, replacing any previous value
    fn set(&mut self, name: &str, value: &str) -> Result<()>;
}

/// Capability for invoking external programs
///
/// `execute` only fails when the process cannot be started at all; a
/// non-zero exit is reported through [`CommandOutput::code`].
pub trait CommandRunner: Send + Sync {
    /// Run a program and capture its exit code, stdout and stderr
    fn execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Run a program and turn a non-zero exit into an error
    fn execute_checked(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = self.execute(program, args)?;
        if !output.success() {
            return Err(Error::command(
                command_line(program, args),
                output.code,
                output.stderr_str().trim(),
            ));
        }
        Ok(output)
    }
}

/// Render a program and its arguments for messages
pub fn command_line(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Progress callback for plan execution
///
/// Implement this trait to render the per-step status lines.
pub trait ProgressCallback {
    /// Called once before the first step
    fn on_plan_start(&mut self, plan: &str, steps: usize);

    /// Called when a plan has no steps at all
    fn on_empty_plan(&mut self, plan: &str);

    /// Called before a step's precondition is evaluated (`index` starts at 1)
    fn on_step_start(&mut self, index: usize, total: usize, name: &str, description: &str);

    /// Called when a step finishes without a fatal error
    fn on_step_complete(&mut self, name: &str, outcome: &StepOutcome);

    /// Called when a step fails fatally, just before the run aborts
    fn on_step_error(&mut self, name: &str, error: &Error);

    /// Called after the last step
    fn on_plan_complete(&mut self, plan: &str, summary: &RunSummary);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_plan_start(&mut self, _plan: &str, _steps: usize) {}
    fn on_empty_plan(&mut self, _plan: &str) {}
    fn on_step_start(&mut self, _index: usize, _total: usize, _name: &str, _description: &str) {}
    fn on_step_complete(&mut self, _name: &str, _outcome: &StepOutcome) {}
    fn on_step_error(&mut self, _name: &str, _error: &Error) {}
    fn on_plan_complete(&mut self, _plan: &str, _summary: &RunSummary) {}
}

/// Context passed to step preconditions and effects
pub struct StepContext<'a> {
    /// Whether this is a dry run (no effects)
    pub dry_run: bool,
    env: &'a mut dyn EnvironmentStore,
    runner: &'a dyn CommandRunner,
}

impl<'a> StepContext<'a> {
    /// Create a context with default options
    pub fn new(env: &'a mut dyn EnvironmentStore, runner: &'a dyn CommandRunner) -> Self {
        Self::with_options(env, runner, &RunOptions::default())
    }

    /// Create a context with explicit run options
    pub fn with_options(
        env: &'a mut dyn EnvironmentStore,
        runner: &'a dyn CommandRunner,
        opts: &RunOptions,
    ) -> Self {
        Self {
            dry_run: opts.dry_run,
            env,
            runner,
        }
    }

    /// The environment variable store
    pub fn env(&self) -> &dyn EnvironmentStore {
        &*self.env
    }

    /// The environment variable store, for writes
    pub fn env_mut(&mut self) -> &mut dyn EnvironmentStore {
        &mut *self.env
    }

    /// The external command runner
    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// In-memory fakes
// =============================================================================

/// In-memory environment store for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryEnvironment {
    vars: HashMap<String, String>,
    writes: usize,
}

impl MemoryEnvironment {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one variable preset
    pub fn with_var(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut env = Self::new();
        env.vars.insert(name.into(), value.into());
        env
    }

    /// Number of `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl EnvironmentStore for MemoryEnvironment {
    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.vars.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        self.vars.insert(name.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Mock command runner
///
/// Returns scripted outputs keyed by the full command line and records
/// every invocation. Unscripted commands succeed with empty output.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: Mutex<HashMap<String, CommandOutput>>,
    missing: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockRunner {
    /// Create a runner where every command succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the output for a command line such as `"pip list --format=json"`
    pub fn respond(&self, command: impl Into<String>, output: CommandOutput) {
        lock(&self.responses).insert(command.into(), output);
    }

    /// Make a program fail to start, as if it were not installed
    pub fn missing_program(&self, program: impl Into<String>) {
        lock(&self.missing).push(program.into());
    }

    /// All command lines executed so far, in order
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    /// Command lines starting with `prefix`
    pub fn calls_matching(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }
}

impl CommandRunner for MockRunner {
    fn execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let line = command_line(program, args);
        lock(&self.calls).push(line.clone());

        if lock(&self.missing).iter().any(|p| p == program) {
            return Err(Error::command(line, None, "program not found"));
        }

        Ok(lock(&self.responses)
            .get(&line)
            .cloned()
            .unwrap_or_else(|| CommandOutput::ok("")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_environment() {
        let mut env = MemoryEnvironment::with_var("PATH", "/usr/bin");
        assert_eq!(env.get("PATH").unwrap().as_deref(), Some("/usr/bin"));
        assert_eq!(env.get("HOME").unwrap(), None);

        env.set("PATH", "/usr/bin:/opt/bin").unwrap();
        assert_eq!(env.get("PATH").unwrap().as_deref(), Some("/usr/bin:/opt/bin"));
        assert_eq!(env.writes(), 1);
    }

    #[test]
    fn test_mock_runner_scripted_and_default() {
        let runner = MockRunner::new();
        runner.respond("pip --version", CommandOutput::ok("pip 24.0"));

        let scripted = runner.execute("pip", &["--version"]).unwrap();
        assert_eq!(scripted.stdout_str(), "pip 24.0");

        let default = runner.execute("true", &[]).unwrap();
        assert!(default.success());

        assert_eq!(runner.calls(), vec!["pip --version", "true"]);
        assert_eq!(runner.calls_matching("pip"), vec!["pip --version"]);
    }

    #[test]
    fn test_mock_runner_missing_program() {
        let runner = MockRunner::new();
        runner.missing_program("pdftoppm");

        let err = runner.execute("pdftoppm", &["-v"]).unwrap_err();
        assert!(matches!(err, Error::ExternalCommand { code: None, .. }));
    }

    #[test]
    fn test_execute_checked_non_zero() {
        let runner = MockRunner::new();
        runner.respond("pip uninstall -y six", CommandOutput::failed(1, "not installed\n"));

        let err = runner
            .execute_checked("pip", &["uninstall", "-y", "six"])
            .unwrap_err();
        match err {
            Error::ExternalCommand {
                command,
                code,
                stderr,
            } => {
                assert_eq!(command, "pip uninstall -y six");
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "not installed");
            }
            other => panic!("Expected ExternalCommand, got {other:?}"),
        }
    }

    #[test]
    fn test_command_line() {
        assert_eq!(command_line("pip", &[]), "pip");
        assert_eq!(command_line("pip", &["list", "-v"]), "pip list -v");
    }
}
