//! Core types for provisioning runs

use serde::{Deserialize, Serialize};
use std::process::Output;

/// What the runner does when a step's effect fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Stop the plan and surface a `StepError`
    #[default]
    Abort,
    /// Record the failure and move on to the next step
    Continue,
}

/// Result of running a single step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// The effect ran; `message` is the step's completion message
    Performed { message: String },
    /// The precondition already held
    Skipped { reason: String },
    /// Dry run: the effect would have run
    WouldApply,
    /// The effect failed but the step allows the plan to continue
    Failed { error: String },
}

impl StepOutcome {
    /// Check if the outcome represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Check if the outcome represents a change on the system
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Performed { .. })
    }
}

/// A non-fatal step failure recorded in the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFailure {
    pub step: String,
    pub error: String,
}

/// Summary of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub performed: usize,
    pub skipped: usize,
    pub planned: usize,
    pub failures: Vec<StepFailure>,
}

impl RunSummary {
    /// Check if the run had no failures at all
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of steps processed
    pub fn total(&self) -> usize {
        self.performed + self.skipped + self.planned + self.failures.len()
    }

    /// Record the outcome of one step
    pub fn add_outcome(&mut self, step: &str, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::Performed { .. } => self.performed += 1,
            StepOutcome::Skipped { .. } => self.skipped += 1,
            StepOutcome::WouldApply => self.planned += 1,
            StepOutcome::Failed { error } => self.failures.push(StepFailure {
                step: step.to_string(),
                error: error.clone(),
            }),
        }
    }
}

/// Options for a run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Evaluate preconditions only; never run effects
    pub dry_run: bool,
}

/// Captured output of an external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

impl CommandOutput {
    /// A successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into().into_bytes(),
            stderr: Vec::new(),
        }
    }

    /// A failed output with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: Vec::new(),
            stderr: stderr.into().into_bytes(),
        }
    }

    /// Whether the command exited with status 0
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Get stdout as a string
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// Get stderr as a string
    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::default();
        summary.add_outcome(
            "a",
            &StepOutcome::Performed {
                message: "done".into(),
            },
        );
        summary.add_outcome(
            "b",
            &StepOutcome::Skipped {
                reason: "exists".into(),
            },
        );
        summary.add_outcome("c", &StepOutcome::WouldApply);
        summary.add_outcome(
            "d",
            &StepOutcome::Failed {
                error: "boom".into(),
            },
        );

        assert_eq!(summary.performed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.planned, 1);
        assert_eq!(summary.total(), 4);
        assert!(!summary.is_success());
        assert_eq!(summary.failures[0].step, "d");
    }

    #[test]
    fn test_command_output_helpers() {
        let ok = CommandOutput::ok("pip 24.0\n");
        assert!(ok.success());
        assert_eq!(ok.stdout_str(), "pip 24.0\n");

        let failed = CommandOutput::failed(2, "usage");
        assert!(!failed.success());
        assert_eq!(failed.stderr_str(), "usage");

        let killed = CommandOutput {
            code: None,
            ..CommandOutput::default()
        };
        assert!(!killed.success());
    }
}
