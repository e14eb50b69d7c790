//! Error types for package manager operations.
//!
//! Errors are categorized from the manager's stderr so the user gets a hint
//! that matches what actually went wrong (missing tool, missing package,
//! permissions).

use thiserror::Error;

/// Categories of package manager errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The package manager itself is not installed
    ManagerNotFound,
    /// Package is not installed
    NotFound,
    /// Permission denied (system site-packages, locked files)
    Permission,
    /// Output could not be parsed
    Parse,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::ManagerNotFound => "Package manager not installed",
            Self::NotFound => "Package not installed",
            Self::Permission => "Permission denied",
            Self::Parse => "Unexpected package manager output",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::ManagerNotFound => "Install the package manager or set [purge].command",
            Self::NotFound => "No action needed - the package is already gone",
            Self::Permission => "Run from a virtual environment or with appropriate access",
            Self::Parse => "Upgrade the package manager and try again",
            Self::Other => "Check the error details for more information",
        }
    }
}

/// Errors that can occur while listing or removing packages.
#[derive(Debug, Error)]
pub enum Error {
    /// The package manager could not be started
    #[error("package manager not found: {command}")]
    ManagerNotFound {
        /// Command that could not be started
        command: String,
    },

    /// The package is not installed
    #[error("package not installed: {name}")]
    NotFound {
        /// Package name
        name: String,
    },

    /// Permission denied while removing files
    #[error("permission denied running `{command}`: {message}")]
    Permission {
        /// Command line that was run
        command: String,
        /// Exit code, if any
        code: Option<i32>,
        /// Details from the manager
        message: String,
    },

    /// The manager exited non-zero
    #[error("command `{command}` failed: {stderr}")]
    CommandFailed {
        /// Command line that was run
        command: String,
        /// Exit code, if any
        code: Option<i32>,
        /// Captured stderr
        stderr: String,
    },

    /// JSON parsing error
    #[error("cannot parse package list: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::ManagerNotFound { .. } => ErrorCategory::ManagerNotFound,
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::Permission { .. } => ErrorCategory::Permission,
            Error::Json(_) => ErrorCategory::Parse,
            _ => ErrorCategory::Other,
        }
    }

    /// Create an error from a failed manager invocation.
    ///
    /// Analyzes stderr to categorize the error appropriately.
    pub fn from_manager_output(
        command: &str,
        code: Option<i32>,
        stderr: &str,
        package_name: Option<&str>,
    ) -> Self {
        let stderr_lower = stderr.to_lowercase();

        if stderr_lower.contains("not installed") || stderr_lower.contains("skipping") {
            return Error::NotFound {
                name: package_name.unwrap_or("unknown").to_string(),
            };
        }

        if stderr_lower.contains("permission denied")
            || stderr_lower.contains("access is denied")
            || stderr_lower.contains("externally-managed-environment")
        {
            return Error::Permission {
                command: command.to_string(),
                code,
                message: stderr.trim().to_string(),
            };
        }

        Error::CommandFailed {
            command: command.to_string(),
            code,
            stderr: stderr.trim().to_string(),
        }
    }
}

/// Lift package manager failures into the step error taxonomy.
///
/// Every failed manager invocation is an external command failure.
impl From<Error> for provisioner::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::CommandFailed {
                command,
                code,
                stderr,
            } => provisioner::Error::command(command, code, stderr),
            Error::Permission {
                command,
                code,
                message,
            } => provisioner::Error::command(command, code, message),
            Error::ManagerNotFound { command } => {
                provisioner::Error::command(command, None, "program not found")
            }
            Error::NotFound { name } => provisioner::Error::command(
                format!("uninstall {name}"),
                None,
                "package not installed",
            ),
            Error::Json(e) => provisioner::Error::command("package list", None, e.to_string()),
            Error::Other(message) => provisioner::Error::Other(message),
        }
    }
}

/// Result type for package manager operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_manager_output_not_installed() {
        let err = Error::from_manager_output(
            "pip uninstall -y foo",
            Some(0),
            "WARNING: Skipping foo as it is not installed.",
            Some("foo"),
        );
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.to_string().contains("foo"));
    }

    #[test]
    fn test_from_manager_output_permission() {
        let err = Error::from_manager_output(
            "pip uninstall -y six",
            Some(1),
            "ERROR: Could not install packages due to an OSError: [Errno 13] Permission denied",
            Some("six"),
        );
        assert_eq!(err.category(), ErrorCategory::Permission);
    }

    #[test]
    fn test_from_manager_output_generic() {
        let err = Error::from_manager_output("pip list --format=json", Some(2), " boom \n", None);
        assert_eq!(err.category(), ErrorCategory::Other);
        assert_eq!(err.to_string(), "command `pip list --format=json` failed: boom");
    }

    #[test]
    fn test_into_step_error_keeps_command() {
        let err: provisioner::Error = Error::CommandFailed {
            command: "pip uninstall -y six".to_string(),
            code: Some(1),
            stderr: "boom".to_string(),
        }
        .into();
        assert_eq!(err.category(), provisioner::ErrorCategory::Command);
        assert!(err.to_string().contains("exit code 1"));
    }

    #[test]
    fn test_into_step_error_permission_is_command_failure() {
        let err: provisioner::Error = Error::from_manager_output(
            "pip uninstall -y six",
            Some(1),
            "ERROR: [Errno 13] Permission denied: '/usr/lib/python3/six.py'",
            Some("six"),
        )
        .into();
        assert_eq!(err.category(), provisioner::ErrorCategory::Command);
        let text = err.to_string();
        assert!(text.contains("pip uninstall -y six"));
        assert!(text.contains("exit code 1"));
        assert!(text.contains("Permission denied"));
    }

    #[test]
    fn test_into_step_error_not_found_is_command_failure() {
        let err: provisioner::Error = Error::NotFound {
            name: "six".to_string(),
        }
        .into();
        assert_eq!(err.category(), provisioner::ErrorCategory::Command);
        assert!(err.to_string().contains("six"));
    }

    #[test]
    fn test_into_step_error_manager_missing() {
        let err: provisioner::Error = Error::ManagerNotFound {
            command: "pip".to_string(),
        }
        .into();
        assert_eq!(err.category(), provisioner::ErrorCategory::Command);
    }
}
