//! Error types for provisioning steps.
//!
//! Every failure a step can hit falls into one of five kinds: network,
//! extraction, filesystem, environment update, or external command. All of
//! them are fatal for the plan unless the step opts into
//! [`FailurePolicy::Continue`](crate::types::FailurePolicy::Continue).

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for step operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of provisioning errors for user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Archive fetch failed.
    Network,
    /// Archive corrupt or unreadable.
    Extraction,
    /// Directory creation or write failure.
    Filesystem,
    /// Environment variable store could not be read or written.
    Environment,
    /// An external command exited non-zero or could not be started.
    Command,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Extraction => "Archive could not be extracted",
            Self::Filesystem => "Filesystem error",
            Self::Environment => "Environment update failed",
            Self::Command => "External command failed",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check your internet connection and the download URL, then run again",
            Self::Extraction => {
                "Delete the downloaded archive so the next run fetches a fresh copy"
            }
            Self::Filesystem => "Check directory permissions and free disk space",
            Self::Environment => "Check that the user environment can be modified",
            Self::Command => "Run the command by hand to see its full output",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors raised by step preconditions and effects.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Fetching a remote resource failed.
    #[error("network error fetching {url}: {message}")]
    Network {
        /// URL being fetched.
        url: String,
        /// Error message.
        message: String,
    },

    /// An archive was corrupt or unreadable.
    #[error("cannot extract {archive}: {message}")]
    Extraction {
        /// Archive path.
        archive: PathBuf,
        /// Error message.
        message: String,
    },

    /// IO error during file operations.
    #[error("IO error at {path}: {source}")]
    Filesystem {
        /// Path involved in the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The environment variable store rejected a read or write.
    #[error("cannot update environment variable {name}: {message}")]
    EnvironmentUpdate {
        /// Variable name.
        name: String,
        /// Error message.
        message: String,
    },

    /// An external command failed.
    #[error("command `{command}` failed{}: {stderr}", exit_suffix(.code))]
    ExternalCommand {
        /// Command line that was run.
        command: String,
        /// Exit code, if the process ran to completion.
        code: Option<i32>,
        /// Captured stderr (or a spawn error message).
        stderr: String,
    },

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

fn exit_suffix(code: &Option<i32>) -> String {
    code.map(|c| format!(" with exit code {c}")).unwrap_or_default()
}

impl Error {
    /// Create a filesystem error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Create a network error.
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an environment update error.
    pub fn environment(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EnvironmentUpdate {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an external command error.
    pub fn command(command: impl Into<String>, code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::ExternalCommand {
            command: command.into(),
            code,
            stderr: stderr.into(),
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Network { .. } => ErrorCategory::Network,
            Error::Extraction { .. } => ErrorCategory::Extraction,
            Error::Filesystem { .. } => ErrorCategory::Filesystem,
            Error::EnvironmentUpdate { .. } => ErrorCategory::Environment,
            Error::ExternalCommand { .. } => ErrorCategory::Command,
            Error::Other(_) => ErrorCategory::Other,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Filesystem {
            path: PathBuf::new(),
            source: err,
        }
    }
}

/// A fatal step failure: the plan stopped at `step`.
#[derive(Debug, thiserror::Error)]
#[error("step '{step}' failed: {cause}")]
pub struct StepError {
    /// Name of the step that failed.
    pub step: String,
    /// What went wrong.
    #[source]
    pub cause: Error,
}

impl StepError {
    /// Wrap an error with the name of the failing step.
    pub fn new(step: impl Into<String>, cause: Error) -> Self {
        Self {
            step: step.into(),
            cause,
        }
    }

    /// Category of the underlying cause.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        self.cause.category()
    }
}
