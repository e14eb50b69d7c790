//! Error types for download and extraction.
//!
//! Errors are categorized so callers can map them onto their own error
//! taxonomy and show appropriate user feedback.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for fetchkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of fetchkit errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The remote resource could not be fetched.
    Network,
    /// The archive is corrupt, unsupported or unsafe to unpack.
    Format,
    /// Permission denied while writing files.
    Permission,
    /// Other filesystem or unknown errors.
    Other,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Format => "Invalid archive",
            Self::Permission => "Permission denied",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check your internet connection and try again",
            Self::Format => "The downloaded file may be corrupted, delete it and try again",
            Self::Permission => "Check directory permissions or run with appropriate access",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while downloading or extracting.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP request failed: {message}")]
    HttpError {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// The response body could not be read.
    #[error("download failed for {url}: {message}")]
    DownloadFailed {
        /// URL being downloaded.
        url: String,
        /// Error message.
        message: String,
    },

    /// The archive format could not be determined.
    #[error("unsupported archive format: {0}")]
    UnsupportedFormat(PathBuf),

    /// The archive is corrupt or unreadable.
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),

    /// An entry would be written outside the destination directory.
    #[error("archive entry escapes destination: {0}")]
    UnsafeEntry(String),

    /// IO error during file operations.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path involved in the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::HttpError {
            message: message.into(),
            status,
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::HttpError { .. } => ErrorCategory::Network,
            Error::DownloadFailed { .. } => ErrorCategory::Network,
            Error::UnsupportedFormat(_) => ErrorCategory::Format,
            Error::ExtractionFailed(_) => ErrorCategory::Format,
            Error::UnsafeEntry(_) => ErrorCategory::Format,
            Error::Io { source, .. } => {
                if source.kind() == io::ErrorKind::PermissionDenied {
                    ErrorCategory::Permission
                } else {
                    ErrorCategory::Other
                }
            }
            Error::Other(_) => ErrorCategory::Other,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::HttpError {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
            other => Self::HttpError {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Self::ExtractionFailed(err.to_string())
    }
}
