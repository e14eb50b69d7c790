//! HTTP backend.
//!
//! Downloads archives with a blocking `ureq` agent. Redirects are followed
//! (GitHub release assets redirect to a CDN) and non-2xx responses are
//! errors.

use crate::backend::Backend;
use crate::error::{Error, Result};

/// Maximum download size (500 MB).
const MAX_BODY_SIZE: u64 = 500 * 1024 * 1024;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("fetchkit/", env!("CARGO_PKG_VERSION"));

/// HTTP backend.
///
/// # Example
///
/// ```no_run
/// use fetchkit::backend::http::HttpBackend;
/// use fetchkit::backend::Backend;
///
/// let backend = HttpBackend::new();
/// let bytes = backend.fetch("https://example.com/tool.zip").unwrap();
/// println!("Fetched {} bytes", bytes.len());
/// ```
pub struct HttpBackend {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// Upper bound on the body size.
    max_body_size: u64,
}

impl HttpBackend {
    /// Create a new HTTP backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            max_body_size: MAX_BODY_SIZE,
        }
    }

    /// Override the maximum body size.
    #[must_use]
    pub fn with_max_body_size(mut self, bytes: u64) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// Current maximum body size.
    #[must_use]
    pub fn max_body_size(&self) -> u64 {
        self.max_body_size
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for HttpBackend {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("GET {}", url);

        let mut response = self
            .agent
            .get(url)
            .header("Accept", "application/octet-stream")
            .header("User-Agent", USER_AGENT)
            .call()?;

        let bytes = response
            .body_mut()
            .with_config()
            .limit(self.max_body_size)
            .read_to_vec()
            .map_err(|e| Error::DownloadFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        log::debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit() {
        let backend = HttpBackend::default();
        assert_eq!(backend.max_body_size(), MAX_BODY_SIZE);
    }

    #[test]
    fn test_custom_limit() {
        let backend = HttpBackend::new().with_max_body_size(1024);
        assert_eq!(backend.max_body_size(), 1024);
    }

    #[test]
    fn test_user_agent_names_the_crate() {
        assert!(USER_AGENT.starts_with("fetchkit/"));
    }
}
