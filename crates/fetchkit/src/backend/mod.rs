//! Backend traits and implementations for fetching archives.
//!
//! This module provides the [`Backend`] trait and implementations for
//! different sources. The primary implementation is [`http::HttpBackend`].
//!
//! # Testing
//!
//! Use [`MockBackend`] for testing without network access:
//!
//! ```
//! use fetchkit::backend::{Backend, MockBackend};
//!
//! let mock = MockBackend::new();
//! mock.add_asset("https://example.com/tool.zip", vec![1, 2, 3]);
//!
//! assert_eq!(mock.fetch("https://example.com/tool.zip").unwrap(), vec![1, 2, 3]);
//! assert_eq!(mock.request_count(), 1);
//! ```

pub mod http;

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Backend trait for fetching remote archives.
pub trait Backend: Send + Sync {
    /// Fetch the full body at `url`.
    ///
    /// # Errors
    ///
    /// Returns `Error::HttpError` for transport or status failures and
    /// `Error::DownloadFailed` if the body cannot be read.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Mock backend for testing without network access.
///
/// Clones share state, so a test can keep one handle while the client
/// owns another and still inspect the recorded requests.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    assets: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockBackend {
    /// Create a new empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `data` for `url`.
    pub fn add_asset(&self, url: impl Into<String>, data: Vec<u8>) {
        lock(&self.assets).insert(url.into(), data);
    }

    /// URLs requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }

    /// Number of fetches so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

impl Backend for MockBackend {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        lock(&self.requests).push(url.to_string());
        lock(&self.assets)
            .get(url)
            .cloned()
            .ok_or_else(|| Error::http("HTTP 404", Some(404)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_backend_serves_assets() {
        let mock = MockBackend::new();
        mock.add_asset("https://example.com/a.zip", vec![0x50, 0x4b]);

        assert_eq!(mock.fetch("https://example.com/a.zip").unwrap(), vec![0x50, 0x4b]);
        assert_eq!(mock.requests(), vec!["https://example.com/a.zip"]);
    }

    #[test]
    fn test_mock_backend_missing_asset() {
        let mock = MockBackend::new();
        let err = mock.fetch("https://example.com/missing.zip").unwrap_err();
        assert!(matches!(err, Error::HttpError { status: Some(404), .. }));
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_mock_backend_clones_share_state() {
        let mock = MockBackend::new();
        let handle = mock.clone();
        mock.add_asset("u", vec![1]);

        handle.fetch("u").unwrap();
        assert_eq!(mock.request_count(), 1);
    }
}
