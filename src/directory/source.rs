//! Directory abstraction for application listing.
//!
//! The collector only needs "give me every application with its
//! credentials". This trait hides where that comes from, so the Graph
//! client and an in-memory fixture are interchangeable.

use super::Application;
use std::future::Future;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur while fetching the directory listing.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The HTTP client could not be built (e.g. a bad proxy URL).
    #[error("failed to build http client: {0}")]
    ClientBuild(String),
    /// Transport or response decoding failure.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The token endpoint answered with a non-success status.
    #[error("token endpoint returned {status}: {body}")]
    Token {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },
    /// The application listing answered with a non-success status.
    #[error("application listing returned {status}: {body}")]
    Listing {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },
    /// The whole fetch exceeded the configured timeout, in seconds.
    #[error("directory fetch timed out after {0}s")]
    Timeout(u64),
    /// The directory could not serve a listing.
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Trait for directory implementations.
pub trait DirectorySource: Send + Sync + 'static {
    /// Fetches every application with its secrets and certificates.
    fn applications(
        &self,
    ) -> impl Future<Output = Result<Vec<Application>, DirectoryError>> + Send;
}

/// In-memory directory returning a fixed listing.
///
/// Drives the collector and scrape server without a live tenant.
#[derive(Debug)]
pub struct StaticDirectory {
    listing: Mutex<Result<Vec<Application>, String>>,
}

impl StaticDirectory {
    /// A directory returning `applications` on every fetch.
    pub fn new(applications: Vec<Application>) -> Self {
        Self {
            listing: Mutex::new(Ok(applications)),
        }
    }

    /// A directory whose every fetch fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            listing: Mutex::new(Err(reason.into())),
        }
    }

    /// Replaces the listing returned by subsequent fetches.
    pub fn set_applications(&self, applications: Vec<Application>) {
        if let Ok(mut listing) = self.listing.lock() {
            *listing = Ok(applications);
        }
    }

    /// Makes subsequent fetches fail with `reason`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        if let Ok(mut listing) = self.listing.lock() {
            *listing = Err(reason.into());
        }
    }
}

impl DirectorySource for StaticDirectory {
    async fn applications(&self) -> Result<Vec<Application>, DirectoryError> {
        let listing = self
            .listing
            .lock()
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;
        listing.clone().map_err(DirectoryError::Unavailable)
    }
}
