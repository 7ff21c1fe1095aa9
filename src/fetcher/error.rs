// src/fetcher/error.rs
// =============================================================================
// The error stored in a FetchResult when a URL could not be hashed.
//
// Callers see a single failure kind per URL. DNS failures, refused
// connections, timeouts and broken bodies all arrive as `Request`; anyone who
// needs the finer detail can inspect the wrapped reqwest error.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The GET request or the body read failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The worker that owned this URL stopped before reporting a result.
    #[error("worker stopped before the request completed")]
    WorkerLost,
}

impl FetchError {
    /// True when the per-request timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Request(e) if e.is_timeout())
    }
}
