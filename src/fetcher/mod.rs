// src/fetcher/mod.rs
// =============================================================================
// This module fetches many URLs concurrently and hashes each response body.
//
// Submodules:
// - batch:  the worker pool (BatchFetcher) and its result types
// - digest: MD5 + hex encoding of a body
// - error:  the error stored in a result when a fetch fails
//
// Only the public API is re-exported here, so callers write
// `fetcher::BatchFetcher` rather than `fetcher::batch::BatchFetcher`.
// =============================================================================

mod batch;
mod digest;
mod error;

#[cfg(test)]
mod test_server;

pub use batch::{BatchFetcher, FetchResult};
pub use digest::md5_hex;
pub use error::FetchError;
