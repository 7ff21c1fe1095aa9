// src/lib.rs
// =============================================================================
// Library root for http-md5.
//
// The binary in src/main.rs is a thin layer on top of this library:
// - fetcher: the bounded worker pool that downloads URLs and hashes bodies
// - config:  settings for the fetcher and the HTTP client it uses
// - logging: tracing subscriber setup
// =============================================================================

pub mod config;
pub mod fetcher;
pub mod logging;

pub use config::FetcherConfig;
pub use fetcher::{md5_hex, BatchFetcher, FetchError, FetchResult};
