// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Usage:
//   http-md5 [--parallel N] [--timeout SECS] [--json] [-v...] <URL>...
//
// URLs without a scheme (e.g. "google.com") are fetched over plain http.
//
// Rust concepts:
// - Derive macros: #[derive(Parser)] generates the parsing code for us
// - Value parsers: clap rejects --parallel 0 before our code ever runs
// - Iterators: map + collect to normalize the URL list in order
// =============================================================================

use clap::Parser;
use std::time::Duration;
use url::Url;

use http_md5::FetcherConfig;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "http-md5",
    version,
    about = "Fetch URLs in parallel and print the MD5 of each response body",
    long_about = "http-md5 downloads every URL given on the command line, using at most \
                  --parallel requests at a time, and prints the MD5 of each body in the \
                  order the URLs were given."
)]
pub struct Cli {
    /// URLs to fetch; "http://" is added when no scheme is given
    ///
    /// Positional and repeatable: http-md5 a.com b.com c.com
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Maximum number of requests in flight at once
    ///
    /// Creates the --parallel flag; the value must be at least 1
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub parallel: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Output results in JSON format instead of plain lines
    #[arg(long)]
    pub json: bool,

    /// Log more to stderr (-v info, -vv debug); RUST_LOG overrides this
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    // Turns the parsed flags into the library's FetcherConfig
    // (user agent and anything else not on the command line keep defaults)
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            concurrency: self.parallel as usize,
            timeout: Duration::from_secs(self.timeout),
            ..FetcherConfig::default()
        }
    }

    /// The URLs to fetch, in the order given, with a scheme added where missing.
    pub fn normalized_urls(&self) -> Vec<String> {
        self.urls.iter().map(|u| normalize_url(u)).collect()
    }
}

// Adds "http://" to arguments that are not already absolute URLs.
// Anything that already names a scheme is passed through untouched; an
// unsupported scheme then shows up as an error for that URL only.
fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();
    match Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => raw.to_string(),
        _ if raw.contains("://") => raw.to_string(),
        _ => format!("http://{}", raw),
    }
}
