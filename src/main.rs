// src/main.rs
// =============================================================================
// This is the entry point of the http-md5 binary.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr)
// 3. Fetch every URL through the BatchFetcher
// 4. Print one result per URL, in the order the URLs were given
// 5. Exit with proper code (0 = all hashed, 1 = some URLs failed, 2 = error)
//
// Rust concepts used:
// - async/await: The fetcher runs many requests concurrently on tokio
// - Result<T, E>: Application errors bubble up to main() with `?`
// - match: Pattern matching on each URL's outcome
// =============================================================================

// Module declarations - cli.rs belongs to the binary, the fetcher lives in
// the http_md5 library (src/lib.rs)
mod cli;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use cli::Cli;
use http_md5::{logging, BatchFetcher, FetchResult};

// The #[tokio::main] attribute builds a multi-threaded runtime and runs
// our async main inside it
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Unexpected error: print the whole context chain and exit with 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = every URL was hashed
//   Ok(1) = at least one URL failed
//   Err   = unexpected error (main turns it into exit code 2)
async fn run() -> Result<i32> {
    // Parse command-line arguments; clap handles --help and --version
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    // One client for the whole run, shared by every worker
    let config = cli.fetcher_config();
    let fetcher = BatchFetcher::from_config(&config)?;
    let urls = cli.normalized_urls();

    // Results come back in the same order as `urls`
    let results = fetcher.fetch_all(config.concurrency, &urls).await;

    print_results(&results, cli.json)?;

    if results.iter().any(|r| !r.is_ok()) {
        Ok(1)  // Exit code 1 = some URLs could not be hashed
    } else {
        Ok(0)  // Exit code 0 = all good
    }
}

// One row of --json output. Exactly one of md5/error is present.
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    md5: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> From<&'a FetchResult> for ReportRow<'a> {
    fn from(result: &'a FetchResult) -> Self {
        ReportRow {
            url: &result.url,
            md5: result.digest(),
            error: result.error().map(|e| e.to_string()),
        }
    }
}

// Prints the results either as plain lines or JSON
// Parameters:
//   results: one FetchResult per URL, already in input order
//   json: whether to output JSON format
fn print_results(results: &[FetchResult], json: bool) -> Result<()> {
    if json {
        let rows: Vec<ReportRow> = results.iter().map(ReportRow::from).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for result in results {
            println!("{}", format_line(result));
        }
    }
    Ok(())
}

// Formats one plain-text line: "<url> <md5>" or "<url> error: <message>"
fn format_line(result: &FetchResult) -> String {
    match &result.outcome {
        Ok(digest) => format!("{} {}", result.url, digest),
        Err(e) => format!("{} error: {}", result.url, e),
    }
}
