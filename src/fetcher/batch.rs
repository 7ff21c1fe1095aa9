// src/fetcher/batch.rs
// =============================================================================
// This module downloads a list of URLs with a fixed number of workers and
// returns the MD5 of every response body, in the same order as the input.
//
// How it works:
// 1. Every URL becomes a FetchJob tagged with its position in the input
// 2. The jobs go into one shared queue
// 3. min(concurrency, number of URLs) worker tasks pull jobs until the
//    queue is empty, issuing one GET per job
// 4. Each worker reports (index, result) back over a channel
// 5. The caller's task writes each result into the slot reserved for its
//    index, so completion order never leaks into the output
//
// Failures stay inside their own slot. A refused connection or a timeout
// on one URL never stops the other workers or the batch.
// =============================================================================

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use reqwest::Client;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::digest::md5_hex;
use super::error::FetchError;
use crate::config::FetcherConfig;

type JobQueue = Arc<Mutex<VecDeque<FetchJob>>>;

// One URL to fetch, remembering where its result belongs
#[derive(Debug)]
struct FetchJob {
    index: usize,
    url: String,
}

/// Outcome of fetching one URL.
///
/// `outcome` holds either the lowercase hex MD5 of the body or the error
/// that prevented reading it, never both.
#[derive(Debug)]
pub struct FetchResult {
    /// The URL exactly as the caller passed it in
    pub url: String,
    pub outcome: Result<String, FetchError>,
}

impl FetchResult {
    fn new(url: String, outcome: Result<String, FetchError>) -> Self {
        Self { url, outcome }
    }

    /// The body digest, if the fetch succeeded.
    pub fn digest(&self) -> Option<&str> {
        self.outcome.as_ref().ok().map(String::as_str)
    }

    /// The failure, if the fetch did not succeed.
    pub fn error(&self) -> Option<&FetchError> {
        self.outcome.as_ref().err()
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Fetches batches of URLs over a shared HTTP client.
///
/// The fetcher keeps nothing between batches. Cloning it is cheap (the
/// reqwest client is reference counted), and clones share one connection
/// pool.
#[derive(Debug, Clone)]
pub struct BatchFetcher {
    client: Client,
    timeout: Duration,
}

impl BatchFetcher {
    /// Wraps an existing client. `timeout` is applied to every request on
    /// its own, from connecting until the body has been read.
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Builds the HTTP client described by `config` and wraps it.
    pub fn from_config(config: &FetcherConfig) -> Result<Self> {
        let client = config.build_client()?;
        Ok(Self::new(client, config.timeout))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetches every URL and returns one result per URL, in input order.
    ///
    /// At most `concurrency` requests are in flight at once (a value of 0
    /// is treated as 1). Duplicate URLs are fetched once per occurrence.
    /// The returned future resolves only after every URL has a result.
    pub async fn fetch_all(&self, concurrency: usize, urls: &[String]) -> Vec<FetchResult> {
        if urls.is_empty() {
            return Vec::new();
        }

        if concurrency == 0 {
            debug!("concurrency of 0 requested, using 1");
        }
        let worker_count = concurrency.max(1).min(urls.len());
        let started = Instant::now();
        info!(urls = urls.len(), workers = worker_count, "starting batch");

        let queue: JobQueue = Arc::new(Mutex::new(
            urls.iter()
                .enumerate()
                .map(|(index, url)| FetchJob {
                    index,
                    url: url.clone(),
                })
                .collect(),
        ));

        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let mut workers = JoinSet::new();
        for worker in 0..worker_count {
            workers.spawn(run_worker(
                worker,
                self.client.clone(),
                self.timeout,
                Arc::clone(&queue),
                results_tx.clone(),
            ));
        }
        // Only the workers hold senders now, so the channel closes once the
        // last of them is done.
        drop(results_tx);

        let results = collect_results(urls, results_rx, workers).await;

        let failed = results.iter().filter(|r| !r.is_ok()).count();
        info!(
            succeeded = results.len() - failed,
            failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "batch finished"
        );

        results
    }
}

// Fan-in: writes each reported result into the slot of its input index,
// waits for every worker, then fills any slot a dead worker left behind
async fn collect_results(
    urls: &[String],
    mut results_rx: mpsc::UnboundedReceiver<(usize, FetchResult)>,
    mut workers: JoinSet<()>,
) -> Vec<FetchResult> {
    // One slot per input position, each filled exactly once
    let mut slots: Vec<Option<FetchResult>> = urls.iter().map(|_| None).collect();
    while let Some((index, result)) = results_rx.recv().await {
        slots[index] = Some(result);
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "fetch worker terminated abnormally");
        }
    }

    slots
        .into_iter()
        .zip(urls)
        .map(|(slot, url)| {
            slot.unwrap_or_else(|| FetchResult::new(url.clone(), Err(FetchError::WorkerLost)))
        })
        .collect()
}

// Pulls jobs until the queue is empty, sending each result to the collector
async fn run_worker(
    worker: usize,
    client: Client,
    timeout: Duration,
    queue: JobQueue,
    results: mpsc::UnboundedSender<(usize, FetchResult)>,
) {
    let mut handled = 0usize;

    while let Some(job) = next_job(&queue) {
        let started = Instant::now();
        let outcome = fetch_digest(&client, &job.url, timeout).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(digest) => {
                debug!(worker, index = job.index, url = %job.url, %digest, elapsed_ms, "fetched")
            }
            Err(e) => {
                warn!(worker, index = job.index, url = %job.url, error = %e, elapsed_ms, "fetch failed")
            }
        }

        if results
            .send((job.index, FetchResult::new(job.url, outcome)))
            .is_err()
        {
            // Collector is gone, nobody will read further results
            break;
        }
        handled += 1;
    }

    debug!(worker, handled, "worker finished");
}

// The lock is only held for the pop, never across a request
fn next_job(queue: &Mutex<VecDeque<FetchJob>>) -> Option<FetchJob> {
    let mut jobs = match queue.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    jobs.pop_front()
}

// One GET, body read in full, hashed whatever the status code
async fn fetch_digest(client: &Client, url: &str, timeout: Duration) -> Result<String, FetchError> {
    let response = client.get(url).timeout(timeout).send().await?;
    let body = response.bytes().await?;
    Ok(md5_hex(&body))
}
