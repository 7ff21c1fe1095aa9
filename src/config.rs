// src/config.rs
// =============================================================================
// Settings for a batch run and for the HTTP client the workers share.
//
// There is no config file: the CLI flags fill in a FetcherConfig, and
// library users can build one directly or start from Default.
// =============================================================================

use anyhow::{bail, Context, Result};
use reqwest::Client;
use std::time::Duration;

/// Number of workers when the caller does not choose one.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Per-request timeout when the caller does not choose one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Maximum number of requests in flight at once
    pub concurrency: usize,
    /// Applied to each request separately, not to the whole batch
    pub timeout: Duration,
    /// Sent as the User-Agent header on every request
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetcherConfig {
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            bail!("concurrency must be at least 1");
        }
        if self.timeout.is_zero() {
            bail!("timeout must be greater than zero");
        }
        Ok(())
    }

    /// Builds the client shared by every worker.
    ///
    /// Redirects follow reqwest's default policy. The timeout is also set
    /// on each request by the fetcher, so a client passed in from elsewhere
    /// gets the same bound.
    pub fn build_client(&self) -> Result<Client> {
        self.validate()?;
        Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .context("failed to create HTTP client")
    }
}
