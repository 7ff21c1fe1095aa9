// src/logging.rs
// =============================================================================
// Sets up tracing for the binary.
//
// Logs go to stderr so that stdout carries nothing but results. RUST_LOG
// wins when it is set; otherwise the -v count picks the level for this crate.
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when RUST_LOG is not set.
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,http_md5=info",
        _ => "info,http_md5=debug",
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(verbosity: u8) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    tracing::debug!(verbosity, "logging initialized");
    Ok(())
}
