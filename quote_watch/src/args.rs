//! Command-line arguments for the quote watcher.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::time::Duration;

use clap::{Parser, ValueEnum};
use quote_common::net::{DEFAULT_ENDPOINT, DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT};
use quote_common::tickers::Ticker;

/// How updates are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Coloured price line plus a sparkline.
    Text,
    /// One JSON object per update.
    Json,
}

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Ticker selected at start-up. Without it nothing is polled until a symbol is typed.
    #[clap(long, value_enum)]
    pub ticker: Option<Ticker>,

    /// Base URL of the quote service; the symbol is appended as the last path segment.
    #[clap(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Seconds to wait after one poll completes before issuing the next.
    #[clap(
        long,
        default_value_t = DEFAULT_POLL_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_secs: u64,

    /// Upper bound in seconds on a single quote request.
    #[clap(
        long,
        default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_timeout_secs: u64,

    /// Samples kept for the chart; 0 keeps everything.
    #[clap(long, default_value_t = 500)]
    pub max_samples: usize,

    /// Output format.
    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Args {
    /// Delay between polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// History retention limit, `None` for unbounded.
    pub fn history_limit(&self) -> Option<usize> {
        (self.max_samples > 0).then_some(self.max_samples)
    }
}
