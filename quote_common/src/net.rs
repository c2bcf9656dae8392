//! Quote service endpoint defaults and URL helpers.
use std::time::Duration;

use crate::tickers::Ticker;

/// Public quote service polled by default.
pub const DEFAULT_ENDPOINT: &str = "https://yahoo-finance-api.vercel.app";
/// Delay between the end of one poll and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
/// Upper bound on a single quote request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// User agent sent with quote requests.
pub const USER_AGENT: &str = concat!("quote_watch/", env!("CARGO_PKG_VERSION"));

/// Helper to build the quote URL for `ticker`, like "https://host/AAPL".
pub fn quote_url(endpoint: &str, ticker: Ticker) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), ticker)
}
