//! Error types shared by the quote library and the watcher binary.
//!
//! The `ParserError` enum unifies failures from the HTTP transport, JSON decoding
//! of the upstream chart payload, user input parsing, and history bookkeeping,
//! allowing crates to propagate a single error type.
use std::io;

use thiserror::Error;

use crate::tickers::Ticker;

/// Unified error type shared across the workspace.
#[derive(Error, Debug)]
pub enum ParserError {
    /// I/O error originating from the standard library (stdin, terminal output).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Transport-level failure of the HTTP client (DNS, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The quote endpoint answered with a non-success status code.
    #[error("Quote endpoint returned HTTP {status} for {url}")]
    HttpStatus {
        /// Numeric status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// The upstream payload was well-formed JSON but carried no usable quote.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// User input could not be resolved to a known ticker symbol.
    #[error("Unknown ticker: {0}")]
    TickerNotFound(String),

    /// A quote arrived for a ticker other than the one the history is tracking.
    #[error("Quote for {got} does not match current selection {expected:?}")]
    TickerMismatch {
        /// Ticker the history currently tracks, if any.
        expected: Option<Ticker>,
        /// Ticker carried by the rejected quote.
        got: Ticker,
    },

    /// Installing the Ctrl+C handler failed.
    #[error("Signal handler error: {0}")]
    Signal(String),
}
