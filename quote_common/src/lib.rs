//!
//! Common types and utilities for the quote watcher.
//!
//! This crate aggregates:
//! - `error` — unified error type `ParserError` used across the workspace.
//! - `result` — handy `Result<T, ParserError>` alias.
//! - `tickers` — the fixed set of selectable ticker symbols and selection parsing.
//! - `quote` — the `Quote` sample and decoding of the upstream chart payload.
//! - `history` — per-selection price history with direction/delta derivation.
//! - `chart` — chart series built from the retained history.
//! - `net` — quote service defaults and URL helpers.
#![warn(missing_docs)]
pub mod chart;
pub mod error;
pub mod history;
pub mod net;
pub mod quote;
pub mod result;
pub mod tickers;

pub use error::ParserError;
pub use history::{Direction, PriceHistory, Snapshot};
pub use quote::Quote;
pub use result::Result;
pub use tickers::Ticker;
