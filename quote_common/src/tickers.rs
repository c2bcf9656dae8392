//! Ticker symbols the watcher can select, and helpers for parsing a selection.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::ParserError;

/// Set of supported ticker symbols.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    EnumIter,
    Hash,
    Eq,
    PartialEq,
)]
#[clap(rename_all = "lower")]
#[strum(ascii_case_insensitive)]
pub enum Ticker {
    AAPL,
    MSFT,
    GOOGL,
    TSLA,
    NFLX,
}

impl Ticker {
    /// Company name shown next to the symbol.
    pub fn company(&self) -> &'static str {
        match self {
            Ticker::AAPL => "Apple",
            Ticker::MSFT => "Microsoft",
            Ticker::GOOGL => "Alphabet",
            Ticker::TSLA => "Tesla",
            Ticker::NFLX => "Netflix",
        }
    }
}

/// Trait providing selection parsing for user input.
pub trait SelectionParser {
    /// Parses a single line of user input into a selection.
    ///
    /// An empty line, `none` or `-` clears the selection. Any other value must be a
    /// known symbol (case-insensitive).
    fn parse_selection(input: &str) -> Result<Option<Ticker>, ParserError>;
}

impl SelectionParser for Ticker {
    fn parse_selection(input: &str) -> Result<Option<Self>, ParserError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == "-" || trimmed.eq_ignore_ascii_case("none") {
            return Ok(None);
        }

        trimmed
            .parse::<Self>()
            .map(Some)
            .map_err(|_| ParserError::TickerNotFound(trimmed.to_string()))
    }
}
