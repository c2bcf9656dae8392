//! In-memory price history for the selected ticker.
//!
//! `PriceHistory` keeps the samples observed since the current selection was made
//! and derives the values the view renders from the last two of them:
//!
//! - `PriceHistory::direction()` — `Up` if the latest price is above the previous one,
//!   `Down` if below, `Flat` if equal or fewer than two samples exist.
//! - `PriceHistory::delta()` — latest minus previous price, `None` with fewer than two
//!   samples.
//! - `PriceHistory::series()` — chart series across every retained sample.
//!
//! Only quotes for the tracked ticker are accepted; `reset` switches the tracked
//! ticker and drops all samples.

use std::collections::VecDeque;

use serde::Serialize;

use crate::chart::ChartSeries;
use crate::error::ParserError;
use crate::quote::{Quote, to_cents};
use crate::tickers::Ticker;

/// Price movement between the two most recent samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Latest price above the previous one.
    Up,
    /// Latest price below the previous one.
    Down,
    /// Unchanged, or not enough samples to compare.
    Flat,
}

impl Direction {
    /// Colour class of the indicator. Neutral is the empty string.
    pub fn color(&self) -> &'static str {
        match self {
            Direction::Up => "green",
            Direction::Down => "red",
            Direction::Flat => "",
        }
    }
}

/// Values rendered for the most recent sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Latest sample.
    pub latest: Quote,
    /// Movement relative to the previous sample.
    pub direction: Direction,
    /// Latest minus previous price.
    pub delta: Option<f64>,
}

impl Snapshot {
    /// Delta as shown next to the price: `(5.50)`, `(-3.20)`, `(0.00)` when undefined.
    pub fn delta_label(&self) -> String {
        format!("({:.2})", self.delta.unwrap_or(0.0))
    }
}

/// Ordered samples for the currently selected ticker.
#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    ticker: Option<Ticker>,
    samples: VecDeque<Quote>,
    /// Maximum retained samples; `None` keeps everything.
    limit: Option<usize>,
}

impl PriceHistory {
    /// Create an empty history with an optional retention limit.
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            ticker: None,
            samples: VecDeque::new(),
            limit: limit.filter(|l| *l > 0),
        }
    }

    /// Track `ticker` from now on, dropping every retained sample.
    pub fn reset(&mut self, ticker: Option<Ticker>) {
        self.ticker = ticker;
        self.samples.clear();
    }

    /// Ticker currently tracked.
    pub fn ticker(&self) -> Option<Ticker> {
        self.ticker
    }

    /// Append a sample of the tracked ticker.
    ///
    /// Quotes for any other ticker are rejected with `ParserError::TickerMismatch`
    /// and leave the history untouched.
    pub fn record(&mut self, quote: Quote) -> Result<Snapshot, ParserError> {
        if self.ticker != Some(quote.ticker) {
            return Err(ParserError::TickerMismatch {
                expected: self.ticker,
                got: quote.ticker,
            });
        }

        if let Some(limit) = self.limit {
            while self.samples.len() >= limit {
                self.samples.pop_front();
            }
        }
        self.samples.push_back(quote.clone());

        Ok(Snapshot {
            latest: quote,
            direction: self.direction(),
            delta: self.delta(),
        })
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<&Quote> {
        self.samples.back()
    }

    /// Sample before the most recent one.
    pub fn previous(&self) -> Option<&Quote> {
        self.samples.iter().rev().nth(1)
    }

    /// Direction of the last move.
    pub fn direction(&self) -> Direction {
        match self.delta_cents() {
            Some(cents) if cents > 0 => Direction::Up,
            Some(cents) if cents < 0 => Direction::Down,
            _ => Direction::Flat,
        }
    }

    /// Latest minus previous price, both taken at cent precision.
    pub fn delta(&self) -> Option<f64> {
        self.delta_cents().map(|cents| cents as f64 / 100.0)
    }

    fn delta_cents(&self) -> Option<i64> {
        match (self.latest(), self.previous()) {
            (Some(latest), Some(prev)) => Some(to_cents(latest.price) - to_cents(prev.price)),
            _ => None,
        }
    }

    /// Chart series over all retained samples; `None` when nothing is tracked.
    pub fn series(&self) -> Option<ChartSeries> {
        self.ticker
            .map(|ticker| ChartSeries::from_quotes(ticker, &self.samples))
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if no sample is retained.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
