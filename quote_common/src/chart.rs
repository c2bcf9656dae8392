//! Chart series derived from the retained price history.
//!
//! A `ChartSeries` is the renderer-agnostic shape of the line chart: one point per
//! retained sample, keyed by its local time label.
use serde::Serialize;

use crate::quote::Quote;
use crate::tickers::Ticker;

/// Single point on the price line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Local wall-clock label of the sample.
    pub label: String,
    /// Sampled price.
    pub price: f64,
}

/// Line chart data for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Dataset label, e.g. `AAPL stock`.
    pub label: String,
    /// Points in chronological order.
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// Builds a series from samples of `ticker`, oldest first.
    pub fn from_quotes<'a, I>(ticker: Ticker, quotes: I) -> Self
    where
        I: IntoIterator<Item = &'a Quote>,
    {
        let points = quotes
            .into_iter()
            .map(|q| ChartPoint {
                label: q.time_label(),
                price: q.price,
            })
            .collect();
        Self {
            label: format!("{ticker} stock"),
            points,
        }
    }

    /// Lowest and highest price in the series, `None` when empty.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.price).fold(None, |acc, price| match acc {
            None => Some((price, price)),
            Some((lo, hi)) => Some((lo.min(price), hi.max(price))),
        })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
