//! Quote data model and decoding of the upstream chart payload.
//!
//! The quote service answers `GET <endpoint>/<TICKER>` with a Yahoo-style chart
//! document; only `chart.result[0].meta.regularMarketPrice` and
//! `regularMarketTime` (unix seconds) are read.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParserError;
use crate::tickers::Ticker;

/// One observed price sample for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Instrument the sample belongs to.
    pub ticker: Ticker,
    /// Regular market price.
    pub price: f64,
    /// Market time reported by the quote service.
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: f64,
    regular_market_time: i64,
}

/// Round a price to whole cents, the precision prices are displayed and compared at.
pub fn round_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

/// Price as an integer number of cents.
pub(crate) fn to_cents(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

impl Quote {
    /// Creates a quote from its parts.
    pub fn new(ticker: Ticker, price: f64, observed_at: DateTime<Utc>) -> Self {
        Self {
            ticker,
            price,
            observed_at,
        }
    }

    /// Decode a chart response body into a `Quote` for `ticker`.
    pub fn from_chart_json(ticker: Ticker, body: &[u8]) -> Result<Quote, ParserError> {
        let envelope: ChartEnvelope = serde_json::from_slice(body)?;
        let meta = envelope
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .map(|result| result.meta)
            .ok_or_else(|| ParserError::MissingData(format!("no chart result for {ticker}")))?;

        if !meta.regular_market_price.is_finite() {
            return Err(ParserError::Format(format!(
                "non-finite price for {ticker}: {}",
                meta.regular_market_price
            )));
        }
        let observed_at = DateTime::from_timestamp(meta.regular_market_time, 0).ok_or_else(|| {
            ParserError::Format(format!(
                "market time out of range for {ticker}: {}",
                meta.regular_market_time
            ))
        })?;

        Ok(Quote::new(ticker, round_cents(meta.regular_market_price), observed_at))
    }

    /// Observation time formatted as a local wall-clock label, e.g. `14:03:27`.
    pub fn time_label(&self) -> String {
        self.observed_at
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}
