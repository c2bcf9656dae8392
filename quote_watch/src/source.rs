//! Fetching quotes from the upstream quote service.
//!
//! `QuoteSource` is the seam between the poller and the network; `HttpQuoteSource`
//! is the production implementation backed by a blocking `reqwest` client.
use std::time::Duration;

use log::debug;
use quote_common::net::{USER_AGENT, quote_url};
use quote_common::{ParserError, Quote, Ticker};
use reqwest::blocking::Client;

/// Anything that can produce the latest quote for a ticker.
pub trait QuoteSource: Send + Sync {
    /// Fetch the current quote for `ticker`.
    fn fetch(&self, ticker: Ticker) -> Result<Quote, ParserError>;
}

/// Quote source issuing `GET <endpoint>/<TICKER>` requests.
pub struct HttpQuoteSource {
    client: Client,
    endpoint: String,
}

impl HttpQuoteSource {
    /// Build a source for `endpoint` whose requests give up after `timeout`.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ParserError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl QuoteSource for HttpQuoteSource {
    fn fetch(&self, ticker: Ticker) -> Result<Quote, ParserError> {
        let url = quote_url(&self.endpoint, ticker);
        debug!("GET {}", url);

        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ParserError::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes()?;
        Quote::from_chart_json(ticker, &body)
    }
}
