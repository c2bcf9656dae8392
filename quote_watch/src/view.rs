//! Rendering of the watched quote to stdout.
//!
//! Text output prints the price line coloured by direction (green up, red down,
//! plain otherwise) followed by a sparkline of the chart series. JSON output
//! writes one object per line for every event.
use std::io::Write;

use crossterm::style::Stylize;
use quote_common::chart::ChartSeries;
use quote_common::{Direction, ParserError, PriceHistory, Snapshot, Ticker};
use serde::Serialize;
use serde_json::json;
use strum::IntoEnumIterator;

use crate::args::OutputFormat;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
/// Most recent points shown in the sparkline.
const SPARK_WIDTH: usize = 60;

#[derive(Serialize)]
struct Update<'a> {
    ticker: Ticker,
    company: &'static str,
    price: f64,
    delta: Option<f64>,
    delta_label: String,
    direction: Direction,
    color: &'static str,
    time: String,
    series: Option<&'a ChartSeries>,
}

/// Writes watcher output in the configured format.
pub struct View<W: Write> {
    format: OutputFormat,
    out: W,
}

impl<W: Write> View<W> {
    /// Create a view writing to `out`.
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self { format, out }
    }

    /// Announce a new selection; shown until the first quote arrives.
    pub fn selection_changed(&mut self, selection: Option<Ticker>) -> Result<(), ParserError> {
        match self.format {
            OutputFormat::Text => match selection {
                Some(ticker) => writeln!(self.out, "Loading {} ({})...", ticker, ticker.company())?,
                None => writeln!(self.out, "No ticker selected")?,
            },
            OutputFormat::Json => {
                let event = json!({ "event": "selection", "ticker": selection });
                serde_json::to_writer(&mut self.out, &event)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Print the selectable tickers.
    pub fn list_tickers(&mut self) -> Result<(), ParserError> {
        for ticker in Ticker::iter() {
            writeln!(self.out, "{:<6} {}", ticker.to_string(), ticker.company())?;
        }
        writeln!(self.out, "{:<6} clear selection", "none")?;
        self.out.flush()?;
        Ok(())
    }

    /// Render the latest snapshot together with the retained history.
    pub fn render(&mut self, snapshot: &Snapshot, history: &PriceHistory) -> Result<(), ParserError> {
        let series = history.series();
        match self.format {
            OutputFormat::Text => self.render_text(snapshot, series.as_ref())?,
            OutputFormat::Json => {
                let quote = &snapshot.latest;
                let update = Update {
                    ticker: quote.ticker,
                    company: quote.ticker.company(),
                    price: quote.price,
                    delta: snapshot.delta,
                    delta_label: snapshot.delta_label(),
                    direction: snapshot.direction,
                    color: snapshot.direction.color(),
                    time: quote.time_label(),
                    series: series.as_ref(),
                };
                serde_json::to_writer(&mut self.out, &update)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn render_text(
        &mut self,
        snapshot: &Snapshot,
        series: Option<&ChartSeries>,
    ) -> Result<(), ParserError> {
        let quote = &snapshot.latest;
        let price = format!("{} ${:.2}", snapshot.delta_label(), quote.price);
        let price = match snapshot.direction {
            Direction::Up => price.green().to_string(),
            Direction::Down => price.red().to_string(),
            Direction::Flat => price,
        };
        writeln!(
            self.out,
            "{} ({})  {}  {}",
            quote.ticker,
            quote.ticker.company(),
            price,
            quote.time_label()
        )?;

        if let Some(series) = series.filter(|s| s.len() > 1) {
            let first = series.points.first().map(|p| p.label.as_str()).unwrap_or_default();
            let last = series.points.last().map(|p| p.label.as_str()).unwrap_or_default();
            let (lo, hi) = series.price_range().unwrap_or_default();
            writeln!(
                self.out,
                "  {}  {} -> {}  [{:.2}..{:.2}] ({} samples)",
                sparkline(series),
                first,
                last,
                lo,
                hi,
                series.len()
            )?;
        }
        Ok(())
    }
}

/// One bar per point, scaled between the lowest and highest price shown.
pub fn sparkline(series: &ChartSeries) -> String {
    let skip = series.len().saturating_sub(SPARK_WIDTH);
    let points = &series.points[skip..];
    let (lo, hi) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.price), hi.max(p.price))
    });
    let span = hi - lo;

    points
        .iter()
        .map(|p| {
            if span > 0.0 {
                let idx = ((p.price - lo) / span * (BARS.len() - 1) as f64).round() as usize;
                BARS[idx.min(BARS.len() - 1)]
            } else {
                BARS[BARS.len() / 2 - 1]
            }
        })
        .collect()
}
