//! Quote Watch — a terminal client that polls a public quote service for one selected
//! stock ticker and prints the latest price, the change against the previous sample,
//! and a sparkline of the samples collected since the ticker was selected.
//!
//! Usage example (CLI):
//! ```bash
//! quote_watch --ticker aapl --interval-secs 10
//! ```
//!
//! While running, type a symbol (`msft`, `TSLA`, ...) and press Enter to switch the
//! selection, an empty line or `none` to clear it, `list` to see the choices, and
//! `quit` to exit. Ctrl+C also exits.
//!
//! The main thread multiplexes three channels with crossbeam `select!`: stdin commands,
//! quotes from the active poller, and the Ctrl+C shutdown signal. All selection and
//! history state lives on this thread.
#![warn(missing_docs)]
mod args;
mod input;
mod poller;
mod session;
mod source;
mod view;

use crate::args::Args;
use crate::input::Input;
use crate::poller::PollEvent;
use crate::session::Session;
use crate::source::HttpQuoteSource;
use crate::view::View;
use clap::Parser;
use crossbeam_channel::{bounded, never, select, unbounded};
use log::{debug, info};
use quote_common::ParserError;
use quote_common::Result;
use std::io;
use std::sync::Arc;

fn main() -> Result<(), ParserError> {
    init_logger();
    let args = Args::parse();

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down...");
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| ParserError::Signal(e.to_string()))?;

    let source = Arc::new(HttpQuoteSource::new(&args.endpoint, args.request_timeout())?);
    info!("Quote service: {}", args.endpoint);

    let (event_tx, event_rx) = unbounded::<PollEvent>();
    let mut session = Session::new(source, args.poll_interval(), args.history_limit(), event_tx);
    let mut view = View::new(args.format, io::stdout());

    view.selection_changed(args.ticker)?;
    session.select(args.ticker)?;

    let mut input_rx = input::spawn_stdin_reader()?;
    info!("Type a ticker symbol to switch, `list` for choices, `quit` to exit.");

    loop {
        select! {
            recv(input_rx) -> msg => match msg {
                Ok(Input::Select(selection)) => {
                    if session.select(selection)? {
                        view.selection_changed(selection)?;
                    }
                }
                Ok(Input::List) => view.list_tickers()?,
                Ok(Input::Quit) => break,
                Err(_) => {
                    debug!("Stdin closed; watching {:?} until Ctrl+C", session.selection());
                    input_rx = never();
                }
            },
            recv(event_rx) -> msg => if let Ok(event) = msg {
                if let Some(snapshot) = session.accept(event) {
                    view.render(&snapshot, session.history())?;
                }
            },
            recv(shutdown_rx) -> _ => break,
        }
    }

    session.shutdown();
    info!("Quote watch stopped.");
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
