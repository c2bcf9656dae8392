//! Interactive selection input read from stdin.
//!
//! Each line is one command: a ticker symbol switches the selection, an empty line,
//! `none` or `-` clears it, `list` prints the available tickers and `quit`/`exit`
//! ends the program. Lines are read on a dedicated thread and forwarded to the main
//! loop over a channel; the channel disconnects when stdin reaches EOF.
use std::io::{self, BufRead};
use std::thread;

use crossbeam_channel::{Receiver, unbounded};
use log::{debug, warn};
use quote_common::tickers::SelectionParser;
use quote_common::{ParserError, Ticker};

/// One user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Switch to the given selection.
    Select(Option<Ticker>),
    /// Print the selectable tickers.
    List,
    /// Stop the watcher.
    Quit,
}

impl Input {
    /// Parse one line of user input.
    pub fn parse(line: &str) -> Result<Input, ParserError> {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            return Ok(Input::Quit);
        }
        if trimmed.eq_ignore_ascii_case("list") || trimmed == "?" {
            return Ok(Input::List);
        }
        Ticker::parse_selection(trimmed).map(Input::Select)
    }
}

/// Spawn the stdin reader thread.
pub fn spawn_stdin_reader() -> Result<Receiver<Input>, ParserError> {
    let (tx, rx) = unbounded::<Input>();
    thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("Failed to read stdin: {}", e);
                        break;
                    }
                };
                match Input::parse(&line) {
                    Ok(input) => {
                        if tx.send(input).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("{}; type `list` for available tickers", e),
                }
            }
            debug!("Stdin reader stopping...");
        })?;
    Ok(rx)
}
