//! Selection state: which ticker is watched, its poller, and its price history.
//!
//! All state here is owned by the main thread. Each selection gets a fresh
//! generation number; quotes carrying an older generation come from a poller
//! that has since been cancelled and are discarded.
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use log::{debug, info};
use quote_common::{ParserError, PriceHistory, Snapshot, Ticker};

use crate::poller::{PollEvent, Poller};
use crate::source::QuoteSource;

/// How long `shutdown` waits for an in-flight fetch before detaching the poller.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// The watcher's current selection and everything derived from it.
pub struct Session {
    source: Arc<dyn QuoteSource>,
    interval: Duration,
    events: Sender<PollEvent>,
    selection: Option<Ticker>,
    generation: u64,
    poller: Option<Poller>,
    history: PriceHistory,
}

impl Session {
    /// Create a session with nothing selected.
    pub fn new(
        source: Arc<dyn QuoteSource>,
        interval: Duration,
        history_limit: Option<usize>,
        events: Sender<PollEvent>,
    ) -> Self {
        Self {
            source,
            interval,
            events,
            selection: None,
            generation: 0,
            poller: None,
            history: PriceHistory::new(history_limit),
        }
    }

    /// Currently selected ticker.
    pub fn selection(&self) -> Option<Ticker> {
        self.selection
    }

    /// History of the current selection.
    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    /// Switch the selection.
    ///
    /// Cancels the running poller, resets the history and, for `Some`, starts polling
    /// the new ticker. Selecting the current ticker again changes nothing and returns
    /// `false`.
    pub fn select(&mut self, selection: Option<Ticker>) -> Result<bool, ParserError> {
        if selection == self.selection {
            return Ok(false);
        }

        if let Some(mut poller) = self.poller.take() {
            debug!("Stopping {} poller", poller.ticker());
            poller.cancel();
        }
        self.generation += 1;
        self.selection = selection;
        self.history.reset(selection);

        match selection {
            Some(ticker) => {
                info!("Selected {} ({})", ticker, ticker.company());
                self.poller = Some(Poller::start(
                    Arc::clone(&self.source),
                    ticker,
                    self.interval,
                    self.generation,
                    self.events.clone(),
                )?);
            }
            None => info!("Selection cleared"),
        }
        Ok(true)
    }

    /// Record a polled quote, returning what to render.
    ///
    /// Returns `None` for quotes from a previous selection.
    pub fn accept(&mut self, event: PollEvent) -> Option<Snapshot> {
        if event.generation != self.generation {
            debug!(
                "Discarding stale {} quote from generation {}",
                event.quote.ticker, event.generation
            );
            return None;
        }
        match self.history.record(event.quote) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                debug!("Discarding quote: {}", e);
                None
            }
        }
    }

    /// Stop polling. Waits briefly for the poller thread; a fetch still running after
    /// that is abandoned rather than waited on.
    pub fn shutdown(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.join_timeout(SHUTDOWN_GRACE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::scripted::ScriptedSource;
    use chrono::Utc;
    use crossbeam_channel::{Receiver, unbounded};
    use quote_common::{Direction, Quote};
    use std::thread;
    use std::time::Instant;

    const FAST: Duration = Duration::from_millis(10);
    const WAIT: Duration = Duration::from_secs(2);

    fn session(source: &Arc<ScriptedSource>) -> (Session, Receiver<PollEvent>) {
        let (tx, rx) = unbounded();
        let source: Arc<dyn QuoteSource> = source.clone();
        (Session::new(source, FAST, None, tx), rx)
    }

    #[test]
    fn test_empty_selection_issues_no_fetch() {
        let source = Arc::new(ScriptedSource::new());
        let (mut session, rx) = session(&source);

        assert!(!session.select(None).unwrap());
        thread::sleep(FAST * 5);

        assert_eq!(source.total_calls(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_select_polls_and_records() {
        let source = Arc::new(ScriptedSource::new());
        let (mut session, rx) = session(&source);

        assert!(session.select(Some(Ticker::AAPL)).unwrap());
        let first = session.accept(rx.recv_timeout(WAIT).unwrap()).unwrap();
        let second = session.accept(rx.recv_timeout(WAIT).unwrap()).unwrap();
        session.shutdown();

        assert_eq!(first.direction, Direction::Flat);
        assert_eq!(second.direction, Direction::Up);
        assert_eq!(second.delta_label(), "(1.00)");
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_switch_cancels_old_poller_and_resets_history() {
        let source = Arc::new(ScriptedSource::new());
        let (mut session, rx) = session(&source);

        session.select(Some(Ticker::AAPL)).unwrap();
        session.accept(rx.recv_timeout(WAIT).unwrap());
        session.select(Some(Ticker::MSFT)).unwrap();
        assert!(session.history().is_empty());
        assert_eq!(session.history().ticker(), Some(Ticker::MSFT));

        // Drain until an MSFT quote is accepted; anything older is stale.
        let snapshot = loop {
            let event = rx.recv_timeout(WAIT).unwrap();
            if let Some(snapshot) = session.accept(event) {
                break snapshot;
            }
        };
        assert_eq!(snapshot.latest.ticker, Ticker::MSFT);

        thread::sleep(FAST * 5);
        let aapl_calls = source.calls_for(Ticker::AAPL);
        thread::sleep(FAST * 10);
        assert_eq!(source.calls_for(Ticker::AAPL), aapl_calls);
        session.shutdown();
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let source = Arc::new(ScriptedSource::new());
        let (tx, _rx) = unbounded();
        let source: Arc<dyn QuoteSource> = source;
        let mut session = Session::new(source, Duration::from_secs(3600), None, tx);

        session.select(Some(Ticker::TSLA)).unwrap();
        session.select(None).unwrap();
        session.select(Some(Ticker::TSLA)).unwrap();

        let stale = PollEvent {
            generation: 1,
            quote: Quote::new(Ticker::TSLA, 250.0, Utc::now()),
        };
        assert!(session.accept(stale).is_none());
        assert!(session.history().is_empty());
        session.shutdown();
    }

    #[test]
    fn test_reselecting_same_ticker_is_noop() {
        let source = Arc::new(ScriptedSource::new());
        let (tx, _rx) = unbounded();
        let shared: Arc<dyn QuoteSource> = source.clone();
        let mut session = Session::new(shared, Duration::from_secs(3600), None, tx);

        assert!(session.select(Some(Ticker::NFLX)).unwrap());
        assert!(!session.select(Some(Ticker::NFLX)).unwrap());
        assert_eq!(session.selection(), Some(Ticker::NFLX));
        session.shutdown();
    }

    /// Source whose fetch hangs until the test releases it.
    struct HangingSource {
        entered: Sender<()>,
        release: Receiver<()>,
    }

    impl QuoteSource for HangingSource {
        fn fetch(&self, ticker: Ticker) -> Result<Quote, ParserError> {
            let _ = self.entered.send(());
            let _ = self.release.recv();
            Ok(Quote::new(ticker, 1.0, Utc::now()))
        }
    }

    #[test]
    fn test_shutdown_does_not_wait_for_hung_fetch() {
        let (entered_tx, entered_rx) = unbounded();
        let (release_tx, release_rx) = unbounded::<()>();
        let source: Arc<dyn QuoteSource> = Arc::new(HangingSource {
            entered: entered_tx,
            release: release_rx,
        });
        let (tx, rx) = unbounded();
        let mut session = Session::new(source, FAST, None, tx);

        session.select(Some(Ticker::AAPL)).unwrap();
        entered_rx.recv_timeout(WAIT).unwrap();

        let started = Instant::now();
        session.shutdown();
        assert!(started.elapsed() < SHUTDOWN_GRACE * 2);

        drop(release_tx);
        thread::sleep(FAST * 5);
        assert!(rx.try_recv().is_err());
    }
}
