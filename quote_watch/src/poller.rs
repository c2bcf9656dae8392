//! Background polling of the quote source for one ticker.
//!
//! A `Poller` owns a worker thread that fetches the selected ticker, forwards each
//! successful quote as a `PollEvent`, and then waits for the poll interval before the
//! next fetch. The wait starts only after a fetch completes, so polls never overlap.
//!
//! Cancellation:
//! - `Poller::cancel` (also run on drop) disconnects the stop channel. The worker wakes
//!   from its wait immediately and exits; no further fetch is issued.
//! - A fetch already in flight when the poller is cancelled completes, but its quote is
//!   not forwarded.
//! - `Poller::join_timeout` waits a bounded time for the worker to exit and detaches it
//!   otherwise, so a hung request never blocks the caller.
//!
//! Fetch failures are logged and swallowed; the next attempt happens on schedule.
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{
    Receiver, RecvTimeoutError, Sender, TryRecvError, after, bounded, select,
};
use log::{debug, error, info, warn};
use quote_common::{ParserError, Quote, Ticker};

use crate::source::QuoteSource;

/// Quote produced by a poller, tagged with the selection generation it belongs to.
#[derive(Debug, Clone)]
pub struct PollEvent {
    /// Generation of the selection that started the poller.
    pub generation: u64,
    /// Fetched quote.
    pub quote: Quote,
}

/// Handle to a running poll loop.
pub struct Poller {
    ticker: Ticker,
    stop_tx: Option<Sender<()>>,
    /// Disconnects when the worker returns.
    done_rx: Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Spawn a worker polling `ticker` through `source` every `interval`.
    pub fn start(
        source: Arc<dyn QuoteSource>,
        ticker: Ticker,
        interval: Duration,
        generation: u64,
        events: Sender<PollEvent>,
    ) -> Result<Self, ParserError> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let (done_tx, done_rx) = bounded::<()>(0);
        let handle = thread::Builder::new()
            .name(format!("poll-{ticker}"))
            .spawn(move || {
                poll_loop(source, ticker, interval, generation, events, stop_rx);
                drop(done_tx);
            })?;

        Ok(Self {
            ticker,
            stop_tx: Some(stop_tx),
            done_rx,
            handle: Some(handle),
        })
    }

    /// Ticker this poller fetches.
    pub fn ticker(&self) -> Ticker {
        self.ticker
    }

    /// Stop polling. Returns without waiting for the worker.
    pub fn cancel(&mut self) {
        if self.stop_tx.take().is_some() {
            debug!("Cancelling poller for {}", self.ticker);
        }
    }

    /// Stop polling and wait up to `grace` for the worker thread to exit.
    ///
    /// Returns `false` if the worker is still inside a fetch when `grace` runs out; the
    /// thread is then detached and exits on its own once the fetch returns.
    pub fn join_timeout(mut self, grace: Duration) -> bool {
        self.cancel();
        match self.done_rx.recv_timeout(grace) {
            Err(RecvTimeoutError::Timeout) => {
                warn!("Poller for {} still fetching after {:?}, detaching", self.ticker, grace);
                self.handle.take();
                false
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if let Some(handle) = self.handle.take() {
                    if handle.join().is_err() {
                        error!("Poller thread for {} panicked", self.ticker);
                    }
                }
                true
            }
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn is_stopped(stop_rx: &Receiver<()>) -> bool {
    !matches!(stop_rx.try_recv(), Err(TryRecvError::Empty))
}

fn poll_loop(
    source: Arc<dyn QuoteSource>,
    ticker: Ticker,
    interval: Duration,
    generation: u64,
    events: Sender<PollEvent>,
    stop_rx: Receiver<()>,
) {
    info!("Polling {} every {:?}", ticker, interval);

    while !is_stopped(&stop_rx) {
        match source.fetch(ticker) {
            Ok(quote) => {
                if is_stopped(&stop_rx) {
                    debug!("Dropping {} quote fetched after cancel", ticker);
                    break;
                }
                debug!("QUOTE: {} Price={:.2} Time={}", ticker, quote.price, quote.observed_at);
                if events.send(PollEvent { generation, quote }).is_err() {
                    debug!("Event receiver closed, stopping {} poller", ticker);
                    break;
                }
            }
            Err(e) => warn!("Failed to fetch {}: {}", ticker, e),
        }

        select! {
            recv(stop_rx) -> _ => break,
            recv(after(interval)) -> _ => {}
        }
    }
    info!("Poller for {} stopping...", ticker);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::scripted::ScriptedSource;
    use chrono::Utc;
    use crossbeam_channel::unbounded;
    use std::time::Instant;

    const FAST: Duration = Duration::from_millis(10);
    const WAIT: Duration = Duration::from_secs(2);

    #[test]
    fn test_polls_repeatedly_and_tags_generation() {
        let source = Arc::new(ScriptedSource::new());
        let (tx, rx) = unbounded();
        let poller = Poller::start(source.clone(), Ticker::AAPL, FAST, 7, tx).unwrap();

        let first = rx.recv_timeout(WAIT).unwrap();
        let second = rx.recv_timeout(WAIT).unwrap();
        assert!(poller.join_timeout(WAIT));

        assert_eq!(first.generation, 7);
        assert_eq!(first.quote.ticker, Ticker::AAPL);
        assert!(second.quote.price > first.quote.price);
    }

    #[test]
    fn test_no_poll_after_cancel() {
        let source = Arc::new(ScriptedSource::new());
        let (tx, rx) = unbounded();
        let poller = Poller::start(source.clone(), Ticker::MSFT, FAST, 0, tx).unwrap();
        rx.recv_timeout(WAIT).unwrap();
        assert!(poller.join_timeout(WAIT));

        let calls = source.calls_for(Ticker::MSFT);
        thread::sleep(FAST * 10);
        assert_eq!(source.calls_for(Ticker::MSFT), calls);
    }

    #[test]
    fn test_cancel_interrupts_long_wait() {
        let source = Arc::new(ScriptedSource::new());
        let (tx, rx) = unbounded();
        let poller =
            Poller::start(source.clone(), Ticker::NFLX, Duration::from_secs(3600), 0, tx).unwrap();
        rx.recv_timeout(WAIT).unwrap();

        assert!(poller.join_timeout(WAIT));
        assert_eq!(source.total_calls(), 1);
    }

    #[test]
    fn test_failures_are_swallowed() {
        let source = Arc::new(ScriptedSource::failing_first(2));
        let (tx, rx) = unbounded();
        let poller = Poller::start(source.clone(), Ticker::TSLA, FAST, 0, tx).unwrap();

        let event = rx.recv_timeout(WAIT).unwrap();
        assert!(poller.join_timeout(WAIT));

        assert_eq!(event.quote.ticker, Ticker::TSLA);
        assert!(source.calls_for(Ticker::TSLA) >= 3);
    }

    /// Source whose fetch blocks until the test opens the gate.
    struct GatedSource {
        entered: Sender<()>,
        gate: Receiver<()>,
    }

    impl QuoteSource for GatedSource {
        fn fetch(&self, ticker: Ticker) -> Result<Quote, ParserError> {
            let _ = self.entered.send(());
            let _ = self.gate.recv();
            Ok(Quote::new(ticker, 1.0, Utc::now()))
        }
    }

    #[test]
    fn test_in_flight_quote_is_dropped_after_cancel() {
        let (entered_tx, entered_rx) = unbounded();
        let (gate_tx, gate_rx) = unbounded();
        let source = Arc::new(GatedSource {
            entered: entered_tx,
            gate: gate_rx,
        });
        let (tx, rx) = unbounded();
        let mut poller = Poller::start(source, Ticker::GOOGL, FAST, 0, tx).unwrap();

        entered_rx.recv_timeout(WAIT).unwrap();
        poller.cancel();
        gate_tx.send(()).unwrap();
        assert!(poller.join_timeout(WAIT));

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_join_timeout_detaches_hung_fetch() {
        let (entered_tx, entered_rx) = unbounded();
        let (gate_tx, gate_rx) = unbounded::<()>();
        let source = Arc::new(GatedSource {
            entered: entered_tx,
            gate: gate_rx,
        });
        let (tx, rx) = unbounded();
        let poller = Poller::start(source, Ticker::AAPL, FAST, 0, tx).unwrap();
        entered_rx.recv_timeout(WAIT).unwrap();

        let started = Instant::now();
        assert!(!poller.join_timeout(Duration::from_millis(100)));
        assert!(started.elapsed() < WAIT);

        // Releasing the fetch lets the detached worker exit without emitting.
        drop(gate_tx);
        thread::sleep(FAST * 5);
        assert!(rx.try_recv().is_err());
    }
}
