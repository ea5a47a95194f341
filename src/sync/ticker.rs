//! Pluggable poll timers.
//!
//! The engine cannot push time updates, so the core samples it on a fixed
//! period. Where those ticks come from is up to the `Ticker`: tests drive
//! them by hand, the CLI runs a background timer thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

/// A start/stop periodic time source.
///
/// Implementations only schedule; the tick itself is delivered to the
/// session as an event by whoever owns the event loop.
pub trait Ticker {
    fn start(&mut self, period: Duration);
    fn stop(&mut self);
}

/// Ticker whose ticks are delivered manually by the caller.
///
/// Records how often it was started so tests can check start-once behavior.
#[derive(Debug, Default, Clone)]
pub struct ManualTicker {
    running: bool,
    starts: usize,
    stops: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn starts(&self) -> usize {
        self.starts
    }

    pub fn stops(&self) -> usize {
        self.stops
    }
}

impl Ticker for ManualTicker {
    fn start(&mut self, _period: Duration) {
        self.running = true;
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.running = false;
        self.stops += 1;
    }
}

/// Background timer thread sending a tick message on an mpsc channel.
///
/// The thread exits when stopped or when the receiving side is gone.
pub struct ThreadTicker<T: Clone + Send + 'static> {
    tx: Sender<T>,
    message: T,
    worker: Option<(Arc<AtomicBool>, JoinHandle<()>)>,
}

impl<T: Clone + Send + 'static> ThreadTicker<T> {
    /// Create a ticker that sends `message` on `tx` every period once started.
    pub fn new(tx: Sender<T>, message: T) -> Self {
        Self {
            tx,
            message,
            worker: None,
        }
    }
}

impl<T: Clone + Send + 'static> Ticker for ThreadTicker<T> {
    fn start(&mut self, period: Duration) {
        if self.worker.is_some() {
            return;
        }
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let tx = self.tx.clone();
        let message = self.message.clone();
        let handle = thread::spawn(move || tick_loop(flag, tx, message, period));
        debug!(period_ms = period.as_millis() as u64, "tick thread started");
        self.worker = Some((stop, handle));
    }

    fn stop(&mut self) {
        if let Some((stop, handle)) = self.worker.take() {
            stop.store(true, Ordering::SeqCst);
            // Ignore a panicked worker; there is nothing left to clean up
            let _ = handle.join();
            debug!("tick thread stopped");
        }
    }
}

impl<T: Clone + Send + 'static> Drop for ThreadTicker<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Timer loop: sleep one period, then send, until stopped or disconnected.
fn tick_loop<T>(stop: Arc<AtomicBool>, tx: Sender<T>, message: T, period: Duration)
where
    T: Clone,
{
    loop {
        thread::sleep(period);
        if stop.load(Ordering::SeqCst) {
            break;
        }
        if tx.send(message.clone()).is_err() {
            break;
        }
    }
}
