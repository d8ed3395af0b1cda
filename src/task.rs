//! Cancellable background work: one named thread per running loop or action.
//!
//! A [`Worker`] owns its thread and the sending half of a stop channel; the
//! thread body receives the matching [`StopToken`]. Stopping is cooperative:
//! the token is checked between work units and wakes any [`StopToken::sleep`]
//! immediately, but never interrupts a unit that is already running.
//!
//! Dropping a `Worker` disconnects the channel, which the token treats exactly
//! like an explicit stop. A replaced button action therefore stops at its next
//! sleep without the dispatch path ever blocking on it.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Outcome of one unit of loop work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Sleep for the interval, then run the next unit.
    Continue,
    /// The loop has nothing more to do and exits on its own.
    Done,
}

/// Receiving side of a worker's stop signal.
#[derive(Debug)]
pub struct StopToken {
    rx: Receiver<()>,
}

impl StopToken {
    /// Whether a stop was requested (or the owning worker was dropped).
    pub fn is_stopped(&self) -> bool {
        match self.rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => true,
            Err(TryRecvError::Empty) => false,
        }
    }

    /// Sleep for `interval`, waking early on stop.
    ///
    /// Returns `true` if the sleep ended because of a stop request.
    pub fn sleep(&self, interval: Duration) -> bool {
        match self.rx.recv_timeout(interval) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) => false,
        }
    }
}

/// A running background thread plus its stop signal.
#[derive(Debug)]
pub struct Worker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawn `body` on a named thread.
    pub fn spawn<F>(name: &str, body: F) -> std::io::Result<Self>
    where
        F: FnOnce(StopToken) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || body(StopToken { rx }))?;
        Ok(Self {
            stop: Some(tx),
            handle: Some(handle),
        })
    }

    /// Spawn a polling loop: check for stop, run one unit, sleep, repeat.
    ///
    /// The loop also ends when `unit` returns [`Flow::Done`]. A stop that
    /// arrives during the sleep ends the loop without another unit.
    pub fn spawn_loop<F>(name: &str, interval: Duration, mut unit: F) -> std::io::Result<Self>
    where
        F: FnMut() -> Flow + Send + 'static,
    {
        Self::spawn(name, move |token| {
            while !token.is_stopped() {
                if unit() == Flow::Done {
                    break;
                }
                if token.sleep(interval) {
                    break;
                }
            }
        })
    }

    /// Signal the thread to stop without waiting for it.
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop.take() {
            // A send error only means the thread already exited
            let _ = tx.send(());
        }
    }

    /// Whether the thread body has returned.
    pub fn is_finished(&self) -> bool { self.handle.as_ref().is_none_or(JoinHandle::is_finished) }

    /// Signal stop and wait for the thread to exit.
    ///
    /// A unit of work already in progress completes first.
    pub fn join(mut self) {
        self.stop();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::error!("background worker panicked");
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) { self.stop(); }
}
