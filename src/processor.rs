//! Background command processor.
//!
//! Commands produced by dispatch are queued while the processor is active and
//! handled one per interval, oldest first, on a dedicated thread. Commands
//! offered while inactive are refused; commands still queued at
//! deactivation stay queued and run after the next activation.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{Result, check_interval};
use crate::task::{Flow, Worker};
use crate::widget::lock;

type Handler = Box<dyn FnMut(String) + Send>;

/// FIFO queue of command paths drained by a polling loop.
pub struct Processor {
    interval: Duration,
    queue: Arc<Mutex<VecDeque<String>>>,
    handler: Arc<Mutex<Handler>>,
    worker: Option<Worker>,
}

impl Processor {
    /// Inactive processor handing each command to `handler`; a zero interval is rejected.
    pub fn new<F>(interval: Duration, handler: F) -> Result<Self>
    where
        F: FnMut(String) + Send + 'static,
    {
        Ok(Self {
            interval: check_interval(interval)?,
            queue: Arc::new(Mutex::new(VecDeque::new())),
            handler: Arc::new(Mutex::new(Box::new(handler))),
            worker: None,
        })
    }

    pub const fn interval(&self) -> Duration { self.interval }

    pub const fn is_active(&self) -> bool { self.worker.is_some() }

    /// Commands waiting to be handled.
    pub fn pending(&self) -> usize { lock(&self.queue).len() }

    /// Queue `command`. Returns `false` (and drops it) while inactive.
    pub fn enqueue(&self, command: impl Into<String>) -> bool {
        if !self.is_active() {
            return false;
        }
        lock(&self.queue).push_back(command.into());
        true
    }

    /// Start or stop the loop. Setting the current state again is a no-op.
    ///
    /// Stopping waits for a command being handled, so no handler call starts
    /// after this returns.
    pub fn set_active(&mut self, active: bool) -> Result<()> {
        match (active, self.worker.take()) {
            (true, Some(worker)) => self.worker = Some(worker),
            (true, None) => {
                let queue = Arc::clone(&self.queue);
                let handler = Arc::clone(&self.handler);
                let worker = Worker::spawn_loop("processor", self.interval, move || {
                    // Release the queue before handling so enqueue never waits on a handler
                    let next = lock(&queue).pop_front();
                    if let Some(command) = next {
                        tracing::debug!(%command, "processing command");
                        let mut handler = lock(&handler);
                        (*handler)(command);
                    }
                    Flow::Continue
                })?;
                self.worker = Some(worker);
                tracing::info!(interval = ?self.interval, "processor activated");
            }
            (false, Some(worker)) => {
                worker.join();
                tracing::info!(pending = self.pending(), "processor deactivated");
            }
            (false, None) => {}
        }
        Ok(())
    }
}

impl Drop for Processor {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Instant;

    use super::*;
    use crate::error::Error;

    fn recording(interval: Duration) -> (Processor, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let processor = Processor::new(interval, move |command| sink.lock().unwrap().push(command)).unwrap();
        (processor, seen)
    }

    fn wait_for(condition: impl Fn() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < Duration::from_secs(2) {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        condition()
    }

    #[test]
    fn test_rejects_zero_interval() {
        assert!(matches!(Processor::new(Duration::ZERO, |_| {}), Err(Error::InvalidInterval(_))));
    }

    #[test]
    fn test_handles_commands_in_order() {
        let (mut processor, seen) = recording(Duration::from_millis(1));
        processor.set_active(true).unwrap();
        for command in ["A.ON", "A.OFF", "B.ON"] {
            assert!(processor.enqueue(command));
        }
        assert!(wait_for(|| seen.lock().unwrap().len() == 3), "All commands handled");
        assert_eq!(*seen.lock().unwrap(), ["A.ON", "A.OFF", "B.ON"]);
        assert_eq!(processor.pending(), 0);
        processor.set_active(false).unwrap();
    }

    #[test]
    fn test_refuses_commands_while_inactive() {
        let (mut processor, seen) = recording(Duration::from_millis(1));
        assert!(!processor.enqueue("EARLY"));
        assert_eq!(processor.pending(), 0);

        processor.set_active(true).unwrap();
        processor.set_active(false).unwrap();
        assert!(!processor.is_active());
        assert!(!processor.enqueue("LATE"));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_one_command_per_interval() {
        let (mut processor, seen) = recording(Duration::from_secs(60));
        processor.set_active(true).unwrap();
        // The first unit runs on an empty queue, then the loop sleeps a minute
        thread::sleep(Duration::from_millis(20));
        processor.enqueue("X");
        processor.enqueue("Y");
        thread::sleep(Duration::from_millis(20));
        assert!(seen.lock().unwrap().is_empty(), "Nothing handled before the interval elapses");

        processor.set_active(false).unwrap();
        assert_eq!(processor.pending(), 2, "Queued commands survive deactivation");
    }

    #[test]
    fn test_double_activation_is_noop() {
        let (mut processor, seen) = recording(Duration::from_millis(1));
        processor.set_active(true).unwrap();
        processor.set_active(true).unwrap();
        processor.enqueue("ONCE");
        assert!(wait_for(|| !seen.lock().unwrap().is_empty()));
        processor.set_active(false).unwrap();
        processor.set_active(false).unwrap();
        assert_eq!(*seen.lock().unwrap(), ["ONCE"]);
    }
}
