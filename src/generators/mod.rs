//! Background generators that keep readouts moving.
//!
//! A [`Generator`] pairs a [`Source`] of synthetic data with a keyed set of
//! readouts and, while active, runs one polling loop on its own thread:
//!
//! ```text
//! set_active(true)  ──► spawn loop ──► produce ─► sleep(interval) ─► produce ─► ...
//! set_active(false) ──► stop signal wakes the sleep, loop exits, thread joined
//! ```
//!
//! Activation is idempotent: a second `set_active(true)` while running does
//! nothing, so a generator never runs two loops. Once `set_active(false)`
//! returns, no further work unit runs. A source that runs out of data returns
//! [`Flow::Done`] and the generator deactivates itself.
//!
//! # Capability Filtering
//!
//! Every sink is registered together with the update kinds its readout
//! accepts. A registration is refused when that set has nothing in common with
//! what the source [`produces`](Source::produces). A source then pushes each
//! update only to the sinks that accept its kind, either the same value to all
//! of them ([`SinkSet::broadcast`]) or a fresh value per sink
//! ([`SinkSet::for_each_accepting`]).

mod buffer;
mod sources;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::error::{Result, check_interval};
use crate::readouts::{Capabilities, Readout, SharedReadout, Update};
use crate::task::{Flow, Worker};
use crate::widget::lock;

pub use buffer::LineBuffer;
pub use sources::{Addresses, DatumSource, RandomColors, RandomImages, RandomNumbers, RandomWalk, SineSensor, threshold_color};

/// Synthetic data behind a [`Generator`].
pub trait Source: Send + 'static {
    /// Update kinds this source can emit.
    fn produces(&self) -> Capabilities;

    /// Run one unit of work, pushing updates into `sinks`.
    fn produce(&mut self, sinks: &mut SinkSet) -> Flow;
}

// =============================================================================
// Sinks
// =============================================================================

struct Sink {
    key: String,
    accepts: Capabilities,
    readout: SharedReadout,
}

/// Keyed readouts registered with one generator.
#[derive(Default)]
pub struct SinkSet {
    sinks: Vec<Sink>,
}

impl SinkSet {
    /// Register `readout` under `key` if `key` is new and the readout accepts
    /// at least one kind in `produced`.
    pub fn insert(&mut self, key: &str, readout: SharedReadout, produced: Capabilities) -> bool {
        if self.contains(key) {
            tracing::warn!(%key, "duplicate sink key ignored");
            return false;
        }
        let accepts = lock(&readout).capabilities();
        if accepts.intersection(produced).is_empty() {
            tracing::warn!(%key, "sink accepts nothing this source produces");
            return false;
        }
        self.sinks.push(Sink {
            key: key.to_owned(),
            accepts,
            readout,
        });
        true
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.sinks.len();
        self.sinks.retain(|sink| sink.key != key);
        self.sinks.len() != before
    }

    pub fn contains(&self, key: &str) -> bool { self.sinks.iter().any(|sink| sink.key == key) }

    pub fn len(&self) -> usize { self.sinks.len() }

    pub fn is_empty(&self) -> bool { self.sinks.is_empty() }

    /// Registered keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> { self.sinks.iter().map(|sink| sink.key.as_str()) }

    /// Push the same `update` to every sink accepting its kind; returns how many received it.
    pub fn broadcast(&self, update: &Update) -> usize {
        let kind = update.capability();
        let mut delivered = 0;
        for sink in self.sinks.iter().filter(|sink| sink.accepts.contains(kind)) {
            lock(&sink.readout).update(update);
            delivered += 1;
        }
        delivered
    }

    /// Call `f` with each sink accepting `kind`, for sources that compute a
    /// separate value per sink.
    pub fn for_each_accepting<F>(&self, kind: Capabilities, mut f: F)
    where
        F: FnMut(&str, &mut dyn Readout),
    {
        for sink in self.sinks.iter().filter(|sink| sink.accepts.contains(kind)) {
            f(&sink.key, &mut *lock(&sink.readout));
        }
    }
}

// =============================================================================
// Generator
// =============================================================================

/// A [`Source`] plus its sinks, run on a polling loop while active.
pub struct Generator<S: Source> {
    name: String,
    interval: Duration,
    source: Arc<Mutex<S>>,
    sinks: Arc<Mutex<SinkSet>>,
    active: Arc<AtomicBool>,
    worker: Option<Worker>,
}

impl<S: Source> Generator<S> {
    /// Inactive generator polling `source` every `interval`; a zero interval is rejected.
    pub fn new(name: impl Into<String>, source: S, interval: Duration) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            interval: check_interval(interval)?,
            source: Arc::new(Mutex::new(source)),
            sinks: Arc::new(Mutex::new(SinkSet::default())),
            active: Arc::new(AtomicBool::new(false)),
            worker: None,
        })
    }

    /// Register `readout` under `key`.
    ///
    /// Returns `false` for a duplicate key or a readout that accepts nothing
    /// this generator's source produces.
    pub fn add(&self, key: &str, readout: SharedReadout) -> bool {
        let produced = lock(&self.source).produces();
        lock(&self.sinks).insert(key, readout, produced)
    }

    pub fn remove(&self, key: &str) -> bool { lock(&self.sinks).remove(key) }

    pub fn len(&self) -> usize { lock(&self.sinks).len() }

    pub fn is_empty(&self) -> bool { lock(&self.sinks).is_empty() }

    pub fn name(&self) -> &str { &self.name }

    pub const fn interval(&self) -> Duration { self.interval }

    /// Whether the polling loop is running. Turns `false` by itself when the source is done.
    pub fn is_active(&self) -> bool { self.active.load(Ordering::SeqCst) }

    /// Locked access to the source, e.g. to rewind it between runs.
    pub fn source(&self) -> MutexGuard<'_, S> { lock(&self.source) }

    /// Start or stop the polling loop. Setting the current state again is a no-op.
    ///
    /// Stopping waits for a work unit in progress, so no unit runs after this
    /// returns.
    pub fn set_active(&mut self, active: bool) -> Result<()> {
        if active {
            self.start()
        } else {
            self.stop();
            Ok(())
        }
    }

    fn start(&mut self) -> Result<()> {
        if self.is_active() {
            return Ok(());
        }
        // A loop that finished on its own still holds its thread handle
        if let Some(finished) = self.worker.take() {
            finished.join();
        }

        let source = Arc::clone(&self.source);
        let sinks = Arc::clone(&self.sinks);
        let active = Arc::clone(&self.active);
        let name = self.name.clone();
        self.active.store(true, Ordering::SeqCst);

        let spawned = Worker::spawn_loop(&self.name, self.interval, move || {
            let flow = lock(&source).produce(&mut lock(&sinks));
            if flow == Flow::Done {
                active.store(false, Ordering::SeqCst);
                tracing::info!(generator = %name, "source exhausted, deactivating");
            }
            flow
        });
        match spawned {
            Ok(worker) => {
                self.worker = Some(worker);
                tracing::info!(generator = %self.name, interval = ?self.interval, "generator activated");
                Ok(())
            }
            Err(err) => {
                self.active.store(false, Ordering::SeqCst);
                Err(err.into())
            }
        }
    }

    fn stop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            worker.join();
            tracing::info!(generator = %self.name, "generator deactivated");
        }
    }
}

impl<S: Source> Drop for Generator<S> {
    fn drop(&mut self) { self.stop(); }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::thread::{self, ThreadId};
    use std::time::Instant;

    use super::*;
    use crate::colors::RED;
    use crate::error::Error;
    use crate::readouts::{BarConfig, BarReadout, BufferConfig, BufferReadout, ColorConfig, ColorReadout, share};

    /// Counts units and records which threads ran them.
    #[derive(Default)]
    struct Counting {
        threads: Arc<Mutex<HashSet<ThreadId>>>,
        units: Arc<Mutex<usize>>,
        limit: Option<usize>,
    }

    impl Source for Counting {
        fn produces(&self) -> Capabilities { Capabilities::NUMBER }

        fn produce(&mut self, sinks: &mut SinkSet) -> Flow {
            self.threads.lock().unwrap().insert(thread::current().id());
            let mut units = self.units.lock().unwrap();
            *units += 1;
            sinks.broadcast(&Update::Number(*units as f64));
            if self.limit.is_some_and(|limit| *units >= limit) { Flow::Done } else { Flow::Continue }
        }
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

    fn bar() -> SharedReadout {
        share(
            BarReadout::new(BarConfig {
                max: 1000.0,
                divisions: 1000,
                ..BarConfig::default()
            })
            .unwrap(),
        )
    }

    #[test]
    fn test_rejects_zero_interval() {
        let result = Generator::new("g", Counting::default(), Duration::ZERO);
        assert!(matches!(result, Err(Error::InvalidInterval(_))));
    }

    #[test]
    fn test_registration_checks_key_and_capability() {
        let generator = Generator::new("g", Counting::default(), Duration::from_millis(5)).unwrap();
        assert!(generator.add("bar", bar()));
        assert!(!generator.add("bar", bar()), "Duplicate key");
        assert!(
            !generator.add("lamp", share(ColorReadout::new(ColorConfig::default()))),
            "Color readout accepts no numbers"
        );
        assert!(
            generator.add("log", share(BufferReadout::new(BufferConfig::default()))),
            "Buffer readout accepts numbers"
        );
        assert_eq!(generator.len(), 2);
        assert!(generator.remove("bar"));
        assert!(!generator.remove("bar"));
    }

    #[test]
    fn test_double_activation_runs_one_loop() {
        let source = Counting::default();
        let threads = Arc::clone(&source.threads);
        let units = Arc::clone(&source.units);
        let mut generator = Generator::new("single", source, Duration::from_millis(2)).unwrap();

        generator.set_active(true).unwrap();
        generator.set_active(true).unwrap();
        assert!(generator.is_active());
        assert!(wait_for(|| *units.lock().unwrap() >= 5));

        generator.set_active(false).unwrap();
        assert!(!generator.is_active());
        assert_eq!(threads.lock().unwrap().len(), 1, "Exactly one loop thread ran units");

        let stopped_at = *units.lock().unwrap();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(*units.lock().unwrap(), stopped_at, "No units after deactivation");

        generator.set_active(false).unwrap();
    }

    #[test]
    fn test_updates_reach_registered_readouts() {
        let readout = share(
            BarReadout::new(BarConfig {
                max: 1000.0,
                divisions: 1000,
                ..BarConfig::default()
            })
            .unwrap(),
        );
        let mut generator = Generator::new("push", Counting::default(), Duration::from_millis(2)).unwrap();
        generator.add("bar", readout.clone());
        generator.set_active(true).unwrap();
        assert!(wait_for(|| readout.lock().unwrap().level().level() >= 3));
        generator.set_active(false).unwrap();
    }

    #[test]
    fn test_done_deactivates_and_restart_works() {
        let source = Counting {
            limit: Some(3),
            ..Counting::default()
        };
        let units = Arc::clone(&source.units);
        let mut generator = Generator::new("done", source, Duration::from_millis(1)).unwrap();

        generator.set_active(true).unwrap();
        assert!(wait_for(|| !generator.is_active()), "Generator should stop by itself");
        assert_eq!(*units.lock().unwrap(), 3);

        generator.source().limit = Some(5);
        generator.set_active(true).unwrap();
        assert!(wait_for(|| !generator.is_active()));
        assert_eq!(*units.lock().unwrap(), 5);
    }

    #[test]
    fn test_broadcast_filters_by_capability() {
        let mut sinks = SinkSet::default();
        let lamp = share(ColorReadout::new(ColorConfig::default()));
        let log = share(BufferReadout::new(BufferConfig::default()));
        assert!(sinks.insert("lamp", lamp.clone(), Capabilities::COLOR | Capabilities::STRING));
        assert!(sinks.insert("log", log.clone(), Capabilities::COLOR | Capabilities::STRING));

        assert_eq!(sinks.broadcast(&Update::Color(RED)), 1);
        assert_eq!(lamp.lock().unwrap().color(), RED);
        assert_eq!(sinks.broadcast(&Update::Text("hi".into())), 1);
        assert_eq!(log.lock().unwrap().lines().collect::<Vec<_>>(), ["hi"]);

        let mut seen = Vec::new();
        sinks.for_each_accepting(Capabilities::STRING, |key, _| seen.push(key.to_owned()));
        assert_eq!(seen, ["log"]);
        assert_eq!(sinks.keys().collect::<Vec<_>>(), ["lamp", "log"]);
    }

    #[test]
    fn test_shared_readout_in_two_generators() {
        let readout = bar();
        let first = Generator::new("a", Counting::default(), Duration::from_millis(5)).unwrap();
        let second = Generator::new("b", Counting::default(), Duration::from_millis(5)).unwrap();
        assert!(first.add("bar", Arc::clone(&readout)));
        assert!(second.add("bar", readout), "Same readout, same key, different generator");
    }
}
