use std::cell::Cell;
use std::rc::Rc;

/// Wall-clock source in milliseconds.
/// The browser bridge reads `Date.now()`; tests use [`ManualClock`].
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Hand-driven clock. Clones share the same reading, so a test can keep a
/// handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self { now: Rc::new(Cell::new(start_ms)) }
    }

    pub fn advance_ms(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance_ms(secs * 1000.0);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Start/elapsed bookkeeping for one timed attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stopwatch {
    started_at_ms: Option<f64>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now_ms: f64) {
        self.started_at_ms = Some(now_ms);
    }

    pub fn stop(&mut self) {
        self.started_at_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at_ms.is_some()
    }

    /// Milliseconds since `start`, or 0 if never started.
    /// A clock that steps backwards reads as zero elapsed.
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        self.started_at_ms.map_or(0.0, |start| (now_ms - start).max(0.0))
    }

    pub fn elapsed_secs(&self, now_ms: f64) -> f64 {
        self.elapsed_ms(now_ms) / 1000.0
    }
}
